//! Configuration for verifications.
//!
//! [`VerifyConfig`] holds the settings shared by a verifier and its harness:
//! the wall-clock limit for one session and the exit policy. Values come
//! from code, from `CONSOLE_ASSERT_*` environment variables, or from a TOML
//! file.

pub mod env;
pub mod file;

use std::path::Path;
use std::time::Duration;

pub use env::{DEFAULT_PREFIX, EnvConfig};
pub use file::ConfigFile;

use self::env::vars;

use crate::error::ConfigError;
use crate::harness::ExitPolicy;

/// Default wall-clock limit for one session (5 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings for a verifier and its harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyConfig {
    /// Wall-clock limit for one session.
    pub timeout: Duration,

    /// Which termination codes the target may exit with.
    pub exit_policy: ExitPolicy,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            exit_policy: ExitPolicy::default(),
        }
    }
}

impl VerifyConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the wall-clock limit.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the exit policy.
    #[must_use]
    pub const fn exit_policy(mut self, policy: ExitPolicy) -> Self {
        self.exit_policy = policy;
        self
    }

    /// Build a configuration from the defaults overridden by the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a `CONSOLE_ASSERT_*` variable is set to a value
    /// that cannot be interpreted.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().apply_env(&EnvConfig::default())
    }

    /// Override settings with the values present in `env`.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to a value that cannot be
    /// interpreted.
    pub fn apply_env(mut self, env: &EnvConfig) -> Result<Self, ConfigError> {
        if let Some(timeout) = env.duration_millis(vars::TIMEOUT_MS)? {
            self.timeout = timeout;
        }
        if let Some(policy) = env.exit_policy(vars::EXIT_POLICY)? {
            self.exit_policy = policy;
        }
        Ok(self)
    }

    /// Parse a configuration from TOML text, starting from the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or has unknown keys.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(ConfigFile::parse(content)?.apply(Self::default()))
    }

    /// Load a configuration from a TOML file, starting from the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(ConfigFile::load(path.as_ref())?.apply(Self::default()))
    }
}
