//! File-based configuration loading.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use super::VerifyConfig;
use crate::error::ConfigError;
use crate::harness::ExitPolicy;

/// The contents of a TOML configuration file.
///
/// Every key is optional; keys that are absent leave the corresponding
/// setting untouched.
///
/// ```toml
/// timeout_ms = 2000
/// exit_policy = "failure"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Session timeout in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Exit policy name.
    pub exit_policy: Option<ExitPolicy>,
}

impl ConfigFile {
    /// Parse TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or has unknown keys.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Override the settings of `config` with the keys present in this file.
    #[must_use]
    pub fn apply(&self, mut config: VerifyConfig) -> VerifyConfig {
        if let Some(ms) = self.timeout_ms {
            config.timeout = Duration::from_millis(ms);
        }
        if let Some(policy) = self.exit_policy {
            config.exit_policy = policy;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_all_keys() {
        let file = ConfigFile::parse("timeout_ms = 2000\nexit_policy = \"any\"\n").unwrap();
        assert_eq!(file.timeout_ms, Some(2000));
        assert_eq!(file.exit_policy, Some(ExitPolicy::Any));
    }

    #[test]
    fn empty_file_changes_nothing() {
        let file = ConfigFile::parse("").unwrap();
        assert_eq!(file, ConfigFile::default());
        let config = VerifyConfig::new().exit_policy(ExitPolicy::Never);
        assert_eq!(file.apply(config), config);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = ConfigFile::parse("timeout = 5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn unknown_policy_is_rejected() {
        assert!(ConfigFile::parse("exit_policy = \"sometimes\"\n").is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ConfigFile::load(Path::new("/nonexistent/console-assert.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/console-assert.toml"));
    }
}
