//! Environment-based configuration.

use std::collections::HashMap;
use std::time::Duration;

use crate::error::ConfigError;
use crate::harness::ExitPolicy;

/// Environment configuration prefix.
pub const DEFAULT_PREFIX: &str = "CONSOLE_ASSERT";

/// Where variable values are looked up.
#[derive(Debug, Clone)]
enum Source {
    /// The process environment.
    Process,
    /// A fixed set of variables.
    Map(HashMap<String, String>),
}

/// Environment variable reader.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// Prefix for environment variables.
    prefix: String,
    /// Lookup source.
    source: Source,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl EnvConfig {
    /// Create a reader over the process environment.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            source: Source::Process,
        }
    }

    /// Create a reader over a fixed set of variables instead of the process
    /// environment.
    ///
    /// Keys are full variable names, prefix included.
    #[must_use]
    pub fn from_map<I, K, V>(prefix: impl Into<String>, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            prefix: prefix.into(),
            source: Source::Map(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Build the full environment variable name.
    fn var_name(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_uppercase()
        } else {
            format!("{}_{}", self.prefix, name.to_uppercase())
        }
    }

    /// Get a string value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        let var_name = self.var_name(name);
        match &self.source {
            Source::Process => std::env::var(&var_name).ok(),
            Source::Map(vars) => vars.get(&var_name).cloned(),
        }
    }

    /// Check if a variable is set.
    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Get a parsed value, failing on values that do not parse.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the variable is set but
    /// cannot be parsed.
    pub fn parse<T>(&self, name: &str) -> Result<Option<T>, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(name)
            .map(|value| {
                value.trim().parse().map_err(|e: T::Err| {
                    ConfigError::invalid_value(self.var_name(name), &value, e.to_string())
                })
            })
            .transpose()
    }

    /// Get a duration in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the variable is not a whole
    /// number.
    pub fn duration_millis(&self, name: &str) -> Result<Option<Duration>, ConfigError> {
        Ok(self.parse::<u64>(name)?.map(Duration::from_millis))
    }

    /// Get an exit policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the variable names no known
    /// policy.
    pub fn exit_policy(&self, name: &str) -> Result<Option<ExitPolicy>, ConfigError> {
        self.parse(name)
    }
}

/// Variable names read by [`VerifyConfig`](super::VerifyConfig), without the
/// prefix.
pub mod vars {
    /// Session timeout in milliseconds.
    pub const TIMEOUT_MS: &str = "TIMEOUT_MS";
    /// Exit policy name.
    pub const EXIT_POLICY: &str = "EXIT_POLICY";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn var_names_are_prefixed() {
        let env = EnvConfig::default();
        assert_eq!(env.var_name("timeout_ms"), "CONSOLE_ASSERT_TIMEOUT_MS");
        assert_eq!(EnvConfig::new("").var_name("x"), "X");
    }

    #[test]
    fn map_lookup() {
        let env = EnvConfig::from_map("APP", [("APP_TIMEOUT_MS", " 250 ")]);
        assert!(env.is_set(vars::TIMEOUT_MS));
        assert!(!env.is_set(vars::EXIT_POLICY));
        assert_eq!(
            env.duration_millis(vars::TIMEOUT_MS).unwrap(),
            Some(Duration::from_millis(250))
        );
        assert_eq!(env.exit_policy(vars::EXIT_POLICY).unwrap(), None);
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let env = EnvConfig::from_map(
            DEFAULT_PREFIX,
            [("CONSOLE_ASSERT_EXIT_POLICY", "sometimes")],
        );
        match env.exit_policy(vars::EXIT_POLICY).unwrap_err() {
            ConfigError::InvalidValue { name, value, .. } => {
                assert_eq!(name, "CONSOLE_ASSERT_EXIT_POLICY");
                assert_eq!(value, "sometimes");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
