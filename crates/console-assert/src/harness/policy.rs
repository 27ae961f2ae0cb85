//! Exit policies: which termination codes a target may exit with.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Which process-termination codes are permitted during an invocation.
///
/// A target that simply returns from its entry point is always fine; the
/// policy only governs explicit termination with an exit code.
///
/// Names are case-insensitive wherever they are read, and `none`,
/// `nonzero` and `always` are accepted as aliases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum ExitPolicy {
    /// No explicit termination is permitted.
    Never,

    /// Only a clean termination (code 0) is permitted.
    #[default]
    Success,

    /// Only a failing termination (non-zero code) is permitted.
    Failure,

    /// Any termination code is permitted.
    Any,
}

impl ExitPolicy {
    /// Check whether terminating with `code` is permitted.
    #[must_use]
    pub const fn permits(self, code: i32) -> bool {
        match self {
            Self::Never => false,
            Self::Success => code == 0,
            Self::Failure => code != 0,
            Self::Any => true,
        }
    }

    /// Get the policy name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Any => "any",
        }
    }
}

impl fmt::Display for ExitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown exit policy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown exit policy {0:?} (expected never, success, failure or any)")]
pub struct ParseExitPolicyError(String);

impl FromStr for ExitPolicy {
    type Err = ParseExitPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "never" | "none" => Ok(Self::Never),
            "success" => Ok(Self::Success),
            "failure" | "nonzero" => Ok(Self::Failure),
            "any" | "always" => Ok(Self::Any),
            _ => Err(ParseExitPolicyError(s.to_string())),
        }
    }
}

impl TryFrom<String> for ExitPolicy {
    type Error = ParseExitPolicyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
