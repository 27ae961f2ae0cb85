//! Error types for console-assert.
//!
//! Verification failures carry a [`Report`] and render it as their message,
//! so printing a [`VerifyError`] shows the session, the expectation and the
//! actual output. Harness and configuration problems have their own types.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::expectation::CountDirection;
use crate::harness::ExitPolicy;
use crate::report::{self, Report};

/// A failed verification.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The session had no commands to run.
    #[error("a verification needs at least one command to run")]
    EmptySession,

    /// Output was expected but none was produced.
    #[error("{}", report::no_output(report))]
    NoOutput {
        /// Diagnostic report.
        report: Box<Report>,
    },

    /// Exactly one line was expected but more were produced.
    #[error("{}", report::too_much_output(report))]
    TooMuchOutput {
        /// Diagnostic report.
        report: Box<Report>,
    },

    /// No output was expected but some was produced.
    #[error("{}", report::unexpected_output(report))]
    UnexpectedOutput {
        /// Diagnostic report.
        report: Box<Report>,
    },

    /// The number of output lines differs from the number expected.
    #[error("{}", report::line_count_mismatch(report, *direction))]
    LineCountMismatch {
        /// Whether there were too few or too many lines.
        direction: CountDirection,
        /// Diagnostic report.
        report: Box<Report>,
    },

    /// A line did not satisfy its matcher.
    #[error("{}", report::mismatch(report, *line))]
    Mismatch {
        /// The 1-based number of the first failing line.
        line: usize,
        /// Diagnostic report.
        report: Box<Report>,
    },

    /// The target terminated with a code the exit policy does not permit.
    #[error("{}", report::illegal_exit(report, *code, *policy))]
    IllegalExit {
        /// The termination code.
        code: i32,
        /// The policy in force.
        policy: ExitPolicy,
        /// Diagnostic report.
        report: Box<Report>,
    },

    /// The harness failed to run the session.
    #[error("{}", report::harness_failure(report, source))]
    Harness {
        /// The underlying harness error.
        #[source]
        source: HarnessError,
        /// Diagnostic report.
        report: Box<Report>,
    },
}

impl VerifyError {
    /// Get the diagnostic report, if this failure has one.
    #[must_use]
    pub fn report(&self) -> Option<&Report> {
        match self {
            Self::EmptySession => None,
            Self::NoOutput { report }
            | Self::TooMuchOutput { report }
            | Self::UnexpectedOutput { report }
            | Self::LineCountMismatch { report, .. }
            | Self::Mismatch { report, .. }
            | Self::IllegalExit { report, .. }
            | Self::Harness { report, .. } => Some(report),
        }
    }

    /// Get the 1-based number of the first mismatching line.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::Mismatch { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Check if this failure is about output content or shape, as opposed
    /// to how the program terminated or ran.
    #[must_use]
    pub const fn is_output_failure(&self) -> bool {
        matches!(
            self,
            Self::NoOutput { .. }
                | Self::TooMuchOutput { .. }
                | Self::UnexpectedOutput { .. }
                | Self::LineCountMismatch { .. }
                | Self::Mismatch { .. }
        )
    }

    /// Check if this is an illegal-exit failure.
    #[must_use]
    pub const fn is_illegal_exit(&self) -> bool {
        matches!(self, Self::IllegalExit { .. })
    }
}

/// Errors raised by an execution harness.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The target terminated with a code the exit policy does not permit.
    #[error("illegal exit with code {code} under the '{policy}' exit policy")]
    IllegalExit {
        /// The termination code.
        code: i32,
        /// The policy in force.
        policy: ExitPolicy,
    },

    /// The target did not finish in time.
    #[error("the program did not finish within {duration:?}")]
    Timeout {
        /// The time limit that elapsed.
        duration: Duration,
    },

    /// The target program could not be started.
    #[error("failed to start {program}: {source}")]
    Spawn {
        /// The program that failed to start.
        program: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An I/O error occurred with additional context.
    #[error("{context}: {source}")]
    Io {
        /// What operation was being performed.
        context: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The target was terminated without an exit code (e.g. by a signal).
    #[error("the program was terminated without an exit code ({status})")]
    Terminated {
        /// Platform description of the exit status.
        status: String,
    },

    /// The in-process target panicked.
    #[error("the program panicked: {message}")]
    Panicked {
        /// The panic message.
        message: String,
    },
}

impl HarnessError {
    /// Create an I/O error with context.
    pub fn io_context(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Check if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or has unknown keys.
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A configuration value could not be interpreted.
    #[error("invalid value {value:?} for {name}: {reason}")]
    InvalidValue {
        /// The setting name.
        name: String,
        /// The offending value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl ConfigError {
    /// Create an invalid value error.
    pub fn invalid_value(
        name: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            name: name.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for verifications.
pub type Result<T> = std::result::Result<T, VerifyError>;
