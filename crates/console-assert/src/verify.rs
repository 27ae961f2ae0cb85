//! The verifier: runs a session through a harness and checks its output.
//!
//! # Example
//!
//! ```
//! use console_assert::{Console, Exit, Expectation, InProcessHarness, Session, Verifier};
//!
//! fn program(_args: &[String], console: &mut Console) -> Result<(), Exit> {
//!     while let Some(command) = console.read_line() {
//!         match command.as_str() {
//!             "help" => console.print_line("Available commands: help, quit"),
//!             "quit" => return Ok(()),
//!             other => console.print_line(format!("Error, unknown command {other}")),
//!         }
//!     }
//!     Ok(())
//! }
//!
//! let mut verifier = Verifier::new(InProcessHarness::new(|| program));
//! verifier
//!     .verify(
//!         &Session::new(["help", "quit"]),
//!         &Expectation::single_exact("Available commands: help, quit"),
//!     )
//!     .unwrap();
//! assert!(verifier.verify(&Session::command("bogus"), &Expectation::error()).is_ok());
//! ```

use tracing::debug;

use crate::config::VerifyConfig;
use crate::error::{HarnessError, Result, VerifyError};
use crate::expectation::{CountDirection, Discrepancy, Expectation};
use crate::harness::{ExitPolicy, Harness};
use crate::matcher::Matcher;
use crate::report::Report;
use crate::session::Session;

/// Verifies console sessions against expectations.
///
/// Each call to [`verify`](Self::verify) resets the harness, feeds it the
/// session's commands, runs the program once and compares what it printed.
#[derive(Debug)]
pub struct Verifier<H> {
    harness: H,
    exit_policy: ExitPolicy,
}

impl<H: Harness> Verifier<H> {
    /// Create a verifier over `harness` with the default exit policy.
    pub fn new(harness: H) -> Self {
        Self {
            harness,
            exit_policy: ExitPolicy::default(),
        }
    }

    /// Create a verifier using the exit policy from `config`.
    pub fn with_config(harness: H, config: &VerifyConfig) -> Self {
        Self {
            harness,
            exit_policy: config.exit_policy,
        }
    }

    /// Permit the target to terminate according to `policy` in every
    /// following verification.
    pub fn allow_exit(&mut self, policy: ExitPolicy) -> &mut Self {
        self.exit_policy = policy;
        self
    }

    /// Get the exit policy applied to each verification.
    pub const fn exit_policy(&self) -> ExitPolicy {
        self.exit_policy
    }

    /// Get the harness.
    pub const fn harness(&self) -> &H {
        &self.harness
    }

    /// Get the harness mutably.
    pub fn harness_mut(&mut self) -> &mut H {
        &mut self.harness
    }

    /// Consume the verifier, returning the harness.
    pub fn into_harness(self) -> H {
        self.harness
    }

    /// Run `session` and check its output against `expectation`.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::EmptySession`] if the session has no commands,
    /// [`VerifyError::IllegalExit`] or [`VerifyError::Harness`] if the program
    /// could not run to completion, and an output failure if the captured
    /// output does not satisfy the expectation.
    pub fn verify(&mut self, session: &Session, expectation: &Expectation) -> Result<()> {
        let span = tracing::debug_span!(
            "verify",
            commands = session.commands().len(),
            args = session.launch_args().len(),
            shape = %expectation.shape(),
        );
        let _guard = span.enter();

        if session.commands().is_empty() {
            return Err(VerifyError::EmptySession);
        }

        self.harness.reset();
        self.harness.set_exit_policy(self.exit_policy);
        self.harness.set_input(session.commands());
        let invoked = self.harness.invoke(session.launch_args());
        let output = self.harness.captured_output();
        debug!(lines = output.len(), "captured output");

        let report = || Box::new(Report::new(session, expectation, output));

        if let Err(error) = invoked {
            debug!(%error, "harness failed");
            return Err(match error {
                HarnessError::IllegalExit { code, policy } => VerifyError::IllegalExit {
                    code,
                    policy,
                    report: report(),
                },
                source => VerifyError::Harness {
                    source,
                    report: report(),
                },
            });
        }

        expectation.check(output).map_err(|discrepancy| {
            debug!(?discrepancy, "output did not match");
            match discrepancy {
                Discrepancy::NoOutput => VerifyError::NoOutput { report: report() },
                Discrepancy::TooMuchOutput { .. } => VerifyError::TooMuchOutput { report: report() },
                Discrepancy::UnexpectedOutput { .. } => {
                    VerifyError::UnexpectedOutput { report: report() }
                }
                Discrepancy::LineCount { expected, actual } => VerifyError::LineCountMismatch {
                    direction: CountDirection::of(expected, actual),
                    report: report(),
                },
                Discrepancy::Mismatch { line } => VerifyError::Mismatch {
                    line,
                    report: report(),
                },
            }
        })
    }

    /// Run `session` and panic with the failure report if its output does
    /// not satisfy `expectation`.
    ///
    /// # Panics
    ///
    /// Panics if the verification fails.
    #[track_caller]
    pub fn assert(&mut self, session: &Session, expectation: &Expectation) {
        if let Err(err) = self.verify(session, expectation) {
            panic!("{err}");
        }
    }

    /// Check that `session` prints nothing.
    ///
    /// # Errors
    ///
    /// See [`verify`](Self::verify).
    pub fn no_output(&mut self, session: &Session) -> Result<()> {
        self.verify(session, &Expectation::none())
    }

    /// Check that `session` prints exactly one line accepted by `line`.
    ///
    /// # Errors
    ///
    /// See [`verify`](Self::verify).
    pub fn one_line(&mut self, session: &Session, line: impl Into<Matcher>) -> Result<()> {
        self.verify(session, &Expectation::single_matching(line))
    }

    /// Check that `session` prints exactly these lines, in order.
    ///
    /// # Errors
    ///
    /// See [`verify`](Self::verify).
    pub fn lines<I, M>(&mut self, session: &Session, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = M>,
        M: Into<Matcher>,
    {
        self.verify(session, &Expectation::ordered_matching(lines))
    }

    /// Check that the first line `session` prints is an error message.
    ///
    /// # Errors
    ///
    /// See [`verify`](Self::verify).
    pub fn error_line(&mut self, session: &Session) -> Result<()> {
        self.verify(session, &Expectation::error())
    }
}
