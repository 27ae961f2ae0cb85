//! console-assert: output assertions for interactive console programs
//!
//! This crate drives a console program through a scripted session, captures
//! every line it prints, and checks the lines against a declared
//! expectation. When the output deviates, the failure carries a report that
//! reproduces the whole session: the launch arguments, the commands, what
//! was expected and what was printed.
//!
//! # Features
//!
//! - **Matchers** for exact lines, prefixes, substrings, regexes, globs and
//!   custom predicates, each with a readable description
//! - **Expectations** for no output, exactly one line, an ordered list of
//!   lines, or a leading error line
//! - **In-process harness** running a Rust [`Program`] against a simulated
//!   [`Console`]
//! - **Process harness** running a real executable over pipes, with a
//!   wall-clock timeout
//! - **Exit policies** deciding which termination codes are acceptable
//!
//! # Example
//!
//! ```
//! use console_assert::prelude::*;
//!
//! fn program(_args: &[String], console: &mut Console) -> Result<(), Exit> {
//!     while let Some(command) = console.read_line() {
//!         match command.as_str() {
//!             "help" => console.print_line("Available commands: help, quit"),
//!             "quit" => return Ok(()),
//!             _ => console.print_line("Error, unknown command"),
//!         }
//!     }
//!     Ok(())
//! }
//!
//! let mut verifier = Verifier::new(InProcessHarness::new(|| program));
//! verifier.assert(
//!     &Session::new(["help", "quit"]),
//!     &Expectation::single_exact("Available commands: help, quit"),
//! );
//!
//! let err = verifier
//!     .one_line(&Session::command("bogus"), "error, unknown command")
//!     .unwrap_err();
//! assert_eq!(err.line(), Some(1));
//! ```

pub mod config;
pub mod error;
pub mod expectation;
pub mod harness;
pub mod matcher;
pub mod prelude;
pub mod report;
pub mod session;
pub mod verify;

pub use config::{ConfigFile, EnvConfig, VerifyConfig};
pub use error::{ConfigError, HarnessError, Result, VerifyError};
pub use expectation::{CountDirection, Discrepancy, ERROR_PREFIX, Expectation, Shape};
pub use harness::{
    Console, Exit, ExitPolicy, Harness, InProcessHarness, ParseExitPolicyError, ProcessHarness,
    Program,
};
pub use matcher::{CompiledRegex, Matcher, Predicate};
pub use report::Report;
pub use session::{QUIT_COMMAND, Session, add_quit};
pub use verify::Verifier;

// Test utilities
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

#[cfg(any(test, feature = "test-utils"))]
pub use test_utils::{HarnessCall, ScriptedHarness};
