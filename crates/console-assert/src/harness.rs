//! Execution harnesses.
//!
//! A [`Harness`] runs a target program once with simulated input and
//! captures every line it prints. The verifier only talks to this trait;
//! two bindings are provided:
//!
//! - [`InProcessHarness`]: runs a Rust [`Program`] against a [`Console`]
//! - [`ProcessHarness`]: spawns an executable and talks to it over pipes

mod console;
mod policy;
mod process;

pub use console::{Console, Exit, InProcessHarness, Program};
pub use policy::{ExitPolicy, ParseExitPolicyError};
pub use process::ProcessHarness;

use crate::error::HarnessError;

/// Runs a target program under simulated input and captures its output.
///
/// Calls happen in the order `reset`, `set_exit_policy`, `set_input`,
/// `invoke`, `captured_output`, once per verification.
pub trait Harness {
    /// Discard any captured output and program state from earlier runs.
    fn reset(&mut self);

    /// Queue input for the next invocation, one read per command, in order.
    fn set_input(&mut self, commands: &[String]);

    /// Declare which termination codes are permitted during the next
    /// invocation.
    fn set_exit_policy(&mut self, policy: ExitPolicy);

    /// Run the target's entry point to completion with the given arguments.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::IllegalExit`] if the target terminated with a
    /// code the exit policy does not permit, or another harness error if
    /// the target could not be run.
    fn invoke(&mut self, args: &[String]) -> Result<(), HarnessError>;

    /// Get every line printed during the most recent invocation, in order.
    fn captured_output(&self) -> &[String];
}

impl<H: Harness + ?Sized> Harness for &mut H {
    fn reset(&mut self) {
        (**self).reset();
    }

    fn set_input(&mut self, commands: &[String]) {
        (**self).set_input(commands);
    }

    fn set_exit_policy(&mut self, policy: ExitPolicy) {
        (**self).set_exit_policy(policy);
    }

    fn invoke(&mut self, args: &[String]) -> Result<(), HarnessError> {
        (**self).invoke(args)
    }

    fn captured_output(&self) -> &[String] {
        (**self).captured_output()
    }
}

impl<H: Harness + ?Sized> Harness for Box<H> {
    fn reset(&mut self) {
        (**self).reset();
    }

    fn set_input(&mut self, commands: &[String]) {
        (**self).set_input(commands);
    }

    fn set_exit_policy(&mut self, policy: ExitPolicy) {
        (**self).set_exit_policy(policy);
    }

    fn invoke(&mut self, args: &[String]) -> Result<(), HarnessError> {
        (**self).invoke(args)
    }

    fn captured_output(&self) -> &[String] {
        (**self).captured_output()
    }
}
