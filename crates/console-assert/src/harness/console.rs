//! In-process execution of console programs.
//!
//! A [`Program`] is an entry point that reads commands from and prints lines
//! to a simulated [`Console`]. [`InProcessHarness`] re-creates the program
//! for every session, so no state leaks from one verification to the next.

use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, trace};

use super::{ExitPolicy, Harness};
use crate::error::HarnessError;

/// A simulated terminal handed to an in-process program.
#[derive(Debug, Default)]
pub struct Console {
    /// Commands not yet read.
    input: VecDeque<String>,
    /// Lines printed so far.
    output: Vec<String>,
    /// Number of successful reads.
    reads: usize,
}

impl Console {
    /// Create a console without input.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a console that will serve the given commands.
    #[must_use]
    pub fn with_input<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: commands.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Read the next command, or `None` once the input is exhausted.
    pub fn read_line(&mut self) -> Option<String> {
        let line = self.input.pop_front()?;
        self.reads += 1;
        trace!(line = %line, "console read");
        Some(line)
    }

    /// Print one line of output.
    ///
    /// Each call produces exactly one captured line, even if the text itself
    /// contains line breaks.
    pub fn print_line(&mut self, line: impl fmt::Display) {
        let line = line.to_string();
        trace!(line = %line, "console print");
        self.output.push(line);
    }

    /// Request termination with `code`.
    ///
    /// Return the result as the program's error to end the run:
    /// `return Err(console.exit(1))`.
    #[allow(clippy::unused_self)]
    #[must_use]
    pub const fn exit(&self, code: i32) -> Exit {
        Exit::with_code(code)
    }

    /// Get the lines printed so far.
    #[must_use]
    pub fn output(&self) -> &[String] {
        &self.output
    }

    /// Check if unread input remains.
    #[must_use]
    pub fn has_input(&self) -> bool {
        !self.input.is_empty()
    }

    /// Get the number of commands read so far.
    #[must_use]
    pub const fn reads(&self) -> usize {
        self.reads
    }
}

/// A request to terminate with an exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Exit {
    code: i32,
}

impl Exit {
    /// Create an exit request.
    #[must_use]
    pub const fn with_code(code: i32) -> Self {
        Self { code }
    }

    /// Get the exit code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self.code
    }
}

/// The entry point of an in-process console program.
///
/// Returning `Ok(())` is a normal return. Returning `Err(Exit)` terminates
/// with a code, which is checked against the harness's exit policy.
pub trait Program {
    /// Run the program to completion.
    fn run(&mut self, args: &[String], console: &mut Console) -> Result<(), Exit>;
}

impl<F> Program for F
where
    F: FnMut(&[String], &mut Console) -> Result<(), Exit>,
{
    fn run(&mut self, args: &[String], console: &mut Console) -> Result<(), Exit> {
        self(args, console)
    }
}

/// Runs a [`Program`] in the current process.
pub struct InProcessHarness<P> {
    /// Creates a fresh program on reset.
    factory: Box<dyn Fn() -> P>,
    /// The current program instance.
    program: P,
    /// The console of the current run.
    console: Console,
    /// The exit policy for the next invocation.
    policy: ExitPolicy,
}

impl<P: Program> InProcessHarness<P> {
    /// Create a harness that builds its program with `factory`.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> P + 'static,
    {
        let program = factory();
        Self {
            factory: Box::new(factory),
            program,
            console: Console::new(),
            policy: ExitPolicy::default(),
        }
    }

    /// Get the current program instance.
    #[must_use]
    pub const fn program(&self) -> &P {
        &self.program
    }

    /// Get the console of the current run.
    #[must_use]
    pub const fn console(&self) -> &Console {
        &self.console
    }

    /// Get the exit policy for the next invocation.
    #[must_use]
    pub const fn exit_policy(&self) -> ExitPolicy {
        self.policy
    }
}

impl<P: Program + Default + 'static> Default for InProcessHarness<P> {
    fn default() -> Self {
        Self::new(P::default)
    }
}

impl<P> fmt::Debug for InProcessHarness<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InProcessHarness")
            .field("console", &self.console)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<P: Program> Harness for InProcessHarness<P> {
    fn reset(&mut self) {
        debug!("resetting in-process program");
        self.program = (self.factory)();
        self.console = Console::new();
    }

    fn set_input(&mut self, commands: &[String]) {
        self.console.input = commands.iter().cloned().collect();
    }

    fn set_exit_policy(&mut self, policy: ExitPolicy) {
        self.policy = policy;
    }

    fn invoke(&mut self, args: &[String]) -> Result<(), HarnessError> {
        debug!(
            args = args.len(),
            input = self.console.input.len(),
            "invoking in-process program"
        );

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.program.run(args, &mut self.console)
        }));

        debug!(
            lines = self.console.output.len(),
            reads = self.console.reads,
            "in-process program finished"
        );

        match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(exit)) if self.policy.permits(exit.code()) => {
                debug!(code = exit.code(), "permitted exit");
                Ok(())
            }
            Ok(Err(exit)) => Err(HarnessError::IllegalExit {
                code: exit.code(),
                policy: self.policy,
            }),
            Err(payload) => Err(HarnessError::Panicked {
                message: panic_message(payload.as_ref()),
            }),
        }
    }

    fn captured_output(&self) -> &[String] {
        &self.console.output
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "<non-string panic payload>".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo(_args: &[String], console: &mut Console) -> Result<(), Exit> {
        while let Some(line) = console.read_line() {
            if line == "quit" {
                return Ok(());
            }
            console.print_line(line);
        }
        Ok(())
    }

    fn failing(_args: &[String], console: &mut Console) -> Result<(), Exit> {
        console.print_line("Error, giving up");
        Err(console.exit(1))
    }

    #[derive(Default)]
    struct Counter {
        runs: usize,
    }

    impl Program for Counter {
        fn run(&mut self, _args: &[String], console: &mut Console) -> Result<(), Exit> {
            self.runs += 1;
            console.print_line(self.runs);
            Ok(())
        }
    }

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn console_reads_in_order() {
        let mut console = Console::with_input(["a", "b"]);
        assert_eq!(console.read_line().as_deref(), Some("a"));
        assert!(console.has_input());
        assert_eq!(console.read_line().as_deref(), Some("b"));
        assert_eq!(console.read_line(), None);
        assert_eq!(console.reads(), 2);
    }

    #[test]
    fn captures_printed_lines() {
        let mut harness = InProcessHarness::new(|| echo);
        harness.reset();
        harness.set_input(&strings(&["one", "two", "quit", "three"]));
        harness.invoke(&[]).unwrap();
        assert_eq!(harness.captured_output(), ["one", "two"]);
        assert!(harness.console().has_input());
    }

    #[test]
    fn exit_leaves_console_untouched() {
        let mut console = Console::new();
        console.print_line("before");
        let exit = console.exit(4);
        assert_eq!(exit.code(), 4);
        assert_eq!(console.output(), ["before"]);
    }

    #[test]
    fn reset_recreates_program() {
        let mut harness = InProcessHarness::<Counter>::default();
        for _ in 0..3 {
            harness.reset();
            harness.invoke(&[]).unwrap();
            assert_eq!(harness.captured_output(), ["1"]);
        }
    }

    #[test]
    fn exit_is_checked_against_policy() {
        let mut harness = InProcessHarness::new(|| failing);
        harness.reset();
        let err = harness.invoke(&[]).unwrap_err();
        assert!(matches!(
            err,
            HarnessError::IllegalExit {
                code: 1,
                policy: ExitPolicy::Success
            }
        ));
        assert_eq!(harness.captured_output(), ["Error, giving up"]);

        harness.reset();
        harness.set_exit_policy(ExitPolicy::Failure);
        assert!(harness.invoke(&[]).is_ok());
    }

    #[test]
    fn panics_are_reported() {
        let mut harness = InProcessHarness::new(|| {
            |_: &[String], _: &mut Console| -> Result<(), Exit> { panic!("boom") }
        });
        harness.reset();
        let err = harness.invoke(&[]).unwrap_err();
        match err {
            HarnessError::Panicked { message } => assert_eq!(message, "boom"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
