//! Scripted harness for testing.
//!
//! Produces canned output instead of running a program, and records every
//! call it receives so tests can check what a verifier asked for.

use std::fmt;

use crate::config::DEFAULT_TIMEOUT;
use crate::error::HarnessError;
use crate::harness::{ExitPolicy, Harness};

/// A call received by a [`ScriptedHarness`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarnessCall {
    /// `reset`.
    Reset,
    /// `set_exit_policy` with the given policy.
    SetExitPolicy(ExitPolicy),
    /// `set_input` with the given commands.
    SetInput(Vec<String>),
    /// `invoke` with the given arguments.
    Invoke(Vec<String>),
}

type Responder = Box<dyn Fn(&[String], &[String]) -> Vec<String>>;

/// A harness that replays scripted output.
pub struct ScriptedHarness {
    /// Builds the output from launch arguments and commands.
    responder: Responder,
    /// Exit code the scripted program terminates with.
    exit_code: Option<i32>,
    /// Whether invocations time out.
    times_out: bool,
    /// Policy for the next invocation.
    policy: ExitPolicy,
    /// Input for the next invocation.
    input: Vec<String>,
    /// Output of the last invocation.
    output: Vec<String>,
    /// Every call received, in order.
    calls: Vec<HarnessCall>,
}

impl ScriptedHarness {
    /// Create a harness that prints nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::responding(|_, _| Vec::new())
    }

    /// Create a harness that prints the given lines on every invocation.
    #[must_use]
    pub fn printing<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        Self::responding(move |_, _| lines.clone())
    }

    /// Create a harness whose output is computed from the launch arguments
    /// and the commands of each invocation.
    #[must_use]
    pub fn responding<F>(responder: F) -> Self
    where
        F: Fn(&[String], &[String]) -> Vec<String> + 'static,
    {
        Self {
            responder: Box::new(responder),
            exit_code: None,
            times_out: false,
            policy: ExitPolicy::default(),
            input: Vec::new(),
            output: Vec::new(),
            calls: Vec::new(),
        }
    }

    /// Terminate with `code` after printing.
    #[must_use]
    pub const fn exiting_with(mut self, code: i32) -> Self {
        self.exit_code = Some(code);
        self
    }

    /// Fail every invocation with a timeout after printing.
    #[must_use]
    pub const fn timing_out(mut self) -> Self {
        self.times_out = true;
        self
    }

    /// Get every call received, in order.
    #[must_use]
    pub fn calls(&self) -> &[HarnessCall] {
        &self.calls
    }

    /// Get the number of resets.
    #[must_use]
    pub fn resets(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, HarnessCall::Reset))
            .count()
    }

    /// Get the arguments of every invocation, in order.
    #[must_use]
    pub fn invocations(&self) -> Vec<&[String]> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HarnessCall::Invoke(args) => Some(args.as_slice()),
                _ => None,
            })
            .collect()
    }

    /// Get the input of every `set_input` call, in order.
    #[must_use]
    pub fn inputs(&self) -> Vec<&[String]> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HarnessCall::SetInput(commands) => Some(commands.as_slice()),
                _ => None,
            })
            .collect()
    }

    /// Get the policy of every `set_exit_policy` call, in order.
    #[must_use]
    pub fn policies(&self) -> Vec<ExitPolicy> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HarnessCall::SetExitPolicy(policy) => Some(*policy),
                _ => None,
            })
            .collect()
    }

    /// Forget every recorded call.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl Default for ScriptedHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ScriptedHarness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedHarness")
            .field("exit_code", &self.exit_code)
            .field("times_out", &self.times_out)
            .field("policy", &self.policy)
            .field("calls", &self.calls)
            .finish_non_exhaustive()
    }
}

impl Harness for ScriptedHarness {
    fn reset(&mut self) {
        self.calls.push(HarnessCall::Reset);
        self.input.clear();
        self.output.clear();
    }

    fn set_input(&mut self, commands: &[String]) {
        self.calls.push(HarnessCall::SetInput(commands.to_vec()));
        self.input = commands.to_vec();
    }

    fn set_exit_policy(&mut self, policy: ExitPolicy) {
        self.calls.push(HarnessCall::SetExitPolicy(policy));
        self.policy = policy;
    }

    fn invoke(&mut self, args: &[String]) -> Result<(), HarnessError> {
        self.calls.push(HarnessCall::Invoke(args.to_vec()));
        self.output = (self.responder)(args, &self.input);

        if self.times_out {
            return Err(HarnessError::Timeout {
                duration: DEFAULT_TIMEOUT,
            });
        }
        match self.exit_code {
            Some(code) if !self.policy.permits(code) => Err(HarnessError::IllegalExit {
                code,
                policy: self.policy,
            }),
            _ => Ok(()),
        }
    }

    fn captured_output(&self) -> &[String] {
        &self.output
    }
}
