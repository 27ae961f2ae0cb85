//! Failure reports.
//!
//! A [`Report`] captures everything needed to reproduce a failed
//! verification by inspection alone: the launch arguments, the commands,
//! what was expected and what the program actually printed. It is only
//! built once a verification has failed.

use std::fmt::Write;

use crate::error::HarnessError;
use crate::expectation::{CountDirection, Expectation, Shape};
use crate::harness::ExitPolicy;
use crate::session::Session;

/// Placeholder printed for an empty transcript.
const NO_OUTPUT: &str = "(no output)";

/// Diagnostic data for a failed verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    args: Vec<String>,
    commands: Vec<String>,
    shape: Shape,
    expected: Vec<String>,
    actual: Vec<String>,
}

impl Report {
    /// Build a report for a session, its expectation and the captured output.
    #[must_use]
    pub fn new(session: &Session, expectation: &Expectation, actual: &[String]) -> Self {
        Self {
            args: session.launch_args().to_vec(),
            commands: session.commands().to_vec(),
            shape: expectation.shape(),
            expected: expectation.descriptions(),
            actual: actual.to_vec(),
        }
    }

    /// Get the launch arguments.
    #[must_use]
    pub fn launch_args(&self) -> &[String] {
        &self.args
    }

    /// Get the commands that were run.
    #[must_use]
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Get the shape of the expectation.
    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.shape
    }

    /// Get the expected line descriptions.
    #[must_use]
    pub fn expected(&self) -> &[String] {
        &self.expected
    }

    /// Get the captured output.
    #[must_use]
    pub fn actual(&self) -> &[String] {
        &self.actual
    }

    /// Describe the session: launch arguments and the commands, one per line.
    #[must_use]
    pub fn session_intro(&self) -> String {
        format!(
            "We ran a session on your interactive console{}, running the commands\n\n{}",
            arguments_clause(&self.args),
            join_lines(&self.commands)
        )
    }

    /// The session description followed by the unexpected-output lead-in.
    #[must_use]
    pub fn session_description(&self) -> String {
        format!("{}\n\nbut got unexpected output:\n", self.session_intro())
    }

    /// Expected descriptions and actual output side by side, one per line.
    #[must_use]
    pub fn expected_and_actual(&self) -> String {
        let mut out = String::from("Expected was:\n\n");
        for description in &self.expected {
            let _ = writeln!(out, "{description}");
        }
        let _ = write!(out, "\nYour output was:\n\n{}", transcript(&self.actual));
        out
    }

    /// The failing matcher description and line for a 1-based line number.
    fn line_detail(&self, line: usize) -> String {
        let index = line.saturating_sub(1);
        let expected = self.expected.get(index).map_or("<nothing>", String::as_str);
        match self.actual.get(index) {
            Some(actual) => format!("Expected: {expected}\n     but: was {actual:?}"),
            None => format!("Expected: {expected}\n     but: no line was printed"),
        }
    }
}

/// `" that has been called with the command line arguments [a, b]"`, or
/// nothing when there are no arguments.
fn arguments_clause(args: &[String]) -> String {
    if args.is_empty() {
        return String::new();
    }
    format!(
        " that has been called with the command line arguments [{}]",
        args.join(", ")
    )
}

fn join_lines(lines: &[String]) -> String {
    lines.join("\n")
}

fn transcript(lines: &[String]) -> String {
    if lines.is_empty() {
        NO_OUTPUT.to_string()
    } else {
        join_lines(lines)
    }
}

pub(crate) fn no_output(report: &Report) -> String {
    format!(
        "{}\nThe program never produced output!",
        report.session_description()
    )
}

pub(crate) fn too_much_output(report: &Report) -> String {
    format!(
        "{}\nThe program produced output more than once! It printed {} lines, expected was exactly one.",
        report.session_description(),
        report.actual.len()
    )
}

pub(crate) fn unexpected_output(report: &Report) -> String {
    format!(
        "{}\nThe program produced output while it was expected not to output anything!\n\nYour output was:\n\n{}",
        report.session_description(),
        transcript(&report.actual)
    )
}

pub(crate) fn line_count_mismatch(report: &Report, direction: CountDirection) -> String {
    format!(
        "{}Your program's output had {} lines.\nYour output had {} lines, expected were {}.\n{}",
        report.session_description(),
        direction.phrase(),
        report.actual.len(),
        report.expected.len(),
        report.expected_and_actual()
    )
}

pub(crate) fn mismatch(report: &Report, line: usize) -> String {
    let detail = report.line_detail(line);
    match report.shape {
        Shape::Ordered => format!(
            "{}{}\nFirst error at line {line}:\n{detail}",
            report.session_description(),
            report.expected_and_actual()
        ),
        Shape::None | Shape::Single | Shape::Leading => {
            format!("{}\n{detail}", report.session_description())
        }
    }
}

pub(crate) fn illegal_exit(report: &Report, code: i32, policy: ExitPolicy) -> String {
    format!(
        "{}\n\nbut the program terminated with exit code {code}, which the '{policy}' exit policy does not permit.\n\nYour output was:\n\n{}",
        report.session_intro(),
        transcript(&report.actual)
    )
}

pub(crate) fn harness_failure(report: &Report, error: &HarnessError) -> String {
    format!(
        "{}\n\nbut the session could not be completed: {error}\n\nYour output was:\n\n{}",
        report.session_intro(),
        transcript(&report.actual)
    )
}
