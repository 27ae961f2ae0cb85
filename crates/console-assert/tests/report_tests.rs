//! Integration tests for failure report text.

use console_assert::prelude::*;
use console_assert::{Report, Shape};

fn printing(lines: &'static [&'static str]) -> Verifier<InProcessHarness<impl Program>> {
    Verifier::new(InProcessHarness::new(move || {
        move |_: &[String], console: &mut Console| -> Result<(), Exit> {
            for line in lines {
                console.print_line(line);
            }
            Ok(())
        }
    }))
}

const INTRO: &str = "We ran a session on your interactive console, running the commands\n\nhelp\nquit\n\nbut got unexpected output:\n";

fn session() -> Session {
    Session::new(["help", "quit"])
}

#[test]
fn no_output_report() {
    let err = printing(&[]).one_line(&session(), "x").unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("{INTRO}\nThe program never produced output!")
    );
}

#[test]
fn too_much_output_report() {
    let err = printing(&["a", "b"]).one_line(&session(), "a").unwrap_err();
    assert_eq!(
        err.to_string(),
        format!(
            "{INTRO}\nThe program produced output more than once! It printed 2 lines, expected was exactly one."
        )
    );
}

#[test]
fn unexpected_output_report_lists_lines() {
    let err = printing(&["a", "b"]).no_output(&session()).unwrap_err();
    assert_eq!(
        err.to_string(),
        format!(
            "{INTRO}\nThe program produced output while it was expected not to output anything!\n\nYour output was:\n\na\nb"
        )
    );
}

#[test]
fn line_count_report() {
    let err = printing(&["x"]).lines(&session(), ["a", "b"]).unwrap_err();
    assert_eq!(
        err.to_string(),
        format!(
            "{INTRO}Your program's output had not enough lines.\nYour output had 1 lines, expected were 2.\nExpected was:\n\n\"a\"\n\"b\"\n\nYour output was:\n\nx"
        )
    );
}

#[test]
fn ordered_mismatch_report() {
    let err = printing(&["a", "c"])
        .lines(&session(), [Matcher::exact("a"), Matcher::starts_with("b")])
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        format!(
            "{INTRO}Expected was:\n\n\"a\"\na string starting with \"b\"\n\nYour output was:\n\na\nc\nFirst error at line 2:\nExpected: a string starting with \"b\"\n     but: was \"c\""
        )
    );
}

#[test]
fn single_mismatch_report() {
    let err = printing(&["Error, unknown command"])
        .one_line(&session(), "error, unknown command")
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        format!(
            "{INTRO}\nExpected: \"error, unknown command\"\n     but: was \"Error, unknown command\""
        )
    );
}

#[test]
fn leading_mismatch_uses_predicate_description() {
    let err = printing(&["OK", "Error, late"])
        .error_line(&session())
        .unwrap_err();
    assert!(
        err.to_string()
            .ends_with("Expected: a string starting with \"Error,\"\n     but: was \"OK\"")
    );
}

#[test]
fn arguments_are_listed() {
    let err = printing(&[])
        .one_line(&session().args(["map.txt", "--strict"]), "x")
        .unwrap_err();
    assert!(err.to_string().starts_with(
        "We ran a session on your interactive console that has been called with the command line arguments [map.txt, --strict], running the commands\n\nhelp\nquit"
    ));
}

#[test]
fn illegal_exit_report() {
    let mut verifier = Verifier::new(InProcessHarness::new(|| {
        |_: &[String], console: &mut Console| -> Result<(), Exit> {
            console.print_line("Error, fatal");
            Err(console.exit(3))
        }
    }));
    let err = verifier.error_line(&session()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "We ran a session on your interactive console, running the commands\n\nhelp\nquit\n\nbut the program terminated with exit code 3, which the 'success' exit policy does not permit.\n\nYour output was:\n\nError, fatal"
    );
}

#[test]
fn report_accessors() {
    let err = printing(&["x"]).lines(&session(), ["a", "b"]).unwrap_err();
    let report: &Report = err.report().unwrap();
    assert_eq!(report.commands(), ["help", "quit"]);
    assert!(report.launch_args().is_empty());
    assert_eq!(report.shape(), Shape::Ordered);
    assert_eq!(report.expected(), ["\"a\"", "\"b\""]);
    assert_eq!(report.actual(), ["x"]);
    assert_eq!(
        report.expected_and_actual(),
        "Expected was:\n\n\"a\"\n\"b\"\n\nYour output was:\n\nx"
    );
}
