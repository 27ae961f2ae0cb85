//! Integration tests for matchers.

use console_assert::{Expectation, Matcher, Predicate};

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn matchers_are_shareable() {
    assert_send_sync::<Matcher>();
    assert_send_sync::<Expectation>();

    let matcher = Matcher::predicate("an even length", |s: &str| s.len() % 2 == 0);
    let handle = std::thread::spawn(move || matcher.matches("ab"));
    assert!(handle.join().unwrap());
}

#[test]
fn exact_is_case_sensitive() {
    let matcher = Matcher::from("Error, unknown command");
    assert!(matcher.is_exact());
    assert!(matcher.matches("Error, unknown command"));
    assert!(!matcher.matches("error, unknown command"));
    assert!(!matcher.matches("Error, unknown command "));
}

#[test]
fn descriptions_read_as_expectations() {
    let cases = [
        (Matcher::exact("a:1"), "\"a:1\""),
        (Matcher::starts_with("Error,"), "a string starting with \"Error,\""),
        (Matcher::ends_with(":3"), "a string ending with \":3\""),
        (Matcher::contains("map"), "a string containing \"map\""),
        (Matcher::glob("*:?"), "a string matching glob \"*:?\""),
        (Matcher::not("OK"), "not \"OK\""),
        (
            Matcher::any_of(["yes", "no"]),
            "\"yes\" or \"no\"",
        ),
    ];
    for (matcher, description) in cases {
        assert_eq!(matcher.describe(), description);
        assert_eq!(matcher.to_string(), description);
    }
}

#[test]
fn regex_searches_unless_anchored() {
    let search = Matcher::regex(r"\d+ moves").unwrap();
    assert!(search.matches("solved in 12 moves!"));
    assert_eq!(search.describe(), r"a string matching /\d+ moves/");

    let anchored = Matcher::regex(r"^\d+ moves$").unwrap();
    assert!(!anchored.matches("solved in 12 moves!"));
    assert!(anchored.matches("12 moves"));
}

#[test]
fn invalid_regex_is_an_error() {
    assert!(Matcher::regex("(unclosed").is_err());
}

#[test]
fn glob_covers_whole_line() {
    let matcher = Matcher::glob("Hinter*:?");
    assert!(matcher.matches("Hintertupfingen:3"));
    assert!(!matcher.matches("Hintertupfingen:33"));
    assert!(!matcher.matches("xHintertupfingen:3"));
}

#[test]
fn predicate_keeps_its_description() {
    let predicate = Predicate::new("a coordinate", |s: &str| s.contains(','));
    assert_eq!(predicate.description(), "a coordinate");
    assert!(predicate.test("3,4"));

    let matcher = Matcher::from(predicate);
    assert_eq!(matcher.describe(), "a coordinate");
    assert!(!matcher.matches("34"));
}

#[test]
fn combinators_nest() {
    let matcher = Matcher::any_of([
        Matcher::not(Matcher::contains("Error")),
        Matcher::exact("Error, expected"),
    ]);
    assert!(matcher.matches("fine"));
    assert!(matcher.matches("Error, expected"));
    assert!(!matcher.matches("Error, surprise"));

    let nothing = Matcher::any_of(Vec::<Matcher>::new());
    assert!(!nothing.matches(""));
}
