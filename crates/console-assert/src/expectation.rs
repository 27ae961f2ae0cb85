//! Expectations on the output of one console session.
//!
//! An [`Expectation`] declares the shape the captured output must have:
//! no lines, exactly one line, an ordered list of lines, or a leading line
//! followed by anything. [`Expectation::check`] compares captured output
//! against it without any side effects.

use std::fmt;

use crate::matcher::Matcher;

/// Prefix that error messages of a console program start with.
pub const ERROR_PREFIX: &str = "Error,";

/// The declared shape of a session's output.
#[derive(Debug, Clone)]
pub enum Expectation {
    /// The session must not produce any output.
    None,

    /// The session must produce exactly one line, accepted by the matcher.
    Single(Matcher),

    /// The session must produce exactly one line per matcher, in order.
    Ordered(Vec<Matcher>),

    /// The session must produce at least one line, and the first line must
    /// be accepted by the matcher. Later lines are not inspected.
    Leading(Matcher),
}

impl Expectation {
    /// Expect no output at all.
    #[must_use]
    pub const fn none() -> Self {
        Self::None
    }

    /// Expect exactly one line equal to `text`.
    #[must_use]
    pub fn single_exact(text: impl Into<String>) -> Self {
        Self::Single(Matcher::exact(text))
    }

    /// Expect exactly one line accepted by `matcher`.
    #[must_use]
    pub fn single_matching(matcher: impl Into<Matcher>) -> Self {
        Self::Single(matcher.into())
    }

    /// Expect exactly these lines, in order.
    #[must_use]
    pub fn ordered_exact<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Ordered(texts.into_iter().map(Matcher::exact).collect())
    }

    /// Expect one line per matcher, in order.
    #[must_use]
    pub fn ordered_matching<I, M>(matchers: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Matcher>,
    {
        Self::Ordered(matchers.into_iter().map(Into::into).collect())
    }

    /// Expect output whose first line is accepted by `matcher`.
    #[must_use]
    pub fn leading(matcher: impl Into<Matcher>) -> Self {
        Self::Leading(matcher.into())
    }

    /// Expect an error message: the first line starts with [`ERROR_PREFIX`].
    #[must_use]
    pub fn error() -> Self {
        Self::Leading(Matcher::starts_with(ERROR_PREFIX))
    }

    /// Get the shape of this expectation.
    #[must_use]
    pub const fn shape(&self) -> Shape {
        match self {
            Self::None => Shape::None,
            Self::Single(_) => Shape::Single,
            Self::Ordered(_) => Shape::Ordered,
            Self::Leading(_) => Shape::Leading,
        }
    }

    /// Get the matchers of this expectation, in order.
    #[must_use]
    pub fn matchers(&self) -> &[Matcher] {
        match self {
            Self::None => &[],
            Self::Single(m) | Self::Leading(m) => std::slice::from_ref(m),
            Self::Ordered(ms) => ms,
        }
    }

    /// Describe every matcher, one entry per expected line.
    #[must_use]
    pub fn descriptions(&self) -> Vec<String> {
        self.matchers().iter().map(Matcher::describe).collect()
    }

    /// Compare captured output against this expectation.
    ///
    /// Ordered expectations check the line count before any line content,
    /// and stop at the first line that fails its matcher.
    pub fn check<S: AsRef<str>>(&self, actual: &[S]) -> Result<(), Discrepancy> {
        match self {
            Self::None => {
                if actual.is_empty() {
                    Ok(())
                } else {
                    Err(Discrepancy::UnexpectedOutput {
                        count: actual.len(),
                    })
                }
            }
            Self::Single(matcher) => match actual {
                [] => Err(Discrepancy::NoOutput),
                [line] => check_line(matcher, line.as_ref(), 1),
                _ => Err(Discrepancy::TooMuchOutput {
                    count: actual.len(),
                }),
            },
            Self::Ordered(matchers) => {
                if actual.len() != matchers.len() {
                    return Err(Discrepancy::LineCount {
                        expected: matchers.len(),
                        actual: actual.len(),
                    });
                }
                matchers
                    .iter()
                    .zip(actual)
                    .enumerate()
                    .try_for_each(|(index, (matcher, line))| {
                        check_line(matcher, line.as_ref(), index + 1)
                    })
            }
            Self::Leading(matcher) => match actual.first() {
                None => Err(Discrepancy::NoOutput),
                Some(line) => check_line(matcher, line.as_ref(), 1),
            },
        }
    }
}

fn check_line(matcher: &Matcher, line: &str, number: usize) -> Result<(), Discrepancy> {
    if matcher.matches(line) {
        Ok(())
    } else {
        Err(Discrepancy::Mismatch { line: number })
    }
}

/// The shape of an expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// No output.
    None,
    /// Exactly one line.
    Single,
    /// An ordered list of lines.
    Ordered,
    /// A leading line.
    Leading,
}

impl Shape {
    /// Get the shape name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Single => "single",
            Self::Ordered => "ordered",
            Self::Leading => "leading",
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How captured output deviates from an expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discrepancy {
    /// Output was expected but none was produced.
    NoOutput,

    /// Exactly one line was expected but more were produced.
    TooMuchOutput {
        /// Number of lines produced.
        count: usize,
    },

    /// No output was expected but some was produced.
    UnexpectedOutput {
        /// Number of lines produced.
        count: usize,
    },

    /// The number of lines differs from the number of matchers.
    LineCount {
        /// Number of lines expected.
        expected: usize,
        /// Number of lines produced.
        actual: usize,
    },

    /// A line was not accepted by its matcher.
    Mismatch {
        /// The 1-based number of the first failing line.
        line: usize,
    },
}

/// Whether the output had too few or too many lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountDirection {
    /// Fewer lines than expected.
    TooFew,
    /// More lines than expected.
    TooMany,
}

impl CountDirection {
    /// Determine the direction from expected and actual counts.
    ///
    /// Equal counts are reported as `TooMany`; callers only ask when the
    /// counts differ.
    #[must_use]
    pub const fn of(expected: usize, actual: usize) -> Self {
        if actual < expected {
            Self::TooFew
        } else {
            Self::TooMany
        }
    }

    /// Phrase used in reports.
    #[must_use]
    pub const fn phrase(self) -> &'static str {
        match self {
            Self::TooFew => "not enough",
            Self::TooMany => "too many",
        }
    }
}

/// Build an ordered [`Expectation`] from strings and matchers.
///
/// Strings become exact matchers; anything else must convert into a
/// [`Matcher`].
///
/// # Example
///
/// ```
/// use console_assert::{lines, Matcher};
///
/// let expected = lines![
///     "Hintertupfingen:3",
///     Matcher::starts_with("Error,"),
///     "Hintertupfingen:3",
/// ];
/// assert_eq!(expected.matchers().len(), 3);
/// ```
#[macro_export]
macro_rules! lines {
    () => {
        $crate::Expectation::Ordered(::std::vec::Vec::new())
    };
    ($($line:expr),+ $(,)?) => {
        $crate::Expectation::Ordered(::std::vec![$($crate::Matcher::from($line)),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn out(lines: &[&str]) -> Vec<String> {
        lines.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn none_accepts_only_empty_output() {
        assert_eq!(Expectation::none().check::<String>(&[]), Ok(()));
        assert_eq!(
            Expectation::none().check(&out(&["x", "y"])),
            Err(Discrepancy::UnexpectedOutput { count: 2 })
        );
    }

    #[test]
    fn single_distinguishes_missing_extra_and_wrong() {
        let exp = Expectation::single_exact("OK");
        assert_eq!(exp.check::<String>(&[]), Err(Discrepancy::NoOutput));
        assert_eq!(
            exp.check(&out(&["OK", "OK"])),
            Err(Discrepancy::TooMuchOutput { count: 2 })
        );
        assert_eq!(
            exp.check(&out(&["Ok"])),
            Err(Discrepancy::Mismatch { line: 1 })
        );
        assert_eq!(exp.check(&out(&["OK"])), Ok(()));
    }

    #[test]
    fn ordered_checks_count_before_content() {
        let exp = Expectation::ordered_exact(["a", "WRONG"]);
        assert_eq!(
            exp.check(&out(&["x", "y", "z"])),
            Err(Discrepancy::LineCount {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn ordered_reports_first_failing_line() {
        let exp = Expectation::ordered_exact(["a", "WRONG", "also wrong"]);
        assert_eq!(
            exp.check(&out(&["a", "b", "c"])),
            Err(Discrepancy::Mismatch { line: 2 })
        );
    }

    #[test]
    fn leading_ignores_later_lines() {
        let exp = Expectation::error();
        assert_eq!(exp.check(&out(&["Error, nope", "anything"])), Ok(()));
        assert_eq!(exp.check::<String>(&[]), Err(Discrepancy::NoOutput));
        assert_eq!(
            exp.check(&out(&["OK", "Error, late"])),
            Err(Discrepancy::Mismatch { line: 1 })
        );
    }

    #[test]
    fn lines_macro_mixes_strings_and_matchers() {
        let exp = lines!["a", Matcher::starts_with("b"), String::from("c")];
        assert_eq!(exp.shape(), Shape::Ordered);
        assert_eq!(
            exp.descriptions(),
            vec![
                "\"a\"".to_string(),
                "a string starting with \"b\"".to_string(),
                "\"c\"".to_string()
            ]
        );
        assert_eq!(exp.check(&out(&["a", "bee", "c"])), Ok(()));
    }

    #[test]
    fn empty_ordered_behaves_like_count_check() {
        let exp = lines![];
        assert_eq!(exp.check::<String>(&[]), Ok(()));
        assert_eq!(
            exp.check(&out(&["x"])),
            Err(Discrepancy::LineCount {
                expected: 0,
                actual: 1
            })
        );
    }

    #[test]
    fn count_direction() {
        assert_eq!(CountDirection::of(3, 1), CountDirection::TooFew);
        assert_eq!(CountDirection::of(1, 3), CountDirection::TooMany);
        assert_eq!(CountDirection::TooFew.phrase(), "not enough");
    }
}
