//! Line matchers.
//!
//! A [`Matcher`] decides whether a single output line is acceptable and can
//! describe itself for failure reports. Plain strings convert into exact
//! matchers, so most expectations can be written without naming this type.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

/// A matcher for a single line of console output.
#[derive(Clone)]
pub enum Matcher {
    /// The line must equal this text exactly (case-sensitive).
    Exact(String),

    /// The line must start with this text.
    Prefix(String),

    /// The line must end with this text.
    Suffix(String),

    /// The line must contain this text.
    Contains(String),

    /// The line must contain a match of this regular expression.
    Regex(CompiledRegex),

    /// The whole line must match this glob pattern.
    Glob(String),

    /// The line must satisfy caller-supplied logic.
    Predicate(Predicate),

    /// The line must NOT satisfy the inner matcher.
    Not(Box<Matcher>),

    /// The line must satisfy at least one of the matchers.
    AnyOf(Vec<Matcher>),
}

impl Matcher {
    /// Create an exact-match matcher.
    #[must_use]
    pub fn exact(text: impl Into<String>) -> Self {
        Self::Exact(text.into())
    }

    /// Create a prefix matcher.
    #[must_use]
    pub fn starts_with(prefix: impl Into<String>) -> Self {
        Self::Prefix(prefix.into())
    }

    /// Create a suffix matcher.
    #[must_use]
    pub fn ends_with(suffix: impl Into<String>) -> Self {
        Self::Suffix(suffix.into())
    }

    /// Create a substring matcher.
    #[must_use]
    pub fn contains(needle: impl Into<String>) -> Self {
        Self::Contains(needle.into())
    }

    /// Create a regex matcher.
    ///
    /// The expression is searched for anywhere in the line; anchor it with
    /// `^` and `$` to require a full-line match.
    ///
    /// # Errors
    ///
    /// Returns an error if the regex pattern is invalid.
    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        Ok(Self::Regex(CompiledRegex::new(pattern.to_string(), regex)))
    }

    /// Create a glob matcher.
    ///
    /// Supports `*` (any run of characters) and `?` (one character).
    #[must_use]
    pub fn glob(pattern: impl Into<String>) -> Self {
        Self::Glob(pattern.into())
    }

    /// Create a matcher from arbitrary logic and a description of it.
    #[must_use]
    pub fn predicate<F>(description: impl Into<String>, test: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Predicate::new(description, test))
    }

    /// Negate a matcher.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: impl Into<Self>) -> Self {
        Self::Not(Box::new(inner.into()))
    }

    /// Accept a line if any of the matchers accepts it.
    #[must_use]
    pub fn any_of<I, M>(matchers: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Self>,
    {
        Self::AnyOf(matchers.into_iter().map(Into::into).collect())
    }

    /// Check whether `candidate` satisfies this matcher.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::Exact(text) => candidate == text,
            Self::Prefix(text) => candidate.starts_with(text.as_str()),
            Self::Suffix(text) => candidate.ends_with(text.as_str()),
            Self::Contains(text) => candidate.contains(text.as_str()),
            Self::Regex(r) => r.is_match(candidate),
            Self::Glob(pattern) => glob_match(pattern, candidate),
            Self::Predicate(p) => p.test(candidate),
            Self::Not(inner) => !inner.matches(candidate),
            Self::AnyOf(matchers) => matchers.iter().any(|m| m.matches(candidate)),
        }
    }

    /// Describe what this matcher expects, for failure reports.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Exact(text) => format!("{text:?}"),
            Self::Prefix(text) => format!("a string starting with {text:?}"),
            Self::Suffix(text) => format!("a string ending with {text:?}"),
            Self::Contains(text) => format!("a string containing {text:?}"),
            Self::Regex(r) => format!("a string matching /{}/", r.pattern()),
            Self::Glob(pattern) => format!("a string matching glob {pattern:?}"),
            Self::Predicate(p) => p.description().to_string(),
            Self::Not(inner) => format!("not {}", inner.describe()),
            Self::AnyOf(matchers) => {
                if matchers.is_empty() {
                    return "nothing (empty alternative)".to_string();
                }
                matchers
                    .iter()
                    .map(Self::describe)
                    .collect::<Vec<_>>()
                    .join(" or ")
            }
        }
    }

    /// Check if this is an exact-match matcher.
    #[must_use]
    pub const fn is_exact(&self) -> bool {
        matches!(self, Self::Exact(_))
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(s) => write!(f, "Exact({s:?})"),
            Self::Prefix(s) => write!(f, "Prefix({s:?})"),
            Self::Suffix(s) => write!(f, "Suffix({s:?})"),
            Self::Contains(s) => write!(f, "Contains({s:?})"),
            Self::Regex(r) => write!(f, "Regex({:?})", r.pattern()),
            Self::Glob(s) => write!(f, "Glob({s:?})"),
            Self::Predicate(p) => write!(f, "Predicate({:?})", p.description()),
            Self::Not(inner) => write!(f, "Not({inner:?})"),
            Self::AnyOf(matchers) => f.debug_tuple("AnyOf").field(matchers).finish(),
        }
    }
}

impl From<&str> for Matcher {
    fn from(s: &str) -> Self {
        Self::Exact(s.to_string())
    }
}

impl From<String> for Matcher {
    fn from(s: String) -> Self {
        Self::Exact(s)
    }
}

impl From<&String> for Matcher {
    fn from(s: &String) -> Self {
        Self::Exact(s.clone())
    }
}

impl From<Predicate> for Matcher {
    fn from(p: Predicate) -> Self {
        Self::Predicate(p)
    }
}

/// A compiled regular expression with its source pattern.
#[derive(Clone)]
pub struct CompiledRegex {
    pattern: String,
    regex: Regex,
}

impl CompiledRegex {
    /// Create a new compiled regex.
    #[must_use]
    pub const fn new(pattern: String, regex: Regex) -> Self {
        Self { pattern, regex }
    }

    /// Get the source pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Check whether the regex matches anywhere in the text.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

type PredicateFn = dyn Fn(&str) -> bool + Send + Sync;

/// Caller-supplied matching logic with a human-readable description.
#[derive(Clone)]
pub struct Predicate {
    description: String,
    test: Arc<PredicateFn>,
}

impl Predicate {
    /// Create a new predicate.
    pub fn new<F>(description: impl Into<String>, test: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            description: description.into(),
            test: Arc::new(test),
        }
    }

    /// Get the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Apply the predicate.
    #[must_use]
    pub fn test(&self, candidate: &str) -> bool {
        (self.test)(candidate)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Whole-string glob matching.
///
/// Supports `*` (any characters) and `?` (single character).
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let mut p = 0;
    let mut t = 0;
    let mut star_p = None;
    let mut star_t = 0;

    while t < text.len() {
        if p < pattern.len() && pattern[p] == '*' {
            star_p = Some(p);
            star_t = t;
            p += 1;
        } else if p < pattern.len() && (pattern[p] == '?' || pattern[p] == text[t]) {
            p += 1;
            t += 1;
        } else if let Some(sp) = star_p {
            p = sp + 1;
            star_t += 1;
            t = star_t;
        } else {
            return false;
        }
    }

    // Trailing stars match the empty remainder
    while p < pattern.len() && pattern[p] == '*' {
        p += 1;
    }

    p == pattern.len()
}
