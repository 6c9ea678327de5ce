//! String matchers for identity fields

use crate::error::{Error, Result};
use regex::Regex;
use std::fmt;

/// Either an exact value or a regular expression
///
/// Regular expressions are unanchored: `matches` succeeds if the pattern is
/// found anywhere in the candidate. Anchor with `^` and `$` when needed.
///
/// # Examples
///
/// ```
/// use sigcheck_verify::StringMatcher;
///
/// let san = StringMatcher::new("", "^https://github.com/org/repo/").unwrap();
/// assert!(san.matches("https://github.com/org/repo/.github/workflows/ci.yml@refs/heads/main"));
/// assert!(!san.matches("https://github.com/org/repository/"));
/// ```
#[derive(Debug, Clone)]
pub enum StringMatcher {
    Literal(String),
    Regex(Regex),
}

impl StringMatcher {
    /// Build from a literal and a regex, exactly one of which must be non-empty
    pub fn new(literal: &str, regex: &str) -> Result<Self> {
        match (literal.is_empty(), regex.is_empty()) {
            (false, true) => Self::literal(literal),
            (true, false) => Self::regex(regex),
            (false, false) => Err(Error::InvalidPolicyConfig(format!(
                "both literal {literal:?} and regex {regex:?} given"
            ))),
            (true, true) => Err(Error::InvalidPolicyConfig(
                "neither literal nor regex given".to_string(),
            )),
        }
    }

    /// Match `value` exactly, which must be non-empty
    pub fn literal(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(Error::InvalidPolicyConfig("empty literal".to_string()));
        }
        Ok(Self::Literal(value))
    }

    /// Match a regular expression anywhere in the candidate
    ///
    /// An empty pattern matches everything and is rejected.
    pub fn regex(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(Error::InvalidPolicyConfig("empty regex".to_string()));
        }
        Regex::new(pattern)
            .map(Self::Regex)
            .map_err(|e| Error::InvalidPolicyConfig(format!("invalid regex {pattern:?}: {e}")))
    }

    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::Literal(value) => value == candidate,
            Self::Regex(re) => re.is_match(candidate),
        }
    }
}

impl fmt::Display for StringMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => write!(f, "{value:?}"),
            Self::Regex(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}
