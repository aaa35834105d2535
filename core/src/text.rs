//! String matchers
//!
//! All of these are [`TypeSafeMatcher`]s over `str`: `Null` and non-string
//! items never match and are reported as `was null` / `was a <type> (...)`.

use crate::{
    Description, MatcherError, SelfDescribing, TypeSafe, TypeSafeMatcher, MAX_PATTERN_LENGTH,
    MAX_REGEX_PATTERN_LENGTH,
};
use regex::Regex;

/// Where the substring has to occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Anywhere in the string.
    Anywhere,
    /// At the start.
    Start,
    /// At the end.
    End,
}

impl Position {
    fn relation(self) -> &'static str {
        match self {
            Self::Anywhere => "containing",
            Self::Start => "starting with",
            Self::End => "ending with",
        }
    }
}

/// Substring test: contains, starts with or ends with.
#[derive(Debug, Clone)]
pub struct SubstringMatcher {
    substring: String,
    position: Position,
    ignore_case: bool,
}

impl SubstringMatcher {
    fn found_in(&self, item: &str) -> bool {
        if self.ignore_case {
            let item = item.to_lowercase();
            let substring = self.substring.to_lowercase();
            self.position_matches(&item, &substring)
        } else {
            self.position_matches(item, &self.substring)
        }
    }

    fn position_matches(&self, item: &str, substring: &str) -> bool {
        match self.position {
            Position::Anywhere => item.contains(substring),
            Position::Start => item.starts_with(substring),
            Position::End => item.ends_with(substring),
        }
    }
}

impl SelfDescribing for SubstringMatcher {
    fn describe_to(&self, description: &mut Description) {
        description
            .append_text("a string ")
            .append_text(self.position.relation())
            .append_text(" ")
            .append_value(&self.substring);
        if self.ignore_case {
            description.append_text(" ignoring case");
        }
    }
}

impl TypeSafeMatcher for SubstringMatcher {
    type Item = str;

    fn matches_safely(&self, item: &str) -> bool {
        self.found_in(item)
    }
}

impl TypeSafe<SubstringMatcher> {
    /// Compare case-insensitively.
    #[must_use]
    pub fn ignoring_case(self) -> Self {
        TypeSafe::new(SubstringMatcher {
            ignore_case: true,
            ..self.into_inner()
        })
    }
}

fn substring(substring: impl Into<String>, position: Position) -> TypeSafe<SubstringMatcher> {
    TypeSafe::new(SubstringMatcher {
        substring: substring.into(),
        position,
        ignore_case: false,
    })
}

/// Creates a matcher for strings containing `substring`.
///
/// ```
/// use vouch::prelude::*;
///
/// let matcher = contains_string("ell");
/// assert!(matcher.matches(&Value::from("hello")));
/// assert_eq!(Description::of(&matcher), r#"a string containing "ell""#);
/// ```
pub fn contains_string(substring: impl Into<String>) -> TypeSafe<SubstringMatcher> {
    self::substring(substring, Position::Anywhere)
}

/// Creates a matcher for strings starting with `prefix`.
pub fn starts_with(prefix: impl Into<String>) -> TypeSafe<SubstringMatcher> {
    substring(prefix, Position::Start)
}

/// Creates a matcher for strings ending with `suffix`.
pub fn ends_with(suffix: impl Into<String>) -> TypeSafe<SubstringMatcher> {
    substring(suffix, Position::End)
}

/// Case-insensitive string equality.
#[derive(Debug, Clone)]
pub struct IsEqualIgnoringCase {
    expected: String,
}

impl SelfDescribing for IsEqualIgnoringCase {
    fn describe_to(&self, description: &mut Description) {
        description
            .append_value(&self.expected)
            .append_text(" ignoring case");
    }
}

impl TypeSafeMatcher for IsEqualIgnoringCase {
    type Item = str;

    fn matches_safely(&self, item: &str) -> bool {
        item.to_lowercase() == self.expected.to_lowercase()
    }
}

/// Creates a matcher for strings equal to `expected`, ignoring case.
pub fn equal_to_ignoring_case(expected: impl Into<String>) -> TypeSafe<IsEqualIgnoringCase> {
    TypeSafe::new(IsEqualIgnoringCase {
        expected: expected.into(),
    })
}

/// Whole-string regular expression match.
///
/// Uses the `regex` crate, so matching is linear in the input.
#[derive(Debug, Clone)]
pub struct MatchesPattern {
    pattern: String,
    regex: Regex,
}

impl MatchesPattern {
    /// The pattern as written.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl SelfDescribing for MatchesPattern {
    fn describe_to(&self, description: &mut Description) {
        description
            .append_text("a string matching the pattern ")
            .append_value(&self.pattern);
    }
}

impl TypeSafeMatcher for MatchesPattern {
    type Item = str;

    fn matches_safely(&self, item: &str) -> bool {
        self.regex.is_match(item)
    }
}

/// Creates a matcher for strings that match `pattern` in full.
///
/// # Errors
///
/// Returns [`MatcherError::PatternTooLong`] if the pattern exceeds
/// [`MAX_REGEX_PATTERN_LENGTH`], and [`MatcherError::InvalidPattern`] if it
/// doesn't compile.
///
/// ```
/// use vouch::prelude::*;
///
/// let matcher = matches_regex(r"user-\d+").unwrap();
/// assert!(matcher.matches(&Value::from("user-42")));
/// assert!(!matcher.matches(&Value::from("user-42!")));
/// assert!(matches_regex("(unclosed").is_err());
/// ```
pub fn matches_regex(pattern: &str) -> Result<TypeSafe<MatchesPattern>, MatcherError> {
    if pattern.len() > MAX_REGEX_PATTERN_LENGTH {
        return Err(MatcherError::PatternTooLong {
            len: pattern.len(),
            max: MAX_REGEX_PATTERN_LENGTH,
        });
    }
    let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|e| {
        MatcherError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        }
    })?;
    Ok(TypeSafe::new(MatchesPattern {
        pattern: pattern.to_string(),
        regex,
    }))
}

/// Checks a literal pattern against [`MAX_PATTERN_LENGTH`].
///
/// # Errors
///
/// Returns [`MatcherError::PatternTooLong`] for over-long patterns.
pub(crate) fn check_pattern_length(pattern: &str) -> Result<(), MatcherError> {
    if pattern.len() > MAX_PATTERN_LENGTH {
        return Err(MatcherError::PatternTooLong {
            len: pattern.len(),
            max: MAX_PATTERN_LENGTH,
        });
    }
    Ok(())
}
