//! Assertion entry points
//!
//! A failed assertion renders the conventional report:
//!
//! ```text
//! <reason>
//! Expected: <expectation>
//!      got: <mismatch>
//! ```
//!
//! The reason line is omitted when empty.

use crate::{Description, Matcher, Value};

/// A failed assertion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}Expected: {expected}\n     got: {actual}", reason_line(.reason))]
pub struct AssertionError {
    /// Caller-supplied context, possibly empty.
    pub reason: String,
    /// The matcher's description.
    pub expected: String,
    /// The mismatch description for the actual value.
    pub actual: String,
}

fn reason_line(reason: &str) -> String {
    if reason.is_empty() {
        String::new()
    } else {
        format!("{reason}\n")
    }
}

/// Check `actual` against `matcher`.
///
/// # Errors
///
/// Returns an [`AssertionError`] describing the expectation and the
/// mismatch when `actual` doesn't match.
///
/// ```
/// use vouch::prelude::*;
///
/// assert!(check_that(2, &all_of![greater_than(0), less_than(5)]).is_ok());
///
/// let err = check_that(2, &all_of![greater_than(5), less_than(10)]).unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "Expected: (a value greater than <5> and a value less than <10>)\n     got: <2> was less than <5>"
/// );
/// ```
pub fn check_that(actual: impl Into<Value>, matcher: &dyn Matcher) -> Result<(), AssertionError> {
    check_that_with_reason("", actual, matcher)
}

/// Like [`check_that`], with a reason line heading the report.
///
/// # Errors
///
/// Returns an [`AssertionError`] when `actual` doesn't match.
pub fn check_that_with_reason(
    reason: &str,
    actual: impl Into<Value>,
    matcher: &dyn Matcher,
) -> Result<(), AssertionError> {
    let actual = actual.into();
    let mut mismatch = Description::new();
    if matcher.explain(&actual, &mut mismatch) {
        return Ok(());
    }
    let error = AssertionError {
        reason: reason.to_string(),
        expected: Description::of(matcher),
        actual: mismatch.into_string(),
    };
    tracing::debug!(
        reason = %error.reason,
        expected = %error.expected,
        actual = %error.actual,
        "assertion failed"
    );
    Err(error)
}

/// Assert that `actual` matches `matcher`.
///
/// # Panics
///
/// Panics with the assertion report when `actual` doesn't match.
#[track_caller]
pub fn assert_that(actual: impl Into<Value>, matcher: &dyn Matcher) {
    if let Err(error) = check_that(actual, matcher) {
        panic!("{error}");
    }
}

/// Assert that a value matches a matcher, with an optional reason.
///
/// ```
/// use vouch::prelude::*;
///
/// assert_that!(2, all_of![greater_than(0), less_than(5)]);
/// assert_that!("ready", "status should be ready", starts_with("rea"));
/// ```
///
/// ```should_panic
/// use vouch::prelude::*;
///
/// assert_that!(7, less_than(5));
/// ```
#[macro_export]
macro_rules! assert_that {
    ($actual:expr, $matcher:expr $(,)?) => {
        if let ::core::result::Result::Err(error) = $crate::check_that($actual, &$matcher) {
            ::core::panic!("{}", error);
        }
    };
    ($actual:expr, $reason:expr, $matcher:expr $(,)?) => {
        if let ::core::result::Result::Err(error) =
            $crate::check_that_with_reason($reason, $actual, &$matcher)
        {
            ::core::panic!("{}", error);
        }
    };
}
