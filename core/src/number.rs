//! Numeric tolerance matcher.

use crate::{Description, MatcherError, SelfDescribing, TypeSafe, TypeSafeMatcher};

/// Matches floats within `delta` of `operand`, inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsCloseTo {
    operand: f64,
    delta: f64,
}

impl IsCloseTo {
    fn excess(&self, item: f64) -> f64 {
        (item - self.operand).abs() - self.delta
    }
}

impl SelfDescribing for IsCloseTo {
    fn describe_to(&self, description: &mut Description) {
        description
            .append_text("a numeric value within ")
            .append_value(&self.delta)
            .append_text(" of ")
            .append_value(&self.operand);
    }
}

impl TypeSafeMatcher for IsCloseTo {
    type Item = f64;

    fn matches_safely(&self, item: &f64) -> bool {
        // NaN compares false, so NaN never matches
        self.excess(*item) <= 0.0
    }

    fn describe_mismatch_safely(&self, item: &f64, mismatch: &mut Description) {
        mismatch
            .append_value(item)
            .append_text(" differed by ")
            .append_value(&self.excess(*item))
            .append_text(" more than delta ")
            .append_value(&self.delta);
    }
}

/// Creates a matcher for floats within `delta` of `operand`.
///
/// # Errors
///
/// Returns [`MatcherError::InvalidArgument`] if `delta` is negative or not
/// finite, or if `operand` is not finite.
///
/// ```
/// use vouch::prelude::*;
///
/// let matcher = close_to(1.0, 0.5).unwrap();
/// assert!(matcher.matches(&Value::from(1.3)));
/// assert!(!matcher.matches(&Value::from(2.0)));
/// assert!(close_to(1.0, -0.1).is_err());
/// ```
pub fn close_to(operand: f64, delta: f64) -> Result<TypeSafe<IsCloseTo>, MatcherError> {
    if !delta.is_finite() || delta < 0.0 {
        return Err(MatcherError::InvalidArgument {
            name: "delta",
            reason: format!("must be a finite, non-negative number, got {delta}"),
        });
    }
    if !operand.is_finite() {
        return Err(MatcherError::InvalidArgument {
            name: "operand",
            reason: format!("must be finite, got {operand}"),
        });
    }
    Ok(TypeSafe::new(IsCloseTo { operand, delta }))
}
