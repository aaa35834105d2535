//! Ordering matchers — `greater_than`, `less_than` and friends
//!
//! All five relations are one shape: compare the item against a reference
//! and accept the resulting [`Ordering`] if it lies in `min..=max`.
//!
//! | Factory | `min` | `max` |
//! |---------|-------|-------|
//! | [`greater_than`] | `Greater` | `Greater` |
//! | [`greater_than_or_equal_to`] | `Equal` | `Greater` |
//! | [`compares_equal_to`] | `Equal` | `Equal` |
//! | [`less_than_or_equal_to`] | `Less` | `Equal` |
//! | [`less_than`] | `Less` | `Less` |
//!
//! Comparisons return [`Ordering`], never a magnitude. Items that cannot be
//! compared with the reference (other kinds, `Null`, `NaN`) don't match.

use crate::{Description, Matcher, SelfDescribing, Value};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

type CompareFn = dyn Fn(&Value, &Value) -> Option<Ordering> + Send + Sync;

/// How items are ordered against the reference value.
///
/// [`Comparator::natural`] uses [`Value::natural_cmp`]. A named comparator
/// carries a caller-supplied ordering; its name is appended to descriptions
/// so readers can tell a custom ordering was used.
///
/// ```
/// use std::cmp::Ordering;
/// use vouch::prelude::*;
///
/// let by_len = Comparator::new("string length", |a: &Value, b: &Value| {
///     Some(a.as_str()?.len().cmp(&b.as_str()?.len()))
/// });
/// let matcher = by_len.greater_than("abc");
/// assert!(matcher.matches(&Value::from("abcd")));
/// assert!(!matcher.matches(&Value::from("zz")));
/// assert_eq!(
///     Description::of(&matcher),
///     r#"a value greater than "abc" when compared by <string length>"#
/// );
/// ```
#[derive(Clone)]
pub struct Comparator {
    name: Option<String>,
    compare: Arc<CompareFn>,
}

impl Comparator {
    /// The natural ordering of values.
    #[must_use]
    pub fn natural() -> Self {
        Self {
            name: None,
            compare: Arc::new(Value::natural_cmp),
        }
    }

    /// A named, caller-supplied ordering.
    ///
    /// Returning `None` marks the pair as incomparable.
    pub fn new<F>(name: impl Into<String>, compare: F) -> Self
    where
        F: Fn(&Value, &Value) -> Option<Ordering> + Send + Sync + 'static,
    {
        Self {
            name: Some(name.into()),
            compare: Arc::new(compare),
        }
    }

    /// A named ordering that reports only a sign, C-style.
    ///
    /// Only the sign of the result is consulted: `-7` means less, `0` equal,
    /// `3` greater.
    pub fn from_signum<F>(name: impl Into<String>, compare: F) -> Self
    where
        F: Fn(&Value, &Value) -> Option<i64> + Send + Sync + 'static,
    {
        Self::new(name, move |a, b| compare(a, b).map(|n| n.cmp(&0)))
    }

    /// Name shown in descriptions; `None` for the natural ordering.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Compare `actual` against `reference`.
    #[must_use]
    pub fn compare(&self, actual: &Value, reference: &Value) -> Option<Ordering> {
        (self.compare)(actual, reference)
    }

    /// `actual > reference` under this ordering.
    pub fn greater_than(&self, reference: impl Into<Value>) -> OrderingComparison {
        self.between(reference, Ordering::Greater, Ordering::Greater)
    }

    /// `actual >= reference` under this ordering.
    pub fn greater_than_or_equal_to(&self, reference: impl Into<Value>) -> OrderingComparison {
        self.between(reference, Ordering::Equal, Ordering::Greater)
    }

    /// `actual == reference` under this ordering.
    pub fn compares_equal_to(&self, reference: impl Into<Value>) -> OrderingComparison {
        self.between(reference, Ordering::Equal, Ordering::Equal)
    }

    /// `actual <= reference` under this ordering.
    pub fn less_than_or_equal_to(&self, reference: impl Into<Value>) -> OrderingComparison {
        self.between(reference, Ordering::Less, Ordering::Equal)
    }

    /// `actual < reference` under this ordering.
    pub fn less_than(&self, reference: impl Into<Value>) -> OrderingComparison {
        self.between(reference, Ordering::Less, Ordering::Less)
    }

    fn between(&self, reference: impl Into<Value>, min: Ordering, max: Ordering) -> OrderingComparison {
        OrderingComparison::new(self.clone(), reference.into(), min, max)
    }
}

impl Default for Comparator {
    fn default() -> Self {
        Self::natural()
    }
}

impl fmt::Debug for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => f.debug_tuple("Comparator").field(name).finish(),
            None => f.write_str("Comparator(natural)"),
        }
    }
}

/// Accepts items whose ordering against a reference lies in `min..=max`.
#[derive(Debug, Clone)]
pub struct OrderingComparison {
    comparator: Comparator,
    reference: Value,
    min: Ordering,
    max: Ordering,
}

impl OrderingComparison {
    /// Build from explicit bounds.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`; such a range accepts nothing and is always a
    /// construction mistake.
    #[must_use]
    pub fn new(comparator: Comparator, reference: Value, min: Ordering, max: Ordering) -> Self {
        assert!(
            min <= max,
            "ordering bounds are inverted: min {min:?} is above max {max:?}"
        );
        Self {
            comparator,
            reference,
            min,
            max,
        }
    }

    /// The reference value items are compared against.
    #[must_use]
    pub fn reference(&self) -> &Value {
        &self.reference
    }

    /// The accepted range of orderings.
    #[must_use]
    pub fn bounds(&self) -> (Ordering, Ordering) {
        (self.min, self.max)
    }

    fn describe_comparator(&self, description: &mut Description) {
        if let Some(name) = self.comparator.name() {
            description
                .append_text(" when compared by <")
                .append_text(name)
                .append_text(">");
        }
    }
}

fn relation(ordering: Ordering) -> &'static str {
    match ordering {
        Ordering::Less => "less than",
        Ordering::Equal => "equal to",
        Ordering::Greater => "greater than",
    }
}

impl SelfDescribing for OrderingComparison {
    fn describe_to(&self, description: &mut Description) {
        description.append_text("a value ").append_text(relation(self.min));
        if self.min != self.max {
            description.append_text(" or ").append_text(relation(self.max));
        }
        description.append_text(" ").append_value(&self.reference);
        self.describe_comparator(description);
    }
}

impl Matcher for OrderingComparison {
    fn matches(&self, item: &Value) -> bool {
        self.comparator
            .compare(item, &self.reference)
            .is_some_and(|ordering| self.min <= ordering && ordering <= self.max)
    }

    fn describe_mismatch(&self, item: &Value, mismatch: &mut Description) {
        mismatch.append_value(item);
        match self.comparator.compare(item, &self.reference) {
            Some(ordering) => {
                mismatch
                    .append_text(" was ")
                    .append_text(relation(ordering))
                    .append_text(" ")
                    .append_value(&self.reference);
            }
            None => {
                mismatch
                    .append_text(" could not be compared to ")
                    .append_value(&self.reference);
            }
        }
        self.describe_comparator(mismatch);
    }
}

/// Creates a matcher for values greater than `reference`.
///
/// ```
/// use vouch::prelude::*;
///
/// assert!(greater_than(1).matches(&Value::from(2)));
/// assert!(!greater_than(1).matches(&Value::from(1)));
/// ```
pub fn greater_than(reference: impl Into<Value>) -> OrderingComparison {
    Comparator::natural().greater_than(reference)
}

/// Creates a matcher for values greater than or equal to `reference`.
pub fn greater_than_or_equal_to(reference: impl Into<Value>) -> OrderingComparison {
    Comparator::natural().greater_than_or_equal_to(reference)
}

/// Creates a matcher for values that compare equal to `reference`.
pub fn compares_equal_to(reference: impl Into<Value>) -> OrderingComparison {
    Comparator::natural().compares_equal_to(reference)
}

/// Creates a matcher for values less than or equal to `reference`.
pub fn less_than_or_equal_to(reference: impl Into<Value>) -> OrderingComparison {
    Comparator::natural().less_than_or_equal_to(reference)
}

/// Creates a matcher for values less than `reference`.
pub fn less_than(reference: impl Into<Value>) -> OrderingComparison {
    Comparator::natural().less_than(reference)
}
