//! vouch-test: Probes and property checks for conformance testing
//!
//! Provides matchers and extraction functions with observable side effects,
//! plus checkers for the contract every [`Matcher`] must honour.
//!
//! # Example
//!
//! ```
//! use vouch_test::prelude::*;
//!
//! // Exploding panics if evaluated; all_of must never reach it
//! let matcher = all_of![equal_to(1), Exploding];
//! assert!(!matcher.matches(&Value::from(2)));
//!
//! // Every matcher survives every probe value
//! check_contract(&greater_than(1)).unwrap();
//! ```

use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use vouch::prelude::*;
use vouch::narrowable;

#[cfg(feature = "fixtures")]
pub mod fixture;

// ═══════════════════════════════════════════════════════════════════════════════
// Probe matchers
// ═══════════════════════════════════════════════════════════════════════════════

/// Panics on evaluation. Proves a combinator never evaluated it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Exploding;

impl SelfDescribing for Exploding {
    fn describe_to(&self, description: &mut Description) {
        description.append_text("<exploding matcher>");
    }
}

impl Matcher for Exploding {
    fn matches(&self, item: &Value) -> bool {
        panic!("exploding matcher evaluated against {item:?}");
    }

    fn describe_mismatch(&self, item: &Value, _mismatch: &mut Description) {
        panic!("exploding matcher asked to describe {item:?}");
    }

    fn explain(&self, item: &Value, _mismatch: &mut Description) -> bool {
        panic!("exploding matcher asked to explain {item:?}");
    }
}

/// Wraps a matcher and counts how often it is evaluated.
///
/// Clones share the count, so a clone can stay with the test while the
/// original moves into a combinator.
#[derive(Debug, Clone)]
pub struct Counting<M> {
    inner: M,
    calls: Arc<AtomicUsize>,
}

impl<M: Matcher> Counting<M> {
    /// Count evaluations of `inner`.
    pub fn new(inner: M) -> Self {
        Self {
            inner,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Evaluations so far (`matches` and `explain` each count once).
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<M: Matcher> SelfDescribing for Counting<M> {
    fn describe_to(&self, description: &mut Description) {
        self.inner.describe_to(description);
    }
}

impl<M: Matcher> Matcher for Counting<M> {
    fn matches(&self, item: &Value) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.matches(item)
    }

    fn describe_mismatch(&self, item: &Value, mismatch: &mut Description) {
        self.inner.describe_mismatch(item, mismatch);
    }

    fn explain(&self, item: &Value, mismatch: &mut Description) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.explain(item, mismatch)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Impure extraction functions
// ═══════════════════════════════════════════════════════════════════════════════

/// An extraction function that returns 1, 2, 3, ... on successive calls,
/// ignoring the item. The returned handle reports how often it ran.
pub fn ticking() -> (Arc<AtomicUsize>, impl Fn(&Value) -> usize + Send + Sync + 'static) {
    let calls = Arc::new(AtomicUsize::new(0));
    let handle = Arc::clone(&calls);
    (handle, move |_: &Value| calls.fetch_add(1, Ordering::SeqCst) + 1)
}

/// An extraction function that drains `values` one per call, then yields
/// `Null`.
pub fn draining(values: Vec<Value>) -> impl Fn(&Value) -> Value + Send + Sync + 'static {
    let queue = Mutex::new(VecDeque::from(values));
    move |_: &Value| {
        queue
            .lock()
            .map_or(Value::Null, |mut queue| queue.pop_front().unwrap_or_default())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Probe values
// ═══════════════════════════════════════════════════════════════════════════════

/// A custom value whose `Display` always fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unprintable;

impl fmt::Display for Unprintable {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Err(fmt::Error)
    }
}

impl CustomValue for Unprintable {
    fn custom_type_name(&self) -> &'static str {
        "unprintable"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

narrowable!(Unprintable);

/// A custom value whose `Display` panics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Panicky;

impl fmt::Display for Panicky {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        panic!("panicky value asked for its natural string form");
    }
}

impl CustomValue for Panicky {
    fn custom_type_name(&self) -> &'static str {
        "panicky"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

narrowable!(Panicky);

/// One value of every kind, plus awkward ones: `NaN`, empty string, empty
/// list, a nested list and custom values that can't be printed.
#[must_use]
pub fn probe_values() -> Vec<Value> {
    vec![
        Value::Null,
        Value::from(true),
        Value::from(0),
        Value::from(-1),
        Value::from(i64::MAX),
        Value::from(1.5),
        Value::from(f64::NAN),
        Value::from('x'),
        Value::from(""),
        Value::from("hello \"world\"\n"),
        Value::from(Vec::<Value>::new()),
        Value::from(vec![Value::from(1), Value::from("a"), Value::Null]),
        Value::from(vec![vec![1, 2], vec![3]]),
        Value::custom(Unprintable),
        Value::custom(Panicky),
    ]
}

// ═══════════════════════════════════════════════════════════════════════════════
// Property checks
// ═══════════════════════════════════════════════════════════════════════════════

/// A contract violation found by a property check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{property} violated by `{matcher}` for {item}: {detail}")]
pub struct PropertyViolation {
    /// Which property failed.
    pub property: &'static str,
    /// Description of the offending matcher.
    pub matcher: String,
    /// Literal form of the offending item.
    pub item: String,
    /// What went wrong.
    pub detail: String,
}

fn violation(property: &'static str, matcher: &dyn Matcher, item: &Value, detail: String) -> PropertyViolation {
    let mut rendered = Description::new();
    rendered.append_value(item);
    PropertyViolation {
        property,
        matcher: Description::of(matcher),
        item: rendered.into_string(),
        detail,
    }
}

/// `describe_mismatch` writes non-empty text for every item, matching or not.
///
/// # Errors
///
/// Returns the first item that left the mismatch empty.
pub fn check_mismatch_non_empty(matcher: &dyn Matcher, items: &[Value]) -> Result<(), PropertyViolation> {
    for item in items {
        let mut mismatch = Description::new();
        matcher.describe_mismatch(item, &mut mismatch);
        if mismatch.is_empty() {
            return Err(violation("mismatch non-emptiness", matcher, item, "no text written".into()));
        }
    }
    Ok(())
}

/// `explain` agrees with `matches`, and writes text exactly when it fails.
///
/// # Errors
///
/// Returns the first item where the two disagree.
pub fn check_explain_consistent(matcher: &dyn Matcher, items: &[Value]) -> Result<(), PropertyViolation> {
    for item in items {
        let mut mismatch = Description::new();
        let explained = matcher.explain(item, &mut mismatch);
        let matched = matcher.matches(item);
        if explained != matched {
            return Err(violation(
                "explain consistency",
                matcher,
                item,
                format!("explain returned {explained}, matches returned {matched}"),
            ));
        }
        if explained != mismatch.is_empty() {
            return Err(violation(
                "explain consistency",
                matcher,
                item,
                format!("explain returned {explained} but wrote {:?}", mismatch.as_str()),
            ));
        }
    }
    Ok(())
}

/// `not(not(m))` gives the same verdict as `m`.
///
/// # Errors
///
/// Returns the first item where the verdicts differ.
pub fn check_double_negation(matcher: Arc<dyn Matcher>, items: &[Value]) -> Result<(), PropertyViolation> {
    let doubled = not(not(Arc::clone(&matcher)));
    for item in items {
        if doubled.matches(item) != matcher.matches(item) {
            return Err(violation("negation involution", matcher.as_ref(), item, "verdicts differ".into()));
        }
    }
    Ok(())
}

/// A trace's root result equals `matches`.
///
/// # Errors
///
/// Returns the first item where they differ.
pub fn check_trace_agrees(matcher: &dyn Matcher, items: &[Value]) -> Result<(), PropertyViolation> {
    for item in items {
        let traced = matcher.trace(item).matched();
        if traced != matcher.matches(item) {
            return Err(violation("trace agreement", matcher, item, format!("trace said {traced}")));
        }
    }
    Ok(())
}

/// Every contract check, against [`probe_values`].
///
/// Panics inside the matcher propagate; the null/unknown-type safety
/// property is that this returns at all.
///
/// # Errors
///
/// Returns the first violation found.
pub fn check_contract(matcher: &dyn Matcher) -> Result<(), PropertyViolation> {
    let items = probe_values();
    check_mismatch_non_empty(matcher, &items)?;
    check_explain_consistent(matcher, &items)?;
    check_trace_agrees(matcher, &items)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{
        check_contract, check_double_negation, check_explain_consistent, check_mismatch_non_empty,
        check_trace_agrees, draining, probe_values, ticking, Counting, Exploding, Panicky,
        PropertyViolation, Unprintable,
    };
    pub use vouch::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counting_shares_count_with_clones() {
        let counter = Counting::new(equal_to(1));
        let handle = counter.clone();
        assert!(counter.matches(&Value::from(1)));
        assert!(!counter.explain(&Value::from(2), &mut Description::discard()));
        assert_eq!(handle.calls(), 2);
    }

    #[test]
    #[should_panic(expected = "exploding matcher evaluated")]
    fn test_exploding_explodes() {
        Exploding.matches(&Value::Null);
    }

    #[test]
    #[should_panic(expected = "exploding matcher asked to explain")]
    fn test_exploding_explodes_when_explained() {
        Exploding.explain(&Value::Null, &mut Description::new());
    }

    #[test]
    fn test_ticking_and_draining() {
        let (calls, tick) = ticking();
        assert_eq!(tick(&Value::Null), 1);
        assert_eq!(tick(&Value::Null), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let drain = draining(vec![Value::from("a")]);
        assert_eq!(drain(&Value::Null), Value::from("a"));
        assert_eq!(drain(&Value::Null), Value::Null);
    }

    #[test]
    fn test_unprintable_renders_placeholder() {
        let mut d = Description::new();
        d.append_value(&Value::custom(Unprintable));
        assert_eq!(d.as_str(), "<unprintable (unprintable)>");

        let mut d = Description::new();
        d.append_value(&Value::custom(Panicky));
        assert_eq!(d.as_str(), "<panicky (unprintable)>");
    }

    #[test]
    fn test_violation_display() {
        let err = check_mismatch_non_empty(&Silent, &[Value::from(1)]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "mismatch non-emptiness violated by `silent` for <1>: no text written"
        );
    }

    /// Breaks the non-emptiness contract on purpose.
    #[derive(Debug)]
    struct Silent;

    impl SelfDescribing for Silent {
        fn describe_to(&self, description: &mut Description) {
            description.append_text("silent");
        }
    }

    impl Matcher for Silent {
        fn matches(&self, _item: &Value) -> bool {
            false
        }

        fn describe_mismatch(&self, _item: &Value, _mismatch: &mut Description) {}
    }
}
