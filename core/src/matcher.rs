//! `Matcher` — The predicate contract
//!
//! A matcher decides whether an item satisfies it and can explain both what
//! it expects ([`SelfDescribing::describe_to`]) and why a given item failed
//! ([`Matcher::describe_mismatch`]).
//!
//! The trait is intentionally **non-generic**: every matcher receives the
//! erased [`Value`], so a `greater_than(1)` can sit next to a
//! `contains_string("x")` inside the same `any_of`. Matchers that only make
//! sense for one kind of item build on [`TypeSafeMatcher`](crate::TypeSafeMatcher).

use crate::{AllOf, AnyOf, Description, MatchTrace, SelfDescribing, Value};
use std::fmt::Debug;
use std::sync::Arc;

/// A self-describing predicate over [`Value`].
///
/// # Contract
///
/// - `matches` accepts `Null` and every kind of value without panicking; it
///   returns `false` for items it can't meaningfully evaluate.
/// - `describe_mismatch` always writes non-empty text, whether or not the
///   item matches. It reads as the tail of "Expected: X, got: ...", usually
///   in the past tense ("was <3>").
/// - Neither operation mutates the item.
/// - Matchers are immutable after construction and shared freely between
///   threads.
///
/// # Example
///
/// ```
/// use vouch::prelude::*;
///
/// let matcher = all_of![greater_than(0), less_than(5)];
/// assert!(matcher.matches(&Value::from(2)));
/// assert!(!matcher.matches(&Value::from("2")));
/// assert!(!matcher.matches(&Value::Null));
///
/// let mut mismatch = Description::new();
/// matcher.describe_mismatch(&Value::from(7), &mut mismatch);
/// assert_eq!(mismatch.as_str(), "<7> was greater than <5>");
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Matcher`",
    label = "this type cannot match against a Value",
    note = "implement `Matcher` directly, or implement `TypeSafeMatcher` / `DiagnosingMatcher` and wrap it in `TypeSafe` / `Diagnosing`"
)]
pub trait Matcher: SelfDescribing + Send + Sync + Debug {
    /// Check whether `item` satisfies this matcher.
    fn matches(&self, item: &Value) -> bool;

    /// Explain what `item` was, from this matcher's point of view.
    ///
    /// Default: `was <item>`.
    fn describe_mismatch(&self, item: &Value, mismatch: &mut Description) {
        mismatch.append_text("was ").append_value(item);
    }

    /// Evaluate and explain in one pass.
    ///
    /// Returns the verdict. When it is `false`, the mismatch has been written
    /// to `mismatch`; when it is `true`, nothing is written. The result always
    /// equals [`matches`](Self::matches).
    ///
    /// The default runs `matches` and then `describe_mismatch`. Matchers
    /// whose explanation needs the work done by the decision override it so
    /// that work happens once.
    fn explain(&self, item: &Value, mismatch: &mut Description) -> bool {
        if self.matches(item) {
            return true;
        }
        self.describe_mismatch(item, mismatch);
        false
    }

    /// Evaluate with a full trace for debugging.
    ///
    /// Compound matchers evaluate every child, without short-circuiting.
    /// The root `matched()` still equals [`matches`](Self::matches).
    fn trace(&self, item: &Value) -> MatchTrace {
        MatchTrace::leaf(self, item)
    }
}

/// An owned, type-erased matcher.
pub type BoxedMatcher = Box<dyn Matcher>;

// Forwarding impls so borrowed, boxed and shared matchers compose like owned ones.

#[diagnostic::do_not_recommend]
impl<M: Matcher + ?Sized> Matcher for &M {
    fn matches(&self, item: &Value) -> bool {
        (**self).matches(item)
    }

    fn describe_mismatch(&self, item: &Value, mismatch: &mut Description) {
        (**self).describe_mismatch(item, mismatch);
    }

    fn explain(&self, item: &Value, mismatch: &mut Description) -> bool {
        (**self).explain(item, mismatch)
    }

    fn trace(&self, item: &Value) -> MatchTrace {
        (**self).trace(item)
    }
}

#[diagnostic::do_not_recommend]
impl<M: Matcher + ?Sized> Matcher for Box<M> {
    fn matches(&self, item: &Value) -> bool {
        (**self).matches(item)
    }

    fn describe_mismatch(&self, item: &Value, mismatch: &mut Description) {
        (**self).describe_mismatch(item, mismatch);
    }

    fn explain(&self, item: &Value, mismatch: &mut Description) -> bool {
        (**self).explain(item, mismatch)
    }

    fn trace(&self, item: &Value) -> MatchTrace {
        (**self).trace(item)
    }
}

#[diagnostic::do_not_recommend]
impl<M: Matcher + ?Sized> Matcher for Arc<M> {
    fn matches(&self, item: &Value) -> bool {
        (**self).matches(item)
    }

    fn describe_mismatch(&self, item: &Value, mismatch: &mut Description) {
        (**self).describe_mismatch(item, mismatch);
    }

    fn explain(&self, item: &Value, mismatch: &mut Description) -> bool {
        (**self).explain(item, mismatch)
    }

    fn trace(&self, item: &Value) -> MatchTrace {
        (**self).trace(item)
    }
}

/// Fluent composition for any matcher.
///
/// Trees are assembled bottom-up from finished children, and each parent
/// owns its children, so a composition can never contain itself.
///
/// ```
/// use vouch::prelude::*;
///
/// let in_range = greater_than(0).and(less_than(10));
/// assert!(in_range.matches(&Value::from(5)));
///
/// let outside = less_than(0).or(greater_than(10));
/// assert!(!outside.matches(&Value::from(5)));
/// ```
pub trait MatcherExt: Matcher + Sized + 'static {
    /// Erase the concrete type.
    fn boxed(self) -> BoxedMatcher {
        Box::new(self)
    }

    /// Both `self` and `other` must match.
    fn and(self, other: impl Matcher + 'static) -> AllOf {
        AllOf::new(vec![self.boxed(), other.boxed()])
    }

    /// Either `self` or `other` must match.
    fn or(self, other: impl Matcher + 'static) -> AnyOf {
        AnyOf::new(vec![self.boxed(), other.boxed()])
    }
}

impl<M: Matcher + Sized + 'static> MatcherExt for M {}
