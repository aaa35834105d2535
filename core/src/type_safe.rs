//! Type-safe dispatch — narrow the erased item before matching
//!
//! [`TypeSafeMatcher`] and [`TypeSafeDiagnosingMatcher`] let a matcher work
//! on a concrete view of the item (`str`, `i64`, `[Value]`, a custom type)
//! instead of the whole [`Value`]. Their adapters, [`TypeSafe`] and
//! [`TypeSafeDiagnosing`], handle `Null` and wrong-typed items uniformly:
//!
//! - `matches` → `false`, without calling the typed predicate
//! - `describe_mismatch` → `was null` / `was a <type> (<value>)`
//!
//! The item type is the associated `Item` type, fixed at compile time, so
//! there is nothing to infer or fail at construction.

use crate::{Description, Matcher, Narrow, SelfDescribing, Value};
use std::fmt::Debug;

/// A matcher over one narrowed item type.
///
/// # Example
///
/// ```
/// use vouch::prelude::*;
///
/// #[derive(Debug)]
/// struct Shouting;
///
/// impl SelfDescribing for Shouting {
///     fn describe_to(&self, description: &mut Description) {
///         description.append_text("an upper-case string");
///     }
/// }
///
/// impl TypeSafeMatcher for Shouting {
///     type Item = str;
///
///     fn matches_safely(&self, item: &str) -> bool {
///         item.chars().all(|c| !c.is_lowercase())
///     }
/// }
///
/// let matcher = TypeSafe::new(Shouting);
/// assert!(matcher.matches(&Value::from("HEY")));
/// assert!(!matcher.matches(&Value::from(42)));
///
/// let mut mismatch = Description::new();
/// matcher.describe_mismatch(&Value::from(42), &mut mismatch);
/// assert_eq!(mismatch.as_str(), "was a int (<42>)");
/// ```
pub trait TypeSafeMatcher: SelfDescribing + Send + Sync + Debug {
    /// The narrowed item type.
    type Item: Narrow + ?Sized;

    /// Check a correctly-typed, non-null item.
    fn matches_safely(&self, item: &Self::Item) -> bool;

    /// Explain a correctly-typed, non-null item. Default: `was <item>`.
    fn describe_mismatch_safely(&self, item: &Self::Item, mismatch: &mut Description) {
        mismatch.append_text("was ").append_value(item);
    }
}

/// A diagnosing matcher over one narrowed item type.
///
/// See [`DiagnosingMatcher`](crate::DiagnosingMatcher) for the
/// single-pass contract.
pub trait TypeSafeDiagnosingMatcher: SelfDescribing + Send + Sync + Debug {
    /// The narrowed item type.
    type Item: Narrow + ?Sized;

    /// Decide and explain a correctly-typed, non-null item in one pass.
    fn evaluate_safely(&self, item: &Self::Item, mismatch: &mut Description) -> bool;
}

/// Describe an item the typed layer refused: `was null` or
/// `was a <type> (<value>)`.
pub(crate) fn describe_unexpected(item: &Value, mismatch: &mut Description) {
    if item.is_null() {
        mismatch.append_text("was null");
    } else {
        mismatch
            .append_text("was a ")
            .append_text(item.type_name())
            .append_text(" (")
            .append_value(item)
            .append_text(")");
    }
}

/// Narrow `item`, treating `Null` as un-narrowable.
pub(crate) fn narrow<T: Narrow + ?Sized>(item: &Value) -> Option<&T> {
    if item.is_null() {
        None
    } else {
        T::narrow(item)
    }
}

/// Adapts a [`TypeSafeMatcher`] into a [`Matcher`].
#[derive(Debug, Clone)]
pub struct TypeSafe<M>(M);

impl<M: TypeSafeMatcher> TypeSafe<M> {
    /// Wrap a typed matcher.
    pub fn new(matcher: M) -> Self {
        Self(matcher)
    }

    /// The wrapped typed matcher.
    pub fn inner(&self) -> &M {
        &self.0
    }

    /// Unwrap the typed matcher.
    pub fn into_inner(self) -> M {
        self.0
    }
}

impl<M: TypeSafeMatcher> SelfDescribing for TypeSafe<M> {
    fn describe_to(&self, description: &mut Description) {
        self.0.describe_to(description);
    }
}

impl<M: TypeSafeMatcher> Matcher for TypeSafe<M> {
    fn matches(&self, item: &Value) -> bool {
        narrow::<M::Item>(item).is_some_and(|typed| self.0.matches_safely(typed))
    }

    fn describe_mismatch(&self, item: &Value, mismatch: &mut Description) {
        match narrow::<M::Item>(item) {
            Some(typed) => self.0.describe_mismatch_safely(typed, mismatch),
            None => describe_unexpected(item, mismatch),
        }
    }
}

/// Adapts a [`TypeSafeDiagnosingMatcher`] into a [`Matcher`].
#[derive(Debug, Clone)]
pub struct TypeSafeDiagnosing<M>(M);

impl<M: TypeSafeDiagnosingMatcher> TypeSafeDiagnosing<M> {
    /// Wrap a typed diagnosing matcher.
    pub fn new(matcher: M) -> Self {
        Self(matcher)
    }

    /// The wrapped typed matcher.
    pub fn inner(&self) -> &M {
        &self.0
    }
}

impl<M: TypeSafeDiagnosingMatcher> SelfDescribing for TypeSafeDiagnosing<M> {
    fn describe_to(&self, description: &mut Description) {
        self.0.describe_to(description);
    }
}

impl<M: TypeSafeDiagnosingMatcher> Matcher for TypeSafeDiagnosing<M> {
    fn matches(&self, item: &Value) -> bool {
        narrow::<M::Item>(item)
            .is_some_and(|typed| self.0.evaluate_safely(typed, &mut Description::discard()))
    }

    fn describe_mismatch(&self, item: &Value, mismatch: &mut Description) {
        match narrow::<M::Item>(item) {
            Some(typed) => {
                let written = mismatch.as_str().len();
                let matched = self.0.evaluate_safely(typed, mismatch);
                if matched && mismatch.as_str().len() == written {
                    mismatch.append_text("was ").append_value(item);
                }
            }
            None => describe_unexpected(item, mismatch),
        }
    }

    fn explain(&self, item: &Value, mismatch: &mut Description) -> bool {
        match narrow::<M::Item>(item) {
            Some(typed) => {
                let mut scratch = mismatch.fork();
                let matched = self.0.evaluate_safely(typed, &mut scratch);
                if !matched {
                    mismatch.append_description(&scratch);
                }
                matched
            }
            None => {
                describe_unexpected(item, mismatch);
                false
            }
        }
    }
}
