//! Diagnosing matchers — decide and explain in a single traversal
//!
//! Some matchers can only say *why* an item failed by redoing the work that
//! decided *whether* it failed (structural comparisons that report the first
//! differing element, for example). A [`DiagnosingMatcher`] does both at
//! once; the [`Diagnosing`] adapter derives `matches` and
//! `describe_mismatch` from it.
//!
//! `matches` and `describe_mismatch` each re-run the full evaluation. That is
//! the accepted cost; `explain` is the one-pass entry point.

use crate::{Description, Matcher, SelfDescribing, Value};
use std::fmt::Debug;

/// A matcher that computes its verdict and its explanation together.
///
/// `evaluate` returns the verdict and writes the mismatch into `mismatch`.
/// What it writes when the verdict is `true` is unspecified and ignored.
///
/// # Example
///
/// ```
/// use vouch::prelude::*;
///
/// /// Every element of a list is strictly greater than the previous one.
/// #[derive(Debug)]
/// struct Ascending;
///
/// impl SelfDescribing for Ascending {
///     fn describe_to(&self, description: &mut Description) {
///         description.append_text("an ascending list");
///     }
/// }
///
/// impl DiagnosingMatcher for Ascending {
///     fn evaluate(&self, item: &Value, mismatch: &mut Description) -> bool {
///         let Some(items) = item.as_list() else {
///             mismatch.append_text("was not a list");
///             return false;
///         };
///         for (i, pair) in items.windows(2).enumerate() {
///             if pair[0].natural_cmp(&pair[1]) != Some(std::cmp::Ordering::Less) {
///                 mismatch.append_text("item ").append_value(&(i + 1))
///                     .append_text(" was ").append_value(&pair[1]);
///                 return false;
///             }
///         }
///         true
///     }
/// }
///
/// let matcher = Diagnosing::new(Ascending);
/// assert!(matcher.matches(&Value::from(vec![1, 2, 3])));
///
/// let mut mismatch = Description::new();
/// matcher.describe_mismatch(&Value::from(vec![1, 3, 2]), &mut mismatch);
/// assert_eq!(mismatch.as_str(), "item <2> was <2>");
/// ```
pub trait DiagnosingMatcher: SelfDescribing + Send + Sync + Debug {
    /// Decide whether `item` matches, explaining into `mismatch`.
    fn evaluate(&self, item: &Value, mismatch: &mut Description) -> bool;
}

/// Adapts a [`DiagnosingMatcher`] into a [`Matcher`].
#[derive(Debug, Clone)]
pub struct Diagnosing<M>(M);

impl<M: DiagnosingMatcher> Diagnosing<M> {
    /// Wrap a diagnosing matcher.
    pub fn new(matcher: M) -> Self {
        Self(matcher)
    }

    /// The wrapped matcher.
    pub fn inner(&self) -> &M {
        &self.0
    }
}

impl<M: DiagnosingMatcher> SelfDescribing for Diagnosing<M> {
    fn describe_to(&self, description: &mut Description) {
        self.0.describe_to(description);
    }
}

impl<M: DiagnosingMatcher> Matcher for Diagnosing<M> {
    fn matches(&self, item: &Value) -> bool {
        self.0.evaluate(item, &mut Description::discard())
    }

    fn describe_mismatch(&self, item: &Value, mismatch: &mut Description) {
        let written = mismatch.as_str().len();
        let matched = self.0.evaluate(item, mismatch);
        // a matching item may leave nothing behind; the contract wants text
        if matched && mismatch.as_str().len() == written {
            mismatch.append_text("was ").append_value(item);
        }
    }

    fn explain(&self, item: &Value, mismatch: &mut Description) -> bool {
        let mut scratch = mismatch.fork();
        let matched = self.0.evaluate(item, &mut scratch);
        if !matched {
            mismatch.append_description(&scratch);
        }
        matched
    }
}
