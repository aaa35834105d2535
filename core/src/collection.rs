//! List matchers
//!
//! [`has_item`] and [`every_item`] walk the list once and explain the
//! failure from the same walk ([`TypeSafeDiagnosingMatcher`]). [`has_size`]
//! and [`empty`] are feature matchers over the list length.

use crate::{
    described_as, equal_to, feature, Applying, BoxedMatcher, DescribedAs, Description, Matcher,
    SelfDescribing, TypeSafeDiagnosing, TypeSafeDiagnosingMatcher, Value,
};

/// Matches lists with at least one element matching the inner matcher.
#[derive(Debug)]
pub struct HasItem {
    element: BoxedMatcher,
}

impl SelfDescribing for HasItem {
    fn describe_to(&self, description: &mut Description) {
        description
            .append_text("a collection containing ")
            .append_description_of(&self.element);
    }
}

impl TypeSafeDiagnosingMatcher for HasItem {
    type Item = [Value];

    fn evaluate_safely(&self, items: &[Value], mismatch: &mut Description) -> bool {
        if items.is_empty() {
            mismatch.append_text("was empty");
            return false;
        }
        let mut reasons = mismatch.fork();
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                reasons.append_text(", ");
            }
            if self.element.explain(item, &mut reasons) {
                return true;
            }
        }
        mismatch
            .append_text("mismatches were: [")
            .append_description(&reasons)
            .append_text("]");
        false
    }
}

/// Creates a matcher for lists containing an element that matches `element`.
///
/// ```
/// use vouch::prelude::*;
///
/// let matcher = has_item(greater_than(2));
/// assert!(matcher.matches(&Value::from(vec![1, 3])));
///
/// let mut mismatch = Description::new();
/// matcher.describe_mismatch(&Value::from(vec![1, 2]), &mut mismatch);
/// assert_eq!(
///     mismatch.as_str(),
///     "mismatches were: [<1> was less than <2>, <2> was equal to <2>]"
/// );
/// ```
pub fn has_item(element: impl Matcher + 'static) -> TypeSafeDiagnosing<HasItem> {
    TypeSafeDiagnosing::new(HasItem {
        element: Box::new(element),
    })
}

/// Matches lists whose elements all match the inner matcher.
#[derive(Debug)]
pub struct EveryItem {
    element: BoxedMatcher,
}

impl SelfDescribing for EveryItem {
    fn describe_to(&self, description: &mut Description) {
        description
            .append_text("every item is ")
            .append_description_of(&self.element);
    }
}

impl TypeSafeDiagnosingMatcher for EveryItem {
    type Item = [Value];

    fn evaluate_safely(&self, items: &[Value], mismatch: &mut Description) -> bool {
        for item in items {
            let mut reason = mismatch.fork();
            if !self.element.explain(item, &mut reason) {
                mismatch
                    .append_text("an item ")
                    .append_description(&reason);
                return false;
            }
        }
        true
    }
}

/// Creates a matcher for lists whose every element matches `element`.
///
/// An empty list matches.
pub fn every_item(element: impl Matcher + 'static) -> TypeSafeDiagnosing<EveryItem> {
    TypeSafeDiagnosing::new(EveryItem {
        element: Box::new(element),
    })
}

/// Creates a matcher for lists of exactly `size` elements.
///
/// ```
/// use vouch::prelude::*;
///
/// let matcher = has_size(2);
/// assert_eq!(Description::of(&matcher), "a collection with size <2>");
///
/// let mut mismatch = Description::new();
/// matcher.explain(&Value::from(vec![1]), &mut mismatch);
/// assert_eq!(mismatch.as_str(), "collection size was <1>");
/// ```
#[must_use]
pub fn has_size(size: usize) -> Applying {
    has_size_matching(equal_to(size))
}

/// Creates a matcher for lists whose length matches `size`.
pub fn has_size_matching(size: impl Matcher + 'static) -> Applying {
    feature(
        "a collection with size",
        "collection size",
        |items: &[Value]| items.len(),
        size,
    )
}

/// Creates a matcher for empty lists.
#[must_use]
pub fn empty() -> DescribedAs {
    described_as("an empty collection", has_size(0))
}
