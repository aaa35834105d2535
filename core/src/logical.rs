//! Logical combinators — `not`, `all_of`, `any_of`
//!
//! Combinators own their children and evaluate them with short-circuit
//! semantics. Their mismatch descriptions narrow to the child that actually
//! decided the outcome, so a failure deep inside a composition still reads as
//! one specific sentence instead of a dump of the whole tree.
//!
//! | Combinator | Matches when | Describes as | Mismatch |
//! |------------|--------------|--------------|----------|
//! | [`IsNot`] | inner fails | `not X` | `was <item>`, or the inner mismatch |
//! | [`AllOf`] | every child matches | `(A and B)` | first failing child's mismatch |
//! | [`AnyOf`] | some child matches | `(A or B)` | every child's mismatch, joined by ` and ` |

use crate::{BoxedMatcher, Description, MatchTrace, Matcher, SelfDescribing, Value};

/// Negation: matches when the inner matcher does not.
#[derive(Debug)]
pub struct IsNot {
    inner: BoxedMatcher,
}

impl IsNot {
    /// Negate `inner`.
    pub fn new(inner: impl Matcher + 'static) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }

    /// The negated matcher.
    #[must_use]
    pub fn inner(&self) -> &dyn Matcher {
        &*self.inner
    }
}

impl SelfDescribing for IsNot {
    fn describe_to(&self, description: &mut Description) {
        description
            .append_text("not ")
            .append_description_of(&*self.inner);
    }
}

impl Matcher for IsNot {
    fn matches(&self, item: &Value) -> bool {
        !self.inner.matches(item)
    }

    fn describe_mismatch(&self, item: &Value, mismatch: &mut Description) {
        // One inner evaluation: its verdict and its reason come from the same pass.
        let mut reason = mismatch.fork();
        if self.inner.explain(item, &mut reason) {
            mismatch.append_text("was ").append_value(item);
        } else {
            mismatch.append_description(&reason);
        }
    }

    fn explain(&self, item: &Value, mismatch: &mut Description) -> bool {
        let mut reason = mismatch.fork();
        if self.inner.explain(item, &mut reason) {
            mismatch.append_text("was ").append_value(item);
            return false;
        }
        true
    }

    fn trace(&self, item: &Value) -> MatchTrace {
        let inner = self.inner.trace(item);
        MatchTrace::Not {
            matched: !inner.matched(),
            expected: Description::of(self),
            inner: Box::new(inner),
        }
    }
}

/// Conjunction: matches when every child matches.
///
/// Children are evaluated in the order given and evaluation stops at the
/// first failure. With no children, everything matches.
#[derive(Debug, Default)]
pub struct AllOf {
    matchers: Vec<BoxedMatcher>,
}

impl AllOf {
    /// Combine `matchers`, preserving their order.
    #[must_use]
    pub fn new(matchers: Vec<BoxedMatcher>) -> Self {
        Self { matchers }
    }

    /// Append one more required matcher.
    #[must_use]
    pub fn and(mut self, matcher: impl Matcher + 'static) -> Self {
        self.matchers.push(Box::new(matcher));
        self
    }

    /// The children, in evaluation order.
    #[must_use]
    pub fn matchers(&self) -> &[BoxedMatcher] {
        &self.matchers
    }

    /// Number of children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    /// Returns `true` if there are no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

impl SelfDescribing for AllOf {
    fn describe_to(&self, description: &mut Description) {
        description.append_list("(", " and ", ")", &self.matchers);
    }
}

impl Matcher for AllOf {
    fn matches(&self, item: &Value) -> bool {
        self.matchers.iter().all(|m| m.matches(item))
    }

    fn describe_mismatch(&self, item: &Value, mismatch: &mut Description) {
        if self.explain(item, mismatch) {
            mismatch.append_text("was ").append_value(item);
        }
    }

    fn explain(&self, item: &Value, mismatch: &mut Description) -> bool {
        for matcher in &self.matchers {
            if !matcher.explain(item, mismatch) {
                return false;
            }
        }
        true
    }

    fn trace(&self, item: &Value) -> MatchTrace {
        let children: Vec<MatchTrace> = self.matchers.iter().map(|m| m.trace(item)).collect();
        MatchTrace::AllOf {
            matched: children.iter().all(MatchTrace::matched),
            expected: Description::of(self),
            children,
        }
    }
}

/// Disjunction: matches when at least one child matches.
///
/// Children are evaluated in the order given and evaluation stops at the
/// first success. With no children, nothing matches.
#[derive(Debug, Default)]
pub struct AnyOf {
    matchers: Vec<BoxedMatcher>,
}

impl AnyOf {
    /// Combine `matchers`, preserving their order.
    #[must_use]
    pub fn new(matchers: Vec<BoxedMatcher>) -> Self {
        Self { matchers }
    }

    /// Append one more alternative.
    #[must_use]
    pub fn or(mut self, matcher: impl Matcher + 'static) -> Self {
        self.matchers.push(Box::new(matcher));
        self
    }

    /// The children, in evaluation order.
    #[must_use]
    pub fn matchers(&self) -> &[BoxedMatcher] {
        &self.matchers
    }

    /// Number of children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    /// Returns `true` if there are no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

impl SelfDescribing for AnyOf {
    fn describe_to(&self, description: &mut Description) {
        description.append_list("(", " or ", ")", &self.matchers);
    }
}

impl Matcher for AnyOf {
    fn matches(&self, item: &Value) -> bool {
        self.matchers.iter().any(|m| m.matches(item))
    }

    fn describe_mismatch(&self, item: &Value, mismatch: &mut Description) {
        if self.explain(item, mismatch) {
            mismatch.append_text("was ").append_value(item);
        }
    }

    fn explain(&self, item: &Value, mismatch: &mut Description) -> bool {
        if self.matchers.is_empty() {
            mismatch.append_text("was ").append_value(item);
            return false;
        }
        // Collect every child's explanation; only keep them if none matched.
        let mut reasons = mismatch.fork();
        for (i, matcher) in self.matchers.iter().enumerate() {
            if i > 0 {
                reasons.append_text(" and ");
            }
            if matcher.explain(item, &mut reasons) {
                return true;
            }
        }
        mismatch.append_description(&reasons);
        false
    }

    fn trace(&self, item: &Value) -> MatchTrace {
        let children: Vec<MatchTrace> = self.matchers.iter().map(|m| m.trace(item)).collect();
        MatchTrace::AnyOf {
            matched: children.iter().any(MatchTrace::matched),
            expected: Description::of(self),
            children,
        }
    }
}

/// Creates a matcher that inverts `matcher`.
///
/// ```
/// use vouch::prelude::*;
///
/// let matcher = not(equal_to("x"));
/// assert!(matcher.matches(&Value::from("y")));
/// assert_eq!(Description::of(&matcher), r#"not "x""#);
/// ```
pub fn not(matcher: impl Matcher + 'static) -> IsNot {
    IsNot::new(matcher)
}

/// Creates a matcher that requires every one of `matchers`.
///
/// Prefer the [`all_of!`](crate::all_of!) macro, which boxes for you.
pub fn all_of(matchers: impl IntoIterator<Item = BoxedMatcher>) -> AllOf {
    AllOf::new(matchers.into_iter().collect())
}

/// Creates a matcher that requires at least one of `matchers`.
///
/// Prefer the [`any_of!`](crate::any_of!) macro, which boxes for you.
pub fn any_of(matchers: impl IntoIterator<Item = BoxedMatcher>) -> AnyOf {
    AnyOf::new(matchers.into_iter().collect())
}

/// Build an [`AllOf`] from matchers of different concrete types.
///
/// ```
/// use vouch::prelude::*;
///
/// let matcher = all_of![greater_than(5), less_than(10)];
/// assert_eq!(
///     Description::of(&matcher),
///     "(a value greater than <5> and a value less than <10>)"
/// );
/// ```
#[macro_export]
macro_rules! all_of {
    ($($matcher:expr),* $(,)?) => {
        $crate::AllOf::new(::std::vec![$(::std::boxed::Box::new($matcher) as $crate::BoxedMatcher),*])
    };
}

/// Build an [`AnyOf`] from matchers of different concrete types.
///
/// ```
/// use vouch::prelude::*;
///
/// let matcher = any_of![equal_to("a"), equal_to("b")];
/// assert!(matcher.matches(&Value::from("b")));
/// ```
#[macro_export]
macro_rules! any_of {
    ($($matcher:expr),* $(,)?) => {
        $crate::AnyOf::new(::std::vec![$(::std::boxed::Box::new($matcher) as $crate::BoxedMatcher),*])
    };
}
