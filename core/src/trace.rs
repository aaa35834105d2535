//! Evaluation traces for debugging matcher compositions.
//!
//! A [`MatchTrace`] mirrors the shape of the matcher it came from but
//! captures results instead of behaviour: what each node expected, whether
//! it matched and, for failed leaves, why not.
//!
//! Compound nodes evaluate ALL children (no short-circuit) so the trace shows
//! every branch. The root `matched()` still equals
//! [`Matcher::matches`](crate::Matcher::matches).
//!
//! # Example
//!
//! ```
//! use vouch::prelude::*;
//!
//! let matcher = all_of![greater_than(5), less_than(10)];
//! let trace = matcher.trace(&Value::from(2));
//! assert!(!trace.matched());
//! assert_eq!(
//!     trace.to_string(),
//!     "\
//! ✗ (a value greater than <5> and a value less than <10>)
//!   ✗ a value greater than <5>: <2> was less than <5>
//!   ✓ a value less than <10>
//! "
//! );
//! ```

use crate::{Description, Matcher, Value};
use std::fmt;

/// Trace of a matcher evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum MatchTrace {
    /// A matcher with no traced children.
    Leaf {
        /// Whether the item matched.
        matched: bool,
        /// The matcher's description.
        expected: String,
        /// Mismatch text, present when `matched` is false.
        mismatch: Option<String>,
    },
    /// Negation.
    Not {
        /// Whether the negation matched (the inner matcher did not).
        matched: bool,
        /// The negation's description.
        expected: String,
        /// Trace of the inner matcher.
        inner: Box<MatchTrace>,
    },
    /// Conjunction.
    AllOf {
        /// Whether every child matched.
        matched: bool,
        /// The conjunction's description.
        expected: String,
        /// Every child, evaluated in order.
        children: Vec<MatchTrace>,
    },
    /// Disjunction.
    AnyOf {
        /// Whether any child matched.
        matched: bool,
        /// The disjunction's description.
        expected: String,
        /// Every child, evaluated in order.
        children: Vec<MatchTrace>,
    },
    /// Feature extraction.
    Feature {
        /// Whether the derived value matched.
        matched: bool,
        /// The feature matcher's description.
        expected: String,
        /// Literal form of the derived value.
        derived: String,
        /// Trace of the matcher applied to the derived value.
        inner: Box<MatchTrace>,
    },
}

impl MatchTrace {
    /// Trace a matcher as a single leaf.
    pub fn leaf<M: Matcher + ?Sized>(matcher: &M, item: &Value) -> Self {
        let mut mismatch = Description::new();
        let matched = matcher.explain(item, &mut mismatch);
        Self::Leaf {
            matched,
            expected: Description::of(matcher),
            mismatch: (!matched).then(|| mismatch.into_string()),
        }
    }

    /// The overall result of this node.
    #[must_use]
    pub fn matched(&self) -> bool {
        match self {
            Self::Leaf { matched, .. }
            | Self::Not { matched, .. }
            | Self::AllOf { matched, .. }
            | Self::AnyOf { matched, .. }
            | Self::Feature { matched, .. } => *matched,
        }
    }

    /// The description of the matcher that produced this node.
    #[must_use]
    pub fn expected(&self) -> &str {
        match self {
            Self::Leaf { expected, .. }
            | Self::Not { expected, .. }
            | Self::AllOf { expected, .. }
            | Self::AnyOf { expected, .. }
            | Self::Feature { expected, .. } => expected,
        }
    }

    /// Replace this node's description (for decorators that rename a matcher).
    pub fn set_expected(&mut self, text: String) {
        match self {
            Self::Leaf { expected, .. }
            | Self::Not { expected, .. }
            | Self::AllOf { expected, .. }
            | Self::AnyOf { expected, .. }
            | Self::Feature { expected, .. } => *expected = text,
        }
    }

    /// Child traces, in evaluation order.
    #[must_use]
    pub fn children(&self) -> &[MatchTrace] {
        match self {
            Self::Leaf { .. } => &[],
            Self::Not { inner, .. } | Self::Feature { inner, .. } => std::slice::from_ref(inner.as_ref()),
            Self::AllOf { children, .. } | Self::AnyOf { children, .. } => children,
        }
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let mark = if self.matched() { '✓' } else { '✗' };
        write!(f, "{:indent$}{mark} {}", "", self.expected(), indent = depth * 2)?;
        match self {
            Self::Leaf {
                mismatch: Some(mismatch),
                ..
            } => write!(f, ": {mismatch}")?,
            Self::Feature { derived, .. } => write!(f, " (derived {derived})")?,
            _ => {}
        }
        writeln!(f)?;
        for child in self.children() {
            child.write_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for MatchTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}
