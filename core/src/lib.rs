//! vouch - composable, self-describing matchers
//!
//! A matcher is a predicate that can explain itself: what it expects, and why
//! a given item failed it. Matchers compose (`not`, `all_of`, `any_of`,
//! feature extraction) and the explanation narrows to the part that failed.
//!
//! # Architecture
//!
//! The type system uses erasure at the data level:
//!
//! - [`Value`] — Erased item (primitives + extensible `Custom` variant)
//! - [`Description`] — Append-only text sink, with a discarding mode
//! - [`Matcher`] — Non-generic predicate over `&Value`, shareable across threads
//! - [`TypeSafeMatcher`] / [`TypeSafeDiagnosingMatcher`] — Narrow the item first
//! - [`DiagnosingMatcher`] — Decide and explain in one pass
//! - [`IsNot`] / [`AllOf`] / [`AnyOf`] — Boolean composition
//! - [`Applying`] — Match a value derived from the item
//! - [`OrderingComparison`] — `greater_than` and friends
//!
//! # Key Design Insights
//!
//! 1. **Type mismatch is a non-match**: every matcher accepts every `Value`,
//!    `Null` included. Wrong kinds return `false`, never an error.
//!
//! 2. **Mismatch text is never empty**: `describe_mismatch` always writes
//!    something, whether or not the item matched.
//!
//! 3. **`explain` is one pass**: it returns the verdict and writes the
//!    mismatch only on failure, so compound matchers never evaluate twice.
//!
//! # Example
//!
//! ```
//! use vouch::prelude::*;
//!
//! let in_range = all_of![greater_than(0), less_than(5)];
//!
//! assert_that!(2, in_range);
//!
//! let err = check_that(7, &in_range).unwrap_err();
//! assert_eq!(err.expected, "(a value greater than <0> and a value less than <5>)");
//! assert_eq!(err.actual, "<7> was greater than <5>");
//! ```
//!
//! # Features
//!
//! - `serde` — [`MatchTrace`] serializes
//! - `config` — [`MatcherConfig`] loads matcher trees from JSON/YAML

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod applying;
mod assert;
mod collection;
mod description;
mod diagnosing;
mod equality;
mod logical;
mod matcher;
mod number;
mod ordering;
mod text;
mod trace;
mod type_safe;
mod value;

#[cfg(feature = "config")]
mod config;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Core types
pub use description::{write_display_literal, Description, Literal, SelfDescribing};
pub use matcher::{BoxedMatcher, Matcher, MatcherExt};
pub use value::{CustomValue, Narrow, Value};

// Base layers
pub use diagnosing::{Diagnosing, DiagnosingMatcher};
pub use type_safe::{TypeSafe, TypeSafeDiagnosing, TypeSafeDiagnosingMatcher, TypeSafeMatcher};

// Combinators
pub use applying::{applying, feature, Applying};
pub use logical::{all_of, any_of, not, AllOf, AnyOf, IsNot};

// Ordering
pub use ordering::{
    compares_equal_to, greater_than, greater_than_or_equal_to, less_than, less_than_or_equal_to,
    Comparator, OrderingComparison,
};

// Leaf matchers
pub use collection::{empty, every_item, has_item, has_size, has_size_matching, EveryItem, HasItem};
pub use equality::{
    anything, anything_described, described_as, equal_to, instance_of, is, not_null_value,
    null_value, DescribedAs, Is, IsAnything, IsEqual, IsInstanceOf, IsNull,
};
pub use number::{close_to, IsCloseTo};
pub use text::{
    contains_string, ends_with, equal_to_ignoring_case, matches_regex, starts_with,
    IsEqualIgnoringCase, MatchesPattern, Position, SubstringMatcher,
};

// Assertions
pub use assert::{assert_that, check_that, check_that_with_reason, AssertionError};

// Trace types
pub use trace::MatchTrace;

// Config (feature-gated)
#[cfg(feature = "config")]
pub use config::{to_value, MatcherConfig};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use vouch::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Combinators
        all_of,
        any_of,
        anything,
        applying,
        // Assertions
        assert_that,
        check_that,
        check_that_with_reason,
        close_to,
        compares_equal_to,
        contains_string,
        described_as,
        empty,
        ends_with,
        // Leaf matchers
        equal_to,
        equal_to_ignoring_case,
        every_item,
        feature,
        // Ordering
        greater_than,
        greater_than_or_equal_to,
        has_item,
        has_size,
        instance_of,
        is,
        less_than,
        less_than_or_equal_to,
        matches_regex,
        not,
        not_null_value,
        null_value,
        starts_with,
        AllOf,
        AnyOf,
        AssertionError,
        BoxedMatcher,
        Comparator,
        // Traits
        CustomValue,
        // Core types
        Description,
        Diagnosing,
        DiagnosingMatcher,
        // Trace types
        MatchTrace,
        Matcher,
        // Errors
        MatcherError,
        MatcherExt,
        Narrow,
        SelfDescribing,
        TypeSafe,
        TypeSafeDiagnosing,
        TypeSafeDiagnosingMatcher,
        TypeSafeMatcher,
        Value,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum allowed depth for nested matchers built from config.
///
/// This limit protects against stack overflow from deeply nested trees.
/// Checked by [`MatcherConfig::build`](crate::MatcherConfig::build).
pub const MAX_DEPTH: usize = 32;

/// Maximum number of children in a single `all_of` or `any_of` built from config.
///
/// Width-based protection: a config with millions of children at depth 1
/// bypasses [`MAX_DEPTH`] but still causes excessive resource consumption.
pub const MAX_MATCHERS_PER_COMPOUND: usize = 256;

/// Maximum length for literal string patterns (contains, starts/ends with).
pub const MAX_PATTERN_LENGTH: usize = 8192;

/// Maximum length for regex patterns.
///
/// Regex compilation is expensive even with the linear-time Rust `regex` crate.
/// Shorter limit than [`MAX_PATTERN_LENGTH`] because regex complexity scales
/// faster than literal matching.
pub const MAX_REGEX_PATTERN_LENGTH: usize = 4096;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from matcher construction and validation.
///
/// Raised when a matcher is built, never while it evaluates: a wrong-typed
/// item is a non-match, not an error. Fix the arguments or configuration
/// and construct again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatcherError {
    /// Matcher nesting exceeds [`MAX_DEPTH`].
    #[error("matcher nesting depth is {depth}, but maximum allowed is {max}")]
    DepthExceeded {
        /// Actual depth of the matcher tree.
        depth: usize,
        /// Maximum allowed depth.
        max: usize,
    },

    /// Too many children in a single `all_of` or `any_of`.
    #[error("compound matcher has {count} children, but maximum allowed is {max}")]
    TooManyMatchers {
        /// Actual count of children.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },

    /// A pattern exceeds the maximum allowed length.
    #[error("pattern length is {len}, but maximum allowed is {max}")]
    PatternTooLong {
        /// Actual length of the pattern.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },

    /// A regex pattern doesn't compile.
    #[error("invalid pattern \"{pattern}\": {reason}")]
    InvalidPattern {
        /// The pattern that failed to compile.
        pattern: String,
        /// The underlying error message.
        reason: String,
    },

    /// A constructor argument is out of range.
    #[error("invalid {name}: {reason}")]
    InvalidArgument {
        /// Name of the offending argument.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// Configuration deserialization or construction failed.
    #[error("invalid config: {reason}")]
    InvalidConfig {
        /// The underlying error message.
        reason: String,
    },
}
