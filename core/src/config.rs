//! Declarative matcher trees.
//!
//! [`MatcherConfig`] mirrors the factory functions but is serde-deserializable,
//! so a matcher tree can live in JSON or YAML next to the data it checks.
//!
//! ```json
//! { "type": "all_of", "matchers": [
//!     { "type": "greater_than", "value": 0 },
//!     { "type": "less_than", "value": 5 }
//! ] }
//! ```
//!
//! [`MatcherConfig::build`] validates before constructing anything:
//!
//! | Limit | Error |
//! |-------|-------|
//! | nesting ≤ [`MAX_DEPTH`] | [`MatcherError::DepthExceeded`] |
//! | children per `all_of`/`any_of` ≤ [`MAX_MATCHERS_PER_COMPOUND`] | [`MatcherError::TooManyMatchers`] |
//! | literal patterns ≤ [`MAX_PATTERN_LENGTH`](crate::MAX_PATTERN_LENGTH) | [`MatcherError::PatternTooLong`] |
//! | regex patterns ≤ [`MAX_REGEX_PATTERN_LENGTH`](crate::MAX_REGEX_PATTERN_LENGTH) | [`MatcherError::PatternTooLong`] |

use crate::text::check_pattern_length;
use crate::{
    anything, anything_described, close_to, compares_equal_to, contains_string, described_as,
    empty, ends_with, equal_to, equal_to_ignoring_case, every_item, greater_than,
    greater_than_or_equal_to, has_item, has_size, is, less_than, less_than_or_equal_to,
    matches_regex, not, not_null_value, null_value, starts_with, AllOf, AnyOf, BoxedMatcher,
    MatcherError, MatcherExt, Value, MAX_DEPTH, MAX_MATCHERS_PER_COMPOUND,
};
use serde::Deserialize;

/// Configuration for a matcher tree.
///
/// Uses `#[serde(tag = "type")]` with snake_case factory names.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatcherConfig {
    /// [`equal_to`]
    EqualTo {
        /// Expected value.
        value: serde_json::Value,
    },
    /// [`anything`], or [`anything_described`] when a description is given.
    Anything {
        /// Replacement for `ANYTHING`.
        #[serde(default)]
        description: Option<String>,
    },
    /// [`null_value`]
    NullValue,
    /// [`not_null_value`]
    NotNullValue,
    /// [`greater_than`]
    GreaterThan {
        /// Reference value.
        value: serde_json::Value,
    },
    /// [`greater_than_or_equal_to`]
    GreaterThanOrEqualTo {
        /// Reference value.
        value: serde_json::Value,
    },
    /// [`compares_equal_to`]
    ComparesEqualTo {
        /// Reference value.
        value: serde_json::Value,
    },
    /// [`less_than_or_equal_to`]
    LessThanOrEqualTo {
        /// Reference value.
        value: serde_json::Value,
    },
    /// [`less_than`]
    LessThan {
        /// Reference value.
        value: serde_json::Value,
    },
    /// [`not`]
    Not {
        /// Matcher to invert.
        matcher: Box<MatcherConfig>,
    },
    /// [`all_of`](crate::all_of())
    AllOf {
        /// Children, in evaluation order.
        matchers: Vec<MatcherConfig>,
    },
    /// [`any_of`](crate::any_of())
    AnyOf {
        /// Children, in evaluation order.
        matchers: Vec<MatcherConfig>,
    },
    /// [`is`]
    Is {
        /// Decorated matcher.
        matcher: Box<MatcherConfig>,
    },
    /// [`described_as`]
    DescribedAs {
        /// Description template; `%0`, `%1`, ... refer to `values`.
        description: String,
        /// Decorated matcher.
        matcher: Box<MatcherConfig>,
        /// Values substituted into the template.
        #[serde(default)]
        values: Vec<serde_json::Value>,
    },
    /// [`contains_string`]
    ContainsString {
        /// Substring.
        value: String,
        /// Compare case-insensitively.
        #[serde(default)]
        ignore_case: bool,
    },
    /// [`starts_with`]
    StartsWith {
        /// Prefix.
        value: String,
        /// Compare case-insensitively.
        #[serde(default)]
        ignore_case: bool,
    },
    /// [`ends_with`]
    EndsWith {
        /// Suffix.
        value: String,
        /// Compare case-insensitively.
        #[serde(default)]
        ignore_case: bool,
    },
    /// [`equal_to_ignoring_case`]
    EqualToIgnoringCase {
        /// Expected string.
        value: String,
    },
    /// [`matches_regex`]
    MatchesRegex {
        /// Pattern that must match the whole string.
        pattern: String,
    },
    /// [`close_to`]
    CloseTo {
        /// Centre of the accepted range.
        operand: f64,
        /// Accepted distance from `operand`.
        delta: f64,
    },
    /// [`has_item`]
    HasItem {
        /// Element matcher.
        matcher: Box<MatcherConfig>,
    },
    /// [`every_item`]
    EveryItem {
        /// Element matcher.
        matcher: Box<MatcherConfig>,
    },
    /// [`has_size`]
    HasSize {
        /// Expected length.
        size: usize,
    },
    /// [`empty`]
    Empty,
}

impl MatcherConfig {
    /// Parse a config from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`MatcherError::InvalidConfig`] if the JSON doesn't describe a
    /// matcher tree.
    pub fn from_json(json: &str) -> Result<Self, MatcherError> {
        serde_json::from_str(json).map_err(|e| MatcherError::InvalidConfig {
            reason: e.to_string(),
        })
    }

    /// Nesting depth of this tree. A leaf has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::AllOf { matchers } | Self::AnyOf { matchers } => {
                1 + matchers.iter().map(Self::depth).max().unwrap_or(0)
            }
            Self::Not { matcher }
            | Self::Is { matcher }
            | Self::DescribedAs { matcher, .. }
            | Self::HasItem { matcher }
            | Self::EveryItem { matcher } => 1 + matcher.depth(),
            _ => 1,
        }
    }

    /// Validate and construct the matcher tree.
    ///
    /// # Errors
    ///
    /// - [`MatcherError::DepthExceeded`] — nesting exceeds [`MAX_DEPTH`]
    /// - [`MatcherError::TooManyMatchers`] — a compound exceeds [`MAX_MATCHERS_PER_COMPOUND`]
    /// - [`MatcherError::PatternTooLong`] — a string or regex pattern is too long
    /// - [`MatcherError::InvalidPattern`] — a regex doesn't compile
    /// - [`MatcherError::InvalidArgument`] — e.g. a negative `close_to` delta
    /// - [`MatcherError::InvalidConfig`] — a value can't be represented (JSON objects)
    pub fn build(&self) -> Result<BoxedMatcher, MatcherError> {
        let depth = self.depth();
        if depth > MAX_DEPTH {
            return Err(MatcherError::DepthExceeded {
                depth,
                max: MAX_DEPTH,
            });
        }
        let matcher = self.build_node()?;
        tracing::debug!(depth, "built matcher from config");
        Ok(matcher)
    }

    fn build_node(&self) -> Result<BoxedMatcher, MatcherError> {
        let matcher = match self {
            Self::EqualTo { value } => equal_to(to_value(value)?).boxed(),
            Self::Anything { description: None } => anything().boxed(),
            Self::Anything {
                description: Some(description),
            } => anything_described(description.as_str()).boxed(),
            Self::NullValue => null_value().boxed(),
            Self::NotNullValue => not_null_value().boxed(),
            Self::GreaterThan { value } => greater_than(to_value(value)?).boxed(),
            Self::GreaterThanOrEqualTo { value } => {
                greater_than_or_equal_to(to_value(value)?).boxed()
            }
            Self::ComparesEqualTo { value } => compares_equal_to(to_value(value)?).boxed(),
            Self::LessThanOrEqualTo { value } => less_than_or_equal_to(to_value(value)?).boxed(),
            Self::LessThan { value } => less_than(to_value(value)?).boxed(),
            Self::Not { matcher } => not(matcher.build_node()?).boxed(),
            Self::AllOf { matchers } => AllOf::new(build_children(matchers)?).boxed(),
            Self::AnyOf { matchers } => AnyOf::new(build_children(matchers)?).boxed(),
            Self::Is { matcher } => is(matcher.build_node()?).boxed(),
            Self::DescribedAs {
                description,
                matcher,
                values,
            } => {
                let values = values.iter().map(to_value).collect::<Result<Vec<_>, _>>()?;
                described_as(description.as_str(), matcher.build_node()?)
                    .with_values(values)
                    .boxed()
            }
            Self::ContainsString { value, ignore_case } => {
                check_pattern_length(value)?;
                let m = contains_string(value.as_str());
                let m = if *ignore_case { m.ignoring_case() } else { m };
                m.boxed()
            }
            Self::StartsWith { value, ignore_case } => {
                check_pattern_length(value)?;
                let m = starts_with(value.as_str());
                let m = if *ignore_case { m.ignoring_case() } else { m };
                m.boxed()
            }
            Self::EndsWith { value, ignore_case } => {
                check_pattern_length(value)?;
                let m = ends_with(value.as_str());
                let m = if *ignore_case { m.ignoring_case() } else { m };
                m.boxed()
            }
            Self::EqualToIgnoringCase { value } => {
                check_pattern_length(value)?;
                equal_to_ignoring_case(value.as_str()).boxed()
            }
            Self::MatchesRegex { pattern } => matches_regex(pattern)?.boxed(),
            Self::CloseTo { operand, delta } => close_to(*operand, *delta)?.boxed(),
            Self::HasItem { matcher } => has_item(matcher.build_node()?).boxed(),
            Self::EveryItem { matcher } => every_item(matcher.build_node()?).boxed(),
            Self::HasSize { size } => has_size(*size).boxed(),
            Self::Empty => empty().boxed(),
        };
        Ok(matcher)
    }
}

fn build_children(configs: &[MatcherConfig]) -> Result<Vec<BoxedMatcher>, MatcherError> {
    if configs.len() > MAX_MATCHERS_PER_COMPOUND {
        return Err(MatcherError::TooManyMatchers {
            count: configs.len(),
            max: MAX_MATCHERS_PER_COMPOUND,
        });
    }
    configs.iter().map(MatcherConfig::build_node).collect()
}

/// Convert a JSON value into a [`Value`].
///
/// Integers that fit in `i64` become `Int`; other numbers become `Float`.
///
/// # Errors
///
/// Returns [`MatcherError::InvalidConfig`] for JSON objects, which have no
/// `Value` counterpart.
pub fn to_value(json: &serde_json::Value) -> Result<Value, MatcherError> {
    Ok(match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => n.as_f64().map_or(Value::Null, Value::Float),
        },
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => {
            Value::List(items.iter().map(to_value).collect::<Result<_, _>>()?)
        }
        serde_json::Value::Object(_) => {
            return Err(MatcherError::InvalidConfig {
                reason: format!("objects can't be used as values: {json}"),
            })
        }
    })
}
