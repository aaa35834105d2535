//! Equality and identity matchers
//!
//! Also the two decorators that only change how a matcher reads: [`is`]
//! and [`described_as`].

use crate::type_safe::narrow;
use crate::{not, BoxedMatcher, Description, IsNot, MatchTrace, Matcher, Narrow, SelfDescribing, Value};
use std::fmt;
use std::marker::PhantomData;

// ═══════════════════════════════════════════════════════════════════════════════
// IsEqual
// ═══════════════════════════════════════════════════════════════════════════════

/// Structural equality with an expected value.
#[derive(Debug, Clone, PartialEq)]
pub struct IsEqual {
    expected: Value,
}

impl IsEqual {
    /// The value items are compared with.
    #[must_use]
    pub fn expected(&self) -> &Value {
        &self.expected
    }
}

impl SelfDescribing for IsEqual {
    fn describe_to(&self, description: &mut Description) {
        description.append_value(&self.expected);
    }
}

impl Matcher for IsEqual {
    fn matches(&self, item: &Value) -> bool {
        *item == self.expected
    }
}

/// Creates a matcher for items equal to `expected`.
///
/// `Int` and `Float` are different kinds: `equal_to(1)` does not match `1.0`.
///
/// ```
/// use vouch::prelude::*;
///
/// assert!(equal_to("a").matches(&Value::from("a")));
/// assert!(!equal_to(1).matches(&Value::from(1.0)));
/// assert_eq!(Description::of(&equal_to("a")), r#""a""#);
/// ```
pub fn equal_to(expected: impl Into<Value>) -> IsEqual {
    IsEqual {
        expected: expected.into(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// IsAnything / IsNull
// ═══════════════════════════════════════════════════════════════════════════════

/// Matches every item, `Null` included.
#[derive(Debug, Clone)]
pub struct IsAnything {
    description: String,
}

impl SelfDescribing for IsAnything {
    fn describe_to(&self, description: &mut Description) {
        description.append_text(&self.description);
    }
}

impl Matcher for IsAnything {
    fn matches(&self, _item: &Value) -> bool {
        true
    }
}

/// Creates a matcher that always matches. Describes itself as `ANYTHING`.
#[must_use]
pub fn anything() -> IsAnything {
    anything_described("ANYTHING")
}

/// Like [`anything`], with a custom description.
pub fn anything_described(description: impl Into<String>) -> IsAnything {
    IsAnything {
        description: description.into(),
    }
}

/// Matches `Null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsNull;

impl SelfDescribing for IsNull {
    fn describe_to(&self, description: &mut Description) {
        description.append_text("null");
    }
}

impl Matcher for IsNull {
    fn matches(&self, item: &Value) -> bool {
        item.is_null()
    }
}

/// Creates a matcher for `Null`.
#[must_use]
pub fn null_value() -> IsNull {
    IsNull
}

/// Creates a matcher for anything but `Null`. Describes itself as
/// `not null`.
#[must_use]
pub fn not_null_value() -> IsNot {
    not(IsNull)
}

// ═══════════════════════════════════════════════════════════════════════════════
// IsInstanceOf
// ═══════════════════════════════════════════════════════════════════════════════

/// Matches items that narrow to `T`.
pub struct IsInstanceOf<T: ?Sized> {
    _type: PhantomData<fn(&T)>,
}

impl<T: ?Sized> fmt::Debug for IsInstanceOf<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IsInstanceOf")
            .field(&std::any::type_name::<T>())
            .finish()
    }
}

impl<T: Narrow + ?Sized> SelfDescribing for IsInstanceOf<T> {
    fn describe_to(&self, description: &mut Description) {
        description
            .append_text("an instance of ")
            .append_text(std::any::type_name::<T>());
    }
}

impl<T: Narrow + ?Sized> Matcher for IsInstanceOf<T> {
    fn matches(&self, item: &Value) -> bool {
        narrow::<T>(item).is_some()
    }

    fn describe_mismatch(&self, item: &Value, mismatch: &mut Description) {
        if item.is_null() {
            mismatch.append_text("null");
        } else {
            mismatch
                .append_value(item)
                .append_text(" is a ")
                .append_text(item.type_name());
        }
    }
}

/// Creates a matcher for items of type `T`.
///
/// The type is given explicitly; nothing is inferred at runtime.
///
/// ```
/// use vouch::prelude::*;
///
/// let matcher = instance_of::<str>();
/// assert!(matcher.matches(&Value::from("s")));
///
/// let mut mismatch = Description::new();
/// matcher.describe_mismatch(&Value::from(4), &mut mismatch);
/// assert_eq!(mismatch.as_str(), "<4> is a int");
/// ```
#[must_use]
pub fn instance_of<T: Narrow + ?Sized>() -> IsInstanceOf<T> {
    IsInstanceOf { _type: PhantomData }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Is
// ═══════════════════════════════════════════════════════════════════════════════

/// Decorator that reads "is ..." and otherwise behaves like its inner matcher.
#[derive(Debug)]
pub struct Is {
    inner: BoxedMatcher,
}

impl SelfDescribing for Is {
    fn describe_to(&self, description: &mut Description) {
        description
            .append_text("is ")
            .append_description_of(&self.inner);
    }
}

impl Matcher for Is {
    fn matches(&self, item: &Value) -> bool {
        self.inner.matches(item)
    }

    fn describe_mismatch(&self, item: &Value, mismatch: &mut Description) {
        self.inner.describe_mismatch(item, mismatch);
    }

    fn explain(&self, item: &Value, mismatch: &mut Description) -> bool {
        self.inner.explain(item, mismatch)
    }
}

/// Wraps `matcher` so the expectation reads "is ...".
///
/// ```
/// use vouch::prelude::*;
///
/// assert_eq!(Description::of(&is(equal_to(3))), "is <3>");
/// ```
pub fn is(matcher: impl Matcher + 'static) -> Is {
    Is {
        inner: Box::new(matcher),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// DescribedAs
// ═══════════════════════════════════════════════════════════════════════════════

/// Replaces a matcher's description with a custom one.
///
/// `%0`, `%1`, ... in the template are replaced by the literal form of the
/// corresponding value. Unknown indices are left as written.
#[derive(Debug)]
pub struct DescribedAs {
    template: String,
    values: Vec<Value>,
    inner: BoxedMatcher,
}

impl DescribedAs {
    /// Values substituted for `%0`, `%1`, ...
    #[must_use]
    pub fn with_values(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.values = values.into_iter().collect();
        self
    }
}

impl SelfDescribing for DescribedAs {
    fn describe_to(&self, description: &mut Description) {
        let mut rest = self.template.as_str();
        while let Some(pos) = rest.find('%') {
            let digits = rest[pos + 1..]
                .bytes()
                .take_while(u8::is_ascii_digit)
                .count();
            let value = rest[pos + 1..pos + 1 + digits]
                .parse::<usize>()
                .ok()
                .and_then(|index| self.values.get(index));
            match value {
                Some(value) => {
                    description.append_text(&rest[..pos]).append_value(value);
                    rest = &rest[pos + 1 + digits..];
                }
                None => {
                    description.append_text(&rest[..=pos]);
                    rest = &rest[pos + 1..];
                }
            }
        }
        description.append_text(rest);
    }
}

impl Matcher for DescribedAs {
    fn matches(&self, item: &Value) -> bool {
        self.inner.matches(item)
    }

    fn describe_mismatch(&self, item: &Value, mismatch: &mut Description) {
        self.inner.describe_mismatch(item, mismatch);
    }

    fn explain(&self, item: &Value, mismatch: &mut Description) -> bool {
        self.inner.explain(item, mismatch)
    }

    fn trace(&self, item: &Value) -> MatchTrace {
        let mut trace = self.inner.trace(item);
        trace.set_expected(Description::of(self));
        trace
    }
}

/// Wraps `matcher`, describing it with `template` instead.
///
/// ```
/// use vouch::prelude::*;
///
/// let adult = described_as("an adult age over %0", greater_than_or_equal_to(18))
///     .with_values([Value::from(18)]);
/// assert_eq!(Description::of(&adult), "an adult age over <18>");
/// ```
pub fn described_as(template: impl Into<String>, matcher: impl Matcher + 'static) -> DescribedAs {
    DescribedAs {
        template: template.into(),
        values: Vec::new(),
        inner: Box::new(matcher),
    }
}
