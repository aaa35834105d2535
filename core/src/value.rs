//! `Value` — The erased item every matcher receives
//!
//! Matchers are non-generic: they all accept `&Value`, whatever the caller
//! originally held. Primitives are stored inline, while domain types go
//! through the `Custom` variant and are recovered by downcasting.
//!
//! # Extensibility via `Custom`
//!
//! For domain types not covered by the primitives, implement [`CustomValue`]
//! and wrap with [`Value::custom`]. The [`narrowable!`](crate::narrowable)
//! macro makes such a type usable as the item of a
//! [`TypeSafeMatcher`](crate::TypeSafeMatcher).

use crate::Literal;
use std::any::Any;
use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::sync::Arc;

/// Extension trait for domain values carried by [`Value::Custom`].
///
/// `Display` is the value's natural string form: it is what appears between
/// angle brackets when the value is appended to a description.
///
/// # Example
///
/// ```
/// use std::any::Any;
/// use std::fmt;
/// use vouch::{CustomValue, Value};
///
/// #[derive(Debug)]
/// struct Money { cents: i64 }
///
/// impl fmt::Display for Money {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "${}.{:02}", self.cents / 100, self.cents % 100)
///     }
/// }
///
/// impl CustomValue for Money {
///     fn custom_type_name(&self) -> &'static str { "money" }
///     fn as_any(&self) -> &dyn Any { self }
/// }
///
/// let value = Value::custom(Money { cents: 1250 });
/// assert_eq!(value.type_name(), "money");
/// assert_eq!(value.downcast_ref::<Money>().map(|m| m.cents), Some(1250));
/// ```
pub trait CustomValue: Send + Sync + Debug + Display {
    /// Human-readable type identifier, used in "was a <type>" fallbacks.
    ///
    /// Convention: `snake_case`, e.g. `"money"`, `"geo_location"`.
    fn custom_type_name(&self) -> &'static str;

    /// Returns `self` as `&dyn Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Semantic equality with another custom value.
    ///
    /// Defaults to `false`; two handles to the same allocation are always
    /// equal regardless.
    fn equals(&self, other: &dyn CustomValue) -> bool {
        let _ = other;
        false
    }

    /// Natural ordering against another custom value.
    ///
    /// `None` means the two cannot be compared, which ordering matchers
    /// treat as a non-match.
    fn compare(&self, other: &dyn CustomValue) -> Option<Ordering> {
        let _ = other;
        None
    }
}

/// Type-erased item under test.
///
/// # Variants
///
/// - `Null` — absence of a value (the `None` of an `Option`)
/// - `Bool`, `Int`, `Float`, `Char`, `String` — primitives
/// - `List` — ordered sequence of values
/// - `Custom` — domain types implementing [`CustomValue`]
///
/// # Example
///
/// ```
/// use vouch::Value;
///
/// let value = Value::from("hello");
/// assert_eq!(value.as_str(), Some("hello"));
/// assert!(Value::from(None::<i64>).is_null());
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// No value.
    #[default]
    Null,

    /// Boolean.
    Bool(bool),

    /// Signed integer; narrower integer types widen into it.
    Int(i64),

    /// Floating point; `f32` widens into it.
    Float(f64),

    /// A single character.
    Char(char),

    /// Owned string.
    String(String),

    /// Ordered sequence of values.
    List(Vec<Value>),

    /// Domain value.
    Custom(Arc<dyn CustomValue>),
}

// Manual PartialEq: trait objects can't derive it. Custom values are equal
// when they share an allocation or when `CustomValue::equals` says so.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b) || a.equals(b.as_ref()),
            _ => false,
        }
    }
}

impl Value {
    /// Wrap a domain value.
    pub fn custom<T: CustomValue + 'static>(value: T) -> Self {
        Self::Custom(Arc::new(value))
    }

    /// Returns `true` if this is the `Null` variant.
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get the value as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Try to get the value as an integer.
    #[inline]
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get the value as a float.
    #[inline]
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// Try to get the value as a list of values.
    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Try to get the inner custom value.
    #[inline]
    #[must_use]
    pub fn as_custom(&self) -> Option<&dyn CustomValue> {
        match self {
            Self::Custom(c) => Some(c.as_ref()),
            _ => None,
        }
    }

    /// Downcast a `Custom` value to its concrete type.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_custom().and_then(|c| c.as_any().downcast_ref::<T>())
    }

    /// Name of the runtime kind of this value.
    ///
    /// For `Custom` variants, delegates to [`CustomValue::custom_type_name`].
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Char(_) => "char",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Custom(c) => c.custom_type_name(),
        }
    }

    /// Stricter than `==`: the same item rather than an equal one.
    ///
    /// Floats compare by bit pattern (so `NaN` is identical to itself) and
    /// custom values by allocation.
    #[must_use]
    pub fn identical(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::List(a), Self::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.identical(y))
            }
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b),
            _ => self == other,
        }
    }

    /// Natural ordering between two values of the same kind.
    ///
    /// Returns `None` for mixed kinds (including `Int` against `Float`),
    /// `NaN`, lists, nulls, and custom values without an ordering.
    #[must_use]
    pub fn natural_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Char(a), Self::Char(b)) => Some(a.cmp(b)),
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Custom(a), Self::Custom(b)) => a.compare(b.as_ref()),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

macro_rules! int_from {
    ($($ty:ty),*) => {$(
        impl From<$ty> for Value {
            fn from(i: $ty) -> Self {
                Self::Int(i64::from(i))
            }
        }
    )*};
}

int_from!(i8, i16, i32, i64, u8, u16, u32);

/// Lengths and indices. Saturates at `i64::MAX`.
impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Self::Int(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Self::Float(f64::from(x))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

impl From<Arc<dyn CustomValue>> for Value {
    fn from(c: Arc<dyn CustomValue>) -> Self {
        Self::Custom(c)
    }
}

/// Explicit type witness: recovers a typed view of a [`Value`].
///
/// The type-safe layer uses it to decide whether an item is something its
/// matcher understands. `narrow` returns `None` for every other kind,
/// including `Null` (the adapters check for `Null` before narrowing).
///
/// Implemented for the primitive views; use [`narrowable!`](crate::narrowable)
/// for custom types.
pub trait Narrow: Literal {
    /// Borrow `value` as `Self`, if it holds one.
    fn narrow(value: &Value) -> Option<&Self>;
}

impl Narrow for Value {
    fn narrow(value: &Value) -> Option<&Self> {
        Some(value)
    }
}

impl Narrow for bool {
    fn narrow(value: &Value) -> Option<&Self> {
        match value {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }
}

impl Narrow for i64 {
    fn narrow(value: &Value) -> Option<&Self> {
        match value {
            Value::Int(i) => Some(i),
            _ => None,
        }
    }
}

impl Narrow for f64 {
    fn narrow(value: &Value) -> Option<&Self> {
        match value {
            Value::Float(x) => Some(x),
            _ => None,
        }
    }
}

impl Narrow for char {
    fn narrow(value: &Value) -> Option<&Self> {
        match value {
            Value::Char(c) => Some(c),
            _ => None,
        }
    }
}

impl Narrow for String {
    fn narrow(value: &Value) -> Option<&Self> {
        match value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl Narrow for str {
    fn narrow(value: &Value) -> Option<&Self> {
        value.as_str()
    }
}

impl Narrow for Vec<Value> {
    fn narrow(value: &Value) -> Option<&Self> {
        match value {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl Narrow for [Value] {
    fn narrow(value: &Value) -> Option<&Self> {
        value.as_list()
    }
}

/// Implement [`Narrow`] and [`Literal`] for [`CustomValue`] types.
///
/// ```
/// use std::any::Any;
/// use std::fmt;
/// use vouch::{narrowable, CustomValue, Narrow, Value};
///
/// #[derive(Debug)]
/// struct Point { x: i64, y: i64 }
///
/// impl fmt::Display for Point {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "({}, {})", self.x, self.y)
///     }
/// }
///
/// impl CustomValue for Point {
///     fn custom_type_name(&self) -> &'static str { "point" }
///     fn as_any(&self) -> &dyn Any { self }
/// }
///
/// narrowable!(Point);
///
/// let value = Value::custom(Point { x: 1, y: 2 });
/// assert_eq!(Point::narrow(&value).map(|p| p.y), Some(2));
/// assert!(Point::narrow(&Value::from(3)).is_none());
/// ```
#[macro_export]
macro_rules! narrowable {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::Narrow for $ty {
            fn narrow(value: &$crate::Value) -> ::core::option::Option<&Self> {
                value.downcast_ref::<$ty>()
            }
        }

        impl $crate::Literal for $ty {
            fn write_literal(&self, out: &mut ::std::string::String) {
                $crate::write_display_literal(
                    self,
                    $crate::CustomValue::custom_type_name(self),
                    out,
                );
            }
        }
    )+};
}
