//! `Description` — Append-only text sink for expectations and mismatches
//!
//! Matchers never build strings themselves; they write into a [`Description`]
//! handed to them by the caller. A parent matcher describes its children by
//! passing the same sink down via [`Description::append_description_of`].
//!
//! # Two modes
//!
//! - [`Description::new`] accumulates text.
//! - [`Description::discard`] accepts every append and keeps nothing. It
//!   never allocates and skips value formatting entirely, so callers that only
//!   need a verdict can use description-writing code paths for free.
//!
//! # Value formatting
//!
//! [`Description::append_value`] renders values as literals:
//!
//! | Value | Rendering |
//! |-------|-----------|
//! | null | `null` |
//! | string | `"hello"` (escaped) |
//! | char | `'c'` (escaped) |
//! | list | `[<1>, "a"]` |
//! | anything else | `<1>`, `<3.14>`, `<custom display>` |

use crate::{CustomValue, Value};
use std::fmt::{self, Display, Write as _};
use std::panic::{self, AssertUnwindSafe};

/// Something that can write itself into a [`Description`].
pub trait SelfDescribing {
    /// Append a description of `self`.
    fn describe_to(&self, description: &mut Description);
}

impl<T: SelfDescribing + ?Sized> SelfDescribing for &T {
    fn describe_to(&self, description: &mut Description) {
        (**self).describe_to(description);
    }
}

impl<T: SelfDescribing + ?Sized> SelfDescribing for Box<T> {
    fn describe_to(&self, description: &mut Description) {
        (**self).describe_to(description);
    }
}

impl<T: SelfDescribing + ?Sized> SelfDescribing for std::sync::Arc<T> {
    fn describe_to(&self, description: &mut Description) {
        (**self).describe_to(description);
    }
}

/// How a value renders itself through [`Description::append_value`].
///
/// Implementations must be total: formatting problems degrade to a marker
/// instead of failing.
pub trait Literal {
    /// Append the literal form of `self` to `out`.
    fn write_literal(&self, out: &mut String);
}

/// Append-only text sink.
///
/// # Example
///
/// ```
/// use vouch::Description;
///
/// let mut description = Description::new();
/// description
///     .append_text("was ")
///     .append_value(&"hi\n")
///     .append_text(" and ")
///     .append_value(&1);
/// assert_eq!(description.as_str(), r#"was "hi\n" and <1>"#);
///
/// let mut sink = Description::discard();
/// sink.append_text("ignored");
/// assert_eq!(sink.as_str(), "");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description {
    // `None` discards; `String::new()` does not allocate until first push.
    text: Option<String>,
}

impl Description {
    /// Create an accumulating description.
    #[must_use]
    pub fn new() -> Self {
        Self {
            text: Some(String::new()),
        }
    }

    /// Create a description that discards everything appended to it.
    #[must_use]
    pub const fn discard() -> Self {
        Self { text: None }
    }

    /// Render a self-describing object to a string.
    #[must_use]
    pub fn of(value: &(impl SelfDescribing + ?Sized)) -> String {
        let mut description = Self::new();
        value.describe_to(&mut description);
        description.into_string()
    }

    /// Returns `true` if appends are being dropped.
    #[inline]
    #[must_use]
    pub fn is_discarding(&self) -> bool {
        self.text.is_none()
    }

    /// An empty sink in the same mode as `self`.
    ///
    /// Combinators use this as scratch space for a child's mismatch so they
    /// can decide afterwards whether to keep it.
    #[must_use]
    pub fn fork(&self) -> Self {
        match self.text {
            Some(_) => Self::new(),
            None => Self::discard(),
        }
    }

    /// Accumulated text (always empty when discarding).
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Consume the sink and return its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.text.unwrap_or_default()
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    /// Append literal text verbatim.
    pub fn append_text(&mut self, text: &str) -> &mut Self {
        if let Some(buf) = &mut self.text {
            buf.push_str(text);
        }
        self
    }

    /// Append the literal form of a value.
    pub fn append_value<V: Literal + ?Sized>(&mut self, value: &V) -> &mut Self {
        if let Some(buf) = &mut self.text {
            value.write_literal(buf);
        }
        self
    }

    /// Let `value` describe itself into this sink.
    pub fn append_description_of<S: SelfDescribing + ?Sized>(&mut self, value: &S) -> &mut Self {
        if !self.is_discarding() {
            value.describe_to(self);
        }
        self
    }

    /// Write `start`, each item's self-description joined by `separator`,
    /// then `end`.
    pub fn append_list<I>(&mut self, start: &str, separator: &str, end: &str, items: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: SelfDescribing,
    {
        if self.is_discarding() {
            return self;
        }
        self.append_text(start);
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                self.append_text(separator);
            }
            item.describe_to(self);
        }
        self.append_text(end)
    }

    /// Like [`append_list`](Self::append_list), but for value literals.
    pub fn append_value_list<I>(
        &mut self,
        start: &str,
        separator: &str,
        end: &str,
        values: I,
    ) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Literal,
    {
        if let Some(buf) = &mut self.text {
            buf.push_str(start);
            for (i, value) in values.into_iter().enumerate() {
                if i > 0 {
                    buf.push_str(separator);
                }
                value.write_literal(buf);
            }
            buf.push_str(end);
        }
        self
    }

    /// Append another description's text.
    pub fn append_description(&mut self, other: &Description) -> &mut Self {
        self.append_text(other.as_str())
    }
}

impl Default for Description {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Literal formatting
// ═══════════════════════════════════════════════════════════════════════════════

fn escape_into(c: char, out: &mut String) {
    match c {
        '"' => out.push_str("\\\""),
        '\'' => out.push_str("\\'"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        '\\' => out.push_str("\\\\"),
        other => out.push(other),
    }
}

fn write_quoted_str(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        // single quotes stay bare inside double-quoted strings
        if c == '\'' {
            out.push(c);
        } else {
            escape_into(c, out);
        }
    }
    out.push('"');
}

fn write_quoted_char(c: char, out: &mut String) {
    out.push('\'');
    if c == '"' {
        out.push(c);
    } else {
        escape_into(c, out);
    }
    out.push('\'');
}

/// Write `<display>` for a value's natural string form.
///
/// If the `Display` impl reports an error or panics, writes
/// `<{type_name} (unprintable)>` instead: a mismatch report must never fail
/// because of the value it reports.
pub fn write_display_literal<T: Display + ?Sized>(value: &T, type_name: &str, out: &mut String) {
    let mut rendered = String::new();
    let written = panic::catch_unwind(AssertUnwindSafe(|| write!(rendered, "{value}")));
    out.push('<');
    if matches!(written, Ok(Ok(()))) {
        out.push_str(&rendered);
    } else {
        out.push_str(type_name);
        out.push_str(" (unprintable)");
    }
    out.push('>');
}

impl Literal for Value {
    fn write_literal(&self, out: &mut String) {
        match self {
            Value::Null => out.push_str("null"),
            Value::Bool(b) => b.write_literal(out),
            Value::Int(i) => i.write_literal(out),
            Value::Float(x) => x.write_literal(out),
            Value::Char(c) => write_quoted_char(*c, out),
            Value::String(s) => write_quoted_str(s, out),
            Value::List(items) => items.as_slice().write_literal(out),
            Value::Custom(c) => c.as_ref().write_literal(out),
        }
    }
}

impl Literal for dyn CustomValue {
    fn write_literal(&self, out: &mut String) {
        write_display_literal(self, self.custom_type_name(), out);
    }
}

impl Literal for str {
    fn write_literal(&self, out: &mut String) {
        write_quoted_str(self, out);
    }
}

impl Literal for String {
    fn write_literal(&self, out: &mut String) {
        write_quoted_str(self, out);
    }
}

impl Literal for char {
    fn write_literal(&self, out: &mut String) {
        write_quoted_char(*self, out);
    }
}

impl Literal for bool {
    fn write_literal(&self, out: &mut String) {
        write_display_literal(self, "bool", out);
    }
}

macro_rules! display_literal {
    ($($ty:ty => $name:literal),* $(,)?) => {$(
        impl Literal for $ty {
            fn write_literal(&self, out: &mut String) {
                write_display_literal(self, $name, out);
            }
        }
    )*};
}

display_literal!(
    i8 => "int", i16 => "int", i32 => "int", i64 => "int", isize => "int",
    u8 => "int", u16 => "int", u32 => "int", u64 => "int", usize => "int",
);

// Debug keeps the fractional part: `<1.0>`, not `<1>`.
macro_rules! float_literal {
    ($($ty:ty),*) => {$(
        impl Literal for $ty {
            fn write_literal(&self, out: &mut String) {
                let _ = write!(out, "<{self:?}>");
            }
        }
    )*};
}

float_literal!(f32, f64);

impl<T: Literal> Literal for [T] {
    fn write_literal(&self, out: &mut String) {
        out.push('[');
        for (i, item) in self.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            item.write_literal(out);
        }
        out.push(']');
    }
}

impl<T: Literal> Literal for Vec<T> {
    fn write_literal(&self, out: &mut String) {
        self.as_slice().write_literal(out);
    }
}

impl<T: Literal> Literal for Option<T> {
    fn write_literal(&self, out: &mut String) {
        match self {
            Some(value) => value.write_literal(out),
            None => out.push_str("null"),
        }
    }
}

impl<T: Literal + ?Sized> Literal for &T {
    fn write_literal(&self, out: &mut String) {
        (**self).write_literal(out);
    }
}
