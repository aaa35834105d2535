//! Feature extraction — match a value derived from the item
//!
//! [`applying`] turns "a matcher over `U`" into "a matcher over `S`" through
//! a function `S → U`; [`feature`] does the same and labels the feature in
//! descriptions.
//!
//! # Call-scoped cache
//!
//! Extraction functions may be impure (drain a queue, advance an iterator).
//! A mismatch must describe the derived value the verdict was based on, so
//! `matches` remembers `(item, derived)` and the next `describe_mismatch` or
//! `explain` on the same thread takes it back instead of calling the
//! function again. This holds when the feature matcher is nested inside
//! combinators too, since they explain their children.
//!
//! The cache lives in thread-local storage keyed by matcher instance; the
//! matcher itself holds no mutable state and is freely shared across
//! threads. An entry is consumed by the describe that follows the verdict.
//! Entries left behind by a matcher that has since been dropped, possibly on
//! another thread, are swept on the next insert.
//!
//! Explaining into a discarding sink is a verdict-only evaluation and
//! behaves like `matches`.

use crate::type_safe::{describe_unexpected, narrow};
use crate::{BoxedMatcher, Description, MatchTrace, Matcher, Narrow, SelfDescribing, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

type ExtractFn = dyn Fn(&Value) -> Option<Value> + Send + Sync;

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// The outcome of the last `matches` call, waiting for its describe.
struct Extracted {
    /// Dead once the matcher is dropped.
    owner: Weak<()>,
    item: Value,
    derived: Value,
}

thread_local! {
    /// matcher id → the last extraction on this thread
    static LAST_EXTRACTED: RefCell<HashMap<u64, Extracted>> = RefCell::new(HashMap::new());
}

/// Labels for a named feature.
#[derive(Debug, Clone)]
struct Label {
    /// Prefix for the expectation: "a string with length".
    description: String,
    /// Prefix for the mismatch: "length".
    name: String,
}

/// Matches the value an extraction function derives from the item.
///
/// Built by [`applying`] or [`feature`].
pub struct Applying {
    id: u64,
    alive: Arc<()>,
    label: Option<Label>,
    extract: Box<ExtractFn>,
    matcher: BoxedMatcher,
}

impl Applying {
    fn new(label: Option<Label>, extract: Box<ExtractFn>, matcher: BoxedMatcher) -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            alive: Arc::new(()),
            label,
            extract,
            matcher,
        }
    }

    /// The matcher applied to the derived value.
    #[must_use]
    pub fn matcher(&self) -> &dyn Matcher {
        self.matcher.as_ref()
    }

    /// Extract without consulting the cache. `None` if the item has the
    /// wrong type.
    fn extract(&self, item: &Value) -> Option<Value> {
        (self.extract)(item)
    }

    fn remember(&self, item: &Value, derived: &Value) {
        let entry = Extracted {
            owner: Arc::downgrade(&self.alive),
            item: item.clone(),
            derived: derived.clone(),
        };
        let stale = LAST_EXTRACTED.with(|cache| {
            let mut cache = cache.borrow_mut();
            let before = cache.len();
            cache.retain(|_, entry| entry.owner.strong_count() > 0);
            let stale = before - cache.len();
            cache.insert(self.id, entry);
            stale
        });
        if stale > 0 {
            tracing::trace!(stale, "swept feature cache entries of dropped matchers");
        }
    }

    fn forget(&self) {
        // try_with: the thread-local may already be gone during thread teardown
        let _ = LAST_EXTRACTED.try_with(|cache| {
            if let Ok(mut cache) = cache.try_borrow_mut() {
                cache.remove(&self.id);
            }
        });
    }

    /// Take the derived value left by the last `matches(item)` on this
    /// thread, or extract afresh if there is none for this item.
    ///
    /// The entry is consumed either way.
    fn recall(&self, item: &Value) -> Option<Value> {
        let cached = LAST_EXTRACTED.with(|cache| {
            cache
                .borrow_mut()
                .remove(&self.id)
                .filter(|entry| entry.item.identical(item))
                .map(|entry| entry.derived)
        });
        if cached.is_some() {
            return cached;
        }
        tracing::trace!(matcher_id = self.id, "feature cache miss, extracting again");
        self.extract(item)
    }

    fn describe_derived_mismatch(&self, derived: &Value, mismatch: &mut Description) {
        if let Some(label) = &self.label {
            mismatch.append_text(&label.name).append_text(" ");
        }
        self.matcher.describe_mismatch(derived, mismatch);
    }
}

impl Drop for Applying {
    fn drop(&mut self) {
        self.forget();
    }
}

impl fmt::Debug for Applying {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Applying")
            .field("label", &self.label)
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}

impl SelfDescribing for Applying {
    fn describe_to(&self, description: &mut Description) {
        if let Some(label) = &self.label {
            description.append_text(&label.description).append_text(" ");
        }
        description.append_description_of(&self.matcher);
    }
}

impl Matcher for Applying {
    fn matches(&self, item: &Value) -> bool {
        match self.extract(item) {
            Some(derived) => {
                self.remember(item, &derived);
                self.matcher.matches(&derived)
            }
            None => {
                self.forget();
                false
            }
        }
    }

    fn describe_mismatch(&self, item: &Value, mismatch: &mut Description) {
        match self.recall(item) {
            Some(derived) => self.describe_derived_mismatch(&derived, mismatch),
            None => describe_unexpected(item, mismatch),
        }
    }

    fn explain(&self, item: &Value, mismatch: &mut Description) -> bool {
        if mismatch.is_discarding() {
            return self.matches(item);
        }
        let Some(derived) = self.recall(item) else {
            describe_unexpected(item, mismatch);
            return false;
        };
        let mut scratch = mismatch.fork();
        if self.matcher.explain(&derived, &mut scratch) {
            return true;
        }
        if let Some(label) = &self.label {
            mismatch.append_text(&label.name).append_text(" ");
        }
        mismatch.append_description(&scratch);
        false
    }

    fn trace(&self, item: &Value) -> MatchTrace {
        let expected = Description::of(self);
        match self.extract(item) {
            Some(derived) => {
                let inner = self.matcher.trace(&derived);
                MatchTrace::Feature {
                    matched: inner.matched(),
                    expected,
                    derived: Description::new().append_value(&derived).to_string(),
                    inner: Box::new(inner),
                }
            }
            None => {
                let mut mismatch = Description::new();
                describe_unexpected(item, &mut mismatch);
                MatchTrace::Leaf {
                    matched: false,
                    expected,
                    mismatch: Some(mismatch.into_string()),
                }
            }
        }
    }
}

fn erase<S, U, F>(extract: F) -> Box<ExtractFn>
where
    S: Narrow + ?Sized,
    U: Into<Value>,
    F: Fn(&S) -> U + Send + Sync + 'static,
{
    Box::new(move |item: &Value| narrow::<S>(item).map(|source| extract(source).into()))
}

/// Match `matcher` against `extract(item)`.
///
/// The expectation is the wrapped matcher's own description. Items that
/// are `Null` or can't be narrowed to `S` don't match.
///
/// ```
/// use vouch::prelude::*;
///
/// let matcher = applying(|s: &str| s.to_uppercase(), equal_to("HI"));
/// assert!(matcher.matches(&Value::from("hi")));
///
/// let mut mismatch = Description::new();
/// matcher.explain(&Value::from("yo"), &mut mismatch);
/// assert_eq!(mismatch.as_str(), r#"was "YO""#);
/// ```
pub fn applying<S, U, F>(extract: F, matcher: impl Matcher + 'static) -> Applying
where
    S: Narrow + ?Sized,
    U: Into<Value>,
    F: Fn(&S) -> U + Send + Sync + 'static,
{
    Applying::new(None, erase(extract), Box::new(matcher))
}

/// Like [`applying`], with the feature named in descriptions.
///
/// The expectation reads `"{description} {inner}"`; the mismatch reads
/// `"{name} {inner mismatch}"`.
///
/// ```
/// use vouch::prelude::*;
///
/// let matcher = feature("a string with length", "length", |s: &str| s.len(), greater_than(3));
/// assert_eq!(Description::of(&matcher), "a string with length a value greater than <3>");
///
/// let mut mismatch = Description::new();
/// matcher.explain(&Value::from("abc"), &mut mismatch);
/// assert_eq!(mismatch.as_str(), "length <3> was equal to <3>");
/// ```
pub fn feature<S, U, F>(
    description: impl Into<String>,
    name: impl Into<String>,
    extract: F,
    matcher: impl Matcher + 'static,
) -> Applying
where
    S: Narrow + ?Sized,
    U: Into<Value>,
    F: Fn(&S) -> U + Send + Sync + 'static,
{
    let label = Label {
        description: description.into(),
        name: name.into(),
    };
    Applying::new(Some(label), erase(extract), Box::new(matcher))
}
