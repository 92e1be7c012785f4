// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered prop records and state snapshots.
//!
//! # Implementation
//!
//! [`Props`] keeps entries in insertion order inside a `SmallVec`, so records
//! with a handful of fields never touch the heap for their entry table. Lookup
//! is a linear scan, which beats hashing at the sizes props usually have.

use alloc::borrow::Cow;
use alloc::rc::Rc;
use core::fmt;
use core::ops::Deref;

use smallvec::SmallVec;

use crate::value::Value;

/// Default inline capacity for prop entries.
const INLINE_CAPACITY: usize = 8;

/// A prop or state field name.
pub type PropName = Cow<'static, str>;

/// An ordered record of named values.
///
/// Used for own props, derived props, the final merged prop set, and the
/// fields of internal state. Insertion order is preserved; inserting an
/// existing name replaces its value in place.
///
/// # Example
///
/// ```rust
/// use understory_stateful::{Props, props};
///
/// let mut props = props! { message: String::from("hello"), count: 1_i32 };
/// props.insert("count", 2_i32);
///
/// assert_eq!(props.get::<i32>("count"), Some(&2));
/// assert_eq!(props.keys().collect::<Vec<_>>(), ["message", "count"]);
/// ```
#[derive(Clone, Default, PartialEq)]
pub struct Props {
    entries: SmallVec<[(PropName, Value); INLINE_CAPACITY]>,
}

impl Props {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the record has no entries.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(key, _)| key == name)
    }

    /// Inserts a typed payload, replacing any existing value under `name`.
    pub fn insert<T: PartialEq + fmt::Debug + 'static>(
        &mut self,
        name: impl Into<PropName>,
        value: T,
    ) {
        self.insert_value(name, Value::new(value));
    }

    /// Inserts an already erased value, replacing any existing value under `name`.
    ///
    /// Returns the previous value, if any.
    pub fn insert_value(&mut self, name: impl Into<PropName>, value: Value) -> Option<Value> {
        let name = name.into();
        match self.position(&name) {
            Some(idx) => Some(core::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    /// Builder form of [`Props::insert`].
    #[must_use]
    pub fn with<T: PartialEq + fmt::Debug + 'static>(
        mut self,
        name: impl Into<PropName>,
        value: T,
    ) -> Self {
        self.insert(name, value);
        self
    }

    /// Gets the payload under `name` if present and of type `T`.
    #[must_use]
    pub fn get<T: 'static>(&self, name: &str) -> Option<&T> {
        self.value(name).and_then(Value::downcast_ref)
    }

    /// Gets the erased value under `name`.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.position(name).map(|idx| &self.entries[idx].1)
    }

    /// Returns `true` if a value exists under `name`.
    #[must_use]
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Removes the value under `name`, keeping the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.position(name).map(|idx| self.entries.remove(idx).1)
    }

    /// Iterates over the names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(key, _)| &**key)
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.entries.iter().map(|(key, value)| (&**key, value))
    }

    /// Layers `other` on top of `self`.
    ///
    /// Same-named entries take the value from `other` and keep their original
    /// position; new names are appended.
    pub fn extend_from(&mut self, other: &Self) {
        for (key, value) in &other.entries {
            self.insert_value(key.clone(), value.clone());
        }
    }
}

impl fmt::Debug for Props {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<N: Into<PropName>> FromIterator<(N, Value)> for Props {
    fn from_iter<I: IntoIterator<Item = (N, Value)>>(iter: I) -> Self {
        let mut props = Self::new();
        for (name, value) in iter {
            props.insert_value(name, value);
        }
        props
    }
}

/// Builds a [`Props`] record from `name: value` pairs.
///
/// ```rust
/// use understory_stateful::props;
///
/// let props = props! { message: String::from("hi"), visible: true };
/// assert_eq!(props.get::<bool>("visible"), Some(&true));
/// ```
#[macro_export]
macro_rules! props {
    () => {
        $crate::Props::new()
    };
    ($($name:ident : $value:expr),+ $(,)?) => {{
        let mut props = $crate::Props::new();
        $(props.insert(stringify!($name), $value);)+
        props
    }};
}

/// One-level key/value comparison of two records.
///
/// Both records must have the same number of entries and every entry of `a`
/// must exist in `b` with an equal value. Order is ignored.
///
/// This is the default for both equality predicates of the update gate.
#[must_use]
pub fn shallow_equal(a: &Props, b: &Props) -> bool {
    if core::ptr::eq(a, b) {
        return true;
    }
    a.len() == b.len()
        && a
            .iter()
            .all(|(name, value)| b.value(name).is_some_and(|other| other == value))
}

/// An immutable snapshot of a wrapper's internal state.
///
/// Every setter commit produces a new snapshot, so reference equality
/// ([`State::ptr_eq`]) distinguishes "same snapshot" from "equal contents".
#[derive(Clone, PartialEq)]
pub struct State(Rc<Props>);

impl State {
    /// Wraps a record as a state snapshot.
    #[must_use]
    pub fn new(fields: Props) -> Self {
        Self(Rc::new(fields))
    }

    /// Returns `true` if both handles point at the same snapshot.
    #[must_use]
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Returns the fields of this snapshot.
    #[must_use]
    #[inline]
    pub fn fields(&self) -> &Props {
        &self.0
    }

    /// Returns a new snapshot with `partial` shallow-merged over this one.
    ///
    /// Unknown names are appended; existing names are overwritten.
    #[must_use]
    pub fn merged(&self, partial: &Props) -> Self {
        let mut fields = Props::clone(&self.0);
        fields.extend_from(partial);
        Self::new(fields)
    }
}

impl Deref for State {
    type Target = Props;

    fn deref(&self) -> &Props {
        &self.0
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("State").field(&*self.0).finish()
    }
}
