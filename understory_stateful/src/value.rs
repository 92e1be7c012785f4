// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Type-erased prop values.
//!
//! Props and state fields are heterogeneous, so each entry is stored as a
//! [`Value`]: a reference-counted, type-erased payload that can still be
//! compared for equality. [`Callback`] is the value type used for closures
//! handed down as props.

use alloc::rc::Rc;
use core::any::{Any, TypeId};
use core::fmt;

/// A type-erased, comparable prop value.
///
/// Any `'static` type with [`PartialEq`] and [`Debug`](fmt::Debug) can be
/// stored. Cloning is cheap: clones share the same allocation, which is what
/// [`Value::ptr_eq`] observes.
///
/// # Example
///
/// ```rust
/// use understory_stateful::Value;
///
/// let value = Value::new(42_i32);
/// assert!(value.is::<i32>());
/// assert_eq!(value.downcast_ref::<i32>(), Some(&42));
///
/// // Same type and equal payload compare equal, even across allocations.
/// assert_eq!(value, Value::new(42_i32));
/// assert_ne!(value, Value::new(42_i64));
///
/// // Floats compare by bit pattern.
/// assert_eq!(Value::new(f64::NAN), Value::new(f64::NAN));
/// assert_ne!(Value::new(0.0_f64), Value::new(-0.0_f64));
/// ```
#[derive(Clone)]
pub struct Value {
    inner: Rc<dyn ErasedValueTrait>,
    type_id: TypeId,
}

impl Value {
    /// Creates a new value from a concrete payload.
    #[must_use]
    pub fn new<T: PartialEq + fmt::Debug + 'static>(value: T) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            inner: Rc::new(value),
        }
    }

    /// Returns the [`TypeId`] of the contained payload.
    #[must_use]
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the Rust type name of the contained payload.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.inner.type_name()
    }

    /// Returns `true` if the contained payload is of type `T`.
    #[must_use]
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Attempts to downcast to a reference of type `T`.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        if self.is::<T>() {
            self.inner.as_any().downcast_ref()
        } else {
            None
        }
    }

    /// Returns `true` if both values share one allocation.
    #[must_use]
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Floats compare by bit pattern, so `NaN` equals `NaN` and `0.0` differs
/// from `-0.0`.
fn float_bits_eq(a: &dyn Any, b: &dyn Any) -> Option<bool> {
    if let (Some(a), Some(b)) = (a.downcast_ref::<f64>(), b.downcast_ref::<f64>()) {
        return Some(a.to_bits() == b.to_bits());
    }
    if let (Some(a), Some(b)) = (a.downcast_ref::<f32>(), b.downcast_ref::<f32>()) {
        return Some(a.to_bits() == b.to_bits());
    }
    None
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        if self.type_id != other.type_id {
            return false;
        }
        let (a, b) = (self.inner.as_any(), other.inner.as_any());
        float_bits_eq(a, b).unwrap_or_else(|| self.inner.dyn_eq(b))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.dyn_fmt(f)
    }
}

trait ErasedValueTrait: Any {
    fn as_any(&self) -> &dyn Any;
    fn dyn_eq(&self, other: &dyn Any) -> bool;
    fn dyn_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
    fn type_name(&self) -> &'static str;
}

impl<T: PartialEq + fmt::Debug + 'static> ErasedValueTrait for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().is_some_and(|other| self == other)
    }

    fn dyn_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }

    fn type_name(&self) -> &'static str {
        core::any::type_name::<T>()
    }
}

/// A closure passed down as a prop.
///
/// Callbacks compare by identity: clones of one callback are equal, two
/// callbacks built from identical closures are not.
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use understory_stateful::{Callback, Value};
///
/// let seen = Rc::new(Cell::new(0));
/// let sink = seen.clone();
/// let callback = Callback::new(move |value: Value| {
///     sink.set(*value.downcast_ref::<i32>().unwrap());
/// });
///
/// callback.call(Value::new(7_i32));
/// assert_eq!(seen.get(), 7);
/// assert_eq!(callback, callback.clone());
/// ```
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn(Value)>);

impl Callback {
    /// Wraps a closure.
    #[must_use]
    pub fn new(f: impl Fn(Value) + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invokes the closure.
    #[inline]
    pub fn call(&self, value: Value) {
        (self.0)(value);
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Callback").finish_non_exhaustive()
    }
}
