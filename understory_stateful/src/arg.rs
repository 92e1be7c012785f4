// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Classification of caller-supplied stage arguments.
//!
//! Each stage of a decoration accepts a loosely shaped argument: a function,
//! a plain record, nothing at all, or something invalid. [`Arg`] names those
//! shapes explicitly so resolution is a match, not a runtime type probe.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::props::{Props, State};
use crate::value::Value;
use crate::wrapper::Setter;

/// Map-state stage: `(state, own_props) -> state_props`.
///
/// `state` is `None` whenever the wrapper has no internal state.
pub type MapStateFn = Rc<dyn Fn(Option<&State>, &Props) -> Props>;

/// Map-setters stage: `(setter, own_props) -> setter_props`.
pub type MapSettersFn = Rc<dyn Fn(&Setter, &Props) -> Props>;

/// Merge stage: `(state_props, setter_props, own_props) -> final_props`.
pub type MergeFn = Rc<dyn Fn(Props, Props, &Props) -> Props>;

/// A caller-supplied stage argument.
///
/// `F` is the function type of the stage the argument is destined for. Only
/// some shapes are meaningful for a given stage; the rest resolve to a
/// failing handler (see [`resolve`](crate::resolve())).
#[derive(Clone, Default)]
pub enum Arg<F> {
    /// Nothing was supplied.
    #[default]
    Absent,
    /// A stage function.
    Function(F),
    /// A plain record.
    Record(Box<Props>),
    /// A boolean.
    Boolean(bool),
    /// A number.
    Number(f64),
    /// A string.
    Text(String),
    /// An ordered list.
    List(Vec<Value>),
}

/// The runtime type of an [`Arg`], as reported in diagnostics.
///
/// Records and lists share the diagnostic name `object`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ArgKind {
    /// [`Arg::Absent`].
    Undefined,
    /// [`Arg::Function`].
    Function,
    /// [`Arg::Record`].
    Record,
    /// [`Arg::Boolean`].
    Boolean,
    /// [`Arg::Number`].
    Number,
    /// [`Arg::Text`].
    String,
    /// [`Arg::List`].
    Array,
}

impl ArgKind {
    /// Returns the diagnostic name of this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Function => "function",
            Self::Record | Self::Array => "object",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
        }
    }
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl<F> Arg<F> {
    /// Returns the runtime type of this argument.
    #[must_use]
    pub fn kind(&self) -> ArgKind {
        match self {
            Self::Absent => ArgKind::Undefined,
            Self::Function(_) => ArgKind::Function,
            Self::Record(_) => ArgKind::Record,
            Self::Boolean(_) => ArgKind::Boolean,
            Self::Number(_) => ArgKind::Number,
            Self::Text(_) => ArgKind::String,
            Self::List(_) => ArgKind::Array,
        }
    }

    /// Returns `true` for [`Arg::Absent`].
    #[must_use]
    #[inline]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns the record if this is [`Arg::Record`].
    #[must_use]
    pub fn as_record(&self) -> Option<&Props> {
        match self {
            Self::Record(record) => Some(&**record),
            _ => None,
        }
    }

    /// Returns the function if this is [`Arg::Function`].
    #[must_use]
    pub fn as_function(&self) -> Option<&F> {
        match self {
            Self::Function(f) => Some(f),
            _ => None,
        }
    }
}

impl Arg<MapStateFn> {
    /// A map-state function.
    #[must_use]
    pub fn map_state(f: impl Fn(Option<&State>, &Props) -> Props + 'static) -> Self {
        Self::Function(Rc::new(f))
    }
}

impl Arg<MapSettersFn> {
    /// A map-setters function.
    #[must_use]
    pub fn map_setters(f: impl Fn(&Setter, &Props) -> Props + 'static) -> Self {
        Self::Function(Rc::new(f))
    }
}

impl Arg<MergeFn> {
    /// A merge function.
    #[must_use]
    pub fn merge(f: impl Fn(Props, Props, &Props) -> Props + 'static) -> Self {
        Self::Function(Rc::new(f))
    }
}

impl<F> fmt::Debug for Arg<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("Absent"),
            Self::Function(_) => f.debug_tuple("Function").finish_non_exhaustive(),
            Self::Record(record) => f.debug_tuple("Record").field(record).finish(),
            Self::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            Self::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Self::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
        }
    }
}

impl<F> From<bool> for Arg<F> {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl<F> From<f64> for Arg<F> {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl<F> From<i32> for Arg<F> {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl<F> From<&str> for Arg<F> {
    fn from(value: &str) -> Self {
        Self::Text(String::from(value))
    }
}

impl<F> From<String> for Arg<F> {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<F> From<Props> for Arg<F> {
    fn from(value: Props) -> Self {
        Self::Record(Box::new(value))
    }
}

impl<F> From<Vec<Value>> for Arg<F> {
    fn from(value: Vec<Value>) -> Self {
        Self::List(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props;
    use alloc::vec;

    #[test]
    fn kinds_of_each_shape() {
        assert_eq!(Arg::<MergeFn>::Absent.kind(), ArgKind::Undefined);
        assert_eq!(Arg::<MergeFn>::from(true).kind(), ArgKind::Boolean);
        assert_eq!(Arg::<MergeFn>::from(123).kind(), ArgKind::Number);
        assert_eq!(Arg::<MergeFn>::from(1.5).kind(), ArgKind::Number);
        assert_eq!(Arg::<MergeFn>::from("wrong").kind(), ArgKind::String);
        assert_eq!(
            Arg::<MergeFn>::from(vec![Value::new(1_i32)]).kind(),
            ArgKind::Array
        );
        assert_eq!(Arg::<MergeFn>::from(props! { a: 1_i32 }).kind(), ArgKind::Record);
        assert_eq!(Arg::merge(|s, _, _| s).kind(), ArgKind::Function);
    }

    #[test]
    fn kind_names() {
        assert_eq!(ArgKind::Boolean.name(), "boolean");
        assert_eq!(ArgKind::Undefined.name(), "undefined");
        assert_eq!(alloc::format!("{}", ArgKind::Array), "object");
        assert_eq!(ArgKind::Record.name(), "object");
    }

    #[test]
    fn default_is_absent() {
        let arg: Arg<MapStateFn> = Arg::default();
        assert!(arg.is_absent());
        assert!(arg.as_record().is_none());
        assert!(arg.as_function().is_none());
    }
}
