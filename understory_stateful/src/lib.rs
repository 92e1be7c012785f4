// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Stateful: local component state exposed as props.
//!
//! This crate decorates a [`Component`] with a private piece of state and
//! turns that state, and a way to change it, into props. The wrapped
//! component stays a pure function of its props.
//!
//! ## Core Concepts
//!
//! ### Stages
//!
//! A decoration is described by three optional arguments, each resolved once
//! into a stage by an ordered list of [`Strategy`] matchers:
//!
//! - **`mapStateToProps`** - a function `(state, own props) -> props`, or a
//!   record that seeds the initial state, or absent.
//! - **`mapSetStateToProps`** - a function `(setter, own props) -> props`, or
//!   absent for the generated `setState` plus one `setX` per state field.
//! - **`mergeProps`** - a function `(state props, setter props, own props) -> props`,
//!   or absent for own props, then state props, then setter props.
//!
//! Any other shape is rejected with an [`InvalidArgumentError`] naming the
//! argument, the value kind and the wrapped component.
//!
//! ### Instances
//!
//! [`Decoration::wrap`] produces a [`StatefulComponent`]. Each
//! [`StatefulComponent::construct`] creates a [`Stateful`] instance with its
//! own state. Setter calls are queued and committed by
//! [`Stateful::flush`] or [`Stateful::receive_props`].
//!
//! ### Update Gate
//!
//! With [`Options::pure`] set (the default), a commit re-renders only when the
//! own props or the state differ under [`Options::are_own_props_equal`] and
//! [`Options::are_states_equal`]. Both default to [`shallow_equal`].
//!
//! ## Quick Start
//!
//! ```rust
//! use understory_stateful::{Arg, Callback, Commit, Options, Value, decorate, fn_component, props};
//!
//! let decoration = decorate(
//!     props! { count: 0_i32 }.into(),
//!     Arg::Absent,
//!     Arg::Absent,
//!     Options::default(),
//! );
//! let counter = decoration.wrap(fn_component("Counter", |props| {
//!     let count = props.get::<i32>("count").copied().unwrap_or_default();
//!     let label = props.get::<String>("label").cloned().unwrap_or_default();
//!     format!("{label}: {count}")
//! }));
//! assert_eq!(counter.display_name(), "Stateful(Counter)");
//!
//! let mut instance = counter.construct();
//! instance.mount(props! { label: String::from("clicks") }).unwrap();
//! assert_eq!(instance.output().unwrap(), "clicks: 0");
//!
//! // Generated setters are plain props of the wrapped component.
//! let set_count = instance.last_props().unwrap().get::<Callback>("setCount").unwrap().clone();
//! set_count.call(Value::new(1_i32));
//! assert_eq!(instance.flush().unwrap(), Commit::Rendered);
//! assert_eq!(instance.output().unwrap(), "clicks: 1");
//!
//! // Same props and an equal state: the gate skips the render.
//! assert_eq!(instance.receive_props(props! { label: String::from("clicks") }).unwrap(), Commit::Skipped);
//! assert_eq!(instance.renders(), 2);
//! ```
//!
//! ## Features
//!
//! - `tracing` - emit `tracing` events when the gate skips a render, when a
//!   setter update is dropped, and when a lenient stage falls back to its
//!   default.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod arg;
mod component;
mod decorate;
mod error;
mod gate;
mod options;
mod props;
mod resolve;
mod stages;
mod trace;
mod value;
mod wrapper;

pub use arg::{Arg, ArgKind, MapSettersFn, MapStateFn, MergeFn};
pub use component::{
    Component, FnComponent, RESERVED_STATICS, fn_component, hoist_statics, wrapper_display_name,
};
pub use decorate::{Decoration, DecorationBuilder, StatefulComponent, decorate};
pub use error::InvalidArgumentError;
pub use gate::{EqualityFn, EqualityGate};
pub use options::Options;
pub use props::{PropName, Props, State, shallow_equal};
pub use resolve::{Handler, Strategy, matching_strategy, resolve, when_function};
pub use stages::{
    MAP_SET_STATE_TO_PROPS, MAP_SETTERS_STRATEGIES, MAP_STATE_STRATEGIES, MAP_STATE_TO_PROPS,
    MERGE_PROPS, MERGE_STRATEGIES, SET_STATE_PROP, SetterName, StageSet, default_merge,
    derive_setter_names, generated_setters, state_seed,
};
pub use value::{Callback, Value};
pub use wrapper::{Commit, Lifecycle, Setter, Stateful};
