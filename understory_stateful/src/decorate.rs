// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The decoration entry point.

use alloc::rc::Rc;
use core::fmt;

use crate::arg::{Arg, MapSettersFn, MapStateFn, MergeFn};
use crate::component::{Component, hoist_statics, wrapper_display_name};
use crate::gate::EqualityGate;
use crate::options::Options;
use crate::props::Props;
use crate::stages::StageSet;
use crate::wrapper::Stateful;

/// Resolves the stages of a decoration.
///
/// The returned [`Decoration`] wraps components with [`Decoration::wrap`].
/// Building a decoration never fails: a stage argument the stage cannot use
/// is reported when an instance first renders.
///
/// - `map_state`: a map-state function, a record seeding the initial state,
///   or [`Arg::Absent`].
/// - `map_setters`: a map-setters function or [`Arg::Absent`].
/// - `merge`: a merge function or [`Arg::Absent`].
///
/// # Example
///
/// ```rust
/// use understory_stateful::{Arg, Callback, Commit, Options, Value, decorate, fn_component, props};
///
/// let decoration = decorate(
///     props! { message: String::from("wrong") }.into(),
///     Arg::Absent,
///     Arg::Absent,
///     Options::default(),
/// );
/// let button = decoration.wrap(fn_component("Button", |props| {
///     props.get::<String>("message").cloned().unwrap_or_default()
/// }));
/// assert_eq!(button.display_name(), "Stateful(Button)");
///
/// let mut instance = button.construct();
/// instance.mount(props! {}).unwrap();
/// assert_eq!(instance.output().unwrap(), "wrong");
///
/// // The generated `setMessage` writes the `message` field.
/// let set_message = instance.last_props().unwrap().get::<Callback>("setMessage").unwrap().clone();
/// set_message.call(Value::new(String::from("expected")));
///
/// assert_eq!(instance.flush().unwrap(), Commit::Rendered);
/// assert_eq!(instance.output().unwrap(), "expected");
/// ```
#[must_use]
pub fn decorate(
    map_state: Arg<MapStateFn>,
    map_setters: Arg<MapSettersFn>,
    merge: Arg<MergeFn>,
    options: Options,
) -> Decoration {
    Decoration {
        stages: Rc::new(StageSet::resolve(
            &map_state,
            &map_setters,
            &merge,
            options.is_strict(),
        )),
        gate: options.gate(),
    }
}

/// Resolved stages and gate, ready to wrap components.
#[derive(Clone, Debug)]
pub struct Decoration {
    stages: Rc<StageSet>,
    gate: EqualityGate,
}

impl Decoration {
    /// Starts a [`DecorationBuilder`] with every argument absent.
    #[must_use]
    pub fn builder() -> DecorationBuilder {
        DecorationBuilder::default()
    }

    /// Returns the resolved stages.
    #[must_use]
    pub fn stages(&self) -> &StageSet {
        &self.stages
    }

    /// Wraps `component`.
    ///
    /// Every wrapper made by one decoration shares its stages.
    pub fn wrap<C: Component>(&self, component: C) -> StatefulComponent<C> {
        let wrapped_name: Rc<str> = Rc::from(&*component.display_name());
        let display_name: Rc<str> = Rc::from(wrapper_display_name(&wrapped_name));
        let statics = hoist_statics(&component.statics());
        StatefulComponent {
            component: Rc::new(component),
            stages: self.stages.clone(),
            gate: self.gate.clone(),
            wrapped_name,
            display_name,
            statics,
        }
    }
}

/// Named-argument form of [`decorate`].
///
/// ```rust
/// use understory_stateful::{Arg, Decoration, Options};
///
/// let decoration = Decoration::builder()
///     .map_state(Arg::map_state(|state, own| {
///         let mut props = state.map(|s| s.fields().clone()).unwrap_or_default();
///         props.extend_from(own);
///         props
///     }))
///     .options(Options::new().pure(false))
///     .build();
/// assert!(decoration.stages().initial_state().is_none());
/// ```
#[derive(Debug, Default)]
pub struct DecorationBuilder {
    map_state: Arg<MapStateFn>,
    map_setters: Arg<MapSettersFn>,
    merge: Arg<MergeFn>,
    options: Options,
}

impl DecorationBuilder {
    /// Sets the map-state argument.
    #[must_use]
    pub fn map_state(mut self, arg: impl Into<Arg<MapStateFn>>) -> Self {
        self.map_state = arg.into();
        self
    }

    /// Seeds the initial state with a record.
    #[must_use]
    pub fn initial_state(self, record: Props) -> Self {
        self.map_state(Arg::from(record))
    }

    /// Sets the map-setters argument.
    #[must_use]
    pub fn map_setters(mut self, arg: impl Into<Arg<MapSettersFn>>) -> Self {
        self.map_setters = arg.into();
        self
    }

    /// Sets the merge argument.
    #[must_use]
    pub fn merge(mut self, arg: impl Into<Arg<MergeFn>>) -> Self {
        self.merge = arg.into();
        self
    }

    /// Sets the options.
    #[must_use]
    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Resolves the stages.
    #[must_use]
    pub fn build(self) -> Decoration {
        decorate(self.map_state, self.map_setters, self.merge, self.options)
    }
}

/// A decorated component.
///
/// Carries the wrapped component, its hoisted statics and the shared stages.
/// Each call to [`StatefulComponent::construct`] creates an independent
/// instance with its own state.
pub struct StatefulComponent<C> {
    component: Rc<C>,
    stages: Rc<StageSet>,
    gate: EqualityGate,
    wrapped_name: Rc<str>,
    display_name: Rc<str>,
    statics: Props,
}

impl<C: Component> StatefulComponent<C> {
    /// Returns `Stateful(<wrapped display name>)`.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the wrapped component's display name.
    #[must_use]
    pub fn wrapped_name(&self) -> &str {
        &self.wrapped_name
    }

    /// Returns the statics copied from the wrapped component.
    #[must_use]
    pub fn statics(&self) -> &Props {
        &self.statics
    }

    /// Returns the wrapped component.
    #[must_use]
    pub fn wrapped(&self) -> &C {
        &self.component
    }

    /// Returns `true` if both wrappers came from the same decoration.
    #[must_use]
    pub fn shares_stages_with<D>(&self, other: &StatefulComponent<D>) -> bool {
        Rc::ptr_eq(&self.stages, &other.stages)
    }

    /// Creates a new instance with freshly initialized state.
    #[must_use]
    pub fn construct(&self) -> Stateful<C> {
        Stateful::new(
            self.component.clone(),
            self.stages.clone(),
            self.gate.clone(),
            self.wrapped_name.clone(),
            self.display_name.clone(),
        )
    }
}

impl<C> fmt::Debug for StatefulComponent<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatefulComponent")
            .field("display_name", &self.display_name)
            .field("statics", &self.statics)
            .finish_non_exhaustive()
    }
}
