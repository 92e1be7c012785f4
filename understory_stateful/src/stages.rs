// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stage factories.
//!
//! A decoration has four stages, each resolved once from its argument:
//!
//! | Stage | Accepted shapes | Default |
//! |-------|-----------------|---------|
//! | initial state | record | no state |
//! | `mapStateToProps` | function, record, absent | pass state through |
//! | `mapSetStateToProps` | function, absent | `setState` plus one `setX` per state field |
//! | `mergeProps` | function, absent | own props, then state props, then setter props |
//!
//! Anything else resolves to [`Handler::Invalid`] and fails when the stage
//! first runs (see [`StageSet`]).

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::arg::{Arg, MapSettersFn, MapStateFn, MergeFn};
use crate::error::InvalidArgumentError;
use crate::props::{PropName, Props, State};
use crate::resolve::{Handler, Strategy, resolve, when_function};
use crate::trace::trace_event;
use crate::value::{Callback, Value};
use crate::wrapper::Setter;

/// Argument role of the map-state stage.
pub const MAP_STATE_TO_PROPS: &str = "mapStateToProps";
/// Argument role of the map-setters stage.
pub const MAP_SET_STATE_TO_PROPS: &str = "mapSetStateToProps";
/// Argument role of the merge stage.
pub const MERGE_PROPS: &str = "mergeProps";

/// Prop name under which the generated default exposes the raw [`Setter`].
pub const SET_STATE_PROP: &str = "setState";

fn when_record<F>(arg: &Arg<F>) -> Option<Handler<F>> {
    arg.as_record().map(|_| Handler::DefaultRecord)
}

fn when_absent_identity<F>(arg: &Arg<F>) -> Option<Handler<F>> {
    arg.is_absent().then_some(Handler::DefaultIdentity)
}

fn when_absent_generated<F>(arg: &Arg<F>) -> Option<Handler<F>> {
    arg.is_absent().then_some(Handler::GeneratedDefault)
}

/// Priority list for `mapStateToProps`.
pub const MAP_STATE_STRATEGIES: &[Strategy<MapStateFn>] = &[
    Strategy::new("function", when_function),
    Strategy::new("record", when_record),
    Strategy::new("absent", when_absent_identity),
];

/// Priority list for `mapSetStateToProps`.
pub const MAP_SETTERS_STRATEGIES: &[Strategy<MapSettersFn>] = &[
    Strategy::new("function", when_function),
    Strategy::new("absent", when_absent_generated),
];

/// Priority list for `mergeProps`.
pub const MERGE_STRATEGIES: &[Strategy<MergeFn>] = &[
    Strategy::new("function", when_function),
    Strategy::new("absent", when_absent_identity),
];

/// The initial-state seed carried by a map-state argument.
///
/// Only a record seeds state; every other shape means "no state".
#[must_use]
pub fn state_seed(arg: &Arg<MapStateFn>) -> Option<Props> {
    arg.as_record().cloned()
}

/// A state field and the name of its generated setter prop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetterName {
    /// The state field.
    pub field: PropName,
    /// The generated prop name, `set` followed by the capitalized field.
    pub setter: String,
}

/// Derives one setter name per state field, in field order.
///
/// ```rust
/// use understory_stateful::derive_setter_names;
///
/// let names = derive_setter_names(["message", "isOpen"]);
/// assert_eq!(names[0].setter, "setMessage");
/// assert_eq!(names[1].setter, "setIsOpen");
/// ```
#[must_use]
pub fn derive_setter_names<'a>(fields: impl IntoIterator<Item = &'a str>) -> Vec<SetterName> {
    fields
        .into_iter()
        .map(|field| SetterName {
            field: PropName::Owned(String::from(field)),
            setter: setter_name(field),
        })
        .collect()
}

fn setter_name(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => format!("set{}{}", first.to_uppercase(), chars.as_str()),
        None => String::from("set"),
    }
}

/// Builds the generated default setter props.
///
/// The result holds the raw setter under [`SET_STATE_PROP`] and one
/// [`Callback`] per entry of `names`, each writing a single field.
#[must_use]
pub fn generated_setters(setter: &Setter, names: &[SetterName]) -> Props {
    let mut props = Props::new();
    props.insert(SET_STATE_PROP, setter.clone());
    for name in names {
        let setter = setter.clone();
        let field = name.field.clone();
        props.insert(
            name.setter.clone(),
            Callback::new(move |value: Value| {
                let mut partial = Props::new();
                partial.insert_value(field.clone(), value);
                setter.set(partial);
            }),
        );
    }
    props
}

/// The default merge: own props, then state props, then setter props.
///
/// Each layer overwrites same-named entries of the layers before it.
#[must_use]
pub fn default_merge(state_props: Props, setter_props: Props, own_props: &Props) -> Props {
    let mut merged = own_props.clone();
    merged.extend_from(&state_props);
    merged.extend_from(&setter_props);
    merged
}

fn identity(state: Option<&State>) -> Props {
    state.map(|state| state.fields().clone()).unwrap_or_default()
}

/// The resolved stages of one decoration.
///
/// Built once by [`decorate`](crate::decorate) and shared read-only by every
/// instance created from that decoration.
#[derive(Debug)]
pub struct StageSet {
    seed: Option<Props>,
    map_state: Handler<MapStateFn>,
    map_setters: Handler<MapSettersFn>,
    merge: Handler<MergeFn>,
    strict: bool,
}

impl StageSet {
    /// Resolves all four stages from their arguments.
    ///
    /// With `strict` set, an invalid argument fails its stage; otherwise the
    /// stage falls back to its default behaviour.
    #[must_use]
    pub fn resolve(
        map_state: &Arg<MapStateFn>,
        map_setters: &Arg<MapSettersFn>,
        merge: &Arg<MergeFn>,
        strict: bool,
    ) -> Self {
        Self {
            seed: state_seed(map_state),
            map_state: resolve(MAP_STATE_TO_PROPS, map_state, MAP_STATE_STRATEGIES),
            map_setters: resolve(MAP_SET_STATE_TO_PROPS, map_setters, MAP_SETTERS_STRATEGIES),
            merge: resolve(MERGE_PROPS, merge, MERGE_STRATEGIES),
            strict,
        }
    }

    /// Produces a fresh initial state, or `None` when no record seeded it.
    #[must_use]
    pub fn initial_state(&self) -> Option<State> {
        self.seed.clone().map(State::new)
    }

    /// Returns the resolved map-state handler.
    #[must_use]
    pub fn map_state_handler(&self) -> &Handler<MapStateFn> {
        &self.map_state
    }

    /// Returns the resolved map-setters handler.
    #[must_use]
    pub fn map_setters_handler(&self) -> &Handler<MapSettersFn> {
        &self.map_setters
    }

    /// Returns the resolved merge handler.
    #[must_use]
    pub fn merge_handler(&self) -> &Handler<MergeFn> {
        &self.merge
    }

    /// Returns whether invalid arguments fail their stage.
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Returns `true` if the map-setters stage generates its default setters.
    ///
    /// This is also the fallback for an invalid argument under non-strict
    /// validation.
    #[must_use]
    pub fn generates_setters(&self) -> bool {
        match &self.map_setters {
            Handler::Function(_) => false,
            Handler::Invalid { .. } => !self.strict,
            _ => true,
        }
    }

    fn check<F>(&self, handler: &Handler<F>, component: &str) -> Result<(), InvalidArgumentError> {
        match handler.check(component) {
            Err(err) if self.strict => Err(err),
            #[cfg_attr(
                not(feature = "tracing"),
                expect(unused_variables, reason = "only read by the warning event")
            )]
            Err(err) => {
                trace_event!(warn, error = %err, "invalid stage argument, using default");
                Ok(())
            }
            Ok(()) => Ok(()),
        }
    }

    /// Runs the map-state stage.
    ///
    /// `state` is `None` for a wrapper without internal state.
    pub fn map_state(
        &self,
        state: Option<&State>,
        own_props: &Props,
        component: &str,
    ) -> Result<Props, InvalidArgumentError> {
        self.check(&self.map_state, component)?;
        Ok(match &self.map_state {
            Handler::Function(f) => f(state, own_props),
            _ => identity(state),
        })
    }

    /// Runs the map-setters stage.
    ///
    /// `generated` is the instance's cached default setter set (see
    /// [`generated_setters`]); it is used whenever no function was supplied.
    pub fn map_setters(
        &self,
        setter: &Setter,
        generated: &Props,
        own_props: &Props,
        component: &str,
    ) -> Result<Props, InvalidArgumentError> {
        self.check(&self.map_setters, component)?;
        Ok(match &self.map_setters {
            Handler::Function(f) => f(setter, own_props),
            _ => generated.clone(),
        })
    }

    /// Runs the merge stage.
    pub fn merge(
        &self,
        state_props: Props,
        setter_props: Props,
        own_props: &Props,
        component: &str,
    ) -> Result<Props, InvalidArgumentError> {
        self.check(&self.merge, component)?;
        Ok(match &self.merge {
            Handler::Function(f) => f(state_props, setter_props, own_props),
            _ => default_merge(state_props, setter_props, own_props),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arg::ArgKind;
    use crate::props;
    use crate::resolve::matching_strategy;
    use alloc::vec;

    #[test]
    fn record_seeds_state_and_everything_else_does_not() {
        assert_eq!(
            state_seed(&Arg::from(props! { message: 1_i32 })),
            Some(props! { message: 1_i32 })
        );
        assert_eq!(state_seed(&Arg::Absent), None);
        assert_eq!(state_seed(&Arg::from(true)), None);
        assert_eq!(state_seed(&Arg::map_state(|_, _| Props::new())), None);
    }

    #[test]
    fn empty_record_is_not_no_state() {
        let stages = StageSet::resolve(
            &Arg::from(Props::new()),
            &Arg::Absent,
            &Arg::Absent,
            true,
        );
        assert_eq!(stages.initial_state().map(|s| s.len()), Some(0));

        let stages = StageSet::resolve(&Arg::Absent, &Arg::Absent, &Arg::Absent, true);
        assert!(stages.initial_state().is_none());
    }

    #[test]
    fn map_state_priority_order() {
        let f = Arg::map_state(|_, _| Props::new());
        assert_eq!(matching_strategy(&f, MAP_STATE_STRATEGIES), Some("function"));
        assert_eq!(
            matching_strategy(&Arg::from(Props::new()), MAP_STATE_STRATEGIES),
            Some("record")
        );
        assert_eq!(
            matching_strategy(&Arg::Absent, MAP_STATE_STRATEGIES),
            Some("absent")
        );
        assert_eq!(matching_strategy(&Arg::from(1), MAP_STATE_STRATEGIES), None);
    }

    #[test]
    fn map_setters_rejects_records() {
        let handler = resolve(
            MAP_SET_STATE_TO_PROPS,
            &Arg::from(Props::new()),
            MAP_SETTERS_STRATEGIES,
        );
        assert!(matches!(
            handler,
            Handler::Invalid {
                argument: MAP_SET_STATE_TO_PROPS,
                kind: ArgKind::Record
            }
        ));
    }

    #[test]
    fn identity_passes_state_through() {
        let stages = StageSet::resolve(
            &Arg::from(props! { message: 1_i32 }),
            &Arg::Absent,
            &Arg::Absent,
            true,
        );
        let state = stages.initial_state();
        let props = stages
            .map_state(state.as_ref(), &Props::new(), "Test")
            .unwrap();
        assert_eq!(props, props! { message: 1_i32 });

        let stateless = StageSet::resolve(&Arg::Absent, &Arg::Absent, &Arg::Absent, true);
        let props = stateless.map_state(None, &Props::new(), "Test").unwrap();
        assert!(props.is_empty());
    }

    #[test]
    fn map_state_function_sees_undefined_for_no_state() {
        let stages = StageSet::resolve(
            &Arg::map_state(|state, _| props! { had_state: state.is_some() }),
            &Arg::Absent,
            &Arg::Absent,
            true,
        );
        assert!(stages.initial_state().is_none());
        let props = stages.map_state(None, &Props::new(), "Test").unwrap();
        assert_eq!(props.get::<bool>("had_state"), Some(&false));
    }

    #[test]
    fn setter_names_capitalize_first_letter() {
        let names = derive_setter_names(["message", "x", "", "énergie"]);
        let setters: Vec<_> = names.iter().map(|n| n.setter.as_str()).collect();
        assert_eq!(setters, ["setMessage", "setX", "set", "setÉnergie"]);
        assert_eq!(names[0].field, "message");
    }

    #[test]
    fn default_merge_precedence() {
        let own = props! { a: 1_i32, b: 1_i32, c: 1_i32 };
        let state = props! { b: 2_i32, c: 2_i32 };
        let setters = props! { c: 3_i32 };

        let merged = default_merge(state, setters, &own);
        assert_eq!(merged.get::<i32>("a"), Some(&1));
        assert_eq!(merged.get::<i32>("b"), Some(&2));
        assert_eq!(merged.get::<i32>("c"), Some(&3));
    }

    #[test]
    fn strict_invalid_stage_fails_with_component_name() {
        let stages = StageSet::resolve(&Arg::from(true), &Arg::Absent, &Arg::Absent, true);
        let err = stages.map_state(None, &Props::new(), "TestComponent").unwrap_err();
        assert_eq!(err.argument, MAP_STATE_TO_PROPS);
        assert_eq!(err.kind, ArgKind::Boolean);
        assert_eq!(err.component, "TestComponent");
    }

    #[test]
    fn lenient_invalid_stage_uses_default() {
        let stages = StageSet::resolve(&Arg::Absent, &Arg::Absent, &Arg::from(123), false);
        let merged = stages
            .merge(props! { a: 2_i32 }, Props::new(), &props! { a: 1_i32 }, "Test")
            .unwrap();
        assert_eq!(merged.get::<i32>("a"), Some(&2));

        let lenient = StageSet::resolve(&Arg::Absent, &Arg::from("x"), &Arg::Absent, false);
        assert!(lenient.generates_setters());
        let strict = StageSet::resolve(&Arg::Absent, &Arg::from("x"), &Arg::Absent, true);
        assert!(!strict.generates_setters());
    }

    #[test]
    fn merge_function_receives_all_layers() {
        let stages = StageSet::resolve(
            &Arg::Absent,
            &Arg::Absent,
            &Arg::merge(|state, setters, own| {
                props! {
                    layers: vec![state.len(), setters.len(), own.len()]
                }
            }),
            true,
        );
        let merged = stages
            .merge(
                props! { a: 1_i32 },
                props! { b: 1_i32, c: 1_i32 },
                &Props::new(),
                "Test",
            )
            .unwrap();
        assert_eq!(merged.get::<Vec<usize>>("layers"), Some(&vec![1, 2, 0]));
    }
}
