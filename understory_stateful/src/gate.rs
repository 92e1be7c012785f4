// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The update gate.

use alloc::rc::Rc;
use core::fmt;

use crate::props::{Props, State};

/// A binary equality predicate.
pub type EqualityFn<T> = Rc<dyn Fn(&T, &T) -> bool>;

/// Decides whether a commit must re-render.
///
/// A pure gate skips the render only when both the own props and the state
/// compare equal under their predicates. An impure gate always renders.
///
/// ```rust
/// use understory_stateful::{Options, Props, State, props};
///
/// let gate = Options::new().gate();
/// let state = State::new(props! { count: 1_i32 });
/// let bumped = state.merged(&props! { count: 2_i32 });
///
/// assert!(!gate.should_update(&Props::new(), &Props::new(), Some(&state), Some(&state)));
/// assert!(gate.should_update(&Props::new(), &Props::new(), Some(&state), Some(&bumped)));
/// ```
#[derive(Clone)]
pub struct EqualityGate {
    pure: bool,
    props_equal: EqualityFn<Props>,
    state_equal: EqualityFn<State>,
}

impl EqualityGate {
    /// Creates a gate from its predicates.
    #[must_use]
    pub fn new(pure: bool, props_equal: EqualityFn<Props>, state_equal: EqualityFn<State>) -> Self {
        Self {
            pure,
            props_equal,
            state_equal,
        }
    }

    /// Returns whether this gate can skip renders.
    #[must_use]
    #[inline]
    pub fn is_pure(&self) -> bool {
        self.pure
    }

    /// Returns `true` if the own props compare equal.
    #[must_use]
    pub fn props_equal(&self, prev: &Props, next: &Props) -> bool {
        (self.props_equal)(prev, next)
    }

    /// Returns `true` if the states compare equal.
    ///
    /// Two absent states are equal; an absent and a present state are not.
    #[must_use]
    pub fn states_equal(&self, prev: Option<&State>, next: Option<&State>) -> bool {
        match (prev, next) {
            (None, None) => true,
            (Some(prev), Some(next)) => (self.state_equal)(prev, next),
            _ => false,
        }
    }

    /// Returns `true` if moving from the previous to the next props and state
    /// requires a render.
    #[must_use]
    pub fn should_update(
        &self,
        prev_props: &Props,
        next_props: &Props,
        prev_state: Option<&State>,
        next_state: Option<&State>,
    ) -> bool {
        if !self.pure {
            return true;
        }
        !self.props_equal(prev_props, next_props) || !self.states_equal(prev_state, next_state)
    }
}

impl fmt::Debug for EqualityGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EqualityGate")
            .field("pure", &self.pure)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props;
    use crate::props::shallow_equal;

    fn shallow_gate(pure: bool) -> EqualityGate {
        EqualityGate::new(
            pure,
            Rc::new(shallow_equal),
            Rc::new(|a: &State, b: &State| shallow_equal(a, b)),
        )
    }

    #[test]
    fn pure_gate_skips_when_both_equal() {
        let gate = shallow_gate(true);
        let state = State::new(props! { a: 1_i32 });
        let equal = State::new(props! { a: 1_i32 });
        assert!(!gate.should_update(
            &props! { p: 1_i32 },
            &props! { p: 1_i32 },
            Some(&state),
            Some(&equal)
        ));
    }

    #[test]
    fn pure_gate_renders_when_either_differs() {
        let gate = shallow_gate(true);
        let state = State::new(props! { a: 1_i32 });
        let changed = State::new(props! { a: 2_i32 });
        let props = props! { p: 1_i32 };

        assert!(gate.should_update(&props, &props, Some(&state), Some(&changed)));
        assert!(gate.should_update(&props, &props! { p: 2_i32 }, Some(&state), Some(&state)));
    }

    #[test]
    fn impure_gate_always_renders() {
        let gate = shallow_gate(false);
        let props = Props::new();
        assert!(gate.should_update(&props, &props, None, None));
    }

    #[test]
    fn absent_states() {
        let gate = shallow_gate(true);
        let state = State::new(Props::new());
        assert!(gate.states_equal(None, None));
        assert!(!gate.states_equal(None, Some(&state)));
        assert!(!gate.states_equal(Some(&state), None));
    }
}
