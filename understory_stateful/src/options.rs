// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decoration options.

use alloc::rc::Rc;
use core::fmt;

use crate::gate::{EqualityFn, EqualityGate};
use crate::props::{Props, State, shallow_equal};

/// Options accepted by [`decorate`](crate::decorate).
///
/// # Example
///
/// ```rust
/// use understory_stateful::Options;
///
/// // Re-render whenever a new state snapshot is committed, even if its
/// // contents are unchanged.
/// let options = Options::new().are_states_equal(|a, b| a.ptr_eq(b));
/// assert!(options.is_pure());
///
/// let impure = Options::new().pure(false);
/// assert!(!impure.is_pure());
/// ```
#[derive(Clone)]
pub struct Options {
    pure: bool,
    strict_validation: bool,
    are_states_equal: EqualityFn<State>,
    are_own_props_equal: EqualityFn<Props>,
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}

impl Options {
    /// Creates the default options.
    ///
    /// - `pure`: `true`
    /// - `strict_validation`: `true`
    /// - `are_states_equal`: [`shallow_equal`] over the state fields
    /// - `are_own_props_equal`: [`shallow_equal`]
    #[must_use]
    pub fn new() -> Self {
        Self {
            pure: true,
            strict_validation: true,
            are_states_equal: Rc::new(|a: &State, b: &State| shallow_equal(a, b)),
            are_own_props_equal: Rc::new(shallow_equal),
        }
    }

    /// Sets whether the update gate may skip renders.
    ///
    /// With `false`, every commit re-renders.
    #[must_use]
    pub fn pure(mut self, pure: bool) -> Self {
        self.pure = pure;
        self
    }

    /// Sets whether an invalid stage argument fails its stage.
    ///
    /// With `false`, the stage falls back to its default behaviour and a
    /// warning event is emitted instead.
    #[must_use]
    pub fn strict_validation(mut self, strict: bool) -> Self {
        self.strict_validation = strict;
        self
    }

    /// Replaces the state equality predicate.
    #[must_use]
    pub fn are_states_equal<F>(mut self, f: F) -> Self
    where
        F: Fn(&State, &State) -> bool + 'static,
    {
        self.are_states_equal = Rc::new(f);
        self
    }

    /// Replaces the own-props equality predicate.
    #[must_use]
    pub fn are_own_props_equal<F>(mut self, f: F) -> Self
    where
        F: Fn(&Props, &Props) -> bool + 'static,
    {
        self.are_own_props_equal = Rc::new(f);
        self
    }

    /// Returns whether the update gate is active.
    #[must_use]
    #[inline]
    pub fn is_pure(&self) -> bool {
        self.pure
    }

    /// Returns whether invalid stage arguments fail.
    #[must_use]
    #[inline]
    pub fn is_strict(&self) -> bool {
        self.strict_validation
    }

    /// Builds the update gate these options describe.
    #[must_use]
    pub fn gate(&self) -> EqualityGate {
        EqualityGate::new(
            self.pure,
            self.are_own_props_equal.clone(),
            self.are_states_equal.clone(),
        )
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("pure", &self.pure)
            .field("strict_validation", &self.strict_validation)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props;

    #[test]
    fn defaults() {
        let options = Options::default();
        assert!(options.is_pure());
        assert!(options.is_strict());
    }

    #[test]
    fn default_state_equality_is_shallow() {
        let gate = Options::new().gate();
        let a = State::new(props! { message: 1_i32 });
        let b = State::new(props! { message: 1_i32 });
        assert!(!gate.should_update(&Props::new(), &Props::new(), Some(&a), Some(&b)));
    }

    #[test]
    fn overridden_predicates_are_used() {
        let gate = Options::new()
            .are_states_equal(|a, b| a.ptr_eq(b))
            .are_own_props_equal(|a, b| core::ptr::eq(a, b))
            .gate();
        let a = State::new(props! { message: 1_i32 });
        let b = State::new(props! { message: 1_i32 });
        let props = Props::new();

        assert!(gate.should_update(&props, &props, Some(&a), Some(&b)));
        assert!(!gate.should_update(&props, &props, Some(&a), Some(&a)));
        assert!(gate.should_update(&props, &Props::new(), Some(&a), Some(&a)));
    }
}
