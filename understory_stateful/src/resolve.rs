// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! First-match resolution of stage arguments.
//!
//! A stage is resolved by running its argument through an ordered list of
//! [`Strategy`] entries. The first strategy that accepts the argument decides
//! the [`Handler`]; when none does, a catch-all produces
//! [`Handler::Invalid`]. Resolution itself never fails: an invalid handler
//! only reports its error once it is invoked against a concrete component.

use alloc::string::String;
use core::fmt;

use crate::arg::{Arg, ArgKind};
use crate::error::InvalidArgumentError;

/// A resolved stage handler.
#[derive(Clone)]
pub enum Handler<F> {
    /// Run the caller's function.
    Function(F),
    /// The argument was a record consumed as the initial state; pass state through.
    DefaultRecord,
    /// Nothing was supplied; use the stage's identity/default behaviour.
    DefaultIdentity,
    /// Nothing was supplied; use a default generated from the initial state.
    GeneratedDefault,
    /// The argument cannot be used by this stage.
    Invalid {
        /// The argument role.
        argument: &'static str,
        /// The runtime type of the rejected value.
        kind: ArgKind,
    },
}

impl<F> Handler<F> {
    /// Returns `true` for [`Handler::Invalid`].
    #[must_use]
    #[inline]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid { .. })
    }

    /// Builds the error this handler stands for, naming `component`.
    ///
    /// Returns `None` unless this is [`Handler::Invalid`].
    #[must_use]
    pub fn error(&self, component: &str) -> Option<InvalidArgumentError> {
        match self {
            Self::Invalid { argument, kind } => Some(InvalidArgumentError {
                argument: *argument,
                kind: *kind,
                component: String::from(component),
            }),
            _ => None,
        }
    }

    /// Fails with [`InvalidArgumentError`] if this is [`Handler::Invalid`].
    pub fn check(&self, component: &str) -> Result<(), InvalidArgumentError> {
        self.error(component).map_or(Ok(()), Err)
    }
}

impl<F> fmt::Debug for Handler<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function(_) => f.debug_tuple("Function").finish_non_exhaustive(),
            Self::DefaultRecord => f.write_str("DefaultRecord"),
            Self::DefaultIdentity => f.write_str("DefaultIdentity"),
            Self::GeneratedDefault => f.write_str("GeneratedDefault"),
            Self::Invalid { argument, kind } => f
                .debug_struct("Invalid")
                .field("argument", argument)
                .field("kind", kind)
                .finish(),
        }
    }
}

/// One entry of a resolution priority list.
pub struct Strategy<F> {
    /// Short label, used in diagnostics and tests.
    pub name: &'static str,
    /// Returns a handler when the argument has the shape this entry accepts.
    pub accept: fn(&Arg<F>) -> Option<Handler<F>>,
}

impl<F> Strategy<F> {
    /// Creates a strategy.
    #[must_use]
    pub const fn new(name: &'static str, accept: fn(&Arg<F>) -> Option<Handler<F>>) -> Self {
        Self { name, accept }
    }
}

impl<F> fmt::Debug for Strategy<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strategy")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Resolves `arg` against `strategies`, top to bottom.
///
/// The first accepting strategy wins. If none accepts, the result is
/// [`Handler::Invalid`] carrying `argument` and the runtime kind of `arg`.
///
/// # Example
///
/// ```rust
/// use understory_stateful::{Arg, Handler, MergeFn, Strategy, resolve};
///
/// fn when_absent(arg: &Arg<MergeFn>) -> Option<Handler<MergeFn>> {
///     arg.is_absent().then_some(Handler::DefaultIdentity)
/// }
///
/// let strategies = [Strategy::new("absent", when_absent)];
///
/// let ok = resolve("mergeProps", &Arg::Absent, &strategies);
/// assert!(matches!(ok, Handler::DefaultIdentity));
///
/// let bad = resolve("mergeProps", &Arg::from(true), &strategies);
/// let err = bad.error("Button").unwrap();
/// assert_eq!(err.argument, "mergeProps");
/// assert_eq!(err.kind.name(), "boolean");
/// ```
#[must_use]
pub fn resolve<F>(argument: &'static str, arg: &Arg<F>, strategies: &[Strategy<F>]) -> Handler<F> {
    strategies
        .iter()
        .find_map(|strategy| (strategy.accept)(arg))
        .unwrap_or_else(|| Handler::Invalid {
            argument,
            kind: arg.kind(),
        })
}

/// Returns the name of the strategy that accepts `arg`, if any.
///
/// `None` means the catch-all applies.
#[must_use]
pub fn matching_strategy<F>(arg: &Arg<F>, strategies: &[Strategy<F>]) -> Option<&'static str> {
    strategies
        .iter()
        .find(|strategy| (strategy.accept)(arg).is_some())
        .map(|strategy| strategy.name)
}

/// Accepts [`Arg::Function`] and runs it as-is.
pub fn when_function<F: Clone>(arg: &Arg<F>) -> Option<Handler<F>> {
    arg.as_function().cloned().map(Handler::Function)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arg::MergeFn;
    use crate::props::Props;

    fn when_absent(arg: &Arg<MergeFn>) -> Option<Handler<MergeFn>> {
        arg.is_absent().then_some(Handler::DefaultIdentity)
    }

    fn when_anything(_: &Arg<MergeFn>) -> Option<Handler<MergeFn>> {
        Some(Handler::GeneratedDefault)
    }

    const ORDERED: &[Strategy<MergeFn>] = &[
        Strategy::new("function", when_function),
        Strategy::new("absent", when_absent),
        Strategy::new("anything", when_anything),
    ];

    #[test]
    fn first_accepting_strategy_wins() {
        let f = Arg::merge(|s, _, _| s);
        assert!(matches!(resolve("mergeProps", &f, ORDERED), Handler::Function(_)));
        assert!(matches!(
            resolve("mergeProps", &Arg::Absent, ORDERED),
            Handler::DefaultIdentity
        ));
        assert!(matches!(
            resolve("mergeProps", &Arg::from(1), ORDERED),
            Handler::GeneratedDefault
        ));
    }

    #[test]
    fn catch_all_is_invalid() {
        let handler = resolve("mergeProps", &Arg::from("wrong"), &ORDERED[..2]);
        assert!(handler.is_invalid());

        let err = handler.error("Widget").unwrap();
        assert_eq!(err.argument, "mergeProps");
        assert_eq!(err.kind, ArgKind::String);
        assert_eq!(err.component, "Widget");
    }

    #[test]
    fn empty_list_always_invalid() {
        let handler = resolve("mergeProps", &Arg::<MergeFn>::Absent, &[]);
        assert!(matches!(
            handler,
            Handler::Invalid {
                kind: ArgKind::Undefined,
                ..
            }
        ));
    }

    #[test]
    fn valid_handlers_have_no_error() {
        let handler = resolve("mergeProps", &Arg::Absent, ORDERED);
        assert!(handler.error("Widget").is_none());
        assert!(handler.check("Widget").is_ok());

        let invalid = resolve("mergeProps", &Arg::from(false), &ORDERED[..1]);
        assert_eq!(invalid.check("Widget").unwrap_err().kind, ArgKind::Boolean);
    }

    #[test]
    fn matching_strategy_reports_names() {
        assert_eq!(matching_strategy(&Arg::Absent, ORDERED), Some("absent"));
        assert_eq!(
            matching_strategy(&Arg::from(Props::new()), &ORDERED[..2]),
            None
        );
    }
}
