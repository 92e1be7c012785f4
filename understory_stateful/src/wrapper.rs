// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The stateful wrapper instance and its setter.
//!
//! A [`Stateful`] instance owns one internal state, runs the three stages on
//! every render, and consults the update gate before each commit. Its
//! [`Setter`] is the only way to change that state: calls are queued, and the
//! host applies them with [`Stateful::flush`] or [`Stateful::receive_props`],
//! so several calls between two commits collapse into one state snapshot.
//!
//! ## Lifecycle
//!
//! ```text
//! Constructed --mount--> Mounted --(receive_props | flush | force_render)*--> unmount
//! ```
//!
//! [`Stateful::unmount`] consumes the instance. Setters still held elsewhere
//! turn into no-ops.

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use crate::component::Component;
use crate::error::InvalidArgumentError;
use crate::gate::EqualityGate;
use crate::props::{Props, State};
use crate::stages::{SetterName, StageSet, derive_setter_names, generated_setters};
use crate::trace::trace_event;

/// Where an instance is in its lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    /// Built, state initialized, nothing rendered yet.
    Constructed,
    /// Rendered at least once.
    Mounted,
}

/// The outcome of a commit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Commit {
    /// The stages ran and the wrapped component rendered.
    Rendered,
    /// The update gate found nothing to render.
    Skipped,
}

/// Queued setter calls of one instance.
struct UpdateQueue {
    /// `false` when the instance has no internal state; such an instance
    /// never acquires one.
    stateful: bool,
    pending: Vec<Props>,
    on_request: Option<Rc<dyn Fn()>>,
}

/// The bound state setter of one [`Stateful`] instance.
///
/// [`Setter::set`] shallow-merges a partial record into the instance's state
/// at the next commit and asks the host for a render. Unknown field names are
/// accepted and added to the state.
///
/// Setters compare equal when they belong to the same instance.
#[derive(Clone)]
pub struct Setter {
    queue: Weak<RefCell<UpdateQueue>>,
}

impl Setter {
    /// Queues `partial` to be merged into the state.
    ///
    /// Does nothing once the instance is unmounted, or when the instance has
    /// no internal state.
    pub fn set(&self, partial: Props) {
        let Some(queue) = self.queue.upgrade() else {
            trace_event!(debug, "setter called after unmount, update dropped");
            return;
        };
        let hook = {
            let mut queue = queue.borrow_mut();
            if !queue.stateful {
                trace_event!(debug, "setter called on an instance without state, update dropped");
                return;
            }
            queue.pending.push(partial);
            queue.on_request.clone()
        };
        if let Some(hook) = hook {
            hook();
        }
    }

    /// Returns `true` while the owning instance is alive.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.queue.strong_count() > 0
    }
}

impl PartialEq for Setter {
    fn eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.queue, &other.queue)
    }
}

impl fmt::Debug for Setter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setter")
            .field("live", &self.is_live())
            .finish()
    }
}

/// A live instance of a decorated component.
///
/// Created by [`StatefulComponent::construct`](crate::StatefulComponent::construct).
pub struct Stateful<C: Component> {
    component: Rc<C>,
    stages: Rc<StageSet>,
    gate: EqualityGate,
    wrapped_name: Rc<str>,
    display_name: Rc<str>,
    lifecycle: Lifecycle,
    state: Option<State>,
    own_props: Props,
    queue: Rc<RefCell<UpdateQueue>>,
    setter: Setter,
    setter_names: Vec<SetterName>,
    generated: Props,
    last_props: Option<Props>,
    output: Option<C::Output>,
    renders: usize,
}

impl<C: Component> Stateful<C> {
    pub(crate) fn new(
        component: Rc<C>,
        stages: Rc<StageSet>,
        gate: EqualityGate,
        wrapped_name: Rc<str>,
        display_name: Rc<str>,
    ) -> Self {
        let state = stages.initial_state();
        let queue = Rc::new(RefCell::new(UpdateQueue {
            stateful: state.is_some(),
            pending: Vec::new(),
            on_request: None,
        }));
        let setter = Setter {
            queue: Rc::downgrade(&queue),
        };
        let setter_names = state
            .as_ref()
            .map(|state| derive_setter_names(state.keys()))
            .unwrap_or_default();
        let generated = if stages.generates_setters() {
            generated_setters(&setter, &setter_names)
        } else {
            Props::new()
        };
        Self {
            component,
            stages,
            gate,
            wrapped_name,
            display_name,
            lifecycle: Lifecycle::Constructed,
            state,
            own_props: Props::new(),
            queue,
            setter,
            setter_names,
            generated,
            last_props: None,
            output: None,
            renders: 0,
        }
    }

    /// Returns the lifecycle phase.
    #[must_use]
    #[inline]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Returns the wrapper's display name, `Stateful(<wrapped>)`.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the wrapped component's display name.
    #[must_use]
    pub fn wrapped_name(&self) -> &str {
        &self.wrapped_name
    }

    /// Returns the committed internal state, or `None` when the instance has none.
    #[must_use]
    pub fn state(&self) -> Option<&State> {
        self.state.as_ref()
    }

    /// Returns the committed own props.
    #[must_use]
    pub fn own_props(&self) -> &Props {
        &self.own_props
    }

    /// Returns the prop set passed to the wrapped component by the last render.
    #[must_use]
    pub fn last_props(&self) -> Option<&Props> {
        self.last_props.as_ref()
    }

    /// Returns the output of the last render.
    #[must_use]
    pub fn output(&self) -> Option<&C::Output> {
        self.output.as_ref()
    }

    /// Returns how many times the stages have run.
    #[must_use]
    #[inline]
    pub fn renders(&self) -> usize {
        self.renders
    }

    /// Returns the bound setter.
    #[must_use]
    pub fn setter(&self) -> &Setter {
        &self.setter
    }

    /// Returns the generated setter names, one per initial state field.
    #[must_use]
    pub fn setter_names(&self) -> &[SetterName] {
        &self.setter_names
    }

    /// Returns `true` if setter calls are waiting for a commit.
    #[must_use]
    pub fn has_pending_update(&self) -> bool {
        !self.queue.borrow().pending.is_empty()
    }

    /// Registers the hook a setter call uses to ask the host for a render.
    ///
    /// Replaces any earlier hook. The hook runs after the update is queued.
    pub fn on_render_requested(&mut self, hook: impl Fn() + 'static) {
        self.queue.borrow_mut().on_request = Some(Rc::new(hook));
    }

    /// Renders for the first time with `own_props`.
    ///
    /// The first render is never gated. Calling this on a mounted instance
    /// behaves like [`Stateful::receive_props`].
    pub fn mount(&mut self, own_props: Props) -> Result<Commit, InvalidArgumentError> {
        if self.lifecycle == Lifecycle::Mounted {
            return self.receive_props(own_props);
        }
        self.state = self.next_state();
        self.own_props = own_props;
        self.render()?;
        self.lifecycle = Lifecycle::Mounted;
        Ok(Commit::Rendered)
    }

    /// Commits new own props together with any queued setter calls.
    ///
    /// On a constructed instance this mounts.
    pub fn receive_props(&mut self, own_props: Props) -> Result<Commit, InvalidArgumentError> {
        if self.lifecycle == Lifecycle::Constructed {
            return self.mount(own_props);
        }
        let next_state = self.next_state();
        self.commit(own_props, next_state)
    }

    /// Commits queued setter calls.
    ///
    /// Returns [`Commit::Skipped`] without consulting the gate when nothing is
    /// queued. Before mount the state is updated but nothing renders.
    pub fn flush(&mut self) -> Result<Commit, InvalidArgumentError> {
        if !self.has_pending_update() {
            return Ok(Commit::Skipped);
        }
        let next_state = self.next_state();
        if self.lifecycle == Lifecycle::Constructed {
            self.state = next_state;
            return Ok(Commit::Skipped);
        }
        let own_props = self.own_props.clone();
        self.commit(own_props, next_state)
    }

    /// Applies queued setter calls and renders regardless of the gate.
    pub fn force_render(&mut self) -> Result<Commit, InvalidArgumentError> {
        self.state = self.next_state();
        self.render()?;
        self.lifecycle = Lifecycle::Mounted;
        Ok(Commit::Rendered)
    }

    /// Tears the instance down.
    ///
    /// Outstanding setters become no-ops.
    pub fn unmount(self) {
        trace_event!(debug, component = %self.display_name, renders = self.renders, "unmounted");
    }

    /// Drains the queue into one snapshot.
    ///
    /// With nothing queued the current snapshot is returned as-is, so
    /// identity-based state predicates see it as unchanged.
    fn next_state(&mut self) -> Option<State> {
        let pending = core::mem::take(&mut self.queue.borrow_mut().pending);
        let state = self.state.as_ref()?;
        if pending.is_empty() {
            return Some(state.clone());
        }
        let mut fields = state.fields().clone();
        for partial in &pending {
            fields.extend_from(partial);
        }
        Some(State::new(fields))
    }

    fn commit(
        &mut self,
        own_props: Props,
        next_state: Option<State>,
    ) -> Result<Commit, InvalidArgumentError> {
        let update = self.gate.should_update(
            &self.own_props,
            &own_props,
            self.state.as_ref(),
            next_state.as_ref(),
        );
        self.own_props = own_props;
        self.state = next_state;
        if !update {
            trace_event!(debug, component = %self.display_name, "render skipped by update gate");
            return Ok(Commit::Skipped);
        }
        self.render()?;
        Ok(Commit::Rendered)
    }

    fn render(&mut self) -> Result<(), InvalidArgumentError> {
        let name = &*self.wrapped_name;
        let state_props = self
            .stages
            .map_state(self.state.as_ref(), &self.own_props, name)?;
        let setter_props =
            self.stages
                .map_setters(&self.setter, &self.generated, &self.own_props, name)?;
        let props = self
            .stages
            .merge(state_props, setter_props, &self.own_props, name)?;
        self.output = Some(self.component.render(&props));
        self.last_props = Some(props);
        self.renders += 1;
        trace_event!(trace, component = %self.display_name, renders = self.renders, "rendered");
        Ok(())
    }
}

impl<C: Component> fmt::Debug for Stateful<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stateful")
            .field("display_name", &self.display_name)
            .field("lifecycle", &self.lifecycle)
            .field("state", &self.state)
            .field("own_props", &self.own_props)
            .field("renders", &self.renders)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props;

    #[test]
    fn setter_is_dead_without_queue() {
        let queue = Rc::new(RefCell::new(UpdateQueue {
            stateful: true,
            pending: Vec::new(),
            on_request: None,
        }));
        let setter = Setter {
            queue: Rc::downgrade(&queue),
        };
        assert!(setter.is_live());

        setter.set(props! { a: 1_i32 });
        assert_eq!(queue.borrow().pending.len(), 1);

        drop(queue);
        assert!(!setter.is_live());
        setter.set(props! { a: 2_i32 });
    }

    #[test]
    fn stateless_queue_drops_updates() {
        let queue = Rc::new(RefCell::new(UpdateQueue {
            stateful: false,
            pending: Vec::new(),
            on_request: None,
        }));
        let setter = Setter {
            queue: Rc::downgrade(&queue),
        };
        setter.set(props! { a: 1_i32 });
        assert!(queue.borrow().pending.is_empty());
    }

    #[test]
    fn setters_of_one_queue_are_equal() {
        let queue = Rc::new(RefCell::new(UpdateQueue {
            stateful: true,
            pending: Vec::new(),
            on_request: None,
        }));
        let other = Rc::new(RefCell::new(UpdateQueue {
            stateful: true,
            pending: Vec::new(),
            on_request: None,
        }));
        let a = Setter {
            queue: Rc::downgrade(&queue),
        };
        let b = a.clone();
        let c = Setter {
            queue: Rc::downgrade(&other),
        };
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
