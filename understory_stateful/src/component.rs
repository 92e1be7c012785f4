// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The component boundary.
//!
//! [`Component`] is the minimal contract a wrapped component offers: render a
//! prop set, report a display name, and expose introspection metadata
//! ("statics") that tooling reads.

use alloc::borrow::Cow;
use alloc::format;
use alloc::string::String;
use core::fmt;

use crate::props::Props;

/// Static names owned by the wrapper itself and never copied from the
/// wrapped component.
pub const RESERVED_STATICS: &[&str] = &["displayName"];

/// A renderable component.
pub trait Component {
    /// What a render produces.
    type Output;

    /// Renders the final prop set.
    fn render(&self, props: &Props) -> Self::Output;

    /// The name tooling shows for this component.
    ///
    /// Defaults to the type's own name without its module path.
    fn display_name(&self) -> Cow<'static, str> {
        Cow::Borrowed(short_type_name(core::any::type_name::<Self>()))
    }

    /// Introspection metadata declared by the component.
    fn statics(&self) -> Props {
        Props::new()
    }
}

/// Strips the module path and generic arguments from a type name.
fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Formats the display name of a wrapper around `wrapped`.
///
/// ```rust
/// use understory_stateful::wrapper_display_name;
///
/// assert_eq!(
///     wrapper_display_name("Connected(TestComponent)"),
///     "Stateful(Connected(TestComponent))"
/// );
/// ```
#[must_use]
pub fn wrapper_display_name(wrapped: &str) -> String {
    format!("Stateful({wrapped})")
}

/// Copies a component's statics, leaving out [`RESERVED_STATICS`].
#[must_use]
pub fn hoist_statics(statics: &Props) -> Props {
    statics
        .iter()
        .filter(|(name, _)| !RESERVED_STATICS.contains(name))
        .map(|(name, value)| (String::from(name), value.clone()))
        .collect()
}

/// A component built from a name and a render closure.
///
/// ```rust
/// use understory_stateful::{Component, fn_component, props};
///
/// let greeting = fn_component("Greeting", |props| {
///     format!("<p>{}</p>", props.get::<String>("name").map_or("", String::as_str))
/// });
/// assert_eq!(greeting.display_name(), "Greeting");
/// assert_eq!(
///     greeting.render(&props! { name: String::from("Ada") }),
///     "<p>Ada</p>"
/// );
/// ```
pub struct FnComponent<F> {
    name: Cow<'static, str>,
    statics: Props,
    render: F,
}

/// Builds a [`FnComponent`].
pub fn fn_component<F, O>(name: impl Into<Cow<'static, str>>, render: F) -> FnComponent<F>
where
    F: Fn(&Props) -> O,
{
    FnComponent {
        name: name.into(),
        statics: Props::new(),
        render,
    }
}

impl<F> FnComponent<F> {
    /// Attaches introspection metadata.
    #[must_use]
    pub fn with_statics(mut self, statics: Props) -> Self {
        self.statics = statics;
        self
    }
}

impl<F, O> Component for FnComponent<F>
where
    F: Fn(&Props) -> O,
{
    type Output = O;

    fn render(&self, props: &Props) -> O {
        (self.render)(props)
    }

    fn display_name(&self) -> Cow<'static, str> {
        self.name.clone()
    }

    fn statics(&self) -> Props {
        self.statics.clone()
    }
}

impl<F> fmt::Debug for FnComponent<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnComponent")
            .field("name", &self.name)
            .field("statics", &self.statics)
            .finish_non_exhaustive()
    }
}
