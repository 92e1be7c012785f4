// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stateful counter.
//!
//! Decorate a stateless counter view with local state, then drive it the way
//! a host would: mount, click, commit, and re-render with new props.
//!
//! Run:
//! - `RUST_LOG=understory_stateful=trace cargo run -p understory_demos --example counter`

use std::cell::RefCell;
use std::rc::Rc;

use understory_stateful::{
    Arg, Callback, Commit, Component, Decoration, Options, Props, Stateful, Value, fn_component,
    props,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .init();

    // `step` comes from the parent; `count` is local state.
    let decoration = Decoration::builder()
        .initial_state(props! { count: 0_i32 })
        .map_setters(Arg::map_setters(|setter, own| {
            let step = own.get::<i32>("step").copied().unwrap_or(1);
            let setter = setter.clone();
            props! {
                onIncrement: Callback::new(move |value: Value| {
                    let current = value.downcast_ref::<i32>().copied().unwrap_or_default();
                    setter.set(props! { count: current + step });
                }),
            }
        }))
        .options(Options::default())
        .build();

    // The view keeps the increment handler it was last given, like a button would.
    let handler: Rc<RefCell<Option<(Callback, i32)>>> = Rc::default();
    let view_handler = handler.clone();
    let counter = decoration.wrap(fn_component("CounterView", move |props: &Props| {
        let count = props.get::<i32>("count").copied().unwrap_or_default();
        if let Some(on_increment) = props.get::<Callback>("onIncrement") {
            *view_handler.borrow_mut() = Some((on_increment.clone(), count));
        }
        format!("[ {count} ] (+{})", props.get::<i32>("step").copied().unwrap_or(1))
    }));
    println!("Decorated: {}", counter.display_name());

    let mut instance = counter.construct();
    let requested = Rc::new(RefCell::new(0_u32));
    let requests = requested.clone();
    instance.on_render_requested(move || *requests.borrow_mut() += 1);

    if let Err(err) = instance.mount(props! { step: 1_i32 }) {
        eprintln!("mount failed: {err}");
        return;
    }
    report("mount", &instance, Commit::Rendered);

    for _ in 0..3 {
        click(&handler);
        match instance.flush() {
            Ok(commit) => report("click", &instance, commit),
            Err(err) => eprintln!("flush failed: {err}"),
        }
    }

    // Same props and no pending update: the gate skips the render.
    match instance.receive_props(props! { step: 1_i32 }) {
        Ok(commit) => report("same props", &instance, commit),
        Err(err) => eprintln!("update failed: {err}"),
    }

    // A new step changes the handler the view receives.
    match instance.receive_props(props! { step: 10_i32 }) {
        Ok(commit) => report("step 10", &instance, commit),
        Err(err) => eprintln!("update failed: {err}"),
    }
    click(&handler);
    match instance.flush() {
        Ok(commit) => report("click", &instance, commit),
        Err(err) => eprintln!("flush failed: {err}"),
    }

    println!("Render requests: {}", requested.borrow());
    let setter = instance.setter().clone();
    instance.unmount();
    println!("Setter live after unmount: {}", setter.is_live());
}

fn click(handler: &Rc<RefCell<Option<(Callback, i32)>>>) {
    if let Some((on_increment, count)) = handler.borrow().as_ref() {
        on_increment.call(Value::new(*count));
    }
}

fn report<C>(label: &str, instance: &Stateful<C>, commit: Commit)
where
    C: Component<Output = String>,
{
    println!(
        "{label:>10}: {commit:?} -> {} (renders: {})",
        instance.output().map_or("", String::as_str),
        instance.renders()
    );
}
