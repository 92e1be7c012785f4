// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structured event hooks.
//!
//! With the `tracing` feature enabled these forward to the `tracing` crate;
//! without it they compile to nothing.

macro_rules! trace_event {
    ($level:ident, $($arg:tt)+) => {
        #[cfg(feature = "tracing")]
        ::tracing::$level!($($arg)+);
    };
}

pub(crate) use trace_event;
