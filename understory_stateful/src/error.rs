// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The decoration error type.

use alloc::string::String;
use core::fmt;

use crate::arg::ArgKind;

/// A stage argument had a shape its stage cannot use.
///
/// Raised the first time the offending stage runs, which is the first render
/// of an instance. Building a decoration never fails.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidArgumentError {
    /// The argument role: `mapStateToProps`, `mapSetStateToProps` or `mergeProps`.
    pub argument: &'static str,
    /// The runtime type of the supplied value.
    pub kind: ArgKind,
    /// Display name of the wrapped component.
    pub component: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid value of type {} for {} argument when decorating component {}",
            self.kind, self.argument, self.component
        )
    }
}

impl core::error::Error for InvalidArgumentError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn message_names_argument_type_and_component() {
        let err = InvalidArgumentError {
            argument: "mapStateToProps",
            kind: ArgKind::Boolean,
            component: "TestComponent".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value of type boolean for mapStateToProps argument when decorating component TestComponent"
        );
    }
}
