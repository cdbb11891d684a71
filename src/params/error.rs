//! Configuration errors
//!
//! Raised while preparing a method run, before any invocation executes.

use thiserror::Error;

/// Problems with a parameter declaration that abort the whole method run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("no parameter sets declared")]
    NoParameters,

    #[error("parameter set {set}: expected {expected} argument(s) but found {actual}")]
    ArityMismatch {
        set: usize,
        expected: usize,
        actual: usize,
    },

    #[error(
        "parameter set {set}, argument {position}: cannot convert {token:?} to {target}: {reason}"
    )]
    Conversion {
        set: usize,
        position: usize,
        token: String,
        target: String,
        reason: String,
    },

    #[error("argument {position}: no converter registered for type {type_name}")]
    MissingConverter { type_name: String, position: usize },

    #[error("method has no test body")]
    MissingBody,

    #[error("invalid parameter syntax: {0}")]
    InvalidSyntax(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ConfigurationError::ArityMismatch {
            set: 1,
            expected: 2,
            actual: 1,
        };
        assert_eq!(
            err.to_string(),
            "parameter set 1: expected 2 argument(s) but found 1"
        );

        let err = ConfigurationError::Conversion {
            set: 0,
            position: 0,
            token: "notabool".to_string(),
            target: "bool".to_string(),
            reason: "expected true or false".to_string(),
        };
        assert!(err.to_string().contains("\"notabool\""));
    }
}
