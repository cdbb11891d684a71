//! Signals raised by test bodies
//!
//! A test body returns `Result<(), TestSignal>`. The error variants carry the
//! three things a body can report besides normal completion, and the invoker
//! tells them apart by pattern matching.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Signal that ends a test body early
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum TestSignal {
    /// A correctness check in the body did not hold
    #[error("assertion failed: {0}")]
    AssertionFailed(String),

    /// A precondition the test declares necessary does not hold
    #[error("assumption violated: {0}")]
    AssumptionViolated(String),

    /// Any other error escaping the body
    #[error("{0}")]
    Error(String),
}

/// Discriminant of a [`TestSignal`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Assertion,
    Assumption,
    Error,
}

impl TestSignal {
    pub fn assertion(message: impl Into<String>) -> Self {
        TestSignal::AssertionFailed(message.into())
    }

    pub fn assumption(message: impl Into<String>) -> Self {
        TestSignal::AssumptionViolated(message.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        TestSignal::Error(message.into())
    }

    pub fn kind(&self) -> SignalKind {
        match self {
            TestSignal::AssertionFailed(_) => SignalKind::Assertion,
            TestSignal::AssumptionViolated(_) => SignalKind::Assumption,
            TestSignal::Error(_) => SignalKind::Error,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            TestSignal::AssertionFailed(m)
            | TestSignal::AssumptionViolated(m)
            | TestSignal::Error(m) => m,
        }
    }
}

impl From<anyhow::Error> for TestSignal {
    fn from(err: anyhow::Error) -> Self {
        TestSignal::Error(format!("{err:#}"))
    }
}

/// Result type returned by test bodies
pub type TestOutcome = Result<(), TestSignal>;

/// Skip the invocation unless `condition` holds
pub fn assume_true(condition: bool) -> TestOutcome {
    assume_that(condition, "expected condition to be true")
}

/// Skip the invocation if `condition` holds
pub fn assume_false(condition: bool) -> TestOutcome {
    assume_that(!condition, "expected condition to be false")
}

/// Skip the invocation with `message` unless `condition` holds
pub fn assume_that(condition: bool, message: impl Into<String>) -> TestOutcome {
    if condition {
        Ok(())
    } else {
        Err(TestSignal::assumption(message))
    }
}

/// Fail the invocation with `message` unless `condition` holds
pub fn check(condition: bool, message: impl Into<String>) -> TestOutcome {
    if condition {
        Ok(())
    } else {
        Err(TestSignal::assertion(message))
    }
}

/// Fail the invocation unless `actual == expected`
pub fn check_eq<T: PartialEq + Debug>(actual: T, expected: T) -> TestOutcome {
    if actual == expected {
        Ok(())
    } else {
        Err(TestSignal::assertion(format!(
            "expected {expected:?} but was {actual:?}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assume_true() {
        assert!(assume_true(true).is_ok());
        let signal = assume_true(false).unwrap_err();
        assert_eq!(signal.kind(), SignalKind::Assumption);
    }

    #[test]
    fn test_assume_false() {
        assert!(assume_false(false).is_ok());
        assert_eq!(
            assume_false(true).unwrap_err().kind(),
            SignalKind::Assumption
        );
    }

    #[test]
    fn test_check_eq_message() {
        let signal = check_eq(1, 2).unwrap_err();
        assert_eq!(signal.kind(), SignalKind::Assertion);
        assert_eq!(signal.message(), "expected 2 but was 1");
    }

    #[test]
    fn test_from_anyhow() {
        let signal: TestSignal = anyhow::anyhow!("disk full").into();
        assert_eq!(signal, TestSignal::Error("disk full".to_string()));
    }
}
