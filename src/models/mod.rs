//! Data models for parameterized test execution
//!
//! This module contains all data structures shared by the parser, the
//! executor and the reporting layers.

mod outcome;
mod params;
mod signal;

pub use outcome::{
    Cause, CauseKind, ClassRunSummary, InvocationOutcome, InvocationRecord, InvocationStatus,
    MethodRunResult, MethodVerdict, RunState,
};
pub use params::{ArgValue, FromArg, ParamType, ParameterSpec, TypedArguments};
pub use signal::{
    assume_false, assume_that, assume_true, check, check_eq, SignalKind, TestOutcome, TestSignal,
};
