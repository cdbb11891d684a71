//! Run notification channel
//!
//! The host-side reporting interface. Every invocation is reported as its
//! own node: started, exactly one of passed/failed/assumption-failed, then
//! finished.

use std::sync::Mutex;
use tracing::{debug, info, warn};

use crate::models::{Cause, ClassRunSummary, InvocationStatus, MethodRunResult};
use crate::params::ConfigurationError;

use super::descriptor::InvocationDescriptor;

/// Receiver of run progress reports
pub trait RunNotifier: Send + Sync {
    fn class_started(&self, _class: &str) {}

    fn class_finished(&self, _summary: &ClassRunSummary) {}

    fn method_started(&self, _class: &str, _method: &str, _invocations: usize) {}

    /// Reported once when a configuration error prevents any invocation
    fn method_aborted(&self, _class: &str, _method: &str, _error: &ConfigurationError) {}

    fn method_finished(&self, _result: &MethodRunResult) {}

    fn invocation_started(&self, _descriptor: &InvocationDescriptor) {}

    fn invocation_passed(&self, _descriptor: &InvocationDescriptor) {}

    fn invocation_failed(&self, _descriptor: &InvocationDescriptor, _cause: &Cause) {}

    /// Skipped channel: the invocation's precondition did not hold
    fn assumption_failed(&self, _descriptor: &InvocationDescriptor, _cause: &Cause) {}

    fn invocation_finished(&self, _descriptor: &InvocationDescriptor, _duration_ms: u64) {}
}

/// Notifier that discards everything
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentNotifier;

impl RunNotifier for SilentNotifier {}

/// Recorded notification
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunEvent {
    ClassStarted { class: String },
    ClassFinished { class: String },
    MethodStarted { method: String, invocations: usize },
    MethodAborted { method: String, error: String },
    MethodFinished { method: String },
    InvocationStarted { label: String },
    InvocationPassed { label: String },
    InvocationFailed { label: String, cause: Cause },
    AssumptionFailed { label: String, cause: Cause },
    InvocationFinished { label: String },
}

impl RunEvent {
    /// Outcome carried by this event, if it is an outcome report
    pub fn outcome_status(&self) -> Option<InvocationStatus> {
        match self {
            RunEvent::InvocationPassed { .. } => Some(InvocationStatus::Pass),
            RunEvent::InvocationFailed { .. } => Some(InvocationStatus::Fail),
            RunEvent::AssumptionFailed { .. } => Some(InvocationStatus::Skip),
            _ => None,
        }
    }

    fn label(&self) -> Option<&str> {
        match self {
            RunEvent::InvocationPassed { label }
            | RunEvent::InvocationFailed { label, .. }
            | RunEvent::AssumptionFailed { label, .. } => Some(label),
            _ => None,
        }
    }
}

/// Notifier that keeps every event in order
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<RunEvent>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: RunEvent) {
        // a poisoned log is still a valid log
        let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        events.push(event);
    }

    pub fn events(&self) -> Vec<RunEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Outcome reports as `(label, status)` in the order they were made
    pub fn outcome_reports(&self) -> Vec<(String, InvocationStatus)> {
        self.events()
            .iter()
            .filter_map(|e| Some((e.label()?.to_string(), e.outcome_status()?)))
            .collect()
    }

    pub fn aborted_methods(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                RunEvent::MethodAborted { method, .. } => Some(method),
                _ => None,
            })
            .collect()
    }
}

impl RunNotifier for RecordingNotifier {
    fn class_started(&self, class: &str) {
        self.push(RunEvent::ClassStarted {
            class: class.to_string(),
        });
    }

    fn class_finished(&self, summary: &ClassRunSummary) {
        self.push(RunEvent::ClassFinished {
            class: summary.class.clone(),
        });
    }

    fn method_started(&self, _class: &str, method: &str, invocations: usize) {
        self.push(RunEvent::MethodStarted {
            method: method.to_string(),
            invocations,
        });
    }

    fn method_aborted(&self, _class: &str, method: &str, error: &ConfigurationError) {
        self.push(RunEvent::MethodAborted {
            method: method.to_string(),
            error: error.to_string(),
        });
    }

    fn method_finished(&self, result: &MethodRunResult) {
        self.push(RunEvent::MethodFinished {
            method: result.method.clone(),
        });
    }

    fn invocation_started(&self, descriptor: &InvocationDescriptor) {
        self.push(RunEvent::InvocationStarted {
            label: descriptor.label.clone(),
        });
    }

    fn invocation_passed(&self, descriptor: &InvocationDescriptor) {
        self.push(RunEvent::InvocationPassed {
            label: descriptor.label.clone(),
        });
    }

    fn invocation_failed(&self, descriptor: &InvocationDescriptor, cause: &Cause) {
        self.push(RunEvent::InvocationFailed {
            label: descriptor.label.clone(),
            cause: cause.clone(),
        });
    }

    fn assumption_failed(&self, descriptor: &InvocationDescriptor, cause: &Cause) {
        self.push(RunEvent::AssumptionFailed {
            label: descriptor.label.clone(),
            cause: cause.clone(),
        });
    }

    fn invocation_finished(&self, descriptor: &InvocationDescriptor, _duration_ms: u64) {
        self.push(RunEvent::InvocationFinished {
            label: descriptor.label.clone(),
        });
    }
}

/// Notifier that logs through `tracing`
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl RunNotifier for TracingNotifier {
    fn class_started(&self, class: &str) {
        info!("Running {}", class);
    }

    fn class_finished(&self, summary: &ClassRunSummary) {
        info!(
            "{} completed in {}ms - Pass: {} | Fail: {} | Skip: {}",
            summary.class,
            summary.total_duration_ms,
            summary.passed,
            summary.failed,
            summary.skipped
        );
    }

    fn method_started(&self, class: &str, method: &str, invocations: usize) {
        debug!("{}::{} ({} invocations)", class, method, invocations);
    }

    fn method_aborted(&self, class: &str, method: &str, error: &ConfigurationError) {
        warn!("{}::{} aborted: {}", class, method, error);
    }

    fn method_finished(&self, result: &MethodRunResult) {
        info!("  {}", result);
    }

    fn invocation_passed(&self, descriptor: &InvocationDescriptor) {
        debug!("    ✓ {}", descriptor.label);
    }

    fn invocation_failed(&self, descriptor: &InvocationDescriptor, cause: &Cause) {
        warn!("    ✗ {} - {}", descriptor.label, cause);
    }

    fn assumption_failed(&self, descriptor: &InvocationDescriptor, cause: &Cause) {
        debug!("    ○ {} - {}", descriptor.label, cause);
    }
}
