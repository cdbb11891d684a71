//! Outcome models
//!
//! Per-invocation outcomes, method-level results and class summaries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What produced a non-passing outcome
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CauseKind {
    Assertion,
    Assumption,
    Unexpected,
    Panic,
    Instantiation,
}

/// Cause retained for reporting
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cause {
    pub kind: CauseKind,
    pub message: String,
}

impl Cause {
    pub fn new(kind: CauseKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            CauseKind::Assertion => write!(f, "assertion failed: {}", self.message),
            CauseKind::Assumption => write!(f, "assumption violated: {}", self.message),
            CauseKind::Unexpected => write!(f, "error: {}", self.message),
            CauseKind::Panic => write!(f, "panicked: {}", self.message),
            CauseKind::Instantiation => {
                write!(f, "could not create test instance: {}", self.message)
            }
        }
    }
}

/// Classified result of one invocation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "cause", rename_all = "snake_case")]
pub enum InvocationOutcome {
    Passed,
    Failed(Cause),
    AssumptionViolated(Cause),
}

impl InvocationOutcome {
    pub fn status(&self) -> InvocationStatus {
        match self {
            InvocationOutcome::Passed => InvocationStatus::Pass,
            InvocationOutcome::Failed(_) => InvocationStatus::Fail,
            InvocationOutcome::AssumptionViolated(_) => InvocationStatus::Skip,
        }
    }

    pub fn cause(&self) -> Option<&Cause> {
        match self {
            InvocationOutcome::Passed => None,
            InvocationOutcome::Failed(cause) | InvocationOutcome::AssumptionViolated(cause) => {
                Some(cause)
            }
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, InvocationOutcome::Failed(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, InvocationOutcome::AssumptionViolated(_))
    }
}

/// Reporting status of an invocation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvocationStatus {
    Pass,
    Fail,
    Skip,
}

impl InvocationStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            InvocationStatus::Pass => "✓",
            InvocationStatus::Fail => "✗",
            InvocationStatus::Skip => "○",
        }
    }
}

impl fmt::Display for InvocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvocationStatus::Pass => write!(f, "PASS"),
            InvocationStatus::Fail => write!(f, "FAIL"),
            InvocationStatus::Skip => write!(f, "SKIP"),
        }
    }
}

/// One finished invocation as stored in a method result
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InvocationRecord {
    pub index: usize,
    pub label: String,
    pub outcome: InvocationOutcome,
    pub duration_ms: u64,
}

impl fmt::Display for InvocationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self.outcome.status();
        write!(
            f,
            "{} {} {} [{}ms]",
            status.symbol(),
            status,
            self.label,
            self.duration_ms
        )?;
        if let Some(cause) = self.outcome.cause() {
            write!(f, " - {cause}")?;
        }
        Ok(())
    }
}

/// Lifecycle state of a method run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunState {
    NotStarted,
    Running { consumed: usize },
    Completed,
    Aborted,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Completed | RunState::Aborted)
    }
}

/// Method-level visible result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodVerdict {
    Passed,
    PassedWithSkips,
    Failed,
    Aborted,
}

impl MethodVerdict {
    /// Aggregate invocation outcomes into a method verdict.
    ///
    /// Any failure fails the method. Assumption violations never do.
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a InvocationOutcome>) -> Self {
        let mut skipped = false;
        for outcome in outcomes {
            match outcome {
                InvocationOutcome::Failed(_) => return MethodVerdict::Failed,
                InvocationOutcome::AssumptionViolated(_) => skipped = true,
                InvocationOutcome::Passed => {}
            }
        }

        if skipped {
            MethodVerdict::PassedWithSkips
        } else {
            MethodVerdict::Passed
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, MethodVerdict::Failed | MethodVerdict::Aborted)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            MethodVerdict::Passed => "✓",
            MethodVerdict::PassedWithSkips => "◐",
            MethodVerdict::Failed => "✗",
            MethodVerdict::Aborted => "!",
        }
    }
}

impl fmt::Display for MethodVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodVerdict::Passed => write!(f, "PASSED"),
            MethodVerdict::PassedWithSkips => write!(f, "PASSED (with skips)"),
            MethodVerdict::Failed => write!(f, "FAILED"),
            MethodVerdict::Aborted => write!(f, "ABORTED"),
        }
    }
}

/// Finalized result of running one parameterized method
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MethodRunResult {
    pub class: String,
    pub method: String,
    pub state: RunState,
    pub verdict: MethodVerdict,
    pub invocations: Vec<InvocationRecord>,
    /// Set when cancellation stopped the run before every invocation executed
    pub interrupted: bool,
    /// Configuration error that aborted the run
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl MethodRunResult {
    pub fn outcomes(&self) -> impl Iterator<Item = &InvocationOutcome> {
        self.invocations.iter().map(|r| &r.outcome)
    }

    pub fn count(&self, status: InvocationStatus) -> usize {
        self.outcomes().filter(|o| o.status() == status).count()
    }
}

impl fmt::Display for MethodRunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.verdict.symbol(), self.method, self.verdict)?;
        if let Some(error) = &self.error {
            write!(f, " - {error}")?;
        }
        if self.interrupted {
            write!(f, " (interrupted)")?;
        }
        Ok(())
    }
}

/// Summary of one test class run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClassRunSummary {
    pub class: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub methods_total: usize,
    pub methods_failed: usize,
    pub methods_aborted: usize,
    pub total_duration_ms: u64,
    pub methods: Vec<MethodRunResult>,
}

impl ClassRunSummary {
    pub fn new(class: impl Into<String>, methods: Vec<MethodRunResult>, duration_ms: u64) -> Self {
        let count = |status| methods.iter().map(|m| m.count(status)).sum::<usize>();
        let passed = count(InvocationStatus::Pass);
        let failed = count(InvocationStatus::Fail);
        let skipped = count(InvocationStatus::Skip);
        let methods_failed = methods
            .iter()
            .filter(|m| m.verdict == MethodVerdict::Failed)
            .count();
        let methods_aborted = methods
            .iter()
            .filter(|m| m.verdict == MethodVerdict::Aborted)
            .count();

        Self {
            class: class.into(),
            total: passed + failed + skipped,
            passed,
            failed,
            skipped,
            methods_total: methods.len(),
            methods_failed,
            methods_aborted,
            total_duration_ms: duration_ms,
            methods,
        }
    }

    /// Passed share of executed, non-skipped invocations
    pub fn pass_rate(&self) -> f64 {
        let executed = self.passed + self.failed;
        if executed == 0 {
            0.0
        } else {
            (self.passed as f64 / executed as f64) * 100.0
        }
    }

    pub fn is_successful(&self) -> bool {
        self.methods_failed == 0 && self.methods_aborted == 0
    }
}

impl fmt::Display for ClassRunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.class)?;
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        for method in &self.methods {
            writeln!(f, "  {method}")?;
            for record in &method.invocations {
                writeln!(f, "    {record}")?;
            }
        }
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(
            f,
            "Total: {} | Pass: {} | Fail: {} | Skip: {} | Aborted methods: {}",
            self.total, self.passed, self.failed, self.skipped, self.methods_aborted
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(index: usize, outcome: InvocationOutcome) -> InvocationRecord {
        InvocationRecord {
            index,
            label: format!("[{index}]"),
            outcome,
            duration_ms: 1,
        }
    }

    fn skipped() -> InvocationOutcome {
        InvocationOutcome::AssumptionViolated(Cause::new(CauseKind::Assumption, "no"))
    }

    fn failed() -> InvocationOutcome {
        InvocationOutcome::Failed(Cause::new(CauseKind::Assertion, "boom"))
    }

    #[test]
    fn test_verdict_all_passed() {
        let outcomes = [InvocationOutcome::Passed, InvocationOutcome::Passed];
        assert_eq!(MethodVerdict::from_outcomes(&outcomes), MethodVerdict::Passed);
    }

    #[test]
    fn test_verdict_skip_is_not_failure() {
        let outcomes = [InvocationOutcome::Passed, skipped()];
        let verdict = MethodVerdict::from_outcomes(&outcomes);
        assert_eq!(verdict, MethodVerdict::PassedWithSkips);
        assert!(!verdict.is_failure());

        let only_skips = [skipped(), skipped()];
        assert_eq!(
            MethodVerdict::from_outcomes(&only_skips),
            MethodVerdict::PassedWithSkips
        );
    }

    #[test]
    fn test_verdict_failure_wins() {
        let outcomes = [skipped(), failed(), InvocationOutcome::Passed];
        assert_eq!(MethodVerdict::from_outcomes(&outcomes), MethodVerdict::Failed);
    }

    #[test]
    fn test_outcome_status() {
        assert_eq!(InvocationOutcome::Passed.status(), InvocationStatus::Pass);
        assert_eq!(failed().status(), InvocationStatus::Fail);
        assert_eq!(skipped().status(), InvocationStatus::Skip);
        assert!(InvocationOutcome::Passed.cause().is_none());
    }

    #[test]
    fn test_class_summary_counts() {
        let ok = MethodRunResult {
            class: "Demo".to_string(),
            method: "ok".to_string(),
            state: RunState::Completed,
            verdict: MethodVerdict::PassedWithSkips,
            invocations: vec![record(0, InvocationOutcome::Passed), record(1, skipped())],
            interrupted: false,
            error: None,
            duration_ms: 2,
        };
        let aborted = MethodRunResult {
            class: "Demo".to_string(),
            method: "broken".to_string(),
            state: RunState::Aborted,
            verdict: MethodVerdict::Aborted,
            invocations: Vec::new(),
            interrupted: false,
            error: Some("arity mismatch".to_string()),
            duration_ms: 0,
        };

        let summary = ClassRunSummary::new("Demo", vec![ok.clone()], 2);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 0);
        assert!(summary.is_successful());
        assert_eq!(summary.pass_rate(), 100.0);

        let summary = ClassRunSummary::new("Demo", vec![ok, aborted], 2);
        assert_eq!(summary.methods_aborted, 1);
        assert!(!summary.is_successful());
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_value(skipped()).unwrap();
        assert_eq!(json["status"], "assumption_violated");
        assert_eq!(json["cause"]["kind"], "assumption");
    }
}
