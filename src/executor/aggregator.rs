//! Method run aggregator
//!
//! Drives every invocation of one parameterized method in declaration order
//! and folds the outcomes into a [`MethodRunResult`].
//!
//! ```text
//! NotStarted ──▶ Running { consumed } ──▶ Completed
//!     │
//!     └──────▶ Aborted   (configuration error, nothing invoked)
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::models::{InvocationRecord, MethodRunResult, MethodVerdict, RunState};
use crate::params::{ConfigurationError, ConverterRegistry, ParamSyntax, ParameterParser};
use crate::utils::Timer;

use super::class::{InstanceFactory, ParameterizedMethod};
use super::descriptor::{DescriptorBuilder, InvocationDescriptor, LabelOptions};
use super::invoker::Invoker;
use super::notifier::RunNotifier;

/// Shared flag asking running methods to stop launching invocations
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Everything needed to turn a method declaration into descriptors
#[derive(Clone, Copy)]
pub struct MethodContext<'a> {
    pub class: &'a str,
    pub syntax: &'a ParamSyntax,
    pub labels: &'a LabelOptions,
    pub registry: &'a ConverterRegistry,
}

/// Parse a method's parameter sets and build its invocation descriptors
pub fn prepare_invocations<T>(
    ctx: MethodContext<'_>,
    method: &ParameterizedMethod<T>,
) -> Result<Vec<InvocationDescriptor>, ConfigurationError> {
    if method.test_body().is_none() {
        return Err(ConfigurationError::MissingBody);
    }

    let syntax = method.syntax_override().unwrap_or(ctx.syntax);
    let sets =
        ParameterParser::new(syntax, ctx.registry).parse(method.literals(), method.param_types())?;

    Ok(DescriptorBuilder::new(ctx.class, method.name(), ctx.labels).build(sets))
}

/// In-progress result of one method run
#[derive(Debug)]
pub struct MethodRun {
    class: String,
    method: String,
    state: RunState,
    records: Vec<InvocationRecord>,
    interrupted: bool,
    timer: Timer,
}

impl MethodRun {
    pub fn new(class: impl Into<String>, method: impl Into<String>) -> Self {
        let class = class.into();
        let method = method.into();
        let timer = Timer::start(format!("{class}::{method}"));
        Self {
            class,
            method,
            state: RunState::NotStarted,
            records: Vec::new(),
            interrupted: false,
            timer,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn records(&self) -> &[InvocationRecord] {
        &self.records
    }

    /// Append one finished invocation
    pub fn record(&mut self, record: InvocationRecord) {
        self.records.push(record);
        self.state = RunState::Running {
            consumed: self.records.len(),
        };
    }

    /// Mark that remaining invocations were not launched
    pub fn interrupt(&mut self) {
        self.interrupted = true;
    }

    /// Finalize after the last invocation (or after cancellation)
    pub fn complete(self) -> MethodRunResult {
        let verdict = MethodVerdict::from_outcomes(self.records.iter().map(|r| &r.outcome));
        self.finish(RunState::Completed, verdict, None)
    }

    /// Finalize a run that never started
    pub fn abort(self, error: &ConfigurationError) -> MethodRunResult {
        debug_assert_eq!(self.state, RunState::NotStarted);
        self.finish(RunState::Aborted, MethodVerdict::Aborted, Some(error.to_string()))
    }

    fn finish(
        self,
        state: RunState,
        verdict: MethodVerdict,
        error: Option<String>,
    ) -> MethodRunResult {
        MethodRunResult {
            duration_ms: self.timer.elapsed_ms(),
            class: self.class,
            method: self.method,
            state,
            verdict,
            invocations: self.records,
            interrupted: self.interrupted,
            error,
        }
    }
}

/// Runs parameterized methods one invocation at a time
pub struct MethodAggregator<'a> {
    notifier: &'a dyn RunNotifier,
    cancel: &'a CancellationToken,
}

impl<'a> MethodAggregator<'a> {
    pub fn new(notifier: &'a dyn RunNotifier, cancel: &'a CancellationToken) -> Self {
        Self { notifier, cancel }
    }

    /// Run every invocation of `method` sequentially
    pub fn run<T>(
        &self,
        ctx: MethodContext<'_>,
        method: &ParameterizedMethod<T>,
        factory: &(dyn InstanceFactory<T> + Send + Sync),
    ) -> MethodRunResult {
        let mut run = MethodRun::new(ctx.class, method.name());

        let descriptors = match prepare_invocations(ctx, method) {
            Ok(descriptors) => descriptors,
            Err(error) => {
                self.notifier.method_aborted(ctx.class, method.name(), &error);
                let result = run.abort(&error);
                self.notifier.method_finished(&result);
                return result;
            }
        };

        // checked above by prepare_invocations
        let Some(body) = method.test_body() else {
            let result = run.abort(&ConfigurationError::MissingBody);
            self.notifier.method_finished(&result);
            return result;
        };

        self.notifier
            .method_started(ctx.class, method.name(), descriptors.len());
        let invoker = Invoker::new(factory, body, self.notifier);

        for descriptor in &descriptors {
            if self.cancel.is_cancelled() {
                debug!(
                    "{}::{} cancelled after {} of {} invocations",
                    ctx.class,
                    method.name(),
                    run.records().len(),
                    descriptors.len()
                );
                run.interrupt();
                break;
            }
            run.record(invoker.invoke(descriptor));
        }

        let result = run.complete();
        self.notifier.method_finished(&result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::notifier::{RecordingNotifier, RunEvent};
    use crate::models::{
        assume_true, check, ArgValue, Cause, CauseKind, InvocationOutcome, InvocationStatus,
        ParamType,
    };

    #[derive(Default)]
    struct Fixture {
        touched: bool,
    }

    fn factory() -> anyhow::Result<Fixture> {
        Ok(Fixture::default())
    }

    fn run_method(
        method: &ParameterizedMethod<Fixture>,
        notifier: &RecordingNotifier,
        cancel: &CancellationToken,
    ) -> MethodRunResult {
        let syntax = ParamSyntax::default();
        let labels = LabelOptions::default();
        let registry = ConverterRegistry::new();
        let ctx = MethodContext {
            class: "Demo",
            syntax: &syntax,
            labels: &labels,
            registry: &registry,
        };
        MethodAggregator::new(notifier, cancel).run(ctx, method, &factory)
    }

    fn assume_method(literals: &[&str]) -> ParameterizedMethod<Fixture> {
        ParameterizedMethod::new("assume_once_works_and_once_ignores")
            .param(ParamType::Bool)
            .parameters(literals)
            .body(|_, args| assume_true(args.bool(0)?))
    }

    #[test]
    fn test_true_passes_false_is_skipped() {
        let notifier = RecordingNotifier::new();
        let result = run_method(
            &assume_method(&["true", "false"]),
            &notifier,
            &CancellationToken::new(),
        );

        assert_eq!(result.state, RunState::Completed);
        assert_eq!(result.verdict, MethodVerdict::PassedWithSkips);
        assert!(!result.verdict.is_failure());
        assert_eq!(result.invocations.len(), 2);
        assert_eq!(result.invocations[0].outcome, InvocationOutcome::Passed);
        assert!(result.invocations[1].outcome.is_skipped());

        let reports = notifier.outcome_reports();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].1, InvocationStatus::Pass);
        assert_eq!(reports[1].1, InvocationStatus::Skip);
    }

    #[test]
    fn test_conversion_error_aborts_without_invocations() {
        let notifier = RecordingNotifier::new();
        let result = run_method(
            &assume_method(&["notabool"]),
            &notifier,
            &CancellationToken::new(),
        );

        assert_eq!(result.state, RunState::Aborted);
        assert_eq!(result.verdict, MethodVerdict::Aborted);
        assert!(result.invocations.is_empty());
        assert!(result.error.as_deref().unwrap().contains("notabool"));
        assert!(notifier.outcome_reports().is_empty());
        assert_eq!(
            notifier.aborted_methods(),
            vec!["assume_once_works_and_once_ignores".to_string()]
        );
    }

    #[test]
    fn test_arity_mismatch_aborts_whole_method() {
        let notifier = RecordingNotifier::new();
        let method = ParameterizedMethod::<Fixture>::new("pair")
            .param(ParamType::I32)
            .param(ParamType::I32)
            .parameters(&["1, 2", "3"])
            .body(|_, _| Ok(()));
        let result = run_method(&method, &notifier, &CancellationToken::new());

        assert_eq!(result.state, RunState::Aborted);
        assert!(notifier
            .events()
            .iter()
            .all(|e| !matches!(e, RunEvent::InvocationStarted { .. })));
    }

    #[test]
    fn test_missing_body_is_configuration_error() {
        let notifier = RecordingNotifier::new();
        let method = ParameterizedMethod::<Fixture>::new("empty")
            .param(ParamType::Bool)
            .parameters(&["true"]);
        let result = run_method(&method, &notifier, &CancellationToken::new());

        assert_eq!(result.verdict, MethodVerdict::Aborted);
        assert_eq!(
            result.error.as_deref(),
            Some(ConfigurationError::MissingBody.to_string().as_str())
        );
    }

    #[test]
    fn test_failure_does_not_stop_siblings() {
        let notifier = RecordingNotifier::new();
        let method = ParameterizedMethod::<Fixture>::new("positive")
            .param(ParamType::I32)
            .parameters(&["1", "-1", "2", "0"])
            .body(|_, args| {
                let n = args.i32(0)?;
                assume_true(n != 0)?;
                check(n > 0, format!("{n} is not positive"))
            });
        let result = run_method(&method, &notifier, &CancellationToken::new());

        assert_eq!(result.verdict, MethodVerdict::Failed);
        let statuses: Vec<_> = result.outcomes().map(|o| o.status()).collect();
        assert_eq!(
            statuses,
            vec![
                InvocationStatus::Pass,
                InvocationStatus::Fail,
                InvocationStatus::Pass,
                InvocationStatus::Skip,
            ]
        );
        assert_eq!(
            result.invocations[1].outcome,
            InvocationOutcome::Failed(Cause::new(CauseKind::Assertion, "-1 is not positive"))
        );
    }

    #[test]
    fn test_reports_follow_declaration_order() {
        let notifier = RecordingNotifier::new();
        let method = ParameterizedMethod::<Fixture>::new("echo")
            .param(ParamType::Str)
            .parameters(&["c", "a", "b"])
            .body(|_, _| Ok(()));
        run_method(&method, &notifier, &CancellationToken::new());

        let labels: Vec<_> = notifier
            .outcome_reports()
            .into_iter()
            .map(|(label, _)| label)
            .collect();
        assert_eq!(labels, vec!["[0] c (echo)", "[1] a (echo)", "[2] b (echo)"]);
    }

    #[test]
    fn test_each_invocation_gets_fresh_instance() {
        let notifier = RecordingNotifier::new();
        let method = ParameterizedMethod::<Fixture>::new("isolated")
            .param(ParamType::Bool)
            .parameters(&["true", "true", "true"])
            .body(|fixture, _| {
                check(!fixture.touched, "state leaked from a previous invocation")?;
                fixture.touched = true;
                Ok(())
            });
        let result = run_method(&method, &notifier, &CancellationToken::new());

        assert_eq!(result.verdict, MethodVerdict::Passed);
    }

    #[test]
    fn test_cancellation_keeps_collected_outcomes() {
        let notifier = RecordingNotifier::new();
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let method = ParameterizedMethod::<Fixture>::new("stops")
            .param(ParamType::I32)
            .parameters(&["0", "1", "2", "3"])
            .body(move |_, args| {
                if args.i32(0)? == 1 {
                    trigger.cancel();
                }
                Ok(())
            });
        let result = run_method(&method, &notifier, &cancel);

        assert_eq!(result.state, RunState::Completed);
        assert!(result.interrupted);
        assert_eq!(result.invocations.len(), 2);
        assert_eq!(result.verdict, MethodVerdict::Passed);
    }

    #[test]
    fn test_method_run_state_transitions() {
        let mut run = MethodRun::new("Demo", "m");
        assert_eq!(run.state(), RunState::NotStarted);

        run.record(InvocationRecord {
            index: 0,
            label: "[0]".to_string(),
            outcome: InvocationOutcome::Passed,
            duration_ms: 0,
        });
        assert_eq!(run.state(), RunState::Running { consumed: 1 });

        let result = run.complete();
        assert_eq!(result.state, RunState::Completed);
        assert!(result.state.is_terminal());
    }

    #[test]
    fn test_prepare_uses_method_syntax_override() {
        let syntax = ParamSyntax::default();
        let labels = LabelOptions::default();
        let registry = ConverterRegistry::new();
        let ctx = MethodContext {
            class: "Demo",
            syntax: &syntax,
            labels: &labels,
            registry: &registry,
        };
        let method = ParameterizedMethod::<Fixture>::new("piped")
            .param(ParamType::Str)
            .param(ParamType::I32)
            .parameters(&["a,b|1"])
            .syntax(ParamSyntax::new("|"))
            .body(|_, _| Ok(()));

        let descriptors = prepare_invocations(ctx, &method).unwrap();
        assert_eq!(
            descriptors[0].arguments.values(),
            &[ArgValue::Str("a,b".to_string()), ArgValue::I32(1)]
        );
    }
}
