//! Assumption-aware invoker
//!
//! Executes one invocation descriptor against a fresh test instance and
//! classifies what the body signalled.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::models::{
    Cause, CauseKind, InvocationOutcome, InvocationRecord, TestOutcome, TestSignal,
};
use crate::params::panic_message;
use crate::utils::Timer;

use super::class::{InstanceFactory, TestBody};
use super::descriptor::InvocationDescriptor;
use super::notifier::RunNotifier;

/// Runs single invocations of one method
pub struct Invoker<'a, T> {
    factory: &'a (dyn InstanceFactory<T> + Send + Sync),
    body: &'a TestBody<T>,
    notifier: &'a dyn RunNotifier,
}

impl<'a, T> Invoker<'a, T> {
    pub fn new(
        factory: &'a (dyn InstanceFactory<T> + Send + Sync),
        body: &'a TestBody<T>,
        notifier: &'a dyn RunNotifier,
    ) -> Self {
        Self {
            factory,
            body,
            notifier,
        }
    }

    /// Execute and report one invocation
    pub fn invoke(&self, descriptor: &InvocationDescriptor) -> InvocationRecord {
        self.notifier.invocation_started(descriptor);
        let timer = Timer::start(&descriptor.label);

        let outcome = self.execute(descriptor);
        let duration_ms = timer.elapsed_ms();

        match &outcome {
            InvocationOutcome::Passed => self.notifier.invocation_passed(descriptor),
            InvocationOutcome::Failed(cause) => self.notifier.invocation_failed(descriptor, cause),
            InvocationOutcome::AssumptionViolated(cause) => {
                self.notifier.assumption_failed(descriptor, cause)
            }
        }
        self.notifier.invocation_finished(descriptor, duration_ms);

        InvocationRecord {
            index: descriptor.index,
            label: descriptor.label.clone(),
            outcome,
            duration_ms,
        }
    }

    /// Run the body against a new instance without reporting
    pub fn execute(&self, descriptor: &InvocationDescriptor) -> InvocationOutcome {
        let run = panic::catch_unwind(AssertUnwindSafe(
            || -> anyhow::Result<TestOutcome> {
                let mut instance = self.factory.create()?;
                Ok((self.body)(&mut instance, &descriptor.arguments))
            },
        ));

        match run {
            Ok(Ok(Ok(()))) => InvocationOutcome::Passed,
            Ok(Ok(Err(signal))) => classify_signal(signal),
            Ok(Err(e)) => {
                InvocationOutcome::Failed(Cause::new(CauseKind::Instantiation, format!("{e:#}")))
            }
            Err(payload) => classify_panic(payload),
        }
    }
}

/// Map a body signal onto an outcome
pub fn classify_signal(signal: TestSignal) -> InvocationOutcome {
    match signal {
        TestSignal::AssertionFailed(message) => {
            InvocationOutcome::Failed(Cause::new(CauseKind::Assertion, message))
        }
        TestSignal::AssumptionViolated(message) => {
            InvocationOutcome::AssumptionViolated(Cause::new(CauseKind::Assumption, message))
        }
        TestSignal::Error(message) => {
            InvocationOutcome::Failed(Cause::new(CauseKind::Unexpected, message))
        }
    }
}

/// Map a panic payload onto an outcome.
///
/// A `TestSignal` raised with `panic_any` keeps its meaning; any other panic
/// is a failure.
fn classify_panic(payload: Box<dyn Any + Send>) -> InvocationOutcome {
    let payload = match payload.downcast::<TestSignal>() {
        Ok(signal) => return classify_signal(*signal),
        Err(payload) => payload,
    };

    InvocationOutcome::Failed(Cause::new(
        CauseKind::Panic,
        panic_message(payload.as_ref()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::notifier::RecordingNotifier;
    use crate::models::{
        assume_true, check_eq, ArgValue, InvocationStatus, ParameterSpec, TypedArguments,
    };

    #[derive(Default)]
    struct Counter {
        hits: u32,
    }

    fn descriptor(index: usize, value: bool) -> InvocationDescriptor {
        InvocationDescriptor {
            class: "Demo".to_string(),
            method: "m".to_string(),
            index,
            label: format!("[{index}] {value} (m)"),
            spec: ParameterSpec::new(value.to_string(), vec![value.to_string()]),
            arguments: TypedArguments::new(vec![ArgValue::Bool(value)]),
        }
    }

    fn default_factory() -> anyhow::Result<Counter> {
        Ok(Counter::default())
    }

    fn make_body<F>(f: F) -> Box<TestBody<Counter>>
    where
        F: Fn(&mut Counter, &TypedArguments) -> TestOutcome + Send + Sync + 'static,
    {
        Box::new(f)
    }

    #[test]
    fn test_assumption_reported_on_skip_channel() {
        let notifier = RecordingNotifier::new();
        let body = make_body(|_, args| assume_true(args.bool(0)?));
        let invoker = Invoker::new(&default_factory, body.as_ref(), &notifier);

        let passed = invoker.invoke(&descriptor(0, true));
        let skipped = invoker.invoke(&descriptor(1, false));

        assert_eq!(passed.outcome, InvocationOutcome::Passed);
        assert!(skipped.outcome.is_skipped());
        assert_eq!(
            notifier.outcome_reports(),
            vec![
                ("[0] true (m)".to_string(), InvocationStatus::Pass),
                ("[1] false (m)".to_string(), InvocationStatus::Skip),
            ]
        );
    }

    #[test]
    fn test_assertion_failure_keeps_cause() {
        let notifier = RecordingNotifier::new();
        let body = make_body(|_, args| check_eq(args.bool(0)?, true));
        let invoker = Invoker::new(&default_factory, body.as_ref(), &notifier);

        let record = invoker.invoke(&descriptor(0, false));
        let cause = record.outcome.cause().unwrap();
        assert!(record.outcome.is_failure());
        assert_eq!(cause.kind, CauseKind::Assertion);
        assert_eq!(cause.message, "expected true but was false");
    }

    #[test]
    fn test_error_signal_is_failure() {
        let notifier = RecordingNotifier::new();
        let body = make_body(|_, args| {
            args.i32(0)?;
            Ok(())
        });
        let invoker = Invoker::new(&default_factory, body.as_ref(), &notifier);

        let record = invoker.invoke(&descriptor(0, true));
        assert_eq!(record.outcome.cause().unwrap().kind, CauseKind::Unexpected);
    }

    #[test]
    fn test_panic_is_failure() {
        let notifier = RecordingNotifier::new();
        let body = make_body(|_, _| panic!("index out of bounds"));
        let invoker = Invoker::new(&default_factory, body.as_ref(), &notifier);

        let outcome = invoker.execute(&descriptor(0, true));
        let cause = outcome.cause().unwrap();
        assert!(outcome.is_failure());
        assert_eq!(cause.kind, CauseKind::Panic);
        assert_eq!(cause.message, "index out of bounds");
    }

    #[test]
    fn test_panic_with_signal_payload() {
        let notifier = RecordingNotifier::new();
        let body =
            make_body(|_, _| panic::panic_any(TestSignal::assumption("not on this platform")));
        let invoker = Invoker::new(&default_factory, body.as_ref(), &notifier);

        assert!(invoker.execute(&descriptor(0, true)).is_skipped());
    }

    #[test]
    fn test_instantiation_failure() {
        let notifier = RecordingNotifier::new();
        let factory = || -> anyhow::Result<Counter> { anyhow::bail!("fixture unavailable") };
        let body = make_body(|_, _| Ok(()));
        let invoker = Invoker::new(&factory, body.as_ref(), &notifier);

        let outcome = invoker.execute(&descriptor(0, true));
        let cause = outcome.cause().unwrap();
        assert_eq!(cause.kind, CauseKind::Instantiation);
        assert_eq!(cause.message, "fixture unavailable");
    }

    #[test]
    fn test_fresh_instance_per_invocation() {
        let notifier = RecordingNotifier::new();
        let body = make_body(|counter, _| {
            counter.hits += 1;
            check_eq(counter.hits, 1)
        });
        let invoker = Invoker::new(&default_factory, body.as_ref(), &notifier);

        for index in 0..3 {
            let record = invoker.invoke(&descriptor(index, true));
            assert_eq!(record.outcome, InvocationOutcome::Passed);
        }
    }

    #[test]
    fn test_execution_is_repeatable() {
        let notifier = RecordingNotifier::new();
        let body = make_body(|_, args| assume_true(args.bool(0)?));
        let invoker = Invoker::new(&default_factory, body.as_ref(), &notifier);

        let d = descriptor(0, false);
        assert_eq!(invoker.execute(&d), invoker.execute(&d));
    }
}
