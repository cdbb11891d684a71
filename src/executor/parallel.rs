//! Parallel class execution
//!
//! Runs several test classes concurrently. Methods of one class, and the
//! invocations of one method, stay sequential.

use anyhow::{Context, Result};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, info};

use crate::models::ClassRunSummary;

use super::aggregator::CancellationToken;
use super::class::{RunSettings, RunnableClass};
use super::notifier::{RunNotifier, TracingNotifier};

/// Parallel executor for test classes
pub struct ParallelExecutor {
    max_concurrent: usize,
    settings: RunSettings,
    notifier: Arc<dyn RunNotifier>,
    cancel: CancellationToken,
}

impl ParallelExecutor {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            max_concurrent: max_concurrent.max(1),
            settings: RunSettings::default(),
            notifier: Arc::new(TracingNotifier),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_settings(mut self, settings: RunSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn RunNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run classes concurrently.
    ///
    /// Summaries come back in the order the classes were given, whatever
    /// order they finish in.
    pub async fn run_classes(
        &self,
        classes: Vec<Arc<dyn RunnableClass>>,
    ) -> Result<Vec<ClassRunSummary>> {
        info!(
            "Running {} classes in parallel (max {} concurrent)",
            classes.len(),
            self.max_concurrent
        );

        let start = Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut handles = Vec::with_capacity(classes.len());

        for class in classes {
            let semaphore = semaphore.clone();
            let settings = self.settings.clone();
            let notifier = self.notifier.clone();
            let cancel = self.cancel.clone();

            let handle = tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .context("Worker pool closed")?;

                debug!("Starting parallel execution of {}", class.name());
                tokio::task::spawn_blocking(move || {
                    class.run(&settings, notifier.as_ref(), &cancel)
                })
                .await
                .context("Class worker panicked")
            });

            handles.push(handle);
        }

        let mut summaries = Vec::with_capacity(handles.len());
        for result in join_all(handles).await {
            summaries.push(result.context("Class task failed")??);
        }

        info!(
            "Parallel execution completed in {}ms - {} classes",
            start.elapsed().as_millis(),
            summaries.len()
        );

        Ok(summaries)
    }
}

impl Default for ParallelExecutor {
    fn default() -> Self {
        Self::new(4)
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::executor::class::{ParameterizedMethod, TestClass};
    use crate::executor::notifier::RecordingNotifier;
    use crate::models::{check, InvocationStatus, MethodVerdict, ParamType};
    use std::thread::sleep;
    use std::time::Duration;

    #[derive(Default)]
    struct Sleeper;

    fn sleeper(name: &str, millis: &[&str]) -> Arc<dyn RunnableClass> {
        Arc::new(
            TestClass::<Sleeper>::with_default(name).method(
                ParameterizedMethod::new("sleeps")
                    .param(ParamType::U64)
                    .parameters(millis)
                    .body(|_, args| {
                        let ms = args.get::<u64>(0)?;
                        sleep(Duration::from_millis(ms));
                        check(ms < 1000, "slept too long")
                    }),
            ),
        )
    }

    #[test]
    fn test_parallel_executor_creation() {
        let executor = ParallelExecutor::new(0);
        assert_eq!(executor.max_concurrent, 1);
        assert_eq!(ParallelExecutor::default().max_concurrent, 4);
    }

    #[test]
    fn test_summaries_keep_registration_order() {
        let classes = vec![
            sleeper("Slow", &["40", "40"]),
            sleeper("Fast", &["1"]),
            sleeper("Medium", &["10", "1000"]),
        ];
        let executor = ParallelExecutor::new(3);

        let summaries = tokio_test::block_on(executor.run_classes(classes)).unwrap();

        let names: Vec<_> = summaries.iter().map(|s| s.class.as_str()).collect();
        assert_eq!(names, vec!["Slow", "Fast", "Medium"]);
        assert_eq!(summaries[2].methods[0].verdict, MethodVerdict::Failed);
        assert_eq!(summaries[2].failed, 1);
    }

    #[test]
    fn test_invocations_within_method_stay_ordered() {
        let notifier = Arc::new(RecordingNotifier::new());
        let executor = ParallelExecutor::new(2).with_notifier(notifier.clone());

        tokio_test::block_on(executor.run_classes(vec![
            sleeper("A", &["5", "1", "3"]),
            sleeper("B", &["2", "4"]),
        ]))
        .unwrap();

        let reports = notifier.outcome_reports();
        assert_eq!(reports.len(), 5);
        assert!(reports.iter().all(|(_, s)| *s == InvocationStatus::Pass));

        let a_labels: Vec<_> = reports
            .iter()
            .map(|(label, _)| label.as_str())
            .filter(|label| ["[0] 5 (sleeps)", "[1] 1 (sleeps)", "[2] 3 (sleeps)"].contains(label))
            .collect();
        assert_eq!(a_labels, vec!["[0] 5 (sleeps)", "[1] 1 (sleeps)", "[2] 3 (sleeps)"]);
    }
}
