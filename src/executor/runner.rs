//! Test execution runner
//!
//! Runs registered test classes one after another.

use anyhow::Result;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::models::ClassRunSummary;

use super::aggregator::CancellationToken;
use super::class::{MethodPlan, RunSettings, RunnableClass};
use super::notifier::{RunNotifier, TracingNotifier};

/// Sequential runner for test classes
pub struct TestRunner {
    settings: RunSettings,
    notifier: Arc<dyn RunNotifier>,
    cancel: CancellationToken,
}

impl TestRunner {
    /// Create a new test runner that reports through `tracing`
    pub fn new(settings: RunSettings) -> Self {
        Self {
            settings,
            notifier: Arc::new(TracingNotifier),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn RunNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    /// Token that stops further invocations when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run a single test class
    pub fn run_class(&self, class: &dyn RunnableClass) -> ClassRunSummary {
        class.run(&self.settings, self.notifier.as_ref(), &self.cancel)
    }

    /// Run all classes sequentially, in the given order
    pub fn run_all(&self, classes: &[Arc<dyn RunnableClass>]) -> Vec<ClassRunSummary> {
        info!("Starting test run for {} classes", classes.len());

        let start = Instant::now();
        let mut summaries = Vec::with_capacity(classes.len());

        for class in classes {
            if self.cancel.is_cancelled() {
                info!("Run cancelled, {} classes not started", classes.len() - summaries.len());
                break;
            }
            summaries.push(self.run_class(class.as_ref()));
        }

        let passed: usize = summaries.iter().map(|s| s.passed).sum();
        let total: usize = summaries.iter().map(|s| s.total).sum();
        info!(
            "Test run completed in {}ms - Pass: {}/{}",
            start.elapsed().as_millis(),
            passed,
            total
        );

        summaries
    }

    /// Run only the named classes
    pub fn run_selected(
        &self,
        classes: &[Arc<dyn RunnableClass>],
        names: &[String],
    ) -> Result<Vec<ClassRunSummary>> {
        let selected = select_classes(classes, names)?;
        Ok(self.run_all(&selected))
    }

    /// Describe every method's invocations without running them
    pub fn plan(&self, class: &dyn RunnableClass) -> Vec<MethodPlan> {
        class.plan(&self.settings)
    }
}

/// Pick classes by name (case-insensitive), keeping the requested order
pub fn select_classes(
    classes: &[Arc<dyn RunnableClass>],
    names: &[String],
) -> Result<Vec<Arc<dyn RunnableClass>>> {
    if names.is_empty() {
        return Ok(classes.to_vec());
    }

    names
        .iter()
        .map(|name| {
            classes
                .iter()
                .find(|c| c.name().eq_ignore_ascii_case(name))
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("Unknown test class: {name}"))
        })
        .collect()
}
