//! Built-in test suites
//!
//! Test classes shipped with the binary, run by `param-runner run`.

mod arithmetic;
mod assumptions;
mod conversions;

pub use arithmetic::CalculatorTest;
pub use assumptions::AssumptionsWithParamsTest;
pub use conversions::{parse_millis, ConversionsTest};

use std::sync::Arc;

use crate::executor::RunnableClass;

/// All built-in suites, in registration order
pub fn all() -> Vec<Arc<dyn RunnableClass>> {
    vec![
        Arc::new(AssumptionsWithParamsTest::class()),
        Arc::new(CalculatorTest::class()),
        Arc::new(ConversionsTest::class()),
    ]
}

/// Find a suite by name (case-insensitive)
pub fn find(name: &str) -> Option<Arc<dyn RunnableClass>> {
    all().into_iter().find(|c| c.name().eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{LabelOptions, RecordingNotifier, RunSettings, TestRunner};
    use crate::params::ParamSyntax;

    #[test]
    fn test_find() {
        assert!(find("assumptionswithparamstest").is_some());
        assert!(find("Missing").is_none());
    }

    #[test]
    fn test_all_suites_succeed() {
        let runner = TestRunner::new(RunSettings::default())
            .with_notifier(Arc::new(RecordingNotifier::new()));
        let summaries = runner.run_all(&all());

        assert_eq!(summaries.len(), 3);
        assert!(summaries.iter().all(|s| s.is_successful()));
    }

    #[test]
    fn test_all_suites_plan_cleanly() {
        for class in all() {
            let plans = class.plan(&RunSettings::default());
            assert!(!plans.is_empty());
            assert!(plans.iter().all(|p| p.error.is_none()), "{}", class.name());
        }
    }

    #[test]
    fn test_suites_ignore_engine_delimiters() {
        let settings = RunSettings::new(ParamSyntax::new("|"), LabelOptions::default());
        let runner = TestRunner::new(settings).with_notifier(Arc::new(RecordingNotifier::new()));
        let summaries = runner.run_all(&all());

        assert!(summaries.iter().all(|s| s.is_successful()));
        assert!(summaries.iter().all(|s| s.methods_aborted == 0));
    }
}
