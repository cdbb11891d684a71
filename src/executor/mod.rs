//! Test execution engine
//!
//! Descriptor building, assumption-aware invocation, per-method aggregation,
//! and sequential or parallel execution of test classes.

mod aggregator;
mod class;
mod descriptor;
mod invoker;
mod notifier;
mod parallel;
mod runner;

pub use aggregator::{
    prepare_invocations, CancellationToken, MethodAggregator, MethodContext, MethodRun,
};
pub use class::{
    InstanceFactory, MethodPlan, ParameterizedMethod, RunSettings, RunnableClass, TestBody,
    TestClass,
};
pub use descriptor::{
    render_params, DescriptorBuilder, InvocationDescriptor, LabelOptions, DEFAULT_LABEL_TEMPLATE,
};
pub use invoker::{classify_signal, Invoker};
pub use notifier::{RecordingNotifier, RunEvent, RunNotifier, SilentNotifier, TracingNotifier};
pub use parallel::ParallelExecutor;
pub use runner::{select_classes, TestRunner};
