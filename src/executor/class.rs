//! Test classes and parameterized methods
//!
//! A [`TestClass`] is what a host registers with this runner: a set of
//! parameterized methods plus a factory producing a fresh instance for
//! every invocation.

use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::models::{ClassRunSummary, ParamType, TestOutcome, TypedArguments};
use crate::params::{ConverterRegistry, ParamConverter, ParamSyntax};
use crate::utils::Timer;

use super::aggregator::{prepare_invocations, CancellationToken, MethodAggregator, MethodContext};
use super::descriptor::LabelOptions;
use super::notifier::RunNotifier;

/// Test body: receives a fresh instance and one invocation's arguments
pub type TestBody<T> = dyn Fn(&mut T, &TypedArguments) -> TestOutcome + Send + Sync;

/// Produces a fresh test instance per invocation
pub trait InstanceFactory<T>: Send + Sync {
    fn create(&self) -> anyhow::Result<T>;
}

impl<T, F> InstanceFactory<T> for F
where
    F: Fn() -> anyhow::Result<T> + Send + Sync,
{
    fn create(&self) -> anyhow::Result<T> {
        self()
    }
}

/// Engine-wide parsing and labelling defaults
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSettings {
    pub syntax: ParamSyntax,
    pub labels: LabelOptions,
}

impl RunSettings {
    pub fn new(syntax: ParamSyntax, labels: LabelOptions) -> Self {
        Self { syntax, labels }
    }
}

/// One test method with its declared parameter sets
pub struct ParameterizedMethod<T> {
    name: String,
    param_types: Vec<ParamType>,
    literals: Vec<String>,
    syntax: Option<ParamSyntax>,
    body: Option<Arc<TestBody<T>>>,
}

impl<T> ParameterizedMethod<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_types: Vec::new(),
            literals: Vec::new(),
            syntax: None,
            body: None,
        }
    }

    /// Declare the next parameter's type
    pub fn param(mut self, ty: ParamType) -> Self {
        self.param_types.push(ty);
        self
    }

    /// Declare the literal parameter sets, one invocation each
    pub fn parameters<S: AsRef<str>>(mut self, literals: &[S]) -> Self {
        self.literals = literals.iter().map(|l| l.as_ref().to_string()).collect();
        self
    }

    /// Use a different literal syntax for this method only
    pub fn syntax(mut self, syntax: ParamSyntax) -> Self {
        self.syntax = Some(syntax);
        self
    }

    pub fn body<F>(mut self, body: F) -> Self
    where
        F: Fn(&mut T, &TypedArguments) -> TestOutcome + Send + Sync + 'static,
    {
        self.body = Some(Arc::new(body));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn param_types(&self) -> &[ParamType] {
        &self.param_types
    }

    pub fn literals(&self) -> &[String] {
        &self.literals
    }

    pub fn syntax_override(&self) -> Option<&ParamSyntax> {
        self.syntax.as_ref()
    }

    pub fn test_body(&self) -> Option<&TestBody<T>> {
        self.body.as_deref()
    }
}

/// Planned invocations of one method, without running anything
#[derive(Clone, Debug, Serialize)]
pub struct MethodPlan {
    pub method: String,
    pub param_types: Vec<String>,
    pub labels: Vec<String>,
    pub error: Option<String>,
}

/// Type-erased test class, so classes with different instance types can be
/// listed and run together
pub trait RunnableClass: Send + Sync {
    fn name(&self) -> &str;

    fn plan(&self, settings: &RunSettings) -> Vec<MethodPlan>;

    fn run(
        &self,
        settings: &RunSettings,
        notifier: &dyn RunNotifier,
        cancel: &CancellationToken,
    ) -> ClassRunSummary;
}

/// A test class: parameterized methods sharing an instance factory
pub struct TestClass<T> {
    name: String,
    factory: Arc<dyn InstanceFactory<T> + Send + Sync>,
    methods: Vec<ParameterizedMethod<T>>,
    syntax: Option<ParamSyntax>,
    labels: Option<LabelOptions>,
    registry: ConverterRegistry,
}

impl<T: 'static> TestClass<T> {
    pub fn new(name: impl Into<String>, factory: impl InstanceFactory<T> + 'static) -> Self {
        Self {
            name: name.into(),
            factory: Arc::new(factory),
            methods: Vec::new(),
            syntax: None,
            labels: None,
            registry: ConverterRegistry::new(),
        }
    }

    /// Class whose instances are created with `T::default()`
    pub fn with_default(name: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self::new(name, || -> anyhow::Result<T> { Ok(T::default()) })
    }

    pub fn method(mut self, method: ParameterizedMethod<T>) -> Self {
        self.methods.push(method);
        self
    }

    pub fn syntax(mut self, syntax: ParamSyntax) -> Self {
        self.syntax = Some(syntax);
        self
    }

    pub fn labels(mut self, labels: LabelOptions) -> Self {
        self.labels = Some(labels);
        self
    }

    pub fn converter(
        mut self,
        type_name: impl Into<String>,
        converter: impl ParamConverter + 'static,
    ) -> Self {
        self.registry = self.registry.register(type_name, converter);
        self
    }

    pub fn methods(&self) -> &[ParameterizedMethod<T>] {
        &self.methods
    }

    fn context<'a>(&'a self, settings: &'a RunSettings) -> MethodContext<'a> {
        MethodContext {
            class: &self.name,
            syntax: self.syntax.as_ref().unwrap_or(&settings.syntax),
            labels: self.labels.as_ref().unwrap_or(&settings.labels),
            registry: &self.registry,
        }
    }
}

impl<T: 'static> RunnableClass for TestClass<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn plan(&self, settings: &RunSettings) -> Vec<MethodPlan> {
        let ctx = self.context(settings);
        self.methods
            .iter()
            .map(|method| {
                let param_types = method
                    .param_types()
                    .iter()
                    .map(|t| t.name().to_string())
                    .collect();
                match prepare_invocations(ctx, method) {
                    Ok(descriptors) => MethodPlan {
                        method: method.name().to_string(),
                        param_types,
                        labels: descriptors.into_iter().map(|d| d.label).collect(),
                        error: None,
                    },
                    Err(e) => MethodPlan {
                        method: method.name().to_string(),
                        param_types,
                        labels: Vec::new(),
                        error: Some(e.to_string()),
                    },
                }
            })
            .collect()
    }

    fn run(
        &self,
        settings: &RunSettings,
        notifier: &dyn RunNotifier,
        cancel: &CancellationToken,
    ) -> ClassRunSummary {
        let timer = Timer::start(&self.name);
        notifier.class_started(&self.name);

        let ctx = self.context(settings);
        let aggregator = MethodAggregator::new(notifier, cancel);
        let mut results = Vec::with_capacity(self.methods.len());

        for method in &self.methods {
            if cancel.is_cancelled() {
                info!("Skipping remaining methods of {}: run cancelled", self.name);
                break;
            }
            results.push(aggregator.run(ctx, method, self.factory.as_ref()));
        }

        let summary = ClassRunSummary::new(self.name.clone(), results, timer.stop());
        notifier.class_finished(&summary);
        summary
    }
}
