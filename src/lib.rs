//! param-runner - Parameterized Test Execution Engine
//!
//! Runs a test method once per declared parameter set, reporting every
//! invocation as its own node. A failed assumption marks an invocation as
//! skipped; it never counts as a failure at any level.
//!
//! ## Features
//!
//! - Literal parameter sets converted to typed arguments before anything runs
//! - Configurable delimiters, escaping and invocation labels
//! - Three-way outcomes: passed, failed, assumption violated
//! - Fresh test instance per invocation, panics contained per invocation
//! - Sequential or parallel execution of test classes
//! - Table, JSON and CSV output, stored runs
//!
//! ## Example
//!
//! ```
//! use param_runner::executor::{
//!     CancellationToken, ParameterizedMethod, RunSettings, RunnableClass, SilentNotifier,
//!     TestClass,
//! };
//! use param_runner::models::{assume_true, MethodVerdict, ParamType};
//!
//! #[derive(Default)]
//! struct Flags;
//!
//! let class = TestClass::<Flags>::with_default("Flags").method(
//!     ParameterizedMethod::new("only_true")
//!         .param(ParamType::Bool)
//!         .parameters(&["true", "false"])
//!         .body(|_, args| assume_true(args.bool(0)?)),
//! );
//!
//! let summary = class.run(&RunSettings::default(), &SilentNotifier, &CancellationToken::new());
//! assert_eq!(summary.methods[0].verdict, MethodVerdict::PassedWithSkips);
//! assert!(summary.is_successful());
//! ```

pub mod cli;
pub mod config;
pub mod executor;
pub mod models;
pub mod output;
pub mod params;
pub mod results;
pub mod suites;
pub mod utils;
