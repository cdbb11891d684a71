//! Results storage module
//!
//! Persists finished runs as JSON and exports them.

mod storage;

pub use storage::{EnvironmentInfo, ExportFormat, ResultsStorage, RunInfo, StoredRun};
