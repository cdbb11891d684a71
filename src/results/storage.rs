//! Results storage and retrieval
//!
//! Provides persistent storage for test runs in JSON format.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::RunnerConfig;
use crate::models::ClassRunSummary;
use crate::output::{write_csv, RunTotals};

/// Stored test run containing all class summaries
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredRun {
    /// Unique run ID
    pub id: String,

    /// Timestamp when the run started
    pub started_at: DateTime<Utc>,

    /// Timestamp when the run completed
    pub completed_at: DateTime<Utc>,

    /// Effective configuration of the run
    pub config: RunnerConfig,

    /// Environment info
    pub environment: EnvironmentInfo,

    /// One summary per class, in registration order
    pub summaries: Vec<ClassRunSummary>,
}

/// Environment information
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnvironmentInfo {
    /// Operating system
    pub os: String,

    /// Architecture
    pub arch: String,

    /// Tool version
    pub tool_version: String,
}

impl Default for EnvironmentInfo {
    fn default() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl StoredRun {
    /// Start a new stored run
    pub fn new(config: RunnerConfig) -> Self {
        let now = Utc::now();
        Self {
            id: generate_run_id(),
            started_at: now,
            completed_at: now,
            config,
            environment: EnvironmentInfo::default(),
            summaries: Vec::new(),
        }
    }

    /// Record the class summaries and mark the run completed
    pub fn complete(&mut self, summaries: Vec<ClassRunSummary>) {
        self.summaries = summaries;
        self.completed_at = Utc::now();
    }

    pub fn totals(&self) -> RunTotals {
        RunTotals::from_summaries(&self.summaries)
    }

    pub fn info(&self) -> RunInfo {
        let totals = self.totals();
        RunInfo {
            id: self.id.clone(),
            started_at: self.started_at,
            classes: self.summaries.len(),
            passed: totals.passed,
            failed: totals.failed,
            skipped: totals.skipped,
            successful: totals.is_successful(),
        }
    }
}

/// Generate unique run ID
fn generate_run_id() -> String {
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let random: u32 = rand::random::<u32>() % 10000;
    format!("{timestamp}_{random:04}")
}

/// Results storage manager
pub struct ResultsStorage {
    /// Directory holding one JSON file per run
    base_dir: PathBuf,
}

impl ResultsStorage {
    /// Create a new results storage
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Create with default directory
    pub fn default_dir() -> Self {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("param-runner")
            .join("runs");
        Self::new(base_dir)
    }

    /// Storage for a configured directory, or the default one
    pub fn from_config(config: &RunnerConfig) -> Self {
        match &config.results_dir {
            Some(dir) => Self::new(dir),
            None => Self::default_dir(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get path for a specific run
    fn run_path(&self, run_id: &str) -> PathBuf {
        self.base_dir.join(format!("{run_id}.json"))
    }

    /// Save a test run
    pub fn save(&self, run: &StoredRun) -> Result<PathBuf> {
        fs::create_dir_all(&self.base_dir).with_context(|| {
            format!("Failed to create results directory: {}", self.base_dir.display())
        })?;

        let path = self.run_path(&run.id);
        let file = File::create(&path).context("Failed to create results file")?;
        let writer = BufWriter::new(file);

        serde_json::to_writer_pretty(writer, run).context("Failed to write results")?;

        info!("Saved test results to {}", path.display());
        Ok(path)
    }

    /// Load a test run
    pub fn load(&self, run_id: &str) -> Result<StoredRun> {
        let path = self.run_path(run_id);
        let run = self
            .load_from_path(&path)
            .with_context(|| format!("Failed to load run {run_id}"))?;

        debug!("Loaded test results from {}", path.display());
        Ok(run)
    }

    /// Load from a specific path
    pub fn load_from_path(&self, path: &Path) -> Result<StoredRun> {
        let file = File::open(path).context("Failed to open results file")?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).context("Failed to parse results")
    }

    /// Load every stored run, newest first
    pub fn load_all(&self) -> Result<Vec<StoredRun>> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }

        let mut runs = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();

            if path.extension().map(|e| e == "json").unwrap_or(false) {
                match self.load_from_path(&path) {
                    Ok(run) => runs.push(run),
                    Err(e) => {
                        debug!("Failed to load {}: {}", path.display(), e);
                    }
                }
            }
        }

        runs.sort_by(|a, b| {
            b.started_at
                .cmp(&a.started_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(runs)
    }

    /// List all stored runs, newest first
    pub fn list_runs(&self) -> Result<Vec<RunInfo>> {
        Ok(self.load_all()?.iter().map(StoredRun::info).collect())
    }

    /// Get the most recent run
    pub fn latest(&self) -> Result<Option<StoredRun>> {
        Ok(self.load_all()?.into_iter().next())
    }

    /// Delete a run
    pub fn delete(&self, run_id: &str) -> Result<()> {
        let path = self.run_path(run_id);
        if path.exists() {
            fs::remove_file(&path)?;
            info!("Deleted results: {}", path.display());
        }
        Ok(())
    }

    /// Export run to a file
    pub fn export(&self, run: &StoredRun, path: &Path, format: ExportFormat) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create export file: {}", path.display()))?;
        let writer = BufWriter::new(file);

        match format {
            ExportFormat::Json => serde_json::to_writer_pretty(writer, run)?,
            ExportFormat::Csv => write_csv(writer, &run.summaries)?,
        }

        info!("Exported results to {}", path.display());
        Ok(())
    }
}

/// Brief run information
#[derive(Clone, Debug)]
pub struct RunInfo {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub classes: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub successful: bool,
}

/// Export format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(ExportFormat::Json),
            "csv" => Some(ExportFormat::Csv),
            _ => None,
        }
    }

    pub fn from_extension(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        InvocationOutcome, InvocationRecord, MethodRunResult, MethodVerdict, RunState,
    };
    use chrono::Duration;
    use tempfile::tempdir;

    fn summary(class: &str) -> ClassRunSummary {
        let method = MethodRunResult {
            class: class.to_string(),
            method: "checks".to_string(),
            state: RunState::Completed,
            verdict: MethodVerdict::Passed,
            invocations: vec![InvocationRecord {
                index: 0,
                label: "[0] 1, 2 (checks)".to_string(),
                outcome: InvocationOutcome::Passed,
                duration_ms: 1,
            }],
            interrupted: false,
            error: None,
            duration_ms: 1,
        };
        ClassRunSummary::new(class, vec![method], 1)
    }

    fn stored(id: &str, minutes_ago: i64) -> StoredRun {
        let mut run = StoredRun::new(RunnerConfig::default());
        run.id = id.to_string();
        run.complete(vec![summary("Sample")]);
        run.started_at = Utc::now() - Duration::minutes(minutes_ago);
        run
    }

    #[test]
    fn test_run_id_format() {
        let id = generate_run_id();
        let parts: Vec<_> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), 8);
        assert_eq!(parts[1].len(), 6);
        assert_eq!(parts[2].len(), 4);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let storage = ResultsStorage::new(dir.path());

        let run = stored("20260101_120000_0001", 0);
        let path = storage.save(&run).unwrap();
        assert!(path.exists());

        let loaded = storage.load(&run.id).unwrap();
        assert_eq!(loaded.id, run.id);
        assert_eq!(loaded.summaries.len(), 1);
        assert_eq!(loaded.summaries[0].passed, 1);
        assert!(loaded.info().successful);
    }

    #[test]
    fn test_list_newest_first_and_latest() {
        let dir = tempdir().unwrap();
        let storage = ResultsStorage::new(dir.path());

        storage.save(&stored("old", 30)).unwrap();
        storage.save(&stored("new", 1)).unwrap();
        storage.save(&stored("middle", 10)).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        fs::write(dir.path().join("broken.json"), "{").unwrap();

        let ids: Vec<_> = storage.list_runs().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["new", "middle", "old"]);
        assert_eq!(storage.latest().unwrap().unwrap().id, "new");
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = tempdir().unwrap();
        let storage = ResultsStorage::new(dir.path().join("absent"));
        assert!(storage.list_runs().unwrap().is_empty());
        assert!(storage.latest().unwrap().is_none());
        assert!(storage.load("nope").is_err());
    }

    #[test]
    fn test_delete() {
        let dir = tempdir().unwrap();
        let storage = ResultsStorage::new(dir.path());
        let run = stored("gone", 0);
        storage.save(&run).unwrap();

        storage.delete(&run.id).unwrap();
        assert!(storage.load(&run.id).is_err());
        storage.delete(&run.id).unwrap();
    }

    #[test]
    fn test_export_csv_and_json() {
        let dir = tempdir().unwrap();
        let storage = ResultsStorage::new(dir.path());
        let run = stored("export", 0);

        let csv_path = dir.path().join("run.csv");
        storage.export(&run, &csv_path, ExportFormat::Csv).unwrap();
        let content = fs::read_to_string(&csv_path).unwrap();
        assert!(content.starts_with("class,method,index,label,status,duration_ms,message"));
        assert!(content.contains("Sample,checks,0,\"[0] 1, 2 (checks)\",PASS,1,"));

        let json_path = dir.path().join("run.json");
        storage.export(&run, &json_path, ExportFormat::Json).unwrap();
        let loaded = storage.load_from_path(&json_path).unwrap();
        assert_eq!(loaded.id, "export");
    }

    #[test]
    fn test_export_format_detection() {
        assert_eq!(
            ExportFormat::from_extension(Path::new("out.CSV")),
            Some(ExportFormat::Csv)
        );
        assert_eq!(ExportFormat::from_str("json"), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::from_extension(Path::new("out")), None);
    }
}
