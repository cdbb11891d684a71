//! Configuration module
//!
//! Runner configuration, loaded from defaults, a config file and
//! `PARAM_RUNNER_*` environment variables, in increasing precedence.

mod env;
mod file;

pub use env::{print_env_help, EnvConfig};
pub use file::ConfigFile;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::executor::{LabelOptions, RunSettings};
use crate::output::OutputFormat;
use crate::params::ParamSyntax;

/// Runner configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// How literal parameter sets are split
    #[serde(default)]
    pub syntax: ParamSyntax,

    /// How invocations are labelled
    #[serde(default)]
    pub labels: LabelOptions,

    /// Run test classes concurrently
    #[serde(default)]
    pub parallel: bool,

    /// Maximum concurrently running classes
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Output format (table, json, json-pretty, csv, summary)
    #[serde(default = "default_format")]
    pub format: String,

    /// Where stored runs are kept; defaults to the user data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results_dir: Option<PathBuf>,
}

fn default_max_concurrent() -> usize {
    4
}

fn default_format() -> String {
    "table".to_string()
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            syntax: ParamSyntax::default(),
            labels: LabelOptions::default(),
            parallel: false,
            max_concurrent: default_max_concurrent(),
            format: default_format(),
            results_dir: None,
        }
    }
}

impl RunnerConfig {
    /// Engine settings derived from this configuration
    pub fn run_settings(&self) -> RunSettings {
        RunSettings::new(self.syntax.clone(), self.labels.clone())
    }

    pub fn output_format(&self) -> Result<OutputFormat> {
        OutputFormat::from_str(&self.format)
            .with_context(|| format!("Unknown output format: {}", self.format))
    }

    pub fn validate(&self) -> Result<()> {
        self.syntax
            .validate()
            .context("Invalid parameter syntax")?;

        if self.max_concurrent == 0 {
            anyhow::bail!("max_concurrent must be greater than 0");
        }
        if self.labels.template.trim().is_empty() {
            anyhow::bail!("Label template must not be empty");
        }
        self.output_format()?;

        Ok(())
    }
}

/// Load the effective configuration.
///
/// The file comes from `explicit`, then `PARAM_RUNNER_CONFIG`, then the
/// standard locations. Environment overrides are applied on top. Returns the
/// configuration with the file it was read from, if any.
pub fn load_config(explicit: Option<&Path>) -> Result<(RunnerConfig, Option<PathBuf>)> {
    let env = EnvConfig::load();

    let path = explicit
        .map(Path::to_path_buf)
        .or_else(|| env.config_file.as_ref().map(PathBuf::from))
        .or_else(ConfigFile::find);

    let mut config = match &path {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            ConfigFile::load(path)?.runner
        }
        None => RunnerConfig::default(),
    };

    env.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    Ok((config, path))
}
