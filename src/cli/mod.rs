//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::RunnerConfig;

/// Parameterized test runner
#[derive(Parser, Debug)]
#[command(name = "param-runner")]
#[command(author = "hephaex@gmail.com")]
#[command(version)]
#[command(about = "Run parameterized test suites with assumption-aware reporting")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (YAML or JSON)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run test suites
    Run(RunArgs),

    /// List suites, methods and planned invocations
    List(ListArgs),

    /// Browse stored runs
    Results(ResultsArgs),

    /// Configuration helpers
    Config(ConfigArgs),
}

/// Arguments for run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Suite to run (repeatable, default: all)
    #[arg(short, long = "suite")]
    pub suites: Vec<String>,

    /// Run suites in parallel
    #[arg(short, long)]
    pub parallel: bool,

    /// Number of concurrently running suites (when parallel)
    #[arg(short, long)]
    pub concurrent: Option<usize>,

    /// Output format (table, json, json-pretty, csv, summary)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Characters separating parameters inside one literal
    #[arg(short, long)]
    pub delimiters: Option<String>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Store the run in the results directory
    #[arg(long)]
    pub save: bool,

    /// Write formatted results to file
    #[arg(short, long)]
    pub output: Option<String>,
}

impl RunArgs {
    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut RunnerConfig) {
        if self.parallel {
            config.parallel = true;
        }
        if let Some(concurrent) = self.concurrent {
            config.max_concurrent = concurrent;
        }
        if let Some(format) = &self.format {
            config.format = format.clone();
        }
        if let Some(delimiters) = &self.delimiters {
            config.syntax.delimiters = delimiters.clone();
        }
    }
}

/// Arguments for list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Show parameter types and invocation labels
    #[arg(short, long)]
    pub detailed: bool,
}

/// Arguments for results command
#[derive(Parser, Debug)]
pub struct ResultsArgs {
    #[command(subcommand)]
    pub action: Option<ResultsAction>,
}

#[derive(Subcommand, Debug)]
pub enum ResultsAction {
    /// List stored runs, newest first
    List,

    /// Show a stored run (default: latest)
    Show {
        /// Run ID
        id: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Export a stored run to CSV or JSON (by file extension)
    Export {
        /// Run ID
        id: String,

        /// Output file
        file: PathBuf,
    },

    /// Delete a stored run
    Delete {
        /// Run ID
        id: String,
    },
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show {
        /// Output format (yaml, json)
        #[arg(short, long, default_value = "yaml")]
        format: String,
    },

    /// Write an example configuration file
    Init {
        /// Output path
        #[arg(default_value = "param-runner.yaml")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show environment variables
    Env,
}
