//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;
use std::path::PathBuf;

use super::RunnerConfig;

/// Environment variable prefix
const ENV_PREFIX: &str = "PARAM_RUNNER";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Delimiters from PARAM_RUNNER_DELIMITERS
    pub delimiters: Option<String>,
    /// Parallel from PARAM_RUNNER_PARALLEL
    pub parallel: Option<bool>,
    /// Max concurrent classes from PARAM_RUNNER_CONCURRENT
    pub concurrent: Option<usize>,
    /// Output format from PARAM_RUNNER_FORMAT
    pub format: Option<String>,
    /// Config file from PARAM_RUNNER_CONFIG
    pub config_file: Option<String>,
    /// Verbose from PARAM_RUNNER_VERBOSE
    pub verbose: Option<bool>,
    /// Results directory from PARAM_RUNNER_RESULTS_DIR
    pub results_dir: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            delimiters: get_env("DELIMITERS"),
            parallel: get_env_bool("PARALLEL"),
            concurrent: get_env_parse("CONCURRENT"),
            format: get_env("FORMAT"),
            config_file: get_env("CONFIG"),
            verbose: get_env_bool("VERBOSE"),
            results_dir: get_env("RESULTS_DIR"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.delimiters.is_some()
            || self.parallel.is_some()
            || self.concurrent.is_some()
            || self.format.is_some()
            || self.config_file.is_some()
            || self.verbose.is_some()
            || self.results_dir.is_some()
    }

    /// Override `config` with every variable that is set
    pub fn apply(&self, config: &mut RunnerConfig) {
        if let Some(delimiters) = &self.delimiters {
            config.syntax.delimiters = delimiters.clone();
        }
        if let Some(parallel) = self.parallel {
            config.parallel = parallel;
        }
        if let Some(concurrent) = self.concurrent {
            config.max_concurrent = concurrent;
        }
        if let Some(format) = &self.format {
            config.format = format.clone();
        }
        if let Some(dir) = &self.results_dir {
            config.results_dir = Some(PathBuf::from(dir));
        }
    }

    /// Print current environment configuration
    pub fn print_summary(&self) {
        println!("Environment Configuration:");
        println!("  {}_DELIMITERS:  {:?}", ENV_PREFIX, self.delimiters);
        println!("  {}_PARALLEL:    {:?}", ENV_PREFIX, self.parallel);
        println!("  {}_CONCURRENT:  {:?}", ENV_PREFIX, self.concurrent);
        println!("  {}_FORMAT:      {:?}", ENV_PREFIX, self.format);
        println!("  {}_CONFIG:      {:?}", ENV_PREFIX, self.config_file);
        println!("  {}_VERBOSE:     {:?}", ENV_PREFIX, self.verbose);
        println!("  {}_RESULTS_DIR: {:?}", ENV_PREFIX, self.results_dir);
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.parse().ok())
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| parse_bool(&v))
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.to_lowercase().as_str(),
        "1" | "true" | "yes" | "on" | "enabled"
    )
}

/// Print all PARAM_RUNNER environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_DELIMITERS   Characters separating parameters in one literal");
    println!("  {ENV_PREFIX}_PARALLEL     Run test classes concurrently (true/false)");
    println!("  {ENV_PREFIX}_CONCURRENT   Maximum concurrently running classes");
    println!("  {ENV_PREFIX}_FORMAT       Output format (table, json, json-pretty, csv, summary)");
    println!("  {ENV_PREFIX}_CONFIG       Path to configuration file");
    println!("  {ENV_PREFIX}_VERBOSE      Enable verbose output (true/false)");
    println!("  {ENV_PREFIX}_RESULTS_DIR  Directory for stored runs");
    println!();
    println!("Example:");
    println!("  export {ENV_PREFIX}_DELIMITERS='|'");
    println!("  param-runner run --suite AssumptionsWithParamsTest");
}
