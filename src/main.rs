//! param-runner - Parameterized Test Runner CLI
//!
//! Runs the built-in parameterized suites and manages stored runs.
//!
//! ## Usage
//!
//! ```bash
//! # Run every suite
//! param-runner run
//!
//! # Run one suite with pipe-separated parameters, and keep the result
//! param-runner run --suite AssumptionsWithParamsTest --delimiters '|' --save
//!
//! # Run suites in parallel, CSV output
//! param-runner run --parallel --concurrent 2 --format csv
//!
//! # Show planned invocations
//! param-runner list --detailed
//!
//! # Browse stored runs
//! param-runner results show
//! param-runner results export <ID> run.csv
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use tracing::{info, warn};

use param_runner::cli::{self, Args, Command};
use param_runner::config::{self, ConfigFile, EnvConfig};
use param_runner::executor::{select_classes, CancellationToken, ParallelExecutor, TestRunner};
use param_runner::output::{write_results_to_file, OutputFormat, ResultFormatter, RunTotals};
use param_runner::results::{ExportFormat, ResultsStorage, StoredRun};
use param_runner::suites;
use param_runner::utils::{init_logger, LogLevel};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let verbose = args.verbose || EnvConfig::load().verbose.unwrap_or(false);
    init_logger(LogLevel::from_verbose(verbose));

    let config_path = args.config.as_deref();

    match args.command {
        Command::Run(run_args) => {
            run_suites(config_path, run_args).await?;
        }
        Command::List(list_args) => {
            list_suites(config_path, list_args)?;
        }
        Command::Results(results_args) => {
            show_results(config_path, results_args)?;
        }
        Command::Config(config_args) => {
            manage_config(config_path, config_args)?;
        }
    }

    Ok(())
}

async fn run_suites(config_path: Option<&Path>, args: cli::RunArgs) -> Result<()> {
    let (mut config, source) = config::load_config(config_path)?;
    args.apply(&mut config);
    config.validate().context("Invalid command-line options")?;

    if let Some(path) = &source {
        info!("Using configuration from {}", path.display());
    }

    let classes = select_classes(&suites::all(), &args.suites)?;
    let format = config.output_format()?;
    let formatter = if args.no_color {
        ResultFormatter::new(format).no_color()
    } else {
        ResultFormatter::new(format)
    };

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing running invocations");
            interrupt.cancel();
        }
    });

    let mut stored = StoredRun::new(config.clone());
    let settings = config.run_settings();

    let summaries = if config.parallel {
        ParallelExecutor::new(config.max_concurrent)
            .with_settings(settings)
            .with_cancellation(cancel)
            .run_classes(classes)
            .await?
    } else {
        let runner = TestRunner::new(settings).with_cancellation(cancel);
        tokio::task::spawn_blocking(move || runner.run_all(&classes))
            .await
            .context("Test runner panicked")?
    };

    println!("{}", formatter.format_run(&summaries));

    if let Some(output) = &args.output {
        write_results_to_file(output, &summaries, format)?;
        println!("✓ Results written to {output}");
    }

    let totals = RunTotals::from_summaries(&summaries);
    stored.complete(summaries);

    if args.save {
        let storage = ResultsStorage::from_config(&config);
        let path = storage.save(&stored)?;
        println!("✓ Run {} saved to {}", stored.id, path.display());
    }

    if !totals.is_successful() {
        anyhow::bail!(
            "{} method(s) failed, {} aborted",
            totals.methods_failed,
            totals.methods_aborted
        );
    }

    Ok(())
}

fn list_suites(config_path: Option<&Path>, args: cli::ListArgs) -> Result<()> {
    let (config, _) = config::load_config(config_path)?;
    let settings = config.run_settings();
    let classes = suites::all();

    println!("\nBuilt-in Test Suites ({} total)\n", classes.len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for class in &classes {
        let plans = class.plan(&settings);
        println!("\n{} ({} methods)", class.name(), plans.len());
        println!("──────────────────────────────────────────────────────────────────────");

        for plan in plans {
            match &plan.error {
                Some(error) => println!("  ! {:28} {}", plan.method, error),
                None if args.detailed => {
                    println!("  {}({})", plan.method, plan.param_types.join(", "));
                    for label in &plan.labels {
                        println!("      {label}");
                    }
                }
                None => println!("  {:30} {} invocations", plan.method, plan.labels.len()),
            }
        }
    }

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    Ok(())
}

fn show_results(config_path: Option<&Path>, args: cli::ResultsArgs) -> Result<()> {
    let (config, _) = config::load_config(config_path)?;
    let storage = ResultsStorage::from_config(&config);

    match args.action.unwrap_or(cli::ResultsAction::List) {
        cli::ResultsAction::List => {
            let runs = storage.list_runs()?;

            if runs.is_empty() {
                println!("\n📭 No stored results found in {}.", storage.base_dir().display());
                println!("   Store a run with: param-runner run --save");
                return Ok(());
            }

            println!("\n┌──────────────────────────────────────────────────────────────────────┐");
            println!("│ Stored Runs                                                          │");
            println!("├──────────────────────────────────────────────────────────────────────┤");
            for run in runs {
                let status = if run.successful { "✓" } else { "✗" };
                println!(
                    "│ {} {:20} │ {} │ {:2} classes │ {:4} pass │ {:4} fail │ {:4} skip",
                    status,
                    run.id,
                    run.started_at.format("%Y-%m-%d %H:%M:%S"),
                    run.classes,
                    run.passed,
                    run.failed,
                    run.skipped
                );
            }
            println!("└──────────────────────────────────────────────────────────────────────┘");
        }

        cli::ResultsAction::Show { id, format } => {
            let run = match id {
                Some(id) => storage.load(&id)?,
                None => storage.latest()?.context("No stored runs")?,
            };
            let format = OutputFormat::from_str(&format)
                .with_context(|| format!("Unknown output format: {format}"))?;

            info!("Run {} started at {}", run.id, run.started_at);
            println!("{}", ResultFormatter::new(format).format_run(&run.summaries));
        }

        cli::ResultsAction::Export { id, file } => {
            let run = storage.load(&id)?;
            let format = ExportFormat::from_extension(&file).unwrap_or(ExportFormat::Json);
            storage.export(&run, &file, format)?;
            println!("✓ Exported run {id} to {}", file.display());
        }

        cli::ResultsAction::Delete { id } => {
            storage.delete(&id)?;
            println!("✓ Deleted run {id}");
        }
    }

    Ok(())
}

fn manage_config(config_path: Option<&Path>, args: cli::ConfigArgs) -> Result<()> {
    match args.action {
        cli::ConfigAction::Init { output, force } => {
            if output.exists() && !force {
                anyhow::bail!(
                    "Configuration file already exists: {}. Use --force to overwrite.",
                    output.display()
                );
            }

            ConfigFile::example().save(&output)?;
            println!("✓ Configuration file created: {}", output.display());
            println!("\nEdit the file to customize your settings.");
        }

        cli::ConfigAction::Show { format } => {
            let (runner, source) = config::load_config(config_path)?;
            match &source {
                Some(path) => info!("Configuration loaded from {}", path.display()),
                None => info!("No configuration file found, using defaults"),
            }

            let file = ConfigFile {
                runner,
                ..ConfigFile::default()
            };
            let output = if format == "json" {
                serde_json::to_string_pretty(&file)?
            } else {
                serde_yaml::to_string(&file)?
            };
            println!("{output}");
        }

        cli::ConfigAction::Env => {
            config::print_env_help();
            println!();
            EnvConfig::load().print_summary();
        }
    }

    Ok(())
}
