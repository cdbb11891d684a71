//! Output formatters for test results
//!
//! Provides Table, JSON, CSV and summary output formats.

use anyhow::{Context, Result};
use std::io::Write;

use crate::models::{
    ClassRunSummary, InvocationRecord, InvocationStatus, MethodRunResult, MethodVerdict,
};

/// CSV column header shared by formatted output and exports
pub const CSV_HEADER: [&str; 7] = [
    "class",
    "method",
    "index",
    "label",
    "status",
    "duration_ms",
    "message",
];

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonPretty,
    Csv,
    Summary,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "csv" => Some(OutputFormat::Csv),
            "summary" => Some(OutputFormat::Summary),
            _ => None,
        }
    }
}

/// Result formatter
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    fn paint(&self, text: &str, color: &str) -> String {
        if self.colorize {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    /// Format a single invocation line
    pub fn format_invocation(&self, record: &InvocationRecord) -> String {
        let status = record.outcome.status();
        let color = match status {
            InvocationStatus::Pass => GREEN,
            InvocationStatus::Fail => RED,
            InvocationStatus::Skip => YELLOW,
        };
        let status_str = self.paint(&format!("{} {}", status.symbol(), status), color);

        let mut line = format!("{} {} [{:>5}ms]", status_str, record.label, record.duration_ms);
        if let Some(cause) = record.outcome.cause() {
            line.push_str(&format!("\n        {cause}"));
        }
        line
    }

    /// Format one method with its invocations
    pub fn format_method(&self, method: &MethodRunResult) -> String {
        let color = match method.verdict {
            MethodVerdict::Passed => GREEN,
            MethodVerdict::PassedWithSkips => YELLOW,
            MethodVerdict::Failed | MethodVerdict::Aborted => RED,
        };
        let verdict = self.paint(&format!("{} {}", method.verdict.symbol(), method.verdict), color);

        let mut output = format!("  {} {} ({}ms)", method.method, verdict, method.duration_ms);
        if method.interrupted {
            output.push_str(" [interrupted]");
        }
        output.push('\n');

        if let Some(error) = &method.error {
            output.push_str(&format!("    {} {}\n", self.paint("! ABORT", RED), error));
        }
        for record in &method.invocations {
            output.push_str(&format!("    {}\n", self.format_invocation(record)));
        }
        output
    }

    /// Format a class summary
    pub fn format_summary(&self, summary: &ClassRunSummary) -> String {
        self.format_run(std::slice::from_ref(summary))
    }

    /// Format the summaries of a whole run
    pub fn format_run(&self, summaries: &[ClassRunSummary]) -> String {
        match self.format {
            OutputFormat::Table => self.format_run_table(summaries),
            OutputFormat::Json => serde_json::to_string(summaries).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(summaries).unwrap_or_default(),
            OutputFormat::Csv => self.format_run_csv(summaries),
            OutputFormat::Summary => self.format_run_brief(summaries),
        }
    }

    fn format_class_table(&self, summary: &ClassRunSummary) -> String {
        let mut output = String::new();

        output.push_str("\n╔══════════════════════════════════════════════════════════════╗\n");
        output.push_str(&format!("║  {:58}  ║\n", summary.class));
        output.push_str("╠══════════════════════════════════════════════════════════════╣\n");

        for method in &summary.methods {
            output.push_str(&self.format_method(method));
        }

        output.push_str("╠══════════════════════════════════════════════════════════════╣\n");

        let pass_str = self.paint(&summary.passed.to_string(), GREEN);
        let fail_str = if summary.failed > 0 {
            self.paint(&summary.failed.to_string(), RED)
        } else {
            summary.failed.to_string()
        };

        output.push_str(&format!(
            "║  Total: {:3} | Pass: {} | Fail: {} | Skip: {:3} | Aborted: {:2}\n",
            summary.total, pass_str, fail_str, summary.skipped, summary.methods_aborted
        ));
        output.push_str(&format!(
            "║  Pass Rate: {:5.1}% | Duration: {:6}ms\n",
            summary.pass_rate(),
            summary.total_duration_ms
        ));
        output.push_str("╚══════════════════════════════════════════════════════════════╝\n");

        output
    }

    fn format_run_table(&self, summaries: &[ClassRunSummary]) -> String {
        let mut output: String = summaries
            .iter()
            .map(|s| self.format_class_table(s))
            .collect();

        if summaries.len() > 1 {
            let totals = RunTotals::from_summaries(summaries);
            output.push_str(&format!(
                "\n{} classes | {} methods ({} failed, {} aborted) | Pass: {} | Fail: {} | Skip: {}\n",
                summaries.len(),
                totals.methods,
                totals.methods_failed,
                totals.methods_aborted,
                totals.passed,
                totals.failed,
                totals.skipped
            ));
        }

        output
    }

    fn format_run_csv(&self, summaries: &[ClassRunSummary]) -> String {
        let mut buffer = Vec::new();
        if write_csv(&mut buffer, summaries).is_err() {
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }

    fn format_run_brief(&self, summaries: &[ClassRunSummary]) -> String {
        summaries
            .iter()
            .map(|s| {
                let symbol = if s.is_successful() { "✓" } else { "✗" };
                format!(
                    "{} {}: {}/{} passed, {} skipped, {} aborted methods ({:.1}%) in {}ms",
                    symbol,
                    s.class,
                    s.passed,
                    s.total,
                    s.skipped,
                    s.methods_aborted,
                    s.pass_rate(),
                    s.total_duration_ms
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(OutputFormat::Table)
    }
}

/// Totals across several class summaries
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunTotals {
    pub methods: usize,
    pub methods_failed: usize,
    pub methods_aborted: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunTotals {
    pub fn from_summaries(summaries: &[ClassRunSummary]) -> Self {
        summaries.iter().fold(Self::default(), |acc, s| Self {
            methods: acc.methods + s.methods_total,
            methods_failed: acc.methods_failed + s.methods_failed,
            methods_aborted: acc.methods_aborted + s.methods_aborted,
            passed: acc.passed + s.passed,
            failed: acc.failed + s.failed,
            skipped: acc.skipped + s.skipped,
        })
    }

    pub fn is_successful(&self) -> bool {
        self.methods_failed == 0 && self.methods_aborted == 0
    }
}

/// Write one CSV row per invocation, and one per aborted method
pub fn write_csv<W: Write>(writer: W, summaries: &[ClassRunSummary]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;

    for summary in summaries {
        for method in &summary.methods {
            if let Some(error) = &method.error {
                let duration = method.duration_ms.to_string();
                wtr.write_record([
                    summary.class.as_str(),
                    method.method.as_str(),
                    "",
                    "",
                    "ABORT",
                    duration.as_str(),
                    error.as_str(),
                ])?;
            }
            for record in &method.invocations {
                let index = record.index.to_string();
                let status = record.outcome.status().to_string();
                let duration = record.duration_ms.to_string();
                let message = record
                    .outcome
                    .cause()
                    .map(|c| c.to_string())
                    .unwrap_or_default();
                wtr.write_record([
                    summary.class.as_str(),
                    method.method.as_str(),
                    index.as_str(),
                    record.label.as_str(),
                    status.as_str(),
                    duration.as_str(),
                    message.as_str(),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Write results to a file
pub fn write_results_to_file(
    path: &str,
    summaries: &[ClassRunSummary],
    format: OutputFormat,
) -> Result<()> {
    let formatter = ResultFormatter::new(format).no_color();
    let content = formatter.format_run(summaries);

    let mut file =
        std::fs::File::create(path).with_context(|| format!("Failed to create {path}"))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write {path}"))?;

    Ok(())
}
