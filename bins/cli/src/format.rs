//! Output format helpers for CLI commands.

use crate::error::CliError;
use clap::{Args, ValueEnum};
use rulesynth_domain::MatchResult;
use rulesynth_shared::ErrorEnvelope;
use serde::Serialize;
use std::fmt::Write as _;

/// Output format choices for CLI responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-friendly text output.
    #[default]
    Text,
    /// Machine-friendly JSON output.
    Json,
}

/// Output-related CLI flags.
#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Output format for command responses.
    #[arg(long, global = true, value_enum)]
    pub output: Option<OutputFormat>,
}

/// Output mode derived from CLI flags.
#[derive(Debug, Clone, Copy)]
pub struct OutputMode {
    pub format: OutputFormat,
}

impl OutputMode {
    /// Build output mode from CLI flags.
    #[must_use]
    pub fn from_args(args: &OutputArgs) -> Self {
        Self {
            format: args.output.unwrap_or_default(),
        }
    }

    /// Returns true when JSON output is requested.
    #[must_use]
    pub const fn is_json(self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }
}

/// JSON shape of a synthesis report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizeReport<'a> {
    pub project_root: String,
    pub categories: &'a MatchResult,
    pub total_rules: usize,
    pub categories_count: usize,
    pub warnings: &'a [ErrorEnvelope],
}

impl<'a> SynthesizeReport<'a> {
    pub fn new(project_root: String, result: &'a MatchResult, warnings: &'a [ErrorEnvelope]) -> Self {
        Self {
            project_root,
            categories: result,
            total_rules: result.total_rules(),
            categories_count: result.categories_count(),
            warnings,
        }
    }
}

/// Text form: `## Name` headings with `- pattern` bullets, then a summary.
pub fn format_match_text(result: &MatchResult) -> String {
    let mut out = String::new();
    for category in result {
        let _ = writeln!(out, "## {}", category.name);
        for pattern in &category.patterns {
            let _ = writeln!(out, "- {}", pattern.as_str());
        }
        out.push('\n');
    }
    let _ = writeln!(out, "total rules: {}", result.total_rules());
    let _ = writeln!(out, "categories: {}", result.categories_count());
    out
}

/// One `warning: code: message` line per warning.
pub fn format_warnings_text(warnings: &[ErrorEnvelope]) -> String {
    let mut out = String::new();
    for warning in warnings {
        let _ = writeln!(out, "warning: {}: {}", warning.code, warning.message);
    }
    out
}

/// Error rendered for humans.
pub fn format_error_text(error: &ErrorEnvelope) -> String {
    let mut out = String::new();
    out.push_str("status: error\n");
    let _ = writeln!(out, "code: {}", error.code);
    let _ = writeln!(out, "message: {}", error.message);
    if !error.metadata.is_empty() {
        out.push_str("meta:\n");
        for (key, value) in &error.metadata {
            let _ = writeln!(out, "  {key}: {value}");
        }
    }
    out
}

/// Pretty JSON with a trailing newline.
pub fn to_json_line<T: Serialize + ?Sized>(value: &T) -> Result<String, CliError> {
    let mut output = serde_json::to_string_pretty(value)?;
    output.push('\n');
    Ok(output)
}
