//! Output formatting for docvet results.
//!
//! Supports four output formats:
//! - Terminal: colored output grouped by file
//! - Markdown: a findings table for pull request comments
//! - JSON: structured output for programmatic consumption
//! - Diagnostics: one editor diagnostic per line (JSON lines)
//!
//! Renderers return strings; the `write_*` wrapper prints them.

use colored::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::detect::{Category, Check, DetectionResult, Finding};

/// Base URL of the per-rule documentation pages.
pub const DOCS_BASE_URL: &str = "https://alberto-codes.github.io/docvet/rules";

/// Selectable output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Terminal,
    Markdown,
    Json,
    Diagnostics,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "terminal" => Ok(OutputFormat::Terminal),
            "markdown" => Ok(OutputFormat::Markdown),
            "json" => Ok(OutputFormat::Json),
            "diagnostics" => Ok(OutputFormat::Diagnostics),
            _ => Err(format!(
                "invalid format {:?}, must be 'terminal', 'markdown', 'json', or 'diagnostics'",
                s
            )),
        }
    }
}

/// Render `result` in `format`.
pub fn render(format: OutputFormat, result: &DetectionResult) -> anyhow::Result<String> {
    match format {
        OutputFormat::Terminal => Ok(render_terminal(result)),
        OutputFormat::Markdown => Ok(render_markdown(result)),
        OutputFormat::Json => render_json(result),
        OutputFormat::Diagnostics => render_diagnostics(result, DOCS_BASE_URL),
    }
}

/// Print `result` to stdout in `format`.
pub fn write_report(format: OutputFormat, result: &DetectionResult) -> anyhow::Result<()> {
    let rendered = render(format, result)?;
    print!("{}", rendered);
    Ok(())
}

// =============================================================================
// JSON Format
// =============================================================================

/// JSON report structure.
#[derive(Serialize)]
pub struct JsonReport<'a> {
    pub findings: &'a [Finding],
    pub files_checked: usize,
    pub files_skipped: usize,
    pub summary: JsonSummary,
}

/// Finding totals.
#[derive(Serialize)]
pub struct JsonSummary {
    pub total: usize,
    pub required: usize,
    pub recommended: usize,
    pub by_check: BTreeMap<&'static str, usize>,
}

impl JsonSummary {
    fn from_result(result: &DetectionResult) -> Self {
        let by_check = Check::ALL
            .iter()
            .map(|check| (check.as_str(), result.count(*check)))
            .filter(|(_, count)| *count > 0)
            .collect();
        Self {
            total: result.findings.len(),
            required: result.category_count(Category::Required),
            recommended: result.category_count(Category::Recommended),
            by_check,
        }
    }
}

pub fn render_json(result: &DetectionResult) -> anyhow::Result<String> {
    let report = JsonReport {
        findings: &result.findings,
        files_checked: result.scanned,
        files_skipped: result.skipped,
        summary: JsonSummary::from_result(result),
    };
    let mut json = serde_json::to_string_pretty(&report)?;
    json.push('\n');
    Ok(json)
}

// =============================================================================
// Editor diagnostics
// =============================================================================

/// Two-level diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Warning,
    Hint,
}

/// A finding translated for an editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    /// 0-based line.
    pub line: usize,
    pub severity: DiagnosticSeverity,
    pub code: String,
    pub message: String,
    pub source: &'static str,
    pub href: String,
}

impl Diagnostic {
    pub fn from_finding(finding: &Finding, base_url: &str) -> Self {
        let severity = match finding.category() {
            Category::Required => DiagnosticSeverity::Warning,
            Category::Recommended => DiagnosticSeverity::Hint,
        };
        Self {
            file: finding.file().to_string(),
            line: finding.line() - 1,
            severity,
            code: finding.rule().to_string(),
            message: finding.message().to_string(),
            source: "docvet",
            href: format!("{}/{}/", base_url.trim_end_matches('/'), finding.rule()),
        }
    }
}

pub fn render_diagnostics(result: &DetectionResult, base_url: &str) -> anyhow::Result<String> {
    let mut out = String::new();
    for finding in &result.findings {
        out.push_str(&serde_json::to_string(&Diagnostic::from_finding(finding, base_url))?);
        out.push('\n');
    }
    Ok(out)
}

// =============================================================================
// Markdown Format
// =============================================================================

pub fn render_markdown(result: &DetectionResult) -> String {
    let mut out = String::new();
    if result.findings.is_empty() {
        let _ = writeln!(out, "No findings in {} files checked.", result.scanned);
        return out;
    }

    out.push_str("| File | Line | Symbol | Rule | Category | Message |\n");
    out.push_str("|------|-----:|--------|------|----------|---------|\n");
    for f in &result.findings {
        let _ = writeln!(
            out,
            "| {} | {} | `{}` | {} | {} | {} |",
            f.file(),
            f.line(),
            f.symbol(),
            f.rule(),
            f.category(),
            f.message().replace('|', "\\|")
        );
    }
    out.push('\n');
    let _ = writeln!(out, "{}", summary_line(result));
    out
}

// =============================================================================
// Terminal Format
// =============================================================================

pub fn render_terminal(result: &DetectionResult) -> String {
    let mut out = String::new();
    let mut current_file: Option<&str> = None;

    for f in &result.findings {
        if current_file != Some(f.file()) {
            if current_file.is_some() {
                out.push('\n');
            }
            let _ = writeln!(out, "{}", f.file().blue().bold());
            current_file = Some(f.file());
        }
        let _ = writeln!(
            out,
            "  {:>5}  {}  {:<26} {}",
            f.line().to_string().dimmed(),
            category_tag(f.category()),
            f.rule().dimmed(),
            f.message()
        );
    }

    if !result.findings.is_empty() {
        out.push('\n');
    }
    if result.findings.is_empty() {
        let _ = writeln!(out, "{}", summary_line(result).green());
    } else {
        let _ = writeln!(out, "{}", summary_line(result).bold());
    }
    out
}

fn category_tag(category: Category) -> ColoredString {
    match category {
        Category::Required => "required   ".red(),
        Category::Recommended => "recommended".yellow(),
    }
}

fn summary_line(result: &DetectionResult) -> String {
    let mut line = if result.findings.is_empty() {
        format!("No findings in {} files checked", result.scanned)
    } else {
        let total = result.findings.len();
        format!(
            "{} finding{} ({} required, {} recommended) in {} files checked",
            total,
            if total == 1 { "" } else { "s" },
            result.category_count(Category::Required),
            result.category_count(Category::Recommended),
            result.scanned
        )
    };
    if result.skipped > 0 {
        let _ = write!(line, ", {} skipped", result.skipped);
    }
    line
}
