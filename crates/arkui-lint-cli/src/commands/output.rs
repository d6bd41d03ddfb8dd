//! Shared output formatting for lint results.

use anyhow::Result;
use arkui_lint_core::{LintResult, Severity, Summary, Violation, ViolationDiagnostic};
use miette::GraphicalReportHandler;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::OutputFormat;

/// Print lint results in the specified format.
///
/// `root` is used to read sources back for rich output.
pub fn print(result: &LintResult, format: OutputFormat, root: &Path) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
        OutputFormat::Rich => print_rich(result, root),
    }
    Ok(())
}

fn print_text(result: &LintResult) {
    for violation in &result.violations {
        let severity_indicator = match violation.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };

        println!(
            "{} {} at {}:{}:{}",
            violation.code,
            violation.rule,
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
        );
        println!("  {}: {}", severity_indicator, violation.message);
        if let Some(suggestion) = &violation.suggestion {
            let fixable = if violation.is_fixable() { " (fixable)" } else { "" };
            println!("  = help: {}{}", suggestion.message, fixable);
        }
        println!();
    }

    print_summary(result);
}

fn print_summary(result: &LintResult) {
    for path in &result.unparsed {
        println!("\x1b[33mskipped\x1b[0m {}: could not be parsed", path.display());
    }

    let summary = result.summary();
    let summary_color = if summary.errors > 0 {
        "\x1b[31m"
    } else if summary.warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} in {} file(s)\x1b[0m",
        summary_color, summary, result.files_checked
    );
}

#[derive(Serialize)]
struct JsonReport<'a> {
    files_checked: usize,
    #[serde(flatten)]
    summary: Summary,
    #[serde(skip_serializing_if = "no_paths")]
    unparsed: &'a [PathBuf],
    violations: &'a [Violation],
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn no_paths(paths: &&[PathBuf]) -> bool {
    paths.is_empty()
}

fn json_report(result: &LintResult) -> JsonReport<'_> {
    JsonReport {
        files_checked: result.files_checked,
        summary: result.summary(),
        unparsed: &result.unparsed,
        violations: &result.violations,
    }
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(&json_report(result))?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for violation in &result.violations {
        println!("{violation}");
    }
}

fn print_rich(result: &LintResult, root: &Path) {
    let handler = GraphicalReportHandler::new();

    for violation in &result.violations {
        let name = violation.location.file.to_string_lossy();
        let diagnostic = match std::fs::read_to_string(root.join(&violation.location.file)) {
            Ok(content) => ViolationDiagnostic::from(violation).with_source(&name, content),
            Err(e) => {
                tracing::debug!("Cannot reread {}: {}", name, e);
                ViolationDiagnostic::from(violation)
            }
        };

        let mut rendered = String::new();
        if handler.render_report(&mut rendered, &diagnostic).is_err() {
            println!("{violation}");
            continue;
        }
        println!("{rendered}");
    }

    print_summary(result);
}

#[cfg(test)]
mod tests {
    use super::*;
    use arkui_lint_core::Location;

    #[test]
    fn json_report_counts_severities() {
        let mut result = LintResult::new();
        result.files_checked = 2;
        result.violations.push(Violation::new(
            "AK002",
            "no-duplicate-decorators",
            Severity::Error,
            Location::new(PathBuf::from("pages/Index.ets"), 1, 1),
            "Duplicate decorators for struct are not allowed.",
        ));

        let value = serde_json::to_value(json_report(&result)).unwrap();
        assert_eq!(value["files_checked"], 2);
        assert_eq!(value["errors"], 1);
        assert_eq!(value["warnings"], 0);
        assert_eq!(value["violations"][0]["code"], "AK002");
        assert!(value.get("unparsed").is_none());
    }
}
