//! Core types for lint violations and results.

use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for lint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail lint.
    Info,
    /// Warning that should be addressed.
    #[serde(alias = "warn")]
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Self::Info),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown severity '{other}'")),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to project root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset in file (for miette integration).
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }
}

/// A suggested fix for a violation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable description of the fix.
    pub message: String,
    /// Optional automatic replacement.
    pub replacement: Option<Replacement>,
}

impl Suggestion {
    /// Creates a new suggestion without automatic fix.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            replacement: None,
        }
    }

    /// Creates a new suggestion with automatic fix.
    #[must_use]
    pub fn with_fix(message: impl Into<String>, replacement: Replacement) -> Self {
        Self {
            message: message.into(),
            replacement: Some(replacement),
        }
    }
}

/// An automatic code replacement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Replacement {
    /// Location to replace.
    pub location: Location,
    /// New text to insert.
    pub new_text: String,
}

impl Replacement {
    /// Creates a new replacement.
    #[must_use]
    pub fn new(location: Location, new_text: impl Into<String>) -> Self {
        Self {
            location,
            new_text: new_text.into(),
        }
    }
}

/// A lint violation found during analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Rule code (e.g., "AK001").
    pub code: String,
    /// Rule name (e.g., "monitor-decorator-check").
    pub rule: String,
    /// Identifier of the message template (e.g., "monitorTargetInvalid").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// Severity of this violation.
    pub severity: Severity,
    /// Primary location of the violation.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Optional suggestion for fixing.
    pub suggestion: Option<Suggestion>,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            message_id: None,
            severity,
            location,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Records the message template this violation was formatted from.
    #[must_use]
    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    /// Adds a suggestion to this violation.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    /// Returns true if the suggestion carries an automatic replacement.
    #[must_use]
    pub fn is_fixable(&self) -> bool {
        self.suggestion
            .as_ref()
            .is_some_and(|s| s.replacement.is_some())
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.code,
            self.message
        )
    }
}

/// Converts a Violation to a miette Diagnostic for rich error display.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct ViolationDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
    #[source_code]
    source_code: NamedSource<String>,
}

impl ViolationDiagnostic {
    /// Attaches the file contents so the span can be rendered in context.
    #[must_use]
    pub fn with_source(mut self, name: impl AsRef<str>, content: String) -> Self {
        self.source_code = NamedSource::new(name, content);
        self
    }
}

impl From<&Violation> for ViolationDiagnostic {
    fn from(v: &Violation) -> Self {
        Self {
            message: format!("[{}] {}", v.code, v.message),
            help: v.suggestion.as_ref().map(|s| s.message.clone()),
            span: SourceSpan::from((v.location.offset, v.location.length)),
            label_message: v.rule.clone(),
            source_code: NamedSource::new(v.location.file.to_string_lossy(), String::new()),
        }
    }
}

/// Violation counts of a [`LintResult`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Violations at [`Severity::Error`].
    pub errors: usize,
    /// Violations at [`Severity::Warning`].
    pub warnings: usize,
    /// Violations at [`Severity::Info`].
    pub infos: usize,
    /// Violations with an automatic fix.
    pub fixable: usize,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} error(s), {} warning(s), {} info(s)",
            self.errors, self.warnings, self.infos
        )?;
        if self.fixable > 0 {
            write!(f, ", {} fixable", self.fixable)?;
        }
        Ok(())
    }
}

/// Result of running lint analysis.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All violations found, ordered by file and position.
    pub violations: Vec<Violation>,
    /// Number of files checked.
    pub files_checked: usize,
    /// Files skipped because the frontend could not parse them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unparsed: Vec<PathBuf>,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts violations by severity.
    #[must_use]
    pub fn summary(&self) -> Summary {
        self.violations
            .iter()
            .fold(Summary::default(), |mut summary, v| {
                match v.severity {
                    Severity::Error => summary.errors += 1,
                    Severity::Warning => summary.warnings += 1,
                    Severity::Info => summary.infos += 1,
                }
                summary.fixable += usize::from(v.is_fixable());
                summary
            })
    }

    /// Checks if any violations meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations.iter().any(|v| v.severity >= severity)
    }

    /// Formats violations at or above `fail_on` as a multi-line report,
    /// suitable for a failing test assertion.
    #[must_use]
    pub fn format_test_report(&self, fail_on: Severity) -> String {
        use std::fmt::Write;

        let mut report = String::new();
        let failing = self.violations.iter().filter(|v| v.severity >= fail_on);
        for v in failing {
            let _ = writeln!(report, "{v}");
            if let Some(suggestion) = &v.suggestion {
                let _ = writeln!(report, "  = help: {}", suggestion.message);
            }
        }
        for path in &self.unparsed {
            let _ = writeln!(report, "{}: not parsed", path.display());
        }
        let _ = write!(
            report,
            "arkui-lint: {} in {} file(s)",
            self.summary(),
            self.files_checked
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_violation(severity: Severity) -> Violation {
        Violation::new(
            "AK001",
            "monitor-decorator-check",
            severity,
            Location::new(PathBuf::from("pages/Index.ets"), 12, 3),
            "The Monitor decorator needs to monitor the state variables that exist.",
        )
    }

    #[test]
    fn violation_display_is_compact() {
        let v = make_violation(Severity::Warning);
        insta::assert_snapshot!(
            v.to_string(),
            @"pages/Index.ets:12:3: warning [AK001] The Monitor decorator needs to monitor the state variables that exist."
        );
    }

    #[test]
    fn severity_parses_config_spellings() {
        assert_eq!("warn".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!("error".parse::<Severity>(), Ok(Severity::Error));
        assert!("fatal".parse::<Severity>().is_err());
        assert!(Severity::Error > Severity::Warning);
    }

    #[test]
    fn message_id_is_skipped_when_absent() {
        let v = make_violation(Severity::Error);
        let json = serde_json::to_string(&v).expect("serializable");
        assert!(!json.contains("message_id"));

        let v = v.with_message_id("monitorTargetInvalid");
        let json = serde_json::to_string(&v).expect("serializable");
        assert!(json.contains("\"message_id\":\"monitorTargetInvalid\""));
    }

    #[test]
    fn diagnostic_carries_span() {
        let v = make_violation(Severity::Error);
        let v = Violation {
            location: v.location.clone().with_span(40, 8),
            ..v
        };
        let diag = ViolationDiagnostic::from(&v).with_source("Index.ets", " ".repeat(64));
        assert_eq!(diag.span, SourceSpan::from((40, 8)));
        assert!(diag.message.starts_with("[AK001] "));
    }

    // --- LintResult tests ---

    #[test]
    fn has_violations_at_error_only() {
        let mut result = LintResult::new();
        result.violations.push(make_violation(Severity::Warning));
        assert!(!result.has_violations_at(Severity::Error));
        assert!(result.has_violations_at(Severity::Warning));
    }

    #[test]
    fn summary_counts_levels_and_fixes() {
        let fix = Replacement::new(Location::new(PathBuf::from("pages/Index.ets"), 12, 3), "");
        let mut result = LintResult::new();
        result.violations.push(make_violation(Severity::Warning));
        result.violations.push(make_violation(Severity::Error));
        result.violations.push(
            make_violation(Severity::Error)
                .with_suggestion(Suggestion::with_fix("Remove the annotation", fix)),
        );

        let summary = result.summary();
        assert_eq!(
            summary,
            Summary {
                errors: 2,
                warnings: 1,
                infos: 0,
                fixable: 1,
            }
        );
        assert_eq!(summary.to_string(), "2 error(s), 1 warning(s), 0 info(s), 1 fixable");
    }

    #[test]
    fn test_report_lists_failing_violations() {
        let mut result = LintResult::new();
        result.files_checked = 5;
        result.violations.push(make_violation(Severity::Warning));
        result.violations.push(
            make_violation(Severity::Error).with_suggestion(Suggestion::new("Remove @Monitor")),
        );
        result.unparsed.push(PathBuf::from("pages/Broken.ets"));

        insta::assert_snapshot!(result.format_test_report(Severity::Error), @r"
        pages/Index.ets:12:3: error [AK001] The Monitor decorator needs to monitor the state variables that exist.
          = help: Remove @Monitor
        pages/Broken.ets: not parsed
        arkui-lint: 1 error(s), 1 warning(s), 0 info(s) in 5 file(s)
        ");
    }
}
