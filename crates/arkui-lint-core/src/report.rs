//! Diagnostic reporting for rule handlers.
//!
//! Handlers describe a finding with a [`Report`]; the [`Reporter`] turns it
//! into a [`Violation`]: it formats the message template, resolves the
//! severity, converts byte ranges into locations and honours inline
//! `// arkui-lint: allow(...)` directives.

use std::ops::Range;

use crate::ast::NodeId;
use crate::context::RuleContext;
use crate::rule::RuleMeta;
use crate::types::{Location, Replacement, Severity, Suggestion, Violation};
use crate::utils::allowance::check_allow_with_reason;

/// Per-call severity of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Emit as an error.
    Error,
    /// Emit as a warning.
    Warn,
    /// Emit nothing.
    Suppressed,
}

/// A message template with its stable identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message {
    /// Stable identifier, e.g. `monitorTargetInvalid`.
    pub id: &'static str,
    /// Template text with `{{key}}` placeholders.
    pub template: &'static str,
}

impl Message {
    /// Creates a message.
    #[must_use]
    pub const fn new(id: &'static str, template: &'static str) -> Self {
        Self { id, template }
    }
}

/// A textual edit that repairs a finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fix {
    /// Short description shown to the user.
    pub title: String,
    /// Byte range to replace.
    pub range: Range<usize>,
    /// Replacement text.
    pub code: String,
}

impl Fix {
    /// Replaces `range` with `code`.
    #[must_use]
    pub fn replace(title: impl Into<String>, range: Range<usize>, code: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            range,
            code: code.into(),
        }
    }

    /// Inserts `code` at `offset`.
    #[must_use]
    pub fn insert(title: impl Into<String>, offset: usize, code: impl Into<String>) -> Self {
        Self::replace(title, offset..offset, code)
    }

    /// Deletes `range`.
    #[must_use]
    pub fn remove(title: impl Into<String>, range: Range<usize>) -> Self {
        Self::replace(title, range, "")
    }
}

/// One finding, as described by a rule handler.
#[derive(Debug, Clone)]
pub struct Report {
    node: NodeId,
    message: Message,
    data: Vec<(String, String)>,
    fix: Option<Fix>,
    level: Option<Level>,
}

impl Report {
    /// Creates a report anchored on `node`.
    #[must_use]
    pub fn new(node: NodeId, message: Message) -> Self {
        Self {
            node,
            message,
            data: Vec::new(),
            fix: None,
            level: None,
        }
    }

    /// Adds a placeholder value.
    #[must_use]
    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.push((key.into(), value.into()));
        self
    }

    /// Attaches a fix.
    #[must_use]
    pub fn fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    /// Overrides the rule's default severity for this report.
    #[must_use]
    pub fn level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }
}

/// Replaces every `{{key}}` in `template` with its value from `data`.
///
/// Unknown keys are left verbatim and substituted values are never
/// re-scanned.
#[must_use]
pub fn format_message(template: &str, data: &[(String, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            out.push_str(&rest[open..]);
            return out;
        };
        let key = &after[..close];
        match data.iter().find(|(k, _)| k == key.trim()) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push_str("{{");
                out.push_str(key);
                out.push_str("}}");
            }
        }
        rest = &after[close + 2..];
    }

    out.push_str(rest);
    out
}

/// Sink through which a handler emits findings for one rule.
pub struct Reporter<'a> {
    rule: RuleMeta,
    ctx: &'a RuleContext<'a>,
    sink: &'a mut Vec<Violation>,
}

impl<'a> Reporter<'a> {
    /// Creates a reporter appending to `sink`.
    #[must_use]
    pub fn new(rule: RuleMeta, ctx: &'a RuleContext<'a>, sink: &'a mut Vec<Violation>) -> Self {
        Self { rule, ctx, sink }
    }

    /// Emits `report` unless it is suppressed by level or allow directive.
    pub fn report(&mut self, report: Report) {
        let severity = match report.level {
            Some(Level::Suppressed) => return,
            Some(Level::Error) => Severity::Error,
            Some(Level::Warn) => Severity::Warning,
            None => self.rule.default_severity,
        };

        let span = self.ctx.ast.span(report.node);
        let location = self.location(span.start, span.len());

        let allow = check_allow_with_reason(
            self.ctx.file.content,
            location.line,
            &[self.rule.name, self.rule.code],
        );
        if allow.is_allowed() {
            if self.rule.requires_allow_reason && allow.reason().is_none() {
                self.sink.push(
                    Violation::new(
                        self.rule.code,
                        self.rule.name,
                        Severity::Warning,
                        location,
                        format!(
                            "Allow directive for '{}' is missing required reason",
                            self.rule.name
                        ),
                    )
                    .with_suggestion(Suggestion::new(
                        "Add reason=\"...\" to explain why this exception is necessary",
                    )),
                );
            }
            return;
        }

        let message = format_message(report.message.template, &report.data);
        let mut violation = Violation::new(
            self.rule.code,
            self.rule.name,
            severity,
            location,
            message,
        )
        .with_message_id(report.message.id);

        if let Some(fix) = report.fix {
            let replacement = Replacement::new(
                self.location(fix.range.start, fix.range.len()),
                fix.code,
            );
            violation = violation.with_suggestion(Suggestion::with_fix(fix.title, replacement));
        }

        self.sink.push(violation);
    }

    fn location(&self, offset: usize, length: usize) -> Location {
        let (line, column) = self.ctx.file.position_at(offset);
        Location::new(self.ctx.file.relative_path.clone(), line, column).with_span(offset, length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstBuilder, NodeKind, Span};
    use crate::context::{ComponentsInfo, FileContext};
    use std::path::{Path, PathBuf};

    const MSG: Message = Message::new("dup", "Duplicate '{{name}}' on {{target}}.");

    fn data(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn meta(default_severity: Severity) -> RuleMeta {
        RuleMeta {
            name: "test-rule",
            code: "AK999",
            default_severity,
            requires_allow_reason: default_severity == Severity::Error,
        }
    }

    fn run<F>(content: &str, span: Span, reports: F, severity: Severity) -> Vec<Violation>
    where
        F: Fn(NodeId) -> Vec<Report>,
    {
        let mut b = AstBuilder::new(Span::new(0, content.len(), 1, 1));
        let node = b.push(b.root(), NodeKind::Other("stmt".into()), span);
        let ast = b.finish();

        let file = FileContext {
            path: Path::new("Index.ets"),
            content,
            relative_path: PathBuf::from("Index.ets"),
        };
        let components = ComponentsInfo::default();
        let ctx = RuleContext::new(&file, &ast, &components);
        let mut sink = Vec::new();
        let mut reporter = Reporter::new(meta(severity), &ctx, &mut sink);
        for r in reports(node) {
            reporter.report(r);
        }
        sink
    }

    #[test]
    fn format_replaces_known_keys() {
        let out = format_message(MSG.template, &data(&[("name", "Local"), ("target", "x")]));
        assert_eq!(out, "Duplicate 'Local' on x.");
    }

    #[test]
    fn format_leaves_unknown_keys_verbatim() {
        let out = format_message(MSG.template, &data(&[("name", "Local")]));
        assert_eq!(out, "Duplicate 'Local' on {{target}}.");
    }

    #[test]
    fn format_does_not_recurse() {
        let out = format_message("{{a}}", &data(&[("a", "{{b}}"), ("b", "deep")]));
        assert_eq!(out, "{{b}}");
    }

    #[test]
    fn format_handles_unclosed_placeholder() {
        let out = format_message("value {{oops", &data(&[("oops", "x")]));
        assert_eq!(out, "value {{oops");
    }

    #[test]
    fn level_overrides_default_severity() {
        let content = "let a = 1;\nlet b = 2;\n";
        let span = Span::new(11, 21, 2, 1);
        let out = run(
            content,
            span,
            |node| {
                vec![
                    Report::new(node, MSG).level(Level::Warn),
                    Report::new(node, MSG),
                    Report::new(node, MSG).level(Level::Suppressed),
                ]
            },
            Severity::Error,
        );
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].severity, Severity::Warning);
        assert_eq!(out[1].severity, Severity::Error);
        assert_eq!(out[0].location.line, 2);
        assert_eq!(out[0].location.column, 1);
        assert_eq!(out[0].location.offset, 11);
        assert_eq!(out[0].location.length, 10);
        assert_eq!(out[0].message_id.as_deref(), Some("dup"));
    }

    #[test]
    fn fix_becomes_replacement() {
        let content = "@Trace @Trace x: number = 0;\n";
        let span = Span::new(0, 6, 1, 1);
        let out = run(
            content,
            span,
            |node| vec![Report::new(node, MSG).fix(Fix::remove("Remove the duplicate", 0..7))],
            Severity::Error,
        );
        let suggestion = out[0].suggestion.as_ref().expect("suggestion");
        assert_eq!(suggestion.message, "Remove the duplicate");
        let replacement = suggestion.replacement.as_ref().expect("replacement");
        assert_eq!(replacement.location.offset, 0);
        assert_eq!(replacement.location.length, 7);
        assert_eq!(replacement.new_text, "");
    }

    #[test]
    fn allow_directive_with_reason_suppresses() {
        let content = "// arkui-lint: allow(test-rule) reason=\"legacy page\"\n@Monitor('a')\n";
        let span = Span::new(53, 66, 2, 1);
        let out = run(content, span, |node| vec![Report::new(node, MSG)], Severity::Error);
        assert!(out.is_empty());
    }

    #[test]
    fn allow_directive_without_reason_warns_for_error_rules() {
        let content = "// arkui-lint: allow(test-rule)\n@Monitor('a')\n";
        let span = Span::new(32, 45, 2, 1);
        let out = run(content, span, |node| vec![Report::new(node, MSG)], Severity::Error);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].severity, Severity::Warning);
        assert!(out[0].message.contains("missing required reason"));

        let out = run(content, span, |node| vec![Report::new(node, MSG)], Severity::Warning);
        assert!(out.is_empty());
    }
}
