//! Rule to forbid repeating a decorator on a struct or method.
//!
//! # Detected Patterns
//!
//! ```ignore
//! @ComponentV2
//! @ComponentV2
//! struct Index {}
//! ```
//!
//! Every occurrence of a repeated decorator is reported. All but the last
//! carry a fix that removes them.

use arkui_lint_core::ast::{NodeId, NodeKind};
use arkui_lint_core::{
    Fix, Message, Report, Reporter, Rule, RuleConfig, RuleContext, RuleHandler, Severity,
};

use crate::decorators::{ENTRY, PREVIEW};

/// Rule code for no-duplicate-decorators.
pub const CODE: &str = "AK002";

/// Rule name for no-duplicate-decorators.
pub const NAME: &str = "no-duplicate-decorators";

const DUPLICATE_STRUCT: Message = Message::new(
    "duplicateStructDecorators",
    "Duplicate '{{decoratorName}}' decorators for struct are not allowed.",
);
const DUPLICATE_METHOD: Message = Message::new(
    "duplicateMethodDecorators",
    "Duplicate '{{decoratorName}}' decorators for method are not allowed.",
);

/// Forbids duplicate decorators on structs and methods.
#[derive(Debug, Clone)]
pub struct NoDuplicateDecorators {
    /// Severity level.
    pub severity: Severity,
    /// Decorator names that may repeat.
    pub ignore: Vec<String>,
}

impl Default for NoDuplicateDecorators {
    fn default() -> Self {
        Self::new()
    }
}

impl NoDuplicateDecorators {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
            ignore: vec![ENTRY.to_string(), PREVIEW.to_string()],
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Adds a decorator name that may repeat.
    #[must_use]
    pub fn ignore(mut self, name: impl Into<String>) -> Self {
        self.ignore.push(name.into());
        self
    }

    fn is_ignored(&self, name: &str) -> bool {
        self.ignore.iter().any(|i| i == name)
    }
}

impl Rule for NoDuplicateDecorators {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids repeating a decorator on a struct or method"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn configure(&mut self, config: &RuleConfig) {
        if config.options.contains_key("ignore") {
            self.ignore = config.get_str_array("ignore");
        }
    }

    fn setup<'a>(&'a self, _ctx: &RuleContext<'_>) -> Box<dyn RuleHandler + 'a> {
        Box::new(DuplicateHandler { rule: self })
    }
}

struct DuplicateHandler<'r> {
    rule: &'r NoDuplicateDecorators,
}

impl RuleHandler for DuplicateHandler<'_> {
    fn parsed(&mut self, node: NodeId, ctx: &RuleContext<'_>, reporter: &mut Reporter<'_>) {
        let message = match ctx.ast.kind(node) {
            NodeKind::Struct(_) => DUPLICATE_STRUCT,
            NodeKind::Method(_) => DUPLICATE_METHOD,
            _ => return,
        };

        // Grouped by name in order of first appearance.
        let mut groups: Vec<(&str, Vec<NodeId>)> = Vec::new();
        for (id, annotation) in ctx.ast.annotations(node) {
            let name = annotation.name.as_str();
            if self.rule.is_ignored(name) {
                continue;
            }
            match groups.iter_mut().find(|(n, _)| *n == name) {
                Some((_, ids)) => ids.push(id),
                None => groups.push((name, vec![id])),
            }
        }

        for (name, ids) in groups.iter().filter(|(_, ids)| ids.len() > 1) {
            let Some((last, rest)) = ids.split_last() else {
                continue;
            };
            for &id in rest {
                let span = ctx.ast.span(id);
                reporter.report(
                    Report::new(id, message)
                        .data("decoratorName", *name)
                        .fix(Fix::remove(
                            format!("Remove the duplicate @{name}"),
                            span.start..span.end,
                        )),
                );
            }
            reporter.report(Report::new(*last, message).data("decoratorName", *name));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arkui_lint_core::ast::{Accessor, Annotation, MethodDecl, StructDecl};
    use arkui_lint_core::{
        Ast, AstBuilder, ComponentsInfo, FileContext, Processor, Span, Violation,
    };
    use std::path::{Path, PathBuf};

    fn annotation(name: &str) -> NodeKind {
        NodeKind::Annotation(Annotation {
            name: name.into(),
            name_span: Span::default(),
            args: Vec::new(),
        })
    }

    fn page(struct_annotations: &[&str], method_annotations: &[&str]) -> Ast {
        let mut b = AstBuilder::new(Span::new(0, 10_000, 1, 1));
        let root = b.root();
        let s = b.child(root, NodeKind::Struct(StructDecl { name: "Index".into() }));
        for name in struct_annotations {
            b.child(s, annotation(name));
        }
        let m = b.child(
            s,
            NodeKind::Method(MethodDecl {
                name: "build".into(),
                accessor: Accessor::Plain,
                return_type: None,
                is_static: false,
            }),
        );
        for name in method_annotations {
            b.child(m, annotation(name));
        }
        b.finish()
    }

    fn run(ast: &Ast, rule: &NoDuplicateDecorators) -> Vec<Violation> {
        let content = " ".repeat(10_000);
        let file = FileContext {
            path: Path::new("Index.ets"),
            content: &content,
            relative_path: PathBuf::from("Index.ets"),
        };
        let components = ComponentsInfo::default();
        let ctx = RuleContext::new(&file, ast, &components);
        let violations = Processor::new([rule], &ctx).transform(ast.root());
        violations
    }

    #[test]
    fn test_reports_every_occurrence() {
        let ast = page(&["ComponentV2", "ComponentV2", "ComponentV2"], &[]);
        let violations = run(&ast, &NoDuplicateDecorators::new());
        assert_eq!(violations.len(), 3);
        assert_eq!(
            violations[0].message,
            "Duplicate 'ComponentV2' decorators for struct are not allowed."
        );
        assert!(violations[0].suggestion.is_some());
        assert!(violations[1].suggestion.is_some());
        assert!(violations[2].suggestion.is_none());
    }

    #[test]
    fn test_methods_and_unique_decorators() {
        let ast = page(&["ComponentV2"], &["Monitor", "Computed", "Monitor"]);
        let violations = run(&ast, &NoDuplicateDecorators::new());
        assert_eq!(violations.len(), 2);
        assert!(violations
            .iter()
            .all(|v| v.message_id.as_deref() == Some("duplicateMethodDecorators")));
    }

    #[test]
    fn test_entry_and_preview_ignored() {
        let ast = page(&["Entry", "Entry", "Preview", "Preview", "ComponentV2"], &[]);
        assert!(run(&ast, &NoDuplicateDecorators::new()).is_empty());
    }

    #[test]
    fn test_configured_ignore_list_replaces_default() {
        let config: RuleConfig = toml::from_str("ignore = [\"Reusable\"]").unwrap();
        let mut rule = NoDuplicateDecorators::new();
        rule.configure(&config);

        let ast = page(&["Reusable", "Reusable", "Entry", "Entry"], &[]);
        let violations = run(&ast, &rule);
        assert_eq!(violations.len(), 2);
        assert!(violations[0].message.contains("'Entry'"));
    }
}
