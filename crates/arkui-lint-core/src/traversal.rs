//! Traversal driver and rule processor.
//!
//! A [`Processor`] owns one handler per registered rule for a single
//! compilation unit. [`Processor::transform`] runs the lifecycle:
//! `before_transform` on every handler, a pre-order depth-first walk that
//! hands each node to every handler in registration order, then
//! `after_transform`.

use tracing::trace;

use crate::ast::NodeId;
use crate::context::RuleContext;
use crate::report::Reporter;
use crate::rule::{Rule, RuleHandler, RuleMeta};
use crate::types::{Severity, Violation};

struct Entry<'a> {
    meta: RuleMeta,
    handler: Box<dyn RuleHandler + 'a>,
}

/// Fans nodes out to the handlers of all registered rules.
pub struct Processor<'a> {
    ctx: &'a RuleContext<'a>,
    entries: Vec<Entry<'a>>,
    violations: Vec<Violation>,
}

impl<'a> Processor<'a> {
    /// Sets up a handler for each rule, in order.
    pub fn new<R, I>(rules: I, ctx: &'a RuleContext<'a>) -> Self
    where
        R: Rule + ?Sized + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        Self::with_severities(rules, ctx, |_| None)
    }

    /// Like [`Processor::new`], with `severity_of(rule_name)` replacing a
    /// rule's default severity.
    pub fn with_severities<R, I, F>(rules: I, ctx: &'a RuleContext<'a>, severity_of: F) -> Self
    where
        R: Rule + ?Sized + 'a,
        I: IntoIterator<Item = &'a R>,
        F: Fn(&str) -> Option<Severity>,
    {
        let entries = rules
            .into_iter()
            .map(|rule| Entry {
                meta: RuleMeta::of(rule).with_severity(severity_of(rule.name())),
                handler: rule.setup(ctx),
            })
            .collect();

        Self {
            ctx,
            entries,
            violations: Vec::new(),
        }
    }

    /// Number of active handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no rule is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Runs one full pass rooted at `root` and returns its findings in
    /// emission order.
    pub fn transform(&mut self, root: NodeId) -> Vec<Violation> {
        for entry in &mut self.entries {
            entry.handler.before_transform();
        }

        self.visit(root);

        for entry in &mut self.entries {
            entry.handler.after_transform();
        }

        std::mem::take(&mut self.violations)
    }

    /// Pre-order walk; children are visited in source order.
    fn visit(&mut self, root: NodeId) {
        let ast = self.ctx.ast;
        let mut stack = vec![root];

        while let Some(node) = stack.pop() {
            trace!(node = node.index(), "visit");
            self.process(node);
            stack.extend(ast.children(node).iter().rev());
        }
    }

    /// Dispatches `node` to every handler in registration order.
    fn process(&mut self, node: NodeId) {
        let ctx = self.ctx;
        for entry in &mut self.entries {
            let mut reporter = Reporter::new(entry.meta, ctx, &mut self.violations);
            entry.handler.parsed(node, ctx, &mut reporter);
        }
    }
}
