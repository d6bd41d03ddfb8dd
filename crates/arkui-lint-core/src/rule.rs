//! Rule traits for defining lint rules.

use crate::ast::NodeId;
use crate::config::RuleConfig;
use crate::context::RuleContext;
use crate::report::Reporter;
use crate::types::Severity;

/// A lint rule over the decorator-aware syntax tree.
///
/// A rule is a stateless factory: for every compilation unit the engine
/// calls [`Rule::setup`] and drives the returned [`RuleHandler`] through one
/// pass. Per-pass caches belong on the handler, never on the rule.
///
/// # Example
///
/// ```ignore
/// use arkui_lint_core::{NodeId, Report, Reporter, Rule, RuleContext, RuleHandler};
///
/// pub struct NoEntry;
///
/// impl Rule for NoEntry {
///     fn name(&self) -> &'static str { "no-entry" }
///     fn code(&self) -> &'static str { "AK900" }
///
///     fn setup<'a>(&'a self, _ctx: &RuleContext<'_>) -> Box<dyn RuleHandler + 'a> {
///         Box::new(NoEntryHandler)
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "monitor-decorator-check").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "AK001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Whether this rule requires a reason when using allow directives.
    ///
    /// By default, rules with `Severity::Error` require a reason.
    /// Override this to customize the requirement.
    fn requires_allow_reason(&self) -> bool {
        self.default_severity() == Severity::Error
    }

    /// Applies rule-specific options from `[rules.<name>]`.
    ///
    /// The default ignores all options.
    fn configure(&mut self, _config: &RuleConfig) {}

    /// Creates the handler for one compilation unit.
    fn setup<'a>(&'a self, ctx: &RuleContext<'_>) -> Box<dyn RuleHandler + 'a>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

/// Per-pass state machine of a rule.
///
/// Every hook has an empty default so handlers only implement what they
/// need.
pub trait RuleHandler {
    /// Called once before the walk; resets per-pass caches.
    fn before_transform(&mut self) {}

    /// Called for every node in pre-order.
    fn parsed(&mut self, _node: NodeId, _ctx: &RuleContext<'_>, _reporter: &mut Reporter<'_>) {}

    /// Called once after the walk.
    fn after_transform(&mut self) {}
}

/// Identity of a rule captured at setup time for the reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMeta {
    /// Rule name.
    pub name: &'static str,
    /// Rule code.
    pub code: &'static str,
    /// Severity used when a report does not set a level.
    pub default_severity: Severity,
    /// Whether allow directives must carry a reason.
    pub requires_allow_reason: bool,
}

impl RuleMeta {
    /// Captures the identity of `rule`.
    #[must_use]
    pub fn of<R: Rule + ?Sized>(rule: &R) -> Self {
        Self {
            name: rule.name(),
            code: rule.code(),
            default_severity: rule.default_severity(),
            requires_allow_reason: rule.requires_allow_reason(),
        }
    }

    /// Replaces the default severity when `severity` is set.
    ///
    /// Reports with an explicit level keep it.
    #[must_use]
    pub fn with_severity(mut self, severity: Option<Severity>) -> Self {
        if let Some(severity) = severity {
            self.default_severity = severity;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestRule;

    struct NoopHandler;

    impl RuleHandler for NoopHandler {}

    impl Rule for TestRule {
        fn name(&self) -> &'static str {
            "test-rule"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }
        fn description(&self) -> &'static str {
            "A test rule"
        }
        fn default_severity(&self) -> Severity {
            Severity::Warning
        }

        fn setup<'a>(&'a self, _ctx: &RuleContext<'_>) -> Box<dyn RuleHandler + 'a> {
            Box::new(NoopHandler)
        }
    }

    #[test]
    fn test_rule_trait() {
        let rule = TestRule;
        assert_eq!(rule.name(), "test-rule");
        assert_eq!(rule.code(), "TEST001");
        assert!(!rule.requires_allow_reason());
    }

    #[test]
    fn test_rule_meta_captures_identity() {
        let meta = RuleMeta::of(&TestRule);
        assert_eq!(meta.name, "test-rule");
        assert_eq!(meta.default_severity, Severity::Warning);
        assert!(!meta.requires_allow_reason);
    }

    #[test]
    fn test_rule_meta_severity_override() {
        let meta = RuleMeta::of(&TestRule);
        assert_eq!(meta.with_severity(None).default_severity, Severity::Warning);
        assert_eq!(
            meta.with_severity(Some(Severity::Error)).default_severity,
            Severity::Error
        );
    }
}
