//! Rule to validate `@Monitor` placement and monitored paths.
//!
//! # Rationale
//!
//! `@Monitor` only fires for state that the V2 state management can observe.
//! A monitor in a class without `@ObservedV2`, in a struct without
//! `@ComponentV2`, on a property, or watching a path that does not reach a
//! decorated member silently never triggers.
//!
//! # Detected Patterns
//!
//! - `@Monitor` combined with other annotations on the same method
//! - `@Monitor` methods in classes without `@ObservedV2` (or with the legacy
//!   `@Observed`)
//! - `@Monitor` methods in structs without `@ComponentV2` (or with the legacy
//!   `@Component`)
//! - `@Monitor` on a property
//! - Monitored paths that do not exist, or reach undecorated members
//!
//! # Good Patterns
//!
//! ```ignore
//! @ObservedV2
//! class Store {
//!   @Trace items: Item[] = [];
//!
//!   @Monitor('items.0.name', 'items.length')
//!   onItems(monitor: IMonitor) {}
//! }
//! ```

mod path;

pub use path::{is_index, PathResolver, Verdict};

use arkui_lint_core::ast::{Annotation, AnnotationArg, NodeId, NodeKind};
use arkui_lint_core::symbols::{Declaration, SymbolCatalog};
use arkui_lint_core::{
    Fix, Level, Message, Report, Reporter, Rule, RuleConfig, RuleContext, RuleHandler, Severity,
};
use tracing::{debug, trace};

use crate::decorators::{COMPONENT_V1, COMPONENT_V2, MONITOR, OBSERVED_V1, OBSERVED_V2};

/// Rule code for monitor-decorator-check.
pub const CODE: &str = "AK001";

/// Rule name for monitor-decorator-check.
pub const NAME: &str = "monitor-decorator-check";

const USED_ALONE: Message = Message::new(
    "monitorUsedAlone",
    "The member property or method can not be decorated by multiple built-in annotations.",
);
const USED_IN_OBSERVED_V2_CLASS: Message = Message::new(
    "monitorUsedInObservedV2Class",
    "The '@Monitor' can decorate only member method within a 'class' decorated with @ObservedV2.",
);
const USED_IN_COMPONENT_V2_STRUCT: Message = Message::new(
    "monitorUsedInComponentV2Struct",
    "The '@Monitor' annotation can only be used in a 'struct' decorated with '@ComponentV2'.",
);
const DECORATE_METHOD: Message =
    Message::new("monitorDecorateMethod", "@Monitor can only decorate method.");
const TARGET_INVALID: Message = Message::new(
    "monitorTargetInvalid",
    "The Monitor decorator needs to monitor the state variables that exist.",
);

/// Validates `@Monitor` usage.
#[derive(Debug, Clone)]
pub struct MonitorDecoratorCheck {
    /// Severity level.
    pub severity: Severity,
    /// Whether monitored paths are resolved.
    pub check_paths: bool,
}

impl Default for MonitorDecoratorCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl MonitorDecoratorCheck {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
            check_paths: true,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Enables or disables path resolution.
    #[must_use]
    pub fn check_paths(mut self, check: bool) -> Self {
        self.check_paths = check;
        self
    }
}

impl Rule for MonitorDecoratorCheck {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Validates @Monitor placement and monitored state paths"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn configure(&mut self, config: &RuleConfig) {
        self.check_paths = config.get_bool("check_paths", self.check_paths);
    }

    fn setup<'a>(&'a self, _ctx: &RuleContext<'_>) -> Box<dyn RuleHandler + 'a> {
        Box::new(MonitorHandler {
            rule: self,
            catalog: SymbolCatalog::new(),
        })
    }
}

/// Host kinds a monitor can live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Host {
    Class,
    Struct,
}

impl Host {
    fn required(self) -> &'static str {
        match self {
            Self::Class => OBSERVED_V2,
            Self::Struct => COMPONENT_V2,
        }
    }

    fn legacy(self) -> &'static str {
        match self {
            Self::Class => OBSERVED_V1,
            Self::Struct => COMPONENT_V1,
        }
    }

    fn message(self) -> Message {
        match self {
            Self::Class => USED_IN_OBSERVED_V2_CLASS,
            Self::Struct => USED_IN_COMPONENT_V2_STRUCT,
        }
    }
}

struct MonitorHandler<'r> {
    rule: &'r MonitorDecoratorCheck,
    catalog: SymbolCatalog,
}

impl RuleHandler for MonitorHandler<'_> {
    fn before_transform(&mut self) {
        self.catalog.clear();
    }

    fn parsed(&mut self, node: NodeId, ctx: &RuleContext<'_>, reporter: &mut Reporter<'_>) {
        let host = match ctx.ast.kind(node) {
            NodeKind::Module => {
                self.catalog = SymbolCatalog::build(ctx.ast);
                debug!("Cataloged {} declarations", self.catalog.len());
                return;
            }
            NodeKind::Class(_) => Host::Class,
            NodeKind::Struct(_) => Host::Struct,
            _ => return,
        };
        self.check_host(node, host, ctx, reporter);
    }
}

impl MonitorHandler<'_> {
    fn check_host(
        &self,
        node: NodeId,
        host: Host,
        ctx: &RuleContext<'_>,
        reporter: &mut Reporter<'_>,
    ) {
        let ast = ctx.ast;
        let mut monitored: Vec<(NodeId, &Annotation)> = Vec::new();

        for member in ast.members(node) {
            let Some((monitor, annotation)) =
                ast.annotations(member).find(|(_, a)| a.name == MONITOR)
            else {
                continue;
            };

            match ast.kind(member) {
                NodeKind::Property(_) => {
                    let span = ast.span(monitor);
                    reporter.report(Report::new(monitor, DECORATE_METHOD).fix(Fix::remove(
                        "Remove the @Monitor annotation",
                        span.start..span.end,
                    )));
                }
                NodeKind::Method(_) => {
                    let others = ast
                        .annotations(member)
                        .filter(|(id, a)| *id != monitor && a.name != MONITOR);
                    for (other, _) in others {
                        let span = ast.span(other);
                        reporter.report(
                            Report::new(other, USED_ALONE)
                                .fix(Fix::remove("Remove the annotation", span.start..span.end)),
                        );
                    }
                    monitored.push((monitor, annotation));
                }
                _ => {}
            }
        }

        let Some(&(first, _)) = monitored.first() else {
            return;
        };

        if !ast.has_annotation(node, host.required()) {
            let legacy = ast.annotations(node).find(|(_, a)| a.name == host.legacy());
            let fix = match legacy {
                Some((_, annotation)) => {
                    let name = annotation.name_span;
                    Fix::replace(
                        format!("Change @{} to @{}", host.legacy(), host.required()),
                        name.start..name.end,
                        host.required(),
                    )
                }
                None => Fix::insert(
                    format!("Add @{} annotation", host.required()),
                    ast.span(node).start,
                    format!("@{}\n", host.required()),
                ),
            };
            reporter.report(Report::new(first, host.message()).fix(fix));
            return;
        }

        if !self.rule.check_paths {
            return;
        }

        let Some(decl) = Declaration::from_node(ast, node) else {
            return;
        };
        let resolver = PathResolver::new(&self.catalog);
        for (monitor, annotation) in monitored {
            for path in self.monitor_paths(&annotation.args) {
                let report = Report::new(monitor, TARGET_INVALID);
                let report = match resolver.resolve(&decl, &path) {
                    None | Some(Verdict::Valid) => continue,
                    Some(Verdict::Warn) => report.level(Level::Warn),
                    Some(Verdict::Error) => report,
                };
                trace!(path = %path, "invalid monitor target");
                reporter.report(report);
            }
        }
    }

    /// Path strings named by the monitor's arguments, in order.
    fn monitor_paths(&self, args: &[AnnotationArg]) -> Vec<String> {
        let mut paths = Vec::new();
        for arg in args {
            self.collect_paths(arg, &mut paths);
        }
        paths
    }

    fn collect_paths(&self, arg: &AnnotationArg, out: &mut Vec<String>) {
        match arg {
            AnnotationArg::Str(path) | AnnotationArg::Ident(path) => out.push(path.clone()),
            AnnotationArg::Member { object, property } => {
                if let Some(value) = self.catalog.enum_value(&format!("{object}.{property}")) {
                    out.push(value.to_string());
                }
            }
            AnnotationArg::Array(items) => {
                for item in items {
                    self.collect_paths(item, out);
                }
            }
            AnnotationArg::Object(pairs) => {
                for (_, value) in pairs {
                    self.collect_paths(value, out);
                }
            }
            AnnotationArg::Other => {}
        }
    }
}
