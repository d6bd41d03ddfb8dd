//! # arkui-lint-core
//!
//! Core framework for linting ArkTS decorator usage.
//!
//! This crate provides the foundational traits and types for building
//! decorator-aware linters. It includes:
//!
//! - [`Ast`], the decorator-aware syntax tree rules walk
//! - [`SymbolCatalog`], the per-file index of declarations and members
//! - [`Rule`] and [`RuleHandler`] for per-file rules
//! - [`Processor`], which fans every node out to all handlers
//! - [`Reporter`], which turns [`Report`]s into [`Violation`]s
//! - [`Analyzer`] for orchestrating lint execution over a project
//!
//! ## Example
//!
//! ```ignore
//! use arkui_lint_core::Analyzer;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./entry/src/main/ets")
//!     .parser(EtsParser::new())
//!     .rule(MonitorDecoratorCheck::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! print!("{}", result.format_test_report(Severity::Error));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod parser;
mod rule;
mod traversal;
mod types;

/// Decorator-aware syntax tree.
pub mod ast;
/// Diagnostic reporting.
pub mod report;
/// Symbol catalog of declarations and members.
pub mod symbols;
/// Utility modules for rule implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use ast::{Ast, AstBuilder, NodeId, NodeKind, Span};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::{ComponentsInfo, FileContext, RuleContext};
pub use parser::{ParseError, SourceParser};
pub use report::{Fix, Level, Message, Report, Reporter};
pub use rule::{Rule, RuleBox, RuleHandler, RuleMeta};
pub use symbols::SymbolCatalog;
pub use traversal::Processor;
pub use types::{
    LintResult, Location, Replacement, Severity, Suggestion, Summary, Violation,
    ViolationDiagnostic,
};
pub use utils::allowance::AllowCheck;
