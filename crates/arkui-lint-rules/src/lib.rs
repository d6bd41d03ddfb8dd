//! # arkui-lint-rules
//!
//! Built-in lint rules for arkui-lint.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | AK001 | `monitor-decorator-check` | Validates `@Monitor` placement and monitored state paths |
//! | AK002 | `no-duplicate-decorators` | Forbids repeating a decorator on a struct or method |
//!
//! ## Usage
//!
//! ```ignore
//! use arkui_lint_core::Analyzer;
//! use arkui_lint_rules::{MonitorDecoratorCheck, NoDuplicateDecorators};
//! use arkui_lint_ts::EtsParser;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./entry/src/main/ets")
//!     .parser(EtsParser::new())
//!     .rule(MonitorDecoratorCheck::new())
//!     .rule(NoDuplicateDecorators::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod decorators;
mod monitor_decorator_check;
mod no_duplicate_decorators;
mod presets;

pub use monitor_decorator_check::{is_index, MonitorDecoratorCheck, PathResolver, Verdict};
pub use no_duplicate_decorators::NoDuplicateDecorators;
pub use presets::{all_rules, minimal_rules, recommended_rules, strict_rules, Preset};

/// Re-export core types for convenience.
pub use arkui_lint_core::{Rule, Severity, Violation};
