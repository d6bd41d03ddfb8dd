//! # arkui-lint-ts
//!
//! Tree-sitter based ArkTS frontend for arkui-lint.
//!
//! This crate teaches `arkui-lint-core` to read `.ets` files. It parses
//! with the Tree-sitter TypeScript grammar and lowers the concrete syntax
//! tree into the core [`Ast`](arkui_lint_core::Ast):
//!
//! - [`EtsParser`] implements [`SourceParser`](arkui_lint_core::SourceParser)
//! - [`rewrite_structs`] maps `struct` components onto `class` syntax

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod ets;
pub mod source;

pub use ets::EtsParser;
pub use source::{rewrite_structs, Rewritten};
