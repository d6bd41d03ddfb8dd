//! Frontend extension point.
//!
//! `SourceParser` lowers source text into the [`Ast`] the rule engine walks.
//! Implement it to teach the analyzer a new source dialect.

use crate::ast::Ast;

/// Error produced when a frontend cannot build a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    /// Human-readable reason.
    pub message: String,
}

impl ParseError {
    /// Creates a parse error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Trait for language frontends.
pub trait SourceParser: Send + Sync {
    /// Language identifier (e.g., `"arkts"`).
    fn language_id(&self) -> &'static str;

    /// File extensions this parser handles, with the dot (e.g., `&[".ets"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Parses `source` into a tree.
    ///
    /// # Errors
    ///
    /// Returns an error when no tree can be produced at all. Recoverable
    /// syntax errors should still yield a tree.
    fn parse(&self, source: &str) -> Result<Ast, ParseError>;
}
