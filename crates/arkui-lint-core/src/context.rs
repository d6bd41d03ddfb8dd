//! Context types for rule execution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ast::Ast;
use crate::config::ConfigError;

/// Context describing the file being analyzed.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Absolute path to the file.
    pub path: &'a Path,
    /// File contents as a string.
    pub content: &'a str,
    /// Path relative to the project root.
    pub relative_path: PathBuf,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, root: &Path) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);

        Self {
            path,
            content,
            relative_path,
        }
    }

    /// Calculates byte offset for a given line and column.
    ///
    /// # Arguments
    ///
    /// * `line` - 1-indexed line number
    /// * `column` - 1-indexed column number
    ///
    /// # Returns
    ///
    /// Byte offset from the start of the file, or 0 if out of bounds.
    #[must_use]
    pub fn offset_for(&self, line: usize, column: usize) -> usize {
        if line == 0 {
            return 0;
        }

        let mut offset = 0;
        for (i, line_content) in self.content.split('\n').enumerate() {
            if i + 1 == line {
                return offset + column.saturating_sub(1);
            }
            offset += line_content.len() + 1; // +1 for newline
        }

        offset
    }

    /// Converts a byte offset to a 1-indexed `(line, column)` pair.
    ///
    /// Offsets past the end clamp to the end of the content.
    #[must_use]
    pub fn position_at(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.content.len());
        let before = &self.content.as_bytes()[..offset];
        let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
        let line_start = before
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1);
        (line, offset - line_start + 1)
    }
}

/// UI component metadata shared by every rule in a pass.
///
/// Loaded once per run from a JSON file with camelCase keys and
/// never modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComponentsInfo {
    /// Components that accept any number of children.
    pub container_components: Vec<String>,
    /// Components that accept no children.
    pub atomic_components: Vec<String>,
    /// Components that accept exactly one child.
    pub single_child_components: Vec<String>,
    /// Attribute methods available on every component.
    pub built_in_attributes: Vec<String>,
}

impl ComponentsInfo {
    /// Loads component metadata from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content).map_err(|e| ConfigError::Components {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Parses component metadata from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns the underlying JSON error.
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Returns true if `name` is any known built-in component.
    #[must_use]
    pub fn is_component(&self, name: &str) -> bool {
        [
            &self.container_components,
            &self.atomic_components,
            &self.single_child_components,
        ]
        .into_iter()
        .any(|list| list.iter().any(|c| c == name))
    }
}

/// Read-only state shared by all rule handlers during one pass.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// File being analyzed.
    pub file: &'a FileContext<'a>,
    /// Its syntax tree.
    pub ast: &'a Ast,
    /// Component metadata.
    pub components: &'a ComponentsInfo,
}

impl<'a> RuleContext<'a> {
    /// Bundles the per-file inputs of a pass.
    #[must_use]
    pub fn new(file: &'a FileContext<'a>, ast: &'a Ast, components: &'a ComponentsInfo) -> Self {
        Self {
            file,
            ast,
            components,
        }
    }
}
