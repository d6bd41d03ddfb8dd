//! Configuration types for arkui-lint.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Top-level configuration for arkui-lint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Preset to use (e.g., "recommended", "strict", "minimal").
    #[serde(default)]
    pub preset: Option<String>,

    /// Severity threshold for a failing exit status (default: "error").
    #[serde(default)]
    pub fail_on: Option<crate::Severity>,

    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// JSON file with UI component metadata, relative to the analysis root
    /// when not absolute.
    #[serde(default)]
    pub components: Option<PathBuf>,

    /// Per-rule configurations.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            origin: path.display().to_string(),
            source: e,
        })
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            origin: "<inline>".to_string(),
            source: e,
        })
    }

    /// Names of `[rules.<name>]` sections that match none of `known`,
    /// sorted.
    #[must_use]
    pub fn unknown_rules(&self, known: &[&str]) -> Vec<&str> {
        let mut unknown: Vec<&str> = self
            .rules
            .keys()
            .map(String::as_str)
            .filter(|name| !known.contains(name))
            .collect();
        unknown.sort_unstable();
        unknown
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        self.rules
            .get(rule_name)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule_name: &str) -> Option<crate::Severity> {
        self.rules.get(rule_name).and_then(|c| c.severity)
    }

    /// Gets the configuration block of a rule.
    #[must_use]
    pub fn rule_config(&self, rule_name: &str) -> Option<&RuleConfig> {
        self.rules.get(rule_name)
    }

    /// Lowest severity that fails a run, [`Severity::Error`](crate::Severity::Error)
    /// unless configured.
    #[must_use]
    pub fn fail_on_severity(&self) -> crate::Severity {
        self.fail_on.unwrap_or(crate::Severity::Error)
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Root directory to analyze (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns to exclude from analysis.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Glob patterns to include (if empty, all *.ets files).
    #[serde(default)]
    pub include: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: default_excludes(),
            include: Vec::new(),
            respect_gitignore: true,
        }
    }
}

/// Build output and dependency directories skipped unless overridden.
pub(crate) fn default_excludes() -> Vec<String> {
    ["**/build/**", "**/oh_modules/**", "**/node_modules/**"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default)]
    pub severity: Option<crate::Severity>,

    /// Rule-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

impl RuleConfig {
    /// Gets a boolean option with a default value.
    #[must_use]
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.options
            .get(key)
            .and_then(toml::Value::as_bool)
            .unwrap_or(default)
    }

    /// Gets a string option with a default value.
    #[must_use]
    pub fn get_str<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.options
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or(default)
    }

    /// Gets a string array option.
    #[must_use]
    pub fn get_str_array(&self, key: &str) -> Vec<String> {
        self.options
            .get(key)
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Config file is not valid TOML or does not match the schema.
    #[error("Failed to parse config {origin}: {source}")]
    Parse {
        /// File the text came from, or `<inline>`.
        origin: String,
        /// Underlying TOML error.
        source: toml::de::Error,
    },

    /// Component metadata file is not valid JSON.
    #[error("Failed to parse component metadata {path}: {message}")]
    Components {
        /// Path of the metadata file.
        path: PathBuf,
        /// JSON error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Severity;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.analyzer.respect_gitignore);
        assert!(config.rules.is_empty());
        assert!(config.components.is_none());
        assert_eq!(config.fail_on_severity(), Severity::Error);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
preset = "strict"
fail_on = "warning"
components = "components.json"

[analyzer]
root = "./entry/src/main/ets"
exclude = ["**/generated/**"]

[rules.monitor-decorator-check]
enabled = true
severity = "warning"
check_paths = false

[rules.no-duplicate-decorators]
ignore = ["Entry", "Preview", "Reusable"]
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.analyzer.root, PathBuf::from("./entry/src/main/ets"));
        assert_eq!(config.components, Some(PathBuf::from("components.json")));
        assert_eq!(config.fail_on_severity(), Severity::Warning);
        assert!(config.is_rule_enabled("monitor-decorator-check"));
        assert_eq!(
            config.rule_severity("monitor-decorator-check"),
            Some(Severity::Warning)
        );

        let rule_config = config.rule_config("monitor-decorator-check").unwrap();
        assert!(!rule_config.get_bool("check_paths", true));

        let dup = config.rule_config("no-duplicate-decorators").unwrap();
        assert_eq!(dup.get_str_array("ignore").len(), 3);
    }

    #[test]
    fn test_disabled_rule() {
        let config = Config::parse("[rules.no-duplicate-decorators]\nenabled = false\n")
            .expect("Failed to parse");
        assert!(!config.is_rule_enabled("no-duplicate-decorators"));
        assert!(config.is_rule_enabled("monitor-decorator-check"));
    }

    #[test]
    fn test_unknown_rule_sections() {
        let config = Config::parse(
            "[rules.monitor-decorator-check]\n[rules.no-duplicate-decorator]\n[rules.zzz]\n",
        )
        .expect("Failed to parse");
        assert_eq!(
            config.unknown_rules(&["monitor-decorator-check", "no-duplicate-decorators"]),
            vec!["no-duplicate-decorator", "zzz"]
        );
    }

    #[test]
    fn test_unknown_fail_on() {
        assert!(Config::parse("fail_on = \"fatal\"\n").is_err());
        let config = Config::parse("fail_on = \"warn\"\n").expect("Failed to parse");
        assert_eq!(config.fail_on_severity(), Severity::Warning);
    }
}
