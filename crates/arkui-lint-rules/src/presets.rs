//! Rule presets for common configurations.

use crate::{MonitorDecoratorCheck, NoDuplicateDecorators};
use arkui_lint_core::{RuleBox, Severity};

/// Preset configurations for arkui-lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Recommended rules with sensible defaults.
    Recommended,
    /// Strict rules for maximum safety.
    Strict,
    /// Minimal rules for gradual adoption.
    Minimal,
}

impl Preset {
    /// Parses a preset name as written in configuration.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "recommended" => Some(Self::Recommended),
            "strict" => Some(Self::Strict),
            "minimal" => Some(Self::Minimal),
            _ => None,
        }
    }

    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        match self {
            Self::Recommended => recommended_rules(),
            Self::Strict => strict_rules(),
            Self::Minimal => minimal_rules(),
        }
    }
}

/// Returns the recommended set of rules.
///
/// Includes:
/// - `monitor-decorator-check` (AK001) - Validates `@Monitor` usage and paths
/// - `no-duplicate-decorators` (AK002) - Forbids repeated decorators
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    vec![
        Box::new(MonitorDecoratorCheck::new()),
        Box::new(NoDuplicateDecorators::new()),
    ]
}

/// Returns the strict set of rules.
///
/// Same rules as recommended, but `Entry` and `Preview` may not repeat
/// either.
#[must_use]
pub fn strict_rules() -> Vec<RuleBox> {
    let mut duplicates = NoDuplicateDecorators::new();
    duplicates.ignore.clear();
    vec![Box::new(MonitorDecoratorCheck::new()), Box::new(duplicates)]
}

/// Returns the minimal set of rules.
///
/// For gradual adoption, only includes:
/// - `monitor-decorator-check` with path resolution reduced to warnings
#[must_use]
pub fn minimal_rules() -> Vec<RuleBox> {
    vec![Box::new(
        MonitorDecoratorCheck::new().severity(Severity::Warning),
    )]
}

/// Returns all available rules.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![
        Box::new(MonitorDecoratorCheck::new()),
        Box::new(NoDuplicateDecorators::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_rules() {
        assert!(!Preset::Recommended.rules().is_empty());
        assert!(!Preset::Strict.rules().is_empty());
        assert!(!Preset::Minimal.rules().is_empty());
    }

    #[test]
    fn test_preset_names() {
        assert_eq!(Preset::from_name("strict"), Some(Preset::Strict));
        assert_eq!(Preset::from_name("unknown"), None);
    }

    #[test]
    fn test_all_rules_have_unique_codes() {
        let rules = all_rules();
        let mut codes: Vec<_> = rules.iter().map(|r| r.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), rules.len());
    }
}
