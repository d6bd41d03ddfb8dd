//! Comment-based allowance directives.
//!
//! Supports directives like:
//! ```text
//! // arkui-lint: allow(monitor-decorator-check) reason="path resolved at runtime"
//! ```
//!
//! A directive applies to the line it is on and to the line below it.

use std::collections::HashSet;

/// Result of checking for allow directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowCheck {
    /// Rule is not allowed.
    Denied,
    /// Rule is allowed with optional reason.
    Allowed {
        /// The reason provided (if any).
        reason: Option<String>,
    },
}

impl AllowCheck {
    /// Returns true if allowed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Returns the reason if allowed.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed { reason } => reason.as_deref(),
            Self::Denied => None,
        }
    }
}

/// Parsed allowance directive.
#[derive(Debug, Clone)]
pub struct AllowDirective {
    /// Rule names that are allowed.
    pub rules: HashSet<String>,
    /// Optional reason for the allowance.
    pub reason: Option<String>,
}

/// Checks source code for allowance comments with reason.
///
/// Looks for comments in the format:
/// ```text
/// // arkui-lint: allow(monitor-decorator-check, AK002) reason="explanation"
/// /* arkui-lint: allow(all) */
/// ```
///
/// `keys` are the identifiers a directive may name for the rule, usually
/// its name and its code. The pseudo rule `all` matches every rule.
#[must_use]
pub fn check_allow_with_reason(content: &str, line: usize, keys: &[&str]) -> AllowCheck {
    let lines: Vec<&str> = content.lines().collect();

    for check_line in [line.saturating_sub(1), line] {
        if check_line == 0 || check_line > lines.len() {
            continue;
        }

        let Some(directive) = parse_allow_directive(lines[check_line - 1]) else {
            continue;
        };
        let matches = directive.rules.contains("all")
            || keys.iter().any(|key| directive.rules.contains(*key));
        if matches {
            return AllowCheck::Allowed {
                reason: directive.reason,
            };
        }
    }

    AllowCheck::Denied
}

/// Parses an allowance directive from a line comment or block comment,
/// including one trailing code on the same line.
fn parse_allow_directive(line: &str) -> Option<AllowDirective> {
    const MARKER: &str = "arkui-lint:";

    let comment_start = line.find("//").into_iter().chain(line.find("/*")).min()?;
    let comment = &line[comment_start + 2..];
    let comment = comment.trim_start_matches('/').trim_start_matches('*');
    let comment = comment.split("*/").next().unwrap_or(comment).trim();

    let allow_content = comment.strip_prefix(MARKER)?.trim().strip_prefix("allow(")?;

    let paren_end = allow_content.find(')')?;
    let rules: HashSet<String> = allow_content[..paren_end]
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if rules.is_empty() {
        return None;
    }

    let reason = allow_content[paren_end + 1..]
        .trim()
        .strip_prefix("reason=")
        .and_then(|r| r.trim().strip_prefix('"'))
        .and_then(|r| r.find('"').map(|end| r[..end].to_string()));

    Some(AllowDirective { rules, reason })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_allow_directive() {
        let directive = parse_allow_directive("// arkui-lint: allow(monitor-decorator-check)");
        assert!(directive.is_some());
        let directive = directive.unwrap();
        assert!(directive.rules.contains("monitor-decorator-check"));
        assert!(directive.reason.is_none());
    }

    #[test]
    fn test_parse_allow_directive_with_reason() {
        let directive = parse_allow_directive(
            "  // arkui-lint: allow(no-duplicate-decorators) reason=\"generated code\"",
        );
        assert!(directive.is_some());
        let directive = directive.unwrap();
        assert!(directive.rules.contains("no-duplicate-decorators"));
        assert_eq!(directive.reason, Some("generated code".to_string()));
    }

    #[test]
    fn test_parse_multiple_rules() {
        let directive = parse_allow_directive("// arkui-lint: allow(rule1, rule2, rule3)");
        assert!(directive.is_some());
        let directive = directive.unwrap();
        assert!(directive.rules.contains("rule1"));
        assert!(directive.rules.contains("rule2"));
        assert!(directive.rules.contains("rule3"));
    }

    #[test]
    fn test_ignores_other_tools() {
        assert!(parse_allow_directive("// eslint-disable-next-line").is_none());
        assert!(parse_allow_directive("// arkui-lint: allow()").is_none());
        assert!(parse_allow_directive("@Monitor('a')").is_none());
    }

    #[test]
    fn test_check_allow_with_reason() {
        let content = r#"@ObservedV2
class Store {
  // arkui-lint: allow(monitor-decorator-check) reason="key added by a mixin"
  @Monitor('dynamicKey')
  onChange() {}
}"#;

        let result = check_allow_with_reason(content, 4, &["monitor-decorator-check", "AK001"]);
        assert!(result.is_allowed());
        assert_eq!(result.reason(), Some("key added by a mixin"));
        assert!(!check_allow_with_reason(content, 4, &["other-rule"]).is_allowed());
    }

    #[test]
    fn test_check_allow_all() {
        let content = "// arkui-lint: allow(all)\n@Monitor('x')\n";
        let result = check_allow_with_reason(content, 2, &["monitor-decorator-check"]);
        assert!(result.is_allowed());
        assert_eq!(result.reason(), None);
    }

    #[test]
    fn test_check_allow_denied() {
        let content = r#"class Store {
  @Monitor('x')
  onChange() {}
}"#;

        let result = check_allow_with_reason(content, 2, &["monitor-decorator-check"]);
        assert!(!result.is_allowed());
        assert_eq!(result.reason(), None);
    }

    #[test]
    fn test_block_and_trailing_comments() {
        let directive = parse_allow_directive("/* arkui-lint: allow(AK002) */").unwrap();
        assert!(directive.rules.contains("AK002"));

        let directive =
            parse_allow_directive("@Monitor('x') // arkui-lint: allow(all) reason=\"dynamic\"")
                .unwrap();
        assert!(directive.rules.contains("all"));
        assert_eq!(directive.reason.as_deref(), Some("dynamic"));
    }

    #[test]
    fn test_check_allow_by_code() {
        let content = "struct Page {\n  // arkui-lint: allow(AK001)\n  @Monitor('x')\n";
        assert!(check_allow_with_reason(content, 3, &["monitor-decorator-check", "AK001"]).is_allowed());
        assert!(!check_allow_with_reason(content, 3, &["no-duplicate-decorators", "AK002"]).is_allowed());
    }
}
