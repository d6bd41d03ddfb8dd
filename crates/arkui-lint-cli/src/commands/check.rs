//! Check command implementation.

use anyhow::{bail, Context, Result};
use arkui_lint_core::{Analyzer, Config, RuleBox, Severity};
use arkui_lint_rules::{all_rules, Preset};
use arkui_lint_ts::EtsParser;
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the check command.
///
/// Returns `true` when a violation reaches `fail_on`, which defaults to
/// the configured threshold.
pub fn run(
    path: &Path,
    format: OutputFormat,
    rules_filter: Option<&str>,
    exclude: Vec<String>,
    fail_on: Option<Severity>,
    source: &ConfigSource,
) -> Result<bool> {
    let config = load_config(source)?;
    let known: Vec<&str> = all_rules().iter().map(|rule| rule.name()).collect();
    for name in config.unknown_rules(&known) {
        tracing::warn!("Config names unknown rule: {}", name);
    }
    let fail_on = fail_on.unwrap_or_else(|| config.fail_on_severity());

    let rules = select_rules(&config, rules_filter)?;

    let mut builder = Analyzer::builder()
        .root(path)
        .parser(EtsParser::new())
        .excludes(exclude)
        .config(config);
    for rule in rules {
        builder = builder.rule_box(rule);
    }
    let analyzer = builder.build().context("Failed to build analyzer")?;

    tracing::info!("Analyzing {:?} with {} rules", path, analyzer.rule_count());

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, format, analyzer.root())?;

    Ok(result.has_violations_at(fail_on))
}

fn load_config(source: &ConfigSource) -> Result<Config> {
    let Some(p) = source.path() else {
        return Ok(Config::default());
    };
    if source.is_global() {
        tracing::info!("Using global config: {}", p.display());
    }
    Config::from_file(p).with_context(|| format!("Failed to load config: {}", p.display()))
}

/// Picks the rule set: `--rules` wins, then the configured preset, then
/// the recommended preset.
fn select_rules(config: &Config, rules_filter: Option<&str>) -> Result<Vec<RuleBox>> {
    if let Some(filter) = rules_filter {
        let names: Vec<&str> = filter.split(',').map(str::trim).collect();
        return Ok(filter_rules(&names));
    }

    match config.preset.as_deref() {
        None => Ok(Preset::Recommended.rules()),
        Some(name) => match Preset::from_name(name) {
            Some(preset) => Ok(preset.rules()),
            None => bail!("Unknown preset '{name}' (expected recommended, strict or minimal)"),
        },
    }
}

fn filter_rules(names: &[&str]) -> Vec<RuleBox> {
    for name in names {
        let known = all_rules()
            .iter()
            .any(|rule| rule.name() == *name || rule.code() == *name);
        if !known {
            tracing::warn!("Unknown rule: {}", name);
        }
    }

    all_rules()
        .into_iter()
        .filter(|rule| names.contains(&rule.name()) || names.contains(&rule.code()))
        .collect()
}
