//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# arkui-lint configuration

# Rule preset: "recommended" (default), "strict" or "minimal"
preset = "recommended"

# Lowest severity that makes `arkui-lint check` exit with status 1
fail_on = "error"

# Optional JSON file listing built-in UI components
# components = "components.json"

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./entry/src/main/ets"

# Glob patterns to exclude from analysis
exclude = [
    "**/node_modules/**",
    "**/oh_modules/**",
    "**/build/**",
]

# Respect .gitignore files
respect_gitignore = true

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.monitor-decorator-check]
enabled = true
# severity = "warning"  # Override default severity
# Resolve the state paths named in @Monitor arguments
check_paths = true

[rules.no-duplicate-decorators]
enabled = true
# Decorators that may repeat
ignore = ["Entry", "Preview"]
"#;

const CONFIG_NAME: &str = "arkui-lint.toml";

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new(CONFIG_NAME), force)?;

    println!("Created {CONFIG_NAME}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_NAME} to configure rules");
    println!("  2. Run: arkui-lint check");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;
    Ok(())
}
