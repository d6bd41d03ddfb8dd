//! List rules command implementation.

use arkui_lint_rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<10} {:<25} Description", "Code", "Name");
    println!("{}", "-".repeat(80));

    for rule in all_rules() {
        println!(
            "{:<10} {:<25} {}",
            rule.code(),
            rule.name(),
            rule.description()
        );
    }

    println!("\nPresets:");
    println!("  recommended  - AK001, AK002 (default)");
    println!("  strict       - AK001, AK002 without exempt decorators");
    println!("  minimal      - AK001 at warning level (for gradual adoption)");

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  arkui-lint check --rules monitor-decorator-check");
    println!("  arkui-lint check --rules AK002");
}
