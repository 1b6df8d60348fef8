//! List-rules command implementation.

use treelint_rules::{rule_by_name, rule_names};

/// Prints all available rules.
pub fn run() {
    println!("Available rules:\n");
    for name in rule_names() {
        let Some(rule) = rule_by_name(name) else {
            continue;
        };
        let meta = rule.meta();
        let fixable = if meta.fixable { "fixable" } else { "       " };
        println!(
            "  {}  {:<20} {}  {}",
            meta.code, meta.name, fixable, meta.description
        );
    }
    println!("\nEnable rules in treelint.toml under [rules].");
}
