//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# treelint configuration

# Preset to start from: "recommended", "strict" or "minimal"
preset = "recommended"

[analyzer]
# Glob patterns to exclude from analysis
exclude = [
    "**/target/**",
    "**/node_modules/**",
]

# Maximum number of parallel file workers (default: CPU count)
# parallelism = 4

# Rule configurations. Each entry is a level scalar, a [level, { options }]
# list, or an options table.

[rules]
# no-debugger = "error"
# eqeqeq = ["warn", { null = "ignore" }]
# no-unused-vars = { level = "warn", ignore-pattern = "^_" }
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("treelint.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created treelint.toml");
    println!("\nNext steps:");
    println!("  1. Edit treelint.toml to configure rules");
    println!("  2. Run: treelint check");

    Ok(())
}
