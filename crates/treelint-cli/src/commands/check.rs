//! Check command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;
use treelint_core::{Analyzer, CancelToken, Config, RuleBox};
use treelint_lang::ScriptLanguage;
use treelint_rules::{configured_rules, rule_by_name};

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the check command.
#[allow(clippy::too_many_arguments)]
pub fn run(
    path: &Path,
    fix: bool,
    format: OutputFormat,
    rules_filter: Option<String>,
    exclude: Vec<String>,
    timeout: Option<u64>,
    source: &ConfigSource,
) -> Result<()> {
    let config = match source {
        ConfigSource::Default => Config::default(),
        other => {
            // Invariant: non-Default variants always have a path
            let p = other.path().context("resolved config has no path")?;
            if source.is_global() {
                tracing::info!("Using global config: {}", p.display());
            }
            Config::from_file(p)
                .with_context(|| format!("Failed to load config: {}", p.display()))?
        }
    };

    let (rules, activation_errors) = match rules_filter {
        Some(filter) => (filter_rules(&filter), Vec::new()),
        None => configured_rules(&config),
    };

    let cancel = match timeout {
        Some(secs) => CancelToken::with_deadline(Duration::from_secs(secs)),
        None => CancelToken::new(),
    };

    let mut builder = Analyzer::builder()
        .root(path)
        .provider(ScriptLanguage)
        .config(config)
        .fix(fix)
        .cancel_token(cancel);

    for pattern in exclude {
        builder = builder.exclude(pattern);
    }
    for rule in rules {
        builder = builder.rule_box(rule);
    }

    let analyzer = builder.build().context("Failed to build analyzer")?;

    tracing::info!("Analyzing {:?} with {} rules", path, analyzer.rule_count());

    let mut result = analyzer.analyze().context("Analysis failed")?;
    result.activation_errors.extend(activation_errors);

    super::output::print(&result, format)?;

    // Exit with error code if there are errors
    if result.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

fn filter_rules(filter: &str) -> Vec<RuleBox> {
    let mut rules = Vec::new();
    for name in filter.split(',').map(str::trim) {
        match rule_by_name(name) {
            Some(rule) => rules.push(rule),
            None => tracing::warn!("Unknown rule: {}", name),
        }
    }
    rules
}
