//! High-level run entry: config discovery, rule activation, analysis.

use std::path::{Path, PathBuf};
use treelint_core::{Analyzer, AnalyzerError, CancelToken, Config, LintResult};
use treelint_lang::ScriptLanguage;
use treelint_rules::configured_rules;

/// Config file names to search for, in priority order.
const CONFIG_CANDIDATES: &[&str] = &["treelint.toml", ".treelint.toml"];

/// Options for [`run`].
#[derive(Debug, Default)]
pub struct RunOptions {
    /// Apply fixes and write rewritten files back to disk.
    pub fix: bool,
    /// Explicit config file path; when unset, candidates in the root are
    /// tried and defaults are used otherwise.
    pub config_path: Option<PathBuf>,
    /// Extra exclude glob patterns.
    pub exclude: Vec<String>,
    /// Cancellation token shared by all workers.
    pub cancel: CancelToken,
}

/// Finds the effective config file for a project root, if any.
#[must_use]
pub fn find_config(root: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|name| root.join(name))
        .find(|candidate| candidate.exists())
}

/// Runs the full pipeline over a project root with the bundled language and
/// the configured rule set.
///
/// # Errors
///
/// Returns an error for setup problems (unreadable config, bad root);
/// per-file failures are recorded in the result instead.
pub fn run(root: &Path, options: &RunOptions) -> Result<LintResult, AnalyzerError> {
    let config = match options
        .config_path
        .clone()
        .or_else(|| find_config(root))
    {
        Some(path) => {
            tracing::debug!("Using config: {}", path.display());
            Config::from_file(&path)?
        }
        None => Config::default(),
    };

    let (rules, activation_errors) = configured_rules(&config);

    let mut builder = Analyzer::builder()
        .root(root)
        .provider(ScriptLanguage)
        .config(config)
        .fix(options.fix)
        .cancel_token(options.cancel.clone());
    for rule in rules {
        builder = builder.rule_box(rule);
    }
    for pattern in &options.exclude {
        builder = builder.exclude(pattern.clone());
    }

    let analyzer = builder.build()?;
    tracing::info!(
        "Linting {} with {} rules",
        analyzer.root().display(),
        analyzer.rule_count()
    );

    let mut result = analyzer.analyze()?;
    result.activation_errors.extend(activation_errors);
    Ok(result)
}
