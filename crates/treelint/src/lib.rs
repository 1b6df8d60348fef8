//! # treelint
//!
//! A language-agnostic lint engine with convergent autofix.
//!
//! Dozens of independent rules run in a single traversal per file; their
//! diagnostics carry optional fixes, which the engine applies as a maximal
//! non-overlapping subset and re-runs until a fixed point. This facade crate
//! bundles the engine ([`treelint_core`]), the bundled script-language
//! provider ([`treelint_lang`]) and the built-in rules ([`treelint_rules`])
//! behind one entry point.
//!
//! ## Quick start
//!
//! ```ignore
//! let result = treelint::run(Path::new("."), &treelint::RunOptions::default())?;
//! for (file, diagnostic) in result.diagnostics() {
//!     println!("{}: {}", file.display(), diagnostic.message);
//! }
//! ```

mod runner;

pub use runner::{find_config, run, RunOptions};

pub use treelint_core::{
    tester, ActivationError, Analyzer, AnalyzerBuilder, AnalyzerError, CancelToken, Config,
    ConfigError, ConfigValue, Diagnostic, FileFailure, FileFailureKind, FileReport, Fix,
    LintResult, Linter, ListenerTable, Node, NodeKind, Rule, RuleBox, RuleContext, RuleMeta,
    RuleLevel, Severity, SourceTree, Suggestion, TextRange, TreeProvider,
};
pub use treelint_lang::{kinds, ScriptLanguage};
pub use treelint_rules::{
    all_rules, configured_rules, recommended_rules, rule_by_name, rule_names, Eqeqeq,
    NoDebugger, NoEmptyBlock, NoUnsafeFinally, NoUnusedVars, NoVar, NullHandling, PreferConst,
    Preset,
};
