//! # treelint-core
//!
//! Core engine for tree-based linting: rule dispatch, traversal, structured
//! diagnostics, and convergent autofix.
//!
//! The engine is grammar-agnostic. A [`TreeProvider`] parses source text into
//! a [`SourceTree`] whose nodes carry a kind, a byte range, a parent link and
//! ordered children. Rules register per-kind listeners through a
//! [`ListenerTable`]; all active rules are folded into one dispatch table and
//! run in a single pre-order walk per file. Diagnostics may carry fixes, which
//! the autofix engine applies as a maximal non-overlapping subset, re-running
//! the whole pipeline until a fixed point.
//!
//! ## Example
//!
//! ```ignore
//! use treelint_core::{Analyzer, CancelToken};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .provider(MyProvider::new())
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! result.print_report();
//! ```

mod analyzer;
mod cancel;
mod config;
mod context;
mod directives;
mod dispatch;
mod fixer;
mod rule;
mod traversal;
mod tree;
mod types;

/// Test harness for rule authors.
pub mod tester;

pub use analyzer::{
    ActivationError, Analyzer, AnalyzerBuilder, AnalyzerError, FileFailure, FileFailureKind,
    FileReport, LintResult, Linter,
};
pub use cancel::CancelToken;
pub use config::{AnalyzerConfig, Config, ConfigError, ConfigValue, RuleLevel};
pub use context::{FileState, RuleContext};
pub use directives::DisableDirectives;
pub use fixer::MAX_FIX_PASSES;
pub use rule::{ListenerTable, Rule, RuleBox, RuleMeta};
pub use traversal::walk_within;
pub use tree::{
    Node, NodeId, NodeKind, ParseError, ParseOutcome, SourceTree, SymbolInfo, TreeBuilder,
    TreeError, TreeProvider, TypeInfo, TypeQuery,
};
pub use types::{Diagnostic, Fix, LineIndex, RenderedDiagnostic, Severity, Suggestion, TextRange};
