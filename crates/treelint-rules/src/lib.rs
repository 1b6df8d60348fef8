//! # treelint-rules
//!
//! Built-in lint rules for treelint.
//!
//! Each rule is a thin pattern matcher over the dispatch API: it registers
//! per-kind listeners and reports structured diagnostics, optionally with
//! fixes or suggestions. The engine handles everything else.
//!
//! ## Available Rules
//!
//! | Code  | Name | Description | Fixable |
//! |-------|------|-------------|---------|
//! | TL001 | `prefer-const` | Requires `const` for never-reassigned bindings | yes |
//! | TL002 | `no-var` | Disallows `var` declarations | yes |
//! | TL003 | `eqeqeq` | Requires `===`/`!==` over `==`/`!=` | yes |
//! | TL004 | `no-unsafe-finally` | Disallows control flow in `finally` blocks | no |
//! | TL005 | `no-debugger` | Disallows `debugger` statements | yes |
//! | TL006 | `no-empty-block` | Disallows empty block statements | no |
//! | TL007 | `no-unused-vars` | Disallows never-read bindings | no |
//!
//! ## Usage
//!
//! ```ignore
//! use treelint_core::Analyzer;
//! use treelint_lang::ScriptLanguage;
//! use treelint_rules::recommended_rules;
//!
//! let mut builder = Analyzer::builder().root("./src").provider(ScriptLanguage);
//! for rule in recommended_rules() {
//!     builder = builder.rule_box(rule);
//! }
//! let analyzer = builder.build()?;
//! ```

pub mod eqeqeq;
pub mod no_debugger;
pub mod no_empty_block;
pub mod no_unsafe_finally;
pub mod no_unused_vars;
pub mod no_var;
pub mod prefer_const;
mod presets;
mod scope;

pub use eqeqeq::{Eqeqeq, NullHandling};
pub use no_debugger::NoDebugger;
pub use no_empty_block::NoEmptyBlock;
pub use no_unsafe_finally::NoUnsafeFinally;
pub use no_unused_vars::NoUnusedVars;
pub use no_var::NoVar;
pub use prefer_const::PreferConst;
pub use presets::{
    all_rules, configured_rules, recommended_rules, rule_by_name, rule_names, Preset,
};

/// Re-export core types for convenience.
pub use treelint_core::{Rule, RuleBox, Severity};
