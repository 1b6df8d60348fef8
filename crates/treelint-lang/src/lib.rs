//! # treelint-lang
//!
//! The bundled [`TreeProvider`] for treelint: a lexer and recursive-descent
//! parser for a small script language, producing the engine's generic
//! [`SourceTree`](treelint_core::SourceTree).
//!
//! The grammar covers what the built-in rules need: `let`/`const`/`var`
//! declarations, functions, control flow (`if`, `while`, `return`, `break`,
//! `continue`, `throw`, `try`/`catch`/`finally`), blocks, `debugger`,
//! assignment/update/binary/unary/call expressions, and literals. Line
//! comments (`//`) are skipped by the lexer, which also makes the engine's
//! disable directives available.
//!
//! ## Example
//!
//! ```ignore
//! use treelint_core::TreeProvider;
//! use treelint_lang::ScriptLanguage;
//!
//! let outcome = ScriptLanguage.parse("let x = 1;")?;
//! assert_eq!(outcome.tree.root().kind(), treelint_lang::kinds::PROGRAM);
//! ```

pub mod kinds;
mod lexer;
mod parser;

use treelint_core::{ParseError, ParseOutcome, TreeProvider};

/// Tree provider for the bundled script language.
///
/// Stateless; one instance can serve any number of parallel workers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptLanguage;

impl ScriptLanguage {
    /// Creates the provider.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TreeProvider for ScriptLanguage {
    fn extensions(&self) -> &'static [&'static str] {
        &["tl"]
    }

    fn parse(&self, text: &str) -> Result<ParseOutcome, ParseError> {
        let tokens = lexer::tokenize(text)?;
        let tree = parser::parse(text, &tokens)?;
        Ok(ParseOutcome::new(tree))
    }
}
