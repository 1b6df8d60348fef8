//! Rule to disallow `var` declarations.
//!
//! `var` bindings are function-scoped and hoisted; `let`/`const` bindings are
//! block-scoped and catch use-before-declaration mistakes. The fix rewrites
//! the keyword to `let`; a later pass of `prefer-const` may then tighten it
//! further.

use treelint_core::{Fix, ListenerTable, Rule, RuleContext, RuleMeta, Severity, TextRange};
use treelint_lang::kinds;

/// Rule code for no-var.
pub const CODE: &str = "TL002";

/// Rule name for no-var.
pub const NAME: &str = "no-var";

static META: RuleMeta = RuleMeta {
    name: NAME,
    code: CODE,
    description: "Disallows var declarations in favor of let and const",
    default_severity: Severity::Warning,
    fixable: true,
    messages: &[("unexpectedVar", "Unexpected 'var', use 'let' or 'const' instead.")],
};

/// Disallows `var` declarations.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVar;

impl NoVar {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Creates the rule from configuration (the rule has no options).
    ///
    /// # Errors
    ///
    /// Never fails; present for registry uniformity.
    pub fn from_config(_value: &treelint_core::ConfigValue) -> Result<Self, String> {
        Ok(Self)
    }
}

impl Rule for NoVar {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn create(&self, ctx: &RuleContext) -> ListenerTable {
        let mut table = ListenerTable::new();
        let ctx = ctx.clone();
        table.on(kinds::VARIABLE_DECLARATION, move |node| {
            if node.attr() != Some("var") {
                return;
            }
            let start = node.range().start();
            let keyword = TextRange::new(start, start + "var".len());
            ctx.report_with_fix(
                keyword,
                "unexpectedVar",
                &[],
                vec![Fix::replace(keyword, "let")],
            );
        });
        table
    }
}
