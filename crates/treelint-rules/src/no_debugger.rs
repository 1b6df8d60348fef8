//! Rule to disallow `debugger` statements.
//!
//! Leftover `debugger` statements halt execution under a debugger and are
//! never wanted in committed code. The fix deletes the statement.

use treelint_core::{Fix, ListenerTable, Rule, RuleContext, RuleMeta, Severity};
use treelint_lang::kinds;

/// Rule code for no-debugger.
pub const CODE: &str = "TL005";

/// Rule name for no-debugger.
pub const NAME: &str = "no-debugger";

static META: RuleMeta = RuleMeta {
    name: NAME,
    code: CODE,
    description: "Disallows debugger statements",
    default_severity: Severity::Error,
    fixable: true,
    messages: &[("unexpectedDebugger", "Unexpected 'debugger' statement.")],
};

/// Disallows `debugger` statements.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDebugger;

impl NoDebugger {
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

impl Rule for NoDebugger {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn create(&self, ctx: &RuleContext) -> ListenerTable {
        let mut table = ListenerTable::new();
        let ctx = ctx.clone();
        table.on(kinds::DEBUGGER_STATEMENT, move |node| {
            ctx.report_with_fix(
                node.range(),
                "unexpectedDebugger",
                &[],
                vec![Fix::delete(node.range())],
            );
        });
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treelint_core::tester::{Expected, InvalidCase, RuleTester};
    use treelint_lang::ScriptLanguage;

    fn tester() -> RuleTester {
        RuleTester::new(ScriptLanguage, Box::new(NoDebugger::new()))
    }

    #[test]
    fn valid_snippets() {
        tester().valid(&["f();", "let debug = 1;"]);
    }

    #[test]
    fn removes_debugger_statements() {
        tester().invalid(&[
            InvalidCase {
                source: "debugger;",
                expected: vec![Expected {
                    message_id: "unexpectedDebugger",
                    line: 1,
                    column: 1,
                }],
                output: Some(""),
            },
            InvalidCase {
                source: "f();\ndebugger;\ng();",
                expected: vec![Expected {
                    message_id: "unexpectedDebugger",
                    line: 2,
                    column: 1,
                }],
                output: Some("f();\n\ng();"),
            },
        ]);
    }
}
