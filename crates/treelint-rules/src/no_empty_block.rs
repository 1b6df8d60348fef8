//! Rule to disallow empty block statements.
//!
//! # Configuration
//!
//! - `allow-empty-catch`: permit `catch (e) { }` (default: false)
//!
//! Function bodies are always exempt: an empty function is a deliberate
//! no-op, not an oversight.

use treelint_core::{ConfigValue, ListenerTable, Rule, RuleContext, RuleMeta, Severity};
use treelint_lang::kinds;

/// Rule code for no-empty-block.
pub const CODE: &str = "TL006";

/// Rule name for no-empty-block.
pub const NAME: &str = "no-empty-block";

static META: RuleMeta = RuleMeta {
    name: NAME,
    code: CODE,
    description: "Disallows empty block statements",
    default_severity: Severity::Warning,
    fixable: false,
    messages: &[("emptyBlock", "Empty block statement.")],
};

/// Disallows empty block statements.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEmptyBlock {
    /// Permit empty catch blocks.
    pub allow_empty_catch: bool,
}

impl NoEmptyBlock {
    /// Creates the rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether empty catch blocks are permitted.
    #[must_use]
    pub fn allow_empty_catch(mut self, allow: bool) -> Self {
        self.allow_empty_catch = allow;
        self
    }

    /// Creates the rule from configuration.
    ///
    /// # Errors
    ///
    /// Never fails; unknown option values fall back to defaults.
    pub fn from_config(value: &ConfigValue) -> Result<Self, String> {
        Ok(Self {
            allow_empty_catch: value.get_bool("allow-empty-catch", false),
        })
    }
}

impl Rule for NoEmptyBlock {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn create(&self, ctx: &RuleContext) -> ListenerTable {
        let mut table = ListenerTable::new();
        let ctx = ctx.clone();
        let allow_empty_catch = self.allow_empty_catch;
        table.on(kinds::BLOCK_STATEMENT, move |node| {
            if node.child_count() > 0 {
                return;
            }
            if let Some(parent) = node.parent() {
                if parent.kind() == kinds::FUNCTION_DECLARATION {
                    return;
                }
                if allow_empty_catch && parent.kind() == kinds::CATCH_CLAUSE {
                    return;
                }
            }
            ctx.report(node.range(), "emptyBlock");
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
        RuleTester::new(ScriptLanguage, Box::new(NoEmptyBlock::new()))
    }

    #[test]
    fn valid_snippets() {
        tester().valid(&[
            "if (x) { f(); }",
            "function f() { }",
            "while (x) { g(); }",
        ]);
    }

    #[test]
    fn reports_empty_blocks() {
        tester().invalid(&[
            InvalidCase {
                source: "if (x) { }",
                expected: vec![Expected {
                    message_id: "emptyBlock",
                    line: 1,
                    column: 8,
                }],
                output: None,
            },
            InvalidCase {
                source: "try { f(); } catch (e) { }",
                expected: vec![Expected {
                    message_id: "emptyBlock",
                    line: 1,
                    column: 24,
                }],
                output: None,
            },
        ]);
    }

    #[test]
    fn empty_catch_can_be_allowed() {
        let tester = RuleTester::new(
            ScriptLanguage,
            Box::new(NoEmptyBlock::new().allow_empty_catch(true)),
        );
        tester.valid(&["try { f(); } catch (e) { }"]);
        tester.invalid(&[InvalidCase {
            source: "try { } catch (e) { }",
            expected: vec![Expected {
                message_id: "emptyBlock",
                line: 1,
                column: 5,
            }],
            output: None,
        }]);
    }
}
