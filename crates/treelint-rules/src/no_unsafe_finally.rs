//! Rule to disallow control-flow statements in `finally` blocks.
//!
//! A `return`, `break`, `continue` or `throw` inside a finalizer overrides
//! whatever the `try` and `catch` blocks decided, silently swallowing
//! returns and exceptions. No fix is offered: rewriting control flow is not
//! mechanical.

use treelint_core::{walk_within, ListenerTable, Rule, RuleContext, RuleMeta, Severity};
use treelint_lang::kinds;

/// Rule code for no-unsafe-finally.
pub const CODE: &str = "TL004";

/// Rule name for no-unsafe-finally.
pub const NAME: &str = "no-unsafe-finally";

static META: RuleMeta = RuleMeta {
    name: NAME,
    code: CODE,
    description: "Disallows control flow statements in finally blocks",
    default_severity: Severity::Error,
    fixable: false,
    messages: &[(
        "unsafeUsage",
        "Unsafe usage of '{kind}' statement in a finally block.",
    )],
};

/// Disallows control-flow statements in `finally` blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoUnsafeFinally;

impl NoUnsafeFinally {
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

impl Rule for NoUnsafeFinally {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn create(&self, ctx: &RuleContext) -> ListenerTable {
        let mut table = ListenerTable::new();
        let ctx = ctx.clone();
        table.on(kinds::FINALLY_CLAUSE, move |clause| {
            // Bounded walk: control flow inside a nested function is
            // sanctioned, and a nested finally clause is handled by its own
            // listener invocation.
            walk_within(clause, |node| {
                if node.kind() == kinds::FUNCTION_DECLARATION {
                    return false;
                }
                if node.kind() == kinds::FINALLY_CLAUSE && node.id() != clause.id() {
                    return false;
                }
                let label = match node.kind() {
                    k if k == kinds::RETURN_STATEMENT => "return",
                    k if k == kinds::BREAK_STATEMENT => "break",
                    k if k == kinds::CONTINUE_STATEMENT => "continue",
                    k if k == kinds::THROW_STATEMENT => "throw",
                    _ => return true,
                };
                ctx.report_with_data(node.range(), "unsafeUsage", &[("kind", label)]);
                true
            });
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
        RuleTester::new(ScriptLanguage, Box::new(NoUnsafeFinally::new()))
    }

    #[test]
    fn valid_snippets() {
        tester().valid(&[
            "try { return 1; } finally { f(); }",
            "try { f(); } catch (e) { throw e; } finally { g(); }",
            // Control flow inside a nested function is sanctioned.
            "try { f(); } finally { function g() { return 1; } }",
            "while (x) { break; }",
        ]);
    }

    #[test]
    fn reports_return_in_finally_without_fix() {
        tester().invalid(&[InvalidCase {
            source: "try { foo(); } finally { return 1; }",
            expected: vec![Expected {
                message_id: "unsafeUsage",
                line: 1,
                column: 26,
            }],
            output: None,
        }]);
    }

    #[test]
    fn nested_finally_is_reported_exactly_once() {
        tester().invalid(&[InvalidCase {
            source: "try { f(); } finally { try { g(); } finally { return 1; } }",
            expected: vec![Expected {
                message_id: "unsafeUsage",
                line: 1,
                column: 47,
            }],
            output: None,
        }]);
    }

    #[test]
    fn reports_every_unsafe_statement_kind() {
        tester().invalid(&[InvalidCase {
            source: "while (x) { try { f(); } finally { break; throw e; } }",
            expected: vec![
                Expected {
                    message_id: "unsafeUsage",
                    line: 1,
                    column: 36,
                },
                Expected {
                    message_id: "unsafeUsage",
                    line: 1,
                    column: 43,
                },
            ],
            output: None,
        }]);
    }
}
