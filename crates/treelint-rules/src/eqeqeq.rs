//! Rule to require strict equality operators.
//!
//! # Configuration
//!
//! - `null`: `"always"` (default) reports comparisons against `null` but
//!   offers only a suggestion, since `== null` is a common intentional
//!   nullish check; `"ignore"` skips them entirely.
//!
//! Non-null comparisons are auto-fixed to the strict operator.

use treelint_core::{ConfigValue, Fix, ListenerTable, Rule, RuleContext, RuleMeta, Severity, TextRange};
use treelint_lang::kinds;

/// Rule code for eqeqeq.
pub const CODE: &str = "TL003";

/// Rule name for eqeqeq.
pub const NAME: &str = "eqeqeq";

static META: RuleMeta = RuleMeta {
    name: NAME,
    code: CODE,
    description: "Requires === and !== over == and !=",
    default_severity: Severity::Warning,
    fixable: true,
    messages: &[
        ("expectedStrict", "Expected '{expected}' and instead saw '{actual}'."),
        ("useStrict", "Use '{expected}' instead."),
    ],
};

/// How comparisons against `null` are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullHandling {
    /// Report, but only suggest the strict operator.
    #[default]
    Always,
    /// Skip comparisons against `null`.
    Ignore,
}

/// Requires strict equality operators.
#[derive(Debug, Clone, Copy, Default)]
pub struct Eqeqeq {
    /// Treatment of comparisons against `null`.
    pub null: NullHandling,
}

impl Eqeqeq {
    /// Creates the rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the `null` handling.
    #[must_use]
    pub fn null(mut self, null: NullHandling) -> Self {
        self.null = null;
        self
    }

    /// Creates the rule from configuration.
    ///
    /// # Errors
    ///
    /// Returns a message for an unrecognized `null` option value.
    pub fn from_config(value: &ConfigValue) -> Result<Self, String> {
        let null = match value.get_str("null") {
            None | Some("always") => NullHandling::Always,
            Some("ignore") => NullHandling::Ignore,
            Some(other) => return Err(format!("option 'null' must be \"always\" or \"ignore\", got \"{other}\"")),
        };
        Ok(Self { null })
    }
}

impl Rule for Eqeqeq {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn create(&self, ctx: &RuleContext) -> ListenerTable {
        let mut table = ListenerTable::new();
        let ctx = ctx.clone();
        let null = self.null;
        table.on(kinds::BINARY_EXPRESSION, move |node| {
            let (actual, expected) = match node.attr() {
                Some("==") => ("==", "==="),
                Some("!=") => ("!=", "!=="),
                _ => return,
            };
            let (Some(left), Some(right)) = (node.child(0), node.child(1)) else {
                return;
            };
            let against_null =
                left.kind() == kinds::NULL_LITERAL || right.kind() == kinds::NULL_LITERAL;
            if against_null && null == NullHandling::Ignore {
                return;
            }

            // Locate the operator between the operands.
            let between = TextRange::new(left.range().end(), right.range().start());
            let slice = &ctx.text()[between.start()..between.end()];
            let Some(idx) = slice.find(actual) else {
                return;
            };
            let op_start = between.start() + idx;
            let op_range = TextRange::new(op_start, op_start + actual.len());

            let data = [("expected", expected), ("actual", actual)];
            let edit = Fix::replace(op_range, expected);
            if against_null {
                let suggestion = ctx.suggestion("useStrict", &data, vec![edit]);
                ctx.report_with_suggestions(op_range, "expectedStrict", &data, vec![suggestion]);
            } else {
                ctx.report_with_fix(op_range, "expectedStrict", &data, vec![edit]);
            }
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
        RuleTester::new(ScriptLanguage, Box::new(Eqeqeq::new()))
    }

    #[test]
    fn valid_snippets() {
        tester().valid(&["a === b;", "a !== b;", "a < b;", "a = b;"]);
    }

    #[test]
    fn loose_operators_are_fixed() {
        tester().invalid(&[
            InvalidCase {
                source: "a == b;",
                expected: vec![Expected {
                    message_id: "expectedStrict",
                    line: 1,
                    column: 3,
                }],
                output: Some("a === b;"),
            },
            InvalidCase {
                source: "if (a != b) { f(); }",
                expected: vec![Expected {
                    message_id: "expectedStrict",
                    line: 1,
                    column: 7,
                }],
                output: Some("if (a !== b) { f(); }"),
            },
        ]);
    }

    #[test]
    fn null_comparison_gets_a_suggestion_not_a_fix() {
        tester().invalid(&[InvalidCase {
            source: "a == null;",
            expected: vec![Expected {
                message_id: "expectedStrict",
                line: 1,
                column: 3,
            }],
            output: None,
        }]);
    }

    #[test]
    fn null_option_ignore_skips_null_comparisons() {
        let tester = RuleTester::new(
            ScriptLanguage,
            Box::new(Eqeqeq::new().null(NullHandling::Ignore)),
        );
        tester.valid(&["a == null;", "null != a;"]);
        tester.invalid(&[InvalidCase {
            source: "a == b;",
            expected: vec![Expected {
                message_id: "expectedStrict",
                line: 1,
                column: 3,
            }],
            output: Some("a === b;"),
        }]);
    }

    #[test]
    fn from_config_rejects_unknown_null_value() {
        let config = treelint_core::Config::parse("[rules]\neqeqeq = [\"warn\", { null = \"sometimes\" }]\n")
            .unwrap();
        let value = config.rule_value(NAME).unwrap();
        assert!(Eqeqeq::from_config(&value).is_err());
    }
}
