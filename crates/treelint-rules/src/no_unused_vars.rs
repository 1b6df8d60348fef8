//! Rule to disallow bindings that are never read.
//!
//! # Configuration
//!
//! - `ignore-pattern`: regex of binding names to skip (e.g. `"^_"`)
//!
//! A reference only counts as a use when it can read the value: plain
//! assignment targets and update expressions do not resurrect a binding.
//! Scope resolution walks the subtree of the enclosing function body (or the
//! whole program), so reads inside closures count.

use crate::scope::enclosing_scope;
use regex::Regex;
use treelint_core::{walk_within, ConfigValue, ListenerTable, Node, Rule, RuleContext, RuleMeta, Severity};
use treelint_lang::kinds;

/// Rule code for no-unused-vars.
pub const CODE: &str = "TL007";

/// Rule name for no-unused-vars.
pub const NAME: &str = "no-unused-vars";

static META: RuleMeta = RuleMeta {
    name: NAME,
    code: CODE,
    description: "Disallows variables that are declared but never read",
    default_severity: Severity::Warning,
    fixable: false,
    messages: &[("unusedVar", "'{name}' is declared but never used.")],
};

/// Disallows bindings that are never read.
#[derive(Debug, Clone, Default)]
pub struct NoUnusedVars {
    /// Binding names matching this pattern are skipped.
    pub ignore_pattern: Option<Regex>,
}

impl NoUnusedVars {
    /// Creates the rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the ignore pattern.
    #[must_use]
    pub fn ignore_pattern(mut self, pattern: Regex) -> Self {
        self.ignore_pattern = Some(pattern);
        self
    }

    /// Creates the rule from configuration.
    ///
    /// # Errors
    ///
    /// Returns a message when `ignore-pattern` is not a valid regex.
    pub fn from_config(value: &ConfigValue) -> Result<Self, String> {
        let ignore_pattern = match value.get_str("ignore-pattern") {
            Some(pattern) => Some(
                Regex::new(pattern)
                    .map_err(|e| format!("option 'ignore-pattern' is not a valid regex: {e}"))?,
            ),
            None => None,
        };
        Ok(Self { ignore_pattern })
    }
}

impl Rule for NoUnusedVars {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn create(&self, ctx: &RuleContext) -> ListenerTable {
        let mut table = ListenerTable::new();
        let ctx = ctx.clone();
        let ignore = self.ignore_pattern.clone();
        table.on(kinds::VARIABLE_DECLARATOR, move |node| {
            let Some(name_node) = node.child(0) else {
                return;
            };
            let name = ctx.node_text(name_node);
            if ignore.as_ref().is_some_and(|re| re.is_match(name)) {
                return;
            }

            let scope = enclosing_scope(node);
            let mut used = false;
            walk_within(scope, |candidate| {
                if used {
                    return false;
                }
                if candidate.kind() == kinds::IDENTIFIER
                    && candidate.id() != name_node.id()
                    && ctx.node_text(candidate) == name
                    && is_read_position(candidate)
                {
                    used = true;
                }
                true
            });

            if !used {
                ctx.report_with_data(name_node.range(), "unusedVar", &[("name", name)]);
            }
        });
        table
    }
}

/// Whether an identifier occurrence can read the binding's value.
fn is_read_position(node: Node<'_>) -> bool {
    let Some(parent) = node.parent() else {
        return true;
    };
    let is_first_child = parent.child(0).map(|c| c.id()) == Some(node.id());

    if parent.kind() == kinds::VARIABLE_DECLARATOR && is_first_child {
        return false; // a (re)declaration, not a use
    }
    if parent.kind() == kinds::FUNCTION_DECLARATION {
        return false; // function name or parameter binding
    }
    if parent.kind() == kinds::CATCH_CLAUSE && is_first_child {
        return false; // catch parameter binding
    }
    if parent.kind() == kinds::ASSIGNMENT_EXPRESSION
        && is_first_child
        && parent.attr() == Some("=")
    {
        return false; // plain overwrite; `+=`/`-=` read the old value
    }
    if parent.kind() == kinds::UPDATE_EXPRESSION {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use treelint_core::tester::{Expected, InvalidCase, RuleTester};
    use treelint_lang::ScriptLanguage;

    fn tester() -> RuleTester {
        RuleTester::new(ScriptLanguage, Box::new(NoUnusedVars::new()))
    }

    #[test]
    fn valid_snippets() {
        tester().valid(&[
            "let x = 1; f(x);",
            "let x = 1; let y = x + 1; f(y);",
            "const x = 1; if (x > 0) { g(); }",
            // A read inside a closure counts.
            "let x = 1; function f() { return x; }",
            // A compound assignment reads the old value.
            "let x = 1; x += 2;",
        ]);
    }

    #[test]
    fn reports_never_read_bindings() {
        tester().invalid(&[
            InvalidCase {
                source: "let x = 1;",
                expected: vec![Expected {
                    message_id: "unusedVar",
                    line: 1,
                    column: 5,
                }],
                output: None,
            },
            // A write-only binding is still unused.
            InvalidCase {
                source: "let x = 1; x = 2;",
                expected: vec![Expected {
                    message_id: "unusedVar",
                    line: 1,
                    column: 5,
                }],
                output: None,
            },
            InvalidCase {
                source: "let n = 0; n++;",
                expected: vec![Expected {
                    message_id: "unusedVar",
                    line: 1,
                    column: 5,
                }],
                output: None,
            },
        ]);
    }

    #[test]
    fn ignore_pattern_skips_matching_names() {
        let config =
            treelint_core::Config::parse("[rules]\nno-unused-vars = { ignore-pattern = \"^_\" }\n")
                .unwrap();
        let rule = NoUnusedVars::from_config(&config.rule_value(NAME).unwrap()).unwrap();
        let tester = RuleTester::new(ScriptLanguage, Box::new(rule));
        tester.valid(&["let _ignored = 1;"]);
        tester.invalid(&[InvalidCase {
            source: "let kept = 1;",
            expected: vec![Expected {
                message_id: "unusedVar",
                line: 1,
                column: 5,
            }],
            output: None,
        }]);
    }

    #[test]
    fn bad_ignore_pattern_is_an_activation_error() {
        let config =
            treelint_core::Config::parse("[rules]\nno-unused-vars = { ignore-pattern = \"(\" }\n")
                .unwrap();
        let result = NoUnusedVars::from_config(&config.rule_value(NAME).unwrap());
        assert!(result.is_err());
    }
}
