//! Rule to prefer `const` for bindings that are never reassigned.
//!
//! # Rationale
//!
//! A `let` binding with an initializer that is never written again reads
//! clearer as `const`: the reader gets a guarantee the binding is stable.
//!
//! # Fix
//!
//! Rewrites the `let` keyword to `const` when the declaration has a single
//! declarator; multi-declarator declarations are reported without a fix, as
//! only some of their bindings may qualify.

use crate::scope::enclosing_scope;
use treelint_core::{
    walk_within, Fix, ListenerTable, Node, Rule, RuleContext, RuleMeta, Severity, TextRange,
};
use treelint_lang::kinds;

/// Rule code for prefer-const.
pub const CODE: &str = "TL001";

/// Rule name for prefer-const.
pub const NAME: &str = "prefer-const";

static META: RuleMeta = RuleMeta {
    name: NAME,
    code: CODE,
    description: "Requires const for bindings that are never reassigned",
    default_severity: Severity::Warning,
    fixable: true,
    messages: &[(
        "useConst",
        "'{name}' is never reassigned. Use 'const' instead.",
    )],
};

/// Requires `const` declarations for bindings that are never reassigned.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreferConst;

impl PreferConst {
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

impl Rule for PreferConst {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn create(&self, ctx: &RuleContext) -> ListenerTable {
        let mut table = ListenerTable::new();
        let ctx = ctx.clone();
        table.on(kinds::VARIABLE_DECLARATION, move |node| {
            if node.attr() != Some("let") {
                return;
            }
            let scope = enclosing_scope(node);
            let single = node.child_count() == 1;

            for declarator in node.children() {
                let Some(name_node) = declarator.child(0) else {
                    continue;
                };
                // A binding without an initializer cannot become const.
                if declarator.child_count() < 2 {
                    continue;
                }
                let name = ctx.node_text(name_node);
                if is_reassigned(scope, name_node, name, &ctx) {
                    continue;
                }

                let data = [("name", name)];
                if single {
                    let start = node.range().start();
                    let keyword = TextRange::new(start, start + "let".len());
                    ctx.report_with_fix(
                        name_node.range(),
                        "useConst",
                        &data,
                        vec![Fix::replace(keyword, "const")],
                    );
                } else {
                    ctx.report_with_data(name_node.range(), "useConst", &data);
                }
            }
        });
        table
    }
}

/// Whether `name` is written anywhere in `scope` besides its declarator.
///
/// The walk deliberately descends into nested functions: a closure that
/// reassigns the binding disqualifies it just as a local write does.
fn is_reassigned(scope: Node<'_>, name_node: Node<'_>, name: &str, ctx: &RuleContext) -> bool {
    let mut reassigned = false;
    walk_within(scope, |node| {
        if reassigned {
            return false;
        }
        if node.kind() == kinds::ASSIGNMENT_EXPRESSION || node.kind() == kinds::UPDATE_EXPRESSION {
            if let Some(target) = node.child(0) {
                if target.kind() == kinds::IDENTIFIER
                    && target.id() != name_node.id()
                    && ctx.node_text(target) == name
                {
                    reassigned = true;
                }
            }
        }
        true
    });
    reassigned
}
