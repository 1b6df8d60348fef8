//! Single-pass, pre-order traversal dispatching all rules' listeners.

use crate::cancel::CancelToken;
use crate::context::{engine_diagnostic, FileState};
use crate::dispatch::{panic_message, ActiveRule, DispatchTable};
use crate::tree::{Node, SourceTree};
use std::panic::{catch_unwind, AssertUnwindSafe};

/// How many visited nodes between cancellation polls.
const CANCEL_POLL_INTERVAL: usize = 256;

/// Marker for a traversal abandoned by cancellation.
pub(crate) struct Cancelled;

/// Walks the tree once in document order (depth-first, pre-order: parent
/// before children, children in source order), invoking every registered
/// callback for each visited node's kind in rule-registration order.
///
/// A callback that panics is caught at the call site: the engine records one
/// rule-crashed diagnostic carrying the causing node's range and poisons the
/// rule for the remainder of this file's traversal; all other callbacks and
/// rules continue. The engine itself never prunes — rules that need bounded
/// scope walk children themselves (see [`walk_within`]).
pub(crate) fn traverse(
    tree: &SourceTree,
    table: &mut DispatchTable,
    active: &[ActiveRule],
    state: &FileState,
    cancel: &CancelToken,
) -> Result<(), Cancelled> {
    let mut poisoned = vec![false; active.len()];
    let mut stack = vec![tree.root()];
    let mut visited: usize = 0;

    while let Some(node) = stack.pop() {
        visited += 1;
        if visited % CANCEL_POLL_INTERVAL == 0 && cancel.is_cancelled() {
            return Err(Cancelled);
        }

        if let Some(entries) = table.entries_mut(node.kind()) {
            for entry in entries.iter_mut() {
                if poisoned[entry.rule_index] {
                    continue;
                }
                let result = catch_unwind(AssertUnwindSafe(|| (entry.listener)(node)));
                if let Err(payload) = result {
                    let meta = active[entry.rule_index].rule.meta();
                    let reason = panic_message(payload.as_ref());
                    tracing::warn!(
                        rule = meta.name,
                        file = %state.path().display(),
                        node = %node.kind(),
                        range = %node.range(),
                        %reason,
                        "rule crashed, disabling it for the rest of this file"
                    );
                    poisoned[entry.rule_index] = true;
                    state.push(engine_diagnostic(
                        meta,
                        "ruleCrashed",
                        format!("Rule crashed while visiting {}: {reason}", node.kind()),
                        node.range(),
                    ));
                }
            }
        }

        for i in (0..node.child_count()).rev() {
            if let Some(child) = node.child(i) {
                stack.push(child);
            }
        }
    }

    Ok(())
}

/// Bounded sub-walk helper for rules.
///
/// Performs a pre-order walk of `root`'s subtree, calling `visit` for each
/// node. When `visit` returns `false` the node's children are not descended
/// into. Rules use this for scope-bounded analysis (e.g. "don't look into
/// nested functions") instead of relying on engine-level pruning, which does
/// not exist.
pub fn walk_within(root: Node<'_>, mut visit: impl FnMut(Node<'_>) -> bool) {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if !visit(node) {
            continue;
        }
        for i in (0..node.child_count()).rev() {
            if let Some(child) = node.child(i) {
                stack.push(child);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RuleContext;
    use crate::dispatch::build_dispatch_table;
    use crate::rule::{ListenerTable, Rule, RuleMeta};
    use crate::tree::{NodeKind, TreeBuilder};
    use crate::types::{Severity, TextRange};
    use std::path::Path;
    use std::rc::Rc;
    use std::sync::{Arc, Mutex};

    const STMT: NodeKind = NodeKind("Stmt");
    const EXPR: NodeKind = NodeKind("Expr");

    /// `Root [Stmt [Expr, Expr], Stmt [Expr]]` over 15 bytes.
    fn sample_tree() -> SourceTree {
        let mut b = TreeBuilder::new();
        let root = b.add_node(None, NodeKind("Root"), TextRange::new(0, 15));
        let s1 = b.add_node(Some(root), STMT, TextRange::new(0, 8));
        b.add_node(Some(s1), EXPR, TextRange::new(0, 3));
        b.add_node(Some(s1), EXPR, TextRange::new(4, 8));
        let s2 = b.add_node(Some(root), STMT, TextRange::new(9, 15));
        b.add_node(Some(s2), EXPR, TextRange::new(10, 14));
        b.finish()
    }

    static RECORDER: RuleMeta = RuleMeta {
        name: "recorder",
        code: "T010",
        description: "records visited ranges",
        default_severity: Severity::Info,
        fixable: false,
        messages: &[],
    };

    /// Records every visited node range, for order assertions.
    struct Recorder {
        kinds: &'static [NodeKind],
        log: Arc<Mutex<Vec<TextRange>>>,
    }

    impl Rule for Recorder {
        fn meta(&self) -> &'static RuleMeta {
            &RECORDER
        }
        fn create(&self, _ctx: &RuleContext) -> ListenerTable {
            let mut table = ListenerTable::new();
            for &kind in self.kinds {
                let log = Arc::clone(&self.log);
                table.on(kind, move |node| {
                    log.lock().unwrap().push(node.range());
                });
            }
            table
        }
    }

    static POISON: RuleMeta = RuleMeta {
        name: "poison",
        code: "T011",
        description: "panics on every node",
        default_severity: Severity::Error,
        fixable: false,
        messages: &[],
    };

    struct Poison;
    impl Rule for Poison {
        fn meta(&self) -> &'static RuleMeta {
            &POISON
        }
        fn create(&self, _ctx: &RuleContext) -> ListenerTable {
            let mut table = ListenerTable::new();
            table.on(STMT, |_| panic!("poisoned"));
            table
        }
    }

    fn run(tree: &SourceTree, active: &[ActiveRule]) -> Vec<crate::types::Diagnostic> {
        let state = crate::context::FileState::new(Path::new("t.tl"), Arc::from(""), None);
        let mut table = build_dispatch_table(active, &state);
        traverse(tree, &mut table, active, &state, &CancelToken::new())
            .map_err(|_| ())
            .unwrap();
        state.take_diagnostics()
    }

    #[test]
    fn visits_in_preorder_source_order() {
        let tree = sample_tree();
        let log = Arc::new(Mutex::new(Vec::new()));
        let active = vec![ActiveRule {
            rule: Box::new(Recorder {
                kinds: &[NodeKind("Root"), STMT, EXPR],
                log: Arc::clone(&log),
            }),
            severity: Severity::Info,
        }];
        run(&tree, &active);

        let ranges = log.lock().unwrap().clone();
        // Parent before child, children in source order.
        assert_eq!(
            ranges,
            [
                TextRange::new(0, 15),
                TextRange::new(0, 8),
                TextRange::new(0, 3),
                TextRange::new(4, 8),
                TextRange::new(9, 15),
                TextRange::new(10, 14),
            ]
        );
    }

    #[test]
    fn crashed_rule_is_poisoned_but_others_continue() {
        let tree = sample_tree();
        let log = Arc::new(Mutex::new(Vec::new()));
        let active = vec![
            ActiveRule {
                rule: Box::new(Poison),
                severity: Severity::Error,
            },
            ActiveRule {
                rule: Box::new(Recorder {
                    kinds: &[STMT, EXPR],
                    log: Arc::clone(&log),
                }),
                severity: Severity::Info,
            },
        ];
        let diags = run(&tree, &active);

        // One crash report, not one per Stmt node.
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].message_id, "ruleCrashed");
        assert_eq!(diags[0].rule, "poison");
        assert_eq!(diags[0].range, TextRange::new(0, 8));

        // The healthy rule still saw every node it listens to.
        assert_eq!(log.lock().unwrap().len(), 5);
    }

    #[test]
    fn cancellation_aborts_traversal() {
        // A wide flat tree so the poll interval is crossed.
        let mut b = TreeBuilder::new();
        let root = b.add_node(None, NodeKind("Root"), TextRange::new(0, 1000));
        for _ in 0..600 {
            b.add_node(Some(root), STMT, TextRange::new(0, 0));
        }
        let tree = b.finish();

        let cancel = CancelToken::new();
        cancel.cancel();

        let state = crate::context::FileState::new(Path::new("t.tl"), Arc::from(""), None);
        let active: Vec<ActiveRule> = Vec::new();
        let mut table = build_dispatch_table(&active, &state);
        let result = traverse(&tree, &mut table, &active, &state, &cancel);
        assert!(result.is_err());
    }

    #[test]
    fn walk_within_respects_descend_predicate() {
        let tree = sample_tree();
        let mut seen = Vec::new();
        walk_within(tree.root(), |node| {
            seen.push(node.range());
            // Do not descend into the first statement.
            node.range() != TextRange::new(0, 8)
        });
        assert_eq!(
            seen,
            [
                TextRange::new(0, 15),
                TextRange::new(0, 8),
                TextRange::new(9, 15),
                TextRange::new(10, 14),
            ]
        );
    }
}
