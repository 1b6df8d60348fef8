//! Dispatch table: the per-file merge of all active rules' listener tables.

use crate::context::{engine_diagnostic, FileState, RuleContext};
use crate::rule::{Listener, RuleBox};
use crate::tree::NodeKind;
use crate::types::{Severity, TextRange};
use std::any::Any;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

/// A rule activated for a run, bound to its resolved severity.
pub(crate) struct ActiveRule {
    pub rule: RuleBox,
    pub severity: Severity,
}

/// One registered callback, tagged with the index of the rule that owns it.
pub(crate) struct DispatchEntry {
    pub rule_index: usize,
    pub listener: Listener,
}

/// Kind-indexed multimap of listener callbacks for one file.
///
/// Rebuilt per file and per autofix pass: listener closures capture per-file
/// mutable rule state, so tables are never reused.
#[derive(Default)]
pub(crate) struct DispatchTable {
    map: HashMap<NodeKind, Vec<DispatchEntry>>,
}

impl DispatchTable {
    pub fn entries_mut(&mut self, kind: NodeKind) -> Option<&mut Vec<DispatchEntry>> {
        self.map.get_mut(&kind)
    }

    #[cfg(test)]
    pub fn listener_count(&self) -> usize {
        self.map.values().map(Vec::len).sum()
    }
}

/// Folds all active rules' listener tables into one dispatch table.
///
/// Each rule's factory is invoked exactly once, in registration order, which
/// is preserved within every kind's entry list. A panicking factory excludes
/// that rule from this file's table and records a single rule-initialization
/// diagnostic; other rules proceed unaffected.
pub(crate) fn build_dispatch_table(active: &[ActiveRule], state: &Rc<FileState>) -> DispatchTable {
    let mut table = DispatchTable::default();

    for (rule_index, entry) in active.iter().enumerate() {
        let meta = entry.rule.meta();
        let ctx = RuleContext::new(meta, entry.severity, Rc::clone(state));

        match catch_unwind(AssertUnwindSafe(|| entry.rule.create(&ctx))) {
            Ok(listeners) => {
                for (kind, listener) in listeners.entries {
                    table.map.entry(kind).or_default().push(DispatchEntry {
                        rule_index,
                        listener,
                    });
                }
            }
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                tracing::warn!(
                    rule = meta.name,
                    file = %state.path().display(),
                    %reason,
                    "rule initialization failed"
                );
                state.push(engine_diagnostic(
                    meta,
                    "ruleInitFailed",
                    format!("Rule initialization failed: {reason}"),
                    TextRange::empty(0),
                ));
            }
        }
    }

    table
}

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
