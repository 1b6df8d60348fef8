//! Rule trait and listener tables.

use crate::context::RuleContext;
use crate::tree::{Node, NodeKind};
use crate::types::Severity;

/// Static metadata describing a rule.
#[derive(Debug)]
pub struct RuleMeta {
    /// Kebab-case rule name (e.g. "prefer-const").
    pub name: &'static str,
    /// Rule code (e.g. "TL001").
    pub code: &'static str,
    /// One-line description of what the rule checks.
    pub description: &'static str,
    /// Severity applied when the configuration does not override it.
    pub default_severity: Severity,
    /// Whether the rule can emit auto-applicable fixes.
    pub fixable: bool,
    /// Message templates, keyed by message id. Placeholders use `{name}`
    /// syntax and are filled from the data passed at report time.
    pub messages: &'static [(&'static str, &'static str)],
}

impl RuleMeta {
    /// Looks up a message template by id.
    #[must_use]
    pub fn template(&self, message_id: &str) -> Option<&'static str> {
        self.messages
            .iter()
            .find(|(id, _)| *id == message_id)
            .map(|(_, template)| *template)
    }
}

/// A node-visit callback registered by a rule.
///
/// Listeners receive the node and nothing else mutable; any per-rule,
/// per-file state they need (scope maps, depth counters) lives in
/// `Rc<RefCell<...>>` values captured when the table was built.
pub type Listener = Box<dyn FnMut(Node<'_>)>;

/// Mapping from node kind to the callbacks one rule wants invoked.
///
/// Built once per (rule, file) activation and discarded after traversal;
/// tables are never reused across files because their closures capture
/// per-file state.
#[derive(Default)]
pub struct ListenerTable {
    pub(crate) entries: Vec<(NodeKind, Listener)>,
}

impl ListenerTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback for a node kind.
    pub fn on(&mut self, kind: NodeKind, listener: impl FnMut(Node<'_>) + 'static) {
        self.entries.push((kind, Box::new(listener)));
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no listeners are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An independent unit of analysis producing diagnostics from tree nodes.
///
/// Implementations must be stateless across files: `create` is called once
/// per (rule, file) and all mutable state belongs to the returned table's
/// closures.
///
/// # Example
///
/// ```ignore
/// use treelint_core::{ListenerTable, Rule, RuleContext, RuleMeta, Severity};
///
/// pub struct NoDebugger;
///
/// static META: RuleMeta = RuleMeta {
///     name: "no-debugger",
///     code: "TL005",
///     description: "Disallows debugger statements",
///     default_severity: Severity::Error,
///     fixable: true,
///     messages: &[("unexpectedDebugger", "Unexpected 'debugger' statement.")],
/// };
///
/// impl Rule for NoDebugger {
///     fn meta(&self) -> &'static RuleMeta { &META }
///
///     fn create(&self, ctx: &RuleContext) -> ListenerTable {
///         let mut table = ListenerTable::new();
///         let ctx = ctx.clone();
///         table.on(kinds::DEBUGGER_STATEMENT, move |node| {
///             ctx.report(node.range(), "unexpectedDebugger");
///         });
///         table
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Static metadata for this rule.
    fn meta(&self) -> &'static RuleMeta;

    /// Builds this rule's listener table for one file.
    ///
    /// Called exactly once per (rule, file, pass). A panic here excludes the
    /// rule from the file and is reported as a rule-initialization failure;
    /// other rules proceed unaffected.
    fn create(&self, ctx: &RuleContext) -> ListenerTable;
}

/// Type alias for boxed rule trait objects.
pub type RuleBox = Box<dyn Rule>;
