//! Per-file state and the per-(rule, file) context facade.

use crate::rule::RuleMeta;
use crate::tree::{Node, TypeInfo, TypeQuery};
use crate::types::{Diagnostic, Fix, Severity, Suggestion, TextRange};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

/// Shared per-file state: the text version under analysis, the optional
/// type-query handle, and the diagnostic sink all rule contexts report into.
///
/// Created fresh for every traversal pass and discarded afterwards.
pub struct FileState {
    path: PathBuf,
    text: Arc<str>,
    types: Option<Rc<dyn TypeQuery>>,
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl FileState {
    /// Creates the state for one traversal pass.
    #[must_use]
    pub fn new(path: &Path, text: Arc<str>, types: Option<Rc<dyn TypeQuery>>) -> Rc<Self> {
        Rc::new(Self {
            path: path.to_path_buf(),
            text,
            types,
            diagnostics: RefCell::new(Vec::new()),
        })
    }

    /// The file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The text version this pass was parsed from.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn push(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Drains the collected diagnostics in collection order.
    pub(crate) fn take_diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.take()
    }
}

/// Read-only facade handed to one rule for one file.
///
/// The context exposes the file text, the optional type query, and the
/// append-only reporting API. It outlives one traversal pass only; rule
/// listeners capture clones of it.
#[derive(Clone)]
pub struct RuleContext {
    meta: &'static RuleMeta,
    severity: Severity,
    shared: Rc<FileState>,
}

impl RuleContext {
    pub(crate) fn new(meta: &'static RuleMeta, severity: Severity, shared: Rc<FileState>) -> Self {
        Self {
            meta,
            severity,
            shared,
        }
    }

    /// This rule's metadata.
    #[must_use]
    pub fn meta(&self) -> &'static RuleMeta {
        self.meta
    }

    /// The severity diagnostics from this rule will carry.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// The file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.shared.path()
    }

    /// The full file text of the current pass.
    #[must_use]
    pub fn text(&self) -> &str {
        self.shared.text()
    }

    /// Slices a node's text out of the current pass's source.
    #[must_use]
    pub fn node_text(&self, node: Node<'_>) -> &str {
        let range = node.range();
        &self.shared.text()[range.start()..range.end()]
    }

    /// Queries the node's type, if the provider supplied type information.
    #[must_use]
    pub fn type_of(&self, node: Node<'_>) -> Option<TypeInfo> {
        self.shared.types.as_ref()?.type_of(node)
    }

    /// Records a plain diagnostic.
    pub fn report(&self, range: impl Into<TextRange>, message_id: &str) {
        self.report_with_data(range, message_id, &[]);
    }

    /// Records a plain diagnostic with message placeholder data.
    pub fn report_with_data(
        &self,
        range: impl Into<TextRange>,
        message_id: &str,
        data: &[(&str, &str)],
    ) {
        self.shared
            .push(self.build(range.into(), message_id, data, Vec::new(), Vec::new()));
    }

    /// Records a diagnostic carrying one atomic fix-set.
    ///
    /// The edits are applied all-or-nothing: the autofix engine treats them
    /// as a single indivisible edit spanning the union of their ranges.
    pub fn report_with_fix(
        &self,
        range: impl Into<TextRange>,
        message_id: &str,
        data: &[(&str, &str)],
        fixes: Vec<Fix>,
    ) {
        self.shared
            .push(self.build(range.into(), message_id, data, fixes, Vec::new()));
    }

    /// Records a diagnostic offering alternative fixes; none are auto-applied.
    pub fn report_with_suggestions(
        &self,
        range: impl Into<TextRange>,
        message_id: &str,
        data: &[(&str, &str)],
        suggestions: Vec<Suggestion>,
    ) {
        self.shared
            .push(self.build(range.into(), message_id, data, Vec::new(), suggestions));
    }

    /// Builds a [`Suggestion`] whose message is rendered from this rule's
    /// templates.
    #[must_use]
    pub fn suggestion(&self, message_id: &str, data: &[(&str, &str)], fixes: Vec<Fix>) -> Suggestion {
        Suggestion {
            message_id: message_id.to_string(),
            message: self.render(message_id, data),
            fixes,
        }
    }

    fn build(
        &self,
        range: TextRange,
        message_id: &str,
        data: &[(&str, &str)],
        fixes: Vec<Fix>,
        suggestions: Vec<Suggestion>,
    ) -> Diagnostic {
        Diagnostic {
            rule: self.meta.name.to_string(),
            code: self.meta.code.to_string(),
            message_id: message_id.to_string(),
            message: self.render(message_id, data),
            severity: self.severity,
            range,
            fixes,
            suggestions,
        }
    }

    fn render(&self, message_id: &str, data: &[(&str, &str)]) -> String {
        let Some(template) = self.meta.template(message_id) else {
            tracing::warn!(rule = self.meta.name, message_id, "unknown message id");
            return message_id.to_string();
        };
        render_template(template, data)
    }
}

/// Fills `{placeholder}` slots in a message template.
fn render_template(template: &str, data: &[(&str, &str)]) -> String {
    let mut message = template.to_string();
    for (key, value) in data {
        message = message.replace(&format!("{{{key}}}"), value);
    }
    message
}

/// Builds an engine-generated diagnostic attributed to a rule (used for
/// initialization failures and crashed listeners).
pub(crate) fn engine_diagnostic(
    meta: &'static RuleMeta,
    message_id: &str,
    message: String,
    range: TextRange,
) -> Diagnostic {
    Diagnostic {
        rule: meta.name.to_string(),
        code: meta.code.to_string(),
        message_id: message_id.to_string(),
        message,
        severity: Severity::Error,
        range,
        fixes: Vec::new(),
        suggestions: Vec::new(),
    }
}
