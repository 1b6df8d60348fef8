//! Generic syntax tree model and the provider seam.
//!
//! The engine never parses anything itself. A [`TreeProvider`] turns source
//! text into a [`SourceTree`]: an arena of nodes, each with a discriminated
//! kind, a byte range, a parent link and ordered children. Providers may also
//! attach a [`TypeQuery`] handle for rules that need type information.

use crate::types::TextRange;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// Discriminated kind of a tree node (e.g. `"VariableDeclaration"`).
///
/// Kinds are interned static strings so that a provider's grammar can be
/// defined as a set of constants without the engine knowing any grammar.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKind(pub &'static str);

impl NodeKind {
    /// The kind name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Debug for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of a node within its [`SourceTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    range: TextRange,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attr: Option<Box<str>>,
}

/// An arena-backed syntax tree for one file.
///
/// The root is always the first inserted node. Nodes are stored in pre-order
/// insertion order; handles ([`Node`]) are cheap copies of an id plus a tree
/// reference.
#[derive(Debug)]
pub struct SourceTree {
    nodes: Vec<NodeData>,
}

impl SourceTree {
    /// The root node.
    #[must_use]
    pub fn root(&self) -> Node<'_> {
        Node {
            tree: self,
            id: NodeId(0),
        }
    }

    /// Resolves an id back into a handle.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Node<'_> {
        Node { tree: self, id }
    }

    /// Total number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree has no nodes.
    ///
    /// A tree produced by a [`TreeBuilder`] always has at least a root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Checks the structural invariants: every child range is contained in
    /// its parent's range, sibling ranges are non-overlapping and increasing,
    /// parent links match the child lists, and no range exceeds `text_len`.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self, text_len: usize) -> Result<(), TreeError> {
        if self.nodes.is_empty() {
            return Err(TreeError::Empty);
        }
        for (index, data) in self.nodes.iter().enumerate() {
            if data.range.end() > text_len {
                return Err(TreeError::OutOfBounds {
                    range: data.range,
                    len: text_len,
                });
            }
            let mut prev: Option<TextRange> = None;
            for &child in &data.children {
                let child_data = &self.nodes[child.index()];
                if child_data.parent != Some(NodeId(index as u32)) {
                    return Err(TreeError::ParentMismatch(child));
                }
                if !data.range.contains_range(child_data.range) {
                    return Err(TreeError::ChildEscapesParent {
                        child: child_data.range,
                        parent: data.range,
                    });
                }
                if let Some(prev) = prev {
                    if child_data.range.start() < prev.end() {
                        return Err(TreeError::SiblingOrder {
                            left: prev,
                            right: child_data.range,
                        });
                    }
                }
                prev = Some(child_data.range);
            }
        }
        Ok(())
    }
}

/// Structural invariant violation detected by [`SourceTree::validate`].
#[derive(Debug, Error)]
pub enum TreeError {
    /// The tree contains no nodes.
    #[error("tree has no nodes")]
    Empty,
    /// A node's range exceeds the text length.
    #[error("node range {range} exceeds text length {len}")]
    OutOfBounds {
        /// The offending range.
        range: TextRange,
        /// Length of the file text.
        len: usize,
    },
    /// A child range escapes its parent's range.
    #[error("child range {child} not contained in parent range {parent}")]
    ChildEscapesParent {
        /// The child's range.
        child: TextRange,
        /// The parent's range.
        parent: TextRange,
    },
    /// Sibling ranges overlap or regress in source order.
    #[error("sibling ranges {left} and {right} overlap or are out of order")]
    SiblingOrder {
        /// Earlier sibling's range.
        left: TextRange,
        /// Later sibling's range.
        right: TextRange,
    },
    /// A child's parent link does not point back at its parent.
    #[error("parent link of node {0:?} does not match tree structure")]
    ParentMismatch(NodeId),
}

/// Incremental constructor for a [`SourceTree`].
///
/// Providers insert nodes in pre-order: the first node is the root, and every
/// later node names an existing parent. Ranges may be widened after children
/// are attached via [`TreeBuilder::set_range`].
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<NodeData>,
}

impl TreeBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node and returns its id.
    ///
    /// # Panics
    ///
    /// Panics if the first node has a parent, or a later node has none.
    pub fn add_node(&mut self, parent: Option<NodeId>, kind: NodeKind, range: TextRange) -> NodeId {
        assert_eq!(
            parent.is_none(),
            self.nodes.is_empty(),
            "exactly the first node must be the root"
        );
        let id = NodeId(self.nodes.len() as u32);
        if let Some(parent) = parent {
            self.nodes[parent.index()].children.push(id);
        }
        self.nodes.push(NodeData {
            kind,
            range,
            parent,
            children: Vec::new(),
            attr: None,
        });
        id
    }

    /// Replaces a node's range (used to widen a node once its last child is
    /// known).
    pub fn set_range(&mut self, id: NodeId, range: TextRange) {
        self.nodes[id.index()].range = range;
    }

    /// Attaches the node's kind-specific attribute (declaration keyword,
    /// operator symbol, ...).
    pub fn set_attr(&mut self, id: NodeId, attr: impl Into<Box<str>>) {
        self.nodes[id.index()].attr = Some(attr.into());
    }

    /// Finalizes the tree.
    #[must_use]
    pub fn finish(self) -> SourceTree {
        SourceTree { nodes: self.nodes }
    }
}

/// A cheap, copyable handle to one node of a [`SourceTree`].
#[derive(Clone, Copy)]
pub struct Node<'t> {
    tree: &'t SourceTree,
    id: NodeId,
}

impl<'t> Node<'t> {
    fn data(&self) -> &'t NodeData {
        &self.tree.nodes[self.id.index()]
    }

    /// The node's id within its tree.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The node's kind.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.data().kind
    }

    /// The node's byte range.
    #[must_use]
    pub fn range(&self) -> TextRange {
        self.data().range
    }

    /// The parent node, if any.
    #[must_use]
    pub fn parent(&self) -> Option<Node<'t>> {
        self.data().parent.map(|id| Node {
            tree: self.tree,
            id,
        })
    }

    /// The node's kind-specific attribute, if any.
    #[must_use]
    pub fn attr(&self) -> Option<&'t str> {
        self.data().attr.as_deref()
    }

    /// Ordered children.
    pub fn children(&self) -> impl Iterator<Item = Node<'t>> + '_ {
        let tree = self.tree;
        self.data().children.iter().map(move |&id| Node { tree, id })
    }

    /// Number of children.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }

    /// The `n`-th child, if present.
    #[must_use]
    pub fn child(&self, n: usize) -> Option<Node<'t>> {
        self.data().children.get(n).map(|&id| Node {
            tree: self.tree,
            id,
        })
    }

    /// Walks the parent chain, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = Node<'t>> + '_ {
        let mut current = self.parent();
        std::iter::from_fn(move || {
            let node = current?;
            current = node.parent();
            Some(node)
        })
    }

    /// Slices this node's text out of the file's source.
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        let range = self.range();
        &source[range.start()..range.end()]
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.kind(), self.range())
    }
}

impl From<Node<'_>> for TextRange {
    fn from(node: Node<'_>) -> TextRange {
        node.range()
    }
}

/// Fatal parse failure for one file.
#[derive(Debug, Clone, Error)]
#[error("parse error at {range}: {message}")]
pub struct ParseError {
    /// Human-readable description.
    pub message: String,
    /// Position of the failure.
    pub range: TextRange,
}

impl ParseError {
    /// Creates a parse error.
    #[must_use]
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// Result of parsing one file.
pub struct ParseOutcome {
    /// The parsed tree.
    pub tree: SourceTree,
    /// Optional type-query facility for this file.
    pub types: Option<Rc<dyn TypeQuery>>,
}

impl ParseOutcome {
    /// Wraps a tree with no type information.
    #[must_use]
    pub fn new(tree: SourceTree) -> Self {
        Self { tree, types: None }
    }

    /// Attaches a type-query handle.
    #[must_use]
    pub fn with_types(mut self, types: Rc<dyn TypeQuery>) -> Self {
        self.types = Some(types);
        self
    }
}

/// Supplies parsed trees to the engine.
pub trait TreeProvider: Send + Sync {
    /// File extensions (without dot) this provider handles.
    fn extensions(&self) -> &'static [&'static str];

    /// Parses `text` into a tree.
    ///
    /// # Errors
    ///
    /// A [`ParseError`] is fatal for the file: the engine records a
    /// file-scoped failure and skips traversal.
    fn parse(&self, text: &str) -> Result<ParseOutcome, ParseError>;
}

/// Resolved type of an expression node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    /// Type name in the provider's language.
    pub name: String,
}

/// Resolved symbol a node refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolInfo {
    /// Symbol name.
    pub name: String,
}

/// Optional per-file type-query facility supplied by a provider.
pub trait TypeQuery {
    /// The type of the given node, if known.
    fn type_of(&self, node: Node<'_>) -> Option<TypeInfo>;
    /// The symbol the given node resolves to, if known.
    fn symbol_of(&self, node: Node<'_>) -> Option<SymbolInfo>;
}
