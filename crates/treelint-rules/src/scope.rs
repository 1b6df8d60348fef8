//! Shared scope helpers for rules.
//!
//! The engine never prunes its traversal, so rules that reason about scopes
//! resolve them with parent-chain walks and bounded sub-walks of their own.

use treelint_core::Node;
use treelint_lang::kinds;

/// The scope a node's bindings live in: the body block of the nearest
/// enclosing function, or the whole program.
pub(crate) fn enclosing_scope<'t>(node: Node<'t>) -> Node<'t> {
    let mut root = node;
    for ancestor in node.ancestors() {
        if ancestor.kind() == kinds::FUNCTION_DECLARATION {
            // The body block is the function's last child.
            if let Some(body) = ancestor.child(ancestor.child_count().saturating_sub(1)) {
                return body;
            }
        }
        root = ancestor;
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use treelint_core::{TreeProvider, SourceTree};
    use treelint_lang::ScriptLanguage;

    fn parse(text: &str) -> SourceTree {
        ScriptLanguage.parse(text).unwrap().tree
    }

    #[test]
    fn top_level_scope_is_the_program() {
        let tree = parse("let x = 1;");
        let decl = tree.root().child(0).unwrap();
        assert_eq!(enclosing_scope(decl).kind(), kinds::PROGRAM);
    }

    #[test]
    fn function_scope_is_the_body_block() {
        let tree = parse("function f() { let x = 1; }");
        let body = tree.root().child(0).unwrap().child(1).unwrap();
        let decl = body.child(0).unwrap();
        assert_eq!(enclosing_scope(decl).kind(), kinds::BLOCK_STATEMENT);
        assert_eq!(enclosing_scope(decl).id(), body.id());
    }
}
