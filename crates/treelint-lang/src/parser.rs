//! Recursive-descent parser producing the engine's generic tree.
//!
//! Parsing happens in two phases: the grammar is parsed into an owned raw
//! tree, which is then lowered pre-order into the [`SourceTree`] arena (the
//! arena wants parents before children, while expression parsing naturally
//! builds leaves first).

use crate::kinds;
use crate::lexer::{Token, TokenKind};
use treelint_core::{NodeKind, ParseError, SourceTree, TextRange, TreeBuilder};

struct RawNode {
    kind: NodeKind,
    range: TextRange,
    attr: Option<&'static str>,
    children: Vec<RawNode>,
}

impl RawNode {
    fn new(kind: NodeKind, range: TextRange) -> Self {
        Self {
            kind,
            range,
            attr: None,
            children: Vec::new(),
        }
    }

    fn with_children(kind: NodeKind, range: TextRange, children: Vec<RawNode>) -> Self {
        Self {
            kind,
            range,
            attr: None,
            children,
        }
    }
}

/// Parses a token stream into a tree.
pub(crate) fn parse(text: &str, tokens: &[Token]) -> Result<SourceTree, ParseError> {
    let mut parser = Parser {
        text,
        tokens,
        pos: 0,
    };
    let program = parser.parse_program()?;

    let mut builder = TreeBuilder::new();
    lower(&mut builder, None, &program);
    Ok(builder.finish())
}

fn lower(
    builder: &mut TreeBuilder,
    parent: Option<treelint_core::NodeId>,
    raw: &RawNode,
) {
    let id = builder.add_node(parent, raw.kind, raw.range);
    if let Some(attr) = raw.attr {
        builder.set_attr(id, attr);
    }
    for child in &raw.children {
        lower(builder, Some(id), child);
    }
}

struct Parser<'a> {
    text: &'a str,
    tokens: &'a [Token],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Token {
        self.tokens[self.pos]
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn bump(&mut self) -> Token {
        let token = self.tokens[self.pos];
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn token_text(&self, token: Token) -> &str {
        if token.kind == TokenKind::Eof {
            "end of input"
        } else {
            &self.text[token.range.start()..token.range.end()]
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token, ParseError> {
        if self.at(kind) {
            Ok(self.bump())
        } else {
            let token = self.peek();
            Err(ParseError::new(
                format!("expected {what}, found '{}'", self.token_text(token)),
                token.range,
            ))
        }
    }

    fn parse_program(&mut self) -> Result<RawNode, ParseError> {
        let mut statements = Vec::new();
        while !self.at(TokenKind::Eof) {
            statements.push(self.parse_statement()?);
        }
        Ok(RawNode::with_children(
            kinds::PROGRAM,
            TextRange::new(0, self.text.len()),
            statements,
        ))
    }

    fn parse_statement(&mut self) -> Result<RawNode, ParseError> {
        match self.peek().kind {
            TokenKind::Let | TokenKind::Const | TokenKind::Var => {
                self.parse_variable_declaration()
            }
            TokenKind::Function => self.parse_function(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Break => self.parse_keyword_statement(kinds::BREAK_STATEMENT),
            TokenKind::Continue => self.parse_keyword_statement(kinds::CONTINUE_STATEMENT),
            TokenKind::Debugger => self.parse_keyword_statement(kinds::DEBUGGER_STATEMENT),
            TokenKind::Throw => self.parse_throw(),
            TokenKind::Try => self.parse_try(),
            TokenKind::LBrace => self.parse_block(),
            TokenKind::Semi => {
                let semi = self.bump();
                Ok(RawNode::new(kinds::EMPTY_STATEMENT, semi.range))
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_variable_declaration(&mut self) -> Result<RawNode, ParseError> {
        let keyword = self.bump();
        let attr = match keyword.kind {
            TokenKind::Let => "let",
            TokenKind::Const => "const",
            _ => "var",
        };

        let mut declarators = Vec::new();
        loop {
            let name = self.expect(TokenKind::Identifier, "a binding name")?;
            let mut children = vec![RawNode::new(kinds::IDENTIFIER, name.range)];
            let mut end = name.range.end();
            if self.at(TokenKind::Assign) {
                self.bump();
                let init = self.parse_expression()?;
                end = init.range.end();
                children.push(init);
            }
            declarators.push(RawNode::with_children(
                kinds::VARIABLE_DECLARATOR,
                TextRange::new(name.range.start(), end),
                children,
            ));
            if self.at(TokenKind::Comma) {
                self.bump();
            } else {
                break;
            }
        }

        let semi = self.expect(TokenKind::Semi, "';' after declaration")?;
        let mut node = RawNode::with_children(
            kinds::VARIABLE_DECLARATION,
            TextRange::new(keyword.range.start(), semi.range.end()),
            declarators,
        );
        node.attr = Some(attr);
        Ok(node)
    }

    fn parse_function(&mut self) -> Result<RawNode, ParseError> {
        let keyword = self.bump();
        let name = self.expect(TokenKind::Identifier, "a function name")?;
        let mut children = vec![RawNode::new(kinds::IDENTIFIER, name.range)];

        self.expect(TokenKind::LParen, "'('")?;
        if !self.at(TokenKind::RParen) {
            loop {
                let param = self.expect(TokenKind::Identifier, "a parameter name")?;
                children.push(RawNode::new(kinds::IDENTIFIER, param.range));
                if self.at(TokenKind::Comma) {
                    self.bump();
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "')'")?;

        let body = self.parse_block()?;
        let range = TextRange::new(keyword.range.start(), body.range.end());
        children.push(body);
        Ok(RawNode::with_children(
            kinds::FUNCTION_DECLARATION,
            range,
            children,
        ))
    }

    fn parse_block(&mut self) -> Result<RawNode, ParseError> {
        let open = self.expect(TokenKind::LBrace, "'{'")?;
        let mut statements = Vec::new();
        while !self.at(TokenKind::RBrace) && !self.at(TokenKind::Eof) {
            statements.push(self.parse_statement()?);
        }
        let close = self.expect(TokenKind::RBrace, "'}'")?;
        Ok(RawNode::with_children(
            kinds::BLOCK_STATEMENT,
            TextRange::new(open.range.start(), close.range.end()),
            statements,
        ))
    }

    fn parse_if(&mut self) -> Result<RawNode, ParseError> {
        let keyword = self.bump();
        self.expect(TokenKind::LParen, "'('")?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen, "')'")?;
        let consequent = self.parse_statement()?;
        let mut end = consequent.range.end();
        let mut children = vec![condition, consequent];
        if self.at(TokenKind::Else) {
            self.bump();
            let alternate = self.parse_statement()?;
            end = alternate.range.end();
            children.push(alternate);
        }
        Ok(RawNode::with_children(
            kinds::IF_STATEMENT,
            TextRange::new(keyword.range.start(), end),
            children,
        ))
    }

    fn parse_while(&mut self) -> Result<RawNode, ParseError> {
        let keyword = self.bump();
        self.expect(TokenKind::LParen, "'('")?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen, "')'")?;
        let body = self.parse_statement()?;
        let range = TextRange::new(keyword.range.start(), body.range.end());
        Ok(RawNode::with_children(
            kinds::WHILE_STATEMENT,
            range,
            vec![condition, body],
        ))
    }

    fn parse_return(&mut self) -> Result<RawNode, ParseError> {
        let keyword = self.bump();
        if self.at(TokenKind::Semi) {
            let semi = self.bump();
            return Ok(RawNode::new(
                kinds::RETURN_STATEMENT,
                TextRange::new(keyword.range.start(), semi.range.end()),
            ));
        }
        let value = self.parse_expression()?;
        let semi = self.expect(TokenKind::Semi, "';' after return value")?;
        Ok(RawNode::with_children(
            kinds::RETURN_STATEMENT,
            TextRange::new(keyword.range.start(), semi.range.end()),
            vec![value],
        ))
    }

    fn parse_keyword_statement(&mut self, kind: NodeKind) -> Result<RawNode, ParseError> {
        let keyword = self.bump();
        let semi = self.expect(TokenKind::Semi, "';'")?;
        Ok(RawNode::new(
            kind,
            TextRange::new(keyword.range.start(), semi.range.end()),
        ))
    }

    fn parse_throw(&mut self) -> Result<RawNode, ParseError> {
        let keyword = self.bump();
        let value = self.parse_expression()?;
        let semi = self.expect(TokenKind::Semi, "';' after throw value")?;
        Ok(RawNode::with_children(
            kinds::THROW_STATEMENT,
            TextRange::new(keyword.range.start(), semi.range.end()),
            vec![value],
        ))
    }

    fn parse_try(&mut self) -> Result<RawNode, ParseError> {
        let keyword = self.bump();
        let block = self.parse_block()?;
        let mut end = block.range.end();
        let mut children = vec![block];

        if self.at(TokenKind::Catch) {
            let catch = self.bump();
            let mut clause_children = Vec::new();
            if self.at(TokenKind::LParen) {
                self.bump();
                let param = self.expect(TokenKind::Identifier, "a catch parameter")?;
                clause_children.push(RawNode::new(kinds::IDENTIFIER, param.range));
                self.expect(TokenKind::RParen, "')'")?;
            }
            let body = self.parse_block()?;
            let range = TextRange::new(catch.range.start(), body.range.end());
            clause_children.push(body);
            end = range.end();
            children.push(RawNode::with_children(
                kinds::CATCH_CLAUSE,
                range,
                clause_children,
            ));
        }

        if self.at(TokenKind::Finally) {
            let finally = self.bump();
            let body = self.parse_block()?;
            let range = TextRange::new(finally.range.start(), body.range.end());
            end = range.end();
            children.push(RawNode::with_children(
                kinds::FINALLY_CLAUSE,
                range,
                vec![body],
            ));
        }

        if children.len() == 1 {
            let token = self.peek();
            return Err(ParseError::new(
                format!(
                    "expected 'catch' or 'finally' after try block, found '{}'",
                    self.token_text(token)
                ),
                token.range,
            ));
        }

        Ok(RawNode::with_children(
            kinds::TRY_STATEMENT,
            TextRange::new(keyword.range.start(), end),
            children,
        ))
    }

    fn parse_expression_statement(&mut self) -> Result<RawNode, ParseError> {
        let expression = self.parse_expression()?;
        let semi = self.expect(TokenKind::Semi, "';' after expression")?;
        let range = TextRange::new(expression.range.start(), semi.range.end());
        Ok(RawNode::with_children(
            kinds::EXPRESSION_STATEMENT,
            range,
            vec![expression],
        ))
    }

    fn parse_expression(&mut self) -> Result<RawNode, ParseError> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<RawNode, ParseError> {
        let left = self.parse_equality()?;
        let op = match self.peek().kind {
            TokenKind::Assign => "=",
            TokenKind::PlusAssign => "+=",
            TokenKind::MinusAssign => "-=",
            _ => return Ok(left),
        };
        if left.kind != kinds::IDENTIFIER {
            return Err(ParseError::new("invalid assignment target", left.range));
        }
        self.bump();
        let right = self.parse_assignment()?;
        let range = TextRange::new(left.range.start(), right.range.end());
        let mut node = RawNode::with_children(
            kinds::ASSIGNMENT_EXPRESSION,
            range,
            vec![left, right],
        );
        node.attr = Some(op);
        Ok(node)
    }

    fn parse_equality(&mut self) -> Result<RawNode, ParseError> {
        self.parse_binary(
            &[
                (TokenKind::EqEqEq, "==="),
                (TokenKind::NotEqEq, "!=="),
                (TokenKind::EqEq, "=="),
                (TokenKind::NotEq, "!="),
            ],
            Self::parse_relational,
        )
    }

    fn parse_relational(&mut self) -> Result<RawNode, ParseError> {
        self.parse_binary(
            &[
                (TokenKind::LtEq, "<="),
                (TokenKind::GtEq, ">="),
                (TokenKind::Lt, "<"),
                (TokenKind::Gt, ">"),
            ],
            Self::parse_additive,
        )
    }

    fn parse_additive(&mut self) -> Result<RawNode, ParseError> {
        self.parse_binary(
            &[(TokenKind::Plus, "+"), (TokenKind::Minus, "-")],
            Self::parse_multiplicative,
        )
    }

    fn parse_multiplicative(&mut self) -> Result<RawNode, ParseError> {
        self.parse_binary(
            &[(TokenKind::Star, "*"), (TokenKind::Slash, "/")],
            Self::parse_unary,
        )
    }

    fn parse_binary(
        &mut self,
        ops: &[(TokenKind, &'static str)],
        next: fn(&mut Self) -> Result<RawNode, ParseError>,
    ) -> Result<RawNode, ParseError> {
        let mut left = next(self)?;
        loop {
            let Some(&(_, op)) = ops.iter().find(|(kind, _)| self.at(*kind)) else {
                return Ok(left);
            };
            self.bump();
            let right = next(self)?;
            let range = TextRange::new(left.range.start(), right.range.end());
            let mut node =
                RawNode::with_children(kinds::BINARY_EXPRESSION, range, vec![left, right]);
            node.attr = Some(op);
            left = node;
        }
    }

    fn parse_unary(&mut self) -> Result<RawNode, ParseError> {
        let op = match self.peek().kind {
            TokenKind::Bang => "!",
            TokenKind::Minus => "-",
            _ => return self.parse_postfix(),
        };
        let token = self.bump();
        let operand = self.parse_unary()?;
        let range = TextRange::new(token.range.start(), operand.range.end());
        let mut node = RawNode::with_children(kinds::UNARY_EXPRESSION, range, vec![operand]);
        node.attr = Some(op);
        Ok(node)
    }

    fn parse_postfix(&mut self) -> Result<RawNode, ParseError> {
        let operand = self.parse_call()?;
        let op = match self.peek().kind {
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            _ => return Ok(operand),
        };
        if operand.kind != kinds::IDENTIFIER {
            return Err(ParseError::new("invalid update target", operand.range));
        }
        let token = self.bump();
        let range = TextRange::new(operand.range.start(), token.range.end());
        let mut node = RawNode::with_children(kinds::UPDATE_EXPRESSION, range, vec![operand]);
        node.attr = Some(op);
        Ok(node)
    }

    fn parse_call(&mut self) -> Result<RawNode, ParseError> {
        let mut callee = self.parse_primary()?;
        while self.at(TokenKind::LParen) {
            self.bump();
            let mut children = vec![callee];
            if !self.at(TokenKind::RParen) {
                loop {
                    children.push(self.parse_expression()?);
                    if self.at(TokenKind::Comma) {
                        self.bump();
                    } else {
                        break;
                    }
                }
            }
            let close = self.expect(TokenKind::RParen, "')'")?;
            let range = TextRange::new(children[0].range.start(), close.range.end());
            callee = RawNode::with_children(kinds::CALL_EXPRESSION, range, children);
        }
        Ok(callee)
    }

    fn parse_primary(&mut self) -> Result<RawNode, ParseError> {
        let token = self.peek();
        let kind = match token.kind {
            TokenKind::Number => kinds::NUMERIC_LITERAL,
            TokenKind::Str => kinds::STRING_LITERAL,
            TokenKind::True | TokenKind::False => kinds::BOOLEAN_LITERAL,
            TokenKind::Null => kinds::NULL_LITERAL,
            TokenKind::Identifier => kinds::IDENTIFIER,
            TokenKind::LParen => {
                self.bump();
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RParen, "')'")?;
                return Ok(inner);
            }
            _ => {
                return Err(ParseError::new(
                    format!("unexpected '{}'", self.token_text(token)),
                    token.range,
                ));
            }
        };
        self.bump();
        Ok(RawNode::new(kind, token.range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use treelint_core::Node;

    fn parse_text(text: &str) -> SourceTree {
        let tokens = tokenize(text).unwrap();
        let tree = parse(text, &tokens).unwrap();
        tree.validate(text.len()).unwrap();
        tree
    }

    fn kind_of(node: Node<'_>) -> &'static str {
        node.kind().as_str()
    }

    #[test]
    fn parses_let_declaration() {
        let text = "let x = 1;";
        let tree = parse_text(text);
        let root = tree.root();
        assert_eq!(kind_of(root), "Program");

        let decl = root.child(0).unwrap();
        assert_eq!(kind_of(decl), "VariableDeclaration");
        assert_eq!(decl.attr(), Some("let"));
        assert_eq!(decl.range(), TextRange::new(0, 10));

        let declarator = decl.child(0).unwrap();
        assert_eq!(kind_of(declarator), "VariableDeclarator");
        let name = declarator.child(0).unwrap();
        assert_eq!(name.text(text), "x");
        assert_eq!(name.range(), TextRange::new(4, 5));
        assert_eq!(kind_of(declarator.child(1).unwrap()), "NumericLiteral");
    }

    #[test]
    fn parses_multi_declarator_declaration() {
        let tree = parse_text("var a = 1, b, c = 2;");
        let decl = tree.root().child(0).unwrap();
        assert_eq!(decl.attr(), Some("var"));
        assert_eq!(decl.child_count(), 3);
        assert_eq!(decl.child(1).unwrap().child_count(), 1); // b has no init
    }

    #[test]
    fn parses_try_finally_structure() {
        let text = "try { foo(); } finally { return 1; }";
        let tree = parse_text(text);
        let try_stmt = tree.root().child(0).unwrap();
        assert_eq!(kind_of(try_stmt), "TryStatement");
        assert_eq!(try_stmt.child_count(), 2);

        let finally = try_stmt.child(1).unwrap();
        assert_eq!(kind_of(finally), "FinallyClause");
        let body = finally.child(0).unwrap();
        assert_eq!(kind_of(body), "BlockStatement");
        let ret = body.child(0).unwrap();
        assert_eq!(kind_of(ret), "ReturnStatement");
        assert_eq!(ret.text(text), "return 1;");
    }

    #[test]
    fn parses_try_catch_with_param() {
        let tree = parse_text("try { f(); } catch (e) { g(e); }");
        let try_stmt = tree.root().child(0).unwrap();
        let catch = try_stmt.child(1).unwrap();
        assert_eq!(kind_of(catch), "CatchClause");
        assert_eq!(kind_of(catch.child(0).unwrap()), "Identifier");
        assert_eq!(kind_of(catch.child(1).unwrap()), "BlockStatement");
    }

    #[test]
    fn bare_try_is_rejected() {
        let tokens = tokenize("try { f(); }").unwrap();
        let err = parse("try { f(); }", &tokens).unwrap_err();
        assert!(err.message.contains("catch"));
    }

    #[test]
    fn equality_binds_looser_than_addition() {
        let text = "a == b + 1;";
        let tree = parse_text(text);
        let expr = tree.root().child(0).unwrap().child(0).unwrap();
        assert_eq!(kind_of(expr), "BinaryExpression");
        assert_eq!(expr.attr(), Some("=="));
        let right = expr.child(1).unwrap();
        assert_eq!(right.attr(), Some("+"));
    }

    #[test]
    fn strict_and_loose_operators_are_distinct() {
        let tree = parse_text("a === b;");
        let expr = tree.root().child(0).unwrap().child(0).unwrap();
        assert_eq!(expr.attr(), Some("==="));
    }

    #[test]
    fn assignment_is_right_associative() {
        let tree = parse_text("a = b = 1;");
        let assign = tree.root().child(0).unwrap().child(0).unwrap();
        assert_eq!(kind_of(assign), "AssignmentExpression");
        assert_eq!(kind_of(assign.child(1).unwrap()), "AssignmentExpression");
    }

    #[test]
    fn compound_assignment_carries_operator() {
        let tree = parse_text("x += 2;");
        let assign = tree.root().child(0).unwrap().child(0).unwrap();
        assert_eq!(assign.attr(), Some("+="));
    }

    #[test]
    fn literal_assignment_target_is_rejected() {
        let tokens = tokenize("1 = 2;").unwrap();
        let err = parse("1 = 2;", &tokens).unwrap_err();
        assert!(err.message.contains("assignment target"));
    }

    #[test]
    fn parses_nested_calls() {
        let text = "f(a, g(b))(c);";
        let tree = parse_text(text);
        let outer = tree.root().child(0).unwrap().child(0).unwrap();
        assert_eq!(kind_of(outer), "CallExpression");
        let inner = outer.child(0).unwrap();
        assert_eq!(kind_of(inner), "CallExpression");
        assert_eq!(kind_of(inner.child(1).unwrap()), "Identifier");
        assert_eq!(kind_of(inner.child(2).unwrap()), "CallExpression");
    }

    #[test]
    fn parses_function_with_params_and_nested_function() {
        let text = "function outer(a, b) { function inner() { return a; } }";
        let tree = parse_text(text);
        let outer = tree.root().child(0).unwrap();
        assert_eq!(kind_of(outer), "FunctionDeclaration");
        // name, two params, body
        assert_eq!(outer.child_count(), 4);
        let body = outer.child(3).unwrap();
        assert_eq!(kind_of(body.child(0).unwrap()), "FunctionDeclaration");
    }

    #[test]
    fn parses_if_else_and_while() {
        let text = "if (x > 1) { y = 1; } else { while (x) { x--; } }";
        let tree = parse_text(text);
        let if_stmt = tree.root().child(0).unwrap();
        assert_eq!(if_stmt.child_count(), 3);
        let alt = if_stmt.child(2).unwrap();
        let while_stmt = alt.child(0).unwrap();
        assert_eq!(kind_of(while_stmt), "WhileStatement");
        let update = while_stmt
            .child(1)
            .unwrap()
            .child(0)
            .unwrap()
            .child(0)
            .unwrap();
        assert_eq!(kind_of(update), "UpdateExpression");
        assert_eq!(update.attr(), Some("--"));
    }

    #[test]
    fn missing_semicolon_is_rejected() {
        let tokens = tokenize("let x = 1").unwrap();
        let err = parse("let x = 1", &tokens).unwrap_err();
        assert!(err.message.contains("';'"));
    }

    #[test]
    fn parenthesized_expressions_are_transparent() {
        let tree = parse_text("(a) + b;");
        let expr = tree.root().child(0).unwrap().child(0).unwrap();
        assert_eq!(expr.attr(), Some("+"));
        assert_eq!(kind_of(expr.child(0).unwrap()), "Identifier");
    }

    #[test]
    fn every_parse_satisfies_tree_invariants() {
        // validate() runs inside parse_text for each of these.
        for text in [
            "let x = 1; const y = x + 2; var z;",
            "function f(a) { if (a == null) { return; } throw a; }",
            "try { f(); } catch (e) { } finally { g(); }",
            "debugger; x = -y * (z + 1);",
            "while (true) { break; }",
            ";",
            "",
        ] {
            parse_text(text);
        }
    }
}
