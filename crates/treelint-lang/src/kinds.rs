//! Node kinds produced by the script-language parser.

use treelint_core::NodeKind;

/// Root of every file.
pub const PROGRAM: NodeKind = NodeKind("Program");

/// `let`/`const`/`var` declaration; the attribute carries the keyword.
pub const VARIABLE_DECLARATION: NodeKind = NodeKind("VariableDeclaration");
/// One `name = init` binding inside a declaration.
pub const VARIABLE_DECLARATOR: NodeKind = NodeKind("VariableDeclarator");
/// `function name(params) { ... }`.
pub const FUNCTION_DECLARATION: NodeKind = NodeKind("FunctionDeclaration");

/// `{ ... }`.
pub const BLOCK_STATEMENT: NodeKind = NodeKind("BlockStatement");
/// `if (cond) then [else alt]`.
pub const IF_STATEMENT: NodeKind = NodeKind("IfStatement");
/// `while (cond) body`.
pub const WHILE_STATEMENT: NodeKind = NodeKind("WhileStatement");
/// `return [expr];`.
pub const RETURN_STATEMENT: NodeKind = NodeKind("ReturnStatement");
/// `break;`.
pub const BREAK_STATEMENT: NodeKind = NodeKind("BreakStatement");
/// `continue;`.
pub const CONTINUE_STATEMENT: NodeKind = NodeKind("ContinueStatement");
/// `throw expr;`.
pub const THROW_STATEMENT: NodeKind = NodeKind("ThrowStatement");
/// `try block [catch] [finally]`.
pub const TRY_STATEMENT: NodeKind = NodeKind("TryStatement");
/// `catch [(param)] block`.
pub const CATCH_CLAUSE: NodeKind = NodeKind("CatchClause");
/// `finally block`. A distinct wrapper node so rules can recognize
/// finalizers structurally.
pub const FINALLY_CLAUSE: NodeKind = NodeKind("FinallyClause");
/// An expression in statement position.
pub const EXPRESSION_STATEMENT: NodeKind = NodeKind("ExpressionStatement");
/// `debugger;`.
pub const DEBUGGER_STATEMENT: NodeKind = NodeKind("DebuggerStatement");
/// A lone `;`.
pub const EMPTY_STATEMENT: NodeKind = NodeKind("EmptyStatement");

/// A name reference or binding.
pub const IDENTIFIER: NodeKind = NodeKind("Identifier");
/// Number literal.
pub const NUMERIC_LITERAL: NodeKind = NodeKind("NumericLiteral");
/// String literal.
pub const STRING_LITERAL: NodeKind = NodeKind("StringLiteral");
/// `true` / `false`.
pub const BOOLEAN_LITERAL: NodeKind = NodeKind("BooleanLiteral");
/// `null`.
pub const NULL_LITERAL: NodeKind = NodeKind("NullLiteral");

/// Two-operand expression; the attribute carries the operator.
pub const BINARY_EXPRESSION: NodeKind = NodeKind("BinaryExpression");
/// `!x` / `-x`; the attribute carries the operator.
pub const UNARY_EXPRESSION: NodeKind = NodeKind("UnaryExpression");
/// `target op value`; the attribute carries `=`, `+=` or `-=`.
pub const ASSIGNMENT_EXPRESSION: NodeKind = NodeKind("AssignmentExpression");
/// `x++` / `x--`; the attribute carries the operator.
pub const UPDATE_EXPRESSION: NodeKind = NodeKind("UpdateExpression");
/// `callee(args...)`.
pub const CALL_EXPRESSION: NodeKind = NodeKind("CallExpression");
