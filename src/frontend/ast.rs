//! Abstract syntax tree definitions for Anna
//!
//! One struct per concrete grammar production, collected in the closed
//! [`Node`] enum. Nodes live in the [`SyntaxTree`] arena and address their
//! children by [`NodeId`] and their tokens by [`TokenId`], in left-to-right
//! source order. Abstract grammar categories (expression, statement,
//! embedded statement) are never constructed; only concrete variants exist.
//!
//! Traversal uses the [`SyntaxVisitor`] trait: one method per concrete
//! node kind plus one per concrete token shape. Visitors recurse through
//! children via [`SyntaxTree::accept`], which yields a pre-order walk in
//! exact source order. New consumers require no changes here.

use crate::frontend::lexer::{Token, TokenKind};

// ============================================================================
// Arena handles
// ============================================================================

/// Index of a token in the tree's token sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenId(pub u32);

/// Index of a node in the tree's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

// ============================================================================
// Separated lists
// ============================================================================

/// A comma-separated list that records each element together with its
/// following separator token, for exact source reconstruction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeparatedList {
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub node: NodeId,
    /// The comma after this element, absent on the last one.
    pub separator: Option<TokenId>,
}

impl SeparatedList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: NodeId) {
        self.items.push(ListItem {
            node,
            separator: None,
        });
    }

    /// Attach a separator to the most recently pushed element.
    pub fn push_separator(&mut self, separator: TokenId) {
        if let Some(last) = self.items.last_mut() {
            last.separator = Some(separator);
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ============================================================================
// Node structs, one per concrete production
// ============================================================================

/// Root node: `(import | var_decl | func_def)* end-of-input`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilationUnit {
    pub imports: Vec<NodeId>,
    pub variables: Vec<NodeId>,
    pub functions: Vec<NodeId>,
}

/// `(';' | newline)+` — one or more terminator tokens. May be empty where
/// a closing brace or end of input implicitly ends the statement.
#[derive(Debug, Clone, PartialEq)]
pub struct EndOfStatement {
    pub terminators: Vec<TokenId>,
}

/// `'import' IDENT end_of_stmt`
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDirective {
    pub import_token: TokenId,
    pub name: TokenId,
    pub eos: NodeId,
}

/// `func_header func_body`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    pub header: NodeId,
    pub body: NodeId,
}

/// `'def' FUNCIDENT '(' (param (',' param)*)? ')'`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionHeader {
    pub def_token: TokenId,
    pub name: TokenId,
    pub open_paren: TokenId,
    pub parameters: Option<NodeId>,
    pub close_paren: TokenId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormalParameterList {
    pub parameters: SeparatedList,
}

/// A single `VARIDENT` parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct FormalParameter {
    pub name: TokenId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionBody {
    pub block: NodeId,
}

/// The callee of an invocation: a plain or user function identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionIdentifier {
    pub name: TokenId,
}

/// Left-folded binary operation produced by precedence climbing.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOperation {
    pub left: NodeId,
    pub operator: NodeId,
    pub right: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOperator {
    pub token: TokenId,
}

/// A variable reference.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleName {
    pub name: TokenId,
}

/// One of the four literal token kinds.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub token: TokenId,
}

/// `'(' expr ')'`
#[derive(Debug, Clone, PartialEq)]
pub struct Parenthesized {
    pub open_paren: TokenId,
    pub expression: NodeId,
    pub close_paren: TokenId,
}

/// `func_ident ('(' arg_list? ')' | arg_list)?` — parentheses and the
/// argument list are each optional.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub function: NodeId,
    pub open_paren: Option<TokenId>,
    pub arguments: Option<NodeId>,
    pub close_paren: Option<TokenId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentList {
    pub arguments: SeparatedList,
}

/// `VARIDENT '=' expr`
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: NodeId,
    pub eq_token: TokenId,
    pub value: NodeId,
}

/// `'var' VARIDENT ('=' primary_expr)? end_of_stmt`
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub var_token: TokenId,
    pub name: TokenId,
    pub eq_token: Option<TokenId>,
    pub value: Option<NodeId>,
    pub eos: NodeId,
}

/// `'{' statement* '}'`
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub open_brace: TokenId,
    pub statements: Vec<NodeId>,
    pub close_brace: TokenId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmptyStatement {
    pub eos: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    pub expression: NodeId,
    pub eos: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub if_token: TokenId,
    pub open_paren: TokenId,
    pub condition: NodeId,
    pub close_paren: TokenId,
    pub then_branch: NodeId,
    pub else_token: Option<TokenId>,
    pub else_branch: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub while_token: TokenId,
    pub open_paren: TokenId,
    pub condition: NodeId,
    pub close_paren: TokenId,
    pub body: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    pub return_token: TokenId,
    pub value: Option<NodeId>,
    pub eos: NodeId,
}

/// Closed set of concrete AST node kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    CompilationUnit(CompilationUnit),
    EndOfStatement(EndOfStatement),
    ImportDirective(ImportDirective),
    FunctionDefinition(FunctionDefinition),
    FunctionHeader(FunctionHeader),
    FormalParameterList(FormalParameterList),
    FormalParameter(FormalParameter),
    FunctionBody(FunctionBody),
    FunctionIdentifier(FunctionIdentifier),
    BinaryOperation(BinaryOperation),
    BinaryOperator(BinaryOperator),
    SimpleName(SimpleName),
    Literal(Literal),
    Parenthesized(Parenthesized),
    Invocation(Invocation),
    ArgumentList(ArgumentList),
    Assignment(Assignment),
    VariableDeclaration(VariableDeclaration),
    Block(Block),
    EmptyStatement(EmptyStatement),
    ExpressionStatement(ExpressionStatement),
    IfStatement(IfStatement),
    WhileStatement(WhileStatement),
    ReturnStatement(ReturnStatement),
}

// ============================================================================
// Syntax tree arena
// ============================================================================

/// The parsed tree for one compilation unit.
///
/// Owns the token sequence and the node arena; nodes address children by
/// index and never hold back-references. The whole tree is dropped as one
/// unit.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree {
    /// Display name of the unit (for diagnostics and symbol export).
    pub unit_name: String,
    tokens: Vec<Token>,
    nodes: Vec<Node>,
    root: NodeId,
}

impl SyntaxTree {
    pub(crate) fn new(unit_name: String, tokens: Vec<Token>, nodes: Vec<Node>, root: NodeId) -> Self {
        Self {
            unit_name,
            tokens,
            nodes,
            root,
        }
    }

    /// The compilation-unit root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    pub fn token(&self, id: TokenId) -> &Token {
        &self.tokens[id.0 as usize]
    }

    /// The full materialized token sequence, `End` token included.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Dispatch a node to the matching visitor operation.
    pub fn accept<V: SyntaxVisitor + ?Sized>(&self, id: NodeId, visitor: &mut V) {
        match self.node(id) {
            Node::CompilationUnit(node) => visitor.visit_compilation_unit(self, node),
            Node::EndOfStatement(node) => visitor.visit_end_of_statement(self, node),
            Node::ImportDirective(node) => visitor.visit_import_directive(self, node),
            Node::FunctionDefinition(node) => visitor.visit_function_definition(self, node),
            Node::FunctionHeader(node) => visitor.visit_function_header(self, node),
            Node::FormalParameterList(node) => visitor.visit_formal_parameter_list(self, node),
            Node::FormalParameter(node) => visitor.visit_formal_parameter(self, node),
            Node::FunctionBody(node) => visitor.visit_function_body(self, node),
            Node::FunctionIdentifier(node) => visitor.visit_function_identifier(self, node),
            Node::BinaryOperation(node) => visitor.visit_binary_operation(self, node),
            Node::BinaryOperator(node) => visitor.visit_binary_operator(self, node),
            Node::SimpleName(node) => visitor.visit_simple_name(self, node),
            Node::Literal(node) => visitor.visit_literal(self, node),
            Node::Parenthesized(node) => visitor.visit_parenthesized(self, node),
            Node::Invocation(node) => visitor.visit_invocation(self, node),
            Node::ArgumentList(node) => visitor.visit_argument_list(self, node),
            Node::Assignment(node) => visitor.visit_assignment(self, node),
            Node::VariableDeclaration(node) => visitor.visit_variable_declaration(self, node),
            Node::Block(node) => visitor.visit_block(self, node),
            Node::EmptyStatement(node) => visitor.visit_empty_statement(self, node),
            Node::ExpressionStatement(node) => visitor.visit_expression_statement(self, node),
            Node::IfStatement(node) => visitor.visit_if_statement(self, node),
            Node::WhileStatement(node) => visitor.visit_while_statement(self, node),
            Node::ReturnStatement(node) => visitor.visit_return_statement(self, node),
        }
    }

    /// Dispatch a token to the matching visitor operation by shape.
    pub fn accept_token<V: SyntaxVisitor + ?Sized>(&self, id: TokenId, visitor: &mut V) {
        self.token(id).accept(visitor);
    }
}

impl Token {
    /// Dispatch this token to the matching visitor operation.
    pub fn accept<V: SyntaxVisitor + ?Sized>(&self, visitor: &mut V) {
        match self.kind {
            TokenKind::Ident(_) | TokenKind::VarIdent(_) | TokenKind::FuncIdent(_) => {
                visitor.visit_identifier_token(self)
            }
            TokenKind::Str(_) => visitor.visit_string_token(self),
            TokenKind::Integer(_) => visitor.visit_integer_token(self),
            TokenKind::Real(_) => visitor.visit_real_token(self),
            TokenKind::Boolean(_) => visitor.visit_boolean_token(self),
            _ => visitor.visit_token(self),
        }
    }
}

// ============================================================================
// Visitor
// ============================================================================

/// External traversal over the syntax tree.
///
/// Consumers implement one operation per concrete node kind and one per
/// concrete token shape, recursing into children with
/// [`SyntaxTree::accept`] to drive a source-ordered pre-order walk.
pub trait SyntaxVisitor {
    fn visit_compilation_unit(&mut self, tree: &SyntaxTree, node: &CompilationUnit);
    fn visit_end_of_statement(&mut self, tree: &SyntaxTree, node: &EndOfStatement);
    fn visit_import_directive(&mut self, tree: &SyntaxTree, node: &ImportDirective);
    fn visit_function_definition(&mut self, tree: &SyntaxTree, node: &FunctionDefinition);
    fn visit_function_header(&mut self, tree: &SyntaxTree, node: &FunctionHeader);
    fn visit_formal_parameter_list(&mut self, tree: &SyntaxTree, node: &FormalParameterList);
    fn visit_formal_parameter(&mut self, tree: &SyntaxTree, node: &FormalParameter);
    fn visit_function_body(&mut self, tree: &SyntaxTree, node: &FunctionBody);
    fn visit_function_identifier(&mut self, tree: &SyntaxTree, node: &FunctionIdentifier);
    fn visit_binary_operation(&mut self, tree: &SyntaxTree, node: &BinaryOperation);
    fn visit_binary_operator(&mut self, tree: &SyntaxTree, node: &BinaryOperator);
    fn visit_simple_name(&mut self, tree: &SyntaxTree, node: &SimpleName);
    fn visit_literal(&mut self, tree: &SyntaxTree, node: &Literal);
    fn visit_parenthesized(&mut self, tree: &SyntaxTree, node: &Parenthesized);
    fn visit_invocation(&mut self, tree: &SyntaxTree, node: &Invocation);
    fn visit_argument_list(&mut self, tree: &SyntaxTree, node: &ArgumentList);
    fn visit_assignment(&mut self, tree: &SyntaxTree, node: &Assignment);
    fn visit_variable_declaration(&mut self, tree: &SyntaxTree, node: &VariableDeclaration);
    fn visit_block(&mut self, tree: &SyntaxTree, node: &Block);
    fn visit_empty_statement(&mut self, tree: &SyntaxTree, node: &EmptyStatement);
    fn visit_expression_statement(&mut self, tree: &SyntaxTree, node: &ExpressionStatement);
    fn visit_if_statement(&mut self, tree: &SyntaxTree, node: &IfStatement);
    fn visit_while_statement(&mut self, tree: &SyntaxTree, node: &WhileStatement);
    fn visit_return_statement(&mut self, tree: &SyntaxTree, node: &ReturnStatement);

    fn visit_token(&mut self, token: &Token);
    fn visit_identifier_token(&mut self, token: &Token);
    fn visit_string_token(&mut self, token: &Token);
    fn visit_integer_token(&mut self, token: &Token);
    fn visit_real_token(&mut self, token: &Token);
    fn visit_boolean_token(&mut self, token: &Token);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separated_list_pairs_separators() {
        let mut list = SeparatedList::new();
        list.push(NodeId(0));
        list.push_separator(TokenId(1));
        list.push(NodeId(2));
        assert_eq!(list.len(), 2);
        assert_eq!(list.items[0].separator, Some(TokenId(1)));
        assert_eq!(list.items[1].separator, None);
    }

    #[test]
    fn test_token_dispatch_by_shape() {
        struct Probe(&'static str);
        impl SyntaxVisitor for Probe {
            fn visit_compilation_unit(&mut self, _: &SyntaxTree, _: &CompilationUnit) {}
            fn visit_end_of_statement(&mut self, _: &SyntaxTree, _: &EndOfStatement) {}
            fn visit_import_directive(&mut self, _: &SyntaxTree, _: &ImportDirective) {}
            fn visit_function_definition(&mut self, _: &SyntaxTree, _: &FunctionDefinition) {}
            fn visit_function_header(&mut self, _: &SyntaxTree, _: &FunctionHeader) {}
            fn visit_formal_parameter_list(&mut self, _: &SyntaxTree, _: &FormalParameterList) {}
            fn visit_formal_parameter(&mut self, _: &SyntaxTree, _: &FormalParameter) {}
            fn visit_function_body(&mut self, _: &SyntaxTree, _: &FunctionBody) {}
            fn visit_function_identifier(&mut self, _: &SyntaxTree, _: &FunctionIdentifier) {}
            fn visit_binary_operation(&mut self, _: &SyntaxTree, _: &BinaryOperation) {}
            fn visit_binary_operator(&mut self, _: &SyntaxTree, _: &BinaryOperator) {}
            fn visit_simple_name(&mut self, _: &SyntaxTree, _: &SimpleName) {}
            fn visit_literal(&mut self, _: &SyntaxTree, _: &Literal) {}
            fn visit_parenthesized(&mut self, _: &SyntaxTree, _: &Parenthesized) {}
            fn visit_invocation(&mut self, _: &SyntaxTree, _: &Invocation) {}
            fn visit_argument_list(&mut self, _: &SyntaxTree, _: &ArgumentList) {}
            fn visit_assignment(&mut self, _: &SyntaxTree, _: &Assignment) {}
            fn visit_variable_declaration(&mut self, _: &SyntaxTree, _: &VariableDeclaration) {}
            fn visit_block(&mut self, _: &SyntaxTree, _: &Block) {}
            fn visit_empty_statement(&mut self, _: &SyntaxTree, _: &EmptyStatement) {}
            fn visit_expression_statement(&mut self, _: &SyntaxTree, _: &ExpressionStatement) {}
            fn visit_if_statement(&mut self, _: &SyntaxTree, _: &IfStatement) {}
            fn visit_while_statement(&mut self, _: &SyntaxTree, _: &WhileStatement) {}
            fn visit_return_statement(&mut self, _: &SyntaxTree, _: &ReturnStatement) {}
            fn visit_token(&mut self, _: &Token) {
                self.0 = "token";
            }
            fn visit_identifier_token(&mut self, _: &Token) {
                self.0 = "identifier";
            }
            fn visit_string_token(&mut self, _: &Token) {
                self.0 = "string";
            }
            fn visit_integer_token(&mut self, _: &Token) {
                self.0 = "integer";
            }
            fn visit_real_token(&mut self, _: &Token) {
                self.0 = "real";
            }
            fn visit_boolean_token(&mut self, _: &Token) {
                self.0 = "boolean";
            }
        }

        let mut probe = Probe("");
        Token::new(TokenKind::Integer(1), "1", 0, 0).accept(&mut probe);
        assert_eq!(probe.0, "integer");
        Token::new(TokenKind::VarIdent("x".into()), "x", 0, 0).accept(&mut probe);
        assert_eq!(probe.0, "identifier");
        Token::new(TokenKind::Comma, ",", 0, 0).accept(&mut probe);
        assert_eq!(probe.0, "token");
        Token::new(TokenKind::Boolean(true), "true", 0, 0).accept(&mut probe);
        assert_eq!(probe.0, "boolean");
    }
}
