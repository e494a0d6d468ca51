//! Integration tests for the Anna front end
//!
//! Exercises the public surface end to end: parse, diagnostics report,
//! symbol metadata, DOT rendering, and an external traversal consumer
//! defined entirely outside the crate's node definitions.

use anna::ast::{
    ArgumentList, Assignment, BinaryOperation, BinaryOperator, Block, CompilationUnit,
    EmptyStatement, EndOfStatement, ExpressionStatement, FormalParameter, FormalParameterList,
    FunctionBody, FunctionDefinition, FunctionHeader, FunctionIdentifier, IfStatement,
    ImportDirective, Invocation, Literal, Node, Parenthesized, ReturnStatement, SimpleName,
    SyntaxTree, SyntaxVisitor, VariableDeclaration, WhileStatement,
};
use anna::diagnostics::render_report;
use anna::lexer::{lex, Token, TokenKind};
use anna::parser::parse;
use anna::symbols::UnitSymbols;

fn parse_ok(source: &str) -> SyntaxTree {
    let (tree, diagnostics) = parse(source, "sample.anna");
    assert!(
        diagnostics.is_empty(),
        "expected clean parse, got: {diagnostics:?}"
    );
    tree.expect("expected a tree")
}

// ============================================================================
// An external traversal consumer
// ============================================================================

/// Collects the text of every token the pre-order walk touches. Lives
/// entirely outside the node definitions: adding it required no change to
/// the AST.
#[derive(Default)]
struct TokenCollector {
    texts: Vec<String>,
}

impl TokenCollector {
    fn token(&mut self, tree: &SyntaxTree, id: anna::ast::TokenId) {
        self.texts.push(tree.token(id).text.clone());
    }
}

impl SyntaxVisitor for TokenCollector {
    fn visit_compilation_unit(&mut self, tree: &SyntaxTree, node: &CompilationUnit) {
        for &import in &node.imports {
            tree.accept(import, self);
        }
        for &variable in &node.variables {
            tree.accept(variable, self);
        }
        for &function in &node.functions {
            tree.accept(function, self);
        }
    }

    fn visit_end_of_statement(&mut self, tree: &SyntaxTree, node: &EndOfStatement) {
        for &terminator in &node.terminators {
            self.token(tree, terminator);
        }
    }

    fn visit_import_directive(&mut self, tree: &SyntaxTree, node: &ImportDirective) {
        self.token(tree, node.import_token);
        self.token(tree, node.name);
        tree.accept(node.eos, self);
    }

    fn visit_function_definition(&mut self, tree: &SyntaxTree, node: &FunctionDefinition) {
        tree.accept(node.header, self);
        tree.accept(node.body, self);
    }

    fn visit_function_header(&mut self, tree: &SyntaxTree, node: &FunctionHeader) {
        self.token(tree, node.def_token);
        self.token(tree, node.name);
        self.token(tree, node.open_paren);
        if let Some(parameters) = node.parameters {
            tree.accept(parameters, self);
        }
        self.token(tree, node.close_paren);
    }

    fn visit_formal_parameter_list(&mut self, tree: &SyntaxTree, node: &FormalParameterList) {
        for item in &node.parameters.items {
            tree.accept(item.node, self);
            if let Some(separator) = item.separator {
                self.token(tree, separator);
            }
        }
    }

    fn visit_formal_parameter(&mut self, tree: &SyntaxTree, node: &FormalParameter) {
        self.token(tree, node.name);
    }

    fn visit_function_body(&mut self, tree: &SyntaxTree, node: &FunctionBody) {
        tree.accept(node.block, self);
    }

    fn visit_function_identifier(&mut self, tree: &SyntaxTree, node: &FunctionIdentifier) {
        self.token(tree, node.name);
    }

    fn visit_binary_operation(&mut self, tree: &SyntaxTree, node: &BinaryOperation) {
        tree.accept(node.left, self);
        tree.accept(node.operator, self);
        tree.accept(node.right, self);
    }

    fn visit_binary_operator(&mut self, tree: &SyntaxTree, node: &BinaryOperator) {
        self.token(tree, node.token);
    }

    fn visit_simple_name(&mut self, tree: &SyntaxTree, node: &SimpleName) {
        self.token(tree, node.name);
    }

    fn visit_literal(&mut self, tree: &SyntaxTree, node: &Literal) {
        self.token(tree, node.token);
    }

    fn visit_parenthesized(&mut self, tree: &SyntaxTree, node: &Parenthesized) {
        self.token(tree, node.open_paren);
        tree.accept(node.expression, self);
        self.token(tree, node.close_paren);
    }

    fn visit_invocation(&mut self, tree: &SyntaxTree, node: &Invocation) {
        tree.accept(node.function, self);
        if let Some(open_paren) = node.open_paren {
            self.token(tree, open_paren);
        }
        if let Some(arguments) = node.arguments {
            tree.accept(arguments, self);
        }
        if let Some(close_paren) = node.close_paren {
            self.token(tree, close_paren);
        }
    }

    fn visit_argument_list(&mut self, tree: &SyntaxTree, node: &ArgumentList) {
        for item in &node.arguments.items {
            tree.accept(item.node, self);
            if let Some(separator) = item.separator {
                self.token(tree, separator);
            }
        }
    }

    fn visit_assignment(&mut self, tree: &SyntaxTree, node: &Assignment) {
        tree.accept(node.target, self);
        self.token(tree, node.eq_token);
        tree.accept(node.value, self);
    }

    fn visit_variable_declaration(&mut self, tree: &SyntaxTree, node: &VariableDeclaration) {
        self.token(tree, node.var_token);
        self.token(tree, node.name);
        if let Some(eq_token) = node.eq_token {
            self.token(tree, eq_token);
        }
        if let Some(value) = node.value {
            tree.accept(value, self);
        }
        tree.accept(node.eos, self);
    }

    fn visit_block(&mut self, tree: &SyntaxTree, node: &Block) {
        self.token(tree, node.open_brace);
        for &statement in &node.statements {
            tree.accept(statement, self);
        }
        self.token(tree, node.close_brace);
    }

    fn visit_empty_statement(&mut self, tree: &SyntaxTree, node: &EmptyStatement) {
        tree.accept(node.eos, self);
    }

    fn visit_expression_statement(&mut self, tree: &SyntaxTree, node: &ExpressionStatement) {
        tree.accept(node.expression, self);
        tree.accept(node.eos, self);
    }

    fn visit_if_statement(&mut self, tree: &SyntaxTree, node: &IfStatement) {
        self.token(tree, node.if_token);
        self.token(tree, node.open_paren);
        tree.accept(node.condition, self);
        self.token(tree, node.close_paren);
        tree.accept(node.then_branch, self);
        if let Some(else_token) = node.else_token {
            self.token(tree, else_token);
        }
        if let Some(else_branch) = node.else_branch {
            tree.accept(else_branch, self);
        }
    }

    fn visit_while_statement(&mut self, tree: &SyntaxTree, node: &WhileStatement) {
        self.token(tree, node.while_token);
        self.token(tree, node.open_paren);
        tree.accept(node.condition, self);
        self.token(tree, node.close_paren);
        tree.accept(node.body, self);
    }

    fn visit_return_statement(&mut self, tree: &SyntaxTree, node: &ReturnStatement) {
        self.token(tree, node.return_token);
        if let Some(value) = node.value {
            tree.accept(value, self);
        }
        tree.accept(node.eos, self);
    }

    fn visit_token(&mut self, _: &Token) {}
    fn visit_identifier_token(&mut self, _: &Token) {}
    fn visit_string_token(&mut self, _: &Token) {}
    fn visit_integer_token(&mut self, _: &Token) {}
    fn visit_real_token(&mut self, _: &Token) {}
    fn visit_boolean_token(&mut self, _: &Token) {}
}

#[test]
fn pre_order_walk_reproduces_the_input_token_sequence() {
    // No newlines, so every input token is significant and must reappear
    let source = "import Std;var x = 5;def @g(a,b){ return a + b; }";
    let tree = parse_ok(source);

    let mut collector = TokenCollector::default();
    tree.accept(tree.root(), &mut collector);

    let lexed: Vec<String> = lex(source)
        .unwrap()
        .iter()
        .filter(|token| token.kind != TokenKind::End)
        .map(|token| token.text.clone())
        .collect();
    assert_eq!(collector.texts, lexed);
}

#[test]
fn walk_order_is_stable_across_parses() {
    let source = "var x = 1\ndef @f(a) { if (a > 1) { return a } else { return 1 } }";
    let first = parse_ok(source);
    let second = parse_ok(source);

    let mut walk_first = TokenCollector::default();
    first.accept(first.root(), &mut walk_first);
    let mut walk_second = TokenCollector::default();
    second.accept(second.root(), &mut walk_second);

    assert_eq!(walk_first.texts, walk_second.texts);
    assert_eq!(first, second);
}

// ============================================================================
// Diagnostics
// ============================================================================

#[test]
fn report_for_missing_variable_identifier() {
    let source = "var = 5;";
    let (tree, diagnostics) = parse(source, "sample.anna");
    assert!(tree.is_none());
    insta::assert_snapshot!(render_report("sample.anna", source, &diagnostics), @r###"
    sample.anna:1:5: error: invalid token '=', expected variable identifier
    var = 5;
        ^
    "###);
}

#[test]
fn report_for_lexical_error() {
    let source = "var price = 3$\n";
    let (tree, diagnostics) = parse(source, "shop.anna");
    assert!(tree.is_none());
    insta::assert_snapshot!(render_report("shop.anna", source, &diagnostics), @r###"
    shop.anna:1:14: error: unrecognized token '$'
    var price = 3$
                 ^
    "###);
}

#[test]
fn caret_span_matches_token_width() {
    let source = "def @f() { return }\nwhile";
    let (tree, diagnostics) = parse(source, "sample.anna");
    assert!(tree.is_none());
    // `while` cannot start a declaration; the caret spans all five chars
    insta::assert_snapshot!(render_report("sample.anna", source, &diagnostics), @r###"
    sample.anna:2:1: error: invalid token 'while', expected declaration or end of input
    while
    ^^^^^
    "###);
}

// ============================================================================
// Symbol metadata
// ============================================================================

#[test]
fn symbol_artifact_for_a_unit() {
    let tree = parse_ok("var total\nvar rate = 5\ndef @apply(a,b) { return a * b }\n");
    let symbols = UnitSymbols::collect(&tree);
    assert_eq!(
        symbols.export(),
        "Anna Metadata / 1.0\nsample.anna\nGtotal\nGrate\nFapply\u{0}2\nEXTENDED\n"
    );

    let imported = UnitSymbols::import(&symbols.export()).unwrap();
    assert_eq!(imported, symbols);
}

// ============================================================================
// Tree plotting
// ============================================================================

#[test]
fn dot_output_for_a_declaration() {
    let tree = parse_ok("var x;");
    insta::assert_snapshot!(anna::plot::render(&tree), @r###"
    digraph ast {
      n0 [label="compilation unit" shape=box style=filled fillcolor=yellow];
      n1 [label="variable declaration statement" shape=box style=filled fillcolor=yellow];
      n2 [label="token\nvar" shape=diamond style=filled fillcolor=lightgreen];
      n3 [label="identifier\nx" shape=diamond style=filled fillcolor=lightgreen];
      n4 [label="end of statement" shape=box style=filled fillcolor=yellow];
      n5 [label="token\n;" shape=diamond style=filled fillcolor=lightgreen];
      n0 -> n1;
      n1 -> n2;
      n1 -> n3;
      n1 -> n4;
      n4 -> n5;
    }
    "###);
}

// ============================================================================
// End-of-statement flexibility
// ============================================================================

#[test]
fn semicolon_and_newline_are_interchangeable() {
    let with_semicolons = parse_ok("import Std;var x;def @f() { return; }");
    let with_newlines = parse_ok("import Std\nvar x\ndef @f() { return\n}");

    let unit_a = match with_semicolons.node(with_semicolons.root()) {
        Node::CompilationUnit(unit) => unit,
        _ => unreachable!(),
    };
    let unit_b = match with_newlines.node(with_newlines.root()) {
        Node::CompilationUnit(unit) => unit,
        _ => unreachable!(),
    };
    assert_eq!(unit_a.imports.len(), unit_b.imports.len());
    assert_eq!(unit_a.variables.len(), unit_b.variables.len());
    assert_eq!(unit_a.functions.len(), unit_b.functions.len());
}

#[test]
fn comments_survive_into_the_tree() {
    let tree = parse_ok("var limit = 10 // inclusive upper bound\n");
    let limit_token = tree
        .tokens()
        .iter()
        .find(|token| token.text == "10")
        .expect("literal token");
    assert_eq!(
        limit_token.trailing_comments,
        vec!["inclusive upper bound".to_string()]
    );
}
