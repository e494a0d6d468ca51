//! Graphviz rendering of the syntax tree
//!
//! A traversal that emits a directed-graph description for visualization
//! tooling: one box per construct, one diamond leaf per token, one note
//! per trailing comment, edges in parse order.

use std::fmt::Write;

use crate::frontend::ast::{
    ArgumentList, Assignment, BinaryOperation, BinaryOperator, Block, CompilationUnit,
    EmptyStatement, EndOfStatement, ExpressionStatement, FormalParameter, FormalParameterList,
    FunctionBody, FunctionDefinition, FunctionHeader, FunctionIdentifier, IfStatement,
    ImportDirective, Invocation, Literal, Parenthesized, ReturnStatement, SimpleName, SyntaxTree,
    SyntaxVisitor, TokenId, VariableDeclaration, WhileStatement,
};
use crate::frontend::lexer::Token;

/// Render a parsed unit as a Graphviz `digraph`.
pub fn render(tree: &SyntaxTree) -> String {
    let mut plotter = AstPlotter::new();
    tree.accept(tree.root(), &mut plotter);
    plotter.to_dot()
}

/// Visitor that builds the graph while walking the tree in source order.
pub struct AstPlotter {
    /// Rendered attribute string per vertex, indexed by vertex id.
    vertices: Vec<String>,
    edges: Vec<(usize, usize)>,
    /// Ancestors of the construct currently being entered.
    stack: Vec<usize>,
}

impl AstPlotter {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
            stack: Vec::new(),
        }
    }

    fn add_vertex(&mut self, attributes: String) -> usize {
        let id = self.vertices.len();
        self.vertices.push(attributes);
        if let Some(&parent) = self.stack.last() {
            self.edges.push((parent, id));
        }
        id
    }

    fn enter_construct(&mut self, label: &str) {
        let id = self.add_vertex(format!(
            "[label=\"{label}\" shape=box style=filled fillcolor=yellow]"
        ));
        self.stack.push(id);
    }

    fn exit_construct(&mut self) {
        self.stack.pop();
    }

    /// Diamond leaf for a token, with a note per trailing comment.
    fn token_leaf(&mut self, name: &str, token: &Token) {
        let text = if token.text == "\n" {
            "\\n".to_string()
        } else {
            escape(&token.text)
        };
        let id = self.add_vertex(format!(
            "[label=\"{name}\\n{text}\" shape=diamond style=filled fillcolor=lightgreen]"
        ));
        for comment in &token.trailing_comments {
            let comment_id = self.vertices.len();
            self.vertices.push(format!(
                "[label=\"comment\\n{}\" shape=note style=filled fillcolor=skyblue1]",
                escape(comment)
            ));
            self.edges.push((id, comment_id));
        }
    }

    fn token(&mut self, tree: &SyntaxTree, id: TokenId) {
        tree.token(id).accept(self);
    }

    fn to_dot(&self) -> String {
        let mut out = String::from("digraph ast {\n");
        for (id, attributes) in self.vertices.iter().enumerate() {
            let _ = writeln!(out, "  n{id} {attributes};");
        }
        for (from, to) in &self.edges {
            let _ = writeln!(out, "  n{from} -> n{to};");
        }
        out.push_str("}\n");
        out
    }
}

impl Default for AstPlotter {
    fn default() -> Self {
        Self::new()
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

impl SyntaxVisitor for AstPlotter {
    fn visit_compilation_unit(&mut self, tree: &SyntaxTree, node: &CompilationUnit) {
        self.enter_construct("compilation unit");
        for &import in &node.imports {
            tree.accept(import, self);
        }
        for &variable in &node.variables {
            tree.accept(variable, self);
        }
        for &function in &node.functions {
            tree.accept(function, self);
        }
        self.exit_construct();
    }

    fn visit_end_of_statement(&mut self, tree: &SyntaxTree, node: &EndOfStatement) {
        self.enter_construct("end of statement");
        for &terminator in &node.terminators {
            self.token(tree, terminator);
        }
        self.exit_construct();
    }

    fn visit_import_directive(&mut self, tree: &SyntaxTree, node: &ImportDirective) {
        self.enter_construct("import directive");
        self.token(tree, node.import_token);
        self.token(tree, node.name);
        tree.accept(node.eos, self);
        self.exit_construct();
    }

    fn visit_function_definition(&mut self, tree: &SyntaxTree, node: &FunctionDefinition) {
        self.enter_construct("function definition");
        tree.accept(node.header, self);
        tree.accept(node.body, self);
        self.exit_construct();
    }

    fn visit_function_header(&mut self, tree: &SyntaxTree, node: &FunctionHeader) {
        self.enter_construct("function header");
        self.token(tree, node.def_token);
        self.token(tree, node.name);
        self.token(tree, node.open_paren);
        if let Some(parameters) = node.parameters {
            tree.accept(parameters, self);
        }
        self.token(tree, node.close_paren);
        self.exit_construct();
    }

    fn visit_formal_parameter_list(&mut self, tree: &SyntaxTree, node: &FormalParameterList) {
        self.enter_construct("formal parameter list");
        for item in &node.parameters.items {
            tree.accept(item.node, self);
            if let Some(separator) = item.separator {
                self.token(tree, separator);
            }
        }
        self.exit_construct();
    }

    fn visit_formal_parameter(&mut self, tree: &SyntaxTree, node: &FormalParameter) {
        self.enter_construct("formal parameter");
        self.token(tree, node.name);
        self.exit_construct();
    }

    fn visit_function_body(&mut self, tree: &SyntaxTree, node: &FunctionBody) {
        self.enter_construct("function body");
        tree.accept(node.block, self);
        self.exit_construct();
    }

    fn visit_function_identifier(&mut self, tree: &SyntaxTree, node: &FunctionIdentifier) {
        self.enter_construct("function identifier");
        self.token(tree, node.name);
        self.exit_construct();
    }

    fn visit_binary_operation(&mut self, tree: &SyntaxTree, node: &BinaryOperation) {
        self.enter_construct("binary operation expression");
        tree.accept(node.left, self);
        tree.accept(node.operator, self);
        tree.accept(node.right, self);
        self.exit_construct();
    }

    fn visit_binary_operator(&mut self, tree: &SyntaxTree, node: &BinaryOperator) {
        self.enter_construct("binary operator");
        self.token(tree, node.token);
        self.exit_construct();
    }

    fn visit_simple_name(&mut self, tree: &SyntaxTree, node: &SimpleName) {
        self.enter_construct("simple name");
        self.token(tree, node.name);
        self.exit_construct();
    }

    fn visit_literal(&mut self, tree: &SyntaxTree, node: &Literal) {
        self.enter_construct("literal");
        self.token(tree, node.token);
        self.exit_construct();
    }

    fn visit_parenthesized(&mut self, tree: &SyntaxTree, node: &Parenthesized) {
        self.enter_construct("parenthesized expression");
        self.token(tree, node.open_paren);
        tree.accept(node.expression, self);
        self.token(tree, node.close_paren);
        self.exit_construct();
    }

    fn visit_invocation(&mut self, tree: &SyntaxTree, node: &Invocation) {
        self.enter_construct("invocation expression");
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
        self.exit_construct();
    }

    fn visit_argument_list(&mut self, tree: &SyntaxTree, node: &ArgumentList) {
        self.enter_construct("argument list");
        for item in &node.arguments.items {
            tree.accept(item.node, self);
            if let Some(separator) = item.separator {
                self.token(tree, separator);
            }
        }
        self.exit_construct();
    }

    fn visit_assignment(&mut self, tree: &SyntaxTree, node: &Assignment) {
        self.enter_construct("assignment");
        tree.accept(node.target, self);
        self.token(tree, node.eq_token);
        tree.accept(node.value, self);
        self.exit_construct();
    }

    fn visit_variable_declaration(&mut self, tree: &SyntaxTree, node: &VariableDeclaration) {
        self.enter_construct("variable declaration statement");
        self.token(tree, node.var_token);
        self.token(tree, node.name);
        if let Some(eq_token) = node.eq_token {
            self.token(tree, eq_token);
        }
        if let Some(value) = node.value {
            tree.accept(value, self);
        }
        tree.accept(node.eos, self);
        self.exit_construct();
    }

    fn visit_block(&mut self, tree: &SyntaxTree, node: &Block) {
        self.enter_construct("block");
        self.token(tree, node.open_brace);
        for &statement in &node.statements {
            tree.accept(statement, self);
        }
        self.token(tree, node.close_brace);
        self.exit_construct();
    }

    fn visit_empty_statement(&mut self, tree: &SyntaxTree, node: &EmptyStatement) {
        self.enter_construct("empty statement");
        tree.accept(node.eos, self);
        self.exit_construct();
    }

    fn visit_expression_statement(&mut self, tree: &SyntaxTree, node: &ExpressionStatement) {
        self.enter_construct("expression statement");
        tree.accept(node.expression, self);
        tree.accept(node.eos, self);
        self.exit_construct();
    }

    fn visit_if_statement(&mut self, tree: &SyntaxTree, node: &IfStatement) {
        self.enter_construct("if statement");
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
        self.exit_construct();
    }

    fn visit_while_statement(&mut self, tree: &SyntaxTree, node: &WhileStatement) {
        self.enter_construct("while statement");
        self.token(tree, node.while_token);
        self.token(tree, node.open_paren);
        tree.accept(node.condition, self);
        self.token(tree, node.close_paren);
        tree.accept(node.body, self);
        self.exit_construct();
    }

    fn visit_return_statement(&mut self, tree: &SyntaxTree, node: &ReturnStatement) {
        self.enter_construct("return statement");
        self.token(tree, node.return_token);
        if let Some(value) = node.value {
            tree.accept(value, self);
        }
        tree.accept(node.eos, self);
        self.exit_construct();
    }

    fn visit_token(&mut self, token: &Token) {
        self.token_leaf("token", token);
    }

    fn visit_identifier_token(&mut self, token: &Token) {
        self.token_leaf("identifier", token);
    }

    fn visit_string_token(&mut self, token: &Token) {
        self.token_leaf("string literal", token);
    }

    fn visit_integer_token(&mut self, token: &Token) {
        self.token_leaf("integer literal", token);
    }

    fn visit_real_token(&mut self, token: &Token) {
        self.token_leaf("real literal", token);
    }

    fn visit_boolean_token(&mut self, token: &Token) {
        self.token_leaf("boolean literal", token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::parser::parse;

    fn plot(source: &str) -> String {
        let (tree, diagnostics) = parse(source, "plot.anna");
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        render(&tree.expect("tree"))
    }

    #[test]
    fn test_digraph_framing() {
        let dot = plot("var x;");
        assert!(dot.starts_with("digraph ast {\n"));
        assert!(dot.ends_with("}\n"));
        assert!(dot.contains("n0 [label=\"compilation unit\" shape=box"));
    }

    #[test]
    fn test_tokens_become_diamond_leaves() {
        let dot = plot("var x;");
        assert!(dot.contains("[label=\"token\\nvar\" shape=diamond"));
        assert!(dot.contains("[label=\"identifier\\nx\" shape=diamond"));
        assert!(dot.contains("[label=\"token\\n;\" shape=diamond"));
    }

    #[test]
    fn test_newline_terminator_is_escaped() {
        let dot = plot("var x\n");
        assert!(dot.contains("[label=\"token\\n\\n\" shape=diamond"));
    }

    #[test]
    fn test_comments_become_notes() {
        let dot = plot("var x // counter\n");
        assert!(dot.contains("[label=\"comment\\ncounter\" shape=note"));
    }

    #[test]
    fn test_edges_follow_parse_order() {
        let dot = plot("var x;");
        // compilation unit -> variable declaration -> `var` token
        assert!(dot.contains("n0 -> n1;"));
        assert!(dot.contains("n1 -> n2;"));
    }

    #[test]
    fn test_string_quotes_escaped() {
        let dot = plot("var s = \"hi\"\n");
        assert!(dot.contains("[label=\"string literal\\n\\\"hi\\\"\" shape=diamond"));
    }
}
