//! Parser for the Anna language
//!
//! A backtracking recursive-descent parser over the materialized token
//! sequence. Every nonterminal is a speculative `try_*` rule: it opens a
//! checkpoint, attempts its production, and either commits (keeping cursor,
//! nodes, and diagnostics) or rolls back to exactly the pre-attempt state.
//! Alternation picks the first alternative that fully succeeds, in a fixed
//! priority order; binary expressions use precedence climbing.
//!
//! Diagnostics are scoped to checkpoints: a committed attempt merges its
//! buffer into the parent, a rolled-back attempt discards it. The engine
//! separately retains the mismatch diagnostics recorded at the farthest
//! token position, which become the report when the overall parse fails;
//! a successful parse reports nothing.

use std::mem::discriminant;

use crate::frontend::ast::{
    ArgumentList, Assignment, BinaryOperation, BinaryOperator, Block, CompilationUnit,
    EmptyStatement, EndOfStatement, ExpressionStatement, FormalParameter, FormalParameterList,
    FunctionBody, FunctionDefinition, FunctionHeader, FunctionIdentifier, IfStatement,
    ImportDirective, Invocation, Literal, Node, NodeId, Parenthesized, ReturnStatement,
    SeparatedList, SimpleName, SyntaxTree, TokenId, VariableDeclaration, WhileStatement,
};
use crate::frontend::diagnostics::Diagnostic;
use crate::frontend::lexer::{self, Token, TokenKind};

/// Parse a whole compilation unit.
///
/// Returns the tree only if the grammar consumed the entire input; the
/// diagnostics are empty exactly when a tree is returned.
#[tracing::instrument(skip_all, fields(unit = display_name, source_len = source.len()))]
pub fn parse(source: &str, display_name: &str) -> (Option<SyntaxTree>, Vec<Diagnostic>) {
    let tokens = match lexer::lex(source) {
        Ok(tokens) => tokens,
        Err(diagnostics) => return (None, diagnostics),
    };
    Parser::new(tokens).run(display_name)
}

/// Saved cursor state for one speculative attempt.
struct Checkpoint {
    pos: usize,
    diag_mark: usize,
    node_mark: usize,
}

/// Parser state: the token sequence, the cursor index, the node arena under
/// construction, and the checkpoint stack.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    nodes: Vec<Node>,
    checkpoints: Vec<Checkpoint>,
    /// Diagnostics of the currently open attempts, flattened; checkpoint
    /// marks delimit each attempt's slice.
    diagnostics: Vec<Diagnostic>,
    /// Mismatches recorded at the farthest token position so far.
    farthest: Vec<Diagnostic>,
    farthest_pos: usize,
}

impl Parser {
    /// The token sequence must be terminated by an `End` token (the lexer
    /// guarantees this).
    pub fn new(tokens: Vec<Token>) -> Self {
        debug_assert!(matches!(
            tokens.last().map(|t| &t.kind),
            Some(&TokenKind::End)
        ));
        Self {
            tokens,
            pos: 0,
            nodes: Vec::new(),
            checkpoints: Vec::new(),
            diagnostics: Vec::new(),
            farthest: Vec::new(),
            farthest_pos: 0,
        }
    }

    /// Drive the compilation-unit rule and package the result.
    pub fn run(mut self, display_name: &str) -> (Option<SyntaxTree>, Vec<Diagnostic>) {
        match self.try_compilation_unit() {
            Some(root) => {
                let tree = SyntaxTree::new(display_name.to_string(), self.tokens, self.nodes, root);
                (Some(tree), self.diagnostics)
            }
            None => (None, self.farthest),
        }
    }

    // ========================================================================
    // Checkpoints
    // ========================================================================

    fn push_checkpoint(&mut self) {
        self.checkpoints.push(Checkpoint {
            pos: self.pos,
            diag_mark: self.diagnostics.len(),
            node_mark: self.nodes.len(),
        });
    }

    /// Keep everything the attempt produced; its diagnostics now belong to
    /// the parent attempt.
    fn commit(&mut self) {
        self.checkpoints.pop();
    }

    /// Restore the cursor and discard the nodes and diagnostics produced
    /// since the checkpoint.
    fn rollback(&mut self) {
        if let Some(checkpoint) = self.checkpoints.pop() {
            self.pos = checkpoint.pos;
            self.diagnostics.truncate(checkpoint.diag_mark);
            self.nodes.truncate(checkpoint.node_mark);
        }
    }

    /// Run one speculative attempt with symmetric checkpoint handling.
    fn attempt<T>(&mut self, rule: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        self.push_checkpoint();
        match rule(self) {
            Some(value) => {
                self.commit();
                Some(value)
            }
            None => {
                self.rollback();
                None
            }
        }
    }

    // ========================================================================
    // Cursor
    // ========================================================================

    /// Index of the `ahead`-th token from the cursor, skipping
    /// newline-spelled terminators (`;` terminators are not skipped).
    fn skip_index(&self, ahead: usize) -> usize {
        let last = self.tokens.len() - 1;
        let mut remaining = ahead;
        let mut i = self.pos;
        while i < last {
            if !self.tokens[i].is_newline() {
                if remaining == 0 {
                    return i;
                }
                remaining -= 1;
            }
            i += 1;
        }
        last
    }

    /// Non-destructive lookahead, skipping newline terminators.
    fn peek(&self, ahead: usize) -> &Token {
        &self.tokens[self.skip_index(ahead)]
    }

    /// Non-destructive lookahead including newline terminators.
    fn peek_raw(&self, ahead: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + ahead).min(last)]
    }

    /// Consume the next token, skipping newline terminators.
    fn advance(&mut self) -> TokenId {
        let index = self.skip_index(0);
        self.pos = (index + 1).min(self.tokens.len() - 1);
        TokenId(index as u32)
    }

    /// Consume the next token, newline terminators included.
    fn advance_raw(&mut self) -> TokenId {
        let index = self.pos.min(self.tokens.len() - 1);
        self.pos = (index + 1).min(self.tokens.len() - 1);
        TokenId(index as u32)
    }

    /// Kind check by tag, ignoring payloads.
    fn check(&self, kind: &TokenKind) -> bool {
        discriminant(&self.peek(0).kind) == discriminant(kind)
    }

    /// Destructive exact-kind consumption. On mismatch, records a
    /// diagnostic for the found token and leaves the cursor unmoved.
    fn expect(&mut self, kind: &TokenKind, description: &str) -> Option<TokenId> {
        let index = self.skip_index(0);
        if discriminant(&self.tokens[index].kind) == discriminant(kind) {
            self.pos = (index + 1).min(self.tokens.len() - 1);
            Some(TokenId(index as u32))
        } else {
            self.record_mismatch(index, description);
            None
        }
    }

    /// Like `expect`, but newline terminators are significant.
    fn expect_raw(&mut self, kind: &TokenKind, description: &str) -> Option<TokenId> {
        let index = self.pos.min(self.tokens.len() - 1);
        if discriminant(&self.tokens[index].kind) == discriminant(kind) {
            self.pos = (index + 1).min(self.tokens.len() - 1);
            Some(TokenId(index as u32))
        } else {
            self.record_mismatch(index, description);
            None
        }
    }

    fn record_mismatch(&mut self, index: usize, description: &str) {
        let token = &self.tokens[index];
        let diag = Diagnostic::expected(
            token.row,
            token.col,
            token.text.clone(),
            token.width,
            description,
        );
        if index > self.farthest_pos || self.farthest.is_empty() {
            self.farthest_pos = index;
            self.farthest.clear();
            self.farthest.push(diag.clone());
        } else if index == self.farthest_pos && !self.farthest.contains(&diag) {
            self.farthest.push(diag.clone());
        }
        self.diagnostics.push(diag);
    }

    fn add_node(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId((self.nodes.len() - 1) as u32)
    }

    // ========================================================================
    // Compilation unit and declarations
    // ========================================================================

    /// `compilation_unit := (import | var_decl | func_def)* end-of-input`
    ///
    /// The loop breaks as soon as no alternative matches; reaching exactly
    /// end-of-input is success, anything else fails the whole parse.
    fn try_compilation_unit(&mut self) -> Option<NodeId> {
        self.attempt(|p| {
            let mut imports = Vec::new();
            let mut variables = Vec::new();
            let mut functions = Vec::new();

            loop {
                if p.check(&TokenKind::Import) {
                    match p.try_import_directive() {
                        Some(node) => {
                            imports.push(node);
                            continue;
                        }
                        None => break,
                    }
                }
                if p.check(&TokenKind::Var) {
                    match p.try_variable_declaration() {
                        Some(node) => {
                            variables.push(node);
                            continue;
                        }
                        None => break,
                    }
                }
                if p.check(&TokenKind::Def) {
                    match p.try_function_definition() {
                        Some(node) => {
                            functions.push(node);
                            continue;
                        }
                        None => break,
                    }
                }
                break;
            }

            if !p.check(&TokenKind::End) {
                p.expect(&TokenKind::End, "declaration or end of input");
                return None;
            }

            Some(p.add_node(Node::CompilationUnit(CompilationUnit {
                imports,
                variables,
                functions,
            })))
        })
    }

    /// `import_directive := 'import' IDENT end_of_stmt`
    fn try_import_directive(&mut self) -> Option<NodeId> {
        self.attempt(|p| {
            let import_token = p.expect(&TokenKind::Import, "`import'")?;
            let name = p.expect(&TokenKind::Ident(String::new()), "identifier")?;
            let eos = p.try_end_of_statement(true)?;
            Some(p.add_node(Node::ImportDirective(ImportDirective {
                import_token,
                name,
                eos,
            })))
        })
    }

    /// `var_decl_stmt := 'var' VARIDENT ('=' primary_expr)? end_of_stmt`
    fn try_variable_declaration(&mut self) -> Option<NodeId> {
        self.attempt(|p| {
            let var_token = p.expect(&TokenKind::Var, "`var'")?;
            let name = p.expect(&TokenKind::VarIdent(String::new()), "variable identifier")?;

            let (eq_token, value) = if p.check(&TokenKind::Eq) {
                let eq = p.expect(&TokenKind::Eq, "`='")?;
                let value = p.try_primary_expression()?;
                (Some(eq), Some(value))
            } else {
                (None, None)
            };

            let eos = p.try_end_of_statement(true)?;
            Some(p.add_node(Node::VariableDeclaration(VariableDeclaration {
                var_token,
                name,
                eq_token,
                value,
                eos,
            })))
        })
    }

    /// `func_def := func_header func_body`
    fn try_function_definition(&mut self) -> Option<NodeId> {
        self.attempt(|p| {
            let header = p.try_function_header()?;
            let body = p.try_function_body()?;
            Some(p.add_node(Node::FunctionDefinition(FunctionDefinition {
                header,
                body,
            })))
        })
    }

    /// `func_header := 'def' FUNCIDENT '(' (param (',' param)*)? ')'`
    fn try_function_header(&mut self) -> Option<NodeId> {
        self.attempt(|p| {
            let def_token = p.expect(&TokenKind::Def, "`def'")?;
            let name = p.expect(
                &TokenKind::FuncIdent(String::new()),
                "user function identifier (`@name')",
            )?;
            let open_paren = p.expect(&TokenKind::LParen, "`('")?;
            let parameters = if p.check(&TokenKind::RParen) {
                None
            } else {
                Some(p.try_formal_parameter_list()?)
            };
            let close_paren = p.expect(&TokenKind::RParen, "`)'")?;
            Some(p.add_node(Node::FunctionHeader(FunctionHeader {
                def_token,
                name,
                open_paren,
                parameters,
                close_paren,
            })))
        })
    }

    fn try_formal_parameter_list(&mut self) -> Option<NodeId> {
        self.attempt(|p| {
            let mut parameters = SeparatedList::new();
            parameters.push(p.try_formal_parameter()?);
            while p.check(&TokenKind::Comma) {
                let comma = p.expect(&TokenKind::Comma, "`,'")?;
                let parameter = p.try_formal_parameter()?;
                parameters.push_separator(comma);
                parameters.push(parameter);
            }
            Some(p.add_node(Node::FormalParameterList(FormalParameterList {
                parameters,
            })))
        })
    }

    fn try_formal_parameter(&mut self) -> Option<NodeId> {
        self.attempt(|p| {
            let name = p.expect(&TokenKind::VarIdent(String::new()), "variable identifier")?;
            Some(p.add_node(Node::FormalParameter(FormalParameter { name })))
        })
    }

    /// `func_body := block`
    fn try_function_body(&mut self) -> Option<NodeId> {
        self.attempt(|p| {
            let block = p.try_block()?;
            Some(p.add_node(Node::FunctionBody(FunctionBody { block })))
        })
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// `block := '{' statement* '}'` (empty blocks are allowed)
    fn try_block(&mut self) -> Option<NodeId> {
        self.attempt(|p| {
            let open_brace = p.expect(&TokenKind::LBrace, "`{'")?;
            let mut statements = Vec::new();
            while let Some(statement) = p.try_statement() {
                statements.push(statement);
            }
            let close_brace = p.expect(&TokenKind::RBrace, "`}'")?;
            Some(p.add_node(Node::Block(Block {
                open_brace,
                statements,
                close_brace,
            })))
        })
    }

    /// `statement := var_decl_stmt | embedded_statement`
    fn try_statement(&mut self) -> Option<NodeId> {
        self.attempt(|p| {
            if p.check(&TokenKind::Var) {
                if let Some(node) = p.try_variable_declaration() {
                    return Some(node);
                }
            }
            p.try_embedded_statement()
        })
    }

    /// `embedded_statement := block | while_stmt | if_stmt | expr_stmt
    ///                      | return_stmt | empty_stmt`
    ///
    /// The alternative order is a semantic commitment: the first fully
    /// successful alternative wins.
    fn try_embedded_statement(&mut self) -> Option<NodeId> {
        self.attempt(|p| {
            if p.check(&TokenKind::LBrace) {
                if let Some(node) = p.try_block() {
                    return Some(node);
                }
            }
            if p.check(&TokenKind::While) {
                if let Some(node) = p.try_while_statement() {
                    return Some(node);
                }
            }
            if p.check(&TokenKind::If) {
                if let Some(node) = p.try_if_statement() {
                    return Some(node);
                }
            }
            if p.is_possible_statement_expression() {
                if let Some(node) = p.try_expression_statement() {
                    return Some(node);
                }
            }
            if p.check(&TokenKind::Return) {
                if let Some(node) = p.try_return_statement() {
                    return Some(node);
                }
            }
            p.try_empty_statement()
        })
    }

    /// Both statement-expression forms start with an identifier token.
    fn is_possible_statement_expression(&self) -> bool {
        matches!(
            self.peek(0).kind,
            TokenKind::Ident(_) | TokenKind::VarIdent(_) | TokenKind::FuncIdent(_)
        )
    }

    /// `if_stmt := 'if' '(' expr ')' embedded_statement
    ///             ('else' embedded_statement)?`
    fn try_if_statement(&mut self) -> Option<NodeId> {
        self.attempt(|p| {
            let if_token = p.expect(&TokenKind::If, "`if'")?;
            let open_paren = p.expect(&TokenKind::LParen, "`('")?;
            let condition = p.try_expression()?;
            let close_paren = p.expect(&TokenKind::RParen, "`)'")?;
            let then_branch = p.try_embedded_statement()?;

            let (else_token, else_branch) = if p.check(&TokenKind::Else) {
                let else_token = p.expect(&TokenKind::Else, "`else'")?;
                let else_branch = p.try_embedded_statement()?;
                (Some(else_token), Some(else_branch))
            } else {
                (None, None)
            };

            Some(p.add_node(Node::IfStatement(IfStatement {
                if_token,
                open_paren,
                condition,
                close_paren,
                then_branch,
                else_token,
                else_branch,
            })))
        })
    }

    /// `while_stmt := 'while' '(' expr ')' embedded_statement`
    fn try_while_statement(&mut self) -> Option<NodeId> {
        self.attempt(|p| {
            let while_token = p.expect(&TokenKind::While, "`while'")?;
            let open_paren = p.expect(&TokenKind::LParen, "`('")?;
            let condition = p.try_expression()?;
            let close_paren = p.expect(&TokenKind::RParen, "`)'")?;
            let body = p.try_embedded_statement()?;
            Some(p.add_node(Node::WhileStatement(WhileStatement {
                while_token,
                open_paren,
                condition,
                close_paren,
                body,
            })))
        })
    }

    /// `expr_stmt := (invocation | assignment) end_of_stmt`
    fn try_expression_statement(&mut self) -> Option<NodeId> {
        self.attempt(|p| {
            let expression = p.try_statement_expression()?;
            let eos = p.try_end_of_statement(true)?;
            Some(p.add_node(Node::ExpressionStatement(ExpressionStatement {
                expression,
                eos,
            })))
        })
    }

    fn try_statement_expression(&mut self) -> Option<NodeId> {
        self.attempt(|p| {
            if let Some(node) = p.try_invocation() {
                return Some(node);
            }
            p.try_assignment()
        })
    }

    /// `return_stmt := 'return' (end_of_stmt | expr end_of_stmt)`
    fn try_return_statement(&mut self) -> Option<NodeId> {
        self.attempt(|p| {
            let return_token = p.expect(&TokenKind::Return, "`return'")?;

            let value = if matches!(
                p.peek_raw(0).kind,
                TokenKind::Terminator | TokenKind::RBrace | TokenKind::End
            ) {
                None
            } else {
                Some(p.try_expression()?)
            };

            let eos = p.try_end_of_statement(true)?;
            Some(p.add_node(Node::ReturnStatement(ReturnStatement {
                return_token,
                value,
                eos,
            })))
        })
    }

    /// `empty_stmt := end_of_stmt`
    fn try_empty_statement(&mut self) -> Option<NodeId> {
        self.attempt(|p| {
            let eos = p.try_end_of_statement(false)?;
            Some(p.add_node(Node::EmptyStatement(EmptyStatement { eos })))
        })
    }

    /// `end_of_stmt := (';' | newline)+`
    ///
    /// Both spellings produce the same token kind, so only "one or more in
    /// a row" is checked. With `allow_implicit`, a closing brace or end of
    /// input ends the statement without consuming anything; the empty
    /// statement never allows that (a statement must consume input).
    fn try_end_of_statement(&mut self, allow_implicit: bool) -> Option<NodeId> {
        self.attempt(|p| {
            if allow_implicit
                && matches!(p.peek_raw(0).kind, TokenKind::RBrace | TokenKind::End)
            {
                return Some(p.add_node(Node::EndOfStatement(EndOfStatement {
                    terminators: Vec::new(),
                })));
            }

            let first = p.expect_raw(
                &TokenKind::Terminator,
                "end of statement (`;' or newline)",
            )?;
            let mut terminators = vec![first];
            while p.peek_raw(0).kind == TokenKind::Terminator {
                terminators.push(p.advance_raw());
            }
            Some(p.add_node(Node::EndOfStatement(EndOfStatement { terminators })))
        })
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /// `expr := binary_expr | unary_expr | assignment`
    fn try_expression(&mut self) -> Option<NodeId> {
        self.attempt(|p| {
            if let Some(node) = p.try_binary_operation(1) {
                return Some(node);
            }
            if let Some(node) = p.try_unary_expression() {
                return Some(node);
            }
            p.try_assignment()
        })
    }

    /// Precedence climbing: parse one operand, then fold in operators of
    /// precedence >= `min_precedence`, recursing at precedence + 1 for the
    /// right operand (every operator is left-associative). Fails unless at
    /// least one operator was consumed.
    fn try_binary_operation(&mut self, min_precedence: u8) -> Option<NodeId> {
        self.attempt(|p| {
            let left = p.try_unary_expression()?;
            let mut result: Option<NodeId> = None;

            loop {
                let Some((operator, precedence)) = p.attempt(|p| {
                    let operator = p.try_binary_operator()?;
                    let precedence = p.operator_precedence(operator);
                    if precedence < min_precedence {
                        return None;
                    }
                    Some((operator, precedence))
                }) else {
                    break;
                };

                let right = p
                    .try_binary_operation(precedence + 1)
                    .or_else(|| p.try_unary_expression())?;

                let lhs = result.unwrap_or(left);
                result = Some(p.add_node(Node::BinaryOperation(BinaryOperation {
                    left: lhs,
                    operator,
                    right,
                })));
            }

            result
        })
    }

    /// `unary_expr := primary_expr`
    fn try_unary_expression(&mut self) -> Option<NodeId> {
        if !self.is_possible_primary_expression() {
            return None;
        }
        self.try_primary_expression()
    }

    fn is_possible_primary_expression(&self) -> bool {
        matches!(
            self.peek(0).kind,
            TokenKind::Str(_)
                | TokenKind::Real(_)
                | TokenKind::Integer(_)
                | TokenKind::Boolean(_)
                | TokenKind::Ident(_)
                | TokenKind::VarIdent(_)
                | TokenKind::FuncIdent(_)
                | TokenKind::LParen
        )
    }

    /// `primary_expr := literal | '(' expr ')' | invocation | simple_name`
    fn try_primary_expression(&mut self) -> Option<NodeId> {
        self.attempt(|p| {
            if let Some(node) = p.try_literal() {
                return Some(node);
            }
            if let Some(node) = p.try_parenthesized() {
                return Some(node);
            }
            if let Some(node) = p.try_invocation() {
                return Some(node);
            }
            p.try_simple_name()
        })
    }

    fn try_literal(&mut self) -> Option<NodeId> {
        if !self.peek(0).is_literal() {
            return None;
        }
        let token = self.advance();
        Some(self.add_node(Node::Literal(Literal { token })))
    }

    fn try_parenthesized(&mut self) -> Option<NodeId> {
        self.attempt(|p| {
            let open_paren = p.expect(&TokenKind::LParen, "`('")?;
            let expression = p.try_expression()?;
            let close_paren = p.expect(&TokenKind::RParen, "`)'")?;
            Some(p.add_node(Node::Parenthesized(Parenthesized {
                open_paren,
                expression,
                close_paren,
            })))
        })
    }

    fn try_simple_name(&mut self) -> Option<NodeId> {
        self.attempt(|p| {
            let name = p.expect(&TokenKind::VarIdent(String::new()), "variable identifier")?;
            Some(p.add_node(Node::SimpleName(SimpleName { name })))
        })
    }

    /// The callee of an invocation: a plain or user function identifier
    /// (never a variable identifier).
    fn try_function_identifier(&mut self) -> Option<NodeId> {
        if !matches!(
            self.peek(0).kind,
            TokenKind::Ident(_) | TokenKind::FuncIdent(_)
        ) {
            return None;
        }
        let name = self.advance();
        Some(self.add_node(Node::FunctionIdentifier(FunctionIdentifier { name })))
    }

    /// `invocation := func_ident ('(' arg_list? ')' | arg_list)?`
    fn try_invocation(&mut self) -> Option<NodeId> {
        self.attempt(|p| {
            let function = p.try_function_identifier()?;

            if p.check(&TokenKind::LParen) {
                let open_paren = p.advance();
                let arguments = p.try_argument_list();
                let close_paren = p.expect(&TokenKind::RParen, "`)'")?;
                Some(p.add_node(Node::Invocation(Invocation {
                    function,
                    open_paren: Some(open_paren),
                    arguments,
                    close_paren: Some(close_paren),
                })))
            } else {
                let arguments = p.try_argument_list();
                Some(p.add_node(Node::Invocation(Invocation {
                    function,
                    open_paren: None,
                    arguments,
                    close_paren: None,
                })))
            }
        })
    }

    fn try_argument_list(&mut self) -> Option<NodeId> {
        self.attempt(|p| {
            let mut arguments = SeparatedList::new();
            arguments.push(p.try_expression()?);
            while p.check(&TokenKind::Comma) {
                let comma = p.expect(&TokenKind::Comma, "`,'")?;
                let argument = p.try_expression()?;
                arguments.push_separator(comma);
                arguments.push(argument);
            }
            Some(p.add_node(Node::ArgumentList(ArgumentList { arguments })))
        })
    }

    /// `assignment := VARIDENT '=' expr`
    fn try_assignment(&mut self) -> Option<NodeId> {
        self.attempt(|p| {
            let target = p.try_simple_name()?;
            let eq_token = p.expect(&TokenKind::Eq, "`='")?;
            let value = p.try_expression()?;
            Some(p.add_node(Node::Assignment(Assignment {
                target,
                eq_token,
                value,
            })))
        })
    }

    // ========================================================================
    // Binary operators
    // ========================================================================

    fn try_binary_operator(&mut self) -> Option<NodeId> {
        if self.token_precedence(&self.peek(0).kind) == 0 {
            return None;
        }
        let token = self.advance();
        Some(self.add_node(Node::BinaryOperator(BinaryOperator { token })))
    }

    fn operator_precedence(&self, operator: NodeId) -> u8 {
        let Node::BinaryOperator(op) = &self.nodes[operator.0 as usize] else {
            return 0;
        };
        self.token_precedence(&self.tokens[op.token.0 as usize].kind)
    }

    /// Precedence, low to high; 0 marks a non-operator. All operators are
    /// left-associative.
    fn token_precedence(&self, kind: &TokenKind) -> u8 {
        match kind {
            TokenKind::PipePipe => 1,
            TokenKind::AmpAmp => 2,
            TokenKind::Pipe => 3,
            TokenKind::Caret => 4,
            TokenKind::Amp => 5,
            TokenKind::EqEq | TokenKind::NotEq => 6,
            TokenKind::Ge | TokenKind::Le | TokenKind::Gt | TokenKind::Lt => 7,
            TokenKind::Plus | TokenKind::Minus => 8,
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent => 9,
            _ => 0,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
