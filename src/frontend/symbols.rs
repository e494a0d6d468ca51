//! Exported-symbol collection and the Anna metadata artifact
//!
//! A traversal over the syntax tree gathers the unit's exported surface:
//! top-level variables and function definitions with their parameter
//! counts. The collection round-trips through the line-oriented
//! `Anna Metadata / 1.0` text format consumed by other units.

use thiserror::Error;

use crate::frontend::ast::{
    ArgumentList, Assignment, BinaryOperation, BinaryOperator, Block, CompilationUnit,
    EmptyStatement, EndOfStatement, ExpressionStatement, FormalParameter, FormalParameterList,
    FunctionBody, FunctionDefinition, FunctionHeader, FunctionIdentifier, IfStatement,
    ImportDirective, Invocation, Literal, Node, Parenthesized, ReturnStatement, SimpleName,
    SyntaxTree, SyntaxVisitor, VariableDeclaration, WhileStatement,
};
use crate::frontend::lexer::Token;

const METADATA_HEADER: &str = "Anna Metadata / 1.0";
const METADATA_FOOTER: &str = "EXTENDED";

/// A top-level variable declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableSymbol {
    pub name: String,
}

/// A function definition with its arity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSymbol {
    pub name: String,
    pub params_count: usize,
}

/// The exported symbols of one compilation unit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnitSymbols {
    pub unit_name: String,
    pub globals: Vec<VariableSymbol>,
    pub functions: Vec<FunctionSymbol>,
}

/// Failures while reading a metadata artifact.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetadataError {
    #[error("not a metadata file")]
    NotMetadata,
    #[error("metadata file ends before the unit name")]
    MissingUnitName,
    #[error("malformed function record: {0:?}")]
    BadFunctionRecord(String),
}

impl UnitSymbols {
    /// Collect the exported symbols of a parsed unit.
    pub fn collect(tree: &SyntaxTree) -> UnitSymbols {
        let mut visitor = ExportedSymbolVisitor::default();
        tree.accept(tree.root(), &mut visitor);
        visitor.symbols
    }

    /// Serialize to the metadata text format: header line, unit name, one
    /// `G<name>` line per global, one `F<name>\0<count>` line per
    /// function, and the `EXTENDED` footer.
    pub fn export(&self) -> String {
        let mut out = String::new();
        out.push_str(METADATA_HEADER);
        out.push('\n');
        out.push_str(&self.unit_name);
        out.push('\n');
        for global in &self.globals {
            out.push('G');
            out.push_str(&global.name);
            out.push('\n');
        }
        for function in &self.functions {
            out.push('F');
            out.push_str(&function.name);
            out.push('\0');
            out.push_str(&function.params_count.to_string());
            out.push('\n');
        }
        out.push_str(METADATA_FOOTER);
        out.push('\n');
        out
    }

    /// Parse a metadata artifact.
    ///
    /// Accepts an optional NUL directly after the `G`/`F` tag, which older
    /// exporters emitted. Unknown record tags are skipped; anything after
    /// the `EXTENDED` footer is ignored.
    pub fn import(metadata: &str) -> Result<UnitSymbols, MetadataError> {
        let mut lines = metadata.lines();

        if lines.next() != Some(METADATA_HEADER) {
            return Err(MetadataError::NotMetadata);
        }
        let unit_name = lines
            .next()
            .ok_or(MetadataError::MissingUnitName)?
            .to_string();

        let mut symbols = UnitSymbols {
            unit_name,
            ..UnitSymbols::default()
        };

        for line in lines {
            if line == METADATA_FOOTER || line.is_empty() {
                break;
            }
            let Some(tag) = line.chars().next() else {
                break;
            };
            let rest = &line[tag.len_utf8()..];
            let rest = rest.strip_prefix('\0').unwrap_or(rest);
            match tag {
                'G' => symbols.globals.push(VariableSymbol {
                    name: rest.to_string(),
                }),
                'F' => {
                    let (name, count) = rest
                        .split_once('\0')
                        .ok_or_else(|| MetadataError::BadFunctionRecord(line.to_string()))?;
                    let params_count = count
                        .parse()
                        .map_err(|_| MetadataError::BadFunctionRecord(line.to_string()))?;
                    symbols.functions.push(FunctionSymbol {
                        name: name.to_string(),
                        params_count,
                    });
                }
                _ => {}
            }
        }

        Ok(symbols)
    }

    /// Human-readable listing, one symbol per line.
    pub fn summary(&self) -> String {
        let mut out = format!("Symbols for {}\n", self.unit_name);
        for global in &self.globals {
            out.push_str(&format!("    Global: {}\n", global.name));
        }
        for function in &self.functions {
            out.push_str(&format!(
                "    Function: {} with {} parameters\n",
                function.name, function.params_count
            ));
        }
        out
    }
}

/// Traversal that reads the exported surface off the compilation unit.
///
/// Only the root node is visited; the collection never recurses, so every
/// other operation is a no-op.
#[derive(Default)]
struct ExportedSymbolVisitor {
    symbols: UnitSymbols,
}

impl SyntaxVisitor for ExportedSymbolVisitor {
    fn visit_compilation_unit(&mut self, tree: &SyntaxTree, node: &CompilationUnit) {
        for &id in &node.variables {
            let Node::VariableDeclaration(var) = tree.node(id) else {
                continue;
            };
            if let Some(name) = tree.token(var.name).identifier() {
                self.symbols.globals.push(VariableSymbol {
                    name: name.to_string(),
                });
            }
        }

        for &id in &node.functions {
            let Node::FunctionDefinition(def) = tree.node(id) else {
                continue;
            };
            let Node::FunctionHeader(header) = tree.node(def.header) else {
                continue;
            };
            let Some(name) = tree.token(header.name).identifier() else {
                continue;
            };
            let params_count = match header.parameters {
                Some(list) => match tree.node(list) {
                    Node::FormalParameterList(params) => params.parameters.len(),
                    _ => 0,
                },
                None => 0,
            };
            self.symbols.functions.push(FunctionSymbol {
                name: name.to_string(),
                params_count,
            });
        }

        self.symbols.unit_name = tree.unit_name.clone();
    }

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

    fn visit_token(&mut self, _: &Token) {}
    fn visit_identifier_token(&mut self, _: &Token) {}
    fn visit_string_token(&mut self, _: &Token) {}
    fn visit_integer_token(&mut self, _: &Token) {}
    fn visit_real_token(&mut self, _: &Token) {}
    fn visit_boolean_token(&mut self, _: &Token) {}
}
