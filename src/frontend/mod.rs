//! Anna compiler front end
//!
//! This module contains the core pipeline:
//! - `lexer`: tokenization of source text
//! - `parser`: backtracking recursive descent over the token sequence
//! - `ast`: syntax tree arena, node definitions, visitor dispatch
//! - `diagnostics`: positioned error reporting
//! - `symbols`: exported-symbol collection and the metadata artifact

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod symbols;
