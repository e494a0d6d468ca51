//! Token types for the Anna lexer

use phf::phf_map;

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Token kinds for Anna.
///
/// Identifier and literal variants carry their decoded payload; the raw
/// source spelling always lives in [`Token::text`].
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ========== Keywords ==========
    Def,    // function definition
    Main,   // reserved entry-point keyword
    If,     // if statement
    Else,   // if-else statement
    While,  // while loop statement
    Import, // import directive
    Return, // return statement
    Var,    // variable declaration

    // ========== Identifiers ==========
    /// Plain identifier: bare name containing an uppercase letter
    /// (import targets, callable names).
    Ident(String),
    /// Variable identifier: any other bare name.
    VarIdent(String),
    /// User function identifier: `@name` (payload is the name without `@`).
    FuncIdent(String),

    // ========== Literals ==========
    Integer(i64),
    Real(f64),
    Boolean(bool),
    Str(String),

    // ========== Binary operators ==========
    Ge,       // >=
    Le,       // <=
    EqEq,     // ==
    NotEq,    // !=
    Amp,      // & (bitwise and)
    Pipe,     // | (bitwise or)
    Caret,    // ^ (bitwise xor)
    Gt,       // >
    Lt,       // <
    Plus,     // +
    Minus,    // -
    Star,     // *
    Slash,    // /
    Percent,  // %
    AmpAmp,   // && (logical and)
    PipePipe, // || (logical or)

    // ========== Other operators and punctuation ==========
    Bang,     // !
    Tilde,    // ~
    Eq,       // =
    LParen,   // (
    RParen,   // )
    LBrace,   // {
    RBrace,   // }
    LBracket, // [
    RBracket, // ]
    Comma,    // ,

    // ========== Special ==========
    /// End of statement, spelled either `;` or a newline.
    Terminator,
    /// End of input.
    End,
    /// Lexical error marker.
    Error,
}

/// A lexical token with its source coordinates.
///
/// Tokens are created once by the lexer and never mutated afterwards; the
/// token sequence owns them and AST nodes refer to them by index.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw source spelling.
    pub text: String,
    /// 0-based source row.
    pub row: usize,
    /// 0-based source column.
    pub col: usize,
    /// Display width (characters).
    pub width: usize,
    /// Line comments captured after this token (see the lexer docs).
    pub trailing_comments: Vec<String>,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, row: usize, col: usize) -> Self {
        let text = text.into();
        let width = text.chars().count();
        Self {
            kind,
            text,
            row,
            col,
            width,
            trailing_comments: Vec::new(),
        }
    }

    /// Synthetic end-of-input token (zero width).
    pub(crate) fn eof(row: usize, col: usize) -> Self {
        Self {
            kind: TokenKind::End,
            text: "EOF".to_string(),
            row,
            col,
            width: 0,
            trailing_comments: Vec::new(),
        }
    }

    /// Decoded identifier name, for the three identifier kinds.
    pub fn identifier(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Ident(name) | TokenKind::VarIdent(name) | TokenKind::FuncIdent(name) => {
                Some(name)
            }
            _ => None,
        }
    }

    /// Whether this is a newline-spelled terminator (as opposed to `;`).
    pub fn is_newline(&self) -> bool {
        self.kind == TokenKind::Terminator && self.text == "\n"
    }

    /// Whether this token is one of the four literal kinds.
    pub fn is_literal(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Integer(_) | TokenKind::Real(_) | TokenKind::Boolean(_) | TokenKind::Str(_)
        )
    }
}

/// Keyword lookup table.
///
/// The boolean literals live here too: `true`/`false` lex directly to
/// `Boolean` tokens via the same map.
pub static KEYWORDS: phf::Map<&'static str, TokenKind> = phf_map! {
    "def" => TokenKind::Def,
    "main" => TokenKind::Main,
    "if" => TokenKind::If,
    "else" => TokenKind::Else,
    "while" => TokenKind::While,
    "import" => TokenKind::Import,
    "return" => TokenKind::Return,
    "var" => TokenKind::Var,
    "true" => TokenKind::Boolean(true),
    "false" => TokenKind::Boolean(false),
};
