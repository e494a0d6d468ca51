//! Lexer for the Anna language
//!
//! Converts source text into the materialized token sequence consumed by
//! the parser:
//! - keywords, punctuation, the sixteen binary operators
//! - integer / real / boolean / string literals with decoded payloads
//! - the three identifier categories (`@name`, plain, variable)
//! - `;` and newline both produce `Terminator` tokens (newline is
//!   significant; other whitespace is skipped)
//! - `//` line comments attach to the most recently emitted token as
//!   trailing comments instead of becoming tokens themselves
//!
//! On the first unrecognized character the lexer emits a single `Error`
//! token, records one diagnostic, and stops scanning.
//!
//! ## Module Structure
//!
//! - `tokens` - token types (TokenKind, Token, KEYWORDS)
//! - `strings` - string literal scanning and escape decoding
//! - `numbers` - numeric literal scanning

mod numbers;
mod strings;
pub mod tokens;

pub use tokens::{Token, TokenKind};

use crate::frontend::diagnostics::Diagnostic;
use tokens::KEYWORDS;

/// Lexer for Anna source code.
///
/// Tracks 0-based row/column while scanning; every token records the
/// coordinates of its first character and its display width.
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    row: usize,
    col: usize,
    tokens: Vec<Token>,
    errors: Vec<Diagnostic>,
    /// Set once an unrecognized character is hit; scanning stops there.
    stopped: bool,
    /// Comments seen before any token was emitted.
    pending_comments: Vec<String>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            row: 0,
            col: 0,
            tokens: Vec::new(),
            errors: Vec::new(),
            stopped: false,
            pending_comments: Vec::new(),
        }
    }

    /// Tokenize the entire source.
    ///
    /// On success the sequence ends with a synthetic `End` token. On a
    /// lexical error the collected diagnostics are returned instead; the
    /// scan stops at the first unrecognized character.
    pub fn tokenize(mut self) -> Result<Vec<Token>, Vec<Diagnostic>> {
        while !self.is_at_end() && !self.stopped {
            self.scan_token();
        }

        if !self.errors.is_empty() {
            return Err(self.errors);
        }

        let (row, col) = (self.row, self.col);
        self.tokens.push(Token::eof(row, col));
        Ok(self.tokens)
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.source[self.current_pos..].char_indices();
        iter.next(); // skip current
        iter.next().map(|(_, c)| c)
    }

    fn advance(&mut self) -> Option<char> {
        if let Some((pos, c)) = self.chars.next() {
            self.current_pos = pos + c.len_utf8();
            if c == '\n' {
                self.row += 1;
                self.col = 0;
            } else {
                self.col += 1;
            }
            Some(c)
        } else {
            None
        }
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self) {
        // Skip insignificant whitespace (newlines are tokens)
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' || c == '\r' {
                self.advance();
            } else {
                break;
            }
        }

        let (row, col) = (self.row, self.col);

        let Some(c) = self.advance() else {
            return;
        };

        match c {
            // Newline: a statement terminator in its own right
            '\n' => self.add_token(TokenKind::Terminator, "\n", row, col),
            ';' => self.add_token(TokenKind::Terminator, ";", row, col),

            // Comments and division
            '/' => {
                if self.match_char('/') {
                    self.scan_comment();
                } else {
                    self.add_token(TokenKind::Slash, "/", row, col);
                }
            }

            // Operators and punctuation
            '&' => {
                if self.match_char('&') {
                    self.add_token(TokenKind::AmpAmp, "&&", row, col);
                } else {
                    self.add_token(TokenKind::Amp, "&", row, col);
                }
            }
            '|' => {
                if self.match_char('|') {
                    self.add_token(TokenKind::PipePipe, "||", row, col);
                } else {
                    self.add_token(TokenKind::Pipe, "|", row, col);
                }
            }
            '>' => {
                if self.match_char('=') {
                    self.add_token(TokenKind::Ge, ">=", row, col);
                } else {
                    self.add_token(TokenKind::Gt, ">", row, col);
                }
            }
            '<' => {
                if self.match_char('=') {
                    self.add_token(TokenKind::Le, "<=", row, col);
                } else {
                    self.add_token(TokenKind::Lt, "<", row, col);
                }
            }
            '=' => {
                if self.match_char('=') {
                    self.add_token(TokenKind::EqEq, "==", row, col);
                } else {
                    self.add_token(TokenKind::Eq, "=", row, col);
                }
            }
            '!' => {
                if self.match_char('=') {
                    self.add_token(TokenKind::NotEq, "!=", row, col);
                } else {
                    self.add_token(TokenKind::Bang, "!", row, col);
                }
            }
            '^' => self.add_token(TokenKind::Caret, "^", row, col),
            '~' => self.add_token(TokenKind::Tilde, "~", row, col),
            '+' => self.add_token(TokenKind::Plus, "+", row, col),
            '-' => self.add_token(TokenKind::Minus, "-", row, col),
            '*' => self.add_token(TokenKind::Star, "*", row, col),
            '%' => self.add_token(TokenKind::Percent, "%", row, col),
            '(' => self.add_token(TokenKind::LParen, "(", row, col),
            ')' => self.add_token(TokenKind::RParen, ")", row, col),
            '{' => self.add_token(TokenKind::LBrace, "{", row, col),
            '}' => self.add_token(TokenKind::RBrace, "}", row, col),
            '[' => self.add_token(TokenKind::LBracket, "[", row, col),
            ']' => self.add_token(TokenKind::RBracket, "]", row, col),
            ',' => self.add_token(TokenKind::Comma, ",", row, col),

            // Literals and identifiers
            '"' => self.scan_string(row, col),
            '0'..='9' => self.scan_number(row, col, c),
            '@' => self.scan_function_identifier(row, col),
            _ if is_ident_start(c) => self.scan_identifier(row, col, c),

            _ => self.lexical_error(row, col, c.to_string()),
        }
    }

    // ========================================================================
    // Token and error emission
    // ========================================================================

    fn add_token(&mut self, kind: TokenKind, text: impl Into<String>, row: usize, col: usize) {
        let mut token = Token::new(kind, text, row, col);
        if !self.pending_comments.is_empty() {
            token.trailing_comments = std::mem::take(&mut self.pending_comments);
        }
        self.tokens.push(token);
    }

    /// Emit the single error token and stop the scan.
    fn lexical_error(&mut self, row: usize, col: usize, text: String) {
        self.errors
            .push(Diagnostic::unrecognized(row, col, text.clone(), text.chars().count()));
        self.add_token(TokenKind::Error, text, row, col);
        self.stopped = true;
    }

    // ========================================================================
    // Comments
    // ========================================================================

    /// Scan a `//` comment (opener already consumed) and attach it to the
    /// previously emitted token.
    fn scan_comment(&mut self) {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            text.push(c);
            self.advance();
        }
        let comment = text.trim().to_string();
        match self.tokens.last_mut() {
            Some(token) => token.trailing_comments.push(comment),
            None => self.pending_comments.push(comment),
        }
    }

    // ========================================================================
    // Identifier scanning
    // ========================================================================

    fn scan_identifier(&mut self, row: usize, col: usize, first: char) {
        let mut name = String::from(first);
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                name.push(c);
                self.advance();
            } else {
                break;
            }
        }

        let kind = match KEYWORDS.get(name.as_str()).cloned() {
            Some(kind) => kind,
            None if name.chars().any(|c| c.is_ascii_uppercase()) => TokenKind::Ident(name.clone()),
            None => TokenKind::VarIdent(name.clone()),
        };
        self.add_token(kind, name, row, col);
    }

    /// Scan `@name` (the `@` is already consumed).
    fn scan_function_identifier(&mut self, row: usize, col: usize) {
        if !self.peek().is_some_and(is_ident_start) {
            self.lexical_error(row, col, "@".to_string());
            return;
        }

        let mut name = String::new();
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                name.push(c);
                self.advance();
            } else {
                break;
            }
        }
        let text = format!("@{name}");
        self.add_token(TokenKind::FuncIdent(name), text, row, col);
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Check if a character can start an identifier (ASCII-only).
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Check if a character can continue an identifier (ASCII-only).
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Convenience function to lex a source string.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, Vec<Diagnostic>> {
    Lexer::new(source).tokenize()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        let tokens = lex("def main if else while import return var").unwrap();
        assert!(matches!(tokens[0].kind, TokenKind::Def));
        assert!(matches!(tokens[1].kind, TokenKind::Main));
        assert!(matches!(tokens[2].kind, TokenKind::If));
        assert!(matches!(tokens[3].kind, TokenKind::Else));
        assert!(matches!(tokens[4].kind, TokenKind::While));
        assert!(matches!(tokens[5].kind, TokenKind::Import));
        assert!(matches!(tokens[6].kind, TokenKind::Return));
        assert!(matches!(tokens[7].kind, TokenKind::Var));
        assert!(matches!(tokens[8].kind, TokenKind::End));
    }

    #[test]
    fn test_operators() {
        let tokens = lex(">= <= == != & | ^ > < + - * / % && ||").unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind.clone()).collect();
        assert_eq!(
            &kinds[..16],
            &[
                TokenKind::Ge,
                TokenKind::Le,
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::Amp,
                TokenKind::Pipe,
                TokenKind::Caret,
                TokenKind::Gt,
                TokenKind::Lt,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Percent,
                TokenKind::AmpAmp,
                TokenKind::PipePipe,
            ]
        );
    }

    #[test]
    fn test_identifier_categories() {
        let tokens = lex("@f Print counter _tmp").unwrap();
        assert!(matches!(&tokens[0].kind, TokenKind::FuncIdent(n) if n == "f"));
        assert_eq!(tokens[0].text, "@f");
        assert!(matches!(&tokens[1].kind, TokenKind::Ident(n) if n == "Print"));
        assert!(matches!(&tokens[2].kind, TokenKind::VarIdent(n) if n == "counter"));
        assert!(matches!(&tokens[3].kind, TokenKind::VarIdent(n) if n == "_tmp"));
    }

    #[test]
    fn test_numbers() {
        let tokens = lex("42 3.25 0").unwrap();
        assert!(matches!(tokens[0].kind, TokenKind::Integer(42)));
        assert!(matches!(tokens[1].kind, TokenKind::Real(f) if (f - 3.25).abs() < f64::EPSILON));
        assert!(matches!(tokens[2].kind, TokenKind::Integer(0)));
        assert_eq!(tokens[1].text, "3.25");
        assert_eq!(tokens[1].width, 4);
    }

    #[test]
    fn test_booleans() {
        let tokens = lex("true false").unwrap();
        assert!(matches!(tokens[0].kind, TokenKind::Boolean(true)));
        assert!(matches!(tokens[1].kind, TokenKind::Boolean(false)));
        assert!(tokens[0].is_literal());
    }

    #[test]
    fn test_strings() {
        let tokens = lex(r#""hello" "a\nb""#).unwrap();
        assert!(matches!(&tokens[0].kind, TokenKind::Str(s) if s == "hello"));
        assert_eq!(tokens[0].text, r#""hello""#);
        assert!(matches!(&tokens[1].kind, TokenKind::Str(s) if s == "a\nb"));
    }

    #[test]
    fn test_terminators() {
        let tokens = lex("x;\ny").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Terminator);
        assert_eq!(tokens[1].text, ";");
        assert!(!tokens[1].is_newline());
        assert_eq!(tokens[2].kind, TokenKind::Terminator);
        assert!(tokens[2].is_newline());
    }

    #[test]
    fn test_rows_and_columns() {
        let tokens = lex("var x\n  @f").unwrap();
        assert_eq!((tokens[0].row, tokens[0].col), (0, 0));
        assert_eq!((tokens[1].row, tokens[1].col), (0, 4));
        assert_eq!((tokens[2].row, tokens[2].col), (0, 5)); // the newline itself
        assert_eq!((tokens[3].row, tokens[3].col), (1, 2));
        assert_eq!(tokens[3].width, 2);
    }

    #[test]
    fn test_trailing_comment_attaches_to_previous_token() {
        let tokens = lex("var x // the counter\nvar y").unwrap();
        assert!(matches!(&tokens[1].kind, TokenKind::VarIdent(n) if n == "x"));
        assert_eq!(tokens[1].trailing_comments, vec!["the counter".to_string()]);
        // The comment never becomes a token of its own
        assert_eq!(tokens[2].kind, TokenKind::Terminator);
    }

    #[test]
    fn test_leading_comment_attaches_to_first_token() {
        let tokens = lex("// banner\nvar x").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Terminator);
        assert_eq!(tokens[0].trailing_comments, vec!["banner".to_string()]);
    }

    #[test]
    fn test_unrecognized_character_stops_scan() {
        let errors = lex("var x = $ var y").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].text, "$");
        assert_eq!((errors[0].row, errors[0].col), (0, 8));
    }

    #[test]
    fn test_bare_at_sign_is_an_error() {
        let errors = lex("@ f").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].text, "@");
    }

    #[test]
    fn test_unterminated_string_is_an_error() {
        let errors = lex("\"abc").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!((errors[0].row, errors[0].col), (0, 0));
    }

    #[test]
    fn test_eof_token_is_last() {
        let tokens = lex("").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::End);
        assert_eq!(tokens[0].width, 0);
    }
}
