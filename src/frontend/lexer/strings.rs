//! String scanning for the Anna lexer
//!
//! Handles double-quoted, single-line string literals with standard
//! escape sequences.

use super::Lexer;
use super::tokens::TokenKind;

impl<'a> Lexer<'a> {
    /// Scan a string literal (opening quote already consumed).
    ///
    /// The token text keeps the raw spelling including quotes and escapes;
    /// the payload is the decoded value. A newline or end of input before
    /// the closing quote is a lexical error.
    pub(super) fn scan_string(&mut self, row: usize, col: usize) {
        let mut text = String::from('"');
        let mut value = String::new();

        loop {
            match self.peek() {
                None | Some('\n') => {
                    self.lexical_error(row, col, text);
                    return;
                }
                Some('"') => {
                    self.advance();
                    text.push('"');
                    break;
                }
                Some('\\') => {
                    self.advance();
                    text.push('\\');
                    match self.advance() {
                        Some('n') => {
                            text.push('n');
                            value.push('\n');
                        }
                        Some('t') => {
                            text.push('t');
                            value.push('\t');
                        }
                        Some('r') => {
                            text.push('r');
                            value.push('\r');
                        }
                        Some('0') => {
                            text.push('0');
                            value.push('\0');
                        }
                        Some('\\') => {
                            text.push('\\');
                            value.push('\\');
                        }
                        Some('"') => {
                            text.push('"');
                            value.push('"');
                        }
                        // Unknown escape: preserve as written
                        Some(c) => {
                            text.push(c);
                            value.push('\\');
                            value.push(c);
                        }
                        None => {
                            self.lexical_error(row, col, text);
                            return;
                        }
                    }
                }
                Some(c) => {
                    self.advance();
                    text.push(c);
                    value.push(c);
                }
            }
        }

        self.add_token(TokenKind::Str(value), text, row, col);
    }
}

#[cfg(test)]
mod tests {
    use super::super::lex;
    use super::*;

    #[test]
    fn test_escapes_decode() {
        let tokens = lex(r#""a\tb\"c\\d\0""#).unwrap();
        assert!(matches!(&tokens[0].kind, TokenKind::Str(s) if s == "a\tb\"c\\d\0"));
    }

    #[test]
    fn test_unknown_escape_preserved() {
        let tokens = lex(r#""\q""#).unwrap();
        assert!(matches!(&tokens[0].kind, TokenKind::Str(s) if s == "\\q"));
    }

    #[test]
    fn test_newline_terminates_with_error() {
        let errors = lex("\"abc\ndef\"").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].col, 0);
    }

    #[test]
    fn test_raw_text_keeps_quotes() {
        let tokens = lex(r#""hi""#).unwrap();
        assert_eq!(tokens[0].text, r#""hi""#);
        assert_eq!(tokens[0].width, 4);
    }
}
