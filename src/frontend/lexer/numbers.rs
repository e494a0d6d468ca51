//! Number scanning for the Anna lexer
//!
//! Handles integer and real literals (plain decimal notation).

use super::Lexer;
use super::tokens::TokenKind;

impl<'a> Lexer<'a> {
    pub(super) fn scan_number(&mut self, row: usize, col: usize, first: char) {
        let mut text = String::from(first);

        // Integer part
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }

        // Fraction part; the lookahead keeps `1.` from eating the dot
        let mut is_real = false;
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            is_real = true;
            text.push('.');
            self.advance();
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    text.push(c);
                    self.advance();
                } else {
                    break;
                }
            }
        }

        if is_real {
            match text.parse::<f64>() {
                Ok(value) => self.add_token(TokenKind::Real(value), text, row, col),
                Err(_) => self.lexical_error(row, col, text),
            }
        } else {
            match text.parse::<i64>() {
                Ok(value) => self.add_token(TokenKind::Integer(value), text, row, col),
                Err(_) => self.lexical_error(row, col, text),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::lex;
    use super::*;

    #[test]
    fn test_integer_then_dot() {
        // `1.` must not scan as a real
        let errors = lex("1.").unwrap_err();
        assert_eq!(errors[0].text, ".");
    }

    #[test]
    fn test_adjacent_real_parts() {
        let tokens = lex("0.5").unwrap();
        assert!(matches!(tokens[0].kind, TokenKind::Real(f) if (f - 0.5).abs() < f64::EPSILON));
    }

    #[test]
    fn test_integer_overflow_is_lexical_error() {
        let errors = lex("99999999999999999999").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].text, "99999999999999999999");
    }
}
