//! Diagnostics and error reporting for Anna
//!
//! Diagnostics are plain data: the parser returns them, it never prints.
//! Rendering pulls source lines from a lazily built [`LineIndex`].

use std::cell::OnceCell;
use std::fmt;

/// A positioned parse or lex error.
///
/// Carries the offending token's coordinates and text; the source line and
/// caret span are produced at render time.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// 0-based source row of the offending token.
    pub row: usize,
    /// 0-based source column of the offending token.
    pub col: usize,
    /// Offending token text.
    pub text: String,
    /// Display width of the offending token (caret run length).
    pub width: usize,
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    /// Lexical error: no token rule matched the input.
    Unrecognized,
    /// Expectation mismatch: the named construct was required here.
    Expected(String),
}

impl Diagnostic {
    /// Expectation mismatch at the given token coordinates.
    pub fn expected(
        row: usize,
        col: usize,
        text: impl Into<String>,
        width: usize,
        description: impl Into<String>,
    ) -> Self {
        Self {
            row,
            col,
            text: text.into(),
            width,
            kind: DiagnosticKind::Expected(description.into()),
        }
    }

    /// Lexical error at the given coordinates.
    pub fn unrecognized(row: usize, col: usize, text: impl Into<String>, width: usize) -> Self {
        Self {
            row,
            col,
            text: text.into(),
            width,
            kind: DiagnosticKind::Unrecognized,
        }
    }

    /// Header line: `<name>:<row+1>:<col+1>: error: ...`.
    pub fn header(&self, display_name: &str) -> String {
        match &self.kind {
            DiagnosticKind::Expected(description) => format!(
                "{}:{}:{}: error: invalid token '{}', expected {}",
                display_name,
                self.row + 1,
                self.col + 1,
                self.text,
                description,
            ),
            DiagnosticKind::Unrecognized => format!(
                "{}:{}:{}: error: unrecognized token '{}'",
                display_name,
                self.row + 1,
                self.col + 1,
                self.text,
            ),
        }
    }

    /// Full rendering: header, source line, caret run sized to the token.
    pub fn render(&self, display_name: &str, lines: &LineIndex<'_>) -> String {
        let line = lines.line(self.row);
        let caret = format!(
            "{}{}",
            " ".repeat(self.col),
            "^".repeat(self.width.max(1))
        );
        format!("{}\n{}\n{}", self.header(display_name), line, caret)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header("<input>"))
    }
}

/// Render an ordered report for a whole parse.
pub fn render_report(display_name: &str, source: &str, diagnostics: &[Diagnostic]) -> String {
    let lines = LineIndex::new(source);
    let mut out = String::new();
    for diag in diagnostics {
        out.push_str(&diag.render(display_name, &lines));
        out.push('\n');
    }
    out
}

// ============================================================================
// Line index
// ============================================================================

/// Random access to source lines, for diagnostic snippets only.
///
/// The row table is built on the first lookup; later lookups are O(1).
pub struct LineIndex<'a> {
    source: &'a str,
    starts: OnceCell<Vec<usize>>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            starts: OnceCell::new(),
        }
    }

    fn starts(&self) -> &[usize] {
        self.starts.get_or_init(|| {
            let mut starts = vec![0];
            for (i, b) in self.source.bytes().enumerate() {
                if b == b'\n' {
                    starts.push(i + 1);
                }
            }
            starts
        })
    }

    /// The text of the given 0-based row, without its newline.
    pub fn line(&self, row: usize) -> &'a str {
        let starts = self.starts();
        let Some(&start) = starts.get(row) else {
            return "";
        };
        let end = starts
            .get(row + 1)
            .map(|&next| next - 1)
            .unwrap_or(self.source.len());
        self.source[start..end].trim_end_matches('\r')
    }

    /// Number of rows (a trailing newline opens a final empty row).
    pub fn line_count(&self) -> usize {
        self.starts().len()
    }
}
