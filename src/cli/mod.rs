//! CLI module for the Anna front end
//!
//! ## Commands
//!
//! - `check <file>` - Parse a source file and report diagnostics
//! - `tokens <file>` - Dump the token sequence
//! - `symbols <file>` - Export the unit's symbol metadata
//! - `plot <file>` - Emit a Graphviz description of the syntax tree
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros. Command
//! functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`; only the top-level `run()` handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// The Anna language parser front end
#[derive(Parser, Debug)]
#[command(name = "anna")]
#[command(version = VERSION)]
#[command(about = "Parser front end for the Anna language", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// File to check (default action when no subcommand given)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a source file and report diagnostics
    Check { file: PathBuf },
    /// Dump the token sequence, one token per line
    Tokens { file: PathBuf },
    /// Export the unit's symbol metadata
    Symbols {
        file: PathBuf,
        /// Write the metadata artifact here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Emit a Graphviz description of the syntax tree
    Plot {
        file: PathBuf,
        /// Write the DOT text here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Parse arguments, dispatch, print errors, exit.
pub fn run() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Command::Check { file }) => commands::check_file(&file),
        Some(Command::Tokens { file }) => commands::dump_tokens(&file),
        Some(Command::Symbols { file, output }) => {
            commands::export_symbols(&file, output.as_deref())
        }
        Some(Command::Plot { file, output }) => commands::plot_tree(&file, output.as_deref()),
        None => match cli.file {
            Some(file) => commands::check_file(&file),
            None => Err(CliError::failure(
                "no input file given (try `anna --help`)",
            )),
        },
    };

    match result {
        Ok(code) => process::exit(code.0),
        Err(err) => {
            eprintln!("{err}");
            process::exit(err.exit_code.0);
        }
    }
}
