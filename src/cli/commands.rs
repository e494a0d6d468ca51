//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level
//! `run()`.

use std::fs;
use std::path::Path;

use crate::frontend::ast::SyntaxTree;
use crate::frontend::diagnostics::render_report;
use crate::frontend::{lexer, parser};
use crate::frontend::symbols::UnitSymbols;
use crate::plot;

use super::{CliError, CliResult, ExitCode};

fn read_source(path: &Path) -> CliResult<(String, String)> {
    let source = fs::read_to_string(path)
        .map_err(|err| CliError::failure(format!("{}: {err}", path.display())))?;
    let display_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("<input>")
        .to_string();
    Ok((source, display_name))
}

/// Parse a file; a failed parse becomes a `CliError` carrying the full
/// rendered diagnostic report.
fn parse_file(path: &Path) -> CliResult<SyntaxTree> {
    let (source, display_name) = read_source(path)?;
    let (tree, diagnostics) = parser::parse(&source, &display_name);
    match tree {
        Some(tree) if diagnostics.is_empty() => Ok(tree),
        _ => Err(CliError::failure(
            render_report(&display_name, &source, &diagnostics)
                .trim_end()
                .to_string(),
        )),
    }
}

fn write_or_print(output: Option<&Path>, content: &str) -> CliResult<ExitCode> {
    match output {
        Some(path) => {
            fs::write(path, content)
                .map_err(|err| CliError::failure(format!("{}: {err}", path.display())))?;
        }
        None => print!("{content}"),
    }
    Ok(ExitCode::SUCCESS)
}

/// `anna check <file>` - parse and report.
pub fn check_file(path: &Path) -> CliResult<ExitCode> {
    parse_file(path)?;
    Ok(ExitCode::SUCCESS)
}

/// `anna tokens <file>` - dump the token sequence.
pub fn dump_tokens(path: &Path) -> CliResult<ExitCode> {
    let (source, display_name) = read_source(path)?;
    let tokens = lexer::lex(&source).map_err(|diagnostics| {
        CliError::failure(
            render_report(&display_name, &source, &diagnostics)
                .trim_end()
                .to_string(),
        )
    })?;

    for token in &tokens {
        println!(
            "{}:{}\t{:?}\t{:?}",
            token.row + 1,
            token.col + 1,
            token.kind,
            token.text
        );
        for comment in &token.trailing_comments {
            println!("\t\t// {comment}");
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// `anna symbols <file>` - export the metadata artifact.
pub fn export_symbols(path: &Path, output: Option<&Path>) -> CliResult<ExitCode> {
    let tree = parse_file(path)?;
    let symbols = UnitSymbols::collect(&tree);
    write_or_print(output, &symbols.export())
}

/// `anna plot <file>` - emit the DOT graph.
pub fn plot_tree(path: &Path, output: Option<&Path>) -> CliResult<ExitCode> {
    let tree = parse_file(path)?;
    write_or_print(output, &plot::render(&tree))
}
