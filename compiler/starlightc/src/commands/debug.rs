//! The `tokens` and `ast` commands.

use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use starlight_ir::LineIndex;

use crate::CompileError;

use super::{read_file, write_out, CommandError};

/// Print one token per line: position, kind, then the token text.
pub fn dump_tokens(path: &Path, out: &mut impl Write) -> Result<(), CommandError> {
    let source = read_file(path)?;
    let tokens = match starlight_lexer::tokenize(&source) {
        Ok(tokens) => tokens,
        Err(error) => return Err(CommandError::compile(error, source)),
    };

    let index = LineIndex::new(&source);
    let mut text = String::new();
    for token in &tokens {
        let (line, column) = index.line_col(&source, token.span.start);
        let _ = writeln!(text, "{line}:{column}\t{}\t{:?}", token.kind, token.text);
    }
    write_out(out, &text)
}

/// Pretty-print the syntax tree.
pub fn dump_ast(path: &Path, out: &mut impl Write) -> Result<(), CommandError> {
    let source = read_file(path)?;
    let program = starlight_lexer::tokenize(&source)
        .map_err(CompileError::from)
        .and_then(|tokens| starlight_parse::parse(&tokens).map_err(CompileError::from));
    match program {
        Ok(program) => write_out(out, &format!("{program:#?}\n")),
        Err(error) => Err(CommandError::compile(error, source)),
    }
}
