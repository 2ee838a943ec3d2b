//! The `check` command: run the whole pipeline and discard the output.

use std::io::Write;

use crate::{CliOptions, CompileError};

use super::{read_file, write_out, CommandError};

pub fn check_file(options: &CliOptions, out: &mut impl Write) -> Result<(), CommandError> {
    let source = read_file(&options.input)?;
    let checked = starlight_lexer::tokenize(&source)
        .map_err(CompileError::from)
        .and_then(|tokens| starlight_parse::parse(&tokens).map_err(CompileError::from))
        .and_then(|program| {
            // Codegen still runs: invalid assignment targets are caught there.
            starlight_codegen::generate_with(&program, &options.codegen)
                .map(|_| program.body.len())
                .map_err(CompileError::from)
        });

    match checked {
        Ok(statements) => {
            let plural = if statements == 1 { "" } else { "s" };
            write_out(
                out,
                &format!(
                    "OK: {} ({statements} statement{plural})\n",
                    options.input.display()
                ),
            )
        }
        Err(error) => Err(CommandError::compile(error, source)),
    }
}
