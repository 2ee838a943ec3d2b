//! The `compile` command.

use std::io::Write;

use crate::{compile_with, CliOptions, CompileOptions};

use super::{read_file, write_out, CommandError};

/// Compile a file to JavaScript, writing to `-o` or to `out`.
pub fn compile_file(options: &CliOptions, out: &mut impl Write) -> Result<(), CommandError> {
    let source = read_file(&options.input)?;
    let compile_options = CompileOptions {
        codegen: options.codegen.clone(),
    };
    let js = match compile_with(&source, &compile_options) {
        Ok(js) => js,
        Err(error) => return Err(CommandError::compile(error, source)),
    };

    match &options.output {
        Some(path) => {
            std::fs::write(path, &js).map_err(|error| CommandError::Write {
                path: path.display().to_string(),
                error,
            })?;
            tracing::debug!(path = %path.display(), bytes = js.len(), "wrote output");
            Ok(())
        }
        None => write_out(out, &js),
    }
}
