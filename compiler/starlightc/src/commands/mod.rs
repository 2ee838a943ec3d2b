//! Command handlers for the `starlight` CLI.
//!
//! Handlers write their normal output to the given writer and return a
//! [`CommandError`] for anything that should end the process with status 1.
//! Rendering that error is left to the caller.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use starlight_diagnostic::emitter::{render, ColorMode, DiagnosticEmitter, TerminalEmitter};

use crate::{CliOptions, Command, CompileError};

mod check;
mod compile;
mod debug;

pub use check::check_file;
pub use compile::compile_file;
pub use debug::{dump_ast, dump_tokens};

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    Read(String),
    #[error("cannot write '{path}': {error}")]
    Write { path: String, error: io::Error },
    #[error("{error}")]
    Compile {
        error: CompileError,
        /// The text that failed, for snippet rendering.
        source_text: String,
    },
}

impl CommandError {
    fn compile(error: impl Into<CompileError>, source_text: String) -> Self {
        CommandError::Compile {
            error: error.into(),
            source_text,
        }
    }

    /// The error as it should appear on standard error.
    pub fn render(&self, path: &str, color: ColorMode) -> String {
        match self {
            CommandError::Compile { error, source_text } => {
                render(&error.to_diagnostic(), source_text, path, color)
            }
            CommandError::Read(_) | CommandError::Write { .. } => format!("error: {self}\n"),
        }
    }

    /// Print the error to standard error. Compile errors go through the
    /// terminal emitter, followed by the error count.
    pub fn report(&self, path: &str, color: ColorMode) {
        match self {
            CommandError::Compile { error, source_text } => {
                let is_tty = io::stderr().is_terminal();
                let mut emitter = TerminalEmitter::stderr(source_text.as_str(), path, color, is_tty);
                emitter.emit(&error.to_diagnostic());
                emitter.emit_summary(1);
                emitter.flush();
            }
            CommandError::Read(_) | CommandError::Write { .. } => eprintln!("error: {self}"),
        }
    }
}

/// Run the command named in `options`.
#[tracing::instrument(level = "debug", skip_all, fields(command = options.command.as_str()))]
pub fn run(options: &CliOptions, out: &mut impl Write) -> Result<(), CommandError> {
    match options.command {
        Command::Compile => compile_file(options, out),
        Command::Tokens => dump_tokens(&options.input, out),
        Command::Ast => dump_ast(&options.input, out),
        Command::Check => check_file(options, out),
    }
}

/// Read a source file, with a user-facing message on failure.
pub fn read_file(path: &Path) -> Result<String, CommandError> {
    std::fs::read_to_string(path).map_err(|e| {
        let path = path.display();
        CommandError::Read(match e.kind() {
            io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
            io::ErrorKind::PermissionDenied => format!("permission denied reading '{path}'"),
            io::ErrorKind::InvalidData => format!("'{path}' contains invalid UTF-8 data"),
            _ => format!("error reading '{path}': {e}"),
        })
    })
}

fn write_out(out: &mut impl Write, text: &str) -> Result<(), CommandError> {
    out.write_all(text.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|error| CommandError::Write {
            path: "<stdout>".to_string(),
            error,
        })
}
