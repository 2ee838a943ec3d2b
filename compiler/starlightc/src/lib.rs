//! Starlight compiler driver.
//!
//! ```text
//! source text
//!     │  starlight_lexer::tokenize
//!     ▼
//! Vec<Token>
//!     │  starlight_parse::parse
//!     ▼
//! Program
//!     │  starlight_codegen::generate_with
//!     ▼
//! JavaScript
//! ```
//!
//! Each stage stops at its first error. [`compile`] is a pure function of its
//! input: the same source always yields the same output or the same error.

pub mod commands;
pub mod options;

use std::sync::Once;

use starlight_codegen::{CodegenConfig, CodegenError};
use starlight_diagnostic::Diagnostic;
use starlight_ir::Span;
use starlight_lexer::LexError;
use starlight_parse::ParseError;
use thiserror::Error;

pub use options::{CliOptions, Command, UsageError};

static TRACING_INIT: Once = Once::new();

/// Install the `RUST_LOG` subscriber.
///
/// Does nothing unless `RUST_LOG` is set. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompileOptions {
    pub codegen: CodegenConfig,
}

/// The first error of a compile call, tagged with the stage that raised it.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("codegen error: {0}")]
    Codegen(#[from] CodegenError),
}

impl CompileError {
    pub fn span(&self) -> Span {
        match self {
            CompileError::Lex(err) => err.span,
            CompileError::Parse(err) => err.span,
            CompileError::Codegen(err) => err.span(),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            CompileError::Lex(err) => err.to_diagnostic(),
            CompileError::Parse(err) => err.to_diagnostic(),
            CompileError::Codegen(err) => err.to_diagnostic(),
        }
    }
}

/// Compile Starlight source to JavaScript with the default options.
pub fn compile(source: &str) -> Result<String, CompileError> {
    compile_with(source, &CompileOptions::default())
}

#[tracing::instrument(level = "debug", skip_all, fields(bytes = source.len()))]
pub fn compile_with(source: &str, options: &CompileOptions) -> Result<String, CompileError> {
    let tokens = starlight_lexer::tokenize(source)?;
    let program = starlight_parse::parse(&tokens)?;
    starlight_codegen::generate_with(&program, &options.codegen).map_err(CompileError::from)
}

#[cfg(test)]
mod tests;
