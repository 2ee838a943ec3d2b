//! Lexer errors.

use starlight_diagnostic::{Diagnostic, ErrorCode};
use starlight_ir::Span;
use thiserror::Error;

/// A fatal lexer error with its location.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Error)]
#[error("{kind} at {span}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        LexError { kind, span }
    }

    pub fn code(&self) -> ErrorCode {
        match self.kind {
            LexErrorKind::UnterminatedString => ErrorCode::E1001,
            LexErrorKind::UnterminatedComment => ErrorCode::E1002,
            LexErrorKind::UnexpectedCharacter(_) => ErrorCode::E1003,
            LexErrorKind::SourceTooLarge(_) => ErrorCode::E1004,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let label = match self.kind {
            LexErrorKind::UnterminatedString => "string starts here",
            LexErrorKind::UnterminatedComment => "comment starts here",
            LexErrorKind::UnexpectedCharacter(_) => "not valid here",
            LexErrorKind::SourceTooLarge(_) => "file is too large",
        };
        Diagnostic::error(self.code())
            .with_message(self.kind.to_string())
            .with_label(self.span, label)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, Error)]
pub enum LexErrorKind {
    /// The closing quote never appeared. The span points at the opening quote.
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("unexpected character `{0}`")]
    UnexpectedCharacter(char),
    /// Offsets are stored as `u32`.
    #[error("source is {0} bytes, more than a span can address")]
    SourceTooLarge(usize),
}
