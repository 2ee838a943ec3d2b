//! Parse error type.

use std::fmt;

use starlight_diagnostic::{Diagnostic, ErrorCode};
use starlight_ir::{Span, TokenKind};
use thiserror::Error;

/// What the parser was looking for when it stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expected {
    Token(TokenKind),
    Expression,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Token(kind) => write!(f, "{kind}"),
            Expected::Expression => write!(f, "expression"),
        }
    }
}

/// The first syntax error in a token stream. Parsing stops here.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
#[error("expected {expected}, found {found} at {span}")]
pub struct ParseError {
    pub expected: Expected,
    pub found: TokenKind,
    pub span: Span,
    /// The `(` or `{` left unclosed, when a closing delimiter was expected.
    pub opened: Option<Span>,
}

impl ParseError {
    pub fn new(expected: Expected, found: TokenKind, span: Span) -> Self {
        ParseError {
            expected,
            found,
            span,
            opened: None,
        }
    }

    /// Point back at the delimiter that a missing close would have matched.
    #[must_use]
    pub fn with_opener(mut self, opened: Span) -> Self {
        if matches!(
            self.expected,
            Expected::Token(TokenKind::RParen | TokenKind::RBrace)
        ) {
            self.opened = Some(opened);
        }
        self
    }

    pub fn code(&self) -> ErrorCode {
        match (self.expected, self.found) {
            (Expected::Expression, TokenKind::Keyword(kw)) if kw.is_reserved_only() => {
                ErrorCode::E2003
            }
            (Expected::Expression, _) => ErrorCode::E2002,
            (Expected::Token(_), _) => ErrorCode::E2001,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code())
            .with_message(format!("expected {}, found {}", self.expected, self.found))
            .with_label(self.span, format!("expected {}", self.expected));
        let diag = match self.opened {
            Some(opened) => diag.with_secondary_label(opened, "unclosed delimiter opened here"),
            None => diag,
        };
        match self.found {
            TokenKind::Keyword(kw) if kw.is_reserved_only() => diag.with_note(format!(
                "`{}` is reserved for future use",
                kw.as_str()
            )),
            _ => diag,
        }
    }
}
