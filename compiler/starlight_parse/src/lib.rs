//! Recursive-descent parser for Starlight.
//!
//! Statements are parsed by [`grammar::stmt`], expressions by
//! [`grammar::expr`]. Binary operator tiers are iterative loops, so every
//! binary operator is left-associative; assignment recurses and is
//! right-associative.
//!
//! Parsing stops at the first error. A [`Program`] is only returned when the
//! whole token stream was consumed, one body entry per top-level statement.

mod cursor;
mod error;
mod grammar;

pub use cursor::Cursor;
pub use error::{Expected, ParseError};

use std::borrow::Cow;

use starlight_ir::{Program, Span, Token, TokenKind};

/// Parser state: a cursor over the token list.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Parser<'a> {
    /// `tokens` must end with `Eof`; use [`parse`] for unchecked input.
    pub fn new(tokens: &'a [Token]) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
        }
    }

    /// Parse a whole program.
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let start = self.cursor.current_span();
        let mut body = Vec::new();
        while !self.cursor.is_at_end() {
            body.push(self.parse_declaration()?);
        }
        let span = start.merge(self.cursor.previous_span());
        Ok(Program { body, span })
    }

    /// Span from `start` to the end of the last consumed token.
    fn span_from(&self, start: Span) -> Span {
        start.merge(self.cursor.previous_span())
    }
}

/// Parse a token list into a program.
///
/// A missing trailing `Eof` is supplied, so any token slice is accepted.
#[tracing::instrument(level = "debug", skip(tokens), fields(tokens = tokens.len()))]
pub fn parse(tokens: &[Token]) -> Result<Program, ParseError> {
    let tokens: Cow<'_, [Token]> = if tokens.last().is_some_and(|t| t.kind == TokenKind::Eof) {
        Cow::Borrowed(tokens)
    } else {
        let end = tokens.last().map_or(0, |t| t.span.end);
        let mut owned = tokens.to_vec();
        owned.push(Token::new(TokenKind::Eof, "", Span::point(end)));
        Cow::Owned(owned)
    };

    let program = Parser::new(&tokens).parse_program()?;
    tracing::debug!(statements = program.body.len(), "parsed");
    Ok(program)
}
