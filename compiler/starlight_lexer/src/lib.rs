//! Lexer for Starlight using logos.
//!
//! One left-to-right pass over the source:
//! - whitespace and both comment forms are skipped
//! - operators match longest-first, so `===` never splits into `==` and `=`
//! - identifier-shaped words are reclassified through the keyword table
//! - string escapes are copied into the token text verbatim
//!
//! The token list always ends with [`TokenKind::Eof`].

mod lex_error;

pub use lex_error::{LexError, LexErrorKind};

use logos::{Lexer, Logos};
use starlight_ir::{Keyword, Operator, Span, Token, TokenKind};

/// Error produced by the logos automaton before positions are attached.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum RawError {
    #[default]
    Unexpected,
    UnterminatedString,
    UnterminatedComment,
}

/// Raw token from logos (before keyword resolution).
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(error = RawError)]
// Unicode White_Space plus the byte order mark.
#[logos(skip r"[\s\x{FEFF}]+")]
enum RawToken {
    // === Trivia ===
    #[regex(r"//[^\n]*")]
    LineComment,
    #[token("/*", block_comment)]
    BlockComment,

    // === Literals ===
    #[regex(r"[0-9]+(\.[0-9]*)?")]
    Number,
    #[token("\"", |lex| string_body(lex, '"'))]
    #[token("'", |lex| string_body(lex, '\''))]
    #[token("`", |lex| string_body(lex, '`'))]
    String,
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Word,

    // === Three-character operators ===
    #[token("===")]
    StrictEq,
    #[token("!==")]
    StrictNotEq,

    // === Two-character operators ===
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token(">=")]
    GtEq,
    #[token("<=")]
    LtEq,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("=>")]
    Arrow,

    // === One-character operators ===
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("=")]
    Eq,
    #[token(">")]
    Gt,
    #[token("<")]
    Lt,
    #[token("!")]
    Bang,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,

    // === Punctuation ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,
}

/// Consume the rest of a `/* ... */` comment.
fn block_comment(lex: &mut Lexer<'_, RawToken>) -> Result<(), RawError> {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            Ok(())
        }
        None => Err(RawError::UnterminatedComment),
    }
}

/// Consume a string body up to and including the closing `quote`.
///
/// A backslash and the character after it are taken as-is, so an escaped
/// quote does not close the string.
fn string_body(lex: &mut Lexer<'_, RawToken>, quote: char) -> Result<(), RawError> {
    let mut chars = lex.remainder().char_indices();
    while let Some((i, c)) = chars.next() {
        if c == quote {
            lex.bump(i + c.len_utf8());
            return Ok(());
        }
        if c == '\\' && chars.next().is_none() {
            break;
        }
    }
    Err(RawError::UnterminatedString)
}

/// Lex source code into a token list terminated by `Eof`.
#[tracing::instrument(level = "debug", skip(source), fields(bytes = source.len()))]
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let eof_pos = u32::try_from(source.len()).map_err(|_| {
        LexError::new(LexErrorKind::SourceTooLarge(source.len()), Span::DUMMY)
    })?;

    let mut tokens = Vec::new();
    let mut logos = RawToken::lexer(source);

    while let Some(result) = logos.next() {
        // Every offset is at most `eof_pos`, which fits in u32.
        let span = Span::try_from_range(logos.span()).unwrap_or(Span::point(eof_pos));
        let slice = logos.slice();

        let raw = match result {
            Ok(raw) => raw,
            Err(err) => return Err(convert_error(err, source, span)),
        };

        match raw {
            RawToken::LineComment | RawToken::BlockComment => {}
            RawToken::String => {
                let content = &slice[1..slice.len() - 1];
                tokens.push(Token::new(TokenKind::String, content, span));
            }
            _ => tokens.push(Token::new(convert_token(raw, slice), slice, span)),
        }
    }

    tokens.push(Token::new(TokenKind::Eof, "", Span::point(eof_pos)));
    tracing::debug!(count = tokens.len(), "lexed");
    Ok(tokens)
}

fn convert_error(err: RawError, source: &str, span: Span) -> LexError {
    match err {
        RawError::UnterminatedString => {
            LexError::new(LexErrorKind::UnterminatedString, Span::new(span.start, span.start + 1))
        }
        RawError::UnterminatedComment => LexError::new(
            LexErrorKind::UnterminatedComment,
            Span::new(span.start, span.start + 2),
        ),
        RawError::Unexpected => {
            let ch = source
                .get(span.start as usize..)
                .and_then(|rest| rest.chars().next())
                .unwrap_or(char::REPLACEMENT_CHARACTER);
            let width = u32::try_from(ch.len_utf8()).unwrap_or(1);
            LexError::new(
                LexErrorKind::UnexpectedCharacter(ch),
                Span::new(span.start, span.start + width),
            )
        }
    }
}

fn convert_token(raw: RawToken, slice: &str) -> TokenKind {
    match raw {
        RawToken::Number => TokenKind::Number,
        RawToken::Word => Keyword::lookup(slice).map_or(TokenKind::Identifier, TokenKind::Keyword),
        // Handled before conversion.
        RawToken::String | RawToken::LineComment | RawToken::BlockComment => TokenKind::String,

        RawToken::StrictEq => TokenKind::Operator(Operator::StrictEq),
        RawToken::StrictNotEq => TokenKind::Operator(Operator::StrictNotEq),
        RawToken::EqEq => TokenKind::Operator(Operator::EqEq),
        RawToken::NotEq => TokenKind::Operator(Operator::NotEq),
        RawToken::GtEq => TokenKind::Operator(Operator::GtEq),
        RawToken::LtEq => TokenKind::Operator(Operator::LtEq),
        RawToken::AndAnd => TokenKind::Operator(Operator::AndAnd),
        RawToken::OrOr => TokenKind::Operator(Operator::OrOr),
        RawToken::PlusPlus => TokenKind::Operator(Operator::PlusPlus),
        RawToken::MinusMinus => TokenKind::Operator(Operator::MinusMinus),
        RawToken::PlusEq => TokenKind::Operator(Operator::PlusEq),
        RawToken::MinusEq => TokenKind::Operator(Operator::MinusEq),
        RawToken::StarEq => TokenKind::Operator(Operator::StarEq),
        RawToken::SlashEq => TokenKind::Operator(Operator::SlashEq),
        RawToken::PercentEq => TokenKind::Operator(Operator::PercentEq),
        RawToken::Arrow => TokenKind::Operator(Operator::Arrow),
        RawToken::Plus => TokenKind::Operator(Operator::Plus),
        RawToken::Minus => TokenKind::Operator(Operator::Minus),
        RawToken::Star => TokenKind::Operator(Operator::Star),
        RawToken::Slash => TokenKind::Operator(Operator::Slash),
        RawToken::Percent => TokenKind::Operator(Operator::Percent),
        RawToken::Eq => TokenKind::Operator(Operator::Eq),
        RawToken::Gt => TokenKind::Operator(Operator::Gt),
        RawToken::Lt => TokenKind::Operator(Operator::Lt),
        RawToken::Bang => TokenKind::Operator(Operator::Bang),
        RawToken::Amp => TokenKind::Operator(Operator::Amp),
        RawToken::Pipe => TokenKind::Operator(Operator::Pipe),
        RawToken::Caret => TokenKind::Operator(Operator::Caret),
        RawToken::Tilde => TokenKind::Operator(Operator::Tilde),
        RawToken::Question => TokenKind::Operator(Operator::Question),
        RawToken::Colon => TokenKind::Operator(Operator::Colon),

        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Dot => TokenKind::Dot,
    }
}

#[cfg(test)]
mod tests;
