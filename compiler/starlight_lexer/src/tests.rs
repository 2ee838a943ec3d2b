#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
}

fn texts(source: &str) -> Vec<String> {
    tokenize(source).unwrap().into_iter().map(|t| t.text).collect()
}

#[test]
fn strict_equality_is_one_token() {
    let tokens = tokenize("a === b").unwrap();
    assert_eq!(tokens.len(), 4);
    assert_eq!(tokens[1].kind, TokenKind::Operator(Operator::StrictEq));
    assert_eq!(tokens[1].text, "===");
    assert_eq!(tokens[1].span, Span::new(2, 5));
}

#[test]
fn longest_match_across_operator_tables() {
    assert_eq!(
        kinds("!== != ! => >= >"),
        vec![
            TokenKind::Operator(Operator::StrictNotEq),
            TokenKind::Operator(Operator::NotEq),
            TokenKind::Operator(Operator::Bang),
            TokenKind::Operator(Operator::Arrow),
            TokenKind::Operator(Operator::GtEq),
            TokenKind::Operator(Operator::Gt),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn keywords_are_reclassified() {
    assert_eq!(
        kinds("star x constel y nova emit show"),
        vec![
            TokenKind::Keyword(Keyword::Let),
            TokenKind::Identifier,
            TokenKind::Keyword(Keyword::Const),
            TokenKind::Identifier,
            TokenKind::Keyword(Keyword::Function),
            TokenKind::Keyword(Keyword::Return),
            TokenKind::Keyword(Keyword::Show),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn identifiers_allow_dollar_and_underscore() {
    assert_eq!(texts("$el _x a1 starry"), vec!["$el", "_x", "a1", "starry", ""]);
    assert_eq!(kinds("starry")[0], TokenKind::Identifier);
}

#[test]
fn numbers() {
    assert_eq!(texts("42 3.14 7."), vec!["42", "3.14", "7.", ""]);
    // No leading sign: minus is its own token.
    assert_eq!(
        kinds("-1"),
        vec![
            TokenKind::Operator(Operator::Minus),
            TokenKind::Number,
            TokenKind::Eof
        ]
    );
}

#[test]
fn strings_with_each_delimiter() {
    let tokens = tokenize(r#""a" 'b' `c`"#).unwrap();
    assert_eq!(tokens[0].text, "a");
    assert_eq!(tokens[1].text, "b");
    assert_eq!(tokens[2].text, "c");
    assert!(tokens[..3].iter().all(|t| t.kind == TokenKind::String));
}

#[test]
fn string_escapes_are_copied_verbatim() {
    let tokens = tokenize(r#""say \"hi\"\n""#).unwrap();
    assert_eq!(tokens[0].text, r#"say \"hi\"\n"#);
}

#[test]
fn unterminated_string() {
    let err = tokenize("star s = \"open").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnterminatedString);
    assert_eq!(err.span, Span::new(9, 10));
}

#[test]
fn trailing_backslash_is_unterminated() {
    let err = tokenize("'abc\\").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnterminatedString);
}

#[test]
fn comments_are_skipped() {
    assert_eq!(
        kinds("a // line\n/* block\n spanning */ b"),
        vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::Eof]
    );
}

#[test]
fn unterminated_comment() {
    let err = tokenize("a /* never closed").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnterminatedComment);
    assert_eq!(err.span.start, 2);
}

#[test]
fn unexpected_character_reports_char_and_position() {
    let err = tokenize("star a = #").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnexpectedCharacter('#'));
    assert_eq!(err.span, Span::new(9, 10));
    assert_eq!(err.to_string(), "unexpected character `#` at 9..10");
}

#[test]
fn unicode_whitespace_is_skipped() {
    let tokens = tokenize("\u{feff}a\u{a0}=\u{2028}1\u{3000}").unwrap();
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Identifier,
            TokenKind::Operator(Operator::Eq),
            TokenKind::Number,
            TokenKind::Eof,
        ]
    );
    assert_eq!(tokens[0].span, Span::new(3, 4));
    assert_eq!(tokens[1].span, Span::new(6, 7));
}

#[test]
fn unexpected_multibyte_character() {
    let err = tokenize("a é").unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UnexpectedCharacter('é'));
    assert_eq!(err.span, Span::new(2, 4));
}

#[test]
fn empty_source_is_just_eof() {
    let tokens = tokenize("").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
    assert_eq!(tokens[0].span, Span::point(0));
}

#[test]
fn eof_span_is_source_length() {
    let tokens = tokenize("show(1)  ").unwrap();
    assert_eq!(tokens.last().unwrap().span, Span::point(9));
}

#[test]
fn punctuation() {
    assert_eq!(
        kinds("(){}[],;."),
        vec![
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::LBrace,
            TokenKind::RBrace,
            TokenKind::LBracket,
            TokenKind::RBracket,
            TokenKind::Comma,
            TokenKind::Semicolon,
            TokenKind::Dot,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn errors_map_to_lexer_codes() {
    let err = tokenize("'open").unwrap_err();
    assert_eq!(err.code(), starlight_diagnostic::ErrorCode::E1001);

    let diag = tokenize("a /* b").unwrap_err().to_diagnostic();
    assert_eq!(diag.code, starlight_diagnostic::ErrorCode::E1002);
    assert_eq!(diag.message, "unterminated block comment");
    assert_eq!(diag.primary_span(), Some(Span::new(2, 4)));
}
