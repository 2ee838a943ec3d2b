//! Token types produced by the lexer.

use std::fmt;

use crate::Span;

/// A lexical token with its source text and location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text of the token. For strings this is the content between the
    /// delimiters, escapes kept verbatim.
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Token {
            kind,
            text: text.into(),
            span,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Number,
    String,
    Identifier,
    Keyword(Keyword),
    Operator(Operator),

    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Dot,

    Eof,
}

impl TokenKind {
    /// Human-readable description used in error messages.
    pub fn display_name(self) -> String {
        match self {
            TokenKind::Number => "number".to_string(),
            TokenKind::String => "string".to_string(),
            TokenKind::Identifier => "identifier".to_string(),
            TokenKind::Keyword(kw) => format!("keyword `{}`", kw.as_str()),
            TokenKind::Operator(op) => format!("`{}`", op.as_str()),
            TokenKind::LParen => "`(`".to_string(),
            TokenKind::RParen => "`)`".to_string(),
            TokenKind::LBrace => "`{`".to_string(),
            TokenKind::RBrace => "`}`".to_string(),
            TokenKind::LBracket => "`[`".to_string(),
            TokenKind::RBracket => "`]`".to_string(),
            TokenKind::Comma => "`,`".to_string(),
            TokenKind::Semicolon => "`;`".to_string(),
            TokenKind::Dot => "`.`".to_string(),
            TokenKind::Eof => "end of file".to_string(),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// Reserved words of the language.
///
/// The last group is reserved for future use: the lexer recognizes the words
/// so they cannot be used as identifiers, but no statement accepts them yet.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Keyword {
    Let,
    Const,
    Function,
    Return,
    If,
    Else,
    While,
    For,
    Break,
    Continue,
    True,
    False,
    Null,
    Show,

    Try,
    Catch,
    Finally,
    Throw,
    Class,
    Extends,
    New,
    This,
}

impl Keyword {
    /// Resolve an identifier-shaped word to a keyword.
    pub fn lookup(text: &str) -> Option<Keyword> {
        let kw = match text {
            "star" => Keyword::Let,
            "constel" => Keyword::Const,
            "nova" => Keyword::Function,
            "emit" => Keyword::Return,
            "when" => Keyword::If,
            "otherwise" => Keyword::Else,
            "loop" => Keyword::While,
            "repeat" => Keyword::For,
            "stop" => Keyword::Break,
            "skip" => Keyword::Continue,
            "yes" => Keyword::True,
            "no" => Keyword::False,
            "voidstar" => Keyword::Null,
            "show" => Keyword::Show,
            "tryit" => Keyword::Try,
            "catchit" => Keyword::Catch,
            "finallyit" => Keyword::Finally,
            "throwit" => Keyword::Throw,
            "classy" => Keyword::Class,
            "extend" => Keyword::Extends,
            "newstar" => Keyword::New,
            "thisstar" => Keyword::This,
            _ => return None,
        };
        Some(kw)
    }

    /// The source spelling of the keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Let => "star",
            Keyword::Const => "constel",
            Keyword::Function => "nova",
            Keyword::Return => "emit",
            Keyword::If => "when",
            Keyword::Else => "otherwise",
            Keyword::While => "loop",
            Keyword::For => "repeat",
            Keyword::Break => "stop",
            Keyword::Continue => "skip",
            Keyword::True => "yes",
            Keyword::False => "no",
            Keyword::Null => "voidstar",
            Keyword::Show => "show",
            Keyword::Try => "tryit",
            Keyword::Catch => "catchit",
            Keyword::Finally => "finallyit",
            Keyword::Throw => "throwit",
            Keyword::Class => "classy",
            Keyword::Extends => "extend",
            Keyword::New => "newstar",
            Keyword::This => "thisstar",
        }
    }

    pub fn is_reserved_only(self) -> bool {
        matches!(
            self,
            Keyword::Try
                | Keyword::Catch
                | Keyword::Finally
                | Keyword::Throw
                | Keyword::Class
                | Keyword::Extends
                | Keyword::New
                | Keyword::This
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    // Three characters
    StrictEq,
    StrictNotEq,

    // Two characters
    EqEq,
    NotEq,
    GtEq,
    LtEq,
    AndAnd,
    OrOr,
    PlusPlus,
    MinusMinus,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    Arrow,

    // One character
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Eq,
    Gt,
    Lt,
    Bang,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Question,
    Colon,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::StrictEq => "===",
            Operator::StrictNotEq => "!==",
            Operator::EqEq => "==",
            Operator::NotEq => "!=",
            Operator::GtEq => ">=",
            Operator::LtEq => "<=",
            Operator::AndAnd => "&&",
            Operator::OrOr => "||",
            Operator::PlusPlus => "++",
            Operator::MinusMinus => "--",
            Operator::PlusEq => "+=",
            Operator::MinusEq => "-=",
            Operator::StarEq => "*=",
            Operator::SlashEq => "/=",
            Operator::PercentEq => "%=",
            Operator::Arrow => "=>",
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Star => "*",
            Operator::Slash => "/",
            Operator::Percent => "%",
            Operator::Eq => "=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Bang => "!",
            Operator::Amp => "&",
            Operator::Pipe => "|",
            Operator::Caret => "^",
            Operator::Tilde => "~",
            Operator::Question => "?",
            Operator::Colon => ":",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_table_round_trips_spelling() {
        for word in ["star", "constel", "nova", "emit", "when", "show", "thisstar"] {
            let kw = Keyword::lookup(word);
            assert_eq!(kw.map(Keyword::as_str), Some(word));
        }
        assert_eq!(Keyword::lookup("let"), None);
    }

    #[test]
    fn reserved_only_keywords() {
        assert!(Keyword::Class.is_reserved_only());
        assert!(!Keyword::Let.is_reserved_only());
    }
}
