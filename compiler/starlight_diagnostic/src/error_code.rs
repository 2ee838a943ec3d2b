use std::fmt;

/// Error codes for compiler diagnostics.
///
/// The first digit names the phase:
/// - E1xxx: lexer
/// - E2xxx: parser
/// - E3xxx: code generation
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    /// Unterminated string literal
    E1001,
    /// Unterminated block comment
    E1002,
    /// Unexpected character
    E1003,
    /// Source file too large for 32-bit spans
    E1004,

    /// Unexpected token
    E2001,
    /// Expected expression
    E2002,
    /// Reserved keyword used before it has a meaning
    E2003,

    /// Assignment to something that is not a variable
    E3001,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E3001 => "E3001",
        }
    }

    /// One-line explanation shown as a note.
    pub fn description(self) -> &'static str {
        match self {
            ErrorCode::E1001 => "string literals must close with the quote that opened them",
            ErrorCode::E1002 => "block comments must close with `*/`",
            ErrorCode::E1003 => "this character cannot start any token",
            ErrorCode::E1004 => "source files are limited to 4 GiB",
            ErrorCode::E2001 => "the parser found a token it did not expect here",
            ErrorCode::E2002 => "an expression was expected here",
            ErrorCode::E2003 => "this keyword is reserved and cannot be used yet",
            ErrorCode::E3001 => "only variables can be assigned to",
        }
    }

    pub fn is_lexer_error(self) -> bool {
        self.as_str().starts_with("E1")
    }

    pub fn is_parser_error(self) -> bool {
        self.as_str().starts_with("E2")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorCode;

    #[test]
    fn phase_prefixes() {
        assert!(ErrorCode::E1003.is_lexer_error());
        assert!(ErrorCode::E2002.is_parser_error());
        assert!(!ErrorCode::E3001.is_parser_error());
        assert_eq!(ErrorCode::E3001.to_string(), "E3001");
    }
}
