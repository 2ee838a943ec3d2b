//! Canonical string literal quoting.

use std::fmt::Write;

/// Quote `value` as a double-quoted JavaScript string literal.
///
/// Every character that could end the literal, break the line, or close an
/// enclosing `<script>` element is escaped, so the result is always exactly
/// one literal whatever `value` contains.
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    let mut prev = '\0';
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '/' if prev == '<' => out.push_str("\\/"),
            '\u{2028}' | '\u{2029}' => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
        prev = c;
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::quote_string;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(quote_string("hello"), "\"hello\"");
    }

    #[test]
    fn quotes_and_backslashes() {
        assert_eq!(quote_string(r#"say "hi" \o/"#), r#""say \"hi\" \\o/""#);
    }

    #[test]
    fn control_characters() {
        assert_eq!(quote_string("a\nb\tc\r"), "\"a\\nb\\tc\\r\"");
        assert_eq!(quote_string("\u{0}\u{1b}\u{7f}"), "\"\\u0000\\u001b\\u007f\"");
    }

    #[test]
    fn line_separators() {
        assert_eq!(quote_string("\u{2028}\u{2029}"), "\"\\u2028\\u2029\"");
    }

    #[test]
    fn script_close_tag() {
        assert_eq!(quote_string("</script>"), "\"<\\/script>\"");
    }
}
