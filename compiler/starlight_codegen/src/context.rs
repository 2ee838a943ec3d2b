//! Output buffer and indentation state.

use std::borrow::Cow;

use crate::CodegenConfig;

/// Words that are reserved in JavaScript but are plain identifiers in
/// Starlight. Generated names never collide with them.
const JS_RESERVED: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield", "arguments",
    "eval",
];

pub struct CodegenContext<'a> {
    pub config: &'a CodegenConfig,
    indent: usize,
    output: String,
}

impl<'a> CodegenContext<'a> {
    pub fn new(config: &'a CodegenConfig) -> Self {
        CodegenContext {
            config,
            indent: 0,
            output: String::with_capacity(1024),
        }
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        debug_assert!(self.indent > 0, "dedent called with zero indent");
        self.indent = self.indent.saturating_sub(1);
    }

    pub fn write_indent(&mut self) {
        let width = self.indent * self.config.indent_width;
        self.output.push_str(&" ".repeat(width));
    }

    pub fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    pub fn newline(&mut self) {
        self.output.push('\n');
    }

    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }

    /// Rename identifiers that JavaScript would reject.
    ///
    /// A reserved word gets a trailing `$`. Names already ending in `$` get
    /// one more, so `var` and `var$` stay distinct.
    pub fn mangle<'n>(&self, name: &'n str) -> Cow<'n, str> {
        if JS_RESERVED.contains(&name) || name.ends_with('$') {
            Cow::Owned(format!("{name}$"))
        } else {
            Cow::Borrowed(name)
        }
    }
}
