/// Code generation settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodegenConfig {
    /// Runtime function that `show` compiles to.
    pub print_binding: String,
    /// Spaces per indentation level.
    pub indent_width: usize,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        CodegenConfig {
            print_binding: "console.log".to_string(),
            indent_width: 2,
        }
    }
}
