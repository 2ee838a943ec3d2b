//! Diagnostic emitters.
//!
//! Only a terminal emitter exists today; the trait keeps the CLI independent
//! of the output format.

mod terminal;

pub use terminal::{ColorMode, TerminalEmitter};

use crate::Diagnostic;

/// Trait for emitting diagnostics in some output format.
pub trait DiagnosticEmitter {
    fn emit(&mut self, diagnostic: &Diagnostic);

    fn flush(&mut self);

    /// Emit a closing count of the errors reported.
    fn emit_summary(&mut self, error_count: usize);
}

/// Render one diagnostic against its source into a string.
pub fn render(diagnostic: &Diagnostic, source: &str, file_name: &str, mode: ColorMode) -> String {
    let mut emitter = TerminalEmitter::new(Vec::new(), source, file_name, mode, false);
    emitter.emit(diagnostic);
    String::from_utf8_lossy(&emitter.into_inner()).into_owned()
}
