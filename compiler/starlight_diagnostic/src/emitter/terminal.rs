//! Terminal emitter.
//!
//! Source snippets with underlined labels are drawn by `ariadne`.

use std::io::{self, Write};

use ariadne::{Color, Config, IndexType, Label as SnippetLabel, Report, ReportKind, Source};

use crate::Diagnostic;

use super::DiagnosticEmitter;

#[inline]
fn plural_s(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Color output mode for the terminal emitter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Color only when writing to a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }

    /// Parse the value of a `--color=` flag.
    pub fn parse(value: &str) -> Option<ColorMode> {
        match value {
            "auto" => Some(ColorMode::Auto),
            "always" => Some(ColorMode::Always),
            "never" => Some(ColorMode::Never),
            _ => None,
        }
    }
}

/// Renders diagnostics for one source file.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    source: String,
    file_name: String,
    colors: bool,
}

impl<W: Write> TerminalEmitter<W> {
    /// `is_tty` is only consulted for [`ColorMode::Auto`].
    pub fn new(
        writer: W,
        source: impl Into<String>,
        file_name: impl Into<String>,
        mode: ColorMode,
        is_tty: bool,
    ) -> Self {
        TerminalEmitter {
            writer,
            source: source.into(),
            file_name: file_name.into(),
            colors: mode.should_use_colors(is_tty),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl TerminalEmitter<io::Stderr> {
    pub fn stderr(
        source: impl Into<String>,
        file_name: impl Into<String>,
        mode: ColorMode,
        is_tty: bool,
    ) -> Self {
        Self::new(io::stderr(), source, file_name, mode, is_tty)
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        let file = self.file_name.as_str();
        let offset = diagnostic
            .primary_span()
            .map_or(0, |span| span.start as usize);

        // Spans are byte offsets.
        let config = Config::default()
            .with_color(self.colors)
            .with_index_type(IndexType::Byte);
        let mut report = Report::build(ReportKind::Error, file, offset)
            .with_code(diagnostic.code)
            .with_message(&diagnostic.message)
            .with_config(config);

        for label in &diagnostic.labels {
            let color = if label.is_primary {
                Color::Red
            } else {
                Color::Blue
            };
            report = report.with_label(
                SnippetLabel::new((file, label.span.to_range()))
                    .with_message(&label.message)
                    .with_color(color),
            );
        }
        for note in &diagnostic.notes {
            report = report.with_note(note);
        }

        let cache = (file, Source::from(self.source.as_str()));
        if report.finish().write(cache, &mut self.writer).is_err() {
            // Fall back to the plain form if the snippet cannot be drawn.
            let _ = writeln!(self.writer, "{diagnostic}");
        }
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }

    fn emit_summary(&mut self, error_count: usize) {
        if error_count > 0 {
            let _ = writeln!(
                self.writer,
                "error: aborting due to {error_count} previous error{}",
                plural_s(error_count)
            );
        }
    }
}
