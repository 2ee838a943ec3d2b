//! Diagnostics for the Starlight compiler.
//!
//! Each pipeline error converts into a [`Diagnostic`]: an [`ErrorCode`], a
//! message, labeled spans and notes. The [`emitter`] module renders them for
//! a terminal.

mod diagnostic;
pub mod emitter;
mod error_code;

pub use diagnostic::{Diagnostic, Label};
pub use error_code::ErrorCode;
