//! JavaScript code generation for Starlight.
//!
//! ```text
//! Program (AST)
//!      ↓
//!  CodegenContext   (indentation + output buffer)
//!      ↓
//!  JavaScript text
//! ```
//!
//! Generation is a pure function of the tree and the [`CodegenConfig`]:
//! the same input always yields byte-identical output.

mod config;
mod context;
mod expr;
mod quote;
mod stmt;

pub use config::CodegenConfig;
pub use context::CodegenContext;
pub use quote::quote_string;

use starlight_diagnostic::{Diagnostic, ErrorCode};
use starlight_ir::{Node, Span};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum CodegenError {
    /// The left side of `=` is not a plain variable.
    #[error("invalid assignment target at {span}")]
    InvalidAssignmentTarget { span: Span },
}

impl CodegenError {
    pub fn span(&self) -> Span {
        match self {
            CodegenError::InvalidAssignmentTarget { span } => *span,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            CodegenError::InvalidAssignmentTarget { .. } => ErrorCode::E3001,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            CodegenError::InvalidAssignmentTarget { span } => Diagnostic::error(self.code())
                .with_message("invalid assignment target")
                .with_label(*span, "cannot assign to this expression")
                .with_note("only variables declared with `star` can be assigned"),
        }
    }
}

/// Generate JavaScript for a node with the default configuration.
pub fn generate<'a>(node: impl Into<Node<'a>>) -> Result<String, CodegenError> {
    generate_with(node, &CodegenConfig::default())
}

/// Generate JavaScript for a node.
///
/// Programs and statements end with a newline; a lone expression does not.
pub fn generate_with<'a>(
    node: impl Into<Node<'a>>,
    config: &CodegenConfig,
) -> Result<String, CodegenError> {
    let mut ctx = CodegenContext::new(config);
    match node.into() {
        Node::Program(program) => {
            for stmt in &program.body {
                ctx.emit_stmt(stmt)?;
                ctx.newline();
            }
        }
        Node::Stmt(stmt) => {
            ctx.emit_stmt(stmt)?;
            ctx.newline();
        }
        Node::Expr(expr) => {
            let text = ctx.emit_expr(expr)?;
            ctx.write(&text);
        }
    }
    let output = ctx.take_output();
    tracing::debug!(bytes = output.len(), "generated");
    Ok(output)
}

#[cfg(test)]
mod tests;
