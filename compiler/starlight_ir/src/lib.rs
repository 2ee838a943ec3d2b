//! Shared intermediate representation for the Starlight compiler.
//!
//! Every pipeline stage speaks in terms of the types defined here:
//! - [`Span`] and [`LineIndex`] for source locations
//! - [`Token`] and [`TokenKind`] produced by the lexer
//! - [`ast`] nodes produced by the parser and consumed by the code generator

pub mod ast;
mod span;
mod token;

pub use ast::{
    BinaryOp, DeclKind, Expr, ExprKind, Ident, Literal, Node, Program, Stmt, StmtKind, UnaryOp,
};
pub use span::{LineIndex, Span, SpanError};
pub use token::{Keyword, Operator, Token, TokenKind};
