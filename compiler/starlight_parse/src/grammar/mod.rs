//! Grammar rules, split by statement and expression level.

pub(crate) mod expr;
pub(crate) mod stmt;
