//! Statement emission.
//!
//! Each method writes one statement starting at the current output position;
//! the caller writes any leading indentation and the trailing newline.

use starlight_ir::{DeclKind, Stmt, StmtKind};
use starlight_stack::ensure_sufficient_stack;

use crate::{CodegenContext, CodegenError};

impl CodegenContext<'_> {
    pub fn emit_stmt(&mut self, stmt: &Stmt) -> Result<(), CodegenError> {
        ensure_sufficient_stack(|| self.emit_stmt_inner(stmt))
    }

    fn emit_stmt_inner(&mut self, stmt: &Stmt) -> Result<(), CodegenError> {
        match &stmt.kind {
            StmtKind::VariableDeclaration {
                kind,
                name,
                initializer,
            } => {
                let keyword = match kind {
                    DeclKind::Let => "let",
                    DeclKind::Const => "const",
                };
                let name = self.mangle(&name.name).into_owned();
                let value = match initializer {
                    Some(init) => Some(self.emit_expr(init)?),
                    // `const` requires an initializer in JavaScript.
                    None if *kind == DeclKind::Const => Some("undefined".to_string()),
                    None => None,
                };
                match value {
                    Some(value) => self.write(&format!("{keyword} {name} = {value};")),
                    None => self.write(&format!("{keyword} {name};")),
                }
            }
            StmtKind::FunctionDeclaration { name, params, body } => {
                let name = self.mangle(&name.name).into_owned();
                let params: Vec<String> = params
                    .iter()
                    .map(|p| self.mangle(&p.name).into_owned())
                    .collect();
                self.write(&format!("function {name}({}) ", params.join(", ")));
                self.emit_block(body)?;
            }
            StmtKind::Block(body) => self.emit_block(body)?,
            StmtKind::If {
                test,
                consequent,
                alternate,
            } => {
                let test = self.emit_expr(test)?;
                self.write(&format!("if ({test}) "));
                // An inner `if` without `else` would capture our `else`.
                let dangling = alternate.is_some()
                    && matches!(consequent.kind, StmtKind::If { alternate: None, .. });
                if dangling {
                    self.emit_block(std::slice::from_ref(consequent.as_ref()))?;
                } else {
                    self.emit_stmt(consequent)?;
                }
                if let Some(alternate) = alternate {
                    self.write(" else ");
                    self.emit_stmt(alternate)?;
                }
            }
            StmtKind::While { test, body } => {
                let test = self.emit_expr(test)?;
                self.write(&format!("while ({test}) "));
                self.emit_stmt(body)?;
            }
            StmtKind::For {
                init,
                test,
                update,
                body,
            } => {
                let init = self.emit_expr(init)?;
                let test = self.emit_expr(test)?;
                let update = self.emit_expr(update)?;
                self.write(&format!("for ({init}; {test}; {update}) "));
                self.emit_stmt(body)?;
            }
            StmtKind::Return(argument) => match argument {
                Some(argument) => {
                    let value = self.emit_expr(argument)?;
                    self.write(&format!("return {value};"));
                }
                None => self.write("return;"),
            },
            StmtKind::Break => self.write("break;"),
            StmtKind::Continue => self.write("continue;"),
            StmtKind::Expression(expr) => {
                let text = self.emit_expr(expr)?;
                self.write(&text);
                self.write(";");
            }
        }
        Ok(())
    }

    /// `{`, one indented statement per line, `}`.
    fn emit_block(&mut self, body: &[Stmt]) -> Result<(), CodegenError> {
        if body.is_empty() {
            self.write("{}");
            return Ok(());
        }
        self.write("{");
        self.newline();
        self.indent();
        for stmt in body {
            self.write_indent();
            self.emit_stmt(stmt)?;
            self.newline();
        }
        self.dedent();
        self.write_indent();
        self.write("}");
        Ok(())
    }
}
