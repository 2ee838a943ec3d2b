//! Expression emission.
//!
//! Parentheses are inserted from operator precedence, so the text always
//! parses back into the same tree shape regardless of how the source was
//! parenthesized.

use starlight_ir::{Expr, ExprKind, Literal, UnaryOp};
use starlight_stack::ensure_sufficient_stack;

use crate::{quote_string, CodegenContext, CodegenError};

const PREC_ASSIGN: u8 = 1;
const PREC_UNARY: u8 = 8;
const PREC_CALL: u8 = 9;
const PREC_PRIMARY: u8 = 10;

fn precedence(expr: &Expr) -> u8 {
    match &expr.kind {
        ExprKind::Assignment { .. } => PREC_ASSIGN,
        ExprKind::Binary { op, .. } => op.precedence(),
        ExprKind::Unary { .. } => PREC_UNARY,
        ExprKind::Call { .. } => PREC_CALL,
        ExprKind::Identifier(_) | ExprKind::Literal(_) => PREC_PRIMARY,
    }
}

fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        "Infinity".to_string()
    } else {
        value.to_string()
    }
}

impl CodegenContext<'_> {
    pub fn emit_expr(&self, expr: &Expr) -> Result<String, CodegenError> {
        self.emit_expr_prec(expr, PREC_ASSIGN)
    }

    /// Emit `expr`, parenthesized if it binds looser than `min_prec`.
    fn emit_expr_prec(&self, expr: &Expr, min_prec: u8) -> Result<String, CodegenError> {
        let text = ensure_sufficient_stack(|| self.emit_expr_inner(expr))?;
        if precedence(expr) < min_prec {
            Ok(format!("({text})"))
        } else {
            Ok(text)
        }
    }

    fn emit_expr_inner(&self, expr: &Expr) -> Result<String, CodegenError> {
        match &expr.kind {
            ExprKind::Assignment { target, value } => {
                let ExprKind::Identifier(name) = &target.kind else {
                    return Err(CodegenError::InvalidAssignmentTarget { span: target.span });
                };
                if name == "show" {
                    return Err(CodegenError::InvalidAssignmentTarget { span: target.span });
                }
                let value = self.emit_expr_prec(value, PREC_ASSIGN)?;
                Ok(format!("{} = {value}", self.mangle(name)))
            }
            ExprKind::Binary { op, left, right } => {
                let prec = op.precedence();
                let left = self.emit_expr_prec(left, prec)?;
                let right = self.emit_expr_prec(right, prec + 1)?;
                Ok(format!("{left} {op} {right}"))
            }
            ExprKind::Unary { op, argument } => {
                let arg = self.emit_expr_prec(argument, PREC_UNARY)?;
                // `- -x` must not fuse into the `--` operator.
                if *op == UnaryOp::Neg && arg.starts_with('-') {
                    Ok(format!("-({arg})"))
                } else {
                    Ok(format!("{}{arg}", op.as_str()))
                }
            }
            ExprKind::Call { callee, arguments } => {
                let callee = self.emit_expr_prec(callee, PREC_CALL)?;
                let args = arguments
                    .iter()
                    .map(|arg| self.emit_expr_prec(arg, PREC_ASSIGN))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!("{callee}({})", args.join(", ")))
            }
            ExprKind::Identifier(name) if name == "show" => Ok(self.config.print_binding.clone()),
            ExprKind::Identifier(name) => Ok(self.mangle(name).into_owned()),
            ExprKind::Literal(literal) => Ok(match literal {
                Literal::Number(n) => format_number(*n),
                Literal::String(s) => quote_string(s),
                Literal::Bool(b) => b.to_string(),
                Literal::Null => "null".to_string(),
            }),
        }
    }
}
