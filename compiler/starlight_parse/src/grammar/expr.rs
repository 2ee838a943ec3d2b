//! Expression parsing.
//!
//! Precedence, lowest first:
//! assignment, `||`, `&&`, equality, relational, additive,
//! multiplicative, unary, call, primary.

use starlight_ir::{BinaryOp, Expr, ExprKind, Keyword, Literal, Operator, TokenKind, UnaryOp};
use starlight_stack::ensure_sufficient_stack;

use crate::{Expected, ParseError, Parser};

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    let span = left.span.merge(right.span);
    Expr::new(
        ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        span,
    )
}

impl Parser<'_> {
    /// Parse an expression, assignment included.
    pub(crate) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        ensure_sufficient_stack(|| self.parse_assignment())
    }

    /// `target = value`, right-associative.
    fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        let target = self.parse_binary_or()?;

        if self.cursor.check_operator(Operator::Eq) {
            self.cursor.advance();
            let value = self.parse_expr()?;
            let span = target.span.merge(value.span);
            return Ok(Expr::new(
                ExprKind::Assignment {
                    target: Box::new(target),
                    value: Box::new(value),
                },
                span,
            ));
        }

        Ok(target)
    }

    fn parse_binary_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_binary_and()?;

        while self.cursor.check_operator(Operator::OrOr) {
            self.cursor.advance();
            let right = self.parse_binary_and()?;
            left = binary(BinaryOp::Or, left, right);
        }

        Ok(left)
    }

    fn parse_binary_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_equality()?;

        while self.cursor.check_operator(Operator::AndAnd) {
            self.cursor.advance();
            let right = self.parse_equality()?;
            left = binary(BinaryOp::And, left, right);
        }

        Ok(left)
    }

    /// `==`, `!=`, `===`, `!==`
    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_comparison()?;

        while let Some(op) = self.match_operator(|op| match op {
            Operator::EqEq => Some(BinaryOp::Eq),
            Operator::NotEq => Some(BinaryOp::NotEq),
            Operator::StrictEq => Some(BinaryOp::StrictEq),
            Operator::StrictNotEq => Some(BinaryOp::StrictNotEq),
            _ => None,
        }) {
            let right = self.parse_comparison()?;
            left = binary(op, left, right);
        }

        Ok(left)
    }

    /// `<`, `>`, `<=`, `>=`
    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;

        while let Some(op) = self.match_operator(|op| match op {
            Operator::Lt => Some(BinaryOp::Lt),
            Operator::Gt => Some(BinaryOp::Gt),
            Operator::LtEq => Some(BinaryOp::LtEq),
            Operator::GtEq => Some(BinaryOp::GtEq),
            _ => None,
        }) {
            let right = self.parse_additive()?;
            left = binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;

        while let Some(op) = self.match_operator(|op| match op {
            Operator::Plus => Some(BinaryOp::Add),
            Operator::Minus => Some(BinaryOp::Sub),
            _ => None,
        }) {
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        while let Some(op) = self.match_operator(|op| match op {
            Operator::Star => Some(BinaryOp::Mul),
            Operator::Slash => Some(BinaryOp::Div),
            Operator::Percent => Some(BinaryOp::Rem),
            _ => None,
        }) {
            let right = self.parse_unary()?;
            left = binary(op, left, right);
        }

        Ok(left)
    }

    /// `!x`, `-x`
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.cursor.current_kind() {
            TokenKind::Operator(Operator::Bang) => UnaryOp::Not,
            TokenKind::Operator(Operator::Minus) => UnaryOp::Neg,
            _ => return self.parse_call(),
        };
        let start = self.cursor.advance().span;
        let argument = ensure_sufficient_stack(|| self.parse_unary())?;
        let span = start.merge(argument.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                argument: Box::new(argument),
            },
            span,
        ))
    }

    /// `callee(args)(args)...`
    fn parse_call(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;

        while self.cursor.check(TokenKind::LParen) {
            let open = self.cursor.advance().span;
            let mut arguments = Vec::new();
            if !self.cursor.check(TokenKind::RParen) {
                loop {
                    arguments.push(self.parse_expr()?);
                    if !self.cursor.eat(TokenKind::Comma) {
                        break;
                    }
                }
            }
            let close = self
                .cursor
                .expect(TokenKind::RParen)
                .map_err(|err| err.with_opener(open))?
                .span;
            let span = expr.span.merge(close);
            expr = Expr::new(
                ExprKind::Call {
                    callee: Box::new(expr),
                    arguments,
                },
                span,
            );
        }

        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.cursor.current();
        let kind = match token.kind {
            TokenKind::Number => {
                let value = token
                    .text
                    .parse::<f64>()
                    .map_err(|_| self.cursor.error(Expected::Token(TokenKind::Number)))?;
                ExprKind::Literal(Literal::Number(value))
            }
            TokenKind::String => ExprKind::Literal(Literal::String(token.text.clone())),
            TokenKind::Keyword(Keyword::True) => ExprKind::Literal(Literal::Bool(true)),
            TokenKind::Keyword(Keyword::False) => ExprKind::Literal(Literal::Bool(false)),
            TokenKind::Keyword(Keyword::Null) => ExprKind::Literal(Literal::Null),
            TokenKind::Identifier | TokenKind::Keyword(Keyword::Show) => {
                ExprKind::Identifier(token.text.clone())
            }
            TokenKind::LParen => {
                let open = self.cursor.advance().span;
                let mut inner = self.parse_expr()?;
                let close = self
                    .cursor
                    .expect(TokenKind::RParen)
                    .map_err(|err| err.with_opener(open))?
                    .span;
                inner.span = open.merge(close);
                return Ok(inner);
            }
            _ => return Err(self.cursor.error(Expected::Expression)),
        };
        self.cursor.advance();
        Ok(Expr::new(kind, token.span))
    }

    /// Consume the current operator if `classify` maps it to a binary op.
    fn match_operator(
        &mut self,
        classify: impl Fn(Operator) -> Option<BinaryOp>,
    ) -> Option<BinaryOp> {
        let TokenKind::Operator(op) = self.cursor.current_kind() else {
            return None;
        };
        let mapped = classify(op)?;
        self.cursor.advance();
        Some(mapped)
    }
}
