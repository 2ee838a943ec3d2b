//! Statement and declaration parsing.

use starlight_ir::{DeclKind, Expr, Ident, Keyword, Operator, Stmt, StmtKind, TokenKind};
use starlight_stack::ensure_sufficient_stack;

use crate::{ParseError, Parser};

impl Parser<'_> {
    /// declaration := var_decl | fn_decl | statement
    pub(crate) fn parse_declaration(&mut self) -> Result<Stmt, ParseError> {
        ensure_sufficient_stack(|| self.parse_declaration_inner())
    }

    fn parse_declaration_inner(&mut self) -> Result<Stmt, ParseError> {
        match self.cursor.current_kind() {
            TokenKind::Keyword(Keyword::Let) => self.parse_variable_declaration(DeclKind::Let),
            TokenKind::Keyword(Keyword::Const) => self.parse_variable_declaration(DeclKind::Const),
            TokenKind::Keyword(Keyword::Function) => self.parse_function_declaration(),
            _ => self.parse_statement(),
        }
    }

    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        ensure_sufficient_stack(|| self.parse_statement_inner())
    }

    fn parse_statement_inner(&mut self) -> Result<Stmt, ParseError> {
        match self.cursor.current_kind() {
            TokenKind::Keyword(Keyword::If) => self.parse_if(),
            TokenKind::Keyword(Keyword::While) => self.parse_while(),
            TokenKind::Keyword(Keyword::For) => self.parse_for(),
            TokenKind::Keyword(Keyword::Return) => self.parse_return(),
            TokenKind::Keyword(Keyword::Break) => self.parse_jump(StmtKind::Break),
            TokenKind::Keyword(Keyword::Continue) => self.parse_jump(StmtKind::Continue),
            TokenKind::LBrace => {
                let start = self.cursor.current_span();
                let body = self.parse_block_body()?;
                Ok(Stmt::new(StmtKind::Block(body), self.span_from(start)))
            }
            _ => {
                let start = self.cursor.current_span();
                let expr = self.parse_expr()?;
                self.eat_terminator();
                Ok(Stmt::new(StmtKind::Expression(expr), self.span_from(start)))
            }
        }
    }

    /// `star name [= init]` or `constel name [= init]`
    fn parse_variable_declaration(&mut self, kind: DeclKind) -> Result<Stmt, ParseError> {
        let start = self.cursor.advance().span;
        let name = self.parse_ident()?;
        let initializer = if self.cursor.check_operator(Operator::Eq) {
            self.cursor.advance();
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.eat_terminator();
        Ok(Stmt::new(
            StmtKind::VariableDeclaration {
                kind,
                name,
                initializer,
            },
            self.span_from(start),
        ))
    }

    /// `nova name(a, b) { ... }`
    fn parse_function_declaration(&mut self) -> Result<Stmt, ParseError> {
        let start = self.cursor.advance().span;
        let name = self.parse_ident()?;

        let open = self.cursor.expect(TokenKind::LParen)?.span;
        let mut params = Vec::new();
        if !self.cursor.check(TokenKind::RParen) {
            loop {
                params.push(self.parse_ident()?);
                if !self.cursor.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.cursor
            .expect(TokenKind::RParen)
            .map_err(|err| err.with_opener(open))?;

        let body = self.parse_block_body()?;
        Ok(Stmt::new(
            StmtKind::FunctionDeclaration { name, params, body },
            self.span_from(start),
        ))
    }

    /// `{ declaration* }`, returning the inner declarations.
    fn parse_block_body(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let open = self.cursor.expect(TokenKind::LBrace)?.span;
        let mut body = Vec::new();
        while !self.cursor.check(TokenKind::RBrace) && !self.cursor.is_at_end() {
            body.push(self.parse_declaration()?);
        }
        self.cursor
            .expect(TokenKind::RBrace)
            .map_err(|err| err.with_opener(open))?;
        Ok(body)
    }

    /// `when (test) stmt [otherwise stmt]`
    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        let start = self.cursor.advance().span;
        let test = self.parse_parenthesized()?;
        let consequent = Box::new(self.parse_statement()?);
        let alternate = if self.cursor.check_keyword(Keyword::Else) {
            self.cursor.advance();
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(Stmt::new(
            StmtKind::If {
                test,
                consequent,
                alternate,
            },
            self.span_from(start),
        ))
    }

    /// `loop (test) stmt`
    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        let start = self.cursor.advance().span;
        let test = self.parse_parenthesized()?;
        let body = Box::new(self.parse_statement()?);
        Ok(Stmt::new(StmtKind::While { test, body }, self.span_from(start)))
    }

    /// `repeat (init; test; update) stmt`, every clause required.
    fn parse_for(&mut self) -> Result<Stmt, ParseError> {
        let start = self.cursor.advance().span;
        self.cursor.expect(TokenKind::LParen)?;
        let init = self.parse_expr()?;
        self.cursor.expect(TokenKind::Semicolon)?;
        let test = self.parse_expr()?;
        self.cursor.expect(TokenKind::Semicolon)?;
        let update = self.parse_expr()?;
        self.cursor.expect(TokenKind::RParen)?;
        let body = Box::new(self.parse_statement()?);
        Ok(Stmt::new(
            StmtKind::For {
                init,
                test,
                update,
                body,
            },
            self.span_from(start),
        ))
    }

    /// `emit [expr]`. The value is omitted when the statement visibly ends.
    fn parse_return(&mut self) -> Result<Stmt, ParseError> {
        let start = self.cursor.advance().span;
        let argument = match self.cursor.current_kind() {
            TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof => None,
            _ => Some(self.parse_expr()?),
        };
        self.eat_terminator();
        Ok(Stmt::new(StmtKind::Return(argument), self.span_from(start)))
    }

    /// `stop` or `skip`
    fn parse_jump(&mut self, kind: StmtKind) -> Result<Stmt, ParseError> {
        let start = self.cursor.advance().span;
        self.eat_terminator();
        Ok(Stmt::new(kind, self.span_from(start)))
    }

    fn parse_parenthesized(&mut self) -> Result<Expr, ParseError> {
        let open = self.cursor.expect(TokenKind::LParen)?.span;
        let expr = self.parse_expr()?;
        self.cursor
            .expect(TokenKind::RParen)
            .map_err(|err| err.with_opener(open))?;
        Ok(expr)
    }

    fn parse_ident(&mut self) -> Result<Ident, ParseError> {
        let token = self.cursor.expect(TokenKind::Identifier)?;
        Ok(Ident::new(token.text.clone(), token.span))
    }

    /// Simple statements may end with an optional `;`.
    fn eat_terminator(&mut self) {
        self.cursor.eat(TokenKind::Semicolon);
    }
}
