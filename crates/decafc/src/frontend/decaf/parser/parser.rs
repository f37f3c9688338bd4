//! Recursive descent parser for Decaf

use crate::common::{CompileError, CompileResult, Span};
use crate::frontend::decaf::ast::*;
use crate::frontend::decaf::lexer::{Lexer, Token, TokenKind};

/// Recursive descent parser for Decaf
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    previous_span: Span,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given source
    pub fn new(source: &'a str) -> CompileResult<Self> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            previous_span: Span::default(),
        })
    }

    /// Parse a complete program
    pub fn parse(&mut self) -> CompileResult<Program> {
        let start_span = self.current.span;
        self.expect(TokenKind::Class)?;
        let name = self.expect_identifier()?;
        self.expect(TokenKind::LBrace)?;

        let mut fields = Vec::new();
        let mut methods = Vec::new();

        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            let member_start = self.current.span;
            let return_type = if self.match_token(&TokenKind::Void)? {
                None
            } else {
                Some(self.parse_type()?)
            };
            let member_name = self.expect_identifier()?;

            if self.check(&TokenKind::LParen) {
                methods.push(self.parse_method_rest(member_name, return_type, member_start)?);
                continue;
            }

            let Some(ty) = return_type else {
                return Err(CompileError::parser(
                    format!("field '{}' cannot have type void", member_name),
                    member_start,
                ));
            };
            if !methods.is_empty() {
                return Err(CompileError::parser(
                    "field declarations must precede method declarations",
                    member_start,
                ));
            }
            fields.push(self.parse_field_rest(ty, member_name, member_start)?);
        }

        let close = self.expect(TokenKind::RBrace)?;
        if !self.at_end() {
            return Err(CompileError::parser(
                format!("expected end of file, found {}", self.current.kind),
                self.current.span,
            ));
        }

        let span = start_span.merge(close.span);
        Ok(Program::new(name, fields, methods, span, close.span.line))
    }

    // =========================================================================
    // Helper methods
    // =========================================================================

    fn at_end(&self) -> bool {
        matches!(self.current.kind, TokenKind::Eof)
    }

    fn advance(&mut self) -> CompileResult<Token> {
        let prev = std::mem::replace(&mut self.current, self.lexer.next_token()?);
        self.previous_span = prev.span;
        Ok(prev)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> CompileResult<bool> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: TokenKind) -> CompileResult<Token> {
        if self.check(&kind) {
            self.advance()
        } else {
            Err(CompileError::parser(
                format!("expected {}, found {}", kind, self.current.kind),
                self.current.span,
            ))
        }
    }

    fn expect_identifier(&mut self) -> CompileResult<String> {
        if let TokenKind::Identifier(name) = &self.current.kind {
            let name = name.clone();
            self.advance()?;
            Ok(name)
        } else {
            Err(CompileError::parser(
                format!("expected identifier, found {}", self.current.kind),
                self.current.span,
            ))
        }
    }

    /// Span from `start` through the last consumed token
    fn span_from(&self, start: Span) -> Span {
        start.merge(self.previous_span)
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn parse_type(&mut self) -> CompileResult<ScalarType> {
        match self.current.kind {
            TokenKind::Int => {
                self.advance()?;
                Ok(ScalarType::Int)
            }
            TokenKind::Boolean => {
                self.advance()?;
                Ok(ScalarType::Boolean)
            }
            _ => Err(CompileError::parser(
                format!("expected type, found {}", self.current.kind),
                self.current.span,
            )),
        }
    }

    /// Rest of a field declaration after `type first_name`
    fn parse_field_rest(
        &mut self,
        ty: ScalarType,
        first_name: String,
        start: Span,
    ) -> CompileResult<FieldDecl> {
        let mut names = vec![self.parse_field_suffix(first_name, self.previous_span)?];

        while self.match_token(&TokenKind::Comma)? {
            let name_span = self.current.span;
            let name = self.expect_identifier()?;
            names.push(self.parse_field_suffix(name, name_span)?);
        }
        self.expect(TokenKind::Semi)?;

        Ok(FieldDecl::new(ty, names, self.span_from(start)))
    }

    /// Optional `[size]` after a field name
    fn parse_field_suffix(&mut self, name: String, name_span: Span) -> CompileResult<FieldName> {
        if !self.match_token(&TokenKind::LBracket)? {
            return Ok(FieldName::scalar(name, name_span));
        }
        let size = match &self.current.kind {
            TokenKind::IntLiteral(s) | TokenKind::HexLiteral(s) => s.clone(),
            _ => {
                return Err(CompileError::parser(
                    format!("expected array size, found {}", self.current.kind),
                    self.current.span,
                ))
            }
        };
        self.advance()?;
        self.expect(TokenKind::RBracket)?;
        Ok(FieldName::array(name, size, self.span_from(name_span)))
    }

    /// Rest of a method declaration after `type name`
    fn parse_method_rest(
        &mut self,
        name: String,
        return_type: Option<ScalarType>,
        start: Span,
    ) -> CompileResult<MethodDecl> {
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                let param_start = self.current.span;
                let ty = self.parse_type()?;
                let param_name = self.expect_identifier()?;
                params.push(Param::new(param_name, ty, self.span_from(param_start)));
                if !self.match_token(&TokenKind::Comma)? {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;

        let body = self.parse_block()?;
        let span = start.merge(body.span);
        Ok(MethodDecl::new(name, return_type, params, body, span))
    }

    fn parse_block(&mut self) -> CompileResult<Block> {
        let start = self.current.span;
        self.expect(TokenKind::LBrace)?;

        let mut var_decls = Vec::new();
        while self.current.kind.is_type() {
            var_decls.push(self.parse_var_decl()?);
        }

        let mut statements = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            statements.push(self.parse_statement()?);
        }
        self.expect(TokenKind::RBrace)?;

        Ok(Block::new(var_decls, statements, self.span_from(start)))
    }

    fn parse_var_decl(&mut self) -> CompileResult<VarDecl> {
        let start = self.current.span;
        let ty = self.parse_type()?;

        let mut names = Vec::new();
        loop {
            let name_span = self.current.span;
            let name = self.expect_identifier()?;
            names.push((name, name_span));
            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }
        self.expect(TokenKind::Semi)?;

        Ok(VarDecl::new(ty, names, self.span_from(start)))
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_statement(&mut self) -> CompileResult<Stmt> {
        let start = self.current.span;

        match &self.current.kind {
            TokenKind::If => {
                self.advance()?;
                self.expect(TokenKind::LParen)?;
                let condition = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                let then_block = self.parse_block()?;
                let else_block = if self.match_token(&TokenKind::Else)? {
                    Some(self.parse_block()?)
                } else {
                    None
                };
                Ok(Stmt::new(
                    StmtKind::If { condition, then_block, else_block },
                    self.span_from(start),
                ))
            }
            TokenKind::For => {
                self.advance()?;
                let var_span = self.current.span;
                let var = self.expect_identifier()?;
                self.expect(TokenKind::Eq)?;
                let init = self.parse_expression()?;
                self.expect(TokenKind::Comma)?;
                let end = self.parse_expression()?;
                let body = self.parse_block()?;
                Ok(Stmt::new(
                    StmtKind::For { var, var_span, start: init, end, body },
                    self.span_from(start),
                ))
            }
            TokenKind::Return => {
                self.advance()?;
                let value = if self.check(&TokenKind::Semi) {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                self.expect(TokenKind::Semi)?;
                Ok(Stmt::new(StmtKind::Return(value), self.span_from(start)))
            }
            TokenKind::Break => {
                self.advance()?;
                self.expect(TokenKind::Semi)?;
                Ok(Stmt::new(StmtKind::Break, self.span_from(start)))
            }
            TokenKind::Continue => {
                self.advance()?;
                self.expect(TokenKind::Semi)?;
                Ok(Stmt::new(StmtKind::Continue, self.span_from(start)))
            }
            TokenKind::LBrace => {
                let block = self.parse_block()?;
                Ok(Stmt::new(StmtKind::Block(block), self.span_from(start)))
            }
            TokenKind::Callout => {
                let call = self.parse_callout()?;
                self.expect(TokenKind::Semi)?;
                Ok(Stmt::new(StmtKind::MethodCall(call), self.span_from(start)))
            }
            TokenKind::Identifier(_) => {
                let name = self.expect_identifier()?;
                if self.check(&TokenKind::LParen) {
                    let call = self.parse_call_args(name, start)?;
                    self.expect(TokenKind::Semi)?;
                    return Ok(Stmt::new(StmtKind::MethodCall(call), self.span_from(start)));
                }

                let target = self.parse_location_rest(name, start)?;
                let op = match self.current.kind {
                    TokenKind::Eq => AssignOp::Assign,
                    TokenKind::PlusEq => AssignOp::AddAssign,
                    TokenKind::MinusEq => AssignOp::SubAssign,
                    _ => {
                        return Err(CompileError::parser(
                            format!("expected assignment operator, found {}", self.current.kind),
                            self.current.span,
                        ))
                    }
                };
                self.advance()?;
                let value = self.parse_expression()?;
                self.expect(TokenKind::Semi)?;
                Ok(Stmt::new(StmtKind::Assign { target, op, value }, self.span_from(start)))
            }
            _ => Err(CompileError::parser(
                format!("expected statement, found {}", self.current.kind),
                start,
            )),
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn parse_expression(&mut self) -> CompileResult<Expr> {
        self.parse_logical_or_expression()
    }

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

    fn parse_logical_or_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_logical_and_expression()?;

        while self.match_token(&TokenKind::PipePipe)? {
            let right = self.parse_logical_and_expression()?;
            left = Self::binary(BinaryOp::Or, left, right);
        }

        Ok(left)
    }

    fn parse_logical_and_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_equality_expression()?;

        while self.match_token(&TokenKind::AmpAmp)? {
            let right = self.parse_equality_expression()?;
            left = Self::binary(BinaryOp::And, left, right);
        }

        Ok(left)
    }

    fn parse_equality_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_relational_expression()?;

        loop {
            let op = match &self.current.kind {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::Ne,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_relational_expression()?;
            left = Self::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_relational_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_additive_expression()?;

        loop {
            let op = match &self.current.kind {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::LtEq => BinaryOp::Le,
                TokenKind::GtEq => BinaryOp::Ge,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_additive_expression()?;
            left = Self::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_additive_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_multiplicative_expression()?;

        loop {
            let op = match &self.current.kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_multiplicative_expression()?;
            left = Self::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_multiplicative_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_unary_expression()?;

        loop {
            let op = match &self.current.kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_unary_expression()?;
            left = Self::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> CompileResult<Expr> {
        let start_span = self.current.span;

        let op = match &self.current.kind {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Bang => UnaryOp::Not,
            _ => return self.parse_primary_expression(),
        };
        self.advance()?;
        let operand = self.parse_unary_expression()?;
        let span = start_span.merge(operand.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    fn parse_primary_expression(&mut self) -> CompileResult<Expr> {
        let span = self.current.span;

        match &self.current.kind {
            TokenKind::IntLiteral(s) | TokenKind::HexLiteral(s) => {
                let text = s.clone();
                self.advance()?;
                Ok(Expr::new(ExprKind::Literal(Literal::Int(text)), span))
            }
            TokenKind::CharLiteral(s) => {
                let text = s.clone();
                self.advance()?;
                Ok(Expr::new(ExprKind::Literal(Literal::Char(text)), span))
            }
            TokenKind::True => {
                self.advance()?;
                Ok(Expr::new(ExprKind::Literal(Literal::Bool(true)), span))
            }
            TokenKind::False => {
                self.advance()?;
                Ok(Expr::new(ExprKind::Literal(Literal::Bool(false)), span))
            }
            TokenKind::Callout => {
                let call = self.parse_callout()?;
                let span = call.span;
                Ok(Expr::new(ExprKind::MethodCall(call), span))
            }
            TokenKind::Identifier(_) => {
                let name = self.expect_identifier()?;
                if self.check(&TokenKind::LParen) {
                    let call = self.parse_call_args(name, span)?;
                    let span = call.span;
                    return Ok(Expr::new(ExprKind::MethodCall(call), span));
                }
                let location = self.parse_location_rest(name, span)?;
                let span = location.span;
                Ok(Expr::new(ExprKind::Location(location), span))
            }
            TokenKind::LParen => {
                self.advance()?;
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(Expr::new(ExprKind::Paren(Box::new(inner)), self.span_from(span)))
            }
            _ => Err(CompileError::parser(
                format!("unexpected token in expression: {}", self.current.kind),
                span,
            )),
        }
    }

    /// Optional `[index]` after a variable name
    fn parse_location_rest(&mut self, name: String, start: Span) -> CompileResult<Location> {
        if self.match_token(&TokenKind::LBracket)? {
            let index = self.parse_expression()?;
            self.expect(TokenKind::RBracket)?;
            Ok(Location::indexed(name, index, self.span_from(start)))
        } else {
            Ok(Location::new(name, start))
        }
    }

    /// `(args)` after a method name
    fn parse_call_args(&mut self, name: String, start: Span) -> CompileResult<MethodCall> {
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_token(&TokenKind::Comma)? {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(MethodCall::new(CallKind::Method { name, args }, self.span_from(start)))
    }

    fn parse_callout(&mut self) -> CompileResult<MethodCall> {
        let start = self.current.span;
        self.expect(TokenKind::Callout)?;
        self.expect(TokenKind::LParen)?;

        let name = match &self.current.kind {
            TokenKind::StringLiteral(s) => s.clone(),
            _ => {
                return Err(CompileError::parser(
                    format!("expected callout name string, found {}", self.current.kind),
                    self.current.span,
                ))
            }
        };
        self.advance()?;

        let mut args = Vec::new();
        while self.match_token(&TokenKind::Comma)? {
            if let TokenKind::StringLiteral(s) = &self.current.kind {
                args.push(CalloutArg::String(s.clone()));
                self.advance()?;
            } else {
                args.push(CalloutArg::Expr(self.parse_expression()?));
            }
        }
        self.expect(TokenKind::RParen)?;

        Ok(MethodCall::new(CallKind::Callout { name, args }, self.span_from(start)))
    }
}

/// Parse a complete program from source text
pub fn parse_program(source: &str) -> CompileResult<Program> {
    Parser::new(source)?.parse()
}
