//! Parser for the Sprig language
//!
//! A recursive descent parser with one token of lookahead. Tokens are pulled
//! lazily from the [`Lexer`], so a lexical error surfaces at the point the
//! parser reaches it.

use crate::ast::*;
use crate::common::Span;
use crate::diagnostics::{CompileError, SourceFile};
use crate::lexer::{self, Lexer, Token, TokenKind};

/// Parse source text into a root block expression
pub fn parse(source: &str) -> Result<Expr, CompileError> {
    parse_file(&SourceFile::anonymous(source))
}

/// Parse a named source file into a root block expression
pub fn parse_file(file: &SourceFile) -> Result<Expr, CompileError> {
    let mut parser = Parser::new(file)?;
    parser.parse_program()
}

/// Parser state
struct Parser<'src> {
    file: &'src SourceFile,
    lexer: Lexer<'src>,
    current: Token,
}

impl<'src> Parser<'src> {
    fn new(file: &'src SourceFile) -> Result<Self, CompileError> {
        let mut lexer = Lexer::new(file);
        let current = lexer.next_token()?;
        Ok(Self {
            file,
            lexer,
            current,
        })
    }

    fn peek(&self) -> TokenKind {
        self.current.kind
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek() == kind
    }

    fn span(&self) -> Span {
        self.current.span
    }

    fn advance(&mut self) -> Result<Token, CompileError> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, CompileError> {
        if self.at(kind) {
            self.advance()
        } else {
            Err(self.unexpected(&format!("`{}`", kind)))
        }
    }

    fn unexpected(&self, expected: &str) -> CompileError {
        if self.at(TokenKind::Eof) {
            CompileError::UnexpectedEof {
                expected: expected.to_string(),
                span: self.span().into(),
                src: self.file.to_named_source(),
            }
        } else {
            CompileError::UnexpectedToken {
                expected: expected.to_string(),
                found: format!("`{}`", self.current.text),
                span: self.span().into(),
                src: self.file.to_named_source(),
            }
        }
    }

    // ==================== PROGRAM ====================

    fn parse_program(&mut self) -> Result<Expr, CompileError> {
        let mut items = Vec::new();

        while !self.at(TokenKind::Eof) {
            items.push(self.parse_expr()?);
        }

        let span = Span::new(0, self.file.content.len());
        tracing::trace!(expressions = items.len(), "parsed program");
        Ok(Expr::new(ExprKind::Block(items), span))
    }

    // ==================== EXPRESSIONS ====================

    fn parse_expr(&mut self) -> Result<Expr, CompileError> {
        let expr = self.parse_primary()?;

        if self.at(TokenKind::LParen) {
            if !expr.is_callable_shape() {
                return Err(CompileError::InvalidCallee {
                    span: expr.span.into(),
                    src: self.file.to_named_source(),
                });
            }
            let invocation = self.parse_invocation(expr)?;
            // Invocation results are values, not names: `f(1)(2)` is rejected
            if self.at(TokenKind::LParen) {
                return Err(CompileError::InvalidCallee {
                    span: invocation.span.into(),
                    src: self.file.to_named_source(),
                });
            }
            return Ok(invocation);
        }

        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, CompileError> {
        match self.peek() {
            TokenKind::Number => {
                let tok = self.advance()?;
                let value = tok.text.parse::<f64>().map_err(|_| CompileError::UnexpectedToken {
                    expected: "a number".to_string(),
                    found: format!("`{}`", tok.text),
                    span: tok.span.into(),
                    src: self.file.to_named_source(),
                })?;
                Ok(Expr::new(ExprKind::Literal(Literal::Number(value)), tok.span))
            }
            TokenKind::String => {
                let tok = self.advance()?;
                let value = lexer::unescape(&tok.text);
                Ok(Expr::new(ExprKind::Literal(Literal::String(value)), tok.span))
            }
            TokenKind::Ident => {
                let tok = self.advance()?;
                Ok(Expr::new(ExprKind::Lookup(tok.text), tok.span))
            }
            TokenKind::At => self.parse_reference(),
            TokenKind::LBrace => self.parse_block(),
            _ => Err(self.unexpected("an expression")),
        }
    }

    fn parse_reference(&mut self) -> Result<Expr, CompileError> {
        let at = self.expect(TokenKind::At)?;
        if !self.at(TokenKind::Ident) {
            return Err(self.unexpected("a name after `@`"));
        }
        let name = self.advance()?;
        Ok(Expr::new(
            ExprKind::Reference(name.text),
            at.span.merge(name.span),
        ))
    }

    fn parse_block(&mut self) -> Result<Expr, CompileError> {
        let open = self.expect(TokenKind::LBrace)?;
        let mut items = Vec::new();

        while !self.at(TokenKind::RBrace) {
            if self.at(TokenKind::Eof) {
                return Err(self.unexpected("`}`"));
            }
            items.push(self.parse_expr()?);
        }

        let close = self.expect(TokenKind::RBrace)?;
        Ok(Expr::new(ExprKind::Block(items), open.span.merge(close.span)))
    }

    fn parse_invocation(&mut self, callee: Expr) -> Result<Expr, CompileError> {
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();

        if !self.at(TokenKind::RParen) {
            loop {
                if !self.peek().starts_expr() {
                    return Err(self.unexpected("an argument"));
                }
                args.push(self.parse_expr()?);

                if self.at(TokenKind::Comma) {
                    self.advance()?;
                } else if self.at(TokenKind::RParen) {
                    break;
                } else {
                    return Err(self.unexpected("`,` or `)`"));
                }
            }
        }

        let close = self.expect(TokenKind::RParen)?;
        let span = callee.span.merge(close.span);
        Ok(Expr::new(
            ExprKind::Invocation {
                callee: Box::new(callee),
                args,
            },
            span,
        ))
    }
}
