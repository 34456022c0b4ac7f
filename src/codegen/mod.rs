//! Lowering of the expression tree into closures
//!
//! The tree is walked exactly once. Each node becomes a [`Thunk`]; the root
//! block becomes the [`Body`] of a [`Program`]. Invocation arguments are
//! lowered but never evaluated by the call site: the callee receives the
//! argument thunks and decides what to run, how often and in which order.

mod program;
mod thunk;

pub use program::Program;
pub use thunk::{Body, Eval, Shape, Thunk};

use std::rc::Rc;

use crate::ast::{Expr, ExprKind, Literal};
use crate::common::Span;
use crate::diagnostics::{CompileError, RuntimeError, SourceFile};
use crate::interp::{Keyword, Keywords, Value};

/// Callee of an invocation, resolved once while lowering
enum Callee {
    /// Bare name found in the keyword table
    Keyword(Keyword),
    /// `@name(...)`: invoke the value bound to `name`
    Reference(Rc<str>),
    /// Bare name that is not a keyword; resolved like a reference at run time
    Dynamic(Rc<str>),
}

/// Closure compiler for one source file
pub struct Compiler<'a> {
    keywords: &'a Keywords,
    file: &'a SourceFile,
}

impl<'a> Compiler<'a> {
    pub fn new(keywords: &'a Keywords, file: &'a SourceFile) -> Self {
        Self { keywords, file }
    }

    /// Lower a root expression. A root block runs directly in the scope the
    /// program is started with; any other node becomes a one-item body.
    pub fn lower_program(&self, root: &Expr) -> Result<Body, CompileError> {
        match &root.kind {
            ExprKind::Block(items) => self.lower_body(items, root.span),
            _ => Ok(Body::new(vec![self.lower(root)?], root.span)),
        }
    }

    fn lower_body(&self, items: &[Expr], span: Span) -> Result<Body, CompileError> {
        let thunks = items
            .iter()
            .map(|item| self.lower(item))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Body::new(thunks, span))
    }

    /// Lower a single expression node
    pub fn lower(&self, expr: &Expr) -> Result<Thunk, CompileError> {
        let span = expr.span;
        match &expr.kind {
            ExprKind::Literal(lit) => {
                let value = match lit {
                    Literal::Number(n) => Value::Number(*n),
                    Literal::String(s) => Value::from(s.as_str()),
                };
                Ok(Thunk::new(span, Shape::Literal, move |_| Ok(value.clone())))
            }

            ExprKind::Lookup(name) => {
                let name: Rc<str> = Rc::from(name.as_str());
                let key = name.clone();
                Ok(Thunk::new(span, Shape::Lookup(name), move |scope| {
                    scope
                        .lookup(&key)
                        .ok_or_else(|| RuntimeError::unresolved(&*key, span))
                }))
            }

            // Outside callee position a reference yields the bound value
            // itself; a function is not invoked.
            ExprKind::Reference(name) => {
                let name: Rc<str> = Rc::from(name.as_str());
                let key = name.clone();
                Ok(Thunk::new(span, Shape::Reference(name), move |scope| {
                    scope
                        .lookup(&key)
                        .ok_or_else(|| RuntimeError::unresolved(&*key, span))
                }))
            }

            ExprKind::Block(items) => {
                let body = Rc::new(self.lower_body(items, span)?);
                let run = body.clone();
                Ok(Thunk::new(span, Shape::Block(body), move |scope| {
                    let inner = scope.child();
                    run.run(&inner)
                }))
            }

            ExprKind::Invocation { callee, args } => self.lower_invocation(callee, args, span),
        }
    }

    fn lower_invocation(
        &self,
        callee: &Expr,
        args: &[Expr],
        span: Span,
    ) -> Result<Thunk, CompileError> {
        let callee = self.resolve_callee(callee)?;
        let args: Rc<[Thunk]> = args
            .iter()
            .map(|arg| self.lower(arg))
            .collect::<Result<Vec<_>, _>>()?
            .into();

        let thunk = match callee {
            Callee::Keyword(keyword) => Thunk::new(span, Shape::Invocation, move |scope| {
                keyword.invoke(scope, &args, span)
            }),
            Callee::Reference(name) | Callee::Dynamic(name) => {
                Thunk::new(span, Shape::Invocation, move |scope| {
                    let target = scope
                        .lookup(&name)
                        .ok_or_else(|| RuntimeError::unresolved(&*name, span))?;
                    target.invoke(&name, scope, &args, span)
                })
            }
        };
        Ok(thunk)
    }

    fn resolve_callee(&self, callee: &Expr) -> Result<Callee, CompileError> {
        match &callee.kind {
            ExprKind::Lookup(name) => Ok(match self.keywords.get(name) {
                Some(keyword) => Callee::Keyword(keyword.clone()),
                None => Callee::Dynamic(Rc::from(name.as_str())),
            }),
            ExprKind::Reference(name) => Ok(Callee::Reference(Rc::from(name.as_str()))),
            _ => Err(CompileError::InvalidCallee {
                span: callee.span.into(),
                src: self.file.to_named_source(),
            }),
        }
    }
}
