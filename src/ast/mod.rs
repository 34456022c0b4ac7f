//! Abstract Syntax Tree for the Sprig language
//!
//! This module defines the expression tree produced by the parser. A whole
//! program is a single root [`ExprKind::Block`].

use crate::common::Span;
use serde::{Deserialize, Serialize};

/// Expression node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

/// Expression kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    /// Number or string constant
    Literal(Literal),
    /// Bare `name`, evaluated to its current value
    Lookup(String),
    /// `@name`, a handle to the name itself
    Reference(String),
    /// `callee(arg, ...)`
    Invocation { callee: Box<Expr>, args: Vec<Expr> },
    /// `{ expr* }`, a deferred sub-program
    Block(Vec<Expr>),
}

/// Literal values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Number(f64),
    String(String),
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Name carried by a lookup or reference
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Lookup(name) | ExprKind::Reference(name) => Some(name),
            _ => None,
        }
    }

    /// Expressions of a block, or `None` for any other kind
    pub fn block_items(&self) -> Option<&[Expr]> {
        match &self.kind {
            ExprKind::Block(items) => Some(items),
            _ => None,
        }
    }

    /// Whether this node may appear in callee position
    pub fn is_callable_shape(&self) -> bool {
        matches!(self.kind, ExprKind::Lookup(_) | ExprKind::Reference(_))
    }

    /// Short description used in diagnostics
    pub fn describe(&self) -> &'static str {
        match &self.kind {
            ExprKind::Literal(Literal::Number(_)) => "number literal",
            ExprKind::Literal(Literal::String(_)) => "string literal",
            ExprKind::Lookup(_) => "symbol",
            ExprKind::Reference(_) => "@reference",
            ExprKind::Invocation { .. } => "invocation",
            ExprKind::Block(_) => "block",
        }
    }
}
