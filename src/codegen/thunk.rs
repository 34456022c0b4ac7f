//! Compiled closures
//!
//! Every expression node lowers to one [`Thunk`]. A thunk owns no mutable
//! state; everything it reads or writes lives in the [`Scope`] it is
//! evaluated against.

use std::fmt;
use std::rc::Rc;

use crate::common::Span;
use crate::diagnostics::RuntimeError;
use crate::interp::{Scope, Value};

/// Signature of a compiled closure
pub type Eval = dyn Fn(&Scope) -> Result<Value, RuntimeError>;

/// Syntactic shape of the node a thunk was lowered from.
///
/// Keywords inspect the shape of their arguments: `var` needs a reference to
/// bind, `function` needs a block for its body.
#[derive(Debug, Clone)]
pub enum Shape {
    Literal,
    Lookup(Rc<str>),
    Reference(Rc<str>),
    Invocation,
    Block(Rc<Body>),
}

impl Shape {
    pub fn describe(&self) -> &'static str {
        match self {
            Shape::Literal => "a literal",
            Shape::Lookup(_) => "a symbol",
            Shape::Reference(_) => "an @reference",
            Shape::Invocation => "an invocation",
            Shape::Block(_) => "a block",
        }
    }
}

/// An unevaluated, compiled expression
#[derive(Clone)]
pub struct Thunk {
    span: Span,
    shape: Shape,
    eval: Rc<Eval>,
}

impl Thunk {
    pub fn new(
        span: Span,
        shape: Shape,
        eval: impl Fn(&Scope) -> Result<Value, RuntimeError> + 'static,
    ) -> Self {
        Self {
            span,
            shape,
            eval: Rc::new(eval),
        }
    }

    /// Run the closure against `scope`
    pub fn eval(&self, scope: &Scope) -> Result<Value, RuntimeError> {
        (self.eval)(scope)
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Name of an `@name` argument
    pub fn reference(&self) -> Option<&Rc<str>> {
        match &self.shape {
            Shape::Reference(name) => Some(name),
            _ => None,
        }
    }

    /// Body of a `{ ... }` argument
    pub fn block(&self) -> Option<&Rc<Body>> {
        match &self.shape {
            Shape::Block(body) => Some(body),
            _ => None,
        }
    }
}

impl fmt::Debug for Thunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thunk")
            .field("span", &self.span)
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

/// Ordered sequence of compiled expressions
#[derive(Debug, Default)]
pub struct Body {
    items: Vec<Thunk>,
    span: Span,
}

impl Body {
    pub fn new(items: Vec<Thunk>, span: Span) -> Self {
        Self { items, span }
    }

    /// Evaluate every expression in order; the last value wins, empty is null
    pub fn run(&self, scope: &Scope) -> Result<Value, RuntimeError> {
        let mut last = Value::Null;
        for item in &self.items {
            last = item.eval(scope)?;
        }
        Ok(last)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn span(&self) -> Span {
        self.span
    }
}
