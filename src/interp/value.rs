//! Runtime values for compiled programs

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::codegen::{Body, Thunk};
use crate::common::Span;
use crate::diagnostics::RuntimeError;

use super::context::Keyword;
use super::env::Scope;

/// Runtime value
#[derive(Clone)]
pub enum Value {
    /// Absence of a value; the only falsy value besides `false`
    Null,
    /// 64-bit float
    Number(f64),
    /// Immutable string
    String(Rc<str>),
    /// Boolean
    Bool(bool),
    /// User function closing over its definition scope
    Function(Rc<Function>),
    /// Keyword used as a value (bare lookup of a keyword name)
    Native(Keyword),
    /// Opaque value owned by the host
    Host(HostObject),
}

impl Value {
    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Bool(_) => "boolean",
            Value::Function(_) => "function",
            Value::Native(_) => "keyword",
            Value::Host(_) => "host object",
        }
    }

    /// Check if value is truthy. Only `null` and `false` are falsy; zero and
    /// the empty string are truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            _ => true,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Try to get as number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Rc<Function>> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_host(&self) -> Option<&HostObject> {
        match self {
            Value::Host(h) => Some(h),
            _ => None,
        }
    }

    /// Invoke this value as the target of `@name(...)`
    pub fn invoke(
        &self,
        name: &str,
        caller: &Scope,
        args: &[Thunk],
        span: Span,
    ) -> Result<Value, RuntimeError> {
        match self {
            Value::Function(func) => func.call(caller, args),
            Value::Native(keyword) => keyword.invoke(caller, args, span),
            other => Err(RuntimeError::NotCallable {
                name: name.to_string(),
                found: other.type_name(),
                span: span.into(),
            }),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<HostObject> for Value {
    fn from(h: HostObject) -> Self {
        Value::Host(h)
    }
}

fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{}", n)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{:?}", s),
            other => write!(f, "{}", other),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Number(n) => write_number(f, *n),
            Value::String(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Function(func) => {
                write!(f, "<function(")?;
                for (i, p) in func.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "@{}", p)?;
                }
                write!(f, ")>")
            }
            Value::Native(keyword) => write!(f, "<keyword {}>", keyword.name()),
            Value::Host(host) => write!(f, "<host {}>", host.type_name()),
        }
    }
}

/// Value equality: scalars by value, callables and host objects by identity
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Native(a), Value::Native(b)) => a.ptr_eq(b),
            (Value::Host(a), Value::Host(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

/// A user-defined function value
pub struct Function {
    params: Vec<Rc<str>>,
    body: Rc<Body>,
    captured: Scope,
}

impl Function {
    pub fn new(params: Vec<Rc<str>>, body: Rc<Body>, captured: Scope) -> Self {
        Self {
            params,
            body,
            captured,
        }
    }

    pub fn params(&self) -> &[Rc<str>] {
        &self.params
    }

    /// Scope the function was defined in
    pub fn captured(&self) -> &Scope {
        &self.captured
    }

    /// Call with unevaluated arguments.
    ///
    /// Arguments are evaluated left to right in the caller's scope and bound
    /// in a new frame whose parent is the captured scope. Missing trailing
    /// parameters are `null`; surplus arguments are evaluated and dropped.
    pub fn call(&self, caller: &Scope, args: &[Thunk]) -> Result<Value, RuntimeError> {
        tracing::trace!(
            params = self.params.len(),
            args = args.len(),
            "calling function"
        );
        let frame = self.captured.child();
        let mut supplied = args.iter();
        for param in &self.params {
            let value = match supplied.next() {
                Some(arg) => arg.eval(caller)?,
                None => Value::Null,
            };
            frame.declare(param.clone(), value);
        }
        for surplus in supplied {
            surplus.eval(caller)?;
        }
        self.body.run(&frame)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("params", &self.params)
            .field("body_len", &self.body.len())
            .finish_non_exhaustive()
    }
}

/// Host-owned value passed through programs untouched
#[derive(Clone)]
pub struct HostObject {
    type_name: &'static str,
    inner: Rc<dyn Any>,
}

impl HostObject {
    pub fn new<T: Any>(value: T) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            inner: Rc::new(value),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    pub fn ptr_eq(&self, other: &HostObject) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for HostObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostObject<{}>", self.type_name)
    }
}
