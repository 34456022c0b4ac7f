//! Root context: keyword table and host extensions
//!
//! A [`Context`] is what a host hands to [`crate::compile`]. It carries the
//! keyword table (built-ins plus anything the host registers) and named root
//! values. Bare callee names are resolved against the keyword table while
//! compiling; every run then starts from a root scope seeded from the same
//! context.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use indexmap::IndexMap;
use miette::Diagnostic;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::codegen::{Body, Thunk};
use crate::common::Span;
use crate::diagnostics::RuntimeError;

use super::builtins;
use super::env::Scope;
use super::value::Value;

/// Native keyword implementation: receives the calling scope and the
/// unevaluated arguments, and decides what to evaluate.
pub type KeywordFn = dyn Fn(&Scope, &Args<'_>) -> Result<Value, RuntimeError> + Send + Sync;

/// A named native callable
#[derive(Clone)]
pub struct Keyword {
    name: Arc<str>,
    func: Arc<KeywordFn>,
}

impl Keyword {
    pub fn new<F>(name: &str, func: F) -> Self
    where
        F: Fn(&Scope, &Args<'_>) -> Result<Value, RuntimeError> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke with the call site's argument thunks
    pub fn invoke(
        &self,
        scope: &Scope,
        args: &[Thunk],
        span: Span,
    ) -> Result<Value, RuntimeError> {
        (self.func)(scope, &Args::new(&self.name, span, args))
    }

    pub fn ptr_eq(&self, other: &Keyword) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keyword({})", self.name)
    }
}

/// Name → keyword table, shared read-only between compilations
#[derive(Debug, Clone, Default)]
pub struct Keywords {
    table: FxHashMap<String, Keyword>,
}

impl Keywords {
    /// Table holding only the built-in keywords
    pub fn builtins() -> Self {
        let mut keywords = Keywords::default();
        builtins::install(&mut keywords);
        keywords
    }

    pub fn get(&self, name: &str) -> Option<&Keyword> {
        self.table.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    /// Insert a keyword, returning the one it replaced
    pub fn insert(&mut self, keyword: Keyword) -> Option<Keyword> {
        self.table.insert(keyword.name().to_string(), keyword)
    }

    /// Sorted keyword names
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.table.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Error raised while a host extends a context
#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum HostError {
    #[error("`{name}` is a built-in keyword and cannot be redefined")]
    #[diagnostic(code(host::reserved))]
    Reserved { name: String },

    #[error("`{name}` is not a valid identifier")]
    #[diagnostic(code(host::invalid_name))]
    InvalidName { name: String },
}

/// Keyword table plus root values handed to the compiler
#[derive(Debug, Clone)]
pub struct Context {
    keywords: Arc<Keywords>,
    values: IndexMap<String, Value>,
}

impl Context {
    /// Context with the built-in keywords and the `null`, `true` and `false`
    /// constants
    pub fn new() -> Self {
        Self::with_keywords(Arc::new(Keywords::builtins()))
    }

    /// Context built on an existing, possibly shared, keyword table, with the
    /// same root constants as [`Context::new`]
    pub fn with_keywords(keywords: Arc<Keywords>) -> Self {
        let mut values = IndexMap::new();
        values.insert("null".to_string(), Value::Null);
        values.insert("true".to_string(), Value::Bool(true));
        values.insert("false".to_string(), Value::Bool(false));
        Self { keywords, values }
    }

    /// Register a native keyword. A later registration under the same name
    /// replaces an earlier one; built-in names are reserved.
    pub fn register<F>(&mut self, name: &str, func: F) -> Result<&mut Self, HostError>
    where
        F: Fn(&Scope, &Args<'_>) -> Result<Value, RuntimeError> + Send + Sync + 'static,
    {
        self.check_name(name)?;
        let replaced = Arc::make_mut(&mut self.keywords).insert(Keyword::new(name, func));
        tracing::debug!(name, replaced = replaced.is_some(), "registered keyword");
        Ok(self)
    }

    /// Bind a value in the root scope of every run
    pub fn define(&mut self, name: &str, value: impl Into<Value>) -> Result<&mut Self, HostError> {
        self.check_name(name)?;
        self.values.insert(name.to_string(), value.into());
        tracing::debug!(name, "defined root value");
        Ok(self)
    }

    fn check_name(&self, name: &str) -> Result<(), HostError> {
        let mut chars = name.chars();
        let valid = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(HostError::InvalidName {
                name: name.to_string(),
            });
        }
        if builtins::is_reserved(name) {
            return Err(HostError::Reserved {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    pub fn keywords(&self) -> &Arc<Keywords> {
        &self.keywords
    }

    pub fn values(&self) -> &IndexMap<String, Value> {
        &self.values
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

/// Arguments of one keyword call: the keyword name, the call-site span and
/// the unevaluated argument thunks
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    keyword: &'a str,
    span: Span,
    thunks: &'a [Thunk],
}

impl<'a> Args<'a> {
    pub fn new(keyword: &'a str, span: Span, thunks: &'a [Thunk]) -> Self {
        Self {
            keyword,
            span,
            thunks,
        }
    }

    pub fn keyword(&self) -> &'a str {
        self.keyword
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn len(&self) -> usize {
        self.thunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thunks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a Thunk> {
        self.thunks.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'a, Thunk> {
        self.thunks.iter()
    }

    pub fn thunks(&self) -> &'a [Thunk] {
        self.thunks
    }

    /// Evaluate argument `index`; an absent argument is `null`
    pub fn eval(&self, index: usize, scope: &Scope) -> Result<Value, RuntimeError> {
        match self.thunks.get(index) {
            Some(thunk) => thunk.eval(scope),
            None => Ok(Value::Null),
        }
    }

    /// Evaluate every argument left to right
    pub fn eval_all(&self, scope: &Scope) -> Result<Vec<Value>, RuntimeError> {
        self.thunks.iter().map(|thunk| thunk.eval(scope)).collect()
    }

    /// Fail unless `min <= len <= max` (no upper bound when `max` is `None`)
    pub fn expect_arity(&self, min: usize, max: Option<usize>) -> Result<(), RuntimeError> {
        let got = self.len();
        if got >= min && max.is_none_or(|max| got <= max) {
            return Ok(());
        }
        let expected = match max {
            Some(max) if max == min => min.to_string(),
            Some(max) => format!("{} to {}", min, max),
            None => format!("at least {}", min),
        };
        Err(RuntimeError::Arity {
            keyword: self.keyword.to_string(),
            expected,
            got,
            span: self.span.into(),
        })
    }

    /// Name of an `@name` argument
    pub fn reference(&self, index: usize) -> Result<Rc<str>, RuntimeError> {
        match self.thunks.get(index) {
            Some(thunk) => thunk
                .reference()
                .cloned()
                .ok_or_else(|| self.type_mismatch(index, "an @reference", thunk.shape().describe())),
            None => Err(self.type_mismatch(index, "an @reference", "nothing")),
        }
    }

    /// Body of a `{ ... }` argument
    pub fn block(&self, index: usize) -> Result<Rc<Body>, RuntimeError> {
        match self.thunks.get(index) {
            Some(thunk) => thunk
                .block()
                .cloned()
                .ok_or_else(|| self.type_mismatch(index, "a block", thunk.shape().describe())),
            None => Err(self.type_mismatch(index, "a block", "nothing")),
        }
    }

    /// Type error for argument `index` (zero-based)
    pub fn type_mismatch(&self, index: usize, expected: &str, found: &str) -> RuntimeError {
        let span = self.thunks.get(index).map_or(self.span, Thunk::span);
        RuntimeError::TypeMismatch {
            keyword: self.keyword.to_string(),
            position: index + 1,
            expected: expected.to_string(),
            found: found.to_string(),
            span: span.into(),
        }
    }

    /// Host-defined failure at this call site
    pub fn fail(&self, message: impl Into<String>) -> RuntimeError {
        RuntimeError::Host {
            keyword: self.keyword.to_string(),
            message: message.into(),
            span: self.span.into(),
        }
    }
}
