//! Built-in keywords
//!
//! Every keyword gets the calling scope and its unevaluated arguments. Which
//! arguments run, and in what order, is decided here; that is what makes
//! `if`, `any` and `all` lazy.

use crate::diagnostics::RuntimeError;

use super::context::{Args, Keyword, Keywords};
use super::env::Scope;
use super::value::{Function, Value};

/// Names that host registrations may not replace
pub const BUILTIN_NAMES: &[&str] = &["var", "set", "if", "function", "eq", "not", "any", "all"];

pub fn is_reserved(name: &str) -> bool {
    BUILTIN_NAMES.contains(&name) || matches!(name, "null" | "true" | "false")
}

pub(crate) fn install(keywords: &mut Keywords) {
    keywords.insert(Keyword::new("var", var));
    keywords.insert(Keyword::new("set", set));
    keywords.insert(Keyword::new("if", if_));
    keywords.insert(Keyword::new("function", function));
    keywords.insert(Keyword::new("eq", eq));
    keywords.insert(Keyword::new("not", not));
    keywords.insert(Keyword::new("any", any));
    keywords.insert(Keyword::new("all", all));
}

/// `var(@name)` / `var(@name, value)`: declare in the current frame
fn var(scope: &Scope, args: &Args<'_>) -> Result<Value, RuntimeError> {
    args.expect_arity(1, Some(2))?;
    let name = args.reference(0)?;
    let value = args.eval(1, scope)?;
    scope.declare(name, value.clone());
    Ok(value)
}

/// `set(@name, value)`: overwrite the nearest existing binding
fn set(scope: &Scope, args: &Args<'_>) -> Result<Value, RuntimeError> {
    args.expect_arity(2, Some(2))?;
    let name = args.reference(0)?;
    let value = args.eval(1, scope)?;
    if scope.assign(&name, value.clone()) {
        Ok(value)
    } else {
        Err(RuntimeError::unresolved(&*name, args.span()))
    }
}

/// `if(cond, then)` / `if(cond, then, else)`
fn if_(scope: &Scope, args: &Args<'_>) -> Result<Value, RuntimeError> {
    args.expect_arity(2, Some(3))?;
    if args.eval(0, scope)?.is_truthy() {
        args.eval(1, scope)
    } else {
        // An absent else branch evaluates to null
        args.eval(2, scope)
    }
}

/// `function({ body }, @param, ...)`: closure over the current scope
fn function(scope: &Scope, args: &Args<'_>) -> Result<Value, RuntimeError> {
    args.expect_arity(1, None)?;
    let body = args.block(0)?;
    let params = (1..args.len())
        .map(|index| args.reference(index))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Function(std::rc::Rc::new(Function::new(
        params,
        body,
        scope.clone(),
    ))))
}

fn eq(scope: &Scope, args: &Args<'_>) -> Result<Value, RuntimeError> {
    args.expect_arity(2, Some(2))?;
    let lhs = args.eval(0, scope)?;
    let rhs = args.eval(1, scope)?;
    Ok(Value::Bool(lhs == rhs))
}

fn not(scope: &Scope, args: &Args<'_>) -> Result<Value, RuntimeError> {
    args.expect_arity(1, Some(1))?;
    Ok(Value::Bool(!args.eval(0, scope)?.is_truthy()))
}

/// True at the first truthy argument; later arguments are not evaluated
fn any(scope: &Scope, args: &Args<'_>) -> Result<Value, RuntimeError> {
    for arg in args.iter() {
        if arg.eval(scope)?.is_truthy() {
            return Ok(Value::Bool(true));
        }
    }
    Ok(Value::Bool(false))
}

/// False at the first falsy argument; later arguments are not evaluated
fn all(scope: &Scope, args: &Args<'_>) -> Result<Value, RuntimeError> {
    for arg in args.iter() {
        if !arg.eval(scope)?.is_truthy() {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}
