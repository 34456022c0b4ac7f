//! Error reporting tests
//!
//! Compile errors stop compilation; runtime errors abort the current run and
//! carry the span of the expression that raised them.

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme};
use sprig::{CompileError, Context, RuntimeError, Value};

fn compile_err(source: &str) -> CompileError {
    match sprig::compile(source, &Context::new()) {
        Ok(_) => panic!("Expected a compile error for {:?}", source),
        Err(e) => e,
    }
}

fn runtime_err(source: &str) -> RuntimeError {
    let program = sprig::compile(source, &Context::new()).expect("program should compile");
    match program.run() {
        Ok(v) => panic!("Expected a runtime error, got {:?}", v),
        Err(e) => e,
    }
}

fn render(diagnostic: &dyn Diagnostic) -> String {
    let mut out = String::new();
    GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor())
        .render_report(&mut out, diagnostic)
        .unwrap();
    out
}

// ==================== Compile Errors ====================

#[test]
fn test_compile_error_unexpected_char() {
    let err = compile_err("var(@foo, 1) ~");
    assert!(matches!(err, CompileError::UnexpectedChar { .. }));
    assert_eq!(err.to_string(), "Unexpected character `~`");
}

#[test]
fn test_compile_error_unterminated_string_is_incomplete() {
    let err = compile_err("var(@s, 'open");
    assert!(matches!(err, CompileError::UnterminatedString { .. }));
    assert!(err.is_incomplete());
}

#[test]
fn test_compile_error_eof_is_incomplete() {
    assert!(compile_err("if(foo, {").is_incomplete());
    assert!(!compile_err("if(foo, })").is_incomplete());
}

#[test]
fn test_compile_error_codes() {
    let err = compile_err("57()");
    assert_eq!(
        err.code().map(|c| c.to_string()),
        Some("syntax::invalid_callee".to_string())
    );
}

#[test]
fn test_compile_error_renders_source_snippet() {
    let err = compile_err("var(@foo, 1)\neq(foo 7)");
    let out = render(&err);
    assert!(out.contains("expected `,` or `)`"), "{}", out);
    assert!(out.contains("eq(foo 7)"), "{}", out);
    assert!(out.contains("unexpected token here"), "{}", out);
}

#[test]
fn test_compile_never_evaluates() {
    // Compiling a program that would fail at run time succeeds
    assert!(sprig::compile("undefined_name eq(1)", &Context::new()).is_ok());
}

// ==================== Runtime Errors ====================

#[test]
fn test_unresolved_symbol() {
    match runtime_err("var(@x, 1)\nmissing") {
        RuntimeError::UnresolvedSymbol { name, span } => {
            assert_eq!(name, "missing");
            assert_eq!(span.offset(), 11);
            assert_eq!(span.len(), 7);
        }
        other => panic!("Expected UnresolvedSymbol, got {:?}", other),
    }
}

#[test]
fn test_invoking_non_function() {
    match runtime_err("var(@x, 1) @x()") {
        RuntimeError::NotCallable { name, found, span } => {
            assert_eq!(name, "x");
            assert_eq!(found, "number");
            assert_eq!(span.offset(), 11);
        }
        other => panic!("Expected NotCallable, got {:?}", other),
    }
}

#[test]
fn test_invoking_unbound_name() {
    assert!(matches!(
        runtime_err("nothing_here(1)"),
        RuntimeError::UnresolvedSymbol { .. }
    ));
}

#[test]
fn test_arity_errors() {
    match runtime_err("eq(1)") {
        RuntimeError::Arity {
            keyword,
            expected,
            got,
            ..
        } => {
            assert_eq!(keyword, "eq");
            assert_eq!(expected, "2");
            assert_eq!(got, 1);
        }
        other => panic!("Expected Arity, got {:?}", other),
    }
    assert_eq!(
        runtime_err("if(1)").to_string(),
        "`if` expects 2 to 3 arguments, got 1"
    );
    assert_eq!(
        runtime_err("function()").to_string(),
        "`function` expects at least 1 arguments, got 0"
    );
    assert!(matches!(runtime_err("var()"), RuntimeError::Arity { .. }));
    assert!(matches!(runtime_err("not(1, 2)"), RuntimeError::Arity { .. }));
}

#[test]
fn test_var_requires_reference() {
    match runtime_err("var(foo)") {
        RuntimeError::TypeMismatch {
            keyword,
            position,
            expected,
            found,
            ..
        } => {
            assert_eq!(keyword, "var");
            assert_eq!(position, 1);
            assert_eq!(expected, "an @reference");
            assert_eq!(found, "a symbol");
        }
        other => panic!("Expected TypeMismatch, got {:?}", other),
    }
}

#[test]
fn test_function_requires_block_body() {
    match runtime_err("function(57)") {
        RuntimeError::TypeMismatch {
            expected, found, ..
        } => {
            assert_eq!(expected, "a block");
            assert_eq!(found, "a literal");
        }
        other => panic!("Expected TypeMismatch, got {:?}", other),
    }
}

#[test]
fn test_function_parameters_must_be_references() {
    match runtime_err("function({}, @a, 1)") {
        RuntimeError::TypeMismatch { position, span, .. } => {
            assert_eq!(position, 3);
            assert_eq!(span.offset(), 17);
        }
        other => panic!("Expected TypeMismatch, got {:?}", other),
    }
}

#[test]
fn test_set_requires_existing_binding() {
    match runtime_err("set(@ghost, 1)") {
        RuntimeError::UnresolvedSymbol { name, .. } => assert_eq!(name, "ghost"),
        other => panic!("Expected UnresolvedSymbol, got {:?}", other),
    }
}

#[test]
fn test_error_inside_function_body_propagates() {
    let err = runtime_err("var(@f, function({ eq(1) })) @f()");
    assert!(matches!(err, RuntimeError::Arity { .. }));
    // Span points into the body, not the call site
    assert_eq!(err.span().offset(), 19);
}

#[test]
fn test_untaken_error_is_not_raised() {
    let program = sprig::compile("if(false, { eq(1) }, { 57 })", &Context::new()).unwrap();
    assert_eq!(program.run().unwrap(), Value::Number(57.0));
}

#[test]
fn test_effects_before_error_are_kept() {
    let program = sprig::compile("set(@n, 1) missing", &Context::new()).unwrap();
    let scope = program.new_scope();
    scope.declare("n", Value::from(0));
    assert!(program.run_in(&scope).is_err());
    assert_eq!(scope.lookup("n"), Some(Value::Number(1.0)));
}

#[test]
fn test_program_usable_after_error() {
    let program = sprig::compile("if(flag, { missing }, { 57 })", &Context::new()).unwrap();
    let scope = program.new_scope();
    scope.declare("flag", Value::Bool(true));
    assert!(program.run_in(&scope).is_err());
    let scope = program.new_scope();
    scope.declare("flag", Value::Bool(false));
    assert_eq!(program.run_in(&scope).unwrap(), Value::Number(57.0));
}

// ==================== Reports ====================

#[test]
fn test_runtime_report_attaches_source() {
    let program = sprig::compile("var(@x, 1)\nmissing", &Context::new()).unwrap();
    let err = program.run().unwrap_err();
    let report = program.report(err);
    let out = render(&*report);
    assert!(out.contains("Unresolved symbol `missing`"), "{}", out);
    assert!(out.contains("missing"), "{}", out);
    assert!(out.contains("not bound in this scope"), "{}", out);
}

#[test]
fn test_eval_returns_report() {
    let err = sprig::eval("@nope()").unwrap_err();
    assert_eq!(err.to_string(), "Unresolved symbol `nope`");
}
