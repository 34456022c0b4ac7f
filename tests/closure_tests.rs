//! Function and scope tests
//!
//! Functions close over the scope they are defined in, not the scope they
//! are called from.

use sprig::{Context, RuntimeError, Value};

fn run(source: &str) -> Result<Value, RuntimeError> {
    let program = sprig::compile(source, &Context::new()).expect("program should compile");
    program.run()
}

fn number(source: &str) -> f64 {
    match run(source) {
        Ok(Value::Number(n)) => n,
        other => panic!("Expected a number, got {:?}", other),
    }
}

#[test]
fn test_supplied_parameters_resolve_to_arguments() {
    let source = r#"
var(@second, function({ b }, @a, @b))
@second(1, 2)
"#;
    assert_eq!(number(source), 2.0);
}

#[test]
fn test_unsupplied_parameters_are_null() {
    let source = r#"
var(@second, function({ b }, @a, @b))
@second(1)
"#;
    assert_eq!(run(source).unwrap(), Value::Null);
}

#[test]
fn test_surplus_arguments_are_evaluated_and_dropped() {
    let source = r#"
var(@count, 0)
var(@first, function({ a }, @a))
var(@result, @first(5, set(@count, 1)))
if(eq(count, 1), { result })
"#;
    assert_eq!(number(source), 5.0);
}

#[test]
fn test_reference_without_call_yields_function() {
    let value = run("var(@f, function({ 1 })) @f").unwrap();
    assert!(value.as_function().is_some());
}

#[test]
fn test_bare_name_invokes_user_function() {
    let source = r#"
var(@twice, function({ eq(x, x) }, @x))
twice(3)
"#;
    assert_eq!(run(source).unwrap(), Value::Bool(true));
}

#[test]
fn test_function_sees_definition_scope() {
    let source = r#"
var(@x, 1)
var(@get_x, function({ x }))
var(@call_with_local, function({
  var(@x, 2)
  @get_x()
}))
@call_with_local()
"#;
    // The callee's own frame has x = 2, but get_x closes over the root
    assert_eq!(number(source), 1.0);
}

#[test]
fn test_caller_locals_are_invisible() {
    let source = r#"
var(@read_local, function({ only_in_caller }))
var(@caller, function({
  var(@only_in_caller, 7)
  @read_local()
}))
@caller()
"#;
    match run(source) {
        Err(RuntimeError::UnresolvedSymbol { name, .. }) => assert_eq!(name, "only_in_caller"),
        other => panic!("Expected UnresolvedSymbol, got {:?}", other),
    }
}

#[test]
fn test_captured_scope_outlives_defining_call() {
    let source = r#"
var(@make, function({
  function({ secret })
}, @secret))
var(@reveal, @make(42))
@reveal()
"#;
    assert_eq!(number(source), 42.0);
}

#[test]
fn test_each_call_gets_a_fresh_frame() {
    let source = r#"
var(@make, function({
  function({ v })
}, @v))
var(@a, @make(1))
var(@b, @make(2))
all(eq(@a(), 1), eq(@b(), 2))
"#;
    assert_eq!(run(source).unwrap(), Value::Bool(true));
}

#[test]
fn test_closure_state_is_shared_through_captured_frame() {
    let source = r#"
var(@make_toggle, function({
  var(@state, false)
  function({
    set(@state, not(state))
  })
}))
var(@toggle, @make_toggle())
@toggle()
@toggle()
@toggle()
"#;
    assert_eq!(run(source).unwrap(), Value::Bool(true));
}

#[test]
fn test_later_declarations_in_live_enclosing_scope_are_visible() {
    let source = r#"
var(@f, function({ y }))
var(@y, 3)
@f()
"#;
    assert_eq!(number(source), 3.0);
}

#[test]
fn test_parameter_shadows_outer_binding() {
    let source = r#"
var(@x, 1)
var(@id, function({ x }, @x))
@id(9)
"#;
    assert_eq!(number(source), 9.0);
}

#[test]
fn test_var_inside_function_does_not_leak() {
    let source = r#"
var(@f, function({ var(@inner, 1) }))
@f()
inner
"#;
    assert!(matches!(
        run(source),
        Err(RuntimeError::UnresolvedSymbol { .. })
    ));
}

#[test]
fn test_recursion() {
    // Counts down through nested calls using only eq/if
    let source = r#"
var(@down, function({
  if(eq(n, 0), { "done" }, {
    if(eq(n, 1), { @down(0) }, { @down(1) })
  })
}, @n))
@down(2)
"#;
    assert_eq!(run(source).unwrap(), Value::from("done"));
}

#[test]
fn test_higher_order_function() {
    let source = r#"
var(@apply, function({ @f(arg) }, @f, @arg))
var(@negate, function({ not(v) }, @v))
@apply(@negate, null)
"#;
    assert_eq!(run(source).unwrap(), Value::Bool(true));
}

#[test]
fn test_block_body_evaluated_each_call() {
    let source = r#"
var(@calls, 0)
var(@bump, function({
  if(eq(calls, 0), { set(@calls, 1) }, { set(@calls, 2) })
}))
@bump()
@bump()
calls
"#;
    assert_eq!(number(source), 2.0);
}
