//! Property-based tests for the built-in keywords.
//!
//! Programs are generated as source text from small atom pools so the
//! expected result can be computed directly in Rust.

use proptest::prelude::*;
use sprig::{Context, Value};

/// Atom source text paired with its truthiness
fn arb_atom() -> impl Strategy<Value = (String, bool)> {
    prop_oneof![
        Just(("null".to_string(), false)),
        Just(("false".to_string(), false)),
        Just(("true".to_string(), true)),
        (-1000i32..1000).prop_map(|n| (n.to_string(), true)),
        "[a-z ]{0,8}".prop_map(|s| (format!("\"{}\"", s), true)),
    ]
}

/// Scalar atom source text paired with the value it evaluates to
fn arb_scalar() -> impl Strategy<Value = (String, Value)> {
    prop_oneof![
        Just(("null".to_string(), Value::Null)),
        any::<bool>().prop_map(|b| (b.to_string(), Value::Bool(b))),
        (-50i32..50).prop_map(|n| (n.to_string(), Value::from(n))),
        "[a-c]{0,2}".prop_map(|s| (format!("'{}'", s), Value::from(s.as_str()))),
    ]
}

fn run(source: &str) -> Value {
    sprig::compile(source, &Context::new())
        .expect("generated program should compile")
        .run()
        .expect("generated program should run")
}

fn call(keyword: &str, atoms: &[(String, bool)]) -> String {
    let args: Vec<&str> = atoms.iter().map(|(src, _)| src.as_str()).collect();
    format!("{}({})", keyword, args.join(", "))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn any_is_logical_or(atoms in prop::collection::vec(arb_atom(), 0..6)) {
        let expected = atoms.iter().any(|(_, truthy)| *truthy);
        prop_assert_eq!(run(&call("any", &atoms)), Value::Bool(expected));
    }

    #[test]
    fn all_is_logical_and(atoms in prop::collection::vec(arb_atom(), 0..6)) {
        let expected = atoms.iter().all(|(_, truthy)| *truthy);
        prop_assert_eq!(run(&call("all", &atoms)), Value::Bool(expected));
    }

    #[test]
    fn not_inverts_truthiness(atom in arb_atom()) {
        let (src, truthy) = atom;
        prop_assert_eq!(run(&format!("not({})", src)), Value::Bool(!truthy));
    }

    #[test]
    fn if_follows_truthiness(atom in arb_atom()) {
        let (src, truthy) = atom;
        let expected = if truthy { 1.0 } else { 2.0 };
        prop_assert_eq!(run(&format!("if({}, {{1}}, {{2}})", src)), Value::Number(expected));
    }

    #[test]
    fn eq_matches_value_equality(lhs in arb_scalar(), rhs in arb_scalar()) {
        let source = format!("eq({}, {})", lhs.0, rhs.0);
        prop_assert_eq!(run(&source), Value::Bool(lhs.1 == rhs.1));
    }

    #[test]
    fn eq_is_symmetric(lhs in arb_scalar(), rhs in arb_scalar()) {
        let forward = run(&format!("eq({}, {})", lhs.0, rhs.0));
        let backward = run(&format!("eq({}, {})", rhs.0, lhs.0));
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn not_eq_is_negated_eq(lhs in arb_scalar(), rhs in arb_scalar()) {
        let eq = run(&format!("eq({}, {})", lhs.0, rhs.0));
        let ne = run(&format!("not(eq({}, {}))", lhs.0, rhs.0));
        prop_assert_eq!(ne, Value::Bool(!eq.is_truthy()));
    }

    #[test]
    fn var_then_lookup_roundtrips(name in "[a-z][a-z0-9_]{0,8}", scalar in arb_scalar()) {
        prop_assume!(!sprig::interp::builtins::is_reserved(&name));
        let source = format!("var(@{name}, {}) {name}", scalar.0);
        prop_assert_eq!(run(&source), scalar.1);
    }

    #[test]
    fn lexer_never_panics(source in "\\PC{0,40}") {
        let _ = sprig::lexer::lex(&source);
    }

    #[test]
    fn parser_never_panics(source in "[a-z@(){},'\" 0-9]{0,40}") {
        let _ = sprig::parse(&source);
    }
}
