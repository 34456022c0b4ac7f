//! Sprig: an embeddable closure compiler for a small Lisp-like language
//!
//! Source text is compiled once into a tree of closures. Running the result
//! re-executes only those closures, so a host can compile user logic up front
//! and invoke it as often as it likes.
//!
//! # Architecture
//!
//! ```text
//! Source → Lexer → Parser → Expr tree → Compiler → Program (closures)
//! ```
//!
//! # Example
//!
//! ```
//! use sprig::{Context, Value};
//!
//! let program = sprig::compile(
//!     r#"
//!     var(@foo, 7)
//!     if(eq(foo, 7), {
//!       57
//!     }, {
//!       67
//!     })
//!     "#,
//!     &Context::new(),
//! )
//! .unwrap();
//!
//! assert_eq!(program.run().unwrap(), Value::Number(57.0));
//! ```
//!
//! Keyword arguments are handed over unevaluated; each keyword decides what
//! to evaluate. Hosts add their own keywords through [`Context::register`].

pub mod ast;
pub mod codegen;
pub mod common;
pub mod diagnostics;
pub mod interp;
pub mod lexer;
pub mod parser;
pub mod repl;

// Re-export diagnostics for convenience
pub use diagnostics::{CompileError, RuntimeError, SourceFile};

// Re-exports for convenience
pub use ast::Expr;
pub use codegen::Program;
pub use interp::{Args, Context, HostError, HostObject, Scope, Value};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compile source text against a context
pub fn compile(source: &str, context: &Context) -> Result<Program, CompileError> {
    compile_file(&SourceFile::anonymous(source), context)
}

/// Compile a named source file against a context
pub fn compile_file(file: &SourceFile, context: &Context) -> Result<Program, CompileError> {
    let root = parser::parse_file(file)?;
    let body = codegen::Compiler::new(context.keywords(), file).lower_program(&root)?;
    tracing::debug!(
        source = %file.name,
        expressions = body.len(),
        "compiled program"
    );
    Ok(Program::new(body, context.clone(), file.clone()))
}

/// Parse source code to an expression tree
pub fn parse(source: &str) -> Result<Expr, CompileError> {
    parser::parse(source)
}

/// Compile and run source with the default context
pub fn eval(source: &str) -> miette::Result<Value> {
    let program = compile(source, &Context::new())?;
    program.run().map_err(|e| program.report(e))
}
