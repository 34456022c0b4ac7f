//! Diagnostic reporting with source locations
//!
//! Compile-time errors carry their source text so `miette` can render the
//! offending snippet directly. Runtime errors only carry a span; the
//! [`Program`](crate::codegen::Program) that raised them attaches the source
//! when a report is built.

use crate::common::Span;
use miette::{Diagnostic, NamedSource, SourceSpan};
use std::sync::Arc;
use thiserror::Error;

/// Source file for error reporting
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub content: Arc<str>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: Arc::from(content.into()),
        }
    }

    /// Unnamed source, as handed to [`crate::compile`]
    pub fn anonymous(content: impl Into<String>) -> Self {
        Self::new("<input>", content)
    }

    pub fn to_named_source(&self) -> NamedSource<String> {
        NamedSource::new(self.name.clone(), self.content.to_string())
    }
}

/// Convert our Span to miette's SourceSpan
impl From<Span> for SourceSpan {
    fn from(span: Span) -> Self {
        SourceSpan::new(span.start.into(), span.len())
    }
}

/// Error raised while tokenizing, parsing or lowering a program
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CompileError {
    // === Lexical Errors ===
    #[error("Unexpected character `{found}`")]
    #[diagnostic(code(lex::unexpected_char))]
    UnexpectedChar {
        found: String,
        #[label("not valid here")]
        span: SourceSpan,
        #[source_code]
        src: NamedSource<String>,
    },

    #[error("Unterminated string literal")]
    #[diagnostic(
        code(lex::unterminated_string),
        help("close the string with a matching quote")
    )]
    UnterminatedString {
        #[label("string starts here")]
        span: SourceSpan,
        #[source_code]
        src: NamedSource<String>,
    },

    // === Syntax Errors ===
    #[error("Unexpected token: expected {expected}, found {found}")]
    #[diagnostic(code(syntax::unexpected_token))]
    UnexpectedToken {
        expected: String,
        found: String,
        #[label("unexpected token here")]
        span: SourceSpan,
        #[source_code]
        src: NamedSource<String>,
    },

    #[error("Unexpected end of input: expected {expected}")]
    #[diagnostic(code(syntax::unexpected_eof))]
    UnexpectedEof {
        expected: String,
        #[label("input ends here")]
        span: SourceSpan,
        #[source_code]
        src: NamedSource<String>,
    },

    #[error("Only a name or an `@name` reference can be invoked")]
    #[diagnostic(
        code(syntax::invalid_callee),
        help("bind the value with `var(@name, ...)` and invoke it as `@name(...)`")
    )]
    InvalidCallee {
        #[label("this expression cannot be invoked")]
        span: SourceSpan,
        #[source_code]
        src: NamedSource<String>,
    },
}

impl CompileError {
    /// True when more input could still complete the program
    pub fn is_incomplete(&self) -> bool {
        matches!(
            self,
            CompileError::UnexpectedEof { .. } | CompileError::UnterminatedString { .. }
        )
    }
}

/// Error raised while running a compiled program
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum RuntimeError {
    #[error("Unresolved symbol `{name}`")]
    #[diagnostic(
        code(runtime::unresolved_symbol),
        help("declare it first with `var(@{name})`")
    )]
    UnresolvedSymbol {
        name: String,
        #[label("not bound in this scope")]
        span: SourceSpan,
    },

    #[error("`{name}` is not callable (found {found})")]
    #[diagnostic(code(runtime::not_callable))]
    NotCallable {
        name: String,
        found: &'static str,
        #[label("invoked here")]
        span: SourceSpan,
    },

    #[error("`{keyword}` expects {expected} arguments, got {got}")]
    #[diagnostic(code(runtime::arity))]
    Arity {
        keyword: String,
        expected: String,
        got: usize,
        #[label("called here")]
        span: SourceSpan,
    },

    #[error("`{keyword}` expects {expected} as argument {position}, found {found}")]
    #[diagnostic(code(runtime::type_mismatch))]
    TypeMismatch {
        keyword: String,
        position: usize,
        expected: String,
        found: String,
        #[label("wrong kind of argument")]
        span: SourceSpan,
    },

    #[error("`{keyword}` failed: {message}")]
    #[diagnostic(code(runtime::host))]
    Host {
        keyword: String,
        message: String,
        #[label("raised here")]
        span: SourceSpan,
    },
}

impl RuntimeError {
    pub fn unresolved(name: impl Into<String>, span: Span) -> Self {
        RuntimeError::UnresolvedSymbol {
            name: name.into(),
            span: span.into(),
        }
    }

    /// Span of the expression that raised the error
    pub fn span(&self) -> SourceSpan {
        match self {
            RuntimeError::UnresolvedSymbol { span, .. }
            | RuntimeError::NotCallable { span, .. }
            | RuntimeError::Arity { span, .. }
            | RuntimeError::TypeMismatch { span, .. }
            | RuntimeError::Host { span, .. } => *span,
        }
    }
}
