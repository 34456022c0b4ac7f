//! Compiled, re-runnable programs

use std::rc::Rc;

use crate::diagnostics::{RuntimeError, SourceFile};
use crate::interp::{Context, Scope, Value};

use super::Body;

/// A compiled program bound to the context it was compiled against.
///
/// Compilation happens once; [`Program::run`] only re-executes the closures.
/// Each run starts from a fresh root scope, so runs do not observe each
/// other's declarations. Use [`Program::run_in`] to keep state between runs.
///
/// Recursion is bounded only by the native stack: a program that recurses
/// without end overflows it.
pub struct Program {
    body: Rc<Body>,
    context: Context,
    file: SourceFile,
}

impl Program {
    pub(crate) fn new(body: Body, context: Context, file: SourceFile) -> Self {
        Self {
            body: Rc::new(body),
            context,
            file,
        }
    }

    /// Run against a fresh root scope and return the last top-level value
    pub fn run(&self) -> Result<Value, RuntimeError> {
        self.run_in(&self.new_scope())
    }

    /// Run top-level expressions directly in `scope`
    pub fn run_in(&self, scope: &Scope) -> Result<Value, RuntimeError> {
        tracing::debug!(
            source = %self.file.name,
            expressions = self.body.len(),
            "running program"
        );
        self.body.run(scope)
    }

    /// Fresh root scope seeded from this program's context
    pub fn new_scope(&self) -> Scope {
        Scope::root(&self.context)
    }

    /// Attach this program's source text to a runtime error for rendering
    pub fn report(&self, error: RuntimeError) -> miette::Report {
        miette::Report::new(error).with_source_code(self.file.to_named_source())
    }

    pub fn source(&self) -> &SourceFile {
        &self.file
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Number of top-level expressions
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}
