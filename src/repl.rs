//! Interactive REPL
//!
//! Every entry is compiled on its own but runs in one persistent scope, so
//! `var` declarations carry over to later entries.

use miette::{IntoDiagnostic, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::diagnostics::SourceFile;
use crate::interp::{Context, Scope, Value};

/// REPL state: the context entries compile against and the shared scope
pub struct Session {
    context: Context,
    scope: Scope,
    entries: usize,
}

impl Session {
    pub fn new(context: Context) -> Self {
        let scope = Scope::root(&context);
        Self {
            context,
            scope,
            entries: 0,
        }
    }

    /// Compile and run one entry in the session scope
    pub fn eval(&mut self, source: &str) -> Result<Value> {
        self.entries += 1;
        let file = SourceFile::new(format!("<repl:{}>", self.entries), source);
        let program = crate::compile_file(&file, &self.context)?;
        program.run_in(&self.scope).map_err(|e| program.report(e))
    }

    /// Whether `source` stops in the middle of an expression
    pub fn is_incomplete(source: &str) -> bool {
        matches!(crate::parser::parse(source), Err(e) if e.is_incomplete())
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }
}

/// Run the REPL on stdin/stdout until `:quit` or end of input
pub fn run(context: Context) -> Result<()> {
    println!("Sprig REPL v{}", env!("CARGO_PKG_VERSION"));
    println!("Type :help for help, :quit to exit");
    println!();

    let mut editor = DefaultEditor::new().into_diagnostic()?;
    let mut session = Session::new(context);
    let mut buffer = String::new();

    loop {
        let prompt = if buffer.is_empty() { "sprig> " } else { "  ...> " };
        let line = match editor.readline(prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                buffer.clear();
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e).into_diagnostic(),
        };

        let trimmed = line.trim();
        if buffer.is_empty() {
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with(':') {
                let _ = editor.add_history_entry(trimmed);
                if !command(&session, trimmed) {
                    break;
                }
                continue;
            }
        }

        buffer.push_str(&line);
        buffer.push('\n');
        if Session::is_incomplete(&buffer) {
            continue;
        }

        let _ = editor.add_history_entry(buffer.trim_end());
        match session.eval(&buffer) {
            Ok(value) => println!("{}", value),
            Err(report) => eprintln!("{:?}", report),
        }
        buffer.clear();
    }

    println!("Goodbye!");
    Ok(())
}

/// Handle a `:command`; returns false when the REPL should exit
fn command(session: &Session, input: &str) -> bool {
    match input {
        ":quit" | ":q" => return false,
        ":help" | ":h" => {
            println!("Commands:");
            println!("  :help, :h      Show this help");
            println!("  :quit, :q      Exit the REPL");
            println!("  :scope         List bindings declared in this session");
            println!("  :ast <source>  Show the parsed expression tree");
            println!();
        }
        ":scope" => {
            for (name, value) in session.scope().bindings() {
                println!("  {} = {:?}", name, value);
            }
        }
        _ if input.starts_with(":ast ") => match crate::parse(&input[5..]) {
            Ok(expr) => match serde_json::to_string_pretty(&expr) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("Failed to serialize AST: {}", e),
            },
            Err(e) => eprintln!("{:?}", miette::Report::new(e)),
        },
        _ => println!("Unknown command {}; try :help", input),
    }
    true
}
