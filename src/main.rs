//! Sprig CLI
//!
//! Main entry point for the `sprig` command.

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use sprig::{Context, SourceFile, Value};

#[derive(Parser)]
#[command(name = "sprig")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compile and run Sprig programs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile and run a Sprig source file
    Run {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Compile and run source given on the command line
    Eval {
        /// Program text
        #[arg(value_name = "SOURCE")]
        source: String,
    },

    /// Parse and compile a source file without running it
    Check {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Show the token stream
        #[arg(long)]
        show_tokens: bool,

        /// Show the parsed expression tree (JSON)
        #[arg(long)]
        show_ast: bool,
    },

    /// Start the interactive REPL
    Repl,

    /// Show information about the compiler
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Run { input } => run(&input),
        Commands::Eval { source } => execute(SourceFile::new("<eval>", source)),
        Commands::Check {
            input,
            show_tokens,
            show_ast,
        } => check(&input, show_tokens, show_ast),
        Commands::Repl => sprig::repl::run(Context::new()),
        Commands::Info => info(),
    }
}

fn read_source(input: &Path) -> Result<SourceFile> {
    let content = std::fs::read_to_string(input)
        .map_err(|e| miette::miette!("Failed to read input file: {}", e))?;
    Ok(SourceFile::new(input.to_string_lossy().to_string(), content))
}

fn run(input: &Path) -> Result<()> {
    tracing::info!("Running {:?}", input);
    execute(read_source(input)?)
}

fn execute(file: SourceFile) -> Result<()> {
    let program = sprig::compile_file(&file, &Context::new())?;
    let result = program.run().map_err(|e| program.report(e))?;

    // Only print non-null results
    if !matches!(result, Value::Null) {
        println!("{}", result);
    }
    Ok(())
}

fn check(input: &Path, show_tokens: bool, show_ast: bool) -> Result<()> {
    tracing::info!("Checking {:?}", input);
    let file = read_source(input)?;

    if show_tokens {
        println!("=== Tokens ===");
        for token in sprig::lexer::Lexer::new(&file) {
            let token = token?;
            println!(
                "  {:>4}..{:<4} {:<8} {}",
                token.span.start, token.span.end, token.kind, token.text
            );
        }
        println!();
    }

    let root = sprig::parser::parse_file(&file)?;

    if show_ast {
        println!("=== AST ===");
        let json = serde_json::to_string_pretty(&root).into_diagnostic()?;
        println!("{}", json);
        println!();
    }

    let program = sprig::compile_file(&file, &Context::new())?;
    println!(
        "All checks passed: {} ({} top-level expressions)",
        input.display(),
        program.len()
    );
    Ok(())
}

fn info() -> Result<()> {
    println!("Sprig Compiler");
    println!("Version: {}", sprig::VERSION);
    println!();
    println!("Keywords:");
    for name in Context::new().keywords().names() {
        println!("  - {}", name);
    }
    println!();
    println!("Truthiness: only `null` and `false` are falsy");
    Ok(())
}
