//! Command-line argument parsing and dispatch for `joulec`.
//!
//! The CLI is a thin host around [`joule_lang`]: it reads a source file (or
//! stdin), runs the requested pipeline stage, and renders the result as
//! either human-readable text or JSON. All of the actual analysis work
//! happens in the library crate; this module only handles I/O and
//! presentation.

use clap::{Parser, Subcommand};
use std::fmt;
use std::fs;
use std::io::{self, Read as _};
use std::path::PathBuf;

use joule_lang::{analyze, parse, tokenize};

/// Everything that can go wrong running the CLI itself, as opposed to
/// diagnostics produced by the analysis pipeline (those are printed, not
/// returned as an error).
#[derive(Debug)]
pub enum CliError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::Json(e) => write!(f, "JSON encoding error: {}", e),
        }
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

/// Command-line interface for the Joule analysis pipeline.
#[derive(Parser, Debug)]
#[command(name = "joulec", version, about = "Joule language front-end: tokens, AST, and semantic analysis")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the token stream for a source file.
    Tokens {
        /// Path to a Joule source file; reads stdin if omitted.
        file: Option<PathBuf>,
        /// Emit JSON instead of a human-readable listing.
        #[arg(long)]
        json: bool,
    },
    /// Print the parsed AST for a source file.
    Ast {
        file: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Run the full pipeline and print errors, warnings, and scope summary.
    Analyze {
        file: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
}

fn read_source(file: &Option<PathBuf>) -> io::Result<String> {
    match file {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

pub fn run_cli() -> Result<(), CliError> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Tokens { file, json } => run_tokens(&file, json),
        Commands::Ast { file, json } => run_ast(&file, json),
        Commands::Analyze { file, json } => run_analyze(&file, json),
    }
}

fn run_tokens(file: &Option<PathBuf>, json: bool) -> Result<(), CliError> {
    let source = read_source(file)?;
    log::debug!("tokenizing {} bytes", source.len());
    let (tokens, errors) = tokenize(&source);
    if json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
    } else {
        for token in &tokens {
            println!("{:?} @ {}:{}", token.kind, token.span.start.line, token.span.start.column);
        }
    }
    for error in &errors {
        eprintln!("{}", error);
    }
    Ok(())
}

fn run_ast(file: &Option<PathBuf>, json: bool) -> Result<(), CliError> {
    let source = read_source(file)?;
    let (tokens, lex_errors) = tokenize(&source);
    let (program, syntax_errors) = parse(&tokens);
    if json {
        println!("{}", serde_json::to_string_pretty(&program)?);
    } else {
        println!("{:#?}", program);
    }
    for error in lex_errors.iter().chain(syntax_errors.iter()) {
        eprintln!("{}", error);
    }
    Ok(())
}

fn run_analyze(file: &Option<PathBuf>, json: bool) -> Result<(), CliError> {
    let source = read_source(file)?;
    log::info!("running full analysis pipeline");
    let report = analyze(&source);

    if json {
        let summary = serde_json::json!({
            "tokens": report.tokens,
            "ast": report.ast,
            "errors": report.errors,
            "warnings": report.warnings,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for error in &report.errors {
            println!("error: {}", error);
        }
        for warning in &report.warnings {
            println!("warning: {}", warning);
        }
        if report.errors.is_empty() && report.warnings.is_empty() {
            println!("no errors or warnings");
        }
    }

    if !report.errors.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}
