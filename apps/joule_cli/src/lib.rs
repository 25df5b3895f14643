//! Joule CLI (`joulec`)
//!
//! Command-line front end for the [`joule_lang`] analysis pipeline.
//!
//! This crate provides the `joulec` binary for inspecting how Joule source
//! text tokenizes, parses, and type-checks. It is a thin host: all
//! analysis logic lives in `joule_lang`, which is pure and side-effect
//! free; this crate only adds file I/O, logging, and presentation.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `joulec tokens <file>` | Print the token stream |
//! | `joulec ast <file>` | Print the parsed AST |
//! | `joulec analyze <file>` | Run the full pipeline and print diagnostics |
//!
//! # Library Usage
//!
//! ```no_run
//! use joule_cli::run_cli;
//!
//! if let Err(e) = run_cli() {
//!     eprintln!("Error: {}", e);
//!     std::process::exit(1);
//! }
//! ```

pub mod cli;

pub use cli::run_cli;
