#![cfg_attr(docsrs, feature(doc_cfg))]

//! # joule-lang
//!
//! Lexer, parser, and semantic analyzer for the Joule language — a small,
//! JavaScript-flavored scripting language.
//!
//! This crate is a pure, side-effect-free function from source text to an
//! analysis result. It performs no I/O and raises no panics on malformed
//! input: every stage accumulates diagnostics and returns its best-effort
//! result instead of aborting.
//!
//! ## Architecture
//!
//! The pipeline consists of four stages, composed leaves-first by
//! [`driver::analyze`]:
//!
//! 1. **Lexer** ([`lexer`]) — scans the source buffer into a flat
//!    [`Token`] sequence terminated by [`token::TokenKind::Eof`].
//! 2. **Parser** ([`parser`]) — a hand-written recursive-descent parser
//!    that builds a [`Program`] AST with a Pratt-style expression climb.
//! 3. **Semantic analyzer** ([`semantic`]) — walks the AST once, building
//!    a [`symbol::ScopeTree`] and inferring/checking expression types.
//! 4. **Driver** ([`driver`]) — runs all three stages and aggregates their
//!    diagnostics into one [`driver::Report`].
//!
//! ## Quick Start
//!
//! ```rust
//! use joule_lang::analyze;
//!
//! let report = analyze("let x = 10; let y = x + 5;");
//! assert!(report.errors.is_empty());
//! ```
//!
//! ## Non-goals
//!
//! This crate does not generate code, execute programs, optimize, analyze
//! incrementally across edits, or compile multiple files together. It is a
//! front-end only.

pub mod ast;
pub mod diagnostic;
pub mod driver;
pub mod lexer;
pub mod parser;
pub mod semantic;
pub mod symbol;
pub mod token;
pub mod ty;

pub use ast::Program;
pub use diagnostic::{Diagnostic, ErrorKind, Stage, Warning, WarningKind};
pub use driver::{analyze, parse, tokenize, Report};
pub use symbol::{Scope, ScopeKind, ScopeTree, Symbol, SymbolKind};
pub use token::{Token, TokenKind};
pub use ty::{Arity, Type};
