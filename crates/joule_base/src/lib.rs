#![cfg_attr(docsrs, feature(doc_cfg))]

//! # joule-base
//!
//! Pure structural atoms for the Joule front-end.
//!
//! This crate provides the foundational types the lexer, parser, and
//! semantic analyzer build on:
//!
//! - [`Position`]/[`Span`] — source location tracking
//! - [`Arena`]/[`arena::Id`] — an index-addressed store for the scope tree
//!
//! # Design Principles
//!
//! This crate has **no knowledge of Joule's grammar or keywords**. It
//! provides only generic, reusable infrastructure that `joule_lang` builds
//! upon, and it performs no I/O.
//!
//! # Example
//!
//! ```
//! use joule_base::{Arena, Position, Span};
//!
//! let mut arena: Arena<&str> = Arena::new();
//! let handle = arena.push("hello");
//!
//! let span = Span::new(Position::start(), Position::new(5, 1, 6));
//! assert_eq!(arena.get(handle), Some(&"hello"));
//! assert_eq!(span.len(), 5);
//! ```

pub mod arena;
pub mod span;

pub use arena::Arena;
pub use span::{Position, Span};
