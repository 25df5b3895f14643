//! Abstract syntax tree types produced by the parser and consumed by the
//! semantic analyzer.
//!
//! The AST is a tagged variant over a closed set of node shapes, split into
//! two submodules:
//!
//! - [`stmt`]: the program root and every statement form (declarations,
//!   control flow, blocks).
//! - [`expr`]: every expression form, including literals and assignment.
//!
//! Every node owns its children directly (`Box<Expr>`/`Box<Stmt>`); there
//! are no arena lifetimes and no back-pointers. Every node carries a
//! [`joule_base::Span`] so diagnostics can point at the exact source range
//! that produced it.

pub mod expr;
pub mod stmt;

pub use expr::{BinaryOp, Expr, ExprKind, UnaryOp};
pub use stmt::{DeclKind, Program, Stmt, StmtKind};
