//! Expression nodes.

use joule_base::Span;

/// Binary operators, closed over the grammar's arithmetic, relational,
/// equality, and logical strata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Lt,
    LtEq,
    Gt,
    GtEq,
    EqEq,
    NotEq,
    And,
    Or,
}

/// Unary prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnaryOp {
    Not,
    Neg,
    Plus,
}

/// The closed set of expression shapes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExprKind {
    /// `target = value`. `target` is only semantically valid when it is an
    /// lvalue (`Identifier`, `Index`, or `Member`); the parser still builds
    /// the node and records a syntactic error when it is not.
    Assign { target: Box<Expr>, value: Box<Expr> },
    Binary { op: BinaryOp, left: Box<Expr>, right: Box<Expr> },
    Unary { op: UnaryOp, operand: Box<Expr> },
    Call { callee: Box<Expr>, args: Vec<Expr> },
    Index { object: Box<Expr>, index: Box<Expr> },
    Member { object: Box<Expr>, name: String },
    Identifier(String),
    NumberLit(f64),
    StringLit(String),
    BoolLit(bool),
}

/// An expression: a [`ExprKind`] paired with the span of source it came
/// from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    /// Whether this expression is a legal assignment target.
    pub fn is_lvalue(&self) -> bool {
        matches!(self.kind, ExprKind::Identifier(_) | ExprKind::Index { .. } | ExprKind::Member { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use joule_base::Position;

    fn span() -> Span {
        Span::new(Position::start(), Position::new(1, 1, 2))
    }

    #[test]
    fn identifier_index_and_member_are_lvalues() {
        assert!(Expr::new(ExprKind::Identifier("x".into()), span()).is_lvalue());
        let index = Expr::new(
            ExprKind::Index {
                object: Box::new(Expr::new(ExprKind::Identifier("a".into()), span())),
                index: Box::new(Expr::new(ExprKind::NumberLit(0.0), span())),
            },
            span(),
        );
        assert!(index.is_lvalue());
        let member = Expr::new(
            ExprKind::Member { object: Box::new(Expr::new(ExprKind::Identifier("a".into()), span())), name: "b".into() },
            span(),
        );
        assert!(member.is_lvalue());
    }

    #[test]
    fn literals_and_calls_are_not_lvalues() {
        assert!(!Expr::new(ExprKind::NumberLit(1.0), span()).is_lvalue());
        let call = Expr::new(
            ExprKind::Call { callee: Box::new(Expr::new(ExprKind::Identifier("f".into()), span())), args: vec![] },
            span(),
        );
        assert!(!call.is_lvalue());
    }
}
