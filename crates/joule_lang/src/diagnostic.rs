//! Diagnostics: the shared error/warning shape produced by every stage.
//!
//! Every stage (lexer, parser, semantic analyzer) accumulates a list of
//! [`Diagnostic`]s rather than aborting on the first problem. A diagnostic
//! names the stage that produced it, a closed `kind`, a human-readable
//! message, and the span of source it concerns.

use joule_base::Span;
use std::fmt;

/// Which pipeline stage produced a diagnostic. Ordering matters: at the
/// same span, `Lex` sorts before `Syntax`, which sorts before `Semantic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Stage {
    Lex,
    Syntax,
    Semantic,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Lex => "lex",
            Stage::Syntax => "syntax",
            Stage::Semantic => "semantic",
        };
        write!(f, "{}", name)
    }
}

/// The closed set of lexical and syntactic error kinds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    // Lexical
    UnknownChar,
    UnterminatedString,
    MalformedNumber,

    // Syntactic
    Expected(String),
    UnexpectedToken,
    InvalidAssignmentTarget,
    MissingInitializer,

    // Semantic
    UndeclaredVariable(String),
    Redeclaration(String),
    TypeMismatch,
    AssignToConstant(String),
    NotCallable,
    ArgumentCountMismatch,
    ReturnOutsideFunction,
}

/// The closed set of semantic warning kinds. All warnings are produced by
/// the semantic stage.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WarningKind {
    UnusedVariable(String),
    UnusedParameter(String),
    UncalledFunction(String),
    Shadowing(String),
    NonBooleanCondition,
    EqualityAcrossTypes,
}

/// A single error or warning, located in source and attributed to the
/// stage that produced it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostic {
    pub stage: Stage,
    pub kind: ErrorKind,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn new(stage: Stage, kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Diagnostic { stage, kind, message: message.into(), span }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} at {}:{}",
            self.stage, self.message, self.span.start.line, self.span.start.column
        )
    }
}

/// A semantic warning, located in source. Always carries `Stage::Semantic`
/// but keeps the field for symmetry with [`Diagnostic`] and uniform sorting.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Warning {
    pub stage: Stage,
    pub kind: WarningKind,
    pub message: String,
    pub span: Span,
}

impl Warning {
    pub fn new(kind: WarningKind, message: impl Into<String>, span: Span) -> Self {
        Warning { stage: Stage::Semantic, kind, message: message.into(), span }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} at {}:{}",
            self.stage, self.message, self.span.start.line, self.span.start.column
        )
    }
}

/// Sorts diagnostics and warnings by source position, breaking ties by
/// stage order (`Lex < Syntax < Semantic`), per the reporting contract.
pub fn sort_by_position_then_stage<T>(items: &mut [T], span_of: impl Fn(&T) -> Span, stage_of: impl Fn(&T) -> Stage) {
    items.sort_by(|a, b| {
        let sa = span_of(a);
        let sb = span_of(b);
        sa.start
            .offset
            .cmp(&sb.start.offset)
            .then_with(|| stage_of(a).cmp(&stage_of(b)))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use joule_base::Position;

    fn span_at(offset: usize) -> Span {
        let pos = Position::new(offset, 1, offset + 1);
        Span::point(pos)
    }

    #[test]
    fn display_includes_stage_message_and_position() {
        let diag = Diagnostic::new(Stage::Lex, ErrorKind::UnknownChar, "unexpected character '@'", span_at(4));
        let text = diag.to_string();
        assert!(text.contains("lex"));
        assert!(text.contains("unexpected character '@'"));
        assert!(text.contains("1:5"));
    }

    #[test]
    fn stage_ordering_is_lex_then_syntax_then_semantic() {
        assert!(Stage::Lex < Stage::Syntax);
        assert!(Stage::Syntax < Stage::Semantic);
    }

    #[test]
    fn sort_breaks_ties_by_stage_at_same_position() {
        let mut diags = vec![
            Diagnostic::new(Stage::Semantic, ErrorKind::TypeMismatch, "a", span_at(0)),
            Diagnostic::new(Stage::Lex, ErrorKind::UnknownChar, "b", span_at(0)),
            Diagnostic::new(Stage::Syntax, ErrorKind::UnexpectedToken, "c", span_at(0)),
        ];
        sort_by_position_then_stage(&mut diags, |d| d.span, |d| d.stage);
        assert_eq!(diags[0].stage, Stage::Lex);
        assert_eq!(diags[1].stage, Stage::Syntax);
        assert_eq!(diags[2].stage, Stage::Semantic);
    }

    #[test]
    fn sort_orders_by_source_position_first() {
        let mut diags = vec![
            Diagnostic::new(Stage::Lex, ErrorKind::UnknownChar, "later", span_at(10)),
            Diagnostic::new(Stage::Semantic, ErrorKind::TypeMismatch, "earlier", span_at(2)),
        ];
        sort_by_position_then_stage(&mut diags, |d| d.span, |d| d.stage);
        assert_eq!(diags[0].message, "earlier");
    }
}
