//! Types assigned to expressions and symbols during semantic analysis.

use std::fmt;

/// Either a fixed parameter count or "accepts any number of arguments",
/// the shape the pre-seeded `print` builtin needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Arity {
    Exact(usize),
    Any,
}

impl Arity {
    /// Whether `count` arguments satisfy this arity.
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => n == count,
            Arity::Any => true,
        }
    }
}

/// The closed set of types a Joule expression or symbol can carry.
///
/// `Unknown` is the bottom element: any operator applied to an `Unknown`
/// operand yields `Unknown` without emitting a diagnostic, which is what
/// stops a single root-cause error from cascading into dozens of follow-on
/// ones.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Type {
    Number,
    String,
    Boolean,
    Function { arity: Arity, return_type: Box<Type> },
    Void,
    Unknown,
}

impl Type {
    pub fn function(arity: Arity, return_type: Type) -> Type {
        Type::Function { arity, return_type: Box::new(return_type) }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Type::Unknown)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Number => write!(f, "Number"),
            Type::String => write!(f, "String"),
            Type::Boolean => write!(f, "Boolean"),
            Type::Function { arity, return_type } => {
                let arity_str = match arity {
                    Arity::Exact(n) => n.to_string(),
                    Arity::Any => "any".to_string(),
                };
                write!(f, "Function({} -> {})", arity_str, return_type)
            }
            Type::Void => write!(f, "Void"),
            Type::Unknown => write!(f, "Unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_arity_accepts_every_count() {
        assert!(Arity::Any.accepts(0));
        assert!(Arity::Any.accepts(7));
    }

    #[test]
    fn exact_arity_accepts_only_matching_count() {
        assert!(Arity::Exact(2).accepts(2));
        assert!(!Arity::Exact(2).accepts(1));
    }

    #[test]
    fn display_formats_function_type() {
        let f = Type::function(Arity::Exact(1), Type::Number);
        assert_eq!(f.to_string(), "Function(1 -> Number)");
    }

    #[test]
    fn unknown_is_distinguished() {
        assert!(Type::Unknown.is_unknown());
        assert!(!Type::Number.is_unknown());
    }
}
