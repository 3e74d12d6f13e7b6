use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    /// Short-circuiting `&&`.
    AndAlso,
    /// Eager `&`.
    And,
    /// Short-circuiting `||`.
    OrElse,
    /// Eager `|`.
    Or,
    ExclusiveOr,
    Coalesce,
}

impl BinaryOperator {
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Equal
                | BinaryOperator::NotEqual
                | BinaryOperator::GreaterThan
                | BinaryOperator::LessThan
                | BinaryOperator::GreaterOrEqual
                | BinaryOperator::LessOrEqual
        )
    }

    pub fn is_conjunction(&self) -> bool {
        matches!(self, BinaryOperator::AndAlso | BinaryOperator::And)
    }

    pub fn is_disjunction(&self) -> bool {
        matches!(self, BinaryOperator::OrElse | BinaryOperator::Or)
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Add
                | BinaryOperator::Subtract
                | BinaryOperator::Multiply
                | BinaryOperator::Divide
                | BinaryOperator::Modulo
        )
    }

    /// The operator with its operands swapped: `a < b` is `b > a`.
    pub fn mirrored(&self) -> Self {
        match self {
            BinaryOperator::GreaterThan => BinaryOperator::LessThan,
            BinaryOperator::LessThan => BinaryOperator::GreaterThan,
            BinaryOperator::GreaterOrEqual => BinaryOperator::LessOrEqual,
            BinaryOperator::LessOrEqual => BinaryOperator::GreaterOrEqual,
            other => *other,
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOperator::Add => write!(f, "+"),
            BinaryOperator::Subtract => write!(f, "-"),
            BinaryOperator::Multiply => write!(f, "*"),
            BinaryOperator::Divide => write!(f, "/"),
            BinaryOperator::Modulo => write!(f, "%"),
            BinaryOperator::Equal => write!(f, "=="),
            BinaryOperator::NotEqual => write!(f, "!="),
            BinaryOperator::GreaterThan => write!(f, ">"),
            BinaryOperator::LessThan => write!(f, "<"),
            BinaryOperator::GreaterOrEqual => write!(f, ">="),
            BinaryOperator::LessOrEqual => write!(f, "<="),
            BinaryOperator::AndAlso => write!(f, "&&"),
            BinaryOperator::And => write!(f, "&"),
            BinaryOperator::OrElse => write!(f, "||"),
            BinaryOperator::Or => write!(f, "|"),
            BinaryOperator::ExclusiveOr => write!(f, "^"),
            BinaryOperator::Coalesce => write!(f, "??"),
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOperator {
    Not,
    Negate,
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOperator::Not => write!(f, "!"),
            UnaryOperator::Negate => write!(f, "-"),
        }
    }
}
