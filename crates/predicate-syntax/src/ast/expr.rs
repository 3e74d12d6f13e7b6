use crate::ast::{
    method::Method,
    operator::{BinaryOperator, UnaryOperator},
    path::MemberPath,
    span::Span,
};
use model::core::{data_type::DataType, type_handle::TypeHandle, value::Value};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: Span,
}

impl Expression {
    pub fn new(kind: ExpressionKind, span: Span) -> Self {
        Expression { kind, span }
    }
}

/// Expression types
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    /// The entity the predicate is written against.
    Parameter(DataType),
    Literal(Value),
    /// A value captured from the enclosing scope.
    Variable(String),
    Member {
        target: Box<Expression>,
        member: String,
        data_type: DataType,
    },
    Binary {
        left: Box<Expression>,
        operator: BinaryOperator,
        right: Box<Expression>,
    },
    Unary {
        operator: UnaryOperator,
        operand: Box<Expression>,
    },
    Convert {
        operand: Box<Expression>,
        data_type: DataType,
    },
    MethodCall {
        target: Box<Expression>,
        method: Method,
        arguments: Vec<Expression>,
    },
    /// `operand is T`
    TypeIs {
        operand: Box<Expression>,
        type_handle: TypeHandle,
    },
    Conditional {
        test: Box<Expression>,
        if_true: Box<Expression>,
        if_false: Box<Expression>,
    },
    Index {
        target: Box<Expression>,
        index: Box<Expression>,
    },
    Grouped(Box<Expression>),
}

impl Expression {
    /// Skips any parentheses around the node.
    pub fn ungrouped(&self) -> &Expression {
        match &self.kind {
            ExpressionKind::Grouped(inner) => inner.ungrouped(),
            _ => self,
        }
    }

    /// True if the entity parameter appears anywhere below this node.
    pub fn references_parameter(&self) -> bool {
        match &self.kind {
            ExpressionKind::Parameter(_) => true,
            ExpressionKind::Literal(_) | ExpressionKind::Variable(_) => false,
            ExpressionKind::Member { target, .. } => target.references_parameter(),
            ExpressionKind::Binary { left, right, .. } => {
                left.references_parameter() || right.references_parameter()
            }
            ExpressionKind::Unary { operand, .. }
            | ExpressionKind::Convert { operand, .. }
            | ExpressionKind::TypeIs { operand, .. } => operand.references_parameter(),
            ExpressionKind::MethodCall {
                target, arguments, ..
            } => target.references_parameter() || arguments.iter().any(|a| a.references_parameter()),
            ExpressionKind::Conditional {
                test,
                if_true,
                if_false,
            } => {
                test.references_parameter()
                    || if_true.references_parameter()
                    || if_false.references_parameter()
            }
            ExpressionKind::Index { target, index } => {
                target.references_parameter() || index.references_parameter()
            }
            ExpressionKind::Grouped(inner) => inner.references_parameter(),
        }
    }

    /// The member chain when this node is the parameter or a plain member
    /// access chain rooted at it; `None` otherwise.
    pub fn member_path(&self) -> Option<MemberPath> {
        match &self.kind {
            ExpressionKind::Parameter(_) => Some(MemberPath::root()),
            ExpressionKind::Member {
                target,
                member,
                data_type,
            } => {
                let mut path = target.member_path()?;
                path.push(member, data_type.clone());
                Some(path)
            }
            ExpressionKind::Grouped(inner) => inner.member_path(),
            _ => None,
        }
    }

    /// Static type of the node where it can be known without evaluation.
    pub fn data_type(&self) -> DataType {
        match &self.kind {
            ExpressionKind::Parameter(ty) => ty.clone(),
            ExpressionKind::Literal(value) => value.data_type(),
            ExpressionKind::Variable(_) => DataType::Unknown,
            ExpressionKind::Member { data_type, .. } => data_type.clone(),
            ExpressionKind::Binary {
                left, operator, ..
            } => {
                if operator.is_arithmetic() || *operator == BinaryOperator::Coalesce {
                    left.data_type()
                } else {
                    DataType::Boolean
                }
            }
            ExpressionKind::Unary { operator, operand } => match operator {
                UnaryOperator::Not => DataType::Boolean,
                UnaryOperator::Negate => operand.data_type(),
            },
            ExpressionKind::Convert { data_type, .. } => data_type.clone(),
            ExpressionKind::MethodCall { method, .. } => match method {
                Method::ToLower
                | Method::ToLowerInvariant
                | Method::ToUpper
                | Method::ToUpperInvariant => DataType::String,
                Method::StartsWith => DataType::Boolean,
                Method::GetType => DataType::Type,
                Method::Other(_) => DataType::Unknown,
            },
            ExpressionKind::TypeIs { .. } => DataType::Boolean,
            ExpressionKind::Conditional { if_true, .. } => if_true.data_type(),
            ExpressionKind::Index { .. } => DataType::Unknown,
            ExpressionKind::Grouped(inner) => inner.data_type(),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExpressionKind::Parameter(_) => write!(f, "x"),
            ExpressionKind::Literal(value) => match value {
                Value::String(s) => write!(f, "\"{s}\""),
                other => write!(f, "{other}"),
            },
            ExpressionKind::Variable(name) => write!(f, "@{name}"),
            ExpressionKind::Member { target, member, .. } => write!(f, "{target}.{member}"),
            ExpressionKind::Binary {
                left,
                operator,
                right,
            } => write!(f, "{left} {operator} {right}"),
            ExpressionKind::Unary { operator, operand } => write!(f, "{operator}{operand}"),
            ExpressionKind::Convert { operand, data_type } => {
                write!(f, "({data_type}){operand}")
            }
            ExpressionKind::MethodCall {
                target,
                method,
                arguments,
            } => {
                let args = arguments
                    .iter()
                    .map(|a| a.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "{target}.{method}({args})")
            }
            ExpressionKind::TypeIs {
                operand,
                type_handle,
            } => write!(f, "{operand} is {type_handle}"),
            ExpressionKind::Conditional {
                test,
                if_true,
                if_false,
            } => write!(f, "{test} ? {if_true} : {if_false}"),
            ExpressionKind::Index { target, index } => write!(f, "{target}[{index}]"),
            ExpressionKind::Grouped(inner) => write!(f, "({inner})"),
        }
    }
}
