//! Shorthand constructors for building expression trees in code and tests.
//! Every node gets a default span.

use crate::ast::{
    expr::{Expression, ExpressionKind},
    method::Method,
    operator::{BinaryOperator, UnaryOperator},
    span::Span,
};
use model::core::{data_type::DataType, type_handle::TypeHandle, value::Value};

fn node(kind: ExpressionKind) -> Expression {
    Expression::new(kind, Span::default())
}

fn binary(left: Expression, operator: BinaryOperator, right: Expression) -> Expression {
    node(ExpressionKind::Binary {
        left: Box::new(left),
        operator,
        right: Box::new(right),
    })
}

/// The entity parameter, typed as `entity`.
pub fn param(entity: &str) -> Expression {
    node(ExpressionKind::Parameter(DataType::Entity(entity.to_string())))
}

pub fn member(target: Expression, name: &str, data_type: DataType) -> Expression {
    node(ExpressionKind::Member {
        target: Box::new(target),
        member: name.to_string(),
        data_type,
    })
}

pub fn lit(value: impl Into<Value>) -> Expression {
    node(ExpressionKind::Literal(value.into()))
}

pub fn null() -> Expression {
    node(ExpressionKind::Literal(Value::Null))
}

pub fn var(name: &str) -> Expression {
    node(ExpressionKind::Variable(name.to_string()))
}

pub fn eq(left: Expression, right: Expression) -> Expression {
    binary(left, BinaryOperator::Equal, right)
}

pub fn ne(left: Expression, right: Expression) -> Expression {
    binary(left, BinaryOperator::NotEqual, right)
}

pub fn lt(left: Expression, right: Expression) -> Expression {
    binary(left, BinaryOperator::LessThan, right)
}

pub fn le(left: Expression, right: Expression) -> Expression {
    binary(left, BinaryOperator::LessOrEqual, right)
}

pub fn gt(left: Expression, right: Expression) -> Expression {
    binary(left, BinaryOperator::GreaterThan, right)
}

pub fn ge(left: Expression, right: Expression) -> Expression {
    binary(left, BinaryOperator::GreaterOrEqual, right)
}

pub fn and_also(left: Expression, right: Expression) -> Expression {
    binary(left, BinaryOperator::AndAlso, right)
}

pub fn and(left: Expression, right: Expression) -> Expression {
    binary(left, BinaryOperator::And, right)
}

pub fn or_else(left: Expression, right: Expression) -> Expression {
    binary(left, BinaryOperator::OrElse, right)
}

pub fn or(left: Expression, right: Expression) -> Expression {
    binary(left, BinaryOperator::Or, right)
}

pub fn xor(left: Expression, right: Expression) -> Expression {
    binary(left, BinaryOperator::ExclusiveOr, right)
}

pub fn coalesce(left: Expression, right: Expression) -> Expression {
    binary(left, BinaryOperator::Coalesce, right)
}

pub fn add(left: Expression, right: Expression) -> Expression {
    binary(left, BinaryOperator::Add, right)
}

pub fn not(operand: Expression) -> Expression {
    node(ExpressionKind::Unary {
        operator: UnaryOperator::Not,
        operand: Box::new(operand),
    })
}

pub fn negate(operand: Expression) -> Expression {
    node(ExpressionKind::Unary {
        operator: UnaryOperator::Negate,
        operand: Box::new(operand),
    })
}

pub fn convert(operand: Expression, data_type: DataType) -> Expression {
    node(ExpressionKind::Convert {
        operand: Box::new(operand),
        data_type,
    })
}

pub fn call(target: Expression, method: &str, arguments: Vec<Expression>) -> Expression {
    node(ExpressionKind::MethodCall {
        target: Box::new(target),
        method: Method::from_name(method),
        arguments,
    })
}

pub fn type_is(operand: Expression, type_handle: TypeHandle) -> Expression {
    node(ExpressionKind::TypeIs {
        operand: Box::new(operand),
        type_handle,
    })
}

/// `typeof(T)` as a literal.
pub fn type_of(type_handle: TypeHandle) -> Expression {
    node(ExpressionKind::Literal(Value::Type(type_handle)))
}

pub fn conditional(test: Expression, if_true: Expression, if_false: Expression) -> Expression {
    node(ExpressionKind::Conditional {
        test: Box::new(test),
        if_true: Box::new(if_true),
        if_false: Box::new(if_false),
    })
}

pub fn index(target: Expression, index: Expression) -> Expression {
    node(ExpressionKind::Index {
        target: Box::new(target),
        index: Box::new(index),
    })
}

pub fn group(inner: Expression) -> Expression {
    node(ExpressionKind::Grouped(Box::new(inner)))
}
