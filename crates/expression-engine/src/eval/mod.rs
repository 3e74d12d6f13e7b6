mod binary;

use crate::{
    context::EvalContext,
    error::{ExpressionError, Result},
};
use binary::BinaryOpEvaluator;
use model::core::{data_type::DataType, value::Value};
use predicate_syntax::{BinaryOperator, Expression, ExpressionKind, Method, UnaryOperator};
use tracing::trace;

/// Reduces a closed expression (one that never touches the entity parameter)
/// to a single value.
pub trait Evaluator {
    fn evaluate(&self, ctx: &EvalContext) -> Result<Value>;
}

impl Evaluator for Expression {
    fn evaluate(&self, ctx: &EvalContext) -> Result<Value> {
        if self.references_parameter() {
            return Err(ExpressionError::ParameterReference(self.to_string()));
        }
        let value = eval_closed(self, ctx)?;
        trace!(expr = %self, value = %value, "Evaluated closed expression");
        Ok(value)
    }
}

fn eval_closed(expr: &Expression, ctx: &EvalContext) -> Result<Value> {
    match &expr.kind {
        ExpressionKind::Parameter(_) => Err(ExpressionError::ParameterReference(expr.to_string())),

        ExpressionKind::Literal(value) => Ok(value.clone()),

        ExpressionKind::Variable(name) => ctx
            .get_capture(name)
            .cloned()
            .ok_or_else(|| ExpressionError::UnboundVariable(name.clone())),

        ExpressionKind::Member { target, member, .. } => {
            let target = eval_closed(target, ctx)?;
            member_of(&target, member)
        }

        ExpressionKind::Index { target, index } => {
            let target = eval_closed(target, ctx)?;
            let index = eval_closed(index, ctx)?;
            index_into(&target, &index)
        }

        ExpressionKind::Binary {
            left,
            operator,
            right,
        } => eval_binary(left, *operator, right, ctx),

        ExpressionKind::Unary { operator, operand } => {
            let value = eval_closed(operand, ctx)?;
            eval_unary(*operator, value)
        }

        ExpressionKind::Convert { operand, data_type } => {
            let value = eval_closed(operand, ctx)?;
            convert_value(value, data_type)
        }

        ExpressionKind::MethodCall {
            target,
            method,
            arguments,
        } => {
            if *method == Method::GetType {
                return Err(ExpressionError::UnsupportedOperation(
                    "GetType() on a captured value".to_string(),
                ));
            }
            let mut args = Vec::with_capacity(arguments.len() + 1);
            args.push(eval_closed(target, ctx)?);
            for arg in arguments {
                args.push(eval_closed(arg, ctx)?);
            }
            ctx.functions().call(method.name(), &args, ctx)
        }

        ExpressionKind::TypeIs { type_handle, .. } => Err(ExpressionError::UnsupportedOperation(
            format!("type test against {type_handle} on a captured value"),
        )),

        ExpressionKind::Conditional {
            test,
            if_true,
            if_false,
        } => match eval_closed(test, ctx)? {
            Value::Boolean(true) => eval_closed(if_true, ctx),
            Value::Boolean(false) => eval_closed(if_false, ctx),
            other => Err(ExpressionError::TypeMismatch {
                expected: "boolean".to_string(),
                actual: other.type_name().to_string(),
            }),
        },

        ExpressionKind::Grouped(inner) => eval_closed(inner, ctx),
    }
}

fn eval_binary(
    left: &Expression,
    operator: BinaryOperator,
    right: &Expression,
    ctx: &EvalContext,
) -> Result<Value> {
    let left = eval_closed(left, ctx)?;

    match operator {
        BinaryOperator::AndAlso if left == Value::Boolean(false) => return Ok(left),
        BinaryOperator::OrElse if left == Value::Boolean(true) => return Ok(left),
        BinaryOperator::Coalesce if !left.is_null() => return Ok(left),
        BinaryOperator::Coalesce => return eval_closed(right, ctx),
        _ => {}
    }

    let right = eval_closed(right, ctx)?;
    BinaryOpEvaluator::new(&left, &right, operator).evaluate()
}

fn eval_unary(operator: UnaryOperator, value: Value) -> Result<Value> {
    match (operator, value) {
        (UnaryOperator::Not, Value::Boolean(b)) => Ok(Value::Boolean(!b)),
        (UnaryOperator::Negate, Value::Int(i)) => i
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| ExpressionError::Overflow(format!("-({i})"))),
        (UnaryOperator::Negate, Value::Float(f)) => Ok(Value::Float(-f)),
        (_, Value::Null) => Ok(Value::Null),
        (operator, other) => Err(ExpressionError::UnsupportedOperation(format!(
            "'{operator}' on {} operand",
            other.type_name()
        ))),
    }
}

fn convert_value(value: Value, data_type: &DataType) -> Result<Value> {
    match (data_type, value) {
        (_, Value::Null) => Ok(Value::Null),
        (DataType::Nullable(inner), value) => convert_value(value, inner),
        (DataType::Int, Value::Float(f)) => {
            let truncated = f.trunc();
            if truncated.is_finite()
                && truncated >= i32::MIN as f64
                && truncated <= i32::MAX as f64
            {
                Ok(Value::Int(truncated as i32))
            } else {
                Err(ExpressionError::Overflow(format!("(int){f}")))
            }
        }
        (DataType::Float, Value::Int(i)) => Ok(Value::Float(i as f64)),
        (DataType::Int, Value::Json(json)) | (DataType::Float, Value::Json(json)) => {
            convert_value(Value::from_json(&json), data_type)
        }
        (_, value) => Ok(value),
    }
}

fn member_of(target: &Value, member: &str) -> Result<Value> {
    match target {
        Value::Json(serde_json::Value::Object(map)) => map
            .get(member)
            .map(Value::from_json)
            .ok_or_else(|| ExpressionError::FieldNotFound(member.to_string())),
        Value::String(s) if member == "Length" => Ok(Value::Int(
            i32::try_from(s.chars().count())
                .map_err(|_| ExpressionError::Overflow("string length".to_string()))?,
        )),
        other => Err(ExpressionError::FieldNotFound(format!(
            "{member} on {} value",
            other.type_name()
        ))),
    }
}

fn index_into(target: &Value, index: &Value) -> Result<Value> {
    match (target, index) {
        (Value::Json(serde_json::Value::Array(items)), Value::Int(i)) => usize::try_from(*i)
            .ok()
            .and_then(|i| items.get(i))
            .map(Value::from_json)
            .ok_or_else(|| ExpressionError::FieldNotFound(format!("[{i}]"))),
        (Value::Json(serde_json::Value::Object(map)), Value::String(key)) => map
            .get(key)
            .map(Value::from_json)
            .ok_or_else(|| ExpressionError::FieldNotFound(key.clone())),
        (target, index) => Err(ExpressionError::TypeMismatch {
            expected: "indexable captured value".to_string(),
            actual: format!("{}[{}]", target.type_name(), index.type_name()),
        }),
    }
}
