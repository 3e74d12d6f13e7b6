use crate::error::{ExpressionError, Result};
use model::core::value::Value;
use predicate_syntax::BinaryOperator;
use std::cmp::Ordering;
use tracing::warn;

/// Binary operation evaluator that handles different value type combinations.
/// Short-circuiting connectives and `??` are handled by the caller.
pub(crate) struct BinaryOpEvaluator<'a> {
    left: &'a Value,
    right: &'a Value,
    op: BinaryOperator,
}

impl<'a> BinaryOpEvaluator<'a> {
    pub fn new(left: &'a Value, right: &'a Value, op: BinaryOperator) -> Self {
        Self { left, right, op }
    }

    pub fn evaluate(&self) -> Result<Value> {
        use Value::*;

        match (self.left, self.right) {
            (Json(_), _) | (_, Json(_)) => self.eval_json(),
            (Int(l), Int(r)) => self.eval_int(*l, *r),
            (Int(_), Float(_)) | (Float(_), Int(_)) | (Float(_), Float(_)) => self.eval_float(),
            (String(l), String(r)) => self.eval_string(l, r),
            (Boolean(l), Boolean(r)) => self.eval_boolean(*l, *r),
            (Null, Null) => self.eval_null_null(),
            (Null, _) | (_, Null) => self.eval_null_other(),
            (String(l), r) if self.op == BinaryOperator::Add => {
                Ok(String(format!("{l}{}", crate::types::value_to_string(r))))
            }
            _ => self.eval_ordered(),
        }
    }

    fn eval_int(&self, l: i32, r: i32) -> Result<Value> {
        use Value::*;
        let overflow = || ExpressionError::Overflow(format!("{l} {} {r}", self.op));

        Ok(match self.op {
            BinaryOperator::Add => Int(l.checked_add(r).ok_or_else(overflow)?),
            BinaryOperator::Subtract => Int(l.checked_sub(r).ok_or_else(overflow)?),
            BinaryOperator::Multiply => Int(l.checked_mul(r).ok_or_else(overflow)?),
            BinaryOperator::Divide | BinaryOperator::Modulo if r == 0 => {
                return Err(ExpressionError::DivisionByZero);
            }
            BinaryOperator::Divide => Int(l.checked_div(r).ok_or_else(overflow)?),
            BinaryOperator::Modulo => Int(l.checked_rem(r).ok_or_else(overflow)?),
            BinaryOperator::And => Int(l & r),
            BinaryOperator::Or => Int(l | r),
            BinaryOperator::ExclusiveOr => Int(l ^ r),
            _ => return self.compare(l.cmp(&r)),
        })
    }

    fn eval_float(&self) -> Result<Value> {
        use Value::*;
        let (l, r) = match (self.left.as_f64(), self.right.as_f64()) {
            (Some(l), Some(r)) => (l, r),
            _ => return Err(self.mismatch("number")),
        };

        Ok(match self.op {
            BinaryOperator::Add => Float(l + r),
            BinaryOperator::Subtract => Float(l - r),
            BinaryOperator::Multiply => Float(l * r),
            BinaryOperator::Divide => Float(l / r),
            BinaryOperator::Modulo => Float(l % r),
            _ => match l.partial_cmp(&r) {
                Some(ordering) => return self.compare(ordering),
                None => return Ok(Boolean(self.op == BinaryOperator::NotEqual)),
            },
        })
    }

    fn eval_string(&self, l: &str, r: &str) -> Result<Value> {
        match self.op {
            BinaryOperator::Add => Ok(Value::String(format!("{l}{r}"))),
            _ => self.compare(l.cmp(r)),
        }
    }

    fn eval_boolean(&self, l: bool, r: bool) -> Result<Value> {
        use Value::*;
        Ok(match self.op {
            BinaryOperator::And | BinaryOperator::AndAlso => Boolean(l && r),
            BinaryOperator::Or | BinaryOperator::OrElse => Boolean(l || r),
            BinaryOperator::ExclusiveOr => Boolean(l ^ r),
            BinaryOperator::Equal => Boolean(l == r),
            BinaryOperator::NotEqual => Boolean(l != r),
            _ => return Err(self.unsupported("boolean")),
        })
    }

    fn eval_null_null(&self) -> Result<Value> {
        match self.op {
            BinaryOperator::Equal => Ok(Value::Boolean(true)),
            BinaryOperator::NotEqual => Ok(Value::Boolean(false)),
            _ => Ok(Value::Null),
        }
    }

    /// Lifted semantics: equality is false, everything else yields null.
    fn eval_null_other(&self) -> Result<Value> {
        match self.op {
            BinaryOperator::Equal => Ok(Value::Boolean(false)),
            BinaryOperator::NotEqual => Ok(Value::Boolean(true)),
            BinaryOperator::GreaterThan
            | BinaryOperator::LessThan
            | BinaryOperator::GreaterOrEqual
            | BinaryOperator::LessOrEqual => Ok(Value::Boolean(false)),
            _ => Ok(Value::Null),
        }
    }

    /// Timestamps, enums, type handles and any other pair `Value::compare` orders.
    fn eval_ordered(&self) -> Result<Value> {
        match self.op {
            BinaryOperator::Equal => return Ok(Value::Boolean(self.left == self.right)),
            BinaryOperator::NotEqual => return Ok(Value::Boolean(self.left != self.right)),
            _ => {}
        }
        match self.left.compare(self.right) {
            Some(ordering) if self.op.is_comparison() => self.compare(ordering),
            _ => Err(self.unsupported(self.left.type_name())),
        }
    }

    fn eval_json(&self) -> Result<Value> {
        let normalize = |v: &Value| match v {
            Value::Json(json) => Value::from_json(json),
            other => other.clone(),
        };
        let (left, right) = (normalize(self.left), normalize(self.right));

        if matches!(left, Value::Json(_)) || matches!(right, Value::Json(_)) {
            warn!(op = %self.op, "Comparing structured captured values by equality only");
            return match self.op {
                BinaryOperator::Equal => Ok(Value::Boolean(left == right)),
                BinaryOperator::NotEqual => Ok(Value::Boolean(left != right)),
                _ => Err(self.unsupported("json")),
            };
        }

        BinaryOpEvaluator::new(&left, &right, self.op).evaluate()
    }

    fn compare(&self, ordering: Ordering) -> Result<Value> {
        let result = match self.op {
            BinaryOperator::Equal => ordering == Ordering::Equal,
            BinaryOperator::NotEqual => ordering != Ordering::Equal,
            BinaryOperator::GreaterThan => ordering == Ordering::Greater,
            BinaryOperator::LessThan => ordering == Ordering::Less,
            BinaryOperator::GreaterOrEqual => ordering != Ordering::Less,
            BinaryOperator::LessOrEqual => ordering != Ordering::Greater,
            _ => return Err(self.unsupported(self.left.type_name())),
        };
        Ok(Value::Boolean(result))
    }

    fn unsupported(&self, kind: &str) -> ExpressionError {
        ExpressionError::UnsupportedOperation(format!(
            "'{}' on {kind} operands",
            self.op
        ))
    }

    fn mismatch(&self, expected: &str) -> ExpressionError {
        ExpressionError::TypeMismatch {
            expected: expected.to_string(),
            actual: format!("{} and {}", self.left.type_name(), self.right.type_name()),
        }
    }
}
