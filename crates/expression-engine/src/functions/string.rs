use crate::{
    context::EvalContext,
    error::{ExpressionError, Result},
    types::value_to_string,
};
use model::core::value::Value;

fn receiver<'a>(function: &str, args: &'a [Value]) -> Result<&'a str> {
    match args.first() {
        Some(value) => value
            .as_str()
            .ok_or_else(|| ExpressionError::InvalidFunctionArgs {
                function: function.to_string(),
                message: format!("Expected string, got {}", value.type_name()),
            }),
        None => Err(ExpressionError::InvalidFunctionArgs {
            function: function.to_string(),
            message: "Expected 1 argument, got 0".to_string(),
        }),
    }
}

/// Convert string to lowercase
pub fn eval_lower(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    receiver("ToLower", args).map(|s| Value::String(s.to_lowercase()))
}

/// Convert string to uppercase
pub fn eval_upper(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    receiver("ToUpper", args).map(|s| Value::String(s.to_uppercase()))
}

pub fn eval_trim(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    receiver("Trim", args).map(|s| Value::String(s.trim().to_string()))
}

/// `s.StartsWith(prefix)`, optionally followed by a `StringComparison` member
/// or by an ignore-case flag and a culture.
pub fn eval_starts_with(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    let s = receiver("StartsWith", args)?;
    let prefix = args.get(1).and_then(|v| v.as_str()).ok_or_else(|| {
        ExpressionError::InvalidFunctionArgs {
            function: "StartsWith".to_string(),
            message: "Expected a string prefix".to_string(),
        }
    })?;

    let ignore_case = match args.get(2) {
        None => false,
        Some(Value::Enum(_, member)) => member.ends_with("IgnoreCase"),
        Some(Value::Boolean(flag)) => *flag,
        Some(other) => {
            return Err(ExpressionError::InvalidFunctionArgs {
                function: "StartsWith".to_string(),
                message: format!("Unexpected comparison argument {other}"),
            });
        }
    };

    let matched = if ignore_case {
        s.to_lowercase().starts_with(&prefix.to_lowercase())
    } else {
        s.starts_with(prefix)
    };
    Ok(Value::Boolean(matched))
}

/// Concatenate multiple values into a string
pub fn eval_concat(args: &[Value], _ctx: &EvalContext) -> Result<Value> {
    let concatenated = args.iter().map(value_to_string).collect::<String>();
    Ok(Value::String(concatenated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Captures;

    fn with_dummy_ctx<F, R>(f: F) -> R
    where
        F: FnOnce(&EvalContext) -> R,
    {
        let captures = Captures::new();
        let ctx = EvalContext::new(&captures);
        f(&ctx)
    }

    #[test]
    fn test_lower() {
        with_dummy_ctx(|ctx| {
            let args = vec![Value::String("HELLO".to_string())];
            let result = eval_lower(&args, ctx).unwrap();
            assert_eq!(result, Value::String("hello".to_string()));
        });
    }

    #[test]
    fn test_lower_rejects_non_string() {
        with_dummy_ctx(|ctx| {
            let err = eval_lower(&[Value::Int(1)], ctx).unwrap_err();
            assert!(matches!(err, ExpressionError::InvalidFunctionArgs { .. }));
        });
    }

    #[test]
    fn test_upper() {
        with_dummy_ctx(|ctx| {
            let args = vec![Value::String("world".to_string())];
            let result = eval_upper(&args, ctx).unwrap();
            assert_eq!(result, Value::String("WORLD".to_string()));
        });
    }

    #[test]
    fn test_starts_with_variants() {
        with_dummy_ctx(|ctx| {
            let s = Value::from("Hello");
            assert_eq!(
                eval_starts_with(&[s.clone(), Value::from("He")], ctx).unwrap(),
                Value::Boolean(true)
            );
            assert_eq!(
                eval_starts_with(&[s.clone(), Value::from("he")], ctx).unwrap(),
                Value::Boolean(false)
            );
            let ignore = Value::Enum("StringComparison".into(), "OrdinalIgnoreCase".into());
            assert_eq!(
                eval_starts_with(&[s.clone(), Value::from("he"), ignore], ctx).unwrap(),
                Value::Boolean(true)
            );
            assert_eq!(
                eval_starts_with(&[s, Value::from("he"), Value::Boolean(true)], ctx).unwrap(),
                Value::Boolean(true)
            );
        });
    }

    #[test]
    fn test_concat_mixed_types() {
        with_dummy_ctx(|ctx| {
            let args = vec![Value::String("Count: ".to_string()), Value::Int(42)];
            let result = eval_concat(&args, ctx).unwrap();
            assert_eq!(result, Value::String("Count: 42".to_string()));
        });
    }
}
