use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpressionError {
    #[error("Expression references the entity parameter and cannot be evaluated: {0}")]
    ParameterReference(String),

    #[error("Unbound variable: @{0}")]
    UnboundVariable(String),

    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("Invalid function arguments for {function}: {message}")]
    InvalidFunctionArgs { function: String, message: String },

    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Field not found: {0}")]
    FieldNotFound(String),

    #[error("Arithmetic overflow in {0}")]
    Overflow(String),

    #[error("Division by zero")]
    DivisionByZero,
}

pub type Result<T> = std::result::Result<T, ExpressionError>;
