use expression_engine::ExpressionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Unsupported expression: {0}")]
    UnsupportedExpression(String),

    #[error("Unsupported comparison, both operands reference the entity: {0}")]
    UnsupportedComparison(String),

    #[error("Invalid argument to {method}: {message}")]
    InvalidArgument { method: String, message: String },

    #[error("Failed to evaluate value: {0}")]
    Evaluation(#[from] ExpressionError),
}

pub type Result<T> = std::result::Result<T, CompileError>;
