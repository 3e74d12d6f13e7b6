pub mod context;
pub mod error;
pub mod eval;
pub mod functions;
pub mod types;

pub use context::{Captures, EvalContext};
pub use error::{ExpressionError, Result};
pub use eval::Evaluator;
pub use functions::FunctionRegistry;
pub use types::{parse_captured_value, value_to_string};
