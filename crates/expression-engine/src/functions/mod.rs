pub mod string;

use crate::{
    context::EvalContext,
    error::{ExpressionError, Result},
};
use model::core::value::Value;
use std::collections::HashMap;

/// Type alias for function implementations. Method calls pass their receiver
/// as the first argument.
pub type FunctionImpl = fn(&[Value], &EvalContext) -> Result<Value>;

/// Registry of functions closed method calls dispatch to
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionImpl>,
}

impl FunctionRegistry {
    /// Create a new function registry with all built-in functions
    pub fn new() -> Self {
        let mut registry = Self {
            functions: HashMap::new(),
        };

        registry.register("tolower", string::eval_lower);
        registry.register("tolowerinvariant", string::eval_lower);
        registry.register("toupper", string::eval_upper);
        registry.register("toupperinvariant", string::eval_upper);
        registry.register("startswith", string::eval_starts_with);
        registry.register("trim", string::eval_trim);
        registry.register("concat", string::eval_concat);

        registry
    }

    pub fn register(&mut self, name: &str, func: FunctionImpl) {
        self.functions.insert(name.to_lowercase(), func);
    }

    pub fn call(&self, name: &str, args: &[Value], ctx: &EvalContext) -> Result<Value> {
        let func = self
            .functions
            .get(&name.to_lowercase())
            .ok_or_else(|| ExpressionError::UnknownFunction(name.to_string()))?;

        func(args, ctx)
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(&name.to_lowercase())
    }

    pub fn function_names(&self) -> Vec<&str> {
        self.functions.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
