use crate::functions::FunctionRegistry;
use model::core::value::Value;
use std::collections::HashMap;

/// Values captured from the scope a predicate was written in, by name.
pub type Captures = HashMap<String, Value>;

/// Evaluation context: the captured variables a closed sub-expression may
/// read, and the functions its method calls dispatch to.
pub struct EvalContext<'a> {
    captures: &'a Captures,
    functions: FunctionRegistry,
}

impl<'a> EvalContext<'a> {
    pub fn new(captures: &'a Captures) -> Self {
        Self {
            captures,
            functions: FunctionRegistry::new(),
        }
    }

    pub fn with_functions(mut self, functions: FunctionRegistry) -> Self {
        self.functions = functions;
        self
    }

    pub fn get_capture(&self, name: &str) -> Option<&Value> {
        self.captures.get(name)
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }
}
