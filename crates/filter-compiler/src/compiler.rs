use crate::error::Result;
use model::filter::Filter;
use predicate_syntax::Expression;

/// Translates a boolean predicate into a search filter.
///
/// `Ok(None)` means the predicate compiled but nothing in it was filterable
/// (e.g., it only compared captured values with each other).
pub trait FilterCompiler {
    fn compile(&self, predicate: &Expression) -> Result<Option<Filter>>;
}
