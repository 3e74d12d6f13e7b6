use filter_compiler::CompileError;
use predicate_syntax::BuildError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Failed to compile predicate: {0}")]
    Compile(#[from] CompileError),

    #[error("Invalid predicate text: {0}")]
    Syntax(#[from] BuildError),
}

pub type Result<T> = std::result::Result<T, SearchError>;
