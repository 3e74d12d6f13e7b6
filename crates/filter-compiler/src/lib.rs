pub mod compiler;
pub mod error;
pub mod field;
pub mod hierarchy;
pub mod predicate;
pub mod value;

pub use compiler::FilterCompiler;
pub use error::{CompileError, Result};
pub use field::FieldResolver;
pub use hierarchy::{DefaultTypeHierarchy, TypeHierarchy};
pub use predicate::PredicateCompiler;
