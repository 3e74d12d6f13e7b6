pub mod dsl;
pub mod expr;
pub mod method;
pub mod operator;
pub mod path;
pub mod span;
