pub mod ast;
pub mod builder;
pub mod errors;
pub mod parser;

pub use ast::{
    expr::{Expression, ExpressionKind},
    method::Method,
    operator::{BinaryOperator, UnaryOperator},
    path::{MemberPath, MemberSegment},
    span::Span,
};
pub use builder::parse;
pub use errors::BuildError;
