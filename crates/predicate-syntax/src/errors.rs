use crate::{ast::span::Span, parser::Rule};
use pest::error::{Error as PestError, LineColLocation};
use thiserror::Error;

/// Error type for building a typed predicate from source text
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Parse error at line {line}, column {column}: {message}")]
pub struct BuildError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl BuildError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        BuildError {
            message: message.into(),
            line: span.line,
            column: span.column,
        }
    }

    pub fn from_pest_error(err: PestError<Rule>) -> Self {
        let (line, column) = match err.line_col {
            LineColLocation::Pos((l, c)) => (l, c),
            LineColLocation::Span((l, c), _) => (l, c),
        };

        BuildError {
            message: format!("{}", err.variant),
            line,
            column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_error_display() {
        let err = BuildError::new("Unknown member 'Foo'", Span::new(4, 7, 1, 5));
        assert_eq!(
            err.to_string(),
            "Parse error at line 1, column 5: Unknown member 'Foo'"
        );
    }
}
