//! Structured search filters, the output of predicate compilation.
//!
//! A `Filter` is a plain value tree: no back-references and no sharing, so
//! two compilations of the same predicate can be compared with `==`.

use crate::core::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    /// Field equals a scalar value.
    Term { field: String, value: Value },

    /// Open or closed bound; an unset side is unbounded.
    Range {
        field: String,
        from: Option<Value>,
        to: Option<Value>,
        include_lower: bool,
        include_upper: bool,
    },

    /// Field starts with the given text.
    Prefix { field: String, value: String },

    /// Field is present and non-null.
    Exists { field: String },

    Not(Box<Filter>),
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

impl Filter {
    pub fn term(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn prefix(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Prefix {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn exists(field: impl Into<String>) -> Self {
        Filter::Exists {
            field: field.into(),
        }
    }

    /// `field < to` (or `<=` when `inclusive`).
    pub fn less_than(field: impl Into<String>, to: Value, inclusive: bool) -> Self {
        Filter::Range {
            field: field.into(),
            from: None,
            to: Some(to),
            include_lower: true,
            include_upper: inclusive,
        }
    }

    /// `field > from` (or `>=` when `inclusive`).
    pub fn greater_than(field: impl Into<String>, from: Value, inclusive: bool) -> Self {
        Filter::Range {
            field: field.into(),
            from: Some(from),
            to: None,
            include_lower: inclusive,
            include_upper: true,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Filter) -> Self {
        Filter::Not(Box::new(inner))
    }

    pub fn and(children: Vec<Filter>) -> Self {
        Filter::And(children)
    }

    pub fn or(children: Vec<Filter>) -> Self {
        Filter::Or(children)
    }

    /// Field name of a leaf filter.
    pub fn field(&self) -> Option<&str> {
        match self {
            Filter::Term { field, .. }
            | Filter::Range { field, .. }
            | Filter::Prefix { field, .. }
            | Filter::Exists { field } => Some(field),
            Filter::Not(_) | Filter::And(_) | Filter::Or(_) => None,
        }
    }

    pub fn children(&self) -> &[Filter] {
        match self {
            Filter::And(children) | Filter::Or(children) => children,
            Filter::Not(inner) => std::slice::from_ref(inner.as_ref()),
            _ => &[],
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.field().is_some()
    }

    /// Number of nodes in the tree, this one included.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(Filter::node_count).sum::<usize>()
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, name: &str, children: &[Filter]) -> fmt::Result {
    write!(f, "{name}(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{child}")?;
    }
    write!(f, ")")
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Term { field, value } => write!(f, "term({field}, {value})"),
            Filter::Range {
                field,
                from,
                to,
                include_lower,
                include_upper,
            } => {
                let lower = if *include_lower { '[' } else { '(' };
                let upper = if *include_upper { ']' } else { ')' };
                let from = from.as_ref().map(|v| v.to_string()).unwrap_or_default();
                let to = to.as_ref().map(|v| v.to_string()).unwrap_or_default();
                write!(f, "range({field}, {lower}{from}..{to}{upper})")
            }
            Filter::Prefix { field, value } => write!(f, "prefix({field}, '{value}')"),
            Filter::Exists { field } => write!(f, "exists({field})"),
            Filter::Not(inner) => write!(f, "not({inner})"),
            Filter::And(children) => write_list(f, "and", children),
            Filter::Or(children) => write_list(f, "or", children),
        }
    }
}
