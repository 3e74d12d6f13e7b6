use serde::{Deserialize, Serialize};
use std::fmt;

/// Static type of an entity member or expression node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Int,
    Float,
    String,
    Boolean,
    #[serde(alias = "datetime")]
    Timestamp,
    /// Enumeration, by type name.
    Enum(String),
    /// A reflected type handle (the result of `GetType()` or `typeof`).
    Type,
    /// A nested entity, by full type name.
    Entity(String),
    Nullable(Box<DataType>),
    Unknown,
}

impl DataType {
    pub fn nullable(inner: DataType) -> Self {
        match inner {
            DataType::Nullable(_) => inner,
            other => DataType::Nullable(Box::new(other)),
        }
    }

    /// Strips a `Nullable` wrapper.
    pub fn underlying(&self) -> &DataType {
        match self {
            DataType::Nullable(inner) => inner.underlying(),
            other => other,
        }
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self.underlying(), DataType::Boolean)
    }

    pub fn is_string(&self) -> bool {
        matches!(self.underlying(), DataType::String)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.underlying(), DataType::Int | DataType::Float)
    }

    pub fn entity_name(&self) -> Option<&str> {
        match self.underlying() {
            DataType::Entity(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Int => write!(f, "int"),
            DataType::Float => write!(f, "float"),
            DataType::String => write!(f, "string"),
            DataType::Boolean => write!(f, "boolean"),
            DataType::Timestamp => write!(f, "timestamp"),
            DataType::Enum(name) => write!(f, "enum {name}"),
            DataType::Type => write!(f, "type"),
            DataType::Entity(name) => write!(f, "{name}"),
            DataType::Nullable(inner) => write!(f, "{inner}?"),
            DataType::Unknown => write!(f, "unknown"),
        }
    }
}
