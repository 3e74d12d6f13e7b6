use serde::{Deserialize, Serialize};
use std::fmt;

/// Methods a predicate may invoke. Anything else is kept by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    ToLower,
    ToLowerInvariant,
    ToUpper,
    ToUpperInvariant,
    StartsWith,
    GetType,
    Other(String),
}

impl Method {
    pub fn from_name(name: &str) -> Self {
        match name {
            "ToLower" => Method::ToLower,
            "ToLowerInvariant" => Method::ToLowerInvariant,
            "ToUpper" => Method::ToUpper,
            "ToUpperInvariant" => Method::ToUpperInvariant,
            "StartsWith" => Method::StartsWith,
            "GetType" => Method::GetType,
            other => Method::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Method::ToLower => "ToLower",
            Method::ToLowerInvariant => "ToLowerInvariant",
            Method::ToUpper => "ToUpper",
            Method::ToUpperInvariant => "ToUpperInvariant",
            Method::StartsWith => "StartsWith",
            Method::GetType => "GetType",
            Method::Other(name) => name,
        }
    }

    pub fn is_lowercase(&self) -> bool {
        matches!(self, Method::ToLower | Method::ToLowerInvariant)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
