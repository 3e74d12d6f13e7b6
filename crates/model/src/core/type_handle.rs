use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a host type: its namespace-qualified name and the module that
/// declares it (e.g., `Shop.Product` declared in `Shop.Catalog`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeHandle {
    pub name: String,
    pub module: String,
}

impl TypeHandle {
    pub fn new(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
        }
    }

    pub fn full_name(&self) -> &str {
        &self.name
    }

    /// Last dotted segment of the full name.
    pub fn short_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// `"<full name>, <module>"`, the form stored in a document's type discriminator.
    pub fn assembly_qualified_name(&self) -> String {
        format!("{}, {}", self.name, self.module)
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.name == name || self.short_name() == name
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
