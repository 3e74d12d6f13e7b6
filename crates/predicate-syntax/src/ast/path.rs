use model::core::data_type::DataType;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberSegment {
    pub name: String,
    pub data_type: DataType,
}

/// Chain of member accesses rooted at the entity parameter
/// (e.g., `x.Owner.Name` is `[Owner, Name]`). Empty for the parameter itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberPath {
    pub segments: Vec<MemberSegment>,
}

impl MemberPath {
    pub fn new(segments: Vec<MemberSegment>) -> Self {
        Self { segments }
    }

    pub fn root() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &str, data_type: DataType) {
        self.segments.push(MemberSegment {
            name: name.to_string(),
            data_type,
        });
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn leaf(&self) -> Option<&MemberSegment> {
        self.segments.last()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(|s| s.name.as_str())
    }
}

impl fmt::Display for MemberPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.names().collect::<Vec<_>>().join("."))
    }
}
