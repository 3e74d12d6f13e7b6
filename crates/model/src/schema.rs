//! Entity shapes used to type member accesses in textual predicates.

use crate::core::{data_type::DataType, type_handle::TypeHandle};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fs, path::Path};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Failed to read schema file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse schema: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Type '{owner}' references unknown type '{name}'")]
    UnknownType { owner: String, name: String },

    #[error("Duplicate type '{0}'")]
    DuplicateType(String),

    #[error("Inheritance cycle through '{0}'")]
    InheritanceCycle(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: DataType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySchema {
    pub name: String,
    pub module: String,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

impl EntitySchema {
    pub fn new(handle: TypeHandle) -> Self {
        Self {
            name: handle.name,
            module: handle.module,
            base: None,
            fields: Vec::new(),
        }
    }

    pub fn with_base(mut self, base: &str) -> Self {
        self.base = Some(base.to_string());
        self
    }

    pub fn with_field(mut self, name: &str, data_type: DataType) -> Self {
        self.fields.push(FieldDef {
            name: name.to_string(),
            data_type,
        });
        self
    }

    pub fn handle(&self) -> TypeHandle {
        TypeHandle::new(&self.name, &self.module)
    }

    fn own_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumSchema {
    pub name: String,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaRegistry {
    #[serde(default)]
    types: Vec<EntitySchema>,
    #[serde(default)]
    enums: Vec<EnumSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(source: &str) -> Result<Self, SchemaError> {
        let registry: SchemaRegistry = serde_json::from_str(source)?;
        registry.validate()?;
        debug!(
            types = registry.types.len(),
            enums = registry.enums.len(),
            "Loaded schema registry"
        );
        Ok(registry)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SchemaError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn register(mut self, schema: EntitySchema) -> Self {
        self.types.push(schema);
        self
    }

    pub fn register_enum(mut self, name: &str, members: &[&str]) -> Self {
        self.enums.push(EnumSchema {
            name: name.to_string(),
            members: members.iter().map(|m| m.to_string()).collect(),
        });
        self
    }

    pub fn types(&self) -> &[EntitySchema] {
        &self.types
    }

    /// Finds an entity by full name, falling back to a unique short-name match.
    pub fn entity(&self, name: &str) -> Option<&EntitySchema> {
        if let Some(exact) = self.types.iter().find(|t| t.name == name) {
            return Some(exact);
        }
        let mut matches = self.types.iter().filter(|t| t.handle().matches_name(name));
        match (matches.next(), matches.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        }
    }

    pub fn enum_type(&self, name: &str) -> Option<&EnumSchema> {
        self.enums
            .iter()
            .find(|e| e.name == name || e.name.rsplit('.').next() == Some(name))
    }

    /// Looks a member up on `entity`, walking the base-type chain.
    pub fn field(&self, entity: &str, member: &str) -> Option<&FieldDef> {
        let mut current = self.entity(entity);
        let mut seen = HashSet::new();
        while let Some(schema) = current {
            if !seen.insert(schema.name.as_str()) {
                return None;
            }
            if let Some(field) = schema.own_field(member) {
                return Some(field);
            }
            current = schema.base.as_deref().and_then(|b| self.entity(b));
        }
        None
    }

    /// True when `sub` is `base` or derives from it.
    pub fn is_subtype(&self, sub: &str, base: &str) -> bool {
        let Some(target) = self.entity(base) else {
            return false;
        };
        let mut current = self.entity(sub);
        let mut seen = HashSet::new();
        while let Some(schema) = current {
            if schema.name == target.name {
                return true;
            }
            if !seen.insert(schema.name.as_str()) {
                return false;
            }
            current = schema.base.as_deref().and_then(|b| self.entity(b));
        }
        false
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut names = HashSet::new();
        for schema in &self.types {
            if !names.insert(schema.name.as_str()) {
                return Err(SchemaError::DuplicateType(schema.name.clone()));
            }
        }

        for schema in &self.types {
            if let Some(base) = &schema.base {
                if self.entity(base).is_none() {
                    return Err(SchemaError::UnknownType {
                        owner: schema.name.clone(),
                        name: base.clone(),
                    });
                }
            }
            for field in &schema.fields {
                match field.data_type.underlying() {
                    DataType::Entity(name) if self.entity(name).is_none() => {
                        return Err(SchemaError::UnknownType {
                            owner: schema.name.clone(),
                            name: name.clone(),
                        });
                    }
                    DataType::Enum(name) if self.enum_type(name).is_none() => {
                        return Err(SchemaError::UnknownType {
                            owner: schema.name.clone(),
                            name: name.clone(),
                        });
                    }
                    _ => {}
                }
            }
            self.check_inheritance(schema)?;
        }
        Ok(())
    }

    fn check_inheritance(&self, schema: &EntitySchema) -> Result<(), SchemaError> {
        let mut seen = HashSet::new();
        let mut current = Some(schema);
        while let Some(s) = current {
            if !seen.insert(s.name.as_str()) {
                return Err(SchemaError::InheritanceCycle(schema.name.clone()));
            }
            current = s.base.as_deref().and_then(|b| self.entity(b));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SCHEMA: &str = r#"{
        "types": [
            {
                "name": "Shop.Product",
                "module": "Shop",
                "fields": [
                    { "name": "Id", "type": "int" },
                    { "name": "Name", "type": "string" },
                    { "name": "Color", "type": { "enum": "Color" } },
                    { "name": "Parent", "type": { "entity": "Shop.Product" } }
                ]
            },
            {
                "name": "Shop.Book",
                "module": "Shop",
                "base": "Shop.Product",
                "fields": [ { "name": "Isbn", "type": "string" } ]
            }
        ],
        "enums": [ { "name": "Color", "members": ["Red", "Blue"] } ]
    }"#;

    #[test]
    fn test_load_and_lookup() {
        let registry = SchemaRegistry::from_json(SCHEMA).unwrap();

        assert!(registry.entity("Shop.Product").is_some());
        assert!(registry.entity("Book").is_some());
        assert_eq!(
            registry.field("Book", "Name").map(|f| &f.data_type),
            Some(&DataType::String)
        );
        assert_eq!(
            registry.field("Book", "Isbn").map(|f| &f.data_type),
            Some(&DataType::String)
        );
        assert!(registry.field("Product", "Isbn").is_none());
        assert!(registry.enum_type("Color").is_some());
    }

    #[test]
    fn test_is_subtype() {
        let registry = SchemaRegistry::from_json(SCHEMA).unwrap();

        assert!(registry.is_subtype("Shop.Book", "Shop.Product"));
        assert!(registry.is_subtype("Shop.Product", "Shop.Product"));
        assert!(!registry.is_subtype("Shop.Product", "Shop.Book"));
    }

    #[test]
    fn test_unknown_field_type_rejected() {
        let source = r#"{ "types": [ {
            "name": "A", "module": "M",
            "fields": [ { "name": "B", "type": { "entity": "Missing" } } ]
        } ] }"#;

        let err = SchemaRegistry::from_json(source).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownType { ref name, .. } if name == "Missing"));
    }

    #[test]
    fn test_inheritance_cycle_rejected() {
        let registry = SchemaRegistry::new()
            .register(EntitySchema::new(TypeHandle::new("A", "M")).with_base("B"))
            .register(EntitySchema::new(TypeHandle::new("B", "M")).with_base("A"));

        assert!(matches!(
            registry.validate(),
            Err(SchemaError::InheritanceCycle(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SCHEMA.as_bytes()).unwrap();

        let registry = SchemaRegistry::load(file.path()).unwrap();
        assert_eq!(registry.types().len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let err = SchemaRegistry::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SchemaError::Read { .. }));
    }
}
