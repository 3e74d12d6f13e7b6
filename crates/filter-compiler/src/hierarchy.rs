use model::core::type_handle::TypeHandle;

pub const TYPE_HIERARCHY_FIELD: &str = "___types";
pub const TYPE_FIELD: &str = "$type";

/// How documents record their dynamic type. `hierarchy_field` holds every
/// type a document is an instance of; `type_field` holds its exact type.
pub trait TypeHierarchy: Send + Sync {
    fn hierarchy_field(&self) -> &str {
        TYPE_HIERARCHY_FIELD
    }

    fn type_field(&self) -> &str {
        TYPE_FIELD
    }

    /// Name stored in the hierarchy field for `handle`.
    fn canonical_type_name(&self, handle: &TypeHandle) -> String {
        handle.full_name().to_string()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTypeHierarchy;

impl TypeHierarchy for DefaultTypeHierarchy {}
