use filter_compiler::{DefaultTypeHierarchy, FieldResolver, TypeHierarchy};
use model::core::data_type::DataType;
use predicate_syntax::MemberPath;

const NUMBER_SUFFIX: &str = "$$number";
const STRING_SUFFIX: &str = "$$string";
const DATE_SUFFIX: &str = "$$date";
const LOWERCASE_SUFFIX: &str = "lowercase";

/// Default document layout: members joined by `.`, with the leaf tagged by
/// the kind of value it stores (`Owner.Name$$string`, `Price$$number`).
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldNameConvention;

impl FieldNameConvention {
    fn type_suffix(data_type: &DataType) -> Option<&'static str> {
        match data_type.underlying() {
            DataType::Int | DataType::Float => Some(NUMBER_SUFFIX),
            DataType::String => Some(STRING_SUFFIX),
            DataType::Timestamp => Some(DATE_SUFFIX),
            _ => None,
        }
    }
}

impl FieldResolver for FieldNameConvention {
    fn resolve_field_name(&self, path: &MemberPath) -> String {
        let mut name = path.names().collect::<Vec<_>>().join(".");
        if let Some(suffix) = path.leaf().and_then(|leaf| Self::type_suffix(&leaf.data_type)) {
            name.push_str(suffix);
        }
        name
    }

    fn resolve_field_name_lowercase(&self, path: &MemberPath) -> String {
        format!("{}.{LOWERCASE_SUFFIX}", self.resolve_field_name(path))
    }
}

/// The naming conventions a [`crate::Client`] compiles predicates with.
pub struct ClientConventions {
    pub field_names: Box<dyn FieldResolver>,
    pub type_hierarchy: Box<dyn TypeHierarchy>,
}

impl ClientConventions {
    pub fn new(field_names: Box<dyn FieldResolver>, type_hierarchy: Box<dyn TypeHierarchy>) -> Self {
        Self {
            field_names,
            type_hierarchy,
        }
    }
}

impl Default for ClientConventions {
    fn default() -> Self {
        Self::new(Box::new(FieldNameConvention), Box::new(DefaultTypeHierarchy))
    }
}
