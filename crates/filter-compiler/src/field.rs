use crate::hierarchy::TypeHierarchy;
use predicate_syntax::{Expression, ExpressionKind, MemberPath, Method};

/// Maps a member chain rooted at the entity to a backend field name.
pub trait FieldResolver: Send + Sync {
    fn resolve_field_name(&self, path: &MemberPath) -> String;

    /// The field holding the lowercased copy of a string member.
    fn resolve_field_name_lowercase(&self, path: &MemberPath) -> String;
}

/// Member chain under any casts or parentheses, if the node is one.
pub(crate) fn chain_path(expr: &Expression) -> Option<MemberPath> {
    match &expr.kind {
        ExpressionKind::Convert { operand, .. } => chain_path(operand),
        ExpressionKind::Grouped(inner) => chain_path(inner),
        _ => expr.member_path(),
    }
}

/// Lowercasing takes no arguments or one closed culture argument.
fn is_culture_argument(arguments: &[Expression]) -> bool {
    match arguments {
        [] => true,
        [culture] => !culture.references_parameter(),
        _ => false,
    }
}

/// Decides which expressions name a field and what that field is called.
pub(crate) struct FieldResolution<'a> {
    pub resolver: &'a dyn FieldResolver,
    pub hierarchy: &'a dyn TypeHierarchy,
}

impl FieldResolution<'_> {
    /// Field name for `expr`, or `None` when it is not field-resolvable:
    /// a member chain, `GetType()` on a chain or the entity, or `ToLower()`
    /// on a string chain (with or without a culture argument).
    pub fn resolve(&self, expr: &Expression, lowercase: bool) -> Option<String> {
        match &expr.kind {
            ExpressionKind::Grouped(inner) => self.resolve(inner, lowercase),
            ExpressionKind::Convert { operand, .. } => self.resolve(operand, lowercase),
            ExpressionKind::MethodCall {
                target,
                method: Method::GetType,
                arguments,
            } if arguments.is_empty() => {
                let path = chain_path(target)?;
                Some(self.type_field(&path))
            }
            ExpressionKind::MethodCall {
                target,
                method,
                arguments,
            } if method.is_lowercase() && is_culture_argument(arguments) => {
                let path = chain_path(target)?;
                path.leaf()
                    .filter(|leaf| leaf.data_type.is_string())
                    .map(|_| self.resolver.resolve_field_name_lowercase(&path))
            }
            _ => {
                let path = expr.member_path().filter(|p| !p.is_root())?;
                Some(self.member_field(&path, lowercase))
            }
        }
    }

    pub fn member_field(&self, path: &MemberPath, lowercase: bool) -> String {
        if lowercase {
            self.resolver.resolve_field_name_lowercase(path)
        } else {
            self.resolver.resolve_field_name(path)
        }
    }

    /// `$type` at the root, `<field>.$type` below it.
    pub fn type_field(&self, path: &MemberPath) -> String {
        self.suffixed(path, self.hierarchy.type_field())
    }

    /// `___types` at the root, `<field>.___types` below it.
    pub fn hierarchy_field(&self, path: &MemberPath) -> String {
        self.suffixed(path, self.hierarchy.hierarchy_field())
    }

    fn suffixed(&self, path: &MemberPath, suffix: &str) -> String {
        if path.is_root() {
            suffix.to_string()
        } else {
            format!("{}.{}", self.resolver.resolve_field_name(path), suffix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::DefaultTypeHierarchy;
    use model::core::{data_type::DataType, value::Value};
    use predicate_syntax::ast::dsl::*;

    struct Dotted;

    impl FieldResolver for Dotted {
        fn resolve_field_name(&self, path: &MemberPath) -> String {
            path.to_string()
        }

        fn resolve_field_name_lowercase(&self, path: &MemberPath) -> String {
            format!("{path}.lower")
        }
    }

    fn resolve(expr: &Expression, lowercase: bool) -> Option<String> {
        let resolution = FieldResolution {
            resolver: &Dotted,
            hierarchy: &DefaultTypeHierarchy,
        };
        resolution.resolve(expr, lowercase)
    }

    fn x() -> Expression {
        param("Shop.Product")
    }

    #[test]
    fn test_member_chain() {
        let owner = member(x(), "Owner", DataType::Entity("Shop.Customer".into()));
        let name = member(owner, "Name", DataType::String);

        assert_eq!(resolve(&name, false).as_deref(), Some("Owner.Name"));
        assert_eq!(resolve(&name, true).as_deref(), Some("Owner.Name.lower"));
    }

    #[test]
    fn test_parameter_alone_is_not_a_field() {
        assert_eq!(resolve(&x(), false), None);
    }

    #[test]
    fn test_convert_and_grouping_are_transparent() {
        let id = member(x(), "Id", DataType::Int);
        let wrapped = group(convert(id, DataType::nullable(DataType::Int)));
        assert_eq!(resolve(&wrapped, false).as_deref(), Some("Id"));
    }

    #[test]
    fn test_get_type() {
        assert_eq!(
            resolve(&call(x(), "GetType", vec![]), false).as_deref(),
            Some("$type")
        );

        let owner = member(x(), "Owner", DataType::Entity("Shop.Customer".into()));
        assert_eq!(
            resolve(&call(owner, "GetType", vec![]), false).as_deref(),
            Some("Owner.$type")
        );
    }

    #[test]
    fn test_to_lower_on_string_member() {
        let name = member(x(), "Name", DataType::String);
        assert_eq!(
            resolve(&call(name, "ToLowerInvariant", vec![]), false).as_deref(),
            Some("Name.lower")
        );

        let id = member(x(), "Id", DataType::Int);
        assert_eq!(resolve(&call(id, "ToLower", vec![]), false), None);
    }

    #[test]
    fn test_to_lower_with_culture_argument() {
        let name = member(x(), "Name", DataType::String);
        let culture = lit(Value::Enum("CultureInfo".into(), "InvariantCulture".into()));
        assert_eq!(
            resolve(&call(name.clone(), "ToLower", vec![culture]), false).as_deref(),
            Some("Name.lower")
        );

        let open_argument = member(x(), "Name", DataType::String);
        assert_eq!(resolve(&call(name, "ToLower", vec![open_argument]), false), None);
    }

    #[test]
    fn test_non_chains_are_not_fields() {
        let id = member(x(), "Id", DataType::Int);
        assert_eq!(resolve(&add(id.clone(), lit(1)), false), None);
        assert_eq!(resolve(&index(id, lit(0)), false), None);
        assert_eq!(resolve(&var("id"), false), None);
    }
}
