#![allow(dead_code)]

use expression_engine::Captures;
use filter_compiler::{
    DefaultTypeHierarchy, FieldResolver, FilterCompiler, PredicateCompiler, Result,
    TypeHierarchy,
};
use model::{
    core::{data_type::DataType, type_handle::TypeHandle},
    filter::Filter,
    schema::{EntitySchema, SchemaRegistry},
};
use predicate_syntax::{Expression, MemberPath};

/// Joins member names with dots; the lowercase variant adds `.lowercase`.
pub struct DottedResolver;

impl FieldResolver for DottedResolver {
    fn resolve_field_name(&self, path: &MemberPath) -> String {
        path.to_string()
    }

    fn resolve_field_name_lowercase(&self, path: &MemberPath) -> String {
        format!("{path}.lowercase")
    }
}

pub fn registry() -> SchemaRegistry {
    SchemaRegistry::new()
        .register(
            EntitySchema::new(TypeHandle::new("Shop.Product", "Shop"))
                .with_field("Id", DataType::Int)
                .with_field("ParentId", DataType::nullable(DataType::Int))
                .with_field("Name", DataType::String)
                .with_field("Price", DataType::Float)
                .with_field("Active", DataType::Boolean)
                .with_field("Created", DataType::Timestamp)
                .with_field("Color", DataType::Enum("Color".into()))
                .with_field("Owner", DataType::Entity("Shop.Customer".into())),
        )
        .register(
            EntitySchema::new(TypeHandle::new("Shop.Book", "Shop"))
                .with_base("Shop.Product")
                .with_field("Isbn", DataType::String),
        )
        .register(
            EntitySchema::new(TypeHandle::new("Shop.Customer", "Shop"))
                .with_field("Name", DataType::String)
                .with_field("Vip", DataType::Boolean),
        )
        .register(
            EntitySchema::new(TypeHandle::new("Shop.Company", "Shop"))
                .with_base("Shop.Customer"),
        )
        .register_enum("Color", &["Red", "Blue"])
}

pub fn parse(source: &str) -> Expression {
    predicate_syntax::parse(source, &registry(), "Shop.Product").unwrap()
}

pub fn compile_with(
    source: &str,
    captures: &Captures,
    hierarchy: &dyn TypeHierarchy,
) -> Result<Option<Filter>> {
    let expr = parse(source);
    PredicateCompiler::new(&DottedResolver, hierarchy, captures).compile(&expr)
}

pub fn compile(source: &str) -> Result<Option<Filter>> {
    compile_with(source, &Captures::new(), &DefaultTypeHierarchy)
}

/// Compiles and expects a filter.
pub fn filter(source: &str) -> Filter {
    compile(source).unwrap().unwrap()
}
