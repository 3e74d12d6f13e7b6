use chrono::{TimeZone, Utc};
use expression_engine::Captures;
use model::{
    core::{data_type::DataType, type_handle::TypeHandle, value::Value},
    filter::Filter,
    schema::{EntitySchema, SchemaRegistry},
};
use predicate_syntax::ast::dsl::*;
use search::{Client, SearchError, render_request};
use serde_json::json;

fn registry() -> SchemaRegistry {
    SchemaRegistry::new()
        .register(
            EntitySchema::new(TypeHandle::new("Shop.Product", "Shop"))
                .with_field("Id", DataType::Int)
                .with_field("Name", DataType::String)
                .with_field("Active", DataType::Boolean)
                .with_field("Created", DataType::Timestamp)
                .with_field("Owner", DataType::Entity("Shop.Customer".into())),
        )
        .register(
            EntitySchema::new(TypeHandle::new("Shop.Book", "Shop")).with_base("Shop.Product"),
        )
        .register(
            EntitySchema::new(TypeHandle::new("Shop.Customer", "Shop"))
                .with_field("Name", DataType::String),
        )
}

fn product() -> TypeHandle {
    TypeHandle::new("Shop.Product", "Shop")
}

#[test]
fn test_where_filter_applies_field_conventions() {
    let x = param("Shop.Product");
    let predicate = and_also(
        eq(member(x.clone(), "Id", DataType::Int), lit(42)),
        eq(member(x, "Name", DataType::String), lit("Hello")),
    );

    let filter = Client::default()
        .where_filter(&predicate, &Captures::new())
        .unwrap();

    assert_eq!(
        filter,
        Some(Filter::and(vec![
            Filter::term("Id$$number", 42),
            Filter::term("Name$$string", "Hello"),
        ]))
    );
}

#[test]
fn test_filter_text_uses_lowercase_and_hierarchy_fields() {
    let client = Client::default();
    let request = client
        .search(product())
        .filter_text(
            r#"x => x.Owner.Name.StartsWith("Ann", StringComparison.OrdinalIgnoreCase) && x is Book"#,
            &registry(),
            &Captures::new(),
        )
        .unwrap()
        .into_request();

    assert_eq!(
        request.filters,
        vec![Filter::and(vec![
            Filter::prefix("Owner.Name$$string.lowercase", "ann"),
            Filter::term("___types", "Shop.Book"),
        ])]
    );
}

#[test]
fn test_filters_accumulate_and_render() {
    let captures = Captures::from([(
        "since".to_string(),
        Value::Timestamp(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()),
    )]);
    let client = Client::default();

    let request = client
        .search(product())
        .query("lamp")
        .filter_text("x => x.Created >= @since", &registry(), &captures)
        .unwrap()
        .filter(Filter::term("Active", true))
        .skip(20)
        .take(10)
        .into_request();

    assert_eq!(
        render_request(&request),
        json!({
            "type": "Shop.Product",
            "from": 20,
            "size": 10,
            "query": {
                "filtered": {
                    "query": { "query_string": { "query": "lamp" } },
                    "filter": { "and": [
                        { "range": { "Created$$date": {
                            "from": "2024-03-01T00:00:00+00:00",
                            "to": null,
                            "include_lower": true,
                            "include_upper": true,
                        } } },
                        { "term": { "Active": true } },
                    ] },
                }
            }
        })
    );
}

#[test]
fn test_unfilterable_predicate_adds_nothing() {
    let client = Client::default();
    let search = client
        .search(product())
        .filter_text("x => true", &registry(), &Captures::new())
        .unwrap();

    assert!(search.request().filters.is_empty());
}

#[test]
fn test_errors_surface() {
    let client = Client::default();

    let err = client
        .search(product())
        .filter_text("x => x.Missing == 1", &registry(), &Captures::new())
        .err()
        .unwrap();
    assert!(matches!(err, SearchError::Syntax(_)));

    let err = client
        .search(product())
        .filter_text("x => x.Id == x.Id", &registry(), &Captures::new())
        .err()
        .unwrap();
    assert!(matches!(err, SearchError::Compile(_)));
}
