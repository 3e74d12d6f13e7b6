//! Renders filters and requests as JSON bodies in the classic search filter
//! DSL (`term`, `range`, `prefix`, `exists`, `not`, `and`, `or`).

use crate::request::SearchRequest;
use model::{core::value::Value, filter::Filter};
use serde_json::{Map, Number, Value as JsonValue, json};
use tracing::{debug, warn};

pub fn render_filter(filter: &Filter) -> JsonValue {
    match filter {
        Filter::Term { field, value } => keyed("term", keyed(field, render_value(value))),
        Filter::Range {
            field,
            from,
            to,
            include_lower,
            include_upper,
        } => {
            let bounds = json!({
                "from": from.as_ref().map(render_value),
                "to": to.as_ref().map(render_value),
                "include_lower": include_lower,
                "include_upper": include_upper,
            });
            keyed("range", keyed(field, bounds))
        }
        Filter::Prefix { field, value } => keyed("prefix", keyed(field, json!(value))),
        Filter::Exists { field } => json!({ "exists": { "field": field } }),
        Filter::Not(inner) => json!({ "not": { "filter": render_filter(inner) } }),
        Filter::And(children) => json!({ "and": render_all(children) }),
        Filter::Or(children) => json!({ "or": render_all(children) }),
    }
}

/// Full request body. Attached filters wrap the query in a `filtered` query.
pub fn render_request(request: &SearchRequest) -> JsonValue {
    let query = match &request.query {
        Some(text) => json!({ "query_string": { "query": text } }),
        None => json!({ "match_all": {} }),
    };

    let query = match request.combined_filter() {
        Some(filter) => json!({
            "filtered": {
                "query": query,
                "filter": render_filter(&filter),
            }
        }),
        None => query,
    };

    let mut body = Map::new();
    body.insert(
        "type".to_string(),
        json!(request.type_handle.full_name()),
    );
    if let Some(skip) = request.skip {
        body.insert("from".to_string(), json!(skip));
    }
    if let Some(take) = request.take {
        body.insert("size".to_string(), json!(take));
    }
    body.insert("query".to_string(), query);

    debug!(
        type_name = %request.type_handle,
        filters = request.filters.len(),
        "Rendered search request"
    );
    JsonValue::Object(body)
}

fn render_all(children: &[Filter]) -> JsonValue {
    JsonValue::Array(children.iter().map(render_filter).collect())
}

fn render_value(value: &Value) -> JsonValue {
    match value {
        Value::Int(i) => json!(i),
        Value::Float(f) => match Number::from_f64(*f) {
            Some(n) => JsonValue::Number(n),
            None => {
                warn!(value = %f, "Non-finite float rendered as null");
                JsonValue::Null
            }
        },
        Value::String(s) => json!(s),
        Value::Boolean(b) => json!(b),
        Value::Timestamp(ts) => json!(ts.to_rfc3339()),
        Value::Enum(_, member) => json!(member),
        Value::Type(handle) => json!(handle.assembly_qualified_name()),
        Value::Json(json) => json.clone(),
        Value::Null => JsonValue::Null,
    }
}

fn keyed(key: &str, value: JsonValue) -> JsonValue {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    JsonValue::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::SearchRequestBuilder;
    use model::core::type_handle::TypeHandle;

    #[test]
    fn test_render_leaves() {
        assert_eq!(
            render_filter(&Filter::term("Id$$number", 42)),
            json!({ "term": { "Id$$number": 42 } })
        );
        assert_eq!(
            render_filter(&Filter::prefix("Name$$string", "Ab")),
            json!({ "prefix": { "Name$$string": "Ab" } })
        );
        assert_eq!(
            render_filter(&Filter::exists("ParentId$$number")),
            json!({ "exists": { "field": "ParentId$$number" } })
        );
    }

    #[test]
    fn test_render_range() {
        assert_eq!(
            render_filter(&Filter::less_than("Id", Value::Int(10), false)),
            json!({
                "range": {
                    "Id": {
                        "from": null,
                        "to": 10,
                        "include_lower": true,
                        "include_upper": false,
                    }
                }
            })
        );
    }

    #[test]
    fn test_render_connectives() {
        let filter = Filter::and(vec![
            Filter::term("Active", true),
            Filter::not(Filter::or(vec![
                Filter::term("Color", Value::Enum("Color".into(), "Red".into())),
                Filter::term("$type", TypeHandle::new("Shop.Book", "Shop")),
            ])),
        ]);

        assert_eq!(
            render_filter(&filter),
            json!({
                "and": [
                    { "term": { "Active": true } },
                    { "not": { "filter": { "or": [
                        { "term": { "Color": "Red" } },
                        { "term": { "$type": "Shop.Book, Shop" } },
                    ] } } },
                ]
            })
        );
    }

    #[test]
    fn test_render_request_without_filters() {
        let request = SearchRequestBuilder::new(TypeHandle::new("Shop.Product", "Shop"))
            .query("lamp")
            .take(5)
            .build();

        assert_eq!(
            render_request(&request),
            json!({
                "type": "Shop.Product",
                "size": 5,
                "query": { "query_string": { "query": "lamp" } },
            })
        );
    }

    #[test]
    fn test_render_request_ands_filters() {
        let request = SearchRequestBuilder::new(TypeHandle::new("Shop.Product", "Shop"))
            .filter(Filter::term("Active", true))
            .filter(Filter::exists("Name$$string"))
            .skip(10)
            .build();

        assert_eq!(
            render_request(&request),
            json!({
                "type": "Shop.Product",
                "from": 10,
                "query": {
                    "filtered": {
                        "query": { "match_all": {} },
                        "filter": { "and": [
                            { "term": { "Active": true } },
                            { "exists": { "field": "Name$$string" } },
                        ] },
                    }
                },
            })
        );
    }
}
