mod common;

use chrono::{TimeZone, Utc};
use common::{compile, filter};
use filter_compiler::CompileError;
use model::{core::value::Value, filter::Filter};

#[test]
fn test_equality_with_literal() {
    assert_eq!(filter("x => x.Id == 42"), Filter::term("Id", 42));
    assert_eq!(filter(r#"x => x.Name == "Hello""#), Filter::term("Name", "Hello"));
}

#[test]
fn test_equality_with_literal_on_the_left() {
    assert_eq!(filter("x => 42 == x.Id"), Filter::term("Id", 42));
}

#[test]
fn test_equality_with_null() {
    assert_eq!(
        filter("x => x.ParentId == null"),
        Filter::not(Filter::exists("ParentId"))
    );
    assert_eq!(filter("x => x.ParentId != null"), Filter::exists("ParentId"));
    assert_eq!(filter("x => null != x.ParentId"), Filter::exists("ParentId"));
}

#[test]
fn test_not_equal_literal() {
    assert_eq!(
        filter("x => x.Id != 7"),
        Filter::not(Filter::term("Id", 7))
    );
}

#[test]
fn test_ranges() {
    assert_eq!(
        filter("x => x.Id < 10"),
        Filter::less_than("Id", Value::Int(10), false)
    );
    assert_eq!(
        filter("x => x.Id <= 10"),
        Filter::less_than("Id", Value::Int(10), true)
    );
    assert_eq!(
        filter("x => x.Id > 10"),
        Filter::greater_than("Id", Value::Int(10), false)
    );
    assert_eq!(
        filter("x => x.Id >= 10"),
        Filter::greater_than("Id", Value::Int(10), true)
    );
}

#[test]
fn test_range_with_field_on_the_right_is_mirrored() {
    assert_eq!(
        filter("x => 42 > x.Id"),
        Filter::less_than("Id", Value::Int(42), false)
    );
    assert_eq!(
        filter("x => 42 <= x.Id"),
        Filter::greater_than("Id", Value::Int(42), true)
    );
}

#[test]
fn test_timestamp_range() {
    let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(
        filter(r#"x => x.Created >= date("2024-01-01")"#),
        Filter::greater_than("Created", Value::Timestamp(ts), true)
    );
}

#[test]
fn test_range_on_unsupported_value_type_is_skipped() {
    assert_eq!(compile("x => x.Price < 9.5").unwrap(), None);
    assert_eq!(compile(r#"x => x.Name > "m""#).unwrap(), None);
}

#[test]
fn test_enum_term_uses_member_name() {
    assert_eq!(filter("x => x.Color == Color.Red"), Filter::term("Color", "Red"));
}

#[test]
fn test_computed_field_side_is_unfiltered() {
    assert_eq!(compile("x => x.Id + 1 == 5").unwrap(), None);
}

#[test]
fn test_comparing_two_fields_is_rejected() {
    let err = compile("x => x.Id == x.ParentId").unwrap_err();
    assert!(matches!(err, CompileError::UnsupportedComparison(_)));
}

#[test]
fn test_closed_value_expressions_are_folded() {
    assert_eq!(filter("x => x.Id == 40 + 2"), Filter::term("Id", 42));
    assert_eq!(
        filter(r#"x => x.Name == "Hel" + "lo""#),
        Filter::term("Name", "Hello")
    );
}

#[test]
fn test_lowercase_comparison() {
    assert_eq!(
        filter(r#"x => x.Name.ToLower() == "abc""#),
        Filter::term("Name.lowercase", "abc")
    );
    assert_eq!(
        filter(r#"x => x.Owner.Name.ToLowerInvariant() != "abc""#),
        Filter::not(Filter::term("Owner.Name.lowercase", "abc"))
    );
}

#[test]
fn test_lowercase_comparison_with_culture() {
    assert_eq!(
        filter(r#"x => x.Name.ToLower(CultureInfo.InvariantCulture) == "Hello""#),
        Filter::term("Name.lowercase", "Hello")
    );
}

#[test]
fn test_float_equality_is_a_term() {
    assert_eq!(filter("x => x.Price == 42.42"), Filter::term("Price", 42.42));
}
