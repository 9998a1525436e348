//! Delegation Pipeline Tests
//!
//! End-to-end behavior from OData query options to in-memory results:
//! - Query options build into parameters (filter, order, top, select, count)
//! - Filter runs before sort, sort before limit, limit before projection
//! - Null checks, decimal/float coercion and field functions
//! - Joins, distinct and aggregates are rejected
//! - Every error code surfaces from the right stage

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use connector_shim::delegation::{
    Aggregate, ColumnProjection, Condition, ConditionOperator, FieldFunction, Filter, JoinSpec,
    OrderKey, QueryErrorCode, QueryParameters, TableCapabilities,
};
use connector_shim::executor::{execute, InMemoryExecutor};
use connector_shim::translator::build;
use connector_shim::value::{FieldDef, FieldKind, Record, RecordSchema, ScalarValue, Table};
use rust_decimal::Decimal;

// =============================================================================
// Helper Functions
// =============================================================================

fn numbers_table() -> Table {
    let mut table = Table::new(
        RecordSchema::new()
            .with_field("n", FieldKind::Number)
            .with_field("s", FieldKind::String),
    );
    for (n, s) in [(10, "Ten"), (20, "Twenty"), (30, "Thirty")] {
        let record = table.record().with("n", n).with("s", s);
        table.push(record);
    }
    table
}

fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn run(table: &Table, pairs: &[(&str, &str)]) -> Vec<Record> {
    let params = build(
        table.schema(),
        &query(pairs),
        Arc::new(TableCapabilities::common()),
    )
    .unwrap();
    execute(table, &params).unwrap()
}

fn strings(records: &[Record], field: &str) -> Vec<String> {
    records
        .iter()
        .map(|r| r.value(field).to_string())
        .collect()
}

// =============================================================================
// Pipeline Order Tests
// =============================================================================

/// Filter, order, limit and select compose in that order.
#[test]
fn test_reference_scenario() {
    let records = run(
        &numbers_table(),
        &[
            ("$filter", "n gt 10"),
            ("$orderby", "n desc"),
            ("$top", "1"),
            ("$select", "s"),
        ],
    );

    assert_eq!(records.len(), 1);
    let fields: Vec<_> = records[0].fields().collect();
    assert_eq!(fields, vec![("s", &ScalarValue::from("Thirty"))]);
}

/// Limit applies after sorting, not to the unsorted input.
#[test]
fn test_limit_after_sort() {
    let records = run(&numbers_table(), &[("$orderby", "n desc"), ("$top", "2")]);
    assert_eq!(strings(&records, "s"), vec!["Thirty", "Twenty"]);
}

/// Sorting sees only the filtered rows.
#[test]
fn test_filter_before_sort() {
    let records = run(
        &numbers_table(),
        &[("$filter", "n lt 30"), ("$orderby", "s")],
    );
    assert_eq!(strings(&records, "s"), vec!["Ten", "Twenty"]);
}

/// `$top=0` leaves the result untouched.
#[test]
fn test_top_zero_is_no_limit() {
    let records = run(&numbers_table(), &[("$top", "0")]);
    assert_eq!(records.len(), 3);
}

// =============================================================================
// Predicate Tests
// =============================================================================

#[test]
fn test_and_or_filters() {
    let table = numbers_table();

    let both = run(&table, &[("$filter", "n gt 10 and s eq 'Thirty'")]);
    assert_eq!(strings(&both, "s"), vec!["Thirty"]);

    let either = run(&table, &[("$filter", "n eq 10 or s eq 'Thirty'")]);
    assert_eq!(strings(&either, "s"), vec!["Ten", "Thirty"]);

    let grouped = run(
        &table,
        &[("$filter", "(n eq 10 or n eq 20) and s ne 'Ten'")],
    );
    assert_eq!(strings(&grouped, "s"), vec!["Twenty"]);
}

#[test]
fn test_contains_filter() {
    let records = run(&numbers_table(), &[("$filter", "contains(s, 'en')")]);
    assert_eq!(strings(&records, "s"), vec!["Ten", "Twenty"]);
}

/// IsNull matches absent and explicit nulls, never a zero.
#[test]
fn test_null_checks() {
    let mut table = Table::new(RecordSchema::new().with_field("x", FieldKind::Number));
    let absent = table.record();
    let explicit = table.record().with("x", ScalarValue::Null);
    let zero = table.record().with("x", 0);
    table.push(absent);
    table.push(explicit);
    table.push(zero);

    let nulls = run(&table, &[("$filter", "x eq null")]);
    assert_eq!(nulls.len(), 2);

    let not_nulls = run(&table, &[("$filter", "x ne null")]);
    assert_eq!(not_nulls.len(), 1);
    assert_eq!(not_nulls[0].value("x"), &ScalarValue::Number(0.0));
}

/// Ordered comparisons against a null stored value are false.
#[test]
fn test_null_in_ordered_comparison_is_false() {
    let mut table = Table::new(RecordSchema::new().with_field("x", FieldKind::Number));
    let row = table.record();
    table.push(row);

    assert!(run(&table, &[("$filter", "x gt 1")]).is_empty());
    assert!(run(&table, &[("$filter", "x lt 1")]).is_empty());
}

/// A decimal column compares against float literals and vice versa.
#[test]
fn test_decimal_float_coercion() {
    let mut table = Table::new(
        RecordSchema::new()
            .with_field("price", FieldKind::Decimal)
            .with_field("weight", FieldKind::Number),
    );
    let row = table
        .record()
        .with("price", Decimal::new(1050, 2))
        .with("weight", 2.5);
    table.push(row);

    assert_eq!(run(&table, &[("$filter", "price eq 10.5")]).len(), 1);
    assert_eq!(run(&table, &[("$filter", "price gt 10")]).len(), 1);
    assert_eq!(run(&table, &[("$filter", "weight eq 2.5m")]).len(), 1);
    assert!(run(&table, &[("$filter", "weight lt 2.5m")]).is_empty());
}

/// Only the first field function of a condition is consulted.
#[test]
fn test_first_field_function_wins() {
    let mut table = Table::new(
        RecordSchema::new()
            .with_field("name", FieldKind::String)
            .with_field("born", FieldKind::Date),
    );
    let row = table
        .record()
        .with("name", "Grace")
        .with("born", NaiveDate::from_ymd_opt(1906, 12, 9).unwrap());
    table.push(row);

    let condition = Condition::new(
        "name",
        ConditionOperator::Equal,
        vec![ScalarValue::from("Gr")],
    )
    .with_field_function(FieldFunction::StartsWith)
    .with_field_function(FieldFunction::EndsWith);
    let params = QueryParameters::default().with_filter(Filter::condition(condition));
    assert_eq!(execute(&table, &params).unwrap().len(), 1);

    let year = Condition::new("born", ConditionOperator::Equal, vec![ScalarValue::from(1906)])
        .with_field_function(FieldFunction::Year);
    let params = QueryParameters::default().with_filter(Filter::condition(year));
    assert_eq!(execute(&table, &params).unwrap().len(), 1);
}

// =============================================================================
// Rejection Tests
// =============================================================================

#[test]
fn test_unknown_field_is_schema_resolution() {
    let table = numbers_table();
    for pairs in [
        [("$filter", "missing eq 1")],
        [("$orderby", "missing")],
        [("$select", "n,missing")],
    ] {
        let err = build(
            table.schema(),
            &query(&pairs),
            Arc::new(TableCapabilities::common()),
        )
        .unwrap_err();
        assert_eq!(err.code(), QueryErrorCode::SchemaResolution, "{:?}", pairs);
    }
}

#[test]
fn test_malformed_options_are_invalid() {
    let table = numbers_table();
    for pairs in [
        [("$top", "-1")],
        [("$top", "ten")],
        [("$count", "yes")],
        [("$filter", "n gt")],
        [("$filter", "s eq 'open")],
    ] {
        let err = build(
            table.schema(),
            &query(&pairs),
            Arc::new(TableCapabilities::common()),
        )
        .unwrap_err();
        assert_eq!(err.code(), QueryErrorCode::InvalidQueryOption, "{:?}", pairs);
    }
}

#[test]
fn test_unsupported_shapes() {
    let table = numbers_table();
    let err = build(
        table.schema(),
        &query(&[("$filter", "not (n eq 10)")]),
        Arc::new(TableCapabilities::common()),
    )
    .unwrap_err();
    assert_eq!(err.code(), QueryErrorCode::UnsupportedConstruct);
}

#[test]
fn test_type_mismatch_at_execution() {
    let records = build(
        numbers_table().schema(),
        &query(&[("$filter", "s gt 5")]),
        Arc::new(TableCapabilities::common()),
    )
    .and_then(|params| execute(&numbers_table(), &params));
    assert_eq!(records.unwrap_err().code(), QueryErrorCode::TypeMismatch);
}

/// Joins fail regardless of anything else in the parameters.
#[test]
fn test_joins_always_rejected() {
    let empty = Table::new(RecordSchema::new());
    let params = QueryParameters::default()
        .with_join(JoinSpec::new("Other", "id", "owner"))
        .with_limit(5);

    let err = execute(&empty, &params).unwrap_err();
    assert_eq!(err.code(), QueryErrorCode::UnsupportedFeature);
}

#[test]
fn test_aggregates_rejected() {
    let params = QueryParameters::default()
        .with_projection(vec![ColumnProjection::new("n").with_aggregate(Aggregate::Count)]);
    let err = InMemoryExecutor::new(&numbers_table())
        .execute(&params)
        .unwrap_err();
    assert_eq!(err.code(), QueryErrorCode::UnsupportedFeature);
}

// =============================================================================
// Projection Tests
// =============================================================================

#[test]
fn test_projection_renames_and_skips_relationships() {
    let mut table = Table::new(
        RecordSchema::new()
            .with_field("id", FieldKind::Number)
            .with(FieldDef::new("owner", FieldKind::Guid).relationship()),
    );
    let row = table.record().with("id", 7);
    table.push(row);

    let params = QueryParameters::default().with_projection(vec![
        ColumnProjection::aliased("id", "Identifier"),
        ColumnProjection::new("owner"),
    ]);
    let records = execute(&table, &params).unwrap();

    let fields: Vec<_> = records[0].fields().collect();
    assert_eq!(fields, vec![("Identifier", &ScalarValue::Number(7.0))]);
}

#[test]
fn test_multi_key_sort_is_stable() {
    let mut table = Table::new(
        RecordSchema::new()
            .with_field("group", FieldKind::String)
            .with_field("rank", FieldKind::Number)
            .with_field("tag", FieldKind::String),
    );
    for (group, rank, tag) in [
        ("b", 1, "first"),
        ("a", 1, "second"),
        ("b", 2, "third"),
        ("a", 1, "fourth"),
    ] {
        let row = table
            .record()
            .with("group", group)
            .with("rank", rank)
            .with("tag", tag);
        table.push(row);
    }

    let params = QueryParameters::default()
        .with_order(vec![OrderKey::asc("group"), OrderKey::desc("rank")]);
    let records = execute(&table, &params).unwrap();

    assert_eq!(
        strings(&records, "tag"),
        vec!["second", "fourth", "third", "first"]
    );
}
