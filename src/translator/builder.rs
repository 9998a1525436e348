//! # Query Builder
//!
//! Assembles [`QueryParameters`] from the flat query option map of one
//! request. Recognized options are `$filter`, `$orderby`, `$top`, `$select`
//! and `$count`; anything else is ignored.

use std::collections::HashMap;
use std::sync::Arc;

use crate::delegation::{
    ColumnProjection, Filter, OrderDirection, OrderKey, QueryError, QueryParameters, QueryResult,
    TableCapabilities,
};
use crate::odata::{EdmModel, ODataQueryOptionParser, OrderByDirection};
use crate::value::RecordSchema;

use super::translator::translate;

/// Builds query parameters for a table with the given schema
pub fn build(
    schema: &RecordSchema,
    query: &HashMap<String, String>,
    capabilities: Arc<TableCapabilities>,
) -> QueryResult<QueryParameters> {
    let model = EdmModel::from_schema(schema);
    let parser = ODataQueryOptionParser::new(&model, query);

    let filter = match parser.parse_filter()? {
        Some(clause) => translate(&clause.expression)?,
        None => Filter::empty(),
    };

    let mut params = QueryParameters::new(capabilities).with_filter(filter);

    if let Some(clause) = parser.parse_order_by()? {
        let field = clause.expression.as_property().ok_or_else(|| {
            QueryError::unsupported_construct(
                clause.expression.kind_name(),
                "$orderby must name a property",
            )
        })?;
        let key = match clause.direction {
            OrderByDirection::Ascending => OrderKey::asc(field),
            OrderByDirection::Descending => OrderKey::desc(field),
        };
        params = params.with_order(vec![key]);
    }

    if let Some(value) = query.get("$select") {
        params = params.with_projection(parse_select(&model, value)?);
    }

    if let Some(value) = query.get("$top") {
        params = params.with_limit(parse_top(value)?);
    }

    if let Some(value) = query.get("$count") {
        params = params.with_total_count(parse_count(value)?);
    }

    Ok(params)
}

/// Parse `$select` (comma-separated field list)
fn parse_select(model: &EdmModel, value: &str) -> QueryResult<Vec<ColumnProjection>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|field| {
            if model.contains(field) {
                Ok(ColumnProjection::new(field))
            } else {
                Err(QueryError::schema_resolution(field))
            }
        })
        .collect()
}

/// Parse `$top`
fn parse_top(value: &str) -> QueryResult<i64> {
    value
        .trim()
        .parse::<u32>()
        .map(i64::from)
        .map_err(|_| {
            QueryError::invalid_query_option(
                "$top",
                format!("'{}' is not a non-negative integer", value),
            )
        })
}

/// Parse `$count`
fn parse_count(value: &str) -> QueryResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(QueryError::invalid_query_option(
            "$count",
            format!("'{}' is not a boolean", value),
        )),
    }
}

/// Renders the order keys of built parameters as `$orderby` text
pub fn order_by_text(params: &QueryParameters) -> Option<String> {
    let keys = params.order.as_ref().filter(|keys| !keys.is_empty())?;
    let items: Vec<String> = keys
        .iter()
        .map(|key| match key.direction {
            OrderDirection::Ascending => key.field.clone(),
            OrderDirection::Descending => format!("{} desc", key.field),
        })
        .collect();
    Some(items.join(","))
}
