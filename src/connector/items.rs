//! Items endpoint logic
//!
//! Builds query parameters from the request options, runs them locally or
//! hands them to the delegated table, and converts the records to the
//! items response.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::delegation::{QueryError, QueryParameters, QueryResult, TableCapabilities};
use crate::executor::InMemoryExecutor;
use crate::observability::{log_event_with_fields, Event};
use crate::translator::{build, order_by_text};
use crate::value::Record;

use super::provider::TableSource;

/// Response of `GET .../items`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemsResponse {
    pub value: Vec<Map<String, Value>>,
    #[serde(
        rename = "@odata.count",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub count: Option<usize>,
}

/// Converts a record into a JSON item.
///
/// Relationship fields and null values are left out.
pub fn record_to_item(record: &Record) -> Map<String, Value> {
    let schema = record.schema();
    record
        .fields()
        .filter(|(name, value)| {
            !value.is_null() && !schema.field(name).is_some_and(|f| f.is_relationship)
        })
        .map(|(name, value)| (name.to_string(), value.to_json()))
        .collect()
}

/// Answers one items request against a table source
pub fn get_items(
    source: &TableSource,
    capabilities: Arc<TableCapabilities>,
    query: &HashMap<String, String>,
) -> QueryResult<ItemsResponse> {
    let params = build(source.schema(), query, capabilities).map_err(reject)?;
    log_built(&params);

    let (records, count) = match source {
        TableSource::Local(table) => {
            let result = InMemoryExecutor::new(table).execute(&params).map_err(reject)?;
            let rows = result.len().to_string();
            let scanned = result.scanned_count.to_string();
            log_event_with_fields(
                Event::QueryExecutedLocal,
                &[("rows", rows.as_str()), ("scanned", scanned.as_str())],
            );
            let records = result.into_records();
            let count = params.return_total_count().then_some(records.len());
            (records, count)
        }
        TableSource::Delegated(table) => {
            let records = table.query(&params).map_err(reject)?;
            let rows = records.len().to_string();
            log_event_with_fields(Event::QueryDelegated, &[("rows", rows.as_str())]);
            (records, None)
        }
    };

    Ok(ItemsResponse {
        value: records.iter().map(record_to_item).collect(),
        count,
    })
}

fn log_built(params: &QueryParameters) {
    let filter = params.odata_filter().unwrap_or_default();
    let order = order_by_text(params).unwrap_or_default();
    let top = params.limit.map(|l| l.to_string()).unwrap_or_default();
    log_event_with_fields(
        Event::QueryBuilt,
        &[
            ("filter", filter.as_str()),
            ("orderby", order.as_str()),
            ("top", top.as_str()),
        ],
    );
}

fn reject(err: QueryError) -> QueryError {
    log_event_with_fields(
        Event::QueryRejected,
        &[("code", err.code().code()), ("message", err.message())],
    );
    err
}
