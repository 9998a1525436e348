//! In-memory query executor
//!
//! Executes query parameters directly against a materialized table.
//!
//! Execution flow (strict order):
//! 1. Reject joins, distinct and aggregate columns
//! 2. Filter records by the predicate tree
//! 3. Apply sort (if specified)
//! 4. Apply limit (if positive)
//! 5. Project columns (if specified)

use crate::delegation::{QueryError, QueryParameters, QueryResult};
use crate::value::{Record, Table};

use super::filters::PredicateFilter;
use super::projector::Projector;
use super::result::ExecutionResult;
use super::sorter::ResultSorter;

/// Executes query parameters against an in-memory table
pub struct InMemoryExecutor<'a> {
    table: &'a Table,
}

impl<'a> InMemoryExecutor<'a> {
    /// Creates a new executor
    pub fn new(table: &'a Table) -> Self {
        Self { table }
    }

    /// Executes the query and returns results.
    ///
    /// Deterministic: same parameters and same table give the same records
    /// in the same order. Any error fails the whole query.
    pub fn execute(&self, params: &QueryParameters) -> QueryResult<ExecutionResult> {
        // Step 1: Preconditions
        Self::check_supported(params)?;

        // Resolve projection before touching rows so schema errors surface
        // even for empty tables
        let projector = match &params.projection {
            Some(columns) => Some(Projector::new(self.table.schema(), columns)?),
            None => None,
        };

        // Step 2: Filter
        let mut candidates = Vec::new();
        let mut scanned_count = 0;
        for record in self.table.rows() {
            scanned_count += 1;
            if PredicateFilter::matches(record, &params.filter)? {
                candidates.push(record.clone());
            }
        }
        let matched_count = candidates.len();

        // Step 3: Sort
        if let Some(order) = &params.order {
            ResultSorter::sort(&mut candidates, order);
        }

        // Step 4: Limit
        let mut limit_applied = false;
        if let Some(limit) = params.effective_limit() {
            limit_applied = candidates.len() > limit;
            candidates.truncate(limit);
        }

        // Step 5: Project
        let records = match projector {
            Some(projector) => projector.project_all(candidates),
            None => candidates,
        };

        Ok(ExecutionResult {
            records,
            scanned_count,
            matched_count,
            limit_applied,
        })
    }

    fn check_supported(params: &QueryParameters) -> QueryResult<()> {
        if !params.joins.is_empty() {
            return Err(QueryError::unsupported_feature("joins"));
        }

        for column in params.projection.iter().flatten() {
            if column.is_distinct {
                return Err(QueryError::unsupported_feature(format!(
                    "distinct projection of '{}'",
                    column.source_field
                )));
            }
            if !column.is_plain() {
                return Err(QueryError::unsupported_feature(format!(
                    "aggregation '{}' of '{}'",
                    column.aggregate.as_str(),
                    column.source_field
                )));
            }
        }

        Ok(())
    }
}

/// Executes query parameters against a table and returns the records
pub fn execute(table: &Table, params: &QueryParameters) -> QueryResult<Vec<Record>> {
    InMemoryExecutor::new(table)
        .execute(params)
        .map(ExecutionResult::into_records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delegation::{
        Aggregate, ColumnProjection, Condition, Filter, JoinSpec, OrderKey, QueryErrorCode,
    };
    use crate::value::{FieldKind, RecordSchema, ScalarValue};

    fn table() -> Table {
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

    #[test]
    fn test_full_pipeline() {
        let params = QueryParameters::default()
            .with_filter(Filter::condition(Condition::gt("n", 10)))
            .with_order(vec![OrderKey::desc("n")])
            .with_limit(1)
            .with_projection(vec![ColumnProjection::new("s")]);

        let result = InMemoryExecutor::new(&table()).execute(&params).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result.scanned_count, 3);
        assert_eq!(result.matched_count, 2);
        assert!(result.limit_applied);
        let fields: Vec<_> = result.records[0].fields().collect();
        assert_eq!(fields, vec![("s", &ScalarValue::from("Thirty"))]);
    }

    #[test]
    fn test_no_parameters_returns_everything() {
        let records = execute(&table(), &QueryParameters::default()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].value("s"), &ScalarValue::from("Ten"));
    }

    #[test]
    fn test_non_positive_limit_is_ignored() {
        for limit in [0, -1] {
            let params = QueryParameters::default().with_limit(limit);
            let result = InMemoryExecutor::new(&table()).execute(&params).unwrap();
            assert_eq!(result.len(), 3);
            assert!(!result.limit_applied);
        }
    }

    #[test]
    fn test_joins_rejected() {
        let params = QueryParameters::default()
            .with_join(JoinSpec::new("other", "n", "id"))
            .with_projection(vec![ColumnProjection::new("zzz")]);

        let err = execute(&table(), &params).unwrap_err();
        assert_eq!(err.code(), QueryErrorCode::UnsupportedFeature);
        assert_eq!(err.construct(), Some("joins"));
    }

    #[test]
    fn test_distinct_and_aggregate_rejected() {
        let distinct = QueryParameters::default()
            .with_projection(vec![ColumnProjection::new("s").distinct()]);
        assert_eq!(
            execute(&table(), &distinct).unwrap_err().code(),
            QueryErrorCode::UnsupportedFeature
        );

        let sum = QueryParameters::default()
            .with_projection(vec![ColumnProjection::new("n").with_aggregate(Aggregate::Sum)]);
        assert_eq!(
            execute(&table(), &sum).unwrap_err().code(),
            QueryErrorCode::UnsupportedFeature
        );
    }

    #[test]
    fn test_projection_schema_error_on_empty_table() {
        let empty = Table::new(RecordSchema::new().with_field("n", FieldKind::Number));
        let params =
            QueryParameters::default().with_projection(vec![ColumnProjection::new("missing")]);

        let err = execute(&empty, &params).unwrap_err();
        assert_eq!(err.code(), QueryErrorCode::SchemaResolution);
    }

    #[test]
    fn test_filter_error_fails_query() {
        let params = QueryParameters::default()
            .with_filter(Filter::condition(Condition::gt("s", 5)));
        let err = execute(&table(), &params).unwrap_err();
        assert_eq!(err.code(), QueryErrorCode::TypeMismatch);
    }
}
