//! Query parameters
//!
//! The complete description of one delegated query: predicate tree, sort
//! keys, row limit, projection, joins and the capabilities of the table it
//! targets. Built once by the query builder (or programmatically) and then
//! only read.

use std::sync::Arc;

use super::capabilities::TableCapabilities;
use super::filter::Filter;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    #[default]
    Ascending,
    Descending,
}

impl OrderDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderDirection::Ascending => "asc",
            OrderDirection::Descending => "desc",
        }
    }
}

/// A single sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderKey {
    pub field: String,
    pub direction: OrderDirection,
}

impl OrderKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: OrderDirection::Ascending,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: OrderDirection::Descending,
        }
    }
}

/// Ordered list of sort keys; the first entry is primary
pub type OrderSpec = Vec<OrderKey>;

/// Summarization applied to a projected column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Aggregate {
    #[default]
    None,
    Sum,
    Min,
    Max,
    Average,
    Count,
    CountRows,
}

impl Aggregate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregate::None => "none",
            Aggregate::Sum => "sum",
            Aggregate::Min => "min",
            Aggregate::Max => "max",
            Aggregate::Average => "average",
            Aggregate::Count => "count",
            Aggregate::CountRows => "countrows",
        }
    }
}

/// One output column: source field, output name and modifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnProjection {
    pub source_field: String,
    pub output_alias: String,
    pub is_distinct: bool,
    pub aggregate: Aggregate,
}

impl ColumnProjection {
    /// Project a field under its own name
    pub fn new(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            output_alias: field.clone(),
            source_field: field,
            is_distinct: false,
            aggregate: Aggregate::None,
        }
    }

    /// Project a field under another name
    pub fn aliased(field: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            output_alias: alias.into(),
            ..Self::new(field)
        }
    }

    pub fn distinct(mut self) -> Self {
        self.is_distinct = true;
        self
    }

    pub fn with_aggregate(mut self, aggregate: Aggregate) -> Self {
        self.aggregate = aggregate;
        self
    }

    /// Returns true if the in-memory engine can execute this column
    pub fn is_plain(&self) -> bool {
        !self.is_distinct && self.aggregate == Aggregate::None
    }
}

/// Join request; never executable in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSpec {
    pub table: String,
    pub left_field: String,
    pub right_field: String,
}

impl JoinSpec {
    pub fn new(
        table: impl Into<String>,
        left_field: impl Into<String>,
        right_field: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            left_field: left_field.into(),
            right_field: right_field.into(),
        }
    }
}

/// Parameters of one query
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParameters {
    pub filter: Filter,
    pub order: Option<OrderSpec>,
    pub limit: Option<i64>,
    pub projection: Option<Vec<ColumnProjection>>,
    pub joins: Vec<JoinSpec>,
    pub return_total_count: bool,
    pub capabilities: Arc<TableCapabilities>,
}

impl Default for QueryParameters {
    fn default() -> Self {
        Self::new(Arc::new(TableCapabilities::default()))
    }
}

impl QueryParameters {
    /// Empty query: match everything, no order, no limit, all columns
    pub fn new(capabilities: Arc<TableCapabilities>) -> Self {
        Self {
            filter: Filter::empty(),
            order: None,
            limit: None,
            projection: None,
            joins: Vec::new(),
            return_total_count: false,
            capabilities,
        }
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_order(mut self, order: OrderSpec) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_projection(mut self, projection: Vec<ColumnProjection>) -> Self {
        self.projection = Some(projection);
        self
    }

    pub fn with_join(mut self, join: JoinSpec) -> Self {
        self.joins.push(join);
        self
    }

    pub fn with_total_count(mut self, enabled: bool) -> Self {
        self.return_total_count = enabled;
        self
    }

    /// Source field names of the projection, empty when all columns are
    /// requested
    pub fn columns(&self) -> Vec<&str> {
        self.projection
            .iter()
            .flatten()
            .map(|c| c.source_field.as_str())
            .collect()
    }

    /// Renders the filter back into OData `$filter` text for backends that
    /// accept it
    pub fn odata_filter(&self) -> Option<String> {
        self.filter.to_odata()
    }

    pub fn return_total_count(&self) -> bool {
        self.return_total_count
    }

    /// Row limit if one truncates anything
    pub fn effective_limit(&self) -> Option<usize> {
        match self.limit {
            Some(n) if n > 0 => Some(n as usize),
            _ => None,
        }
    }

    pub fn capabilities(&self) -> &TableCapabilities {
        &self.capabilities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delegation::filter::Condition;

    #[test]
    fn test_default_parameters() {
        let params = QueryParameters::default();
        assert!(params.filter.is_empty());
        assert!(params.order.is_none());
        assert!(params.columns().is_empty());
        assert!(!params.return_total_count());
        assert_eq!(params.odata_filter(), None);
    }

    #[test]
    fn test_columns_and_filter_text() {
        let params = QueryParameters::default()
            .with_filter(Filter::condition(Condition::gt("score", 50)))
            .with_projection(vec![
                ColumnProjection::new("name"),
                ColumnProjection::aliased("score", "points"),
            ]);

        assert_eq!(params.columns(), vec!["name", "score"]);
        assert_eq!(params.odata_filter().as_deref(), Some("score gt 50"));
    }

    #[test]
    fn test_effective_limit() {
        assert_eq!(QueryParameters::default().effective_limit(), None);
        assert_eq!(QueryParameters::default().with_limit(0).effective_limit(), None);
        assert_eq!(QueryParameters::default().with_limit(-3).effective_limit(), None);
        assert_eq!(QueryParameters::default().with_limit(2).effective_limit(), Some(2));
    }

    #[test]
    fn test_plain_projection() {
        assert!(ColumnProjection::new("a").is_plain());
        assert!(!ColumnProjection::new("a").distinct().is_plain());
        assert!(!ColumnProjection::new("a")
            .with_aggregate(Aggregate::Sum)
            .is_plain());
    }
}
