//! Table provider seam
//!
//! A provider lists datasets and tables and hands out the source of each
//! table: either a materialized table run through the in-memory executor,
//! or a delegated table that executes the query parameters itself.

use std::fmt;
use std::sync::Arc;

use crate::delegation::{QueryParameters, QueryResult, TableCapabilities};
use crate::value::{Record, RecordSchema, Table};

use super::metadata::{DatasetItem, TableItem};

/// A table backed by something able to run query parameters directly
pub trait DelegatedTable: Send + Sync {
    /// Schema of the records returned by `query`
    fn schema(&self) -> &RecordSchema;

    /// Runs the parameters and returns the resulting records
    fn query(&self, params: &QueryParameters) -> QueryResult<Vec<Record>>;
}

/// Where the rows of a table come from
#[derive(Clone)]
pub enum TableSource {
    /// Rows held in memory, executed by the in-memory engine
    Local(Arc<Table>),
    /// Rows held by a backend that executes the query itself
    Delegated(Arc<dyn DelegatedTable>),
}

impl TableSource {
    pub fn schema(&self) -> &RecordSchema {
        match self {
            TableSource::Local(table) => table.schema().as_ref(),
            TableSource::Delegated(table) => table.schema(),
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, TableSource::Local(_))
    }
}

impl fmt::Debug for TableSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableSource::Local(table) => f
                .debug_struct("Local")
                .field("rows", &table.len())
                .finish(),
            TableSource::Delegated(_) => f.write_str("Delegated"),
        }
    }
}

/// Lists datasets and tables and resolves table sources
pub trait TableProvider: Send + Sync {
    /// All datasets served by this provider
    fn datasets(&self) -> Vec<DatasetItem>;

    /// Tables of one dataset; `NotFound` for an unknown dataset
    fn tables(&self, dataset: &str) -> QueryResult<Vec<TableItem>>;

    /// Resolves the source of a table; `NotFound` when it does not exist
    fn table(&self, dataset: &str, table: &str) -> QueryResult<TableSource>;

    /// Schema of a table
    fn table_schema(&self, dataset: &str, table: &str) -> QueryResult<RecordSchema> {
        Ok(self.table(dataset, table)?.schema().clone())
    }

    /// Capabilities advertised for a table
    fn capabilities(&self, dataset: &str, table: &str) -> QueryResult<Arc<TableCapabilities>> {
        self.table(dataset, table)?;
        Ok(Arc::new(TableCapabilities::common()))
    }
}
