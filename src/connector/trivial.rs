//! Built-in sample provider
//!
//! One dataset `default` holding one table `MyTable` with ten rows:
//! `NumField` 10 through 100 and `StrField` spelling the number out.

use std::sync::Arc;

use crate::delegation::{QueryError, QueryResult};
use crate::value::{FieldDef, FieldKind, RecordSchema, Table};

use super::metadata::{DatasetItem, TableItem};
use super::provider::{TableProvider, TableSource};

pub const DEFAULT_DATASET: &str = "default";
pub const TRIVIAL_TABLE: &str = "MyTable";

const WORDS: [&str; 10] = [
    "Ten", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
    "Hundred",
];

/// Provider serving the sample table
#[derive(Debug, Clone)]
pub struct TrivialTableProvider {
    table: Arc<Table>,
}

impl Default for TrivialTableProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TrivialTableProvider {
    pub fn new() -> Self {
        let schema = RecordSchema::new()
            .with(FieldDef::new("NumField", FieldKind::Number).with_display_name("NumField"))
            .with(FieldDef::new("StrField", FieldKind::String).with_display_name("StrField"));

        let mut table = Table::new(schema);
        for (i, word) in WORDS.iter().enumerate() {
            let record = table
                .record()
                .with("NumField", ((i + 1) * 10) as f64)
                .with("StrField", *word);
            table.push(record);
        }

        Self {
            table: Arc::new(table),
        }
    }

    fn check_dataset(dataset: &str) -> QueryResult<()> {
        if dataset == DEFAULT_DATASET {
            Ok(())
        } else {
            Err(QueryError::not_found(format!("dataset '{}'", dataset)))
        }
    }
}

impl TableProvider for TrivialTableProvider {
    fn datasets(&self) -> Vec<DatasetItem> {
        vec![DatasetItem::new(DEFAULT_DATASET)]
    }

    fn tables(&self, dataset: &str) -> QueryResult<Vec<TableItem>> {
        Self::check_dataset(dataset)?;
        Ok(vec![TableItem::new(TRIVIAL_TABLE)])
    }

    fn table(&self, dataset: &str, table: &str) -> QueryResult<TableSource> {
        Self::check_dataset(dataset)?;
        if table != TRIVIAL_TABLE {
            return Err(QueryError::not_found(format!("table '{}'", table)));
        }
        Ok(TableSource::Local(Arc::clone(&self.table)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delegation::QueryErrorCode;
    use crate::value::ScalarValue;

    #[test]
    fn test_sample_rows() {
        let provider = TrivialTableProvider::new();
        let TableSource::Local(table) = provider.table("default", "MyTable").unwrap() else {
            panic!("expected a local table");
        };

        assert_eq!(table.len(), 10);
        assert_eq!(table.rows()[0].value("NumField"), &ScalarValue::Number(10.0));
        assert_eq!(table.rows()[9].value("StrField"), &ScalarValue::from("Hundred"));
    }

    #[test]
    fn test_unknown_names_not_found() {
        let provider = TrivialTableProvider::new();

        let err = provider.tables("other").unwrap_err();
        assert_eq!(err.code(), QueryErrorCode::NotFound);

        let err = provider.table("default", "Nope").unwrap_err();
        assert_eq!(err.code(), QueryErrorCode::NotFound);
    }

    #[test]
    fn test_listing() {
        let provider = TrivialTableProvider::new();
        assert_eq!(provider.datasets()[0].name, "default");
        assert_eq!(provider.tables("default").unwrap()[0].name, "MyTable");
        assert_eq!(provider.table_schema("default", "MyTable").unwrap().len(), 2);
    }
}
