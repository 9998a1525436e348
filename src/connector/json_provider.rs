//! Provider over tables declared in JSON
//!
//! Each table carries its field list and its rows as JSON objects. Rows are
//! checked against the declared kinds once, when the provider is built.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::delegation::{DelegationOperator, QueryError, QueryResult, TableCapabilities};
use crate::value::{FieldDef, RecordSchema, ScalarValue, Table};

use super::metadata::{DatasetItem, TableItem};
use super::provider::{TableProvider, TableSource};

/// Errors raised while loading table definitions
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("dataset name must not be empty")]
    EmptyDataset,

    #[error("table name must not be empty")]
    EmptyTableName,

    #[error("duplicate table '{0}'")]
    DuplicateTable(String),

    #[error("table '{table}' declares field '{field}' twice")]
    DuplicateField { table: String, field: String },

    #[error("table '{table}' row {row}: unknown field '{field}'")]
    UnknownField {
        table: String,
        row: usize,
        field: String,
    },

    #[error("table '{table}' row {row}: field '{field}' is not a valid {kind}")]
    InvalidValue {
        table: String,
        row: usize,
        field: String,
        kind: &'static str,
    },
}

/// Declared pushdown capabilities of a configured table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitiesDef {
    #[serde(default)]
    pub filter_functions: Vec<DelegationOperator>,
    #[serde(default)]
    pub non_filterable: Vec<String>,
    #[serde(default)]
    pub unsortable: Vec<String>,
}

impl CapabilitiesDef {
    fn to_capabilities(&self) -> TableCapabilities {
        let caps = TableCapabilities::with_functions(self.filter_functions.iter().copied());
        let caps = self
            .non_filterable
            .iter()
            .fold(caps, |caps, p| caps.with_non_filterable(p.as_str()));
        self.unsortable
            .iter()
            .fold(caps, |caps, p| caps.with_unsortable(p.as_str()))
    }
}

/// One table as written in configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDefinition {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub rows: Vec<Map<String, Value>>,
    #[serde(default)]
    pub capabilities: Option<CapabilitiesDef>,
}

struct LoadedTable {
    item: TableItem,
    table: Arc<Table>,
    capabilities: Arc<TableCapabilities>,
}

/// Provider serving one dataset of configured tables
pub struct JsonTableProvider {
    dataset: String,
    tables: BTreeMap<String, LoadedTable>,
}

impl JsonTableProvider {
    /// Validates the definitions and materializes their rows
    pub fn new(
        dataset: impl Into<String>,
        definitions: &[TableDefinition],
    ) -> Result<Self, ProviderError> {
        let dataset = dataset.into();
        if dataset.trim().is_empty() {
            return Err(ProviderError::EmptyDataset);
        }

        let mut tables = BTreeMap::new();
        for def in definitions {
            if def.name.trim().is_empty() {
                return Err(ProviderError::EmptyTableName);
            }
            if tables.contains_key(&def.name) {
                return Err(ProviderError::DuplicateTable(def.name.clone()));
            }
            tables.insert(def.name.clone(), load_table(def)?);
        }

        Ok(Self { dataset, tables })
    }

    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    fn lookup(&self, dataset: &str, table: &str) -> QueryResult<&LoadedTable> {
        if dataset != self.dataset {
            return Err(QueryError::not_found(format!("dataset '{}'", dataset)));
        }
        self.tables
            .get(table)
            .ok_or_else(|| QueryError::not_found(format!("table '{}'", table)))
    }
}

fn load_table(def: &TableDefinition) -> Result<LoadedTable, ProviderError> {
    let mut seen = HashSet::new();
    let mut schema = RecordSchema::new();
    for field in &def.fields {
        if !seen.insert(field.name.as_str()) {
            return Err(ProviderError::DuplicateField {
                table: def.name.clone(),
                field: field.name.clone(),
            });
        }
        schema = schema.with(field.clone());
    }

    let mut table = Table::new(schema);
    for (index, row) in def.rows.iter().enumerate() {
        let mut record = table.record();
        for (column, raw) in row {
            let field = table
                .schema()
                .field(column)
                .ok_or_else(|| ProviderError::UnknownField {
                    table: def.name.clone(),
                    row: index,
                    field: column.clone(),
                })?;
            let value: ScalarValue =
                ScalarValue::from_json(field.kind, raw).ok_or_else(|| {
                    ProviderError::InvalidValue {
                        table: def.name.clone(),
                        row: index,
                        field: column.clone(),
                        kind: field.kind.type_name(),
                    }
                })?;
            record.set(column.as_str(), value);
        }
        table.push(record);
    }

    let item = match &def.display_name {
        Some(display) => TableItem::new(&def.name).with_display_name(display),
        None => TableItem::new(&def.name),
    };
    let capabilities = def
        .capabilities
        .as_ref()
        .map_or_else(TableCapabilities::common, CapabilitiesDef::to_capabilities);

    Ok(LoadedTable {
        item,
        table: Arc::new(table),
        capabilities: Arc::new(capabilities),
    })
}

impl TableProvider for JsonTableProvider {
    fn datasets(&self) -> Vec<DatasetItem> {
        vec![DatasetItem::new(&self.dataset)]
    }

    fn tables(&self, dataset: &str) -> QueryResult<Vec<TableItem>> {
        if dataset != self.dataset {
            return Err(QueryError::not_found(format!("dataset '{}'", dataset)));
        }
        Ok(self.tables.values().map(|t| t.item.clone()).collect())
    }

    fn table(&self, dataset: &str, table: &str) -> QueryResult<TableSource> {
        let loaded = self.lookup(dataset, table)?;
        Ok(TableSource::Local(Arc::clone(&loaded.table)))
    }

    fn capabilities(&self, dataset: &str, table: &str) -> QueryResult<Arc<TableCapabilities>> {
        let loaded = self.lookup(dataset, table)?;
        Ok(Arc::clone(&loaded.capabilities))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FieldKind;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn people() -> TableDefinition {
        serde_json::from_value(json!({
            "name": "People",
            "display_name": "All people",
            "fields": [
                {"name": "name", "kind": "string"},
                {"name": "age", "kind": "number"},
                {"name": "balance", "kind": "decimal"},
                {"name": "joined", "kind": "date"}
            ],
            "rows": [
                {"name": "Ada", "age": 36, "balance": "10.25", "joined": "2020-01-02"},
                {"name": "Bob", "age": null}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_rows_materialized_with_kinds() {
        let provider = JsonTableProvider::new("hr", &[people()]).unwrap();
        let TableSource::Local(table) = provider.table("hr", "People").unwrap() else {
            panic!("expected a local table");
        };

        assert_eq!(table.len(), 2);
        let ada = &table.rows()[0];
        assert_eq!(ada.value("age"), &ScalarValue::Number(36.0));
        assert_eq!(
            ada.value("balance"),
            &ScalarValue::Decimal(Decimal::new(1025, 2))
        );
        assert!(table.rows()[1].value("age").is_null());
        assert!(table.rows()[1].value("joined").is_null());
    }

    #[test]
    fn test_listing_uses_display_name() {
        let provider = JsonTableProvider::new("hr", &[people()]).unwrap();
        let tables = provider.tables("hr").unwrap();
        assert_eq!(tables[0].name, "People");
        assert_eq!(tables[0].display_name, "All people");
        assert_eq!(provider.datasets()[0].name, "hr");
    }

    #[test]
    fn test_validation_errors() {
        assert_eq!(
            JsonTableProvider::new("", &[]).err(),
            Some(ProviderError::EmptyDataset)
        );

        assert_eq!(
            JsonTableProvider::new("hr", &[people(), people()]).err(),
            Some(ProviderError::DuplicateTable("People".into()))
        );

        let mut bad = people();
        bad.rows.push(json!({"height": 1}).as_object().unwrap().clone());
        assert!(matches!(
            JsonTableProvider::new("hr", &[bad]).err(),
            Some(ProviderError::UnknownField { row: 2, .. })
        ));

        let mut bad = people();
        bad.rows.push(json!({"age": "old"}).as_object().unwrap().clone());
        assert!(matches!(
            JsonTableProvider::new("hr", &[bad]).err(),
            Some(ProviderError::InvalidValue { kind: "number", .. })
        ));

        let mut bad = people();
        bad.fields.push(FieldDef::new("age", FieldKind::String));
        assert!(matches!(
            JsonTableProvider::new("hr", &[bad]).err(),
            Some(ProviderError::DuplicateField { .. })
        ));
    }

    #[test]
    fn test_declared_capabilities() {
        let mut def = people();
        def.capabilities = Some(CapabilitiesDef {
            filter_functions: vec![DelegationOperator::Eq],
            non_filterable: vec!["balance".into()],
            unsortable: vec![],
        });
        let provider = JsonTableProvider::new("hr", &[def]).unwrap();

        let caps = provider.capabilities("hr", "People").unwrap();
        assert!(caps.supports(DelegationOperator::Eq));
        assert!(!caps.supports(DelegationOperator::Gt));
        assert!(!caps.is_filterable("balance"));

        let err = provider.capabilities("hr", "Nope").unwrap_err();
        assert_eq!(err.code(), crate::delegation::QueryErrorCode::NotFound);
    }
}
