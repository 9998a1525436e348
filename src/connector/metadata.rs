//! Connector protocol documents
//!
//! Dataset and table listings, table metadata and the error body, shaped
//! the way the client expects them on the wire.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::delegation::{QueryError, TableCapabilities};
use crate::value::{FieldKind, RecordSchema};

/// One dataset in a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DatasetItem {
    pub name: String,
    pub display_name: String,
}

impl DatasetItem {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
        }
    }
}

/// One table in a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableItem {
    pub name: String,
    pub display_name: String,
}

impl TableItem {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }
}

/// Response of `GET /datasets`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetsResponse {
    pub value: Vec<DatasetItem>,
}

/// Response of `GET /datasets/{dataset}/tables`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablesResponse {
    pub value: Vec<TableItem>,
}

/// Error body returned for every rejected request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status_code: u16,
    pub message: String,
}

impl From<&QueryError> for ErrorResponse {
    fn from(err: &QueryError) -> Self {
        Self {
            status_code: err.http_status(),
            message: err.to_string(),
        }
    }
}

/// Response of `GET /$metadata.json/datasets/{dataset}/tables/{table}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMetadataResponse {
    pub name: String,
    #[serde(rename = "x-ms-permission")]
    pub permission: String,
    #[serde(
        rename = "x-ms-capabilities",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub capabilities: Option<CapabilitiesDocument>,
    pub schema: TableSchemaDocument,
}

/// Table-level capability block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilitiesDocument {
    pub sort_restrictions: SortRestrictions,
    pub filter_restrictions: FilterRestrictions,
    pub is_only_server_pagable: bool,
    #[serde(default)]
    pub server_paging_options: Vec<String>,
    pub filter_function_support: Vec<String>,
    pub odata_version: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortRestrictions {
    pub sortable: bool,
    pub unsortable_properties: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRestrictions {
    pub filterable: bool,
    pub non_filterable_properties: Vec<String>,
}

/// JSON-schema style description of the rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchemaDocument {
    #[serde(rename = "type")]
    pub kind: String,
    pub items: SchemaItems,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaItems {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: BTreeMap<String, ColumnInfo>,
}

/// Description of one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(rename = "x-ms-sort")]
    pub sort: String,
    #[serde(
        rename = "x-ms-capabilities",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub capabilities: Option<ColumnCapabilities>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnCapabilities {
    pub filter_functions: Vec<String>,
}

/// Wire type and optional format of a field kind.
///
/// Number and decimal are both reported as `integer`, which loses
/// precision for clients that trust it.
fn wire_type(kind: FieldKind) -> (&'static str, Option<&'static str>) {
    match kind {
        FieldKind::String => ("string", None),
        FieldKind::Number | FieldKind::Decimal => ("integer", None),
        FieldKind::Boolean => ("boolean", None),
        FieldKind::Guid => ("string", Some("uuid")),
        FieldKind::Date => ("string", Some("date")),
        FieldKind::DateTime => ("string", Some("date-time")),
        FieldKind::Time => ("string", Some("time")),
    }
}

fn function_names(capabilities: &TableCapabilities) -> Vec<String> {
    capabilities
        .filter_functions()
        .map(|op| op.as_str().to_string())
        .collect()
}

/// Builds the metadata document of one table
pub fn table_metadata(
    schema: &RecordSchema,
    table_name: &str,
    capabilities: &TableCapabilities,
) -> TableMetadataResponse {
    let mut properties = BTreeMap::new();

    for field in schema.fields().filter(|f| !f.is_relationship) {
        let (kind, format) = wire_type(field.kind);
        let title = if field.display_name.is_empty() {
            field.name.clone()
        } else {
            field.display_name.clone()
        };
        let sort = if capabilities.is_sortable(&field.name) {
            "asc,desc"
        } else {
            "none"
        };
        let column_caps = capabilities
            .is_filterable(&field.name)
            .then(|| ColumnCapabilities {
                filter_functions: function_names(capabilities),
            });

        properties.insert(
            field.name.clone(),
            ColumnInfo {
                title,
                description: None,
                kind: kind.to_string(),
                format: format.map(str::to_string),
                sort: sort.to_string(),
                capabilities: column_caps,
            },
        );
    }

    let table_caps = capabilities
        .is_delegable()
        .then(|| CapabilitiesDocument {
            sort_restrictions: SortRestrictions {
                sortable: true,
                unsortable_properties: capabilities.unsortable().to_vec(),
            },
            filter_restrictions: FilterRestrictions {
                filterable: true,
                non_filterable_properties: capabilities.non_filterable().to_vec(),
            },
            is_only_server_pagable: capabilities.is_only_server_pagable(),
            server_paging_options: Vec::new(),
            filter_function_support: function_names(capabilities),
            odata_version: capabilities.odata_version(),
        });

    TableMetadataResponse {
        name: table_name.to_string(),
        permission: "read-write".to_string(),
        capabilities: table_caps,
        schema: TableSchemaDocument {
            kind: "array".to_string(),
            items: SchemaItems {
                kind: "object".to_string(),
                properties,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delegation::DelegationOperator;
    use crate::value::FieldDef;
    use serde_json::json;

    fn schema() -> RecordSchema {
        RecordSchema::new()
            .with(FieldDef::new("NumField", FieldKind::Number).with_display_name("Number"))
            .with_field("StrField", FieldKind::String)
            .with_field("Id", FieldKind::Guid)
            .with(FieldDef::new("Owner", FieldKind::String).relationship())
    }

    #[test]
    fn test_metadata_shape() {
        let doc = table_metadata(&schema(), "MyTable", &TableCapabilities::common());
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["name"], "MyTable");
        assert_eq!(value["x-ms-permission"], "read-write");
        assert_eq!(value["schema"]["type"], "array");
        assert_eq!(value["schema"]["items"]["type"], "object");

        let num = &value["schema"]["items"]["properties"]["NumField"];
        assert_eq!(num["title"], "Number");
        assert_eq!(num["type"], "integer");
        assert_eq!(num["x-ms-sort"], "asc,desc");
        assert!(num["x-ms-capabilities"]["filterFunctions"]
            .as_array()
            .unwrap()
            .contains(&json!("gt")));

        let id = &value["schema"]["items"]["properties"]["Id"];
        assert_eq!(id["type"], "string");
        assert_eq!(id["format"], "uuid");

        assert!(value["schema"]["items"]["properties"].get("Owner").is_none());
    }

    #[test]
    fn test_table_capabilities_block() {
        let caps = TableCapabilities::common()
            .with_non_filterable("StrField")
            .with_unsortable("Id");
        let value = serde_json::to_value(table_metadata(&schema(), "T", &caps)).unwrap();

        let block = &value["x-ms-capabilities"];
        assert_eq!(block["odataVersion"], 3);
        assert_eq!(block["isOnlyServerPagable"], true);
        assert_eq!(block["filterRestrictions"]["nonFilterableProperties"], json!(["StrField"]));
        assert_eq!(block["sortRestrictions"]["unsortableProperties"], json!(["Id"]));

        let props = &value["schema"]["items"]["properties"];
        assert!(props["StrField"].get("x-ms-capabilities").is_none());
        assert_eq!(props["Id"]["x-ms-sort"], "none");
    }

    #[test]
    fn test_non_delegable_table_has_no_capabilities() {
        let doc = table_metadata(&schema(), "T", &TableCapabilities::non_delegable());
        assert!(doc.capabilities.is_none());
        assert!(doc.schema.items.properties["NumField"].capabilities.is_none());

        let single = TableCapabilities::non_delegable().with_function(DelegationOperator::Eq);
        let doc = table_metadata(&schema(), "T", &single);
        assert_eq!(
            doc.capabilities.unwrap().filter_function_support,
            vec!["eq".to_string()]
        );
    }

    #[test]
    fn test_listing_wire_names() {
        let value = serde_json::to_value(DatasetsResponse {
            value: vec![DatasetItem::new("default")],
        })
        .unwrap();
        assert_eq!(value, json!({"value": [{"Name": "default", "DisplayName": "default"}]}));

        let err = ErrorResponse::from(&QueryError::not_found("table 'X'"));
        assert_eq!(
            serde_json::to_value(err).unwrap(),
            json!({"statusCode": 404, "message": "CONNECTOR_NOT_FOUND: Not found: table 'X'"})
        );
    }
}
