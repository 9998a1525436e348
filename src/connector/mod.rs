//! Connector layer
//!
//! Table providers, the items operation and the metadata documents served to
//! connector clients. This is the first layer that logs.

mod items;
mod json_provider;
mod metadata;
mod provider;
mod trivial;

pub use items::{get_items, record_to_item, ItemsResponse};
pub use json_provider::{CapabilitiesDef, JsonTableProvider, ProviderError, TableDefinition};
pub use metadata::{
    table_metadata, CapabilitiesDocument, ColumnCapabilities, ColumnInfo, DatasetItem,
    DatasetsResponse, ErrorResponse, FilterRestrictions, SchemaItems, SortRestrictions,
    TableItem, TableMetadataResponse, TableSchemaDocument, TablesResponse,
};
pub use provider::{DelegatedTable, TableProvider, TableSource};
pub use trivial::{TrivialTableProvider, DEFAULT_DATASET, TRIVIAL_TABLE};
