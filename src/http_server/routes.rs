//! Connector HTTP routes
//!
//! - `GET /health`
//! - `GET /datasets`
//! - `GET /datasets/:dataset/tables`
//! - `GET /$metadata.json/datasets/:dataset/tables/:table`
//! - `GET /datasets/:dataset/tables/:table/items`

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::connector::{
    get_items, table_metadata, DatasetsResponse, ItemsResponse, TableMetadataResponse,
    TableProvider, TablesResponse,
};

use super::errors::HttpError;

/// Shared state for connector routes
pub struct AppState {
    pub provider: Arc<dyn TableProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn TableProvider>) -> Self {
        Self { provider }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Create connector routes
pub fn connector_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/datasets", get(datasets_handler))
        .route("/datasets/:dataset/tables", get(tables_handler))
        .route(
            "/$metadata.json/datasets/:dataset/tables/:table",
            get(metadata_handler),
        )
        .route("/datasets/:dataset/tables/:table/items", get(items_handler))
        .with_state(state)
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn datasets_handler(State(state): State<Arc<AppState>>) -> Json<DatasetsResponse> {
    Json(DatasetsResponse {
        value: state.provider.datasets(),
    })
}

async fn tables_handler(
    State(state): State<Arc<AppState>>,
    Path(dataset): Path<String>,
) -> Result<Json<TablesResponse>, HttpError> {
    let value = state.provider.tables(&dataset)?;
    Ok(Json(TablesResponse { value }))
}

async fn metadata_handler(
    State(state): State<Arc<AppState>>,
    Path((dataset, table)): Path<(String, String)>,
) -> Result<Json<TableMetadataResponse>, HttpError> {
    let schema = state.provider.table_schema(&dataset, &table)?;
    let capabilities = state.provider.capabilities(&dataset, &table)?;
    Ok(Json(table_metadata(&schema, &table, &capabilities)))
}

async fn items_handler(
    State(state): State<Arc<AppState>>,
    Path((dataset, table)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<ItemsResponse>, HttpError> {
    let source = state.provider.table(&dataset, &table)?;
    let capabilities = state.provider.capabilities(&dataset, &table)?;
    let response = get_items(&source, capabilities, &query)?;
    Ok(Json(response))
}
