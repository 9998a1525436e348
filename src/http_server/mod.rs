//! # HTTP Server Module
//!
//! Axum front end for a table provider.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/datasets` - Dataset listing
//! - `/datasets/{dataset}/tables` - Table listing
//! - `/$metadata.json/datasets/{dataset}/tables/{table}` - Table metadata
//! - `/datasets/{dataset}/tables/{table}/items` - Query a table

pub mod config;
mod errors;
mod routes;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::HttpError;
pub use routes::{connector_routes, AppState, HealthResponse};
pub use server::HttpServer;
