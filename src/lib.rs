//! connector-shim - OData delegation for tabular data sources
//!
//! Turns OData query options into backend-neutral query parameters, runs
//! them against in-memory tables when no backend can, and serves the
//! results over a connector-style HTTP surface.
//!
//! Layers, bottom up:
//! - `value`: typed scalars, schemas and records
//! - `delegation`: predicate tree, query parameters, capabilities, errors
//! - `odata`: `$filter` / `$orderby` parsing against a schema model
//! - `translator`: OData syntax tree to predicate tree, option map to parameters
//! - `executor`: in-memory filter, sort, limit and projection
//! - `connector`: table providers, items and metadata documents
//! - `http_server`, `cli`: front ends

pub mod cli;
pub mod connector;
pub mod delegation;
pub mod executor;
pub mod http_server;
pub mod observability;
pub mod odata;
pub mod translator;
pub mod value;
