//! CLI command implementations
//!
//! Each command resolves its provider from the configuration, performs one
//! operation and prints one JSON response. `serve` runs until the server
//! stops.

use std::collections::HashMap;

use serde_json::Value;

use crate::connector::{get_items, table_metadata, TableProvider, TablesResponse};
use crate::http_server::HttpServer;
use crate::observability::{log_event_with_fields, Event};

use super::args::{Command, ItemsArgs, SourceArgs};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::write_response;

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Items { source, query } => write_response(items(&source, &query)?),
        Command::Metadata { source, table } => write_response(metadata(&source, &table)?),
        Command::Tables { source } => write_response(tables(&source)?),
        Command::Serve { source, port } => serve(&source, port),
    }
}

fn load(source: &SourceArgs) -> CliResult<Config> {
    let config = Config::load_or_default(source.config.as_deref())?;
    if let Some(path) = &source.config {
        let path = path.display().to_string();
        let tables = config.tables.len().to_string();
        log_event_with_fields(
            Event::ConfigLoaded,
            &[("path", path.as_str()), ("tables", tables.as_str())],
        );
    }
    Ok(config)
}

fn dataset<'a>(source: &'a SourceArgs, config: &'a Config) -> &'a str {
    source
        .dataset
        .as_deref()
        .unwrap_or_else(|| config.default_dataset())
}

/// Translates the items options into the query option map
pub fn query_options(args: &ItemsArgs) -> HashMap<String, String> {
    let mut query = HashMap::new();
    let options = [
        ("$filter", &args.filter),
        ("$orderby", &args.orderby),
        ("$top", &args.top),
        ("$select", &args.select),
    ];
    for (name, value) in options {
        if let Some(value) = value {
            query.insert(name.to_string(), value.clone());
        }
    }
    if args.count {
        query.insert("$count".to_string(), "true".to_string());
    }
    query
}

/// Query the items of one table
pub fn items(source: &SourceArgs, args: &ItemsArgs) -> CliResult<Value> {
    let config = load(source)?;
    let provider = config.provider()?;
    let dataset = dataset(source, &config);

    let table = provider.table(dataset, &args.table)?;
    let capabilities = provider.capabilities(dataset, &args.table)?;
    let response = get_items(&table, capabilities, &query_options(args))?;

    Ok(serde_json::to_value(response)?)
}

/// Describe one table
pub fn metadata(source: &SourceArgs, table: &str) -> CliResult<Value> {
    let config = load(source)?;
    let provider = config.provider()?;
    let dataset = dataset(source, &config);

    let schema = provider.table_schema(dataset, table)?;
    let capabilities = provider.capabilities(dataset, table)?;

    Ok(serde_json::to_value(table_metadata(
        &schema,
        table,
        &capabilities,
    ))?)
}

/// List the tables of a dataset
pub fn tables(source: &SourceArgs) -> CliResult<Value> {
    let config = load(source)?;
    let provider = config.provider()?;
    let value = provider.tables(dataset(source, &config))?;

    Ok(serde_json::to_value(TablesResponse { value })?)
}

/// Start the HTTP server on the configured address
pub fn serve(source: &SourceArgs, port: Option<u16>) -> CliResult<()> {
    let config = load(source)?;
    let provider = config.provider()?;

    let mut http_config = config.server.clone();
    if let Some(port) = port {
        http_config.port = port;
    }
    let server = HttpServer::with_config(provider, http_config);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    })
}
