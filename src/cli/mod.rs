//! CLI module for the connector shim
//!
//! Provides command-line interface for:
//! - items: Query a table with OData options
//! - metadata: Describe a table
//! - tables: List the tables of a dataset
//! - serve: Run the HTTP front end

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command, ItemsArgs, SourceArgs};
pub use commands::{items, metadata, query_options, run, run_command, serve, tables};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_response, write_response_to};
