//! CLI argument definitions using clap
//!
//! Commands:
//! - connector-shim items --table <t> [--filter ..] [--orderby ..] [--top n] [--select ..] [--count]
//! - connector-shim metadata --table <t>
//! - connector-shim tables
//! - connector-shim serve [--port p]
//!
//! Every command accepts `--config <path>` and `--dataset <name>`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Connector shim - serves tables through OData delegation
#[derive(Parser, Debug)]
#[command(name = "connector-shim")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Path to a JSON configuration file; the sample table is served without one
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Dataset name (defaults to the configured dataset)
    #[arg(long)]
    pub dataset: Option<String>,
}

/// Query options of the items command
#[derive(Args, Debug, Clone, Default)]
pub struct ItemsArgs {
    /// Table to query
    #[arg(long)]
    pub table: String,

    /// OData `$filter` expression
    #[arg(long)]
    pub filter: Option<String>,

    /// OData `$orderby` expression
    #[arg(long)]
    pub orderby: Option<String>,

    /// Maximum number of rows (`$top`)
    #[arg(long)]
    pub top: Option<String>,

    /// Comma-separated column list (`$select`)
    #[arg(long)]
    pub select: Option<String>,

    /// Report `@odata.count`
    #[arg(long)]
    pub count: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Query the items of a table
    Items {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        query: ItemsArgs,
    },

    /// Print the metadata document of a table
    Metadata {
        #[command(flatten)]
        source: SourceArgs,

        /// Table to describe
        #[arg(long)]
        table: String,
    },

    /// List the tables of a dataset
    Tables {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Start the HTTP server
    Serve {
        #[command(flatten)]
        source: SourceArgs,

        /// Port to listen on (overrides the configuration)
        #[arg(long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
