//! Configuration file
//!
//! ```json
//! {
//!   "dataset": "default",
//!   "host": "127.0.0.1",
//!   "port": 8080,
//!   "cors_origins": [],
//!   "tables": [{ "name": "...", "fields": [...], "rows": [...] }]
//! }
//! ```
//!
//! Every key is optional. With no tables the built-in sample table is served.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::connector::{
    JsonTableProvider, TableDefinition, TableProvider, TrivialTableProvider, DEFAULT_DATASET,
};
use crate::http_server::HttpServerConfig;

use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Dataset served by configured tables (default: "default")
    #[serde(default = "default_dataset")]
    pub dataset: String,

    /// Bind address and CORS
    #[serde(flatten)]
    pub server: HttpServerConfig,

    /// Table definitions
    #[serde(default)]
    pub tables: Vec<TableDefinition>,
}

fn default_dataset() -> String {
    DEFAULT_DATASET.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: default_dataset(),
            server: HttpServerConfig::default(),
            tables: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load from a path, or fall back to defaults when none is given
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Validate configuration
    fn validate(&self) -> CliResult<()> {
        if self.dataset.trim().is_empty() {
            return Err(CliError::config_error("dataset must not be empty"));
        }

        if self.server.port == 0 {
            return Err(CliError::config_error("port must be > 0"));
        }

        if !self.tables.is_empty() {
            JsonTableProvider::new(self.dataset.as_str(), &self.tables)?;
        }

        Ok(())
    }

    /// Builds the provider described by this configuration
    pub fn provider(&self) -> CliResult<Arc<dyn TableProvider>> {
        if self.tables.is_empty() {
            return Ok(Arc::new(TrivialTableProvider::new()));
        }
        Ok(Arc::new(JsonTableProvider::new(
            self.dataset.as_str(),
            &self.tables,
        )?))
    }

    /// Dataset used when a command does not name one
    pub fn default_dataset(&self) -> &str {
        if self.tables.is_empty() {
            DEFAULT_DATASET
        } else {
            &self.dataset
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::errors::CliErrorCode;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_config(temp_dir: &TempDir, value: serde_json::Value) -> std::path::PathBuf {
        let path = temp_dir.path().join("connector.json");
        fs::write(&path, value.to_string()).unwrap();
        path
    }

    #[test]
    fn test_config_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, json!({}));

        let config = Config::load(&path).unwrap();
        assert_eq!(config.dataset, "default");
        assert_eq!(config.server.port, 8080);
        assert!(config.tables.is_empty());
        assert_eq!(config.default_dataset(), "default");
    }

    #[test]
    fn test_config_with_tables() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            &temp_dir,
            json!({
                "dataset": "shop",
                "port": 9000,
                "tables": [{
                    "name": "Orders",
                    "fields": [{"name": "total", "kind": "decimal"}],
                    "rows": [{"total": "12.50"}]
                }]
            }),
        );

        let config = Config::load(&path).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.default_dataset(), "shop");

        let provider = config.provider().unwrap();
        assert_eq!(provider.tables("shop").unwrap()[0].name, "Orders");
    }

    #[test]
    fn test_config_rejects_bad_rows() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            &temp_dir,
            json!({
                "tables": [{
                    "name": "T",
                    "fields": [{"name": "n", "kind": "number"}],
                    "rows": [{"n": "ten"}]
                }]
            }),
        );

        let err = Config::load(&path).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_config_rejects_empty_dataset() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, json!({"dataset": " "}));
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = Config::load(&temp_dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }
}
