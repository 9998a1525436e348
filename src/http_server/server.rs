//! # HTTP Server
//!
//! Serves the connector routes of one table provider.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::connector::{TableProvider, TrivialTableProvider};
use crate::observability::{log_event_with_fields, Event};

use super::config::HttpServerConfig;
use super::routes::{connector_routes, AppState};

/// HTTP server for a table provider
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server with default configuration
    pub fn new(provider: Arc<dyn TableProvider>) -> Self {
        Self::with_config(provider, HttpServerConfig::default())
    }

    /// Create a server with custom configuration
    pub fn with_config(provider: Arc<dyn TableProvider>, config: HttpServerConfig) -> Self {
        let router = Self::build_router(provider, &config);
        Self { config, router }
    }

    fn build_router(provider: Arc<dyn TableProvider>, config: &HttpServerConfig) -> Router {
        let state = Arc::new(AppState::new(provider));

        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        connector_routes(state)
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until the listener fails
    pub async fn start(self) -> Result<(), io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        let listener = TcpListener::bind(addr).await?;
        let bound = listener.local_addr()?.to_string();
        log_event_with_fields(Event::HttpServerStart, &[("addr", bound.as_str())]);

        let result = axum::serve(listener, self.router).await;
        log_event_with_fields(Event::HttpServerStop, &[("addr", bound.as_str())]);
        result
    }
}

impl Default for HttpServer {
    fn default() -> Self {
        Self::new(Arc::new(TrivialTableProvider::new()))
    }
}
