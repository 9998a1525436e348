//! Observable connector events
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration file loaded and validated
    ConfigLoaded,

    // Query processing
    /// Query options parsed into delegation parameters
    QueryBuilt,
    /// Query executed by the in-memory engine
    QueryExecutedLocal,
    /// Query handed to a delegated table
    QueryDelegated,
    /// Query rejected during build or execution
    QueryRejected,

    // HTTP front end
    /// Server bound and accepting connections
    HttpServerStart,
    /// Server stopped
    HttpServerStop,
}

impl Event {
    /// Returns the event name
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::QueryBuilt => "QUERY_BUILT",
            Event::QueryExecutedLocal => "QUERY_EXECUTED_LOCAL",
            Event::QueryDelegated => "QUERY_DELEGATED",
            Event::QueryRejected => "QUERY_REJECTED",
            Event::HttpServerStart => "HTTP_SERVER_START",
            Event::HttpServerStop => "HTTP_SERVER_STOP",
        }
    }

    /// Severity this event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::QueryBuilt => Severity::Trace,
            Event::QueryRejected => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(Event::QueryBuilt.as_str(), "QUERY_BUILT");
        assert_eq!(Event::QueryExecutedLocal.as_str(), "QUERY_EXECUTED_LOCAL");
        assert_eq!(Event::HttpServerStart.to_string(), "HTTP_SERVER_START");
    }

    #[test]
    fn test_rejections_are_warnings() {
        assert_eq!(Event::QueryRejected.severity(), Severity::Warn);
        assert_eq!(Event::QueryDelegated.severity(), Severity::Info);
    }
}
