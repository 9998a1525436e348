//! Observability subsystem
//!
//! Structured JSON logging for the connector, HTTP and CLI layers. The
//! translator and the in-memory engine never log.
//!
//! # Usage
//!
//! ```ignore
//! use connector_shim::observability::{log_event_with_fields, Event, Logger};
//!
//! Logger::info("CUSTOM_EVENT", &[("rows", "42")]);
//! log_event_with_fields(Event::QueryDelegated, &[("table", "MyTable")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a typed event
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a typed event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        log_event(Event::ConfigLoaded);
        log_event_with_fields(Event::QueryRejected, &[("code", "CONNECTOR_TYPE_MISMATCH")]);
    }
}
