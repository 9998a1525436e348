//! Delegation error types
//!
//! Error codes:
//! - CONNECTOR_UNSUPPORTED_CONSTRUCT (REJECT)
//! - CONNECTOR_UNSUPPORTED_FEATURE (REJECT)
//! - CONNECTOR_TYPE_MISMATCH (REJECT)
//! - CONNECTOR_SCHEMA_RESOLUTION (REJECT)
//! - CONNECTOR_INVALID_QUERY_OPTION (REJECT)
//! - CONNECTOR_NOT_FOUND (REJECT)
//!
//! Every error rejects the whole query. Nothing is retried and no partial
//! result is ever returned alongside an error.

use std::fmt;

use crate::odata::ODataError;

/// Error codes for query translation and execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorCode {
    /// OData node shape, operator or field function not recognized
    UnsupportedConstruct,
    /// Joins, aggregation or distinct projection requested
    UnsupportedFeature,
    /// Stored value cannot be compared with the literal
    TypeMismatch,
    /// Field name not present in the record schema
    SchemaResolution,
    /// Malformed query option text
    InvalidQueryOption,
    /// Unknown dataset or table
    NotFound,
}

impl QueryErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            QueryErrorCode::UnsupportedConstruct => "CONNECTOR_UNSUPPORTED_CONSTRUCT",
            QueryErrorCode::UnsupportedFeature => "CONNECTOR_UNSUPPORTED_FEATURE",
            QueryErrorCode::TypeMismatch => "CONNECTOR_TYPE_MISMATCH",
            QueryErrorCode::SchemaResolution => "CONNECTOR_SCHEMA_RESOLUTION",
            QueryErrorCode::InvalidQueryOption => "CONNECTOR_INVALID_QUERY_OPTION",
            QueryErrorCode::NotFound => "CONNECTOR_NOT_FOUND",
        }
    }

    /// Returns the HTTP status a front end reports for this code
    pub fn http_status(&self) -> u16 {
        match self {
            QueryErrorCode::NotFound => 404,
            _ => 400,
        }
    }
}

impl fmt::Display for QueryErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Query error with full context
#[derive(Debug, Clone, PartialEq)]
pub struct QueryError {
    /// Error code
    code: QueryErrorCode,
    /// Human-readable message
    message: String,
    /// Offending construct (node kind, operator, field) if applicable
    construct: Option<String>,
}

impl QueryError {
    fn new(code: QueryErrorCode, message: impl Into<String>, construct: Option<String>) -> Self {
        Self {
            code,
            message: message.into(),
            construct,
        }
    }

    /// Create an unsupported construct error
    pub fn unsupported_construct(construct: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(
            QueryErrorCode::UnsupportedConstruct,
            reason,
            Some(construct.into()),
        )
    }

    /// Create an unsupported feature error
    pub fn unsupported_feature(feature: impl Into<String>) -> Self {
        let feature = feature.into();
        Self::new(
            QueryErrorCode::UnsupportedFeature,
            format!("{} not supported by the in-memory executor", feature),
            Some(feature),
        )
    }

    /// Create a type mismatch error
    pub fn type_mismatch(field: &str, expected: &str, found: &str) -> Self {
        Self::new(
            QueryErrorCode::TypeMismatch,
            format!(
                "Field '{}': cannot compare {} value with {}",
                field, found, expected
            ),
            Some(field.to_string()),
        )
    }

    /// Create a schema resolution error
    pub fn schema_resolution(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::new(
            QueryErrorCode::SchemaResolution,
            format!("Unknown field '{}'", field),
            Some(field),
        )
    }

    /// Create an invalid query option error
    pub fn invalid_query_option(option: &str, reason: impl Into<String>) -> Self {
        Self::new(
            QueryErrorCode::InvalidQueryOption,
            format!("Invalid {}: {}", option, reason.into()),
            Some(option.to_string()),
        )
    }

    /// Create a not found error
    pub fn not_found(what: impl Into<String>) -> Self {
        let what = what.into();
        Self::new(
            QueryErrorCode::NotFound,
            format!("Not found: {}", what),
            Some(what),
        )
    }

    /// Returns the error code
    pub fn code(&self) -> QueryErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the offending construct if applicable
    pub fn construct(&self) -> Option<&str> {
        self.construct.as_deref()
    }

    /// Returns the HTTP status for this error
    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for QueryError {}

impl From<ODataError> for QueryError {
    fn from(err: ODataError) -> Self {
        match err {
            ODataError::UnknownField(field) => QueryError::schema_resolution(field),
            other => QueryError::invalid_query_option(other.option(), other.to_string()),
        }
    }
}

/// Result type for delegation operations
pub type QueryResult<T> = Result<T, QueryError>;
