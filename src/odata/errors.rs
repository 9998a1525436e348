//! # OData Errors
//!
//! Lexing, parsing and binding errors for `$filter` and `$orderby` text.

use thiserror::Error;

/// Result type for OData parsing
pub type ODataResult<T> = Result<T, ODataError>;

/// OData parse errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ODataError {
    /// Token does not fit the grammar at this position
    #[error("unexpected '{found}' at position {position}, expected {expected}")]
    UnexpectedToken {
        option: &'static str,
        position: usize,
        found: String,
        expected: &'static str,
    },

    /// Input ended mid-expression
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd {
        option: &'static str,
        expected: &'static str,
    },

    /// Text looked like a literal but could not be read as one
    #[error("invalid literal '{text}' at position {position}")]
    InvalidLiteral {
        option: &'static str,
        position: usize,
        text: String,
    },

    /// String literal without closing quote
    #[error("unterminated string literal starting at position {position}")]
    UnterminatedString { option: &'static str, position: usize },

    /// Character outside the lexical grammar
    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedChar {
        option: &'static str,
        position: usize,
        ch: char,
    },

    /// Identifier does not name a property of the model
    #[error("could not find a property named '{0}'")]
    UnknownField(String),
}

impl ODataError {
    /// Returns the query option the error was raised for
    pub fn option(&self) -> &'static str {
        match self {
            ODataError::UnexpectedToken { option, .. }
            | ODataError::UnexpectedEnd { option, .. }
            | ODataError::InvalidLiteral { option, .. }
            | ODataError::UnterminatedString { option, .. }
            | ODataError::UnexpectedChar { option, .. } => option,
            ODataError::UnknownField(_) => "$filter",
        }
    }
}
