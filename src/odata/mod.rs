//! OData query option parsing
//!
//! Lexes and parses `$filter` and `$orderby` text into a bound expression
//! tree. Identifiers are resolved against an [`EdmModel`] built from the
//! record schema, so unknown properties fail at parse time.

mod ast;
mod errors;
mod lexer;
mod model;
mod parser;

pub use ast::{
    BinaryOperatorKind, FilterClause, OrderByClause, OrderByDirection, QueryNode,
    UnaryOperatorKind,
};
pub use errors::{ODataError, ODataResult};
pub use lexer::{tokenize, Token, TokenKind};
pub use model::{EdmModel, EdmPrimitiveKind};
pub use parser::ODataQueryOptionParser;
