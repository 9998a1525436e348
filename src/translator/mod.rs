//! OData to delegation query translation
//!
//! `translate` converts a parsed `$filter` expression into a predicate
//! tree; `build` runs the parser and translator over a whole query option
//! map and assembles the resulting [`QueryParameters`](crate::delegation::QueryParameters).

mod builder;
#[allow(clippy::module_inception)]
mod translator;

pub use builder::{build, order_by_text};
pub use translator::translate;
