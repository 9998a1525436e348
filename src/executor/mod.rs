//! In-memory execution engine
//!
//! Runs query parameters against a materialized table when no backend can
//! execute them.
//!
//! # Execution Flow (strict order)
//!
//! 1. Reject joins, distinct projections and aggregation
//! 2. Filter records by the predicate tree
//! 3. Apply stable multi-key sort (if specified)
//! 4. Apply limit (positive limits only)
//! 5. Project columns under their aliases (if specified)
//!
//! Any error rejects the query; no partial result is produced.

mod compare;
#[allow(clippy::module_inception)]
mod executor;
mod filters;
mod projector;
mod result;
mod sorter;

pub use compare::{compare_ordered, reconcile, sort_cmp, values_equal};
pub use executor::{execute, InMemoryExecutor};
pub use filters::PredicateFilter;
pub use projector::Projector;
pub use result::ExecutionResult;
pub use sorter::ResultSorter;
