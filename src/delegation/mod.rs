//! Delegation query model
//!
//! Backend-neutral description of a query: the predicate tree, sort keys,
//! limit, projection and the capabilities of the target table, plus the
//! error taxonomy shared by translation and execution.

mod capabilities;
mod errors;
mod filter;
mod params;

pub use capabilities::{DelegationOperator, TableCapabilities};
pub use errors::{QueryError, QueryErrorCode, QueryResult};
pub use filter::{Condition, ConditionOperator, FieldFunction, Filter, LogicalOperator};
pub use params::{
    Aggregate, ColumnProjection, JoinSpec, OrderDirection, OrderKey, OrderSpec, QueryParameters,
};
