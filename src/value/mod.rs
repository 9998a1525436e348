//! Value model consumed by the delegation core
//!
//! Records are ordered mappings of field name to a typed scalar, tied to a
//! shared schema. The core only ever reads them; projection builds new ones.

mod record;
mod scalar;
mod schema;

pub use record::{Record, Table};
pub use scalar::ScalarValue;
pub use schema::{FieldDef, FieldKind, RecordSchema};
