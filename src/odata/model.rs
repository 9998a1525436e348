//! EDM model
//!
//! The minimal entity model the parser binds identifiers against. Number and
//! decimal fields collapse into one numeric kind; relationship fields are
//! not part of the model.

use std::collections::HashMap;

use crate::value::{FieldKind, RecordSchema};

/// Primitive kinds known to the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdmPrimitiveKind {
    String,
    Numeric,
    Guid,
    DateTimeOffset,
    Date,
    TimeOfDay,
    Boolean,
}

impl From<FieldKind> for EdmPrimitiveKind {
    fn from(kind: FieldKind) -> Self {
        match kind {
            FieldKind::String => EdmPrimitiveKind::String,
            FieldKind::Number | FieldKind::Decimal => EdmPrimitiveKind::Numeric,
            FieldKind::Guid => EdmPrimitiveKind::Guid,
            FieldKind::DateTime => EdmPrimitiveKind::DateTimeOffset,
            FieldKind::Date => EdmPrimitiveKind::Date,
            FieldKind::Time => EdmPrimitiveKind::TimeOfDay,
            FieldKind::Boolean => EdmPrimitiveKind::Boolean,
        }
    }
}

/// Structural properties of one entity type
#[derive(Debug, Clone, Default)]
pub struct EdmModel {
    properties: HashMap<String, EdmPrimitiveKind>,
}

impl EdmModel {
    /// Builds the model from a record schema
    pub fn from_schema(schema: &RecordSchema) -> Self {
        let properties = schema
            .fields()
            .filter(|f| !f.is_relationship)
            .map(|f| (f.name.clone(), EdmPrimitiveKind::from(f.kind)))
            .collect();
        Self { properties }
    }

    /// Looks up a property
    pub fn property(&self, name: &str) -> Option<EdmPrimitiveKind> {
        self.properties.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
