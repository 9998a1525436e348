//! Record schema definitions
//!
//! Supported field kinds:
//! - string: UTF-8 text
//! - number: 64-bit floating point
//! - decimal: fixed-point decimal
//! - guid, datetime, date, time, boolean
//!
//! Relationship fields are declared on the schema but never take part in
//! filtering, projection or serialization.

use serde::{Deserialize, Serialize};

/// Supported field kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Number,
    Decimal,
    Guid,
    DateTime,
    Date,
    Time,
    Boolean,
}

impl FieldKind {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Decimal => "decimal",
            FieldKind::Guid => "guid",
            FieldKind::DateTime => "datetime",
            FieldKind::Date => "date",
            FieldKind::Time => "time",
            FieldKind::Boolean => "boolean",
        }
    }

    /// Returns true for number and decimal
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::Number | FieldKind::Decimal)
    }
}

/// A single field of a record schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Logical field name
    pub name: String,
    /// Human-readable name, empty when not provided
    #[serde(default)]
    pub display_name: String,
    /// Field kind
    pub kind: FieldKind,
    /// Whether this field links to another table
    #[serde(default)]
    pub is_relationship: bool,
}

impl FieldDef {
    /// Create a plain field
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            display_name: String::new(),
            kind,
            is_relationship: false,
        }
    }

    /// Sets the display name
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Marks the field as a relationship
    pub fn relationship(mut self) -> Self {
        self.is_relationship = true;
        self
    }
}

/// Ordered list of field definitions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordSchema {
    fields: Vec<FieldDef>,
}

impl RecordSchema {
    /// Creates an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a plain field
    pub fn with_field(self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.with(FieldDef::new(name, kind))
    }

    /// Adds a field definition, replacing any field with the same name
    pub fn with(mut self, def: FieldDef) -> Self {
        match self.fields.iter_mut().find(|f| f.name == def.name) {
            Some(existing) => *existing = def,
            None => self.fields.push(def),
        }
        self
    }

    /// Looks up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Iterates fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_order_is_preserved() {
        let schema = RecordSchema::new()
            .with_field("b", FieldKind::String)
            .with_field("a", FieldKind::Number);

        let names: Vec<_> = schema.fields().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_redeclared_field_replaces() {
        let schema = RecordSchema::new()
            .with_field("a", FieldKind::String)
            .with_field("a", FieldKind::Boolean);

        assert_eq!(schema.len(), 1);
        assert_eq!(schema.field("a").unwrap().kind, FieldKind::Boolean);
    }

    #[test]
    fn test_schema_deserializes_from_list() {
        let schema: RecordSchema = serde_json::from_value(json!([
            {"name": "id", "kind": "guid"},
            {"name": "owner", "kind": "string", "is_relationship": true},
            {"name": "created", "kind": "datetime", "display_name": "Created On"}
        ]))
        .unwrap();

        assert_eq!(schema.len(), 3);
        assert!(schema.field("owner").unwrap().is_relationship);
        assert_eq!(schema.field("created").unwrap().display_name, "Created On");
        assert_eq!(schema.field("created").unwrap().kind, FieldKind::DateTime);
    }
}
