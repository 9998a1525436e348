//! Records and tables

use std::sync::Arc;

use super::scalar::ScalarValue;
use super::schema::RecordSchema;

static NULL: ScalarValue = ScalarValue::Null;

/// Ordered mapping of field name to value, bound to a schema
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    schema: Arc<RecordSchema>,
    fields: Vec<(String, ScalarValue)>,
}

impl Record {
    /// Creates an empty record for the given schema
    pub fn new(schema: Arc<RecordSchema>) -> Self {
        Self {
            schema,
            fields: Vec::new(),
        }
    }

    /// Sets a field, keeping the position of an existing entry
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets a field in place
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ScalarValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Returns the stored value, `None` if the field is absent
    pub fn get(&self, name: &str) -> Option<&ScalarValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Returns the value of a field, reading absent fields as `Null`
    pub fn value(&self, name: &str) -> &ScalarValue {
        self.get(name).unwrap_or(&NULL)
    }

    /// Iterates fields in insertion order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &ScalarValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A materialized sequence of records sharing one schema
#[derive(Debug, Clone)]
pub struct Table {
    schema: Arc<RecordSchema>,
    rows: Vec<Record>,
}

impl Table {
    /// Creates an empty table
    pub fn new(schema: RecordSchema) -> Self {
        Self {
            schema: Arc::new(schema),
            rows: Vec::new(),
        }
    }

    /// Starts a record bound to this table's schema
    pub fn record(&self) -> Record {
        Record::new(Arc::clone(&self.schema))
    }

    /// Appends a row
    pub fn push(&mut self, record: Record) {
        self.rows.push(record);
    }

    /// Appends a row, builder style
    pub fn with_row(mut self, record: Record) -> Self {
        self.push(record);
        self
    }

    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FieldKind;

    #[test]
    fn test_absent_field_reads_as_null() {
        let table = Table::new(RecordSchema::new().with_field("x", FieldKind::Number));
        let record = table.record();

        assert!(record.get("x").is_none());
        assert!(record.value("x").is_null());
    }

    #[test]
    fn test_set_keeps_position() {
        let table = Table::new(RecordSchema::new());
        let record = table.record().with("a", 1).with("b", 2).with("a", 3);

        let fields: Vec<_> = record.fields().collect();
        assert_eq!(fields[0], ("a", &ScalarValue::Number(3.0)));
        assert_eq!(fields[1], ("b", &ScalarValue::Number(2.0)));
    }

    #[test]
    fn test_table_rows_share_schema() {
        let table = Table::new(RecordSchema::new().with_field("s", FieldKind::String));
        let table = table.clone().with_row(table.record().with("s", "one"));

        assert_eq!(table.len(), 1);
        assert!(Arc::ptr_eq(table.schema(), table.rows()[0].schema()));
    }
}
