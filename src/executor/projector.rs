//! Column projection
//!
//! Builds new records holding only the requested columns under their
//! output aliases, in projection order.

use std::sync::Arc;

use crate::delegation::{ColumnProjection, QueryError, QueryResult};
use crate::value::{FieldDef, Record, RecordSchema};

/// Projects records onto a column list
pub struct Projector {
    schema: Arc<RecordSchema>,
    columns: Vec<(String, String)>,
}

impl Projector {
    /// Resolves the projection against the source schema.
    ///
    /// Relationship fields are dropped; a column that is not in the schema
    /// fails the query.
    pub fn new(source: &RecordSchema, projection: &[ColumnProjection]) -> QueryResult<Self> {
        let mut schema = RecordSchema::new();
        let mut columns = Vec::with_capacity(projection.len());

        for column in projection {
            let def = source
                .field(&column.source_field)
                .ok_or_else(|| QueryError::schema_resolution(&column.source_field))?;
            if def.is_relationship {
                continue;
            }

            schema = schema.with(
                FieldDef::new(&column.output_alias, def.kind).with_display_name(&def.display_name),
            );
            columns.push((column.source_field.clone(), column.output_alias.clone()));
        }

        Ok(Self {
            schema: Arc::new(schema),
            columns,
        })
    }

    /// Schema of the projected records
    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.schema
    }

    /// Projects one record; fields missing on the record become null
    pub fn project(&self, record: &Record) -> Record {
        let mut out = Record::new(Arc::clone(&self.schema));
        for (source, alias) in &self.columns {
            out.set(alias.as_str(), record.value(source).clone());
        }
        out
    }

    pub fn project_all(&self, records: Vec<Record>) -> Vec<Record> {
        records.iter().map(|r| self.project(r)).collect()
    }
}
