//! Result types for query execution

use crate::value::Record;

/// Result of query execution
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Records in result order
    pub records: Vec<Record>,
    /// Number of records scanned
    pub scanned_count: usize,
    /// Number of records that passed the filter
    pub matched_count: usize,
    /// Whether the limit removed any records
    pub limit_applied: bool,
}

impl ExecutionResult {
    /// Creates an empty result
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            scanned_count: 0,
            matched_count: 0,
            limit_applied: false,
        }
    }

    /// Returns true if no records were returned
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of results
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns an iterator over the records
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}
