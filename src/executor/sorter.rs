//! Result sorting for query execution
//!
//! One stable sort over the whole key tuple, so records equal on every key
//! keep their input order.

use std::cmp::Ordering;

use crate::delegation::{OrderDirection, OrderKey};
use crate::value::Record;

use super::compare::sort_cmp;

/// Sorts result records
pub struct ResultSorter;

impl ResultSorter {
    /// Sorts records by the keys in order; the first key is primary.
    pub fn sort(records: &mut [Record], keys: &[OrderKey]) {
        if keys.is_empty() {
            return;
        }
        records.sort_by(|a, b| Self::compare(a, b, keys));
    }

    fn compare(a: &Record, b: &Record, keys: &[OrderKey]) -> Ordering {
        for key in keys {
            let ordering = sort_cmp(a.value(&key.field), b.value(&key.field));
            let ordering = match key.direction {
                OrderDirection::Ascending => ordering,
                OrderDirection::Descending => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{FieldKind, RecordSchema, Table};

    fn table() -> Table {
        Table::new(
            RecordSchema::new()
                .with_field("id", FieldKind::String)
                .with_field("k1", FieldKind::Number)
                .with_field("k2", FieldKind::Number),
        )
    }

    fn make(table: &Table, id: &str, k1: i32, k2: i32) -> Record {
        table.record().with("id", id).with("k1", k1).with("k2", k2)
    }

    fn ids(records: &[Record]) -> Vec<String> {
        records
            .iter()
            .map(|r| r.value("id").to_string())
            .collect()
    }

    #[test]
    fn test_sort_ascending() {
        let t = table();
        let mut records = vec![make(&t, "c", 30, 0), make(&t, "a", 20, 0), make(&t, "b", 25, 0)];

        ResultSorter::sort(&mut records, &[OrderKey::asc("k1")]);

        assert_eq!(ids(&records), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_sort_descending() {
        let t = table();
        let mut records = vec![make(&t, "c", 30, 0), make(&t, "a", 20, 0), make(&t, "b", 25, 0)];

        ResultSorter::sort(&mut records, &[OrderKey::desc("k1")]);

        assert_eq!(ids(&records), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_multi_key_sort() {
        let t = table();
        let mut records = vec![
            make(&t, "a", 1, 1),
            make(&t, "b", 2, 5),
            make(&t, "c", 1, 3),
            make(&t, "d", 2, 7),
        ];

        ResultSorter::sort(&mut records, &[OrderKey::asc("k1"), OrderKey::desc("k2")]);

        assert_eq!(ids(&records), vec!["c", "a", "d", "b"]);
    }

    #[test]
    fn test_sort_stable() {
        let t = table();
        let mut records = vec![make(&t, "a", 25, 0), make(&t, "b", 25, 0), make(&t, "c", 25, 0)];

        ResultSorter::sort(&mut records, &[OrderKey::desc("k1")]);

        assert_eq!(ids(&records), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_null_sorts_first() {
        let t = table();
        let mut records = vec![make(&t, "a", 5, 0), t.record().with("id", "n"), make(&t, "b", 1, 0)];

        ResultSorter::sort(&mut records, &[OrderKey::asc("k1")]);

        assert_eq!(ids(&records), vec!["n", "b", "a"]);
    }
}
