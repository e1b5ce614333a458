//! Query modules, one per table.
//!
//! Loaders never overwrite: each `insert_new` looks up the natural keys that
//! already exist and only writes the remainder, reporting both counts.

use std::collections::HashSet;
use std::hash::Hash;

pub mod discom_bill_queries;
pub mod hourly_queries;
pub mod interval_reading_queries;
pub mod savings_queries;
pub mod settlement_queries;

/// Rows per multi-row statement. Keeps the bind count well under the
/// PostgreSQL protocol limit of 65535 parameters.
const CHUNK_ROWS: usize = 500;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertSummary {
    pub inserted: u64,
    pub skipped_duplicates: usize,
}

/// Split `rows` into those whose natural key is absent from `existing`,
/// counting the rest as duplicates.
fn partition_new<'a, T, K, F>(rows: &'a [T], existing: &HashSet<K>, key: F) -> (Vec<&'a T>, usize)
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut fresh = Vec::with_capacity(rows.len());
    let mut skipped = 0;
    for row in rows {
        if existing.contains(&key(row)) {
            skipped += 1;
        } else {
            fresh.push(row);
        }
    }
    (fresh, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_new_filters_existing_keys() {
        let rows = vec![("a", 1), ("b", 2), ("c", 3)];
        let existing: HashSet<&str> = ["b"].into_iter().collect();

        let (fresh, skipped) = partition_new(&rows, &existing, |r| r.0);

        assert_eq!(skipped, 1);
        assert_eq!(fresh.iter().map(|r| r.0).collect::<Vec<_>>(), ["a", "c"]);
    }

    #[test]
    fn partition_new_passes_everything_when_nothing_exists() {
        let rows = vec![1, 2, 3];
        let existing: HashSet<i32> = HashSet::new();

        let (fresh, skipped) = partition_new(&rows, &existing, |r| *r);

        assert_eq!(skipped, 0);
        assert_eq!(fresh.len(), 3);
    }
}
