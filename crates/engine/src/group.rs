use std::collections::HashMap;

use serde::Serialize;

use crate::key::MatchKeys;
use crate::table::{Record, Table};

/// One row of the duplicate report, joined back to the table by `row_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateRow {
    pub match_key: String,
    pub row_id: usize,
    /// 1-based ordinal of the group in report order.
    pub group: usize,
    pub group_size: usize,
}

/// Rows that share a non-empty match key with at least one other row,
/// ordered by key, then provenance, then `row_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DuplicateReport {
    pub groups: usize,
    pub rows: Vec<DuplicateRow>,
}

impl DuplicateReport {
    /// No duplicates found. Not an error.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Rows grouped by match key, in report order.
    pub fn iter_groups(&self) -> impl Iterator<Item = &[DuplicateRow]> {
        self.rows.chunk_by(|a, b| a.group == b.group)
    }
}

/// Group rows by match key. Singleton keys and the empty key are dropped.
pub fn find_duplicates(table: &Table, keys: &MatchKeys) -> DuplicateReport {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for (_, key) in keys.iter() {
        if !key.is_empty() {
            *counts.entry(key).or_insert(0) += 1;
        }
    }

    let mut members: Vec<(&str, &Record)> = table
        .records()
        .iter()
        .filter_map(|record| {
            let key = keys.get(record.row_id)?;
            let shared = counts.get(key).is_some_and(|&n| n >= 2);
            shared.then_some((key, record))
        })
        .collect();

    // Stable: equal (key, provenance) pairs stay in row_id order.
    members.sort_by(|(key_a, rec_a), (key_b, rec_b)| {
        key_a.cmp(key_b).then_with(|| rec_a.provenance.cmp(&rec_b.provenance))
    });

    let mut rows = Vec::with_capacity(members.len());
    let mut groups = 0;
    let mut previous: Option<&str> = None;
    for (key, record) in members {
        if previous != Some(key) {
            groups += 1;
            previous = Some(key);
        }
        rows.push(DuplicateRow {
            match_key: key.to_string(),
            row_id: record.row_id,
            group: groups,
            group_size: counts[key],
        });
    }

    log::debug!("duplicates: {} groups, {} rows", groups, rows.len());
    DuplicateReport { groups, rows }
}
