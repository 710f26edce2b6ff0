use std::collections::HashMap;

use crate::batch::RowBatch;
use crate::cell::CellValue;
use crate::table::Table;

/// Merge batches into one table.
///
/// The field universe is the union of all batch headers in first-seen order.
/// Columns are matched by name, never by position; a field missing from a
/// batch reads as empty for that batch's rows. Rows keep batch-arrival order
/// and `row_id`s are assigned in one pass after concatenation.
pub fn unify(batches: Vec<RowBatch>) -> Table {
    let mut fields: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for batch in &batches {
        for header in batch.headers() {
            if !index.contains_key(header) {
                index.insert(header.clone(), fields.len());
                fields.push(header.clone());
            }
        }
    }

    let width = fields.len();
    let total: usize = batches.iter().map(RowBatch::len).sum();
    let mut rows: Vec<(String, Vec<CellValue>)> = Vec::with_capacity(total);

    for batch in batches {
        let (provenance, headers, batch_rows) = batch.into_parts();
        let positions: Vec<usize> = headers.iter().map(|h| index[h]).collect();

        log::debug!("unify: {} rows from {provenance}", batch_rows.len());

        for row in batch_rows {
            let mut values = vec![CellValue::Empty; width];
            for (&pos, value) in positions.iter().zip(row) {
                values[pos] = value;
            }
            rows.push((provenance.clone(), values));
        }
    }

    log::debug!("unify: {} rows over {} fields", rows.len(), width);
    Table::from_parts(fields, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(provenance: &str, headers: &[&str], rows: &[&[&str]]) -> RowBatch {
        RowBatch::new(
            provenance,
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|v| CellValue::from(*v)).collect())
                .collect(),
        )
    }

    #[test]
    fn schema_is_union_in_first_seen_order() {
        let table = unify(vec![
            batch("a", &["Name", "Phone"], &[&["Ann", "1"]]),
            batch("b", &["Email", "Name"], &[&["x@y", "Bob"]]),
        ]);
        assert_eq!(table.fields(), &["Name", "Phone", "Email"]);
    }

    #[test]
    fn columns_merge_by_name_not_position() {
        let table = unify(vec![
            batch("a", &["Name", "Phone"], &[&["Ann", "1"]]),
            batch("b", &["Phone", "Name"], &[&["2", "Bob"]]),
        ]);
        let bob = &table.records()[1];
        assert_eq!(table.value(bob, "Name").as_str(), "Bob");
        assert_eq!(table.value(bob, "Phone").as_str(), "2");
    }

    #[test]
    fn missing_fields_are_filled_empty() {
        let table = unify(vec![
            batch("a", &["Name"], &[&["Ann"]]),
            batch("b", &["Email"], &[&["x@y"]]),
        ]);
        let ann = &table.records()[0];
        assert_eq!(ann.values().len(), 2);
        assert_eq!(table.value(ann, "Email"), &CellValue::Empty);
    }

    #[test]
    fn row_ids_are_global_and_contiguous() {
        let table = unify(vec![
            batch("a", &["X"], &[&["1"], &["2"]]),
            batch("b", &["X"], &[]),
            batch("c", &["X"], &[&["3"]]),
        ]);
        let ids: Vec<usize> = table.records().iter().map(|r| r.row_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(table.records()[2].provenance, "c");
    }

    #[test]
    fn header_only_batch_still_contributes_fields() {
        let table = unify(vec![batch("a", &["X"], &[&["1"]]), batch("b", &["Y"], &[])]);
        assert_eq!(table.fields(), &["X", "Y"]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn no_batches_is_empty_table() {
        let table = unify(Vec::new());
        assert!(table.is_empty());
        assert!(table.fields().is_empty());
    }

    #[test]
    fn reserved_names_are_ordinary_source_fields() {
        let table = unify(vec![batch("a", &["row_id", "provenance"], &[&["ext-7", "crm"]])]);
        let row = &table.records()[0];
        assert_eq!(row.row_id, 0);
        assert_eq!(row.provenance, "a");
        assert_eq!(table.value(row, "row_id").as_str(), "ext-7");
        assert_eq!(table.value(row, "provenance").as_str(), "crm");
    }
}
