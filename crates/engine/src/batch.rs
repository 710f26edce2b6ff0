use std::collections::{HashMap, HashSet};

use crate::cell::CellValue;

/// Provenance used when a reader hands over an empty label.
const UNKNOWN_SOURCE: &str = "(unknown source)";

/// Rows read from one sheet or one document table.
///
/// Invariants established by [`RowBatch::new`]:
/// - header names are unique within the batch and never empty,
/// - every row is exactly `headers.len()` cells wide,
/// - `provenance` is non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct RowBatch {
    provenance: String,
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl RowBatch {
    pub fn new(provenance: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let mut provenance = provenance.into();
        if provenance.is_empty() {
            provenance = UNKNOWN_SOURCE.to_string();
        }

        let headers = sanitize_headers(headers);
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();

        Self { provenance, headers, rows }
    }

    /// `Col_0 .. Col_{n-1}`, used when a source has no usable header row.
    pub fn synthetic_headers(width: usize) -> Vec<String> {
        (0..width).map(|i| format!("Col_{i}")).collect()
    }

    pub fn provenance(&self) -> &str {
        &self.provenance
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_parts(self) -> (String, Vec<String>, Vec<Vec<CellValue>>) {
        (self.provenance, self.headers, self.rows)
    }
}

/// Blank names become `Col_<index>`; repeated names get `.1`, `.2`, ...
/// suffixes so that merging by name never folds two columns into one.
fn sanitize_headers(headers: Vec<String>) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::with_capacity(headers.len());
    // Next suffix to try per base name, so repeats never rescan from `.1`.
    let mut next_suffix: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(headers.len());

    for (index, name) in headers.into_iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("Col_{index}")
        } else {
            name
        };

        let candidate = if used.contains(&base) {
            let suffix = next_suffix.entry(base.clone()).or_insert(1);
            let mut candidate = format!("{base}.{suffix}");
            while used.contains(&candidate) {
                *suffix += 1;
                candidate = format!("{base}.{suffix}");
            }
            *suffix += 1;
            candidate
        } else {
            base
        };

        used.insert(candidate.clone());
        out.push(candidate);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_row(values: &[&str]) -> Vec<CellValue> {
        values.iter().map(|v| CellValue::from(*v)).collect()
    }

    #[test]
    fn rows_are_padded_to_header_width() {
        let batch = RowBatch::new(
            "a.xlsx (Sheet: S1)",
            vec!["A".into(), "B".into(), "C".into()],
            vec![text_row(&["1"]), text_row(&["1", "2", "3"])],
        );
        assert!(batch.rows().iter().all(|r| r.len() == 3));
        assert_eq!(batch.rows()[0][2], CellValue::Empty);
    }

    #[test]
    fn rows_are_truncated_to_header_width() {
        let batch = RowBatch::new("t", vec!["A".into()], vec![text_row(&["1", "2", "3"])]);
        assert_eq!(batch.rows()[0], text_row(&["1"]));
    }

    #[test]
    fn duplicate_headers_get_suffixes() {
        let batch = RowBatch::new(
            "t",
            vec!["Name".into(), "Name".into(), "Name.1".into(), "Name".into()],
            vec![],
        );
        assert_eq!(batch.headers(), &["Name", "Name.1", "Name.1.1", "Name.2"]);
    }

    #[test]
    fn many_repeated_headers_are_numbered_in_order() {
        let batch = RowBatch::new("t", vec!["Col".to_string(); 20_000], vec![]);
        let headers = batch.headers();
        assert_eq!(headers.len(), 20_000);
        assert_eq!(headers[0], "Col");
        assert_eq!(headers[1], "Col.1");
        assert_eq!(headers[19_999], "Col.19999");
        let unique: HashSet<&String> = headers.iter().collect();
        assert_eq!(unique.len(), headers.len());
    }

    #[test]
    fn blank_headers_become_synthetic() {
        let batch = RowBatch::new("t", vec!["Phone".into(), "".into(), "  ".into()], vec![]);
        assert_eq!(batch.headers(), &["Phone", "Col_1", "Col_2"]);
    }

    #[test]
    fn empty_provenance_is_replaced() {
        let batch = RowBatch::new("", vec![], vec![]);
        assert!(!batch.provenance().is_empty());
    }

    #[test]
    fn synthetic_headers_are_zero_based() {
        assert_eq!(RowBatch::synthetic_headers(3), vec!["Col_0", "Col_1", "Col_2"]);
        assert!(RowBatch::synthetic_headers(0).is_empty());
    }
}
