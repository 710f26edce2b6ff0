//! Full-text filter over the unified table.
//!
//! Independent of normalization and field selection: a row matches when any
//! field contains the query as a case-insensitive substring. The query is
//! plain text, never a pattern.

use crate::table::{Record, Table};

/// Which columns the filter looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Also match against `row_id` (as decimal text) and `provenance`.
    pub include_system_fields: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            include_system_fields: true,
        }
    }
}

/// Case-insensitive substring predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextQuery {
    needle: String,
}

impl TextQuery {
    pub fn new(query: &str) -> Self {
        Self {
            needle: query.to_lowercase(),
        }
    }

    /// The empty query matches everything.
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn matches(&self, text: &str) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        if text.is_empty() {
            return false;
        }
        text.to_lowercase().contains(&self.needle)
    }

    fn matches_record(&self, record: &Record, options: SearchOptions) -> bool {
        if options.include_system_fields
            && (self.matches(&record.row_id.to_string()) || self.matches(&record.provenance))
        {
            return true;
        }
        record.values().iter().any(|value| self.matches(value.as_str()))
    }
}

/// Rows matching `query`, in table order. An empty query returns every row.
pub fn search<'a>(table: &'a Table, query: &str, options: SearchOptions) -> Vec<&'a Record> {
    let query = TextQuery::new(query);
    if query.is_empty() {
        return table.records().iter().collect();
    }

    let hits: Vec<&Record> = table
        .records()
        .iter()
        .filter(|record| query.matches_record(record, options))
        .collect();

    log::debug!("search: {} of {} rows match", hits.len(), table.len());
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::RowBatch;
    use crate::cell::CellValue;
    use crate::unify::unify;

    fn table() -> Table {
        unify(vec![
            RowBatch::new(
                "clients.xlsx (Sheet: Moscow)",
                vec!["Name".into(), "Phone".into()],
                vec![
                    vec!["Иванов Иван".into(), "+7 999 123".into()],
                    vec!["Petrov".into(), CellValue::Empty],
                ],
            ),
            RowBatch::new(
                "contracts.docx (Table: 1)",
                vec!["Client".into()],
                vec![vec!["ООО Ромашка".into()]],
            ),
        ])
    }

    fn ids(records: &[&Record]) -> Vec<usize> {
        records.iter().map(|r| r.row_id).collect()
    }

    #[test]
    fn empty_query_is_identity() {
        let t = table();
        assert_eq!(ids(&search(&t, "", SearchOptions::default())), vec![0, 1, 2]);
    }

    #[test]
    fn match_is_case_insensitive_for_cyrillic() {
        let t = table();
        assert_eq!(ids(&search(&t, "иванов", SearchOptions::default())), vec![0]);
        assert_eq!(ids(&search(&t, "РОМАШ", SearchOptions::default())), vec![2]);
    }

    #[test]
    fn query_is_plain_text_not_a_pattern() {
        let t = table();
        assert_eq!(ids(&search(&t, "+7 999", SearchOptions::default())), vec![0]);
        assert!(search(&t, ".*", SearchOptions::default()).is_empty());
    }

    #[test]
    fn system_fields_are_searched_by_default() {
        let t = table();
        assert_eq!(ids(&search(&t, "moscow", SearchOptions::default())), vec![0, 1]);
        assert_eq!(ids(&search(&t, "2", SearchOptions::default())), vec![0, 2]);
    }

    #[test]
    fn system_fields_can_be_excluded() {
        let t = table();
        let options = SearchOptions { include_system_fields: false };
        assert!(search(&t, "moscow", options).is_empty());
        assert_eq!(ids(&search(&t, "petrov", options)), vec![1]);
    }

    #[test]
    fn empty_cells_never_match_a_query() {
        let query = TextQuery::new("x");
        assert!(!query.matches(""));
        assert!(TextQuery::new("").matches(""));
    }
}
