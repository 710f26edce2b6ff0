//! Output tables: search hits or duplicate groups joined back to the table.
//!
//! The report is the hand-off format for exporters. JSON keeps source fields
//! nested under `fields`; tabular exports put the system columns first.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::config::MatchConfig;
use crate::group::DuplicateReport;
use crate::key::FieldSelection;
use crate::normalize::NormalizeOptions;
use crate::table::{Table, PROVENANCE_FIELD, ROW_ID_FIELD};

pub const MATCH_KEY_FIELD: &str = "match_key";
pub const GROUP_FIELD: &str = "group";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Search,
    Duplicates,
}

impl ReportKind {
    /// Worksheet / heading title.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Search => "Search",
            Self::Duplicates => "Duplicates",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Search => write!(f, "search"),
            Self::Duplicates => write!(f, "duplicates"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub engine_version: String,
    pub generated_at: String,
    pub query: String,
    pub fields: Vec<String>,
    pub normalize: NormalizeOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    /// Rows in the unified table.
    pub total_rows: usize,
    /// Rows in this report.
    pub rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<usize>,
    pub row_id: usize,
    pub provenance: String,
    #[serde(serialize_with = "serialize_fields")]
    pub fields: Vec<(String, String)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub kind: ReportKind,
    pub meta: ReportMeta,
    pub summary: ReportSummary,
    /// Source field columns, in output order.
    pub columns: Vec<String>,
    pub records: Vec<OutputRecord>,
}

impl Report {
    /// Full-text filter hits with every field.
    pub fn search(table: &Table, config: &MatchConfig, hits: &[usize]) -> Self {
        let columns = table.fields().to_vec();
        let records = hits
            .iter()
            .filter_map(|&row_id| table.record(row_id))
            .map(|record| OutputRecord {
                match_key: None,
                group: None,
                row_id: record.row_id,
                provenance: record.provenance.clone(),
                fields: columns
                    .iter()
                    .zip(record.values())
                    .map(|(name, value)| (name.clone(), value.as_str().to_string()))
                    .collect(),
            })
            .collect::<Vec<_>>();

        Self {
            kind: ReportKind::Search,
            meta: ReportMeta::new(config),
            summary: ReportSummary {
                total_rows: table.len(),
                rows: records.len(),
                groups: None,
            },
            columns,
            records,
        }
    }

    /// Duplicate rows with their match key. Key fields come first; the rest
    /// of the schema follows when `all_fields` is set.
    pub fn duplicates(
        table: &Table,
        config: &MatchConfig,
        selection: &FieldSelection,
        duplicates: &DuplicateReport,
        all_fields: bool,
    ) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for name in selection.names() {
            if !columns.contains(name) {
                columns.push(name.clone());
            }
        }
        if all_fields {
            for name in table.fields() {
                if !columns.contains(name) {
                    columns.push(name.clone());
                }
            }
        }

        let records = duplicates
            .rows
            .iter()
            .filter_map(|row| table.record(row.row_id).map(|record| (row, record)))
            .map(|(row, record)| OutputRecord {
                match_key: Some(row.match_key.clone()),
                group: Some(row.group),
                row_id: record.row_id,
                provenance: record.provenance.clone(),
                fields: columns
                    .iter()
                    .map(|name| (name.clone(), table.value(record, name).as_str().to_string()))
                    .collect(),
            })
            .collect::<Vec<_>>();

        Self {
            kind: ReportKind::Duplicates,
            meta: ReportMeta::new(config),
            summary: ReportSummary {
                total_rows: table.len(),
                rows: records.len(),
                groups: Some(duplicates.groups),
            },
            columns,
            records,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Column headers of the tabular form.
    pub fn headers(&self) -> Vec<String> {
        let mut headers = Vec::with_capacity(self.columns.len() + 4);
        if self.kind == ReportKind::Duplicates {
            headers.push(MATCH_KEY_FIELD.to_string());
            headers.push(GROUP_FIELD.to_string());
        }
        headers.push(ROW_ID_FIELD.to_string());
        headers.push(PROVENANCE_FIELD.to_string());
        headers.extend(self.columns.iter().cloned());
        headers
    }

    /// Rows of the tabular form, aligned with [`Report::headers`].
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.records
            .iter()
            .map(|record| {
                let mut row = Vec::with_capacity(self.columns.len() + 4);
                if self.kind == ReportKind::Duplicates {
                    row.push(record.match_key.clone().unwrap_or_default());
                    row.push(record.group.map(|g| g.to_string()).unwrap_or_default());
                }
                row.push(record.row_id.to_string());
                row.push(record.provenance.clone());
                row.extend(record.fields.iter().map(|(_, value)| value.clone()));
                row
            })
            .collect()
    }
}

impl ReportMeta {
    fn new(config: &MatchConfig) -> Self {
        Self {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            query: config.search_query.clone(),
            fields: config.selected_fields.clone(),
            normalize: config.normalize_options(),
        }
    }
}

fn serialize_fields<S: Serializer>(fields: &[(String, String)], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(fields.len()))?;
    for (name, value) in fields {
        map.serialize_entry(name, value)?;
    }
    map.end()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::batch::RowBatch;
    use crate::cell::CellValue;
    use crate::unify::unify;

    fn table() -> Table {
        unify(vec![
            RowBatch::new(
                "a.xlsx (Sheet: S1)",
                vec!["Phone".into(), "Name".into(), "row_id".into()],
                vec![vec!["+7-999-123".into(), "Ann".into(), "ext-1".into()]],
            ),
            RowBatch::new(
                "b.xlsx (Sheet: S1)",
                vec!["Name".into(), "Phone".into(), "City".into()],
                vec![
                    vec!["Ann L.".into(), "79991 23".into(), "Riga".into()],
                    vec!["Bob".into(), CellValue::Empty, "Oslo".into()],
                ],
            ),
        ])
    }

    fn dupes_config() -> MatchConfig {
        MatchConfig {
            selected_fields: vec!["Phone".into()],
            ..MatchConfig::default()
        }
    }

    #[test]
    fn duplicate_headers_lead_with_key_and_system_columns() {
        let t = table();
        let config = dupes_config();
        let analysis = analyze(&t, &config).unwrap();
        let report = Report::duplicates(
            &t,
            &config,
            &analysis.selection,
            analysis.duplicates.as_ref().unwrap(),
            false,
        );
        assert_eq!(report.headers(), vec!["match_key", "group", "row_id", "provenance", "Phone"]);
        assert_eq!(
            report.rows(),
            vec![
                vec!["7999123", "1", "0", "a.xlsx (Sheet: S1)", "+7-999-123"],
                vec!["7999123", "1", "1", "b.xlsx (Sheet: S1)", "79991 23"],
            ]
        );
        assert_eq!(report.summary.groups, Some(1));
        assert_eq!(report.summary.total_rows, 3);
    }

    #[test]
    fn all_fields_appends_remaining_schema() {
        let t = table();
        let config = dupes_config();
        let analysis = analyze(&t, &config).unwrap();
        let report = Report::duplicates(
            &t,
            &config,
            &analysis.selection,
            analysis.duplicates.as_ref().unwrap(),
            true,
        );
        assert_eq!(report.columns, vec!["Phone", "Name", "row_id", "City"]);
    }

    #[test]
    fn search_report_keeps_source_row_id_column() {
        let t = table();
        let report = Report::search(&t, &MatchConfig::default(), &[0]);
        assert_eq!(report.headers(), vec!["row_id", "provenance", "Phone", "Name", "row_id", "City"]);
        assert_eq!(report.rows()[0], vec!["0", "a.xlsx (Sheet: S1)", "+7-999-123", "Ann", "ext-1", ""]);
    }

    #[test]
    fn json_nests_fields_in_column_order() {
        let t = table();
        let report = Report::search(&t, &MatchConfig::default(), &[1]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["kind"], "search");
        let record = &json["records"][0];
        assert_eq!(record["row_id"], 1);
        assert_eq!(record["fields"]["row_id"], "");
        assert_eq!(record["fields"]["City"], "Riga");
        assert!(record.get("match_key").is_none());

        let text = serde_json::to_string(&report.records[0]).unwrap();
        let phone = text.find("\"Phone\"").unwrap();
        let city = text.find("\"City\"").unwrap();
        assert!(phone < city);
    }
}
