use crate::config::MatchConfig;
use crate::error::EngineError;
use crate::filter::search;
use crate::group::{find_duplicates, DuplicateReport};
use crate::key::{build_match_keys, FieldSelection};
use crate::table::Table;

/// Result of one analysis run over a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    /// Row ids passing the full-text filter, in table order.
    pub search_hits: Vec<usize>,
    /// The validated field selection (possibly empty).
    pub selection: FieldSelection,
    /// `None` when no fields were selected.
    pub duplicates: Option<DuplicateReport>,
}

/// Run the filter and, when fields are selected, duplicate detection.
///
/// An empty table short-circuits with `EmptyInput`. The selection is checked
/// before any value is normalized.
pub fn analyze(table: &Table, config: &MatchConfig) -> Result<Analysis, EngineError> {
    if table.is_empty() {
        return Err(EngineError::EmptyInput);
    }

    let selection = config.validate(table)?;

    let search_hits = search(table, &config.search_query, config.search_options())
        .into_iter()
        .map(|record| record.row_id)
        .collect();

    let duplicates = if selection.is_empty() {
        None
    } else {
        let keys = build_match_keys(table, &selection, config.normalize_options());
        Some(find_duplicates(table, &keys))
    };

    Ok(Analysis {
        search_hits,
        selection,
        duplicates,
    })
}
