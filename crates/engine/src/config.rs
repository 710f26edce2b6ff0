use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::filter::SearchOptions;
use crate::key::FieldSelection;
use crate::normalize::NormalizeOptions;
use crate::table::Table;

// ---------------------------------------------------------------------------
// Match config
// ---------------------------------------------------------------------------

/// Everything one analysis run depends on. Passed explicitly to every stage;
/// nothing is kept between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Fields that make up the match key, in key order. Empty = no
    /// duplicate detection.
    pub selected_fields: Vec<String>,
    pub ignore_case: bool,
    pub ignore_symbols: bool,
    /// Full-text filter; empty = all rows.
    pub search_query: String,
    /// Whether the full-text filter also looks at `row_id` / `provenance`.
    pub search_system_fields: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            selected_fields: Vec::new(),
            ignore_case: true,
            ignore_symbols: true,
            search_query: String::new(),
            search_system_fields: true,
        }
    }
}

impl MatchConfig {
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            ignore_case: self.ignore_case,
            ignore_symbols: self.ignore_symbols,
        }
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            include_system_fields: self.search_system_fields,
        }
    }

    /// Check the selection against the table's schema.
    pub fn validate(&self, table: &Table) -> Result<FieldSelection, EngineError> {
        FieldSelection::resolve(table, &self.selected_fields)
    }
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// A saved run: input files plus match settings, read from TOML.
///
/// ```toml
/// files = ["clients.xlsx", "contracts.docx"]
/// fields = ["Phone"]
/// ignore_symbols = true
/// output = "report.xlsx"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchProfile {
    /// Input documents, relative to the profile's directory.
    pub files: Vec<String>,
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default = "default_true")]
    pub ignore_case: bool,
    #[serde(default = "default_true")]
    pub ignore_symbols: bool,
    #[serde(default)]
    pub search: String,
    #[serde(default = "default_true")]
    pub search_system_fields: bool,
    /// Report file; format follows the extension.
    #[serde(default)]
    pub output: Option<String>,
    /// Include non-key fields in the duplicate report.
    #[serde(default)]
    pub all_fields: bool,
}

fn default_true() -> bool {
    true
}

impl MatchProfile {
    pub fn from_toml(input: &str) -> Result<Self, EngineError> {
        let profile: MatchProfile =
            toml::from_str(input).map_err(|e| EngineError::ConfigParse(e.to_string()))?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.files.is_empty() {
            return Err(EngineError::ConfigValidation(
                "at least one input file is required".into(),
            ));
        }

        if let Some(file) = self.files.iter().find(|f| f.trim().is_empty()) {
            return Err(EngineError::ConfigValidation(format!(
                "blank file name in files: {file:?}"
            )));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.trim().is_empty() {
                return Err(EngineError::ConfigValidation("blank field name in fields".into()));
            }
            if !seen.insert(field.as_str()) {
                return Err(EngineError::ConfigValidation(format!(
                    "field '{field}' listed more than once"
                )));
            }
        }

        Ok(())
    }

    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            selected_fields: self.fields.clone(),
            ignore_case: self.ignore_case,
            ignore_symbols: self.ignore_symbols,
            search_query: self.search.clone(),
            search_system_fields: self.search_system_fields,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
files = ["clients.xlsx", "contracts.docx"]
fields = ["Phone", "Name"]
ignore_case = false
ignore_symbols = true
search = "Иванов"
output = "report.xlsx"
all_fields = true
"#;

    #[test]
    fn parse_full_profile() {
        let profile = MatchProfile::from_toml(FULL).unwrap();
        assert_eq!(profile.files, vec!["clients.xlsx", "contracts.docx"]);
        assert_eq!(profile.fields, vec!["Phone", "Name"]);
        assert!(!profile.ignore_case);
        assert!(profile.ignore_symbols);
        assert_eq!(profile.search, "Иванов");
        assert_eq!(profile.output.as_deref(), Some("report.xlsx"));
        assert!(profile.all_fields);
    }

    #[test]
    fn parse_defaults() {
        let profile = MatchProfile::from_toml(r#"files = ["a.xlsx"]"#).unwrap();
        assert!(profile.fields.is_empty());
        assert!(profile.ignore_case);
        assert!(profile.ignore_symbols);
        assert!(profile.search.is_empty());
        assert!(profile.search_system_fields);
        assert!(profile.output.is_none());
        assert!(!profile.all_fields);
    }

    #[test]
    fn match_config_mirrors_profile() {
        let config = MatchProfile::from_toml(FULL).unwrap().match_config();
        assert_eq!(config.selected_fields, vec!["Phone", "Name"]);
        assert_eq!(
            config.normalize_options(),
            NormalizeOptions { ignore_case: false, ignore_symbols: true }
        );
        assert_eq!(config.search_query, "Иванов");
    }

    #[test]
    fn reject_missing_files() {
        let err = MatchProfile::from_toml(r#"files = []"#).unwrap_err();
        assert!(err.to_string().contains("at least one input file"));
    }

    #[test]
    fn reject_repeated_field() {
        let err = MatchProfile::from_toml(
            r#"
files = ["a.xlsx"]
fields = ["Phone", "Phone"]
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("'Phone'"));
    }

    #[test]
    fn reject_unknown_key() {
        let err = MatchProfile::from_toml(
            r#"
files = ["a.xlsx"]
ignore_symbol = false
"#,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::ConfigParse(_)), "typo should fail deserialization");
    }

    #[test]
    fn default_config_ignores_case_and_symbols() {
        let config = MatchConfig::default();
        assert!(config.ignore_case && config.ignore_symbols);
        assert!(config.search_query.is_empty());
        assert!(config.selected_fields.is_empty());
    }
}
