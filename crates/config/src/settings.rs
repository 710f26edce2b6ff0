use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// User defaults for matching runs. Command-line flags and match profiles
/// override these per run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Matching
    #[serde(rename = "match.ignoreCase")]
    pub ignore_case: bool,

    #[serde(rename = "match.ignoreSymbols")]
    pub ignore_symbols: bool,

    // Search
    #[serde(rename = "search.includeSystemFields")]
    pub search_system_fields: bool,

    // Export
    #[serde(rename = "export.allFields")]
    pub all_fields: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ignore_case: true,
            ignore_symbols: true,
            search_system_fields: true,
            all_fields: false,
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tabmatch");
        config_dir.join("settings.json")
    }

    /// Load settings from the user config directory, falling back to defaults
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from `path`. A missing file means defaults; an unreadable
    /// or malformed one is logged and also means defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("error parsing {}: {}; using default settings", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("error reading {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse settings JSON. Lines starting with `//` are comments.
    pub fn parse(contents: &str) -> Result<Self, String> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        serde_json::from_str(&cleaned).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_engine_defaults() {
        let s = Settings::default();
        assert!(s.ignore_case);
        assert!(s.ignore_symbols);
        assert!(s.search_system_fields);
        assert!(!s.all_fields);
    }

    #[test]
    fn test_parse_with_comments_and_partial_keys() {
        let json = r#"{
    // keep punctuation in phone numbers
    "match.ignoreSymbols": false,
    "export.allFields": true
}"#;
        let s = Settings::parse(json).unwrap();
        assert!(!s.ignore_symbols);
        assert!(s.all_fields);
        assert!(s.ignore_case);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(Settings::parse("{ \"match.ignoreCase\": maybe }").is_err());
    }

    #[test]
    fn test_load_from_missing_and_malformed() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Settings::load_from(&dir.path().join("none.json")), Settings::default());

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "not json").unwrap();
        assert_eq!(Settings::load_from(&bad), Settings::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{\n  \"match.ignoreCase\": false\n}").unwrap();

        let expected = Settings {
            ignore_case: false,
            ..Settings::default()
        };
        assert_eq!(Settings::load_from(&path), expected);
    }

    #[test]
    fn test_config_path_ends_with_app_dir() {
        let path = Settings::config_path();
        assert!(path.ends_with("tabmatch/settings.json"));
    }
}
