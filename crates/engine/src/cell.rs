use std::fmt;

/// A single cell value. Sources are read as text only: numbers and dates
/// arrive already rendered, nothing is parsed back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
}

impl CellValue {
    /// Build a cell from text. The empty string is stored as `Empty`.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(text)
        }
    }

    /// Text representation; `Empty` reads as "".
    pub fn as_str(&self) -> &str {
        match self {
            CellValue::Empty => "",
            CellValue::Text(s) => s,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }
}

impl From<&str> for CellValue {
    fn from(text: &str) -> Self {
        CellValue::from_text(text)
    }
}

impl From<String> for CellValue {
    fn from(text: String) -> Self {
        CellValue::from_text(text)
    }
}

impl From<Option<String>> for CellValue {
    fn from(text: Option<String>) -> Self {
        text.map(CellValue::from_text).unwrap_or_default()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_empty_cell() {
        assert_eq!(CellValue::from(""), CellValue::Empty);
        assert_eq!(CellValue::from(None), CellValue::Empty);
        assert!(CellValue::Empty.is_empty());
    }

    #[test]
    fn whitespace_is_kept_as_text() {
        let cell = CellValue::from("  ");
        assert_eq!(cell, CellValue::Text("  ".into()));
        assert_eq!(cell.as_str(), "  ");
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(CellValue::from("Иванов").to_string(), "Иванов");
        assert_eq!(CellValue::Empty.to_string(), "");
    }
}
