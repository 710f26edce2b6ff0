use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::cell::CellValue;

/// Everything that is not an ASCII letter, an ASCII digit or a Cyrillic letter.
static NON_KEY_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-zA-Z0-9[\p{Cyrillic}&&\p{L}]]").expect("static pattern")
});

/// Text canonicalization applied before comparing values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeOptions {
    /// Lower-case before comparing (Unicode fold, handles Latin and Cyrillic).
    pub ignore_case: bool,
    /// Keep only letters and digits. When off, only surrounding whitespace
    /// is trimmed.
    pub ignore_symbols: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            ignore_case: true,
            ignore_symbols: true,
        }
    }
}

/// Canonical form of a cell. Empty cells normalize to "".
pub fn normalize(value: &CellValue, options: NormalizeOptions) -> String {
    match value {
        CellValue::Empty => String::new(),
        CellValue::Text(text) => normalize_str(text, options),
    }
}

/// Canonical form of raw text.
pub fn normalize_str(text: &str, options: NormalizeOptions) -> String {
    if text.is_empty() {
        return String::new();
    }

    let folded: Cow<'_, str> = if options.ignore_case {
        Cow::Owned(text.to_lowercase())
    } else {
        Cow::Borrowed(text)
    };

    if options.ignore_symbols {
        NON_KEY_CHARS.replace_all(&folded, "").into_owned()
    } else {
        folded.trim().to_string()
    }
}
