// Input document handles

use std::fmt;
use std::path::Path;

use crate::error::SourceError;

/// One input file: a display name and its raw bytes.
///
/// Readers never touch the filesystem; callers decide where bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), bytes }
    }

    /// Read a document from disk. The display name is the file name without
    /// its directory, which is what provenance labels show.
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let bytes = std::fs::read(path).map_err(|e| SourceError::Io {
            name: name.clone(),
            message: e.to_string(),
        })?;
        Ok(Self { name, bytes })
    }

    pub fn kind(&self) -> Option<DocumentKind> {
        DocumentKind::from_name(&self.name)
    }
}

/// Supported input formats, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// `.xlsx` workbook: one batch per sheet.
    Spreadsheet,
    /// `.docx` document: one batch per top-level table.
    WordDocument,
}

impl DocumentKind {
    /// Case-insensitive extension match. Anything else is unsupported.
    pub fn from_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" => Some(Self::Spreadsheet),
            "docx" => Some(Self::WordDocument),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spreadsheet => write!(f, "spreadsheet"),
            Self::WordDocument => write!(f, "word document"),
        }
    }
}
