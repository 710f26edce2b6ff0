// Reader and exporter errors

use std::fmt;

/// Failure to read one document. Keyed by document name so a run can report
/// it and carry on with the remaining inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Extension is not `.xlsx` or `.docx`.
    Unsupported { name: String },
    /// The file could not be read from disk.
    Io { name: String, message: String },
    /// The bytes are not a readable workbook or document.
    Parse { name: String, message: String },
}

impl SourceError {
    pub fn name(&self) -> &str {
        match self {
            Self::Unsupported { name } | Self::Io { name, .. } | Self::Parse { name, .. } => name,
        }
    }

    pub(crate) fn parse(name: &str, message: impl Into<String>) -> Self {
        Self::Parse {
            name: name.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported { name } => {
                write!(f, "{name}: unsupported file type (expected .xlsx or .docx)")
            }
            Self::Io { name, message } => write!(f, "{name}: {message}"),
            Self::Parse { name, message } => write!(f, "{name}: {message}"),
        }
    }
}

impl std::error::Error for SourceError {}

/// Failure to render or write a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// Output extension is not `.xlsx`, `.csv` or `.json`.
    UnsupportedFormat(String),
    /// The encoder rejected the report.
    Encode(String),
    /// Writing the output file failed.
    Io(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFormat(path) => {
                write!(f, "unsupported output format '{path}' (expected .xlsx, .csv or .json)")
            }
            Self::Encode(msg) => write!(f, "failed to encode report: {msg}"),
            Self::Io(msg) => write!(f, "failed to write report: {msg}"),
        }
    }
}

impl std::error::Error for ExportError {}
