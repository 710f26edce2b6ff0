//! `tabmatch-io`: document readers and report export.
//!
//! Readers turn `.xlsx` workbooks and `.docx` documents into engine row
//! batches; the exporter renders reports as xlsx, csv or json bytes.

pub mod document;
pub mod docx;
pub mod error;
pub mod export;
pub mod source;
pub mod xlsx;

#[cfg(test)]
mod test_support;

pub use document::{Document, DocumentKind};
pub use error::{ExportError, SourceError};
pub use export::{export_report, write_report, ExportFormat};
pub use source::{load_documents, load_paths, read_document, LoadOutcome, SourceReader};
