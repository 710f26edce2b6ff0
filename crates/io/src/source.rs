// Source reader dispatch and per-document error collection

use std::path::Path;

use tabmatch_engine::RowBatch;

use crate::document::{Document, DocumentKind};
use crate::error::SourceError;
use crate::{docx, xlsx};

/// Turns one document into zero or more row batches.
pub trait SourceReader {
    fn read(&self, doc: &Document) -> Result<Vec<RowBatch>, SourceError>;
}

/// `.xlsx`: one batch per non-empty sheet.
#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxReader;

impl SourceReader for XlsxReader {
    fn read(&self, doc: &Document) -> Result<Vec<RowBatch>, SourceError> {
        xlsx::read_workbook(doc)
    }
}

/// `.docx`: one batch per top-level table.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxReader;

impl SourceReader for DocxReader {
    fn read(&self, doc: &Document) -> Result<Vec<RowBatch>, SourceError> {
        docx::read_document(doc)
    }
}

/// Pick the reader for a document by extension.
pub fn reader_for(doc: &Document) -> Result<&'static dyn SourceReader, SourceError> {
    match doc.kind() {
        Some(DocumentKind::Spreadsheet) => Ok(&XlsxReader),
        Some(DocumentKind::WordDocument) => Ok(&DocxReader),
        None => Err(SourceError::Unsupported { name: doc.name.clone() }),
    }
}

pub fn read_document(doc: &Document) -> Result<Vec<RowBatch>, SourceError> {
    reader_for(doc)?.read(doc)
}

/// Outcome of reading one input.
#[derive(Debug)]
pub struct DocumentResult {
    pub name: String,
    pub result: Result<Vec<RowBatch>, SourceError>,
}

/// Outcome of reading a set of inputs, in input order. A failed document
/// never prevents the others from being read.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub results: Vec<DocumentResult>,
}

impl LoadOutcome {
    pub fn failures(&self) -> impl Iterator<Item = &SourceError> {
        self.results.iter().filter_map(|r| r.result.as_ref().err())
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    pub fn batch_count(&self) -> usize {
        self.results
            .iter()
            .filter_map(|r| r.result.as_ref().ok())
            .map(Vec::len)
            .sum()
    }

    /// Split into all batches (input order) and the failures.
    pub fn into_parts(self) -> (Vec<RowBatch>, Vec<SourceError>) {
        let mut batches = Vec::new();
        let mut failures = Vec::new();
        for doc in self.results {
            match doc.result {
                Ok(b) => batches.extend(b),
                Err(e) => failures.push(e),
            }
        }
        (batches, failures)
    }
}

/// Read documents already in memory.
pub fn load_documents(docs: &[Document]) -> LoadOutcome {
    let results = docs
        .iter()
        .map(|doc| {
            let result = read_document(doc);
            match &result {
                Ok(batches) => log::debug!("{}: {} batches", doc.name, batches.len()),
                Err(e) => log::warn!("skipping {}", e),
            }
            DocumentResult {
                name: doc.name.clone(),
                result,
            }
        })
        .collect();
    LoadOutcome { results }
}

/// Read documents from disk. Unsupported extensions are rejected before the
/// file is opened.
pub fn load_paths<P: AsRef<Path>>(paths: &[P]) -> LoadOutcome {
    let results = paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            let result = if DocumentKind::from_name(&name).is_none() {
                Err(SourceError::Unsupported { name: name.clone() })
            } else {
                Document::from_path(path).and_then(|doc| read_document(&doc))
            };
            match &result {
                Ok(batches) => log::debug!("{}: {} batches", name, batches.len()),
                Err(e) => log::warn!("skipping {}", e),
            }
            DocumentResult { name, result }
        })
        .collect();
    LoadOutcome { results }
}
