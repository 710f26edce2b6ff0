// Word document table reader (docx)
//
// Only `word/document.xml` is read. Each top-level `w:tbl` becomes one batch;
// tables nested inside a cell are parsed for structure but contribute no text.

use std::io::{Cursor, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tabmatch_engine::{CellValue, RowBatch};

use crate::document::Document;
use crate::error::SourceError;

const DOCUMENT_XML: &str = "word/document.xml";

/// Widest row accepted after `gridSpan` expansion; matches the xlsx column limit.
const MAX_COLUMNS: usize = 16_384;

/// Vertical merge state of a table cell (`w:vMerge`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VMerge {
    None,
    Restart,
    Continue,
}

#[derive(Debug, Clone)]
struct RawCell {
    text: String,
    grid_span: usize,
    v_merge: VMerge,
}

type RawTable = Vec<Vec<RawCell>>;

/// Read every top-level table of a docx document into row batches.
pub fn read_document(doc: &Document) -> Result<Vec<RowBatch>, SourceError> {
    let xml = read_document_xml(doc)?;
    let tables = parse_tables(&xml).map_err(|e| SourceError::parse(&doc.name, e))?;
    log::debug!("{}: {} top-level tables", doc.name, tables.len());
    tables_to_batches(&doc.name, tables).map_err(|e| SourceError::parse(&doc.name, e))
}

fn read_document_xml(doc: &Document) -> Result<String, SourceError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(doc.bytes.as_slice()))
        .map_err(|e| SourceError::parse(&doc.name, format!("not a docx archive: {}", e)))?;
    let mut file = archive
        .by_name(DOCUMENT_XML)
        .map_err(|_| SourceError::parse(&doc.name, format!("missing {}", DOCUMENT_XML)))?;
    let mut xml = String::new();
    file.read_to_string(&mut xml)
        .map_err(|e| SourceError::parse(&doc.name, format!("failed to read {}: {}", DOCUMENT_XML, e)))?;
    Ok(xml)
}

/// Turn parsed tables into batches, numbering tables from 1 in document order.
/// Tables with no rows are skipped but still consume their number.
fn tables_to_batches(file_name: &str, tables: Vec<RawTable>) -> Result<Vec<RowBatch>, String> {
    let mut batches = Vec::with_capacity(tables.len());
    for (index, table) in tables.into_iter().enumerate() {
        let grid = expand_merges(table).map_err(|e| format!("table {}: {}", index + 1, e))?;
        let provenance = format!("{} (Table: {})", file_name, index + 1);
        match table_batch(provenance, grid) {
            Some(batch) => batches.push(batch),
            None => log::debug!("{}: table {} has no rows, skipped", file_name, index + 1),
        }
    }
    Ok(batches)
}

/// Header/data split for one table grid.
///
/// A single row is data under synthetic `Col_i` names. Otherwise the first row
/// is the header, replaced by synthetic names when every header cell is empty.
fn table_batch(provenance: String, grid: Vec<Vec<String>>) -> Option<RowBatch> {
    let mut rows = grid.into_iter();
    let first = rows.next()?;

    let (headers, data) = if rows.len() == 0 {
        (RowBatch::synthetic_headers(first.len()), vec![first])
    } else if first.iter().all(|h| h.is_empty()) {
        (RowBatch::synthetic_headers(first.len()), rows.collect())
    } else {
        (first, rows.collect())
    };

    let data = data
        .into_iter()
        .map(|row| row.into_iter().map(CellValue::from_text).collect())
        .collect();
    Some(RowBatch::new(provenance, headers, data))
}

/// Resolve `gridSpan` and `vMerge` into a plain text grid.
fn expand_merges(table: RawTable) -> Result<Vec<Vec<String>>, String> {
    let mut grid: Vec<Vec<String>> = Vec::with_capacity(table.len());
    for (row_index, row) in table.into_iter().enumerate() {
        let width = row
            .iter()
            .try_fold(0usize, |acc, cell| acc.checked_add(cell.grid_span.max(1)))
            .filter(|w| *w <= MAX_COLUMNS)
            .ok_or_else(|| format!("row {} spans more than {} columns", row_index + 1, MAX_COLUMNS))?;
        let mut expanded = Vec::with_capacity(width);
        for cell in row {
            let span = cell.grid_span.max(1);
            for _ in 0..span {
                let text = match cell.v_merge {
                    VMerge::Continue => grid
                        .last()
                        .and_then(|above| above.get(expanded.len()))
                        .cloned()
                        .unwrap_or_default(),
                    VMerge::None | VMerge::Restart => cell.text.clone(),
                };
                expanded.push(text);
            }
        }
        grid.push(expanded);
    }
    Ok(grid)
}

/// Cell being assembled while its XML is streamed.
#[derive(Default)]
struct CellBuilder {
    paragraphs: Vec<String>,
    paragraph: Option<String>,
    grid_span: usize,
    v_merge: Option<VMerge>,
}

impl CellBuilder {
    fn push_str(&mut self, s: &str) {
        self.paragraph.get_or_insert_with(String::new).push_str(s);
    }

    fn push_char(&mut self, c: char) {
        self.paragraph.get_or_insert_with(String::new).push(c);
    }

    fn end_paragraph(&mut self) {
        self.paragraphs.push(self.paragraph.take().unwrap_or_default());
    }

    fn finish(mut self) -> RawCell {
        if self.paragraph.is_some() {
            self.end_paragraph();
        }
        RawCell {
            text: self.paragraphs.join("\n").trim().to_string(),
            grid_span: self.grid_span.max(1),
            v_merge: self.v_merge.unwrap_or(VMerge::None),
        }
    }
}

/// Stream `document.xml` and collect top-level tables as raw cells.
fn parse_tables(xml: &str) -> Result<Vec<RawTable>, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false); // whitespace inside w:t is content
    let mut buf = Vec::new();

    let mut tables: Vec<RawTable> = Vec::new();
    let mut depth = 0usize;
    let mut table: RawTable = Vec::new();
    let mut row: Option<Vec<RawCell>> = None;
    let mut cell: Option<CellBuilder> = None;
    let mut in_run = false;
    let mut in_text = false;

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| format!("malformed {} at byte {}: {}", DOCUMENT_XML, reader.buffer_position(), e))?;

        match event {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"tbl" => {
                    depth += 1;
                    if depth == 1 {
                        table = Vec::new();
                    }
                }
                b"tr" if depth == 1 => row = Some(Vec::new()),
                b"tc" if depth == 1 => cell = Some(CellBuilder::default()),
                b"p" if depth == 1 => {
                    if let Some(c) = cell.as_mut() {
                        c.paragraph = Some(String::new());
                    }
                }
                b"r" if depth == 1 => in_run = true,
                b"t" if depth == 1 && in_run => in_text = true,
                b"gridSpan" | b"vMerge" if depth == 1 => apply_cell_property(e, cell.as_mut()),
                _ => {}
            },
            Event::Empty(ref e) if depth == 1 => match e.local_name().as_ref() {
                b"tab" if in_run => {
                    if let Some(c) = cell.as_mut() {
                        c.push_char('\t');
                    }
                }
                b"br" | b"cr" if in_run => {
                    if let Some(c) = cell.as_mut() {
                        c.push_char('\n');
                    }
                }
                b"p" => {
                    if let Some(c) = cell.as_mut() {
                        c.end_paragraph();
                    }
                }
                b"gridSpan" | b"vMerge" => apply_cell_property(e, cell.as_mut()),
                _ => {}
            },
            Event::Text(ref e) if depth == 1 && in_text => {
                if let Some(c) = cell.as_mut() {
                    c.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Event::GeneralRef(ref e) if depth == 1 && in_text => {
                let name = String::from_utf8_lossy(&**e);
                if let (Some(c), Some(ch)) = (cell.as_mut(), resolve_entity(&name)) {
                    c.push_char(ch);
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"tbl" => {
                    if depth == 1 {
                        tables.push(std::mem::take(&mut table));
                    }
                    depth = depth.saturating_sub(1);
                }
                b"tr" if depth == 1 => {
                    if let Some(r) = row.take() {
                        table.push(r);
                    }
                }
                b"tc" if depth == 1 => {
                    if let (Some(c), Some(r)) = (cell.take(), row.as_mut()) {
                        r.push(c.finish());
                    }
                }
                b"p" if depth == 1 => {
                    if let Some(c) = cell.as_mut() {
                        c.end_paragraph();
                    }
                }
                b"r" if depth == 1 => in_run = false,
                b"t" if depth == 1 => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(tables)
}

fn apply_cell_property(e: &BytesStart<'_>, cell: Option<&mut CellBuilder>) {
    let Some(cell) = cell else { return };
    let val = attribute_value(e, b"val");
    match e.local_name().as_ref() {
        b"gridSpan" => {
            cell.grid_span = val.and_then(|v| v.trim().parse().ok()).unwrap_or(1);
        }
        b"vMerge" => {
            cell.v_merge = Some(match val.as_deref() {
                Some("restart") => VMerge::Restart,
                _ => VMerge::Continue,
            });
        }
        _ => {}
    }
}

fn attribute_value(e: &BytesStart<'_>, local: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == local)
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}

/// Resolve a predefined or numeric XML entity (`amp`, `#1025`, `#x401`).
fn resolve_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = name.strip_prefix('#')?;
            let value = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse().ok()?,
            };
            char::from_u32(value)
        }
    }
}
