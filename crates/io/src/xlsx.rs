// Excel workbook reader (xlsx)

use std::io::Cursor;

use calamine::{open_workbook_from_rs, Data, Range, Reader, Xlsx};
use tabmatch_engine::{CellValue, RowBatch};

use crate::document::Document;
use crate::error::SourceError;

/// Read every sheet of an xlsx workbook into row batches.
///
/// The first row of each sheet's used range is the header row. Empty sheets
/// produce no batch; rows whose cells are all empty are skipped.
pub fn read_workbook(doc: &Document) -> Result<Vec<RowBatch>, SourceError> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(doc.bytes.as_slice()))
        .map_err(|e| SourceError::parse(&doc.name, format!("failed to open workbook: {}", e)))?;

    let sheet_names = workbook.sheet_names();
    if sheet_names.is_empty() {
        return Err(SourceError::parse(&doc.name, "workbook contains no sheets"));
    }

    let mut batches = Vec::new();
    for sheet_name in &sheet_names {
        let range = workbook.worksheet_range(sheet_name).map_err(|e| {
            SourceError::parse(&doc.name, format!("failed to read sheet '{}': {}", sheet_name, e))
        })?;

        match sheet_batch(&doc.name, sheet_name, &range) {
            Some(batch) => {
                log::debug!(
                    "{}: sheet '{}' -> {} rows, {} columns",
                    doc.name,
                    sheet_name,
                    batch.len(),
                    batch.headers().len()
                );
                batches.push(batch);
            }
            None => log::debug!("{}: sheet '{}' is empty, skipped", doc.name, sheet_name),
        }
    }

    Ok(batches)
}

/// Convert one worksheet range into a batch, or `None` for an empty sheet.
fn sheet_batch(file_name: &str, sheet_name: &str, range: &Range<Data>) -> Option<RowBatch> {
    let (height, width) = range.get_size();
    if height == 0 || width == 0 {
        return None;
    }

    let mut rows = range.rows();
    let headers: Vec<String> = rows.next()?.iter().map(cell_text).collect();

    let data: Vec<Vec<CellValue>> = rows
        .map(|row| row.iter().map(|cell| CellValue::from_text(cell_text(cell))).collect::<Vec<_>>())
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .collect();

    Some(RowBatch::new(
        format!("{} (Sheet: {})", file_name, sheet_name),
        headers,
        data,
    ))
}

/// Render a calamine cell as display text.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => format_number(*n),
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        Data::Error(e) => e.to_string(),
        Data::DateTime(dt) => {
            if dt.is_duration() {
                return format_duration(dt.as_f64());
            }
            match dt.as_datetime() {
                Some(value) if value.time() == chrono::NaiveTime::MIN => {
                    value.format("%Y-%m-%d").to_string()
                }
                Some(value) => value.format("%Y-%m-%d %H:%M:%S").to_string(),
                None => format_number(dt.as_f64()),
            }
        }
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

/// Integers without decimals, everything else in shortest round-trip form.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Duration serial (fraction of a day) as `H:MM:SS`.
fn format_duration(days: f64) -> String {
    let total = (days * 86_400.0).round() as i64;
    let sign = if total < 0 { "-" } else { "" };
    let total = total.abs();
    format!("{}{}:{:02}:{:02}", sign, total / 3600, (total / 60) % 60, total % 60)
}
