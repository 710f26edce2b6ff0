// Report export (xlsx, csv, json)

use std::fmt;
use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};
use tabmatch_engine::report::Report;

use crate::error::ExportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
    Json,
}

impl ExportFormat {
    /// Pick the format from the output extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("xlsx") => Ok(Self::Xlsx),
            Some("csv") => Ok(Self::Csv),
            Some("json") => Ok(Self::Json),
            _ => Err(ExportError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xlsx => write!(f, "xlsx"),
            Self::Csv => write!(f, "csv"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Render a report to bytes in the given format.
pub fn export_report(report: &Report, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::Xlsx => to_xlsx(report),
        ExportFormat::Csv => to_csv(report),
        ExportFormat::Json => {
            serde_json::to_vec_pretty(report).map_err(|e| ExportError::Encode(e.to_string()))
        }
    }
}

/// Render a report and write it to `path`, format chosen by extension.
pub fn write_report(report: &Report, path: &Path) -> Result<ExportFormat, ExportError> {
    let format = ExportFormat::from_path(path)?;
    let bytes = export_report(report, format)?;
    std::fs::write(path, bytes).map_err(|e| ExportError::Io(format!("{}: {}", path.display(), e)))?;
    log::debug!("wrote {} report ({} rows) to {}", format, report.records.len(), path.display());
    Ok(format)
}

/// One worksheet named after the report kind, bold frozen header row.
fn to_xlsx(report: &Report) -> Result<Vec<u8>, ExportError> {
    let encode = |e: rust_xlsxwriter::XlsxError| ExportError::Encode(e.to_string());

    let mut workbook = Workbook::new();
    let worksheet = workbook
        .add_worksheet()
        .set_name(report.kind.title())
        .map_err(encode)?;

    let bold = Format::new().set_bold();
    for (col, header) in report.headers().iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, header, &bold)
            .map_err(encode)?;
    }
    for (row_idx, row) in report.rows().iter().enumerate() {
        let row_num = row_idx as u32 + 1;
        for (col, value) in row.iter().enumerate() {
            if !value.is_empty() {
                worksheet.write_string(row_num, col as u16, value).map_err(encode)?;
            }
        }
    }
    worksheet.set_freeze_panes(1, 0).map_err(encode)?;
    worksheet.autofit();

    workbook.save_to_buffer().map_err(encode)
}

fn to_csv(report: &Report) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(report.headers())
        .map_err(|e| ExportError::Encode(e.to_string()))?;
    for row in report.rows() {
        writer.write_record(&row).map_err(|e| ExportError::Encode(e.to_string()))?;
    }
    writer.into_inner().map_err(|e| ExportError::Encode(e.to_string()))
}
