
use crate::cell::CellValue;

/// Name of the system row identifier column in outputs.
pub const ROW_ID_FIELD: &str = "row_id";
/// Name of the system provenance column in outputs.
pub const PROVENANCE_FIELD: &str = "provenance";

static EMPTY_CELL: CellValue = CellValue::Empty;

/// One unified row. System fields live outside `values`, so a source column
/// that happens to be called `row_id` or `provenance` keeps its own data.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub row_id: usize,
    pub provenance: String,
    values: Vec<CellValue>,
}

impl Record {
    /// Values aligned with [`Table::fields`].
    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    /// Value at a schema position; out-of-range positions read as empty.
    pub fn value(&self, index: usize) -> &CellValue {
        self.values.get(index).unwrap_or(&EMPTY_CELL)
    }
}

/// The unified table: a field universe plus rows expressed over it.
///
/// Built by [`crate::unify::unify`]. `row_id`s are `0..len()` in row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    fields: Vec<String>,
    records: Vec<Record>,
}

impl Table {
    pub(crate) fn from_parts(fields: Vec<String>, rows: Vec<(String, Vec<CellValue>)>) -> Self {
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(row_id, (provenance, values))| Record { row_id, provenance, values })
            .collect();
        Self { fields, records }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == name)
    }

    pub fn record(&self, row_id: usize) -> Option<&Record> {
        self.records.get(row_id)
    }

    /// Value of a named field; unknown fields read as empty.
    pub fn value<'a>(&self, record: &'a Record, field: &str) -> &'a CellValue {
        match self.field_index(field) {
            Some(index) => record.value(index),
            None => &EMPTY_CELL,
        }
    }
}
