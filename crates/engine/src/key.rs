use crate::error::EngineError;
use crate::normalize::{normalize, NormalizeOptions};
use crate::table::Table;

/// Field names checked against a table's schema, in user order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSelection {
    names: Vec<String>,
    indices: Vec<usize>,
}

impl FieldSelection {
    /// Resolve every name against the schema. The first unknown name is an
    /// error; nothing is dropped silently.
    pub fn resolve<S: AsRef<str>>(table: &Table, names: &[S]) -> Result<Self, EngineError> {
        let mut selection = FieldSelection::default();
        for name in names {
            let name = name.as_ref();
            let index = table.field_index(name).ok_or_else(|| EngineError::InvalidSelection {
                field: name.to_string(),
                available: table.fields().to_vec(),
            })?;
            selection.names.push(name.to_string());
            selection.indices.push(index);
        }
        Ok(selection)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Side mapping `row_id -> match key`. The table itself is never touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchKeys {
    keys: Vec<String>,
}

impl MatchKeys {
    pub fn get(&self, row_id: usize) -> Option<&str> {
        self.keys.get(row_id).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.keys.iter().enumerate().map(|(row_id, key)| (row_id, key.as_str()))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Normalize each selected field and concatenate, in selection order, with
/// no separator.
pub fn build_match_keys(table: &Table, selection: &FieldSelection, options: NormalizeOptions) -> MatchKeys {
    let keys = table
        .records()
        .iter()
        .map(|record| {
            selection
                .indices()
                .iter()
                .map(|&index| normalize(record.value(index), options))
                .collect::<String>()
        })
        .collect();

    MatchKeys { keys }
}
