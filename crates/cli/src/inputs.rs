// Input loading shared by the data commands

use std::path::Path;

use serde::Serialize;
use tabmatch_engine::{unify, Table};
use tabmatch_io::{load_paths, SourceError};

use crate::CliError;

/// One batch as read, before unification.
#[derive(Debug, Clone, Serialize)]
pub struct SourceInfo {
    pub provenance: String,
    pub rows: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailureInfo {
    pub file: String,
    pub error: String,
}

impl From<&SourceError> for FailureInfo {
    fn from(err: &SourceError) -> Self {
        Self {
            file: err.name().to_string(),
            error: err.to_string(),
        }
    }
}

/// Everything read from the command's input files.
pub struct Loaded {
    pub table: Table,
    pub sources: Vec<SourceInfo>,
    pub failures: Vec<SourceError>,
}

impl Loaded {
    pub fn failure_info(&self) -> Vec<FailureInfo> {
        self.failures.iter().map(FailureInfo::from).collect()
    }
}

/// Read and unify `paths`. Unreadable inputs are skipped (and logged by the
/// reader) unless `strict` is set.
pub fn load<P: AsRef<Path>>(paths: &[P], strict: bool) -> Result<Loaded, CliError> {
    let (batches, failures) = load_paths(paths).into_parts();

    if strict && !failures.is_empty() {
        return Err(CliError::sources(&failures));
    }

    let sources = batches
        .iter()
        .map(|b| SourceInfo {
            provenance: b.provenance().to_string(),
            rows: b.len(),
        })
        .collect();
    let table = unify(batches);
    log::info!(
        "loaded {} rows, {} fields from {} inputs ({} failed)",
        table.len(),
        table.fields().len(),
        paths.len(),
        failures.len()
    );

    Ok(Loaded {
        table,
        sources,
        failures,
    })
}
