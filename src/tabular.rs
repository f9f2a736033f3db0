//! CSV-backed vocabularies: row filtering and column projection.
use crate::error::VocabError;
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

pub const ID_COLUMN: &str = "id";
pub const NAME_COLUMN: &str = "name";

/// A delimited table with a header row, cells kept as text.
#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    fn column_index(&self, column: &str) -> Result<usize, VocabError> {
        self.headers
            .iter()
            .position(|header| header == column)
            .ok_or_else(|| VocabError::MissingColumn {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }
}

pub fn load_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("open CSV file {}", path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("read CSV header {}", path.display()))?
        .iter()
        .map(str::to_string)
        .collect();
    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record =
            record.with_context(|| format!("read row {} of {}", idx + 1, path.display()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(Table {
        name: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
        headers,
        rows,
    })
}

/// One projected row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularRecord {
    columns: BTreeMap<String, String>,
}

impl TabularRecord {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns.get(column).map(String::as_str)
    }

    pub fn id(&self) -> &str {
        self.get(ID_COLUMN).unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        self.get(NAME_COLUMN).unwrap_or_default()
    }
}

/// Keep rows whose `column` cell equals `term`, project them onto `keep` and
/// sort them by name (stable, so equal names keep file order).
pub fn filter_and_project(
    table: &Table,
    column: &str,
    term: &str,
    keep: &[String],
) -> Result<Vec<TabularRecord>, VocabError> {
    if !keep.iter().any(|c| c == ID_COLUMN) || !keep.iter().any(|c| c == NAME_COLUMN) {
        return Err(VocabError::IncompleteProjection {
            table: table.name.clone(),
        });
    }
    let filter_idx = table.column_index(column)?;
    let projection = keep
        .iter()
        .map(|name| Ok((name.as_str(), table.column_index(name)?)))
        .collect::<Result<Vec<_>, VocabError>>()?;

    let mut records: Vec<TabularRecord> = table
        .rows
        .iter()
        .filter(|row| row.get(filter_idx).map(String::as_str) == Some(term))
        .map(|row| TabularRecord {
            columns: projection
                .iter()
                .map(|(name, idx)| {
                    let cell = row.get(*idx).cloned().unwrap_or_default();
                    (name.to_string(), cell)
                })
                .collect(),
        })
        .collect();
    records.sort_by(|a, b| a.name().cmp(b.name()));
    Ok(records)
}

#[cfg(test)]
#[path = "tabular_tests.rs"]
mod tests;
