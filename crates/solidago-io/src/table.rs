//! Typed CSV tables.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use solidago_core::errors::DataError;
use tracing::debug;

/// One row of a CSV table, with its header.
pub trait TableRow: Serialize + DeserializeOwned {
    /// Table name used in error messages.
    const TABLE: &'static str;
    /// Header, in the order rows are written.
    const COLUMNS: &'static [&'static str];
    /// Columns a file must have to be read.
    const REQUIRED: &'static [&'static str] = Self::COLUMNS;
}

fn path_string(path: &Path) -> String {
    path.display().to_string()
}

fn csv_error(table: &str, path: &Path, error: csv::Error) -> DataError {
    if let Some(position) = error.position() {
        return DataError::MalformedRow {
            table: table.to_string(),
            line: position.line(),
            message: error.to_string(),
        };
    }
    DataError::Io {
        path: path_string(path),
        message: error.to_string(),
    }
}

/// Opens `path` and checks that its header has every column in `required`.
pub(crate) fn open(
    path: &Path,
    table: &str,
    required: &[&str],
) -> Result<(csv::Reader<std::fs::File>, csv::StringRecord), DataError> {
    if !path.is_file() {
        return Err(DataError::FileNotFound {
            path: path_string(path),
        });
    }
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| csv_error(table, path, e))?;
    let headers = reader
        .headers()
        .map_err(|e| csv_error(table, path, e))?
        .clone();
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(DataError::MissingColumn {
                table: table.to_string(),
                column: column.to_string(),
            });
        }
    }
    Ok((reader, headers))
}

/// Reads every row of `path`.
pub fn read_table<T: TableRow>(path: &Path) -> Result<Vec<T>, DataError> {
    let (mut reader, headers) = open(path, T::TABLE, T::REQUIRED)?;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(T::TABLE, path, e))?;
        let line = record.position().map_or(0, |p| p.line());
        let row = record
            .deserialize(Some(&headers))
            .map_err(|e| DataError::MalformedRow {
                table: T::TABLE.to_string(),
                line,
                message: e.to_string(),
            })?;
        rows.push(row);
    }
    debug!(table = T::TABLE, n_rows = rows.len(), "table read");
    Ok(rows)
}

/// Like [`read_table`], but a missing file is an empty table.
pub fn read_optional_table<T: TableRow>(path: &Path) -> Result<Vec<T>, DataError> {
    if !path.exists() {
        debug!(table = T::TABLE, path = %path.display(), "optional table absent");
        return Ok(Vec::new());
    }
    read_table(path)
}

/// Writes `rows` under the header of `T`. An empty table still gets its header.
pub fn write_table<T, I>(path: &Path, rows: I) -> Result<(), DataError>
where
    T: TableRow,
    I: IntoIterator<Item = T>,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| csv_error(T::TABLE, path, e))?;
    writer
        .write_record(T::COLUMNS)
        .map_err(|e| csv_error(T::TABLE, path, e))?;
    let mut n_rows = 0usize;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| csv_error(T::TABLE, path, e))?;
        n_rows += 1;
    }
    writer.flush().map_err(|e| DataError::Io {
        path: path_string(path),
        message: e.to_string(),
    })?;
    debug!(table = T::TABLE, n_rows, "table written");
    Ok(())
}

/// Accepts `true`/`false` in any case, and `1`/`0`.
pub(crate) fn flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" | "" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "expected a boolean, got {other:?}"
        ))),
    }
}
