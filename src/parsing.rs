//! CSV loading and persistence for catalog tables
//!
//! Every stage that needs a table goes through [`load_table`], which turns a missing
//! file into [`TableError::NotFound`] instead of each caller checking on its own.

use crate::common::Table;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Field values treated as missing when reading, mirroring common dataframe readers
const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Errors that can occur while reading or writing a table
#[derive(Error, Debug)]
pub enum TableError {
    #[error("File not found at {0}")]
    NotFound(PathBuf),

    #[error("Record on line {line} has {found} fields, but the header has {expected}")]
    RaggedRecord {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to access file: {0}")]
    Io(#[from] std::io::Error),
}

type Result<T> = core::result::Result<T, TableError>;

fn parse_cell(value: &str) -> Option<String> {
    if MISSING_MARKERS.contains(&value) {
        None
    } else {
        Some(value.to_string())
    }
}

/// Load a CSV file with a header row into a [`Table`]
///
/// Records shorter than the header are padded with missing cells. Records longer
/// than the header are rejected, since their extra values have no column.
///
/// # Arguments
/// * `path` - Path to the CSV file
///
/// # Returns
/// * `Ok(Table)` - The loaded table
/// * `Err(TableError::NotFound)` - If the file does not exist
/// * `Err(TableError::RaggedRecord)` - If a record has more fields than the header
/// * `Err(TableError)` - If reading or CSV parsing failed
pub fn load_table(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Err(TableError::NotFound(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.len() > headers.len() {
            return Err(TableError::RaggedRecord {
                line: record.position().map_or(0, |position| position.line()),
                expected: headers.len(),
                found: record.len(),
            });
        }
        records.push(record.iter().map(parse_cell).collect());
    }

    debug!(
        path = %path.display(),
        rows = records.len(),
        columns = headers.len(),
        "Loaded table"
    );
    Ok(Table::new(headers, records))
}

/// Write a [`Table`] to `path` as CSV, preserving column order.
///
/// Missing cells are written as empty fields.
pub fn write_table(table: &Table, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::WriterBuilder::new().from_path(path)?;
    writer.write_record(&table.headers)?;
    for record in &table.records {
        writer.write_record(record.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = table.len(), "Wrote table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.csv");

        let result = load_table(&path);
        assert!(matches!(result, Err(TableError::NotFound(p)) if p == path));
    }

    #[test]
    fn test_load_marks_missing_cells() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("catalog.csv");
        fs::write(
            &path,
            "title,director,rating\n\
             Alpha,,PG\n\
             Beta,Jane Doe,NA\n\
             \"Gamma, Part 2\",John Roe\n",
        )
        .unwrap();

        let table = load_table(&path).unwrap();
        assert_eq!(table.headers, vec!["title", "director", "rating"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.records[0][1], None);
        assert_eq!(table.records[1][2], None);
        assert_eq!(table.records[2][0].as_deref(), Some("Gamma, Part 2"));
        assert_eq!(table.records[2][2], None);
    }

    #[test]
    fn test_load_rejects_overlong_record() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("catalog.csv");
        fs::write(
            &path,
            "title,rating\n\
             Alpha,PG\n\
             Beta,R,stray value\n",
        )
        .unwrap();

        let result = load_table(&path);
        assert!(matches!(
            result,
            Err(TableError::RaggedRecord {
                line: 3,
                expected: 2,
                found: 3
            })
        ));
    }

    #[test]
    fn test_write_then_load_preserves_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("clean.csv");

        let table = Table::new(
            vec!["title".into(), "cast".into(), "country".into()],
            vec![
                vec![Some("Alpha".into()), Some("A, B".into()), None],
                vec![Some("Beta \"quoted\"".into()), None, Some("India".into())],
            ],
        );
        write_table(&table, &path).unwrap();

        let reloaded = load_table(&path).unwrap();
        assert_eq!(reloaded, table);
    }
}
