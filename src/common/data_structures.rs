use crate::common::frequency::value_counts;
use csv::StringRecord;
use serde::{Deserialize, Serialize};

/// An in-memory CSV table whose columns are addressable by header name.
///
/// Cells are stored as `Option<String>`, where `None` marks a missing value.
/// Non-missing values are kept exactly as they were read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Column names in file order
    pub headers: Vec<String>,
    /// One entry per row, each with exactly `headers.len()` cells
    pub records: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Creates a table, padding or truncating every record to the header width
    pub fn new(headers: Vec<String>, records: Vec<Vec<Option<String>>>) -> Self {
        let width = headers.len();
        let records = records
            .into_iter()
            .map(|mut record| {
                record.resize(width, None);
                record
            })
            .collect();

        Self { headers, records }
    }

    /// Number of rows in the table
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Position of the named column, if present
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Iterates the cells of the named column; yields nothing when the column does not exist
    pub fn column<'a>(&'a self, name: &str) -> impl Iterator<Item = Option<&'a str>> + 'a {
        let index = self.column_index(name);
        self.records
            .iter()
            .filter_map(move |record| index.map(|index| record[index].as_deref()))
    }

    /// Replaces every missing cell of `name` with `value`, returning how many cells changed
    pub fn fill_missing(&mut self, name: &str, value: &str) -> usize {
        let Some(index) = self.column_index(name) else {
            return 0;
        };

        let mut filled = 0;
        for record in &mut self.records {
            if record[index].is_none() {
                record[index] = Some(value.to_string());
                filled += 1;
            }
        }
        filled
    }

    /// Most frequent non-missing value of `name`.
    ///
    /// Ties resolve to the lexicographically smallest value, so the result does not
    /// depend on row order. Returns `None` when the column has no values.
    pub fn mode(&self, name: &str) -> Option<String> {
        let counts = value_counts(self.column(name).flatten());
        let top = counts.first().map(|(_, count)| *count)?;

        counts
            .into_iter()
            .take_while(|(_, count)| *count == top)
            .map(|(value, _)| value)
            .min()
    }

    /// Removes rows whose `name` cell is missing, returning how many rows were removed
    pub fn drop_missing(&mut self, name: &str) -> usize {
        let Some(index) = self.column_index(name) else {
            return 0;
        };

        let before = self.records.len();
        self.records.retain(|record| record[index].is_some());
        before - self.records.len()
    }

    /// Missing cell count for every column, in header order
    pub fn missing_counts(&self) -> Vec<(String, usize)> {
        self.headers
            .iter()
            .enumerate()
            .map(|(index, header)| {
                let missing = self
                    .records
                    .iter()
                    .filter(|record| record[index].is_none())
                    .count();
                (header.clone(), missing)
            })
            .collect()
    }
}

/// Broad kind of a catalog title
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Movie,
    Series,
}

impl ContentKind {
    /// Recognises the `type` column spellings; the dataset calls series "TV Show"
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "Movie" => Some(ContentKind::Movie),
            "TV Show" | "Series" => Some(ContentKind::Series),
            _ => None,
        }
    }
}

/// Typed view of a single catalog title
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRow {
    pub title: Option<String>,
    /// Raw `type` column value (e.g. "Movie", "TV Show")
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub director: Option<String>,
    pub cast: Option<String>,
    pub country: Option<String>,
    pub rating: Option<String>,
    pub date_added: Option<String>,
    /// Either a minute count ("90 min") or a season count ("3 Seasons")
    pub duration: Option<String>,
    /// Comma-space separated genre labels
    pub listed_in: Option<String>,
}

impl CatalogRow {
    pub fn content_kind(&self) -> Option<ContentKind> {
        self.kind.as_deref().and_then(ContentKind::parse)
    }

    /// Deserializes the typed rows of a table by header name
    ///
    /// Columns absent from the table and missing cells both become `None`; columns the
    /// typed view does not know are ignored.
    pub fn from_table(table: &Table) -> Result<Vec<CatalogRow>, csv::Error> {
        let headers = StringRecord::from(table.headers.clone());

        table
            .records
            .iter()
            .map(|record| {
                let record: StringRecord = record
                    .iter()
                    .map(|cell| cell.as_deref().unwrap_or(""))
                    .collect();
                record.deserialize(Some(&headers))
            })
            .collect()
    }
}

/// A labelled grid of counts, used for cross-tabulations and co-occurrence matrices
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountMatrix {
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    /// `counts[row][column]`
    pub counts: Vec<Vec<u64>>,
}

impl CountMatrix {
    /// Creates a zero-filled matrix with the given labels
    pub fn zeroed(row_labels: Vec<String>, column_labels: Vec<String>) -> Self {
        let counts = vec![vec![0; column_labels.len()]; row_labels.len()];
        Self {
            row_labels,
            column_labels,
            counts,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.row_labels.is_empty() || self.column_labels.is_empty()
    }

    pub fn max(&self) -> u64 {
        self.counts
            .iter()
            .flat_map(|row| row.iter().copied())
            .max()
            .unwrap_or(0)
    }
}

/// Lookups used to check derived matrices
#[cfg(test)]
impl CountMatrix {
    /// Count at the given labels, zero when either label is unknown
    pub fn get(&self, row: &str, column: &str) -> u64 {
        let row = self.row_labels.iter().position(|label| label == row);
        let column = self.column_labels.iter().position(|label| label == column);
        match (row, column) {
            (Some(row), Some(column)) => self.counts[row][column],
            _ => 0,
        }
    }

    pub fn row_sums(&self) -> Vec<u64> {
        self.counts.iter().map(|row| row.iter().sum()).collect()
    }
}
