//! Missing-value policies applied to the raw catalog table
//!
//! The policies run in a fixed order. The rating mode is computed before any row is
//! dropped, so it reflects the whole raw table.

use crate::analysis::constants::UNKNOWN_VALUE;
use crate::common::Table;
use thiserror::Error;
use tracing::debug;

/// Columns every input catalog must provide
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "type",
    "director",
    "cast",
    "country",
    "rating",
    "date_added",
    "duration",
    "listed_in",
];

/// How missing cells of one column are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingValuePolicy {
    /// Substitute a fixed literal
    Constant(&'static str),
    /// Substitute the most frequent non-missing value of the column
    Mode,
    /// Remove the whole row
    DropRow,
}

/// Per-column policies, in application order
pub const CLEANING_POLICIES: [(&str, MissingValuePolicy); 5] = [
    ("director", MissingValuePolicy::Constant(UNKNOWN_VALUE)),
    ("cast", MissingValuePolicy::Constant(UNKNOWN_VALUE)),
    ("country", MissingValuePolicy::Constant(UNKNOWN_VALUE)),
    ("rating", MissingValuePolicy::Mode),
    ("date_added", MissingValuePolicy::DropRow),
];

/// Errors that can occur while cleaning
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CleanError {
    #[error("Required column '{0}' is missing from the catalog")]
    MissingColumn(String),

    #[error("Column '{0}' has no values to compute a mode from")]
    NoModeAvailable(String),
}

/// What the cleaning pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleaningReport {
    pub rows_before: usize,
    pub rows_after: usize,
    pub dropped_rows: usize,
    /// Number of substituted cells per filled column, in policy order
    pub filled: Vec<(String, usize)>,
    /// The value used to fill missing ratings
    pub rating_fill: Option<String>,
}

/// Verifies that every column in [`REQUIRED_COLUMNS`] is present
pub fn check_required_columns(table: &Table) -> Result<(), CleanError> {
    match REQUIRED_COLUMNS
        .iter()
        .find(|column| table.column_index(column).is_none())
    {
        Some(column) => Err(CleanError::MissingColumn(column.to_string())),
        None => Ok(()),
    }
}

/// Apply [`CLEANING_POLICIES`] to `table` in place
///
/// # Returns
/// * `Ok(CleaningReport)` - A summary of the substitutions and removed rows
/// * `Err(CleanError)` - If a required column is absent or no mode can be computed
pub fn clean_table(table: &mut Table) -> Result<CleaningReport, CleanError> {
    check_required_columns(table)?;

    let mut report = CleaningReport {
        rows_before: table.len(),
        ..Default::default()
    };

    for (column, policy) in CLEANING_POLICIES {
        match policy {
            MissingValuePolicy::Constant(value) => {
                let filled = table.fill_missing(column, value);
                debug!(column, value, filled, "Filled missing values");
                report.filled.push((column.to_string(), filled));
            }
            MissingValuePolicy::Mode => {
                let mode = table
                    .mode(column)
                    .ok_or_else(|| CleanError::NoModeAvailable(column.to_string()))?;
                let filled = table.fill_missing(column, &mode);
                debug!(column, mode = %mode, filled, "Filled missing values with mode");
                report.filled.push((column.to_string(), filled));
                if column == "rating" {
                    report.rating_fill = Some(mode);
                }
            }
            MissingValuePolicy::DropRow => {
                let dropped = table.drop_missing(column);
                debug!(column, dropped, "Dropped rows with missing values");
                report.dropped_rows += dropped;
            }
        }
    }

    report.rows_after = table.len();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    fn header() -> Vec<String> {
        [
            "title",
            "type",
            "director",
            "cast",
            "country",
            "date_added",
            "rating",
            "duration",
            "listed_in",
        ]
        .iter()
        .map(|h| h.to_string())
        .collect()
    }

    fn row(title: &str, rating: Option<&str>, date_added: Option<&str>) -> Vec<Option<String>> {
        vec![
            cell(title),
            cell("Movie"),
            None,
            cell("Someone"),
            None,
            date_added.map(str::to_string),
            rating.map(str::to_string),
            cell("90 min"),
            cell("Dramas"),
        ]
    }

    /// Five raw rows: ratings {PG, PG, R, null, null}, one row missing date_added
    fn scenario() -> Table {
        Table::new(
            header(),
            vec![
                row("A", Some("PG"), Some("2020-01-01")),
                row("B", Some("PG"), Some("2020-02-01")),
                row("C", Some("R"), Some("2020-03-01")),
                row("D", None, Some("2020-04-01")),
                row("E", None, None),
            ],
        )
    }

    #[test]
    fn test_rating_filled_with_mode_and_missing_date_dropped() {
        let mut table = scenario();
        let report = clean_table(&mut table).unwrap();

        assert_eq!(report.rating_fill.as_deref(), Some("PG"));
        assert_eq!(report.rows_before, 5);
        assert_eq!(report.rows_after, 4);
        assert_eq!(report.dropped_rows, 1);

        let rating_index = table.column_index("rating").unwrap();
        let title_index = table.column_index("title").unwrap();
        let d = table
            .records
            .iter()
            .find(|record| record[title_index].as_deref() == Some("D"))
            .unwrap();
        assert_eq!(d[rating_index].as_deref(), Some("PG"));
    }

    #[test]
    fn test_no_missing_values_in_policed_columns() {
        let mut table = scenario();
        clean_table(&mut table).unwrap();

        for column in ["director", "cast", "country", "rating", "date_added"] {
            assert!(
                table.column(column).all(|value| value.is_some()),
                "column {} still has missing values",
                column
            );
        }
        assert!(table.column("director").all(|value| value == Some("Unknown")));
    }

    #[test]
    fn test_fill_counts_reported_in_policy_order() {
        let mut table = scenario();
        let report = clean_table(&mut table).unwrap();

        assert_eq!(
            report.filled,
            vec![
                ("director".to_string(), 5),
                ("cast".to_string(), 0),
                ("country".to_string(), 5),
                ("rating".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_rating_drawn_from_observed_values() {
        let mut table = scenario();
        clean_table(&mut table).unwrap();
        assert!(table
            .column("rating")
            .all(|value| matches!(value, Some("PG") | Some("R"))));
    }

    #[test]
    fn test_preserves_existing_values_and_column_order() {
        let mut table = scenario();
        let headers = table.headers.clone();
        clean_table(&mut table).unwrap();

        assert_eq!(table.headers, headers);
        assert_eq!(table.records[2][0].as_deref(), Some("C"));
        assert_eq!(table.records[2][6].as_deref(), Some("R"));
        assert_eq!(table.records[2][3].as_deref(), Some("Someone"));
    }

    #[test]
    fn test_missing_required_column() {
        let mut table = Table::new(vec!["type".into(), "rating".into()], vec![]);
        let result = clean_table(&mut table);
        assert_eq!(result, Err(CleanError::MissingColumn("director".into())));
    }

    #[test]
    fn test_all_ratings_missing() {
        let mut table = Table::new(header(), vec![row("A", None, Some("2020"))]);
        let result = clean_table(&mut table);
        assert_eq!(result, Err(CleanError::NoModeAvailable("rating".into())));
    }
}
