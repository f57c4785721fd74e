//! Printed summary of the cleaned catalog
//!
//! Produces the missing-value report and the type, country and rating frequency
//! tables, and saves the same text to `catalog-summary.txt`.

use super::constants::SUMMARY_COUNTRIES;
use crate::common::frequency::{
    format_frequency_table, frequency_entries, titled_section, top_n, value_counts,
    FrequencyEntry,
};
use crate::common::Table;
use std::fs;
use std::path::{Path, PathBuf};
use tabled::{Table as AsciiTable, Tabled};

/// File the summary text is written to inside the output directory
pub const SUMMARY_FILE_NAME: &str = "catalog-summary.txt";

#[derive(Debug, Clone, Tabled)]
struct MissingEntry {
    #[tabled(rename = "Column")]
    column: String,
    #[tabled(rename = "Missing")]
    missing: usize,
}

/// Frequency breakdowns of a cleaned catalog table
#[derive(Debug, Clone)]
pub struct CatalogSummary {
    pub total_rows: usize,
    /// Remaining missing cells per column, in header order
    pub missing: Vec<(String, usize)>,
    pub types: Vec<(String, usize)>,
    pub top_countries: Vec<(String, usize)>,
    pub ratings: Vec<(String, usize)>,
}

impl CatalogSummary {
    /// Computes the summary from a cleaned table
    pub fn from_table(table: &Table) -> Self {
        let counts = |column: &str| value_counts(table.column(column).flatten());
        Self {
            total_rows: table.len(),
            missing: table.missing_counts(),
            types: counts("type"),
            top_countries: top_n(&counts("country"), SUMMARY_COUNTRIES),
            ratings: counts("rating"),
        }
    }

    fn entries(&self, counts: &[(String, usize)]) -> Vec<FrequencyEntry> {
        frequency_entries(counts, self.total_rows)
    }

    /// Renders every section as ASCII tables
    pub fn render(&self) -> String {
        let missing: Vec<MissingEntry> = self
            .missing
            .iter()
            .map(|(column, missing)| MissingEntry {
                column: column.clone(),
                missing: *missing,
            })
            .collect();
        let missing_table = titled_section(
            "Missing Values After Cleaning",
            &AsciiTable::new(&missing).to_string(),
        );

        format!(
            "{}\n\n{}\n\n{}\n\n{}\n\n{}",
            missing_table,
            format_frequency_table(
                &self.entries(&self.types),
                Some("Content Type Distribution (Movies vs. TV Shows)")
            ),
            format_frequency_table(
                &self.entries(&self.top_countries),
                Some(&format!("Top {} Countries", SUMMARY_COUNTRIES))
            ),
            format_frequency_table(&self.entries(&self.ratings), Some("Ratings Summary")),
            titled_section("Summary", &format!("Total titles: {}", self.total_rows))
        )
    }

    /// Writes [`CatalogSummary::render`] to [`SUMMARY_FILE_NAME`] under `output_dir`
    pub fn save(&self, output_dir: &Path) -> std::io::Result<PathBuf> {
        fs::create_dir_all(output_dir)?;
        let output_file = output_dir.join(SUMMARY_FILE_NAME);
        fs::write(&output_file, self.render())?;
        Ok(output_file)
    }
}
