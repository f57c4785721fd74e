//! Frequency counting and ASCII table formatting for categorical columns
//!
//! This module provides shared functionality for frequency-based summaries:
//! - [`value_counts`] for counting occurrences in first-seen order
//! - [`FrequencyEntry`] rows with each value's share of the total
//! - ASCII table formatting using the [`tabled`] crate

use hashbrown::HashMap;
use tabled::{Table, Tabled};

/// Counts occurrences of each distinct value.
///
/// The result is sorted by count, descending. Values with equal counts keep the
/// order in which they were first seen in the input.
pub fn value_counts<'a, I>(values: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut positions: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<(&'a str, usize)> = Vec::new();

    for value in values {
        match positions.get(value) {
            Some(&position) => counts[position].1 += 1,
            None => {
                positions.insert(value, counts.len());
                counts.push((value, 1));
            }
        }
    }

    // Stable sort keeps first-seen order among ties
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect()
}

/// Keeps the `n` most frequent entries of an already sorted count list
pub fn top_n(counts: &[(String, usize)], n: usize) -> Vec<(String, usize)> {
    counts.iter().take(n).cloned().collect()
}

/// One row of a frequency table
#[derive(Debug, Clone, Tabled)]
pub struct FrequencyEntry {
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Titles")]
    pub count: usize,
    #[tabled(rename = "Share")]
    pub share: String,
}

/// `count` as a percentage of `total`, two decimals; zero when `total` is zero
fn share_of(count: usize, total: usize) -> String {
    let share = match total {
        0 => 0.0,
        total => count as f64 * 100.0 / total as f64,
    };
    format!("{:.2}%", share)
}

/// Table rows for sorted value counts, with shares relative to `total` rows
pub fn frequency_entries(counts: &[(String, usize)], total: usize) -> Vec<FrequencyEntry> {
    counts
        .iter()
        .map(|(value, count)| FrequencyEntry {
            value: value.clone(),
            count: *count,
            share: share_of(*count, total),
        })
        .collect()
}

/// Places `body` under `title`, underlined with `=`
pub fn titled_section(title: &str, body: &str) -> String {
    format!("{}\n{}\n{}", title, "=".repeat(title.chars().count()), body)
}

/// Renders frequency rows as an ASCII table, under `title` when given
pub fn format_frequency_table(entries: &[FrequencyEntry], title: Option<&str>) -> String {
    let body = if entries.is_empty() {
        "No data available".to_string()
    } else {
        Table::new(entries).to_string()
    };

    match title {
        Some(title) => titled_section(title, &body),
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_value_counts_sorted_with_stable_ties() {
        let counts = value_counts(["R", "PG", "TV-MA", "PG", "R", "G"]);
        assert_eq!(
            counts,
            vec![
                ("R".to_string(), 2),
                ("PG".to_string(), 2),
                ("TV-MA".to_string(), 1),
                ("G".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_value_counts_empty() {
        assert!(value_counts(std::iter::empty()).is_empty());
    }

    #[test]
    fn test_top_n() {
        let counts = value_counts(["a", "b", "a", "c"]);
        assert_eq!(top_n(&counts, 1), vec![("a".to_string(), 2)]);
        assert_eq!(top_n(&counts, 10).len(), 3);
    }

    #[rstest]
    #[case(25, 100, "25.00%")]
    #[case(1, 3, "33.33%")]
    #[case(7, 7, "100.00%")]
    #[case(10, 0, "0.00%")]
    fn test_share_of(#[case] count: usize, #[case] total: usize, #[case] expected: &str) {
        assert_eq!(share_of(count, total), expected);
    }

    #[test]
    fn test_frequency_entries_keep_count_order() {
        let counts = value_counts(["TV-MA", "PG", "TV-MA", "TV-MA"]);
        let entries = frequency_entries(&counts, 4);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].value, "TV-MA");
        assert_eq!(entries[0].count, 3);
        assert_eq!(entries[0].share, "75.00%");
        assert_eq!(entries[1].share, "25.00%");
    }

    #[test]
    fn test_format_frequency_table() {
        let counts = vec![("Movie".to_string(), 6), ("TV Show".to_string(), 2)];
        let entries = frequency_entries(&counts, 8);

        let table = format_frequency_table(&entries, Some("Content Types"));
        let mut lines = table.lines();
        assert_eq!(lines.next(), Some("Content Types"));
        assert_eq!(lines.next(), Some("============="));
        assert!(table.contains("Titles"));
        assert!(table.contains("TV Show"));
        assert!(table.contains("75.00%"));

        assert!(!format_frequency_table(&entries, None).contains("Content Types"));
    }

    #[test]
    fn test_format_empty_frequency_table_keeps_title() {
        let empty = format_frequency_table(&[], Some("Ratings"));
        assert_eq!(empty, "Ratings\n=======\nNo data available");
    }
}
