//! Distributions and cross-tabulations over categorical columns
//!
//! Rows with a missing key are left out of the distribution that needs that key.

use crate::common::frequency::{top_n, value_counts};
use crate::common::{CatalogRow, CountMatrix};
use std::collections::BTreeSet;

/// Count of rows per `type` value, most frequent first
pub fn type_distribution(rows: &[CatalogRow]) -> Vec<(String, usize)> {
    value_counts(rows.iter().filter_map(|row| row.kind.as_deref()))
}

/// Count of rows per `rating` value, most frequent first
pub fn rating_distribution(rows: &[CatalogRow]) -> Vec<(String, usize)> {
    value_counts(rows.iter().filter_map(|row| row.rating.as_deref()))
}

/// The `top` most frequent countries with their row counts
pub fn top_countries(rows: &[CatalogRow], top: usize) -> Vec<(String, usize)> {
    let counts = value_counts(rows.iter().filter_map(|row| row.country.as_deref()));
    top_n(&counts, top)
}

/// Cross-tabulates `(row, column)` pairs into a [`CountMatrix`]
///
/// Both label sets are sorted ascending; combinations never seen are zero.
pub fn crosstab<'a, I>(pairs: I) -> CountMatrix
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let pairs: Vec<(&str, &str)> = pairs.into_iter().collect();
    let row_labels: BTreeSet<&str> = pairs.iter().map(|(row, _)| *row).collect();
    let column_labels: BTreeSet<&str> = pairs.iter().map(|(_, column)| *column).collect();

    let row_labels: Vec<&str> = row_labels.into_iter().collect();
    let column_labels: Vec<&str> = column_labels.into_iter().collect();

    let mut matrix = CountMatrix::zeroed(
        row_labels.iter().map(|label| label.to_string()).collect(),
        column_labels.iter().map(|label| label.to_string()).collect(),
    );

    for (row, column) in pairs {
        // Labels come from the same pairs, so both lookups succeed
        if let (Ok(r), Ok(c)) = (
            row_labels.binary_search(&row),
            column_labels.binary_search(&column),
        ) {
            matrix.counts[r][c] += 1;
        }
    }

    matrix
}

/// Country × type counts over the `top` most frequent countries
pub fn country_by_type(rows: &[CatalogRow], top: usize) -> CountMatrix {
    let countries = country_set(rows, top);
    crosstab(rows.iter().filter_map(|row| {
        let country = row.country.as_deref()?;
        let kind = row.kind.as_deref()?;
        countries.contains(country).then_some((country, kind))
    }))
}

/// Country × rating counts over the `top` most frequent countries
pub fn country_by_rating(rows: &[CatalogRow], top: usize) -> CountMatrix {
    let countries = country_set(rows, top);
    crosstab(rows.iter().filter_map(|row| {
        let country = row.country.as_deref()?;
        let rating = row.rating.as_deref()?;
        countries.contains(country).then_some((country, rating))
    }))
}

/// Rating × type counts over all rows
pub fn rating_by_type(rows: &[CatalogRow]) -> CountMatrix {
    crosstab(
        rows.iter()
            .filter_map(|row| Some((row.rating.as_deref()?, row.kind.as_deref()?))),
    )
}

fn country_set(rows: &[CatalogRow], top: usize) -> BTreeSet<String> {
    top_countries(rows, top)
        .into_iter()
        .map(|(country, _)| country)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title(kind: &str, country: &str, rating: &str) -> CatalogRow {
        CatalogRow {
            kind: Some(kind.to_string()),
            country: Some(country.to_string()),
            rating: Some(rating.to_string()),
            ..Default::default()
        }
    }

    fn rows() -> Vec<CatalogRow> {
        vec![
            title("Movie", "United States", "PG"),
            title("Movie", "United States", "R"),
            title("TV Show", "United States", "TV-MA"),
            title("Movie", "India", "TV-14"),
            title("TV Show", "India", "TV-14"),
            title("Movie", "Japan", "TV-MA"),
            title("TV Show", "Japan", "TV-MA"),
            title("TV Show", "Japan", "TV-14"),
            title("Movie", "Brazil", "R"),
        ]
    }

    #[test]
    fn test_type_distribution() {
        assert_eq!(
            type_distribution(&rows()),
            vec![("Movie".to_string(), 5), ("TV Show".to_string(), 4)]
        );
    }

    #[test]
    fn test_rating_distribution_skips_missing() {
        let mut rows = rows();
        rows.push(CatalogRow::default());
        let distribution = rating_distribution(&rows);
        let total: usize = distribution.iter().map(|(_, count)| count).sum();
        assert_eq!(total, 9);
        assert_eq!(distribution[0], ("TV-MA".to_string(), 3));
    }

    #[test]
    fn test_crosstab_sorted_labels_and_zero_fill() {
        let matrix = crosstab([("b", "y"), ("a", "x"), ("b", "x"), ("b", "y")]);
        assert_eq!(matrix.row_labels, vec!["a", "b"]);
        assert_eq!(matrix.column_labels, vec!["x", "y"]);
        assert_eq!(matrix.counts, vec![vec![1, 0], vec![1, 2]]);
    }

    #[test]
    fn test_country_by_type_row_sums_match_country_counts() {
        let rows = rows();
        let matrix = country_by_type(&rows, 3);

        assert_eq!(matrix.row_labels, vec!["India", "Japan", "United States"]);
        let expected: Vec<u64> = matrix
            .row_labels
            .iter()
            .map(|country| {
                rows.iter()
                    .filter(|row| row.country.as_deref() == Some(country.as_str()))
                    .count() as u64
            })
            .collect();
        assert_eq!(matrix.row_sums(), expected);
        assert_eq!(matrix.get("India", "TV Show"), 1);
    }

    #[test]
    fn test_country_by_rating_restricted() {
        let matrix = country_by_rating(&rows(), 1);
        assert_eq!(matrix.row_labels, vec!["United States"]);
        assert_eq!(matrix.column_labels, vec!["PG", "R", "TV-MA"]);
        assert_eq!(matrix.get("United States", "TV-14"), 0);
    }

    #[test]
    fn test_rating_by_type() {
        let matrix = rating_by_type(&rows());
        assert_eq!(matrix.row_labels, vec!["PG", "R", "TV-14", "TV-MA"]);
        assert_eq!(matrix.column_labels, vec!["Movie", "TV Show"]);
        assert_eq!(matrix.get("TV-MA", "TV Show"), 2);
        assert_eq!(matrix.get("PG", "TV Show"), 0);
        assert_eq!(matrix.row_sums().iter().sum::<u64>(), 9);
    }
}
