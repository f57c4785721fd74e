//! Genre explosion, frequency and co-occurrence
//!
//! The `listed_in` field holds several genres per title. These functions split it into
//! individual labels and count them across the whole catalog.

use super::constants::GENRE_DELIMITER;
use crate::common::frequency::{top_n, value_counts};
use crate::common::{CatalogRow, CountMatrix};

/// Splits a genre field into its labels, trimming the field first
pub fn split_genres(field: &str) -> Vec<&str> {
    field
        .trim()
        .split(GENRE_DELIMITER)
        .filter(|genre| !genre.is_empty())
        .collect()
}

/// Every genre label of every row, flattened in row order
pub fn explode_genres(rows: &[CatalogRow]) -> Vec<&str> {
    rows.iter()
        .filter_map(|row| row.listed_in.as_deref())
        .flat_map(split_genres)
        .collect()
}

/// The `top` most frequent genres with their occurrence counts
pub fn genre_frequency(rows: &[CatalogRow], top: usize) -> Vec<(String, usize)> {
    let counts = value_counts(explode_genres(rows));
    top_n(&counts, top)
}

/// Genre × genre co-occurrence counts over the `top` most frequent genres
///
/// Entry `(i, j)` is the number of rows listing both genre `i` and genre `j`; the
/// diagonal holds the number of rows listing genre `i`. Labels follow frequency order.
pub fn genre_cooccurrence(rows: &[CatalogRow], top: usize) -> CountMatrix {
    let labels: Vec<String> = genre_frequency(rows, top)
        .into_iter()
        .map(|(genre, _)| genre)
        .collect();
    let mut matrix = CountMatrix::zeroed(labels.clone(), labels);

    for row in rows {
        let Some(field) = row.listed_in.as_deref() else {
            continue;
        };

        // Indicator vector of this row over the selected genres
        let genres = split_genres(field);
        let present: Vec<usize> = matrix
            .row_labels
            .iter()
            .enumerate()
            .filter(|(_, label)| genres.contains(&label.as_str()))
            .map(|(index, _)| index)
            .collect();

        for &i in &present {
            for &j in &present {
                matrix.counts[i][j] += 1;
            }
        }
    }

    matrix
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(genres: Option<&str>) -> CatalogRow {
        CatalogRow {
            listed_in: genres.map(str::to_string),
            ..Default::default()
        }
    }

    fn rows() -> Vec<CatalogRow> {
        vec![
            titled(Some("Dramas, International Movies")),
            titled(Some("Comedies, Dramas")),
            titled(Some(" Dramas ")),
            titled(Some("Documentaries")),
            titled(Some("Comedies, International Movies, Dramas")),
            titled(None),
        ]
    }

    #[test]
    fn test_split_genres() {
        assert_eq!(
            split_genres("  Comedies, Dramas, Romantic Movies "),
            vec!["Comedies", "Dramas", "Romantic Movies"]
        );
        assert_eq!(split_genres("Dramas"), vec!["Dramas"]);
        assert!(split_genres("").is_empty());
    }

    #[test]
    fn test_genre_frequency() {
        let frequency = genre_frequency(&rows(), 20);
        assert_eq!(
            frequency,
            vec![
                ("Dramas".to_string(), 4),
                ("International Movies".to_string(), 2),
                ("Comedies".to_string(), 2),
                ("Documentaries".to_string(), 1),
            ]
        );

        assert_eq!(genre_frequency(&rows(), 2).len(), 2);
    }

    #[test]
    fn test_cooccurrence_symmetric_with_diagonal_counts() {
        let rows = rows();
        let matrix = genre_cooccurrence(&rows, 15);
        let n = matrix.row_labels.len();

        for i in 0..n {
            for j in 0..n {
                assert_eq!(matrix.counts[i][j], matrix.counts[j][i]);
            }
        }

        for (i, genre) in matrix.row_labels.iter().enumerate() {
            let containing = rows
                .iter()
                .filter_map(|row| row.listed_in.as_deref())
                .filter(|field| split_genres(field).contains(&genre.as_str()))
                .count() as u64;
            assert_eq!(matrix.counts[i][i], containing);
        }

        assert_eq!(matrix.get("Dramas", "Comedies"), 2);
        assert_eq!(matrix.get("Dramas", "International Movies"), 2);
        assert_eq!(matrix.get("Documentaries", "Dramas"), 0);
    }

    #[test]
    fn test_cooccurrence_restricted_to_top_genres() {
        let matrix = genre_cooccurrence(&rows(), 2);
        assert_eq!(matrix.row_labels, vec!["Dramas", "International Movies"]);
        assert_eq!(matrix.counts, vec![vec![4, 2], vec![2, 2]]);
    }
}
