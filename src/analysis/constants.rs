//! Fixed cutoffs and literals used by the catalog reports

/// Substitute for missing director, cast and country values
pub const UNKNOWN_VALUE: &str = "Unknown";

/// Separator between genre labels in the `listed_in` column
pub const GENRE_DELIMITER: &str = ", ";

/// Genres shown in the genre frequency chart
pub const TOP_GENRES: usize = 20;

/// Genres included in the co-occurrence heatmap
pub const COOCCURRENCE_GENRES: usize = 15;

/// Countries included in the country × type heatmap
pub const COUNTRY_TYPE_COUNTRIES: usize = 15;

/// Countries included in the rating × country heatmap
pub const RATING_COUNTRY_COUNTRIES: usize = 10;

/// Countries listed in the printed summary
pub const SUMMARY_COUNTRIES: usize = 10;

/// Bins of the movie duration histogram
pub const DURATION_BINS: usize = 30;

/// Sample points of the smoothed density curve
pub const DENSITY_POINTS: usize = 200;
