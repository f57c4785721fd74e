//! The fixed set of catalog reports
//!
//! [`ReportData`] holds every derived table, computed once from the cleaned rows.
//! Each [`ReportKind`] turns its part of the data into a [`Chart`], and a [`Reporter`]
//! renders the chart into the output directory.

use crate::analysis::categorical::{
    country_by_rating, country_by_type, rating_by_type, rating_distribution, type_distribution,
};
use crate::analysis::constants::{
    COOCCURRENCE_GENRES, COUNTRY_TYPE_COUNTRIES, DENSITY_POINTS, DURATION_BINS,
    RATING_COUNTRY_COUNTRIES, TOP_GENRES,
};
use crate::analysis::duration::{
    density_curve, histogram_bins, movie_durations, season_counts, HistogramBin,
};
use crate::analysis::genres::{genre_cooccurrence, genre_frequency};
use crate::common::plots::{Chart, ChartKind, ChartRenderer};
use crate::common::{CatalogRow, CountMatrix, PlotError};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File the derived tables are exported to inside the output directory
pub const REPORT_DATA_FILE_NAME: &str = "report-data.json";

/// Errors that can occur while publishing reports
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write report output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to render chart: {0}")]
    Plot(#[from] PlotError),

    #[error("Failed to serialize report data: {0}")]
    Json(#[from] serde_json::Error),
}

type Result<T> = core::result::Result<T, ReportError>;

/// One chart produced by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    TopGenres,
    GenreCooccurrence,
    ContentTypes,
    CountryByType,
    MovieDurations,
    SeriesSeasons,
    RatingDistribution,
    RatingByCountry,
    RatingByType,
}

impl ReportKind {
    /// Every report, in publishing order
    pub const ALL: [ReportKind; 9] = [
        ReportKind::TopGenres,
        ReportKind::GenreCooccurrence,
        ReportKind::ContentTypes,
        ReportKind::CountryByType,
        ReportKind::MovieDurations,
        ReportKind::SeriesSeasons,
        ReportKind::RatingDistribution,
        ReportKind::RatingByCountry,
        ReportKind::RatingByType,
    ];

    pub fn title(self) -> String {
        match self {
            ReportKind::TopGenres => format!("Top {} Most Common Genres", TOP_GENRES),
            ReportKind::GenreCooccurrence => format!(
                "Genre Co-occurrence (Top {} Genres)",
                COOCCURRENCE_GENRES
            ),
            ReportKind::ContentTypes => "Distribution of Content Types".to_string(),
            ReportKind::CountryByType => format!(
                "Content Type by Country (Top {} Countries)",
                COUNTRY_TYPE_COUNTRIES
            ),
            ReportKind::MovieDurations => "Distribution of Movie Durations".to_string(),
            ReportKind::SeriesSeasons => "Distribution of TV Show Seasons".to_string(),
            ReportKind::RatingDistribution => "Distribution of Ratings".to_string(),
            ReportKind::RatingByCountry => format!(
                "Ratings by Country (Top {} Countries)",
                RATING_COUNTRY_COUNTRIES
            ),
            ReportKind::RatingByType => "Ratings by Content Type".to_string(),
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            ReportKind::TopGenres => "top_genres.png",
            ReportKind::GenreCooccurrence => "genre_cooccurrence_heatmap.png",
            ReportKind::ContentTypes => "content_type_distribution.png",
            ReportKind::CountryByType => "country_distribution_heatmap.png",
            ReportKind::MovieDurations => "movie_duration_distribution.png",
            ReportKind::SeriesSeasons => "tvshow_seasons_distribution.png",
            ReportKind::RatingDistribution => "ratings_distribution.png",
            ReportKind::RatingByCountry => "rating_by_country_heatmap.png",
            ReportKind::RatingByType => "rating_by_type_stacked.png",
        }
    }

    /// Builds the chart for this report, or `None` when its derivation is empty
    pub fn chart(self, data: &ReportData) -> Option<Chart> {
        let (x_label, y_label, kind) = match self {
            ReportKind::TopGenres => {
                // Ascending, so the most common genre ends up on top
                let bars = data.genre_frequency.iter().rev().map(to_bar).collect();
                ("Count", "Genre", ChartKind::HorizontalBars { bars })
            }
            ReportKind::GenreCooccurrence => (
                "Genre",
                "Genre",
                ChartKind::Heatmap {
                    matrix: data.genre_cooccurrence.clone(),
                },
            ),
            ReportKind::ContentTypes => (
                "Type",
                "Count",
                ChartKind::Bars {
                    bars: data.type_distribution.iter().map(to_bar).collect(),
                    rotate_labels: false,
                },
            ),
            ReportKind::CountryByType => (
                "Type",
                "Country",
                ChartKind::Heatmap {
                    matrix: data.country_by_type.clone(),
                },
            ),
            ReportKind::MovieDurations => (
                "Duration (minutes)",
                "Frequency",
                ChartKind::Histogram {
                    bins: data.duration_histogram.clone(),
                    density: data.duration_density.clone(),
                },
            ),
            ReportKind::SeriesSeasons => (
                "Number of Seasons",
                "Count",
                ChartKind::Bars {
                    bars: data
                        .season_counts
                        .iter()
                        .map(|(seasons, count)| (seasons.to_string(), *count as u64))
                        .collect(),
                    rotate_labels: false,
                },
            ),
            ReportKind::RatingDistribution => (
                "Rating",
                "Count",
                ChartKind::Bars {
                    bars: data.rating_distribution.iter().map(to_bar).collect(),
                    rotate_labels: true,
                },
            ),
            ReportKind::RatingByCountry => (
                "Rating",
                "Country",
                ChartKind::Heatmap {
                    matrix: data.country_by_rating.clone(),
                },
            ),
            ReportKind::RatingByType => (
                "Rating",
                "Count",
                stacked(&data.rating_by_type),
            ),
        };

        let chart = Chart {
            title: self.title(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            kind,
        };
        chart.validate().is_ok().then_some(chart)
    }
}

fn to_bar((label, count): &(String, usize)) -> (String, u64) {
    (label.clone(), *count as u64)
}

/// One stack per matrix row, one segment per matrix column
fn stacked(matrix: &CountMatrix) -> ChartKind {
    let series = matrix
        .column_labels
        .iter()
        .enumerate()
        .map(|(column, label)| {
            let values = matrix.counts.iter().map(|row| row[column]).collect();
            (label.clone(), values)
        })
        .collect();

    ChartKind::StackedBars {
        categories: matrix.row_labels.clone(),
        series,
    }
}

/// Every table derived from the cleaned catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportData {
    pub genre_frequency: Vec<(String, usize)>,
    pub genre_cooccurrence: CountMatrix,
    pub type_distribution: Vec<(String, usize)>,
    pub country_by_type: CountMatrix,
    pub movie_durations: Vec<u32>,
    pub duration_histogram: Vec<HistogramBin>,
    pub duration_density: Vec<(f64, f64)>,
    pub season_counts: Vec<(u32, usize)>,
    pub rating_distribution: Vec<(String, usize)>,
    pub country_by_rating: CountMatrix,
    pub rating_by_type: CountMatrix,
}

impl ReportData {
    pub fn derive(rows: &[CatalogRow]) -> Self {
        let movie_durations = movie_durations(rows);
        let duration_histogram = histogram_bins(&movie_durations, DURATION_BINS);
        let bin_width = duration_histogram
            .first()
            .map(|bin| bin.end - bin.start)
            .unwrap_or(1.0);
        let duration_density = density_curve(&movie_durations, bin_width, DENSITY_POINTS);

        Self {
            genre_frequency: genre_frequency(rows, TOP_GENRES),
            genre_cooccurrence: genre_cooccurrence(rows, COOCCURRENCE_GENRES),
            type_distribution: type_distribution(rows),
            country_by_type: country_by_type(rows, COUNTRY_TYPE_COUNTRIES),
            movie_durations,
            duration_histogram,
            duration_density,
            season_counts: season_counts(rows),
            rating_distribution: rating_distribution(rows),
            country_by_rating: country_by_rating(rows, RATING_COUNTRY_COUNTRIES),
            rating_by_type: rating_by_type(rows),
        }
    }
}

/// Renders reports into a single output directory
pub struct Reporter<R: ChartRenderer> {
    output_dir: PathBuf,
    renderer: R,
}

impl<R: ChartRenderer> Reporter<R> {
    /// Creates the reporter, creating `output_dir` if it does not exist
    pub fn new(output_dir: impl Into<PathBuf>, renderer: R) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        Ok(Self {
            output_dir,
            renderer,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Renders one report
    ///
    /// # Returns
    /// * `Ok(Some(path))` - The image that was written
    /// * `Ok(None)` - The derivation was empty and nothing was rendered
    pub fn publish(&mut self, kind: ReportKind, data: &ReportData) -> Result<Option<PathBuf>> {
        let Some(chart) = kind.chart(data) else {
            tracing::warn!(report = ?kind, "Derivation is empty, skipping chart");
            return Ok(None);
        };

        let output_path = self.output_dir.join(kind.file_name());
        self.renderer.render(&chart, &output_path)?;
        tracing::debug!(path = %output_path.display(), "Rendered chart");
        Ok(Some(output_path))
    }

    /// Writes every derived table as JSON to [`REPORT_DATA_FILE_NAME`]
    pub fn export_data(&self, data: &ReportData) -> Result<PathBuf> {
        let output_file = self.output_dir.join(REPORT_DATA_FILE_NAME);
        let json = serde_json::to_string_pretty(data)?;
        fs::write(&output_file, json)?;
        Ok(output_file)
    }
}
