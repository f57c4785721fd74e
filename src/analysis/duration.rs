//! Duration extraction and distribution for movies and series
//!
//! The `duration` column mixes units ("90 min", "3 Seasons"). Only the leading
//! integer is used; values without digits are excluded rather than counted as zero.

use crate::common::{CatalogRow, ContentKind};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").expect("valid digit pattern"));

/// A single histogram bin covering `[start, end)`; the last bin also includes `end`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: u64,
}

/// Parses the first run of decimal digits in `field`
///
/// Returns `None` when the field has no digits or the number does not fit.
pub fn leading_integer(field: &str) -> Option<u32> {
    DIGITS.find(field)?.as_str().parse().ok()
}

fn durations_of(rows: &[CatalogRow], kind: ContentKind) -> Vec<u32> {
    rows.iter()
        .filter(|row| row.content_kind() == Some(kind))
        .filter_map(|row| row.duration.as_deref())
        .filter_map(leading_integer)
        .collect()
}

/// Minute counts of every movie with a parseable duration
pub fn movie_durations(rows: &[CatalogRow]) -> Vec<u32> {
    durations_of(rows, ContentKind::Movie)
}

/// Number of series per season count, ordered by season count
pub fn season_counts(rows: &[CatalogRow]) -> Vec<(u32, usize)> {
    let mut seasons = durations_of(rows, ContentKind::Series);
    seasons.sort_unstable();

    let mut counts: Vec<(u32, usize)> = Vec::new();
    for season in seasons {
        match counts.last_mut() {
            Some((last, count)) if *last == season => *count += 1,
            _ => counts.push((season, 1)),
        }
    }
    counts
}

/// Splits `values` into `bins` equal-width bins spanning their range
///
/// When every value is equal the range is widened by 0.5 on both sides.
pub fn histogram_bins(values: &[u32], bins: usize) -> Vec<HistogramBin> {
    let (Some(&min), Some(&max)) = (values.iter().min(), values.iter().max()) else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }

    let (low, high) = if min == max {
        (min as f64 - 0.5, max as f64 + 0.5)
    } else {
        (min as f64, max as f64)
    };
    let width = (high - low) / bins as f64;

    let mut histogram: Vec<HistogramBin> = (0..bins)
        .map(|index| HistogramBin {
            start: low + width * index as f64,
            end: low + width * (index + 1) as f64,
            count: 0,
        })
        .collect();

    for &value in values {
        let index = (((value as f64 - low) / width).floor() as usize).min(bins - 1);
        histogram[index].count += 1;
    }

    histogram
}

/// Gaussian kernel density estimate of `values`, scaled to histogram counts
///
/// Uses Scott's rule for the bandwidth. The curve is sampled at `points` positions
/// across the data range and multiplied by `values.len() * bin_width`, so it overlays
/// a histogram with that bin width. Returns an empty curve when the spread is zero.
pub fn density_curve(values: &[u32], bin_width: f64, points: usize) -> Vec<(f64, f64)> {
    let n = values.len();
    if n < 2 || points < 2 {
        return Vec::new();
    }

    let data: Vec<f64> = values.iter().map(|&v| v as f64).collect();
    let mean = data.iter().sum::<f64>() / n as f64;
    let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let std_dev = variance.sqrt();
    if std_dev == 0.0 {
        return Vec::new();
    }

    let bandwidth = std_dev * (n as f64).powf(-0.2);
    let min = data.iter().copied().fold(f64::INFINITY, f64::min);
    let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let step = (max - min) / (points - 1) as f64;
    let norm = 1.0 / (n as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    let scale = n as f64 * bin_width;

    (0..points)
        .map(|index| {
            let x = min + step * index as f64;
            let density: f64 = data
                .iter()
                .map(|xi| (-0.5 * ((x - xi) / bandwidth).powi(2)).exp())
                .sum::<f64>()
                * norm;
            (x, density * scale)
        })
        .collect()
}
