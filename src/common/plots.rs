//! Plotting infrastructure for catalog charts
//!
//! Reports describe what to draw with a [`Chart`]; a [`ChartRenderer`] turns it into
//! an image. [`BitmapRenderer`] draws PNG files with the [`plotters`] crate at a fixed
//! resolution, so the derivations can be tested without any rendering backend.

use crate::analysis::duration::HistogramBin;
use crate::common::CountMatrix;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during plot generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to save plot to file: {0}")]
    FileSave(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

type Result<T> = core::result::Result<T, PlotError>;

/// The shape of a chart and the data it shows
#[derive(Debug, Clone, PartialEq)]
pub enum ChartKind {
    /// One horizontal bar per label, drawn bottom to top in the given order
    HorizontalBars { bars: Vec<(String, u64)> },
    /// One vertical bar per label
    Bars {
        bars: Vec<(String, u64)>,
        rotate_labels: bool,
    },
    /// Annotated grid of counts
    Heatmap { matrix: CountMatrix },
    /// Histogram with an optional smoothed curve in the same units
    Histogram {
        bins: Vec<HistogramBin>,
        density: Vec<(f64, f64)>,
    },
    /// One stack per category; `series[k].1[i]` is segment `k` of category `i`
    StackedBars {
        categories: Vec<String>,
        series: Vec<(String, Vec<u64>)>,
    },
}

/// A chart ready to be rendered
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub kind: ChartKind,
}

impl Chart {
    /// Rejects charts that have nothing to draw
    pub fn validate(&self) -> Result<()> {
        let empty = match &self.kind {
            ChartKind::HorizontalBars { bars } | ChartKind::Bars { bars, .. } => bars.is_empty(),
            ChartKind::Heatmap { matrix } => matrix.is_empty(),
            ChartKind::Histogram { bins, .. } => bins.is_empty(),
            ChartKind::StackedBars { categories, series } => {
                if series.iter().any(|(_, values)| values.len() != categories.len()) {
                    return Err(PlotError::InvalidData(
                        "Every stacked series needs one value per category".to_string(),
                    ));
                }
                categories.is_empty() || series.is_empty()
            }
        };

        if empty {
            return Err(PlotError::InvalidData(format!(
                "Chart '{}' has no data",
                self.title
            )));
        }
        Ok(())
    }
}

/// Something that can turn a [`Chart`] into an image at `output_path`
pub trait ChartRenderer {
    fn render(&mut self, chart: &Chart, output_path: &Path) -> Result<()>;
}

/// Renders charts as PNG files using plotters' bitmap backend
#[derive(Debug, Clone, Copy)]
pub struct BitmapRenderer {
    pub width: u32,
    pub height: u32,
}

impl Default for BitmapRenderer {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
        }
    }
}

impl ChartRenderer for BitmapRenderer {
    fn render(&mut self, chart: &Chart, output_path: &Path) -> Result<()> {
        chart.validate()?;

        let root = BitMapBackend::new(output_path, (self.width, self.height));
        let area = root.into_drawing_area();
        area.fill(&WHITE)
            .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

        match &chart.kind {
            ChartKind::HorizontalBars { bars } => draw_horizontal_bars(&area, chart, bars)?,
            ChartKind::Bars {
                bars,
                rotate_labels,
            } => draw_bars(&area, chart, bars, *rotate_labels)?,
            ChartKind::Heatmap { matrix } => draw_heatmap(&area, chart, matrix)?,
            ChartKind::Histogram { bins, density } => draw_histogram(&area, chart, bins, density)?,
            ChartKind::StackedBars { categories, series } => {
                draw_stacked_bars(&area, chart, categories, series)?
            }
        }

        // Ensure everything is properly rendered and saved
        area.present()
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
        Ok(())
    }
}

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

const BAR_COLOR: RGBColor = RGBColor(139, 0, 0);
const SERIES_COLORS: [RGBColor; 4] = [
    RGBColor(229, 9, 20),
    RGBColor(34, 31, 31),
    RGBColor(70, 130, 180),
    RGBColor(255, 165, 0),
];

/// Label of the category at a segment centre, empty elsewhere
fn segment_label(labels: &[String], value: &SegmentValue<u32>) -> String {
    match value {
        SegmentValue::CenterOf(index) => labels.get(*index as usize).cloned().unwrap_or_default(),
        _ => String::new(),
    }
}

/// Upper bound of a count axis with some headroom
fn count_axis_max(max: u64) -> u64 {
    (max + max / 10).max(1) + 1
}

fn draw_horizontal_bars(area: &Area, chart: &Chart, bars: &[(String, u64)]) -> Result<()> {
    let labels: Vec<String> = bars.iter().map(|(label, _)| label.clone()).collect();
    let max = bars.iter().map(|(_, count)| *count).max().unwrap_or(0);

    let mut context = ChartBuilder::on(area)
        .caption(&chart.title, ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(220)
        .build_cartesian_2d(0u64..count_axis_max(max), (0u32..labels.len() as u32).into_segmented())
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    context
        .configure_mesh()
        .disable_y_mesh()
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .y_labels(labels.len())
        .y_label_formatter(&|value| segment_label(&labels, value))
        .label_style(("sans-serif", 18))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    context
        .draw_series(bars.iter().enumerate().map(|(index, (_, count))| {
            let index = index as u32;
            Rectangle::new(
                [
                    (0, SegmentValue::Exact(index)),
                    (*count, SegmentValue::Exact(index + 1)),
                ],
                BAR_COLOR.filled(),
            )
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

fn draw_bars(area: &Area, chart: &Chart, bars: &[(String, u64)], rotate_labels: bool) -> Result<()> {
    let labels: Vec<String> = bars.iter().map(|(label, _)| label.clone()).collect();
    let max = bars.iter().map(|(_, count)| *count).max().unwrap_or(0);

    let mut context = ChartBuilder::on(area)
        .caption(&chart.title, ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(if rotate_labels { 120 } else { 60 })
        .y_label_area_size(85)
        .build_cartesian_2d((0u32..labels.len() as u32).into_segmented(), 0u64..count_axis_max(max))
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    let label_font = if rotate_labels {
        ("sans-serif", 18).into_font().transform(FontTransform::Rotate90)
    } else {
        ("sans-serif", 18).into_font()
    };

    context
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .x_labels(labels.len())
        .x_label_formatter(&|value| segment_label(&labels, value))
        .x_label_style(label_font)
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    context
        .draw_series(bars.iter().enumerate().map(|(index, (_, count))| {
            let index = index as u32;
            let color = SERIES_COLORS[index as usize % SERIES_COLORS.len()];
            Rectangle::new(
                [
                    (SegmentValue::Exact(index), 0),
                    (SegmentValue::Exact(index + 1), *count),
                ],
                color.mix(0.8).filled(),
            )
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

/// Blends from white towards `base` by `intensity` in `[0, 1]`
fn shade(base: RGBColor, intensity: f64) -> RGBColor {
    let blend = |channel: u8| (255.0 - (255.0 - channel as f64) * intensity).round() as u8;
    RGBColor(blend(base.0), blend(base.1), blend(base.2))
}

fn draw_heatmap(area: &Area, chart: &Chart, matrix: &CountMatrix) -> Result<()> {
    let rows = matrix.row_labels.len() as u32;
    let columns = matrix.column_labels.len() as u32;
    let max = matrix.max().max(1) as f64;

    // First row is drawn at the top
    let row_labels: Vec<String> = matrix.row_labels.iter().rev().cloned().collect();

    let mut context = ChartBuilder::on(area)
        .caption(&chart.title, ("sans-serif", 36))
        .margin(20)
        .x_label_area_size(160)
        .y_label_area_size(220)
        .build_cartesian_2d((0u32..columns).into_segmented(), (0u32..rows).into_segmented())
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    context
        .configure_mesh()
        .disable_mesh()
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .x_labels(columns as usize)
        .y_labels(rows as usize)
        .x_label_formatter(&|value| segment_label(&matrix.column_labels, value))
        .y_label_formatter(&|value| segment_label(&row_labels, value))
        .x_label_style(("sans-serif", 16).into_font().transform(FontTransform::Rotate90))
        .y_label_style(("sans-serif", 16))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    let cells: Vec<(u32, u32, u64)> = matrix
        .counts
        .iter()
        .enumerate()
        .flat_map(|(row, values)| {
            values
                .iter()
                .enumerate()
                .map(move |(column, count)| (column as u32, rows - 1 - row as u32, *count))
        })
        .collect();

    context
        .draw_series(cells.iter().map(|&(x, y, count)| {
            Rectangle::new(
                [
                    (SegmentValue::Exact(x), SegmentValue::Exact(y)),
                    (SegmentValue::Exact(x + 1), SegmentValue::Exact(y + 1)),
                ],
                shade(BAR_COLOR, count as f64 / max).filled(),
            )
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    let annotation = TextStyle::from(("sans-serif", 16).into_font())
        .pos(Pos::new(HPos::Center, VPos::Center));
    context
        .draw_series(cells.iter().map(|&(x, y, count)| {
            let color = if count as f64 / max > 0.5 { &WHITE } else { &BLACK };
            Text::new(
                count.to_string(),
                (SegmentValue::CenterOf(x), SegmentValue::CenterOf(y)),
                annotation.clone().color(color),
            )
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

fn draw_histogram(
    area: &Area,
    chart: &Chart,
    bins: &[HistogramBin],
    density: &[(f64, f64)],
) -> Result<()> {
    let x_min = bins.first().map(|bin| bin.start).unwrap_or(0.0);
    let x_max = bins.last().map(|bin| bin.end).unwrap_or(1.0);
    let y_max = bins
        .iter()
        .map(|bin| bin.count as f64)
        .chain(density.iter().map(|(_, y)| *y))
        .fold(1.0, f64::max)
        * 1.1;

    let mut context = ChartBuilder::on(area)
        .caption(&chart.title, ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    context
        .configure_mesh()
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .x_label_formatter(&|x| format!("{:.0}", x.round()))
        .y_label_formatter(&|y| format!("{:.0}", y.round()))
        .label_style(("sans-serif", 20))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    let fill = RGBColor(135, 206, 235);
    context
        .draw_series(bins.iter().map(|bin| {
            Rectangle::new([(bin.start, 0.0), (bin.end, bin.count as f64)], fill.filled())
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    if !density.is_empty() {
        context
            .draw_series(LineSeries::new(
                density.iter().copied(),
                RGBColor(0, 0, 139).stroke_width(2),
            ))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    Ok(())
}

fn draw_stacked_bars(
    area: &Area,
    chart: &Chart,
    categories: &[String],
    series: &[(String, Vec<u64>)],
) -> Result<()> {
    let totals: Vec<u64> = (0..categories.len())
        .map(|index| series.iter().map(|(_, values)| values[index]).sum())
        .collect();
    let max = totals.iter().copied().max().unwrap_or(0);

    let mut context = ChartBuilder::on(area)
        .caption(&chart.title, ("sans-serif", 40))
        .margin(20)
        .x_label_area_size(120)
        .y_label_area_size(85)
        .build_cartesian_2d(
            (0u32..categories.len() as u32).into_segmented(),
            0u64..count_axis_max(max),
        )
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    context
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .x_labels(categories.len())
        .x_label_formatter(&|value| segment_label(categories, value))
        .x_label_style(("sans-serif", 18).into_font().transform(FontTransform::Rotate90))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    let mut baseline = vec![0u64; categories.len()];
    for (series_index, (name, values)) in series.iter().enumerate() {
        let color = SERIES_COLORS[series_index % SERIES_COLORS.len()];
        let segments: Vec<Rectangle<(SegmentValue<u32>, u64)>> = values
            .iter()
            .enumerate()
            .map(|(index, value)| {
                let bottom = baseline[index];
                let top = bottom + value;
                let column = index as u32;
                Rectangle::new(
                    [
                        (SegmentValue::Exact(column), bottom),
                        (SegmentValue::Exact(column + 1), top),
                    ],
                    color.filled(),
                )
            })
            .collect();

        for (index, value) in values.iter().enumerate() {
            baseline[index] += value;
        }

        context
            .draw_series(segments)
            .map_err(|e| PlotError::Drawing(e.to_string()))?
            .label(name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    context
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}
