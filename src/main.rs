mod analysis;
mod cleaning;
mod common;
mod config;
mod parsing;
mod reports;
mod unpack;

use analysis::CatalogSummary;
use argh::FromArgs;
use bytesize::ByteSize;
use cleaning::{clean_table, CleanError, CleaningReport};
use common::plots::{BitmapRenderer, ChartRenderer};
use common::{CatalogRow, Table};
use config::PipelineConfig;
use indicatif::{ProgressBar, ProgressStyle};
use parsing::{load_table, write_table, TableError};
use reports::{ReportData, ReportError, ReportKind, Reporter};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use unpack::{extract_archive, rename_to_canonical, UnpackError};

/// Cleans a zipped media catalog and renders its statistics charts
#[derive(FromArgs, Debug)]
pub struct Args {
    /// zip archive holding the raw catalog (default: data/raw/netflix_data.zip)
    #[argh(option, short = 'a')]
    archive: Option<PathBuf>,

    /// directory the archive is extracted into (default: .)
    #[argh(option, short = 'w')]
    working_dir: Option<PathBuf>,

    /// directory for charts and reports (default: outputs)
    #[argh(option, short = 'o')]
    output_dir: Option<PathBuf>,

    /// name of the catalog file inside the archive (default: netflix_data.csv)
    #[argh(option)]
    source_name: Option<String>,

    /// name the extracted catalog is renamed to (default: Netflix_shows_movies.csv)
    #[argh(option)]
    canonical_name: Option<String>,

    /// name of the cleaned catalog file (default: Netflix_shows_movies_clean.csv)
    #[argh(option)]
    cleaned_name: Option<String>,

    /// use an already extracted catalog instead of unpacking the archive
    #[argh(switch)]
    skip_unpack: bool,

    /// stop after printing the summary
    #[argh(switch)]
    no_charts: bool,
}

impl Args {
    fn to_config(&self) -> PipelineConfig {
        let defaults = PipelineConfig::default();
        PipelineConfig {
            archive_path: self.archive.clone().unwrap_or(defaults.archive_path),
            working_directory: self.working_dir.clone().unwrap_or(defaults.working_directory),
            output_directory: self.output_dir.clone().unwrap_or(defaults.output_directory),
            source_file_name: self.source_name.clone().unwrap_or(defaults.source_file_name),
            canonical_file_name: self
                .canonical_name
                .clone()
                .unwrap_or(defaults.canonical_file_name),
            cleaned_file_name: self.cleaned_name.clone().unwrap_or(defaults.cleaned_file_name),
        }
    }
}

/// Errors that terminate a pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("File not found at {0}")]
    FileNotFound(PathBuf),

    #[error("Unpack error: {0}")]
    Unpack(#[from] UnpackError),

    #[error("Table error: {0}")]
    Table(#[from] TableError),

    #[error("Cleaning error: {0}")]
    Clean(#[from] CleanError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

type Result<T> = core::result::Result<T, PipelineError>;

/// Stages to leave out of a run
#[derive(Debug, Clone, Copy, Default)]
struct RunOptions {
    skip_unpack: bool,
    no_charts: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Args = argh::from_env();
    let config = args.to_config();
    let options = RunOptions {
        skip_unpack: args.skip_unpack,
        no_charts: args.no_charts,
    };

    if let Err(e) = run(&config, options, BitmapRenderer::default()) {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run<R: ChartRenderer>(config: &PipelineConfig, options: RunOptions, renderer: R) -> Result<()> {
    println!("Starting catalog statistics pipeline...");

    if options.skip_unpack {
        println!(
            "\n⏭️  Stage 1: Skipping unpack, using {}",
            config.canonical_path().display()
        );
    } else {
        unpack(config)?;
    }

    println!("\n🧹 Stage 2: Cleaning {}", config.canonical_path().display());
    let mut table = load(&config.canonical_path())?;
    let cleaning = clean_table(&mut table)?;
    print_cleaning_report(&cleaning);
    if table.is_empty() {
        println!("   ⚠️  Warning: no rows left after cleaning");
    }

    let cleaned_path = config.cleaned_path();
    write_table(&table, &cleaned_path)?;
    println!(
        "   💾 Saved cleaned data to {} ({})",
        cleaned_path.display(),
        ByteSize(fs::metadata(&cleaned_path)?.len())
    );

    println!("\n📊 Stage 3: Summarizing");
    let summary = CatalogSummary::from_table(&table);
    println!("{}", summary.render());
    let summary_path = summary.save(&config.output_directory)?;
    println!("   💾 Saved summary to {}", summary_path.display());

    if options.no_charts {
        println!("\n⏭️  Stage 4: Skipping charts");
        return Ok(());
    }

    println!("\n🎨 Stage 4: Rendering charts");
    // Charts are drawn from the persisted file so they see exactly what was saved
    let rows = CatalogRow::from_table(&load(&cleaned_path)?).map_err(TableError::from)?;
    let data = ReportData::derive(&rows);
    let mut reporter = Reporter::new(&config.output_directory, renderer)?;
    let pb = chart_progress_bar();
    render_reports(&mut reporter, &data, &pb, &mut io::stdout())?;
    pb.finish_and_clear();

    let data_path = reporter.export_data(&data)?;
    println!("   💾 Saved report data to {}", data_path.display());

    println!("\n🎉 Pipeline complete!");
    println!("   📂 Results saved to: {}", reporter.output_dir().display());
    Ok(())
}

fn unpack(config: &PipelineConfig) -> Result<()> {
    println!("📦 Stage 1: Unpacking {}", config.archive_path.display());
    let extraction = extract_archive(&config.archive_path, &config.working_directory)?;
    println!(
        "   ✅ Extracted {} files ({}) from {} archive into {}",
        extraction.files_extracted,
        ByteSize(extraction.bytes_extracted),
        ByteSize(extraction.archive_size),
        config.working_directory.display()
    );

    match rename_to_canonical(
        &config.working_directory,
        &config.source_file_name,
        &config.canonical_file_name,
    )? {
        Some(path) => println!(
            "   ✅ Renamed {} to {}",
            config.source_file_name,
            path.display()
        ),
        None => println!(
            "   ⚠️  Warning: {} was not in the archive, expecting an existing {}",
            config.source_file_name, config.canonical_file_name
        ),
    }
    Ok(())
}

/// Loads a table, reporting a missing file as [`PipelineError::FileNotFound`]
fn load(path: &Path) -> Result<Table> {
    match load_table(path) {
        Err(TableError::NotFound(path)) => Err(PipelineError::FileNotFound(path)),
        other => Ok(other?),
    }
}

fn print_cleaning_report(report: &CleaningReport) {
    for (column, filled) in &report.filled {
        println!("   ✅ {}: filled {} missing values", column, filled);
    }
    if let Some(rating) = &report.rating_fill {
        println!("   📌 Missing ratings replaced with '{}'", rating);
    }
    println!(
        "   ✅ Dropped {} rows without date_added ({} → {} rows)",
        report.dropped_rows, report.rows_before, report.rows_after
    );
}

fn chart_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(ReportKind::ALL.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("   {bar:40.cyan/blue} {pos}/{len} charts {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    pb
}

/// Publishes every report, writing one notice line per report to `notices`
///
/// Notices are written while the bar is suspended, so they appear whether or not
/// the bar is drawn.
fn render_reports<R: ChartRenderer, W: Write>(
    reporter: &mut Reporter<R>,
    data: &ReportData,
    pb: &ProgressBar,
    notices: &mut W,
) -> Result<()> {
    for kind in ReportKind::ALL {
        pb.set_message(kind.title());
        let notice = match reporter.publish(kind, data)? {
            Some(path) => format!("   ✅ {} saved to {}", kind.title(), path.display()),
            None => format!("   ⚠️  {}: no data, chart skipped", kind.title()),
        };
        pb.suspend(|| writeln!(notices, "{}", notice))?;
        pb.inc(1);
    }
    Ok(())
}
