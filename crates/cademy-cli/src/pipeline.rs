//! Command pipeline with explicit stages.
//!
//! 1. **Ingest**: read the raw CSV and check required columns
//! 2. **Cleanse**: run the five cleansing stages
//! 3. **Output**: write the CSV tables and the JSON report

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::{Column, CsvWriter, DataFrame, SerWriter};
use tracing::{info, info_span, trace};

use cademy_ingest::{read_student_table, validate_required_columns};
use cademy_model::schema::{ERROR_MESSAGE, ERROR_STAGE};
use cademy_model::{CleanseOptions, CleanseReport};
use cademy_transform::{CleanseOutput, cleanse_students};

use crate::logging::redact_value;

pub const CLEANSED_FILE: &str = "students_cleansed.csv";
pub const REJECTED_FILE: &str = "students_rejected.csv";
pub const ERRORS_FILE: &str = "students_errors.csv";

// ============================================================================
// Stage 1: Ingest
// ============================================================================

/// Reads the raw student table and checks the required columns.
pub fn ingest(input: &Path) -> Result<DataFrame> {
    let span = info_span!("ingest", path = %input.display());
    let _guard = span.enter();
    let start = Instant::now();

    let df = read_student_table(input)
        .with_context(|| format!("read {}", input.display()))?;
    validate_required_columns(&df).with_context(|| format!("check {}", input.display()))?;

    info!(
        rows = df.height(),
        columns = df.width(),
        duration_ms = start.elapsed().as_millis(),
        "ingest complete"
    );
    Ok(df)
}

// ============================================================================
// Stage 2: Cleanse
// ============================================================================

/// Runs the cleansing pipeline and logs quarantined rows at trace level.
pub fn cleanse(df: DataFrame, options: &CleanseOptions) -> Result<CleanseOutput> {
    let output = cleanse_students(df, options).context("cleanse student records")?;
    trace_quarantined(&output.errors);
    Ok(output)
}

fn trace_quarantined(errors: &DataFrame) {
    if errors.height() == 0 || !tracing::enabled!(tracing::Level::TRACE) {
        return;
    }
    let (Ok(stages), Ok(messages)) = (errors.column(ERROR_STAGE), errors.column(ERROR_MESSAGE))
    else {
        return;
    };
    for idx in 0..errors.height() {
        let stage = cell_text(stages, idx);
        let message = cell_text(messages, idx);
        trace!(
            row = idx,
            stage = %stage,
            message = redact_value(&message),
            "quarantined record"
        );
    }
}

fn cell_text(column: &Column, idx: usize) -> String {
    column
        .get(idx)
        .ok()
        .and_then(|value| value.get_str().map(str::to_string))
        .unwrap_or_default()
}

// ============================================================================
// Stage 3: Output
// ============================================================================

/// Where and what to write.
#[derive(Debug, Clone)]
pub struct OutputConfig<'a> {
    pub output_dir: &'a Path,
    pub report_path: Option<&'a Path>,
    pub dry_run: bool,
}

/// Files written by [`output`]; all `None` on a dry run.
#[derive(Debug, Clone, Default)]
pub struct OutputPaths {
    pub cleansed: Option<PathBuf>,
    pub rejected: Option<PathBuf>,
    /// Only written when at least one record was quarantined.
    pub errors: Option<PathBuf>,
    pub report: Option<PathBuf>,
}

/// Writes the output tables and the optional JSON report.
pub fn output(result: &mut CleanseOutput, config: &OutputConfig<'_>) -> Result<OutputPaths> {
    let span = info_span!("output", dir = %config.output_dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    if config.dry_run {
        info!("dry run, no files written");
        return Ok(OutputPaths::default());
    }

    fs::create_dir_all(config.output_dir)
        .with_context(|| format!("create {}", config.output_dir.display()))?;

    let mut paths = OutputPaths {
        cleansed: Some(write_csv(
            &mut result.cleansed,
            &config.output_dir.join(CLEANSED_FILE),
        )?),
        rejected: Some(write_csv(
            &mut result.rejected,
            &config.output_dir.join(REJECTED_FILE),
        )?),
        ..OutputPaths::default()
    };
    if result.errors.height() > 0 {
        paths.errors = Some(write_csv(
            &mut result.errors,
            &config.output_dir.join(ERRORS_FILE),
        )?);
    }
    if let Some(report_path) = config.report_path {
        write_report_json(&result.report, report_path)?;
        paths.report = Some(report_path.to_path_buf());
    }

    info!(
        cleansed = result.cleansed.height(),
        rejected = result.rejected.height(),
        quarantined = result.errors.height(),
        duration_ms = start.elapsed().as_millis(),
        "output complete"
    );
    Ok(paths)
}

/// Writes a frame as CSV with a header row.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<PathBuf> {
    let mut file =
        File::create(path).with_context(|| format!("create {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(path.to_path_buf())
}

/// Writes the run report as pretty-printed JSON.
pub fn write_report_json(report: &CleanseReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(report).context("serialize report")?;
    fs::write(path, format!("{json}\n")).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
