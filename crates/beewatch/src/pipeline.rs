//! One run: select the newest export, split it into day windows, render.

use beewatch_common::{
    find_latest_input, load_sensor_csv, month_from_file_name, BeeError, InputPattern, SensorExport,
    YearMonth,
};
use beewatch_config::Config;
use beewatch_graphs::{
    partition_month, GraphGenerator, GraphRenderer, RenderSummary, SkippedRecord,
    TimeSeriesRenderer,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{ReportError, ReportResult};

/// Where the reference month came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthSource {
    /// `--month` flag
    Flag,
    /// `YYYY-MM` prefix of the input file name
    FileName,
    /// First record with a parseable timestamp
    FirstRecord,
}

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub input: PathBuf,
    pub month: YearMonth,
    pub month_source: MonthSource,
    pub rows_read: usize,
    /// Rows dropped at load time (unparseable counts)
    pub rows_dropped: usize,
    /// Records left out of every window
    pub skipped: Vec<SkippedRecord>,
    pub summary: RenderSummary,
}

impl RunReport {
    /// Everything that did not make it into a chart
    pub fn skipped_total(&self) -> usize {
        self.rows_dropped + self.skipped.len()
    }
}

/// Pick the reference month: flag, then file name prefix, then first record
pub fn resolve_month(
    explicit: Option<YearMonth>,
    input: &Path,
    export: &SensorExport,
) -> Option<(YearMonth, MonthSource)> {
    if let Some(month) = explicit {
        return Some((month, MonthSource::Flag));
    }
    if let Some(month) = month_from_file_name(input) {
        return Some((month, MonthSource::FileName));
    }
    export
        .first_timestamp()
        .map(|ts| (YearMonth::from_date(ts.date()), MonthSource::FirstRecord))
}

/// Run with the plotters renderer
pub fn run(config: &Config, month: Option<YearMonth>) -> ReportResult<RunReport> {
    run_with_renderer(config, month, TimeSeriesRenderer::new(config.graph.clone()))
}

/// Run with any renderer
pub fn run_with_renderer<R: GraphRenderer>(
    config: &Config,
    month: Option<YearMonth>,
    renderer: R,
) -> ReportResult<RunReport> {
    let pattern = InputPattern::new(&config.input.device_id, &config.input.record_type);
    let input = find_latest_input(&config.input.data_dir, &pattern).map_err(ReportError::Select)?;

    let export = load_sensor_csv(&input).map_err(ReportError::Load)?;
    for row in &export.row_errors {
        warn!("Dropped line {}: {}", row.line, row.message);
    }

    let (month, month_source) = resolve_month(month, &input, &export).ok_or_else(|| {
        ReportError::Load(BeeError::malformed(
            &input,
            "cannot determine the month: no YYYY-MM file name prefix and no dated rows",
        ))
    })?;
    info!("Reference month {} (from {:?})", month, month_source);

    let rows_read = export.rows_read;
    let rows_dropped = export.row_errors.len();
    let lines: Vec<usize> = export.records.iter().map(|r| r.line).collect();

    let partition = partition_month(export.records, month);
    partition.log_summary();

    for skipped in &partition.skipped {
        debug!("Skipped line {}: {}", lines[skipped.index], skipped.reason);
    }
    let skipped_total = rows_dropped + partition.skipped.len();
    if skipped_total > 0 {
        let (malformed, outside) = partition.skip_counts();
        warn!(
            "{} records skipped ({} unreadable rows, {} malformed timestamps, {} outside {})",
            skipped_total, rows_dropped, malformed, outside, month
        );
    }

    let generator = GraphGenerator::new(renderer, config.graph.clone(), &config.output.output_dir);
    let summary = generator
        .generate_all(&partition)
        .map_err(ReportError::Render)?;

    info!(
        "Done: {} charts in {} ({} placeholders)",
        summary.artifacts.len(),
        config.output.output_dir.display(),
        summary.placeholders()
    );

    Ok(RunReport {
        input,
        month,
        month_source,
        rows_read,
        rows_dropped,
        skipped: partition.skipped,
        summary,
    })
}
