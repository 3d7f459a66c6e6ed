//! End-to-end runs against temporary data and output directories.
//!
//! Charts are drawn by a stub renderer that writes a deterministic text
//! rendition of each chart, so these tests do not depend on system fonts.

use beewatch::{run_with_renderer, MonthSource, ReportError, RunReport};
use beewatch_common::test_utils::create_temp_dir;
use beewatch_common::test_utils::csv_fixtures::{monthly_export, write_export, FULL_HEADER};
use beewatch_common::{Result, YearMonth};
use beewatch_config::Config;
use beewatch_graphs::{ChartSpec, GraphRenderer};
use std::collections::BTreeMap;
use std::path::Path;
use tempfile::TempDir;

struct StubRenderer;

impl GraphRenderer for StubRenderer {
    fn render_to_file(&self, chart: &ChartSpec, path: &Path) -> Result<()> {
        let mut body = format!("{}\n{}x{}\n", chart.title, chart.width, chart.height);
        for series in &chart.series {
            body.push_str(&format!("{} {:?}:", series.name, series.style));
            for point in &series.points {
                body.push_str(&format!(" {}={}", point.timestamp, point.value));
            }
            body.push('\n');
        }
        std::fs::write(path, body)?;
        Ok(())
    }
}

struct Fixture {
    data: TempDir,
    _output: TempDir,
    config: Config,
}

impl Fixture {
    fn new() -> Self {
        let data = create_temp_dir();
        let output = create_temp_dir();
        let mut config = Config::default();
        config.input.data_dir = data.path().to_path_buf();
        config.output.output_dir = output.path().join("charts");
        Self {
            data,
            _output: output,
            config,
        }
    }

    fn write(&self, name: &str, contents: &str) {
        write_export(self.data.path(), name, contents);
    }

    fn run(&self, month: Option<YearMonth>) -> std::result::Result<RunReport, ReportError> {
        run_with_renderer(&self.config, month, StubRenderer)
    }

    fn artifacts(&self) -> BTreeMap<String, String> {
        let dir = &self.config.output.output_dir;
        match std::fs::read_dir(dir) {
            Ok(entries) => entries
                .map(|entry| {
                    let entry = entry.unwrap();
                    (
                        entry.file_name().to_string_lossy().into_owned(),
                        std::fs::read_to_string(entry.path()).unwrap(),
                    )
                })
                .collect(),
            Err(_) => BTreeMap::new(),
        }
    }
}

#[test]
fn test_run_writes_six_fixed_artifacts() {
    let fx = Fixture::new();
    fx.write("2025-09_TX2_6_inout.csv", &monthly_export(2025, 9, 30));

    let report = fx.run(None).unwrap();
    assert_eq!(report.month, YearMonth::new(2025, 9).unwrap());
    assert_eq!(report.month_source, MonthSource::FileName);
    assert_eq!(report.rows_read, 90);
    assert_eq!(report.skipped_total(), 0);

    let names: Vec<String> = fx.artifacts().into_keys().collect();
    assert_eq!(
        names,
        [
            "inout_01-10.png",
            "inout_11-20.png",
            "inout_21-XX.png",
            "pollen_01-10.png",
            "pollen_11-20.png",
            "pollen_21-XX.png",
        ]
    );
}

#[test]
fn test_rerun_is_idempotent() {
    let fx = Fixture::new();
    fx.write("2025-09_TX2_6_inout.csv", &monthly_export(2025, 9, 30));

    fx.run(None).unwrap();
    let first = fx.artifacts();
    fx.run(None).unwrap();
    let second = fx.artifacts();

    assert_eq!(first.len(), 6);
    assert_eq!(first, second);
}

#[test]
fn test_newer_month_replaces_older_charts() {
    let fx = Fixture::new();
    fx.write("2025-08_TX2_6_inout.csv", &monthly_export(2025, 8, 31));
    fx.run(None).unwrap();

    // September export only covers the first half of the month so far
    fx.write("2025-09_TX2_6_inout.csv", &monthly_export(2025, 9, 14));
    let report = fx.run(None).unwrap();
    assert_eq!(report.month, YearMonth::new(2025, 9).unwrap());
    assert_eq!(report.summary.placeholders(), 2);

    let artifacts = fx.artifacts();
    assert_eq!(artifacts.len(), 6);
    for body in artifacts.values() {
        assert!(body.starts_with("2025-09 days"), "stale chart: {body}");
    }
    assert!(!artifacts["inout_21-XX.png"].contains("2025-08"));
}

#[test]
fn test_other_devices_are_ignored() {
    let fx = Fixture::new();
    fx.write("2025-09_TX2_6_inout.csv", &monthly_export(2025, 9, 30));
    fx.write("2025-10_TX9_9_inout.csv", &monthly_export(2025, 10, 31));
    fx.write("2025-11_TX2_6_hourly.csv", &monthly_export(2025, 11, 30));

    let report = fx.run(None).unwrap();
    assert!(report.input.ends_with("2025-09_TX2_6_inout.csv"));
}

#[test]
fn test_no_input_fails_without_writing() {
    let fx = Fixture::new();
    fx.write("notes.txt", "nothing to see");

    let err = fx.run(None).unwrap_err();
    assert!(matches!(err, ReportError::Select(_)));
    assert_eq!(err.exit_code(), 2);
    assert_eq!(err.stage(), "input selection");
    assert!(fx.artifacts().is_empty());
    assert!(!fx.config.output.output_dir.exists());
}

#[test]
fn test_missing_required_column_is_fatal() {
    let fx = Fixture::new();
    fx.write("2025-09_TX2_6_inout.csv", "dt,out_worker\n2025-09-01 08:00,3\n");

    let err = fx.run(None).unwrap_err();
    assert!(matches!(err, ReportError::Load(_)));
    assert_eq!(err.exit_code(), 3);
    assert!(fx.artifacts().is_empty());
}

#[test]
fn test_bad_rows_are_skipped_and_counted() {
    let fx = Fixture::new();
    let csv = format!(
        "{FULL_HEADER}\n\
         2025-09-01 08:00,10,9,2,0,0,0,0.2\n\
         not a time,10,9,2,0,0,0,0.2\n\
         2025-08-31 23:00,10,9,2,0,0,0,0.2\n\
         2025-09-12 08:00,many,9,2,0,0,0,0.2\n\
         2025-09-25 08:00,10,9,2,0,0,0,0.2\n"
    );
    fx.write("2025-09_TX2_6_inout.csv", &csv);

    let report = fx.run(None).unwrap();
    assert_eq!(report.rows_dropped, 1);
    assert_eq!(report.skipped.len(), 2);
    assert_eq!(report.skipped_total(), 3);

    let artifacts = fx.artifacts();
    assert_eq!(artifacts.len(), 6);
    // the middle window only had the row with a bad count
    assert!(artifacts["inout_11-20.png"].contains("Worker in Solid:\n"));
}

#[test]
fn test_month_flag_overrides_file_name() {
    let fx = Fixture::new();
    fx.write("2025-09_TX2_6_inout.csv", &monthly_export(2025, 9, 30));

    let report = fx.run(YearMonth::new(2025, 10)).unwrap();
    assert_eq!(report.month_source, MonthSource::Flag);
    assert_eq!(report.skipped.len(), 90);
    assert_eq!(report.summary.placeholders(), 6);
}

#[test]
fn test_month_from_first_record_without_prefix() {
    let fx = Fixture::new();
    fx.write("latest_TX2_6_inout.csv", &monthly_export(2024, 2, 29));

    let report = fx.run(None).unwrap();
    assert_eq!(report.month_source, MonthSource::FirstRecord);
    assert_eq!(report.month, YearMonth::new(2024, 2).unwrap());
    assert!(fx.artifacts()["pollen_21-XX.png"].starts_with("2024-02 days 21-29"));
}

#[test]
fn test_unreadable_export_keeps_previous_charts() {
    let fx = Fixture::new();
    fx.write("2025-08_TX2_6_inout.csv", &monthly_export(2025, 8, 31));
    fx.run(None).unwrap();
    let before = fx.artifacts();

    fx.write(
        "2025-09_TX2_6_inout.csv",
        &format!("{FULL_HEADER}\nxx,yy,zz,ww,0,0,0,0\nxx,yy,zz,ww,0,0,0,0\n"),
    );
    let err = fx.run(None).unwrap_err();
    assert!(matches!(err, ReportError::Load(_)));
    assert_eq!(err.exit_code(), 3);

    assert_eq!(fx.artifacts(), before);
    assert!(before["inout_01-10.png"].starts_with("2025-08 days"));
}
