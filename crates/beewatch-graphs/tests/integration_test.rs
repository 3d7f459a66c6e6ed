//! Integration tests: sensor export in, six artifacts out

use beewatch_common::test_utils::create_temp_dir;
use beewatch_common::test_utils::csv_fixtures::{monthly_export, write_export};
use beewatch_common::{load_sensor_csv, Result, YearMonth};
use beewatch_config::GraphConfig;
use beewatch_graphs::{
    partition_month, ArtifactKey, ChartSpec, DayWindow, GraphGenerator, GraphRenderer, Metric,
};
use std::path::Path;

/// Writes a text description of the chart instead of an image
struct TextRenderer;

impl GraphRenderer for TextRenderer {
    fn render_to_file(&self, chart: &ChartSpec, path: &Path) -> Result<()> {
        let body = format!("{}\n{} points\n", chart.title, chart.point_count());
        std::fs::write(path, body)?;
        Ok(())
    }
}

#[test]
fn test_february_export_renders_all_windows() {
    let data = create_temp_dir();
    let output = create_temp_dir();
    let path = write_export(data.path(), "2024-02_TX2_6_inout.csv", &monthly_export(2024, 2, 29));

    let export = load_sensor_csv(&path).unwrap();
    let month = YearMonth::new(2024, 2).unwrap();
    let result = partition_month(export.records, month);
    assert_eq!(result.lengths(), [30, 30, 27]);
    assert!(result.skipped.is_empty());

    let generator = GraphGenerator::new(TextRenderer, GraphConfig::default(), output.path());
    let summary = generator.generate_all(&result).unwrap();
    assert_eq!(summary.artifacts.len(), 6);

    let third = std::fs::read_to_string(output.path().join("inout_21-XX.png")).unwrap();
    assert!(third.starts_with("2024-02 days 21-29"));
    // six series of 27 points each
    assert!(third.contains("162 points"));
}

#[test]
fn test_rerun_overwrites_in_place() {
    let output = create_temp_dir();
    let generator = GraphGenerator::new(TextRenderer, GraphConfig::default(), output.path());

    let august = YearMonth::new(2025, 8).unwrap();
    let records = beewatch_common::test_utils::record_fixtures::one_per_day(2025, 8, 31);
    generator
        .generate_all(&partition_month(records, august))
        .unwrap();

    let september = YearMonth::new(2025, 9).unwrap();
    let records = beewatch_common::test_utils::record_fixtures::one_per_day(2025, 9, 12);
    let summary = generator
        .generate_all(&partition_month(records, september))
        .unwrap();

    let names: Vec<String> = std::fs::read_dir(output.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 6);

    // the third window of September is empty: its files must not keep August's charts
    let third_key = ArtifactKey::new(Metric::Pollen, DayWindow::Third);
    let third = std::fs::read_to_string(third_key.path_in(output.path())).unwrap();
    assert!(third.starts_with("2025-09 days 21-30"));
    assert!(third.contains("\n0 points"));
    assert_eq!(summary.placeholders(), 2);
}
