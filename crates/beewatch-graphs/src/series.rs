//! Series preparation: turns a window's records into plottable lines

use beewatch_common::SensorRecord;
use beewatch_config::ColorsConfig;

use crate::types::{LineStyle, Metric, SeriesPoint, TimeSeries};

type Field = fn(&SensorRecord) -> f64;

/// Records with a timestamp, sorted chronologically. The sort is stable so
/// rows sharing a timestamp keep file order.
fn chronological<'a>(records: &[&'a SensorRecord]) -> Vec<&'a SensorRecord> {
    let mut sorted: Vec<&SensorRecord> = records
        .iter()
        .copied()
        .filter(|record| record.timestamp.is_some())
        .collect();
    sorted.sort_by_key(|record| record.timestamp);
    sorted
}

fn build(
    name: &str,
    color: &str,
    style: LineStyle,
    records: &[&SensorRecord],
    field: Field,
) -> TimeSeries {
    let mut series = TimeSeries::new(name, color, style);
    series.points = records
        .iter()
        .filter_map(|record| {
            record.timestamp.map(|timestamp| SeriesPoint {
                timestamp,
                value: field(record),
            })
        })
        .collect();
    series
}

/// The six traffic lines: entries solid, exits dashed, one color per bee class
pub fn traffic_series(records: &[&SensorRecord], colors: &ColorsConfig) -> Vec<TimeSeries> {
    let records = chronological(records);
    let lines: [(&str, &str, LineStyle, Field); 6] = [
        ("Worker in", &colors.worker, LineStyle::Solid, |r| f64::from(r.in_worker)),
        ("Worker out", &colors.worker, LineStyle::Dashed, |r| f64::from(r.out_worker)),
        ("Pollen in", &colors.pollen_carrier, LineStyle::Solid, |r| f64::from(r.in_pollen)),
        ("Pollen out", &colors.pollen_carrier, LineStyle::Dashed, |r| f64::from(r.out_pollen)),
        ("Drone in", &colors.drone, LineStyle::Solid, |r| f64::from(r.in_drone)),
        ("Drone out", &colors.drone, LineStyle::Dashed, |r| f64::from(r.out_drone)),
    ];

    lines
        .into_iter()
        .map(|(name, color, style, field)| build(name, color, style, &records, field))
        .collect()
}

/// The single pollen-ratio line
pub fn pollen_series(records: &[&SensorRecord], colors: &ColorsConfig) -> Vec<TimeSeries> {
    let records = chronological(records);
    vec![build(
        "Pollen ratio",
        &colors.pollen_ratio,
        LineStyle::Solid,
        &records,
        SensorRecord::pollen_ratio,
    )]
}

/// Series for a metric
pub fn series_for(
    metric: Metric,
    records: &[&SensorRecord],
    colors: &ColorsConfig,
) -> Vec<TimeSeries> {
    match metric {
        Metric::InOut => traffic_series(records, colors),
        Metric::Pollen => pollen_series(records, colors),
    }
}
