//! Test utilities and shared fixtures for the beewatch workspace.
//!
//! Enabled for this crate's own tests and, through the `testing` feature,
//! for the other crates' test suites.

use chrono::{NaiveDate, NaiveDateTime};
use std::path::{Path, PathBuf};
use std::sync::Once;

use crate::sensor::SensorRecord;

static INIT: Once = Once::new();

/// Initialize logging for tests. Safe to call multiple times.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(filter)
            .try_init();
    });
}

/// Test fixture for a naive timestamp
pub fn mock_datetime(year: i32, month: u32, day: u32, hour: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, min, 0))
        .expect("valid fixture timestamp")
}

/// Create a temporary directory for tests that automatically cleans up.
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Sensor record fixtures
pub mod record_fixtures {
    use super::*;

    /// A record with simple, recognisable counts
    pub fn record_at(timestamp: NaiveDateTime, in_worker: u32, out_worker: u32) -> SensorRecord {
        SensorRecord {
            line: 0,
            raw_timestamp: crate::utils::format_timestamp(&timestamp),
            timestamp: Some(timestamp),
            in_worker,
            out_worker,
            in_pollen: in_worker / 4,
            out_pollen: 0,
            in_drone: 0,
            out_drone: 0,
            pollen_rate: None,
        }
    }

    /// A record whose timestamp cell could not be parsed
    pub fn malformed_record(raw: &str) -> SensorRecord {
        SensorRecord {
            line: 0,
            raw_timestamp: raw.to_string(),
            timestamp: None,
            in_worker: 1,
            out_worker: 1,
            in_pollen: 0,
            out_pollen: 0,
            in_drone: 0,
            out_drone: 0,
            pollen_rate: None,
        }
    }

    /// One noon record for each of days `1..=days` of the given month
    pub fn one_per_day(year: i32, month: u32, days: u32) -> Vec<SensorRecord> {
        (1..=days)
            .map(|day| record_at(mock_datetime(year, month, day, 12, 0), day * 10, day * 9))
            .collect()
    }
}

/// CSV export fixtures
pub mod csv_fixtures {
    use super::*;

    /// Header of a complete sensor export
    pub const FULL_HEADER: &str =
        "dt,in_worker,out_worker,in_pollen,out_pollen,in_drone,out_drone,pollen_rate";

    /// CSV text with hourly rows 08:00-10:00 for days `1..=days` of the given month
    pub fn monthly_export(year: i32, month: u32, days: u32) -> String {
        let mut csv = String::from(FULL_HEADER);
        csv.push('\n');
        for day in 1..=days {
            for hour in 8..=10 {
                let in_worker = day + hour;
                let in_pollen = in_worker / 3;
                let dt = format!("{year:04}-{month:02}-{day:02} {hour:02}:00");
                csv.push_str(&format!(
                    "{dt},{in_worker},{},{in_pollen},0,{},{},{:.3}\n",
                    in_worker + 1,
                    hour % 2,
                    hour % 3,
                    f64::from(in_pollen) / f64::from(in_worker),
                ));
            }
        }
        csv
    }

    /// Write `contents` to `dir/name` and return the path
    pub fn write_export(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).expect("Failed to write CSV fixture");
        path
    }
}
