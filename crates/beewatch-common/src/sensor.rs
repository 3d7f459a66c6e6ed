//! Hive-entrance sensor export ingest.
//!
//! Turns a monthly `*_inout.csv` export into [`SensorRecord`]s. Schema
//! problems (unreadable header, missing required columns, no usable
//! timestamps at all) are fatal; problems confined to one row are collected
//! as [`RowError`]s and the row is dropped. A row whose timestamp cannot be
//! parsed is kept with `timestamp: None` so the partition step can account
//! for it.

use chrono::NaiveDateTime;
use csv::StringRecord;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{BeeError, Result};
use crate::utils::parse_timestamp;

/// Timestamp column
pub const COL_TIMESTAMP: &str = "dt";
/// Worker entries
pub const COL_IN_WORKER: &str = "in_worker";
/// Worker exits
pub const COL_OUT_WORKER: &str = "out_worker";
/// Pollen-carrying entries
pub const COL_IN_POLLEN: &str = "in_pollen";
/// Pollen-carrying exits
pub const COL_OUT_POLLEN: &str = "out_pollen";
/// Drone entries
pub const COL_IN_DRONE: &str = "in_drone";
/// Drone exits
pub const COL_OUT_DRONE: &str = "out_drone";
/// Precomputed pollen ratio
pub const COL_POLLEN_RATE: &str = "pollen_rate";

/// Columns without which the export cannot be charted
pub const REQUIRED_COLUMNS: &[&str] =
    &[COL_TIMESTAMP, COL_IN_WORKER, COL_OUT_WORKER, COL_IN_POLLEN];

/// Older firmware wrote the pollen columns without an underscore
const COLUMN_ALIASES: &[(&str, &str)] =
    &[("inpollen", COL_IN_POLLEN), ("outpollen", COL_OUT_POLLEN)];

/// One row of a sensor export
#[derive(Debug, Clone, PartialEq)]
pub struct SensorRecord {
    /// 1-based line number in the source file
    pub line: usize,
    /// Timestamp cell as written in the file
    pub raw_timestamp: String,
    /// Parsed timestamp, `None` when the cell matched no known layout
    pub timestamp: Option<NaiveDateTime>,
    pub in_worker: u32,
    pub out_worker: u32,
    pub in_pollen: u32,
    pub out_pollen: u32,
    pub in_drone: u32,
    pub out_drone: u32,
    /// Ratio precomputed by the sensor, when the export carries it
    pub pollen_rate: Option<f64>,
}

impl SensorRecord {
    /// Share of worker entries carrying pollen.
    ///
    /// Prefers the exported `pollen_rate`; otherwise `in_pollen / in_worker`,
    /// which is zero when nothing entered.
    pub fn pollen_ratio(&self) -> f64 {
        if let Some(rate) = self.pollen_rate {
            return rate;
        }
        if self.in_worker == 0 {
            0.0
        } else {
            f64::from(self.in_pollen) / f64::from(self.in_worker)
        }
    }
}

/// A row dropped during ingest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: records in file order plus what was dropped
#[derive(Debug, Clone)]
pub struct SensorExport {
    pub path: PathBuf,
    pub records: Vec<SensorRecord>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

impl SensorExport {
    /// First parseable timestamp in file order
    pub fn first_timestamp(&self) -> Option<NaiveDateTime> {
        self.records.iter().find_map(|record| record.timestamp)
    }
}

/// Open and parse a sensor export
pub fn load_sensor_csv(path: &Path) -> Result<SensorExport> {
    let file = File::open(path)
        .map_err(|e| BeeError::malformed_with_source(path, "failed to open CSV", e))?;
    let export = read_sensor_csv(file, path)?;

    info!(
        "Loaded {} rows from {} ({} dropped)",
        export.rows_read,
        path.display(),
        export.row_errors.len()
    );
    Ok(export)
}

/// Parse a sensor export from any reader; `path` is only used in diagnostics
pub fn read_sensor_csv<R: Read>(reader: R, path: &Path) -> Result<SensorExport> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| BeeError::malformed_with_source(path, "failed to read CSV header", e))?
        .clone();
    let columns = ColumnMap::from_headers(&headers);

    let missing = columns.missing(REQUIRED_COLUMNS);
    if !missing.is_empty() {
        return Err(BeeError::malformed(
            path,
            format!(
                "missing columns {missing:?}; expected at least {REQUIRED_COLUMNS:?}"
            ),
        ));
    }

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // header occupies line 1
        let line = idx + 2;
        rows_read += 1;

        let row = match result {
            Ok(row) => row,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match columns.parse_row(&row, line) {
            Ok(record) => records.push(record),
            Err(message) => {
                debug!("Dropping line {line}: {message}");
                row_errors.push(RowError { line, message });
            }
        }
    }

    // dropped rows count as unusable too
    let unparsed = records.iter().filter(|r| r.timestamp.is_none()).count();
    if rows_read > 0 && unparsed == records.len() {
        return Err(BeeError::malformed(
            path,
            format!("none of the {rows_read} rows has a valid '{COL_TIMESTAMP}' and counts"),
        ));
    }
    if unparsed > 0 {
        warn!("{unparsed} rows have an unparseable '{COL_TIMESTAMP}' value");
    }

    Ok(SensorExport {
        path: path.to_path_buf(),
        records,
        row_errors,
        rows_read,
    })
}

/// Canonical column name -> field index
struct ColumnMap {
    index: HashMap<String, usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Self {
        let mut index = HashMap::new();
        for (i, header) in headers.iter().enumerate() {
            let name = header.trim().to_ascii_lowercase();
            let canonical = COLUMN_ALIASES
                .iter()
                .find(|(alias, _)| *alias == name)
                .map_or(name.clone(), |(_, canonical)| (*canonical).to_string());
            index.entry(canonical).or_insert(i);
        }
        Self { index }
    }

    fn missing(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|col| !self.index.contains_key(**col))
            .map(|col| (*col).to_string())
            .collect()
    }

    fn cell<'r>(&self, row: &'r StringRecord, column: &str) -> Option<&'r str> {
        self.index
            .get(column)
            .and_then(|&i| row.get(i))
            .filter(|cell| !cell.is_empty())
    }

    fn required_count(&self, row: &StringRecord, column: &str) -> std::result::Result<u32, String> {
        let cell = self
            .cell(row, column)
            .ok_or_else(|| format!("empty '{column}' value"))?;
        parse_count(cell).ok_or_else(|| format!("invalid '{column}' value '{cell}'"))
    }

    fn optional_count(&self, row: &StringRecord, column: &str) -> std::result::Result<u32, String> {
        match self.cell(row, column) {
            None => Ok(0),
            Some(cell) => {
                parse_count(cell).ok_or_else(|| format!("invalid '{column}' value '{cell}'"))
            }
        }
    }

    fn parse_row(
        &self,
        row: &StringRecord,
        line: usize,
    ) -> std::result::Result<SensorRecord, String> {
        let raw_timestamp = self
            .cell(row, COL_TIMESTAMP)
            .unwrap_or_default()
            .to_string();

        let pollen_rate = match self.cell(row, COL_POLLEN_RATE) {
            None => None,
            Some(cell) => Some(
                cell.parse::<f64>()
                    .ok()
                    .filter(|rate| rate.is_finite())
                    .ok_or_else(|| format!("invalid '{COL_POLLEN_RATE}' value '{cell}'"))?,
            ),
        };

        Ok(SensorRecord {
            line,
            timestamp: parse_timestamp(&raw_timestamp),
            raw_timestamp,
            in_worker: self.required_count(row, COL_IN_WORKER)?,
            out_worker: self.required_count(row, COL_OUT_WORKER)?,
            in_pollen: self.required_count(row, COL_IN_POLLEN)?,
            out_pollen: self.optional_count(row, COL_OUT_POLLEN)?,
            in_drone: self.optional_count(row, COL_IN_DRONE)?,
            out_drone: self.optional_count(row, COL_OUT_DRONE)?,
            pollen_rate,
        })
    }
}

/// Non-negative integer count. Exports written through a dataframe sometimes
/// carry `12.0`, which is accepted; fractional or negative values are not.
fn parse_count(cell: &str) -> Option<u32> {
    if let Ok(n) = cell.parse::<u32>() {
        return Some(n);
    }
    let value = cell.parse::<f64>().ok()?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX) {
        Some(value as u32)
    } else {
        None
    }
}
