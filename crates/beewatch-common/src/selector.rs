//! Input file selection.
//!
//! Exports are named `<YYYY-MM>_<device-id>_<record-type>.csv`, so the
//! lexicographically last matching name is also the most recent month.
//! Selection never opens a file.

use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{BeeError, Result};
use crate::types::YearMonth;

/// File-name pattern identifying one device's export of one record type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPattern {
    device_id: String,
    record_type: String,
}

impl InputPattern {
    pub fn new(device_id: impl Into<String>, record_type: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            record_type: record_type.into(),
        }
    }

    /// Fixed tail every matching file name ends with
    pub fn suffix(&self) -> String {
        format!("_{}_{}.csv", self.device_id, self.record_type)
    }

    /// Human-readable glob, used in diagnostics
    pub fn glob(&self) -> String {
        format!("*{}", self.suffix())
    }

    pub fn matches(&self, file_name: &str) -> bool {
        file_name.ends_with(&self.suffix())
    }
}

/// Pick the lexicographically last candidate whose file name matches `pattern`
pub fn select_latest<'a>(candidates: &'a [PathBuf], pattern: &InputPattern) -> Option<&'a PathBuf> {
    candidates
        .iter()
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| pattern.matches(name))
        })
        .max_by(|a, b| a.file_name().cmp(&b.file_name()))
}

/// List regular files directly inside `dir`. A missing directory yields no candidates.
pub fn list_candidates(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!("Data directory {} does not exist", dir.display());
            return Ok(Vec::new());
        }
        Err(err) => return Err(err.into()),
    };

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    Ok(files)
}

/// Scan `dir` and return the newest export matching `pattern`
pub fn find_latest_input(dir: &Path, pattern: &InputPattern) -> Result<PathBuf> {
    let candidates = list_candidates(dir)?;
    debug!("Found {} candidate files in {}", candidates.len(), dir.display());

    let selected = select_latest(&candidates, pattern)
        .cloned()
        .ok_or_else(|| BeeError::no_input(dir, pattern.glob()))?;

    info!("Using input file: {}", selected.display());
    Ok(selected)
}

/// Month encoded in an export's `YYYY-MM` file-name prefix, if any
pub fn month_from_file_name(path: &Path) -> Option<YearMonth> {
    let name = path.file_name()?.to_str()?;
    let prefix = name.get(..7)?;
    prefix.parse().ok()
}
