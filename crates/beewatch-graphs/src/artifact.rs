//! Artifact naming and atomic replacement.
//!
//! An artifact's path depends only on its [`ArtifactKey`], never on the month
//! or the run, so every run overwrites the same six files.

use beewatch_common::{BeeError, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::types::Metric;
use crate::windows::DayWindow;

/// File extension of every artifact
pub const ARTIFACT_EXTENSION: &str = "png";

/// Mode of published artifacts; temporary files start out owner-only
#[cfg(unix)]
pub const ARTIFACT_MODE: u32 = 0o644;

/// Identity of one chart: what it plots and which day window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactKey {
    pub metric: Metric,
    pub window: DayWindow,
}

impl ArtifactKey {
    pub fn new(metric: Metric, window: DayWindow) -> Self {
        Self { metric, window }
    }

    /// All six keys, grouped by window in the order a run renders them
    pub fn all() -> [ArtifactKey; 6] {
        use DayWindow::{First, Second, Third};
        use Metric::{InOut, Pollen};

        [
            Self::new(InOut, First),
            Self::new(Pollen, First),
            Self::new(InOut, Second),
            Self::new(Pollen, Second),
            Self::new(InOut, Third),
            Self::new(Pollen, Third),
        ]
    }

    /// `<metric>_<window label>.png`
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}.{}",
            self.metric.file_stem(),
            self.window.label(),
            ARTIFACT_EXTENSION
        )
    }

    /// Final location of the artifact inside `output_dir`
    pub fn path_in(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(self.file_name())
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.metric, self.window)
    }
}

/// Replace `target` with the file produced by `render`.
///
/// `render` receives a temporary path in the target's directory with the
/// same extension. The temporary file is renamed over `target` only when
/// `render` succeeds, so a failed run never leaves a partial artifact at the
/// final path. The directory is created if missing.
pub fn replace_atomically<F>(target: &Path, render: F) -> Result<()>
where
    F: FnOnce(&Path) -> Result<()>,
{
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)
        .map_err(|e| BeeError::write_with_source(dir, "failed to create output directory", e))?;

    let suffix = target
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    let temp = tempfile::Builder::new()
        .prefix(".beewatch-")
        .suffix(&suffix)
        .tempfile_in(dir)
        .map_err(|e| BeeError::write_with_source(target, "failed to create temporary file", e))?;

    debug!("Rendering {} via {}", target.display(), temp.path().display());
    render(temp.path())?;
    publishable(&temp)
        .map_err(|e| BeeError::write_with_source(target, "failed to set artifact permissions", e))?;

    temp.persist(target).map_err(|e| {
        BeeError::write_with_source(target, "failed to move artifact into place", e.error)
    })?;
    Ok(())
}

#[cfg(unix)]
fn publishable(temp: &tempfile::NamedTempFile) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    temp.as_file().set_permissions(fs::Permissions::from_mode(ARTIFACT_MODE))
}

#[cfg(not(unix))]
fn publishable(_temp: &tempfile::NamedTempFile) -> std::io::Result<()> {
    Ok(())
}
