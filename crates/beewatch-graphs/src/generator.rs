//! Graph generation: fans a partition out into the six artifacts

use beewatch_common::{Result, SensorRecord, YearMonth};
use beewatch_config::GraphConfig;
use std::borrow::Borrow;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::artifact::{replace_atomically, ArtifactKey};
use crate::renderer::GraphRenderer;
use crate::series::series_for;
use crate::types::{ChartSpec, Metric};
use crate::windows::Partition;

/// One artifact written by a run
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedArtifact {
    pub key: ArtifactKey,
    pub path: PathBuf,
    /// Records in the artifact's window
    pub records: usize,
    /// Drawn as a "no data" placeholder
    pub placeholder: bool,
}

/// What a run produced
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSummary {
    pub month: YearMonth,
    pub artifacts: Vec<RenderedArtifact>,
}

impl RenderSummary {
    pub fn placeholders(&self) -> usize {
        self.artifacts.iter().filter(|a| a.placeholder).count()
    }
}

/// Renders every (metric, window) pair of a partition into the output directory
pub struct GraphGenerator<R: GraphRenderer> {
    renderer: R,
    config: GraphConfig,
    output_dir: PathBuf,
}

impl<R: GraphRenderer> GraphGenerator<R> {
    /// Create a new graph generator
    pub fn new(renderer: R, config: GraphConfig, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            renderer,
            config,
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Describe the chart for `key` without drawing it
    pub fn build_chart<T: Borrow<SensorRecord>>(
        &self,
        key: ArtifactKey,
        partition: &Partition<T>,
    ) -> ChartSpec {
        let bucket = partition.bucket(key.window);
        let records: Vec<&SensorRecord> = bucket
            .records
            .iter()
            .map(|record| Borrow::<SensorRecord>::borrow(record))
            .collect();
        let (start, end) = key.window.bounds(partition.month);

        let height = match key.metric {
            Metric::InOut => self.config.traffic_height,
            Metric::Pollen => self.config.pollen_height,
        };

        ChartSpec {
            key,
            title: format!(
                "{} days {}: {}",
                partition.month,
                key.window.span_label(partition.day_count),
                key.metric.title()
            ),
            x_desc: "Time".to_string(),
            y_desc: key.metric.y_desc().to_string(),
            width: self.config.width,
            height,
            start,
            end,
            series: series_for(key.metric, &records, &self.config.colors),
        }
    }

    /// Render all six artifacts, replacing whatever the previous run left.
    ///
    /// Stops at the first render or write failure.
    pub fn generate_all<T: Borrow<SensorRecord>>(
        &self,
        partition: &Partition<T>,
    ) -> Result<RenderSummary> {
        let mut artifacts = Vec::with_capacity(6);

        for key in ArtifactKey::all() {
            let chart = self.build_chart(key, partition);
            let path = key.path_in(&self.output_dir);
            let records = partition.bucket(key.window).len();
            let placeholder = chart.is_empty();

            if placeholder {
                warn!(
                    "{} {}: no data, writing placeholder chart",
                    key.metric,
                    key.window.span_label(partition.day_count)
                );
            }

            replace_atomically(&path, |temp| self.renderer.render_to_file(&chart, temp))?;
            info!("Saved figure: {}", path.display());

            artifacts.push(RenderedArtifact {
                key,
                path,
                records,
                placeholder,
            });
        }

        Ok(RenderSummary {
            month: partition.month,
            artifacts,
        })
    }
}
