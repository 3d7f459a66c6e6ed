//! # beewatch graphs
//!
//! Splits a month of sensor records into three calendar-aware day windows
//! and renders one traffic chart and one pollen chart per window with
//! plotters. Artifact paths depend only on (metric, window), so each run
//! replaces the previous run's six files in place.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod artifact;
pub mod generator;
pub mod renderer;
pub mod series;
pub mod types;
pub mod windows;

pub use artifact::{replace_atomically, ArtifactKey};
pub use generator::{GraphGenerator, RenderSummary, RenderedArtifact};
pub use renderer::{GraphRenderer, TimeSeriesRenderer};
pub use types::{ChartSpec, LineStyle, Metric, SeriesPoint, TimeSeries};
pub use windows::{
    partition, partition_month, Bucket, DayWindow, Dated, Partition, SkipReason, SkippedRecord,
};
