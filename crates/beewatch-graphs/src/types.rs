//! Chart types and data structures

use chrono::NaiveDateTime;
use std::fmt;

use crate::artifact::ArtifactKey;

/// What a chart plots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    /// Entries and exits per bee class
    InOut,
    /// Share of worker entries carrying pollen
    Pollen,
}

impl Metric {
    /// Stem used in artifact file names
    pub fn file_stem(self) -> &'static str {
        match self {
            Metric::InOut => "inout",
            Metric::Pollen => "pollen",
        }
    }

    /// Chart heading suffix
    pub fn title(self) -> &'static str {
        match self {
            Metric::InOut => "hive traffic by bee class",
            Metric::Pollen => "pollen ratio",
        }
    }

    /// Y axis description
    pub fn y_desc(self) -> &'static str {
        match self {
            Metric::InOut => "Count",
            Metric::Pollen => "Pollen ratio",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

/// Stroke pattern of a line series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
}

/// One plotted sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

/// A named line on a chart, points in chronological order
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    pub name: String,
    /// Hex color, `#RRGGBB`
    pub color: String,
    pub style: LineStyle,
    pub points: Vec<SeriesPoint>,
}

impl TimeSeries {
    pub fn new(name: impl Into<String>, color: impl Into<String>, style: LineStyle) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            style,
            points: Vec::new(),
        }
    }

    /// Largest value in the series, `None` when empty
    pub fn max_value(&self) -> Option<f64> {
        self.points.iter().map(|p| p.value).reduce(f64::max)
    }
}

/// Everything needed to draw one artifact
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub key: ArtifactKey,
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub width: u32,
    pub height: u32,
    /// Left edge of the time axis (start of the window's first day)
    pub start: NaiveDateTime,
    /// Right edge of the time axis (start of the day after the window)
    pub end: NaiveDateTime,
    pub series: Vec<TimeSeries>,
}

impl ChartSpec {
    /// True when no series has a point; such charts are drawn as placeholders
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }

    /// Total number of plotted points
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    /// Upper bound for the y axis
    pub fn y_max(&self) -> f64 {
        let max = self
            .series
            .iter()
            .filter_map(TimeSeries::max_value)
            .fold(0.0_f64, f64::max);

        match self.key.metric {
            // ratios live in [0, 1]; leave headroom only above that
            Metric::Pollen if max <= 1.0 => 1.05,
            _ if max <= 0.0 => 1.0,
            _ => max * 1.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::windows::DayWindow;
    use beewatch_common::test_utils::mock_datetime;

    fn chart_with(metric: Metric, values: &[f64]) -> ChartSpec {
        let mut series = TimeSeries::new("s", "#000000", LineStyle::Solid);
        series.points = values
            .iter()
            .enumerate()
            .map(|(i, &value)| SeriesPoint {
                timestamp: mock_datetime(2025, 9, 1, i as u32, 0),
                value,
            })
            .collect();

        ChartSpec {
            key: ArtifactKey::new(metric, DayWindow::First),
            title: "t".to_string(),
            x_desc: "Time".to_string(),
            y_desc: metric.y_desc().to_string(),
            width: 800,
            height: 400,
            start: mock_datetime(2025, 9, 1, 0, 0),
            end: mock_datetime(2025, 9, 11, 0, 0),
            series: vec![series],
        }
    }

    #[test]
    fn test_metric_names() {
        assert_eq!(Metric::InOut.file_stem(), "inout");
        assert_eq!(Metric::Pollen.to_string(), "pollen");
    }

    #[test]
    fn test_empty_chart() {
        let chart = chart_with(Metric::InOut, &[]);
        assert!(chart.is_empty());
        assert_eq!(chart.point_count(), 0);
        assert_eq!(chart.y_max(), 1.0);
    }

    #[test]
    fn test_y_max_headroom() {
        let y_max = chart_with(Metric::InOut, &[3.0, 10.0, 7.0]).y_max();
        assert!((y_max - 11.0).abs() < 1e-9);
        assert_eq!(chart_with(Metric::Pollen, &[0.2, 0.4]).y_max(), 1.05);
        assert!(chart_with(Metric::Pollen, &[2.0]).y_max() > 2.0);
    }
}
