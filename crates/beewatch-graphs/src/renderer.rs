//! Graph rendering trait and the plotters-backed implementation

use beewatch_common::Result;
use beewatch_config::GraphConfig;
use chrono::{DateTime, NaiveDateTime};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use tracing::info;

use crate::types::{ChartSpec, LineStyle};

/// Notice drawn on charts for windows without records
pub const NO_DATA_NOTICE: &str = "No data recorded in this window";

const NOTICE_COLOR: RGBColor = RGBColor(96, 96, 96);

/// Renders a chart to an image file
pub trait GraphRenderer {
    /// Draw `chart` to `path`. Charts without points get a placeholder that
    /// still carries the title, so every artifact is rewritten each run.
    fn render_to_file(&self, chart: &ChartSpec, path: &Path) -> Result<()>;

    /// Parse a color string (hex format) to RGBColor
    fn parse_color(&self, color_str: &str) -> RGBColor {
        if let Some(hex) = color_str.strip_prefix('#') {
            if hex.len() == 6 {
                if let (Ok(r), Ok(g), Ok(b)) = (
                    u8::from_str_radix(&hex[0..2], 16),
                    u8::from_str_radix(&hex[2..4], 16),
                    u8::from_str_radix(&hex[4..6], 16),
                ) {
                    return RGBColor(r, g, b);
                }
            }
        }
        // Default to black if parsing fails
        RGBColor(0, 0, 0)
    }
}

/// Seconds since the epoch, used as the x coordinate
pub fn to_axis(timestamp: NaiveDateTime) -> f64 {
    timestamp.and_utc().timestamp() as f64
}

/// Tick label for an x coordinate, `MM-DD HH:MM`
pub fn format_axis_time(value: &f64) -> String {
    DateTime::from_timestamp(*value as i64, 0)
        .map(|dt| dt.naive_utc().format("%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

/// Line chart renderer on the plotters bitmap backend
pub struct TimeSeriesRenderer {
    style: GraphConfig,
}

impl TimeSeriesRenderer {
    pub fn new(style: GraphConfig) -> Self {
        Self { style }
    }

    fn title_font(&self) -> (&str, u32) {
        (self.style.font_family.as_str(), self.style.font_size + 8)
    }

    fn label_font(&self) -> (&str, u32) {
        (self.style.font_family.as_str(), self.style.font_size)
    }

    fn draw_lines(
        &self,
        root: &DrawingArea<BitMapBackend<'_>, Shift>,
        chart: &ChartSpec,
    ) -> Result<()> {
        let mut cc = ChartBuilder::on(root)
            .caption(&chart.title, self.title_font())
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(to_axis(chart.start)..to_axis(chart.end), 0f64..chart.y_max())?;

        {
            let mut mesh = cc.configure_mesh();
            mesh.x_desc(chart.x_desc.as_str())
                .y_desc(chart.y_desc.as_str())
                .x_labels(10)
                .y_labels(8)
                .x_label_formatter(&format_axis_time)
                .label_style(self.label_font());
            if !self.style.show_grid {
                mesh.disable_mesh();
            }
            mesh.draw()?;
        }

        for series in &chart.series {
            let stroke = self.parse_color(&series.color).stroke_width(2);
            let points: Vec<(f64, f64)> = series
                .points
                .iter()
                .map(|p| (to_axis(p.timestamp), p.value))
                .collect();

            let anno = match series.style {
                LineStyle::Solid => cc.draw_series(LineSeries::new(points, stroke))?,
                LineStyle::Dashed => cc.draw_series(DashedLineSeries::new(points, 10, 6, stroke))?,
            };
            anno.label(series.name.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], stroke));
        }

        if self.style.show_legend {
            cc.configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(&WHITE.mix(0.85))
                .border_style(&BLACK)
                .label_font(self.label_font())
                .draw()?;
        }

        Ok(())
    }

    fn draw_placeholder(
        &self,
        root: &DrawingArea<BitMapBackend<'_>, Shift>,
        chart: &ChartSpec,
    ) -> Result<()> {
        let area = root.titled(&chart.title, self.title_font())?;
        let (width, height) = area.dim_in_pixel();
        let (family, size) = self.label_font();
        let notice = (family, size + 4)
            .into_font()
            .color(&NOTICE_COLOR)
            .pos(Pos::new(HPos::Center, VPos::Center));

        area.draw(&Text::new(
            NO_DATA_NOTICE,
            ((width / 2) as i32, (height / 2) as i32),
            notice,
        ))?;
        Ok(())
    }
}

impl GraphRenderer for TimeSeriesRenderer {
    fn render_to_file(&self, chart: &ChartSpec, path: &Path) -> Result<()> {
        let root = BitMapBackend::new(path, (chart.width, chart.height)).into_drawing_area();
        root.fill(&self.parse_color(&self.style.background_color))?;

        if chart.is_empty() {
            self.draw_placeholder(&root, chart)?;
        } else {
            self.draw_lines(&root, chart)?;
        }

        root.present()?;
        info!(
            "Rendered {} ({} points) to {}",
            chart.key,
            chart.point_count(),
            path.display()
        );
        Ok(())
    }
}

impl Default for TimeSeriesRenderer {
    fn default() -> Self {
        Self::new(GraphConfig::default())
    }
}
