//! Application configuration structures

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    /// Where sensor exports are found
    #[validate]
    pub input: InputConfig,

    /// Where charts are written
    #[validate]
    pub output: OutputConfig,

    /// Chart rendering settings
    #[validate]
    pub graph: GraphConfig,

    /// Logging configuration
    #[validate]
    pub logging: LoggingConfig,
}

/// Input selection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct InputConfig {
    /// Directory scanned for monthly exports
    pub data_dir: PathBuf,

    /// Sensor/device tag embedded in export file names
    #[validate(custom(
        function = "crate::validation::validate_file_name_token",
        message = "Device id must be a plain file-name fragment"
    ))]
    pub device_id: String,

    /// Record type embedded in export file names
    #[validate(custom(
        function = "crate::validation::validate_file_name_token",
        message = "Record type must be a plain file-name fragment"
    ))]
    pub record_type: String,
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory holding the fixed set of chart files
    pub output_dir: PathBuf,
}

/// Chart rendering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GraphConfig {
    /// Chart width in pixels
    #[validate(range(min = 400, max = 4000, message = "Width must be between 400 and 4000 pixels"))]
    pub width: u32,

    /// Height of the hive traffic chart in pixels
    #[validate(range(
        min = 200,
        max = 4000,
        message = "Traffic chart height must be between 200 and 4000 pixels"
    ))]
    pub traffic_height: u32,

    /// Height of the pollen ratio chart in pixels
    #[validate(range(
        min = 200,
        max = 4000,
        message = "Pollen chart height must be between 200 and 4000 pixels"
    ))]
    pub pollen_height: u32,

    /// Background color (hex format)
    #[validate(regex(
        path = "crate::validation::HEX_COLOR_REGEX",
        message = "Background color must be valid hex color"
    ))]
    pub background_color: String,

    /// Font family for text rendering
    pub font_family: String,

    /// Font size for axis labels; titles are drawn larger
    #[validate(range(min = 8, max = 72, message = "Font size must be between 8 and 72"))]
    pub font_size: u32,

    /// Whether to show grid lines
    pub show_grid: bool,

    /// Whether to show legend
    pub show_legend: bool,

    /// Series colors
    #[validate]
    pub colors: ColorsConfig,
}

/// Series colors, one family per bee class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ColorsConfig {
    #[validate(regex(
        path = "crate::validation::HEX_COLOR_REGEX",
        message = "Worker color must be valid hex color"
    ))]
    pub worker: String,

    #[validate(regex(
        path = "crate::validation::HEX_COLOR_REGEX",
        message = "Pollen carrier color must be valid hex color"
    ))]
    pub pollen_carrier: String,

    #[validate(regex(
        path = "crate::validation::HEX_COLOR_REGEX",
        message = "Drone color must be valid hex color"
    ))]
    pub drone: String,

    #[validate(regex(
        path = "crate::validation::HEX_COLOR_REGEX",
        message = "Pollen ratio color must be valid hex color"
    ))]
    pub pollen_ratio: String,
}

/// Log line layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Compact,
    Pretty,
    Full,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[validate(custom(
        function = "crate::validation::validate_log_level",
        message = "Log level must be one of: trace, debug, info, warn, error"
    ))]
    pub level: String,

    /// Optional log file path; logs go to stdout when unset
    pub file: Option<String>,

    /// Console log layout
    pub format: LogFormat,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            device_id: "TX2_6".to_string(),
            record_type: "inout".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            width: 1600,
            traffic_height: 800,
            pollen_height: 540,
            background_color: "#FFFFFF".to_string(),
            font_family: "sans-serif".to_string(),
            font_size: 14,
            show_grid: true,
            show_legend: true,
            colors: ColorsConfig::default(),
        }
    }
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            worker: "#1F77B4".to_string(),
            pollen_carrier: "#FFA500".to_string(),
            drone: "#FF0000".to_string(),
            pollen_ratio: "#008000".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            format: LogFormat::Compact,
        }
    }
}

impl Config {
    /// Validate the whole configuration tree
    pub fn validate_all(&self) -> Result<(), validator::ValidationErrors> {
        self.validate()
    }
}

impl LoggingConfig {
    /// Translate into the subscriber settings understood by `beewatch-common`
    pub fn to_subscriber_config(&self) -> beewatch_common::LoggingConfig {
        beewatch_common::LoggingConfig {
            level: self.level.to_ascii_lowercase(),
            compact_format: self.format == LogFormat::Compact,
            pretty_format: self.format == LogFormat::Pretty,
            file_path: self.file.clone(),
            ..beewatch_common::LoggingConfig::default()
        }
    }
}
