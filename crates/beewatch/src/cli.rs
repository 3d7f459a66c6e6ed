//! Command line arguments and their merge into the loaded configuration

use beewatch_common::YearMonth;
use beewatch_config::{Config, ConfigLoader};
use clap::Parser;
use std::path::PathBuf;

use crate::error::{ReportError, ReportResult};

/// Render monthly hive-entrance charts from the newest sensor export
#[derive(Parser, Debug, Clone, Default, PartialEq)]
#[command(name = "beewatch", author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory scanned for monthly exports
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Directory the six charts are written to
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Device id embedded in export file names
    #[arg(long)]
    pub device: Option<String>,

    /// Record type embedded in export file names
    #[arg(long)]
    pub record_type: Option<String>,

    /// Month to chart (YYYY-MM); defaults to the export's own month
    #[arg(short, long)]
    pub month: Option<String>,

    /// Log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Append logs to this file instead of stdout
    #[arg(long)]
    pub log_file: Option<String>,
}

impl Args {
    /// Overwrite configuration values with the flags that were given
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(dir) = &self.data_dir {
            config.input.data_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output.output_dir = dir.clone();
        }
        if let Some(device) = &self.device {
            config.input.device_id = device.clone();
        }
        if let Some(record_type) = &self.record_type {
            config.input.record_type = record_type.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(file) = &self.log_file {
            config.logging.file = Some(file.clone());
        }
    }

    /// The `--month` flag, parsed
    pub fn month(&self) -> ReportResult<Option<YearMonth>> {
        self.month
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(ReportError::Argument)
    }
}

/// Load the configuration (file, then environment) and apply the flags on top
pub fn load_config(args: &Args) -> ReportResult<Config> {
    let mut config = ConfigLoader::load(args.config.as_deref())?;
    args.apply_to(&mut config);
    config
        .validate_all()
        .map_err(|e| ReportError::Config(e.into()))?;
    Ok(config)
}
