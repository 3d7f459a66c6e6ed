//! Configuration management for beewatch

pub mod loader;
pub mod settings;
pub mod validation;

pub use loader::{ConfigError, ConfigLoader};
pub use settings::{
    ColorsConfig, Config, GraphConfig, InputConfig, LogFormat, LoggingConfig, OutputConfig,
};
