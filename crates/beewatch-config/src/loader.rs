//! Configuration loading utilities

use crate::Config;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "BEEWATCH_CONFIG_PATH";

/// Files looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILES: &[&str] = &["beewatch.yaml", "beewatch.yml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file {}: {source}", path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        var: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with process environment overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        Self::load_config_with(path, process_env)
    }

    /// Load configuration from a YAML file, reading overrides through `env`
    pub fn load_config_with<P, F>(path: P, env: F) -> Result<Config, ConfigError>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loading configuration from {}", path.display());
        Self::from_yaml_str(&content, env)
    }

    /// Parse YAML text, apply overrides and validate
    pub fn from_yaml_str<F>(content: &str, env: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // An empty document means "all defaults"
        let mut config: Config = if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(content)?
        };

        Self::apply_env_overrides(&mut config, &env)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Resolve and load the configuration for a run.
    ///
    /// Order: `explicit` path, then `BEEWATCH_CONFIG_PATH`, then
    /// `beewatch.yaml`/`beewatch.yml` in the working directory, then defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        Self::load_with(explicit, Path::new("."), process_env)
    }

    /// [`ConfigLoader::load`] with an explicit base directory and environment
    pub fn load_with<F>(
        explicit: Option<&Path>,
        base_dir: &Path,
        env: F,
    ) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = explicit {
            return Self::load_config_with(path, env);
        }

        if let Some(path) = env(CONFIG_PATH_ENV) {
            return Self::load_config_with(path, env);
        }

        for name in DEFAULT_CONFIG_FILES {
            let candidate = base_dir.join(name);
            if candidate.is_file() {
                return Self::load_config_with(candidate, env);
            }
        }

        debug!("No configuration file found, using defaults");
        Self::from_yaml_str("", env)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides<F>(config: &mut Config, env: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = env("BEEWATCH_DATA_DIR") {
            config.input.data_dir = PathBuf::from(dir);
        }

        if let Some(device_id) = env("BEEWATCH_DEVICE_ID") {
            config.input.device_id = device_id;
        }

        if let Some(record_type) = env("BEEWATCH_RECORD_TYPE") {
            config.input.record_type = record_type;
        }

        if let Some(dir) = env("BEEWATCH_OUTPUT_DIR") {
            config.output.output_dir = PathBuf::from(dir);
        }

        if let Some(width) = env("GRAPH_WIDTH") {
            config.graph.width = parse_env("GRAPH_WIDTH", &width)?;
        }

        // GRAPH_HEIGHT is the traffic chart; the pollen chart has its own
        if let Some(height) = env("GRAPH_HEIGHT") {
            config.graph.traffic_height = parse_env("GRAPH_HEIGHT", &height)?;
        }

        if let Some(height) = env("GRAPH_POLLEN_HEIGHT") {
            config.graph.pollen_height = parse_env("GRAPH_POLLEN_HEIGHT", &height)?;
        }

        if let Some(level) = env("LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(file) = env("LOG_FILE") {
            config.logging.file = Some(file);
        }

        Ok(())
    }
}

fn process_env(var: &str) -> Option<String> {
    std::env::var(var).ok()
}

fn parse_env<T>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.trim().parse().map_err(|e| ConfigError::EnvParseError {
        var: var.to_string(),
        source: Box::new(e),
    })
}
