//! Error types and utilities for beewatch

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for beewatch operations
pub type Result<T> = std::result::Result<T, BeeError>;

/// Main error type for beewatch operations
#[derive(Error, Debug)]
pub enum BeeError {
    /// No file in the data directory matched the expected input pattern
    #[error("No input found: no file matching '{pattern}' in {}", dir.display())]
    NoInputFound { dir: PathBuf, pattern: String },

    /// The input file could not be interpreted as a sensor export
    #[error("Malformed input {}: {message}", path.display())]
    MalformedInput {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Graph generation and plotting errors
    #[error("Graph error: {message}")]
    Graph {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An artifact could not be written to its final path
    #[error("Failed to write {}: {message}", path.display())]
    Write {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors for user input or data
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },
}

impl BeeError {
    /// Create a "no input found" error for a directory and file pattern
    pub fn no_input(dir: impl Into<PathBuf>, pattern: impl Into<String>) -> Self {
        Self::NoInputFound {
            dir: dir.into(),
            pattern: pattern.into(),
        }
    }

    /// Create a malformed input error
    pub fn malformed(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::MalformedInput {
            path: path.into(),
            message: msg.into(),
            source: None,
        }
    }

    /// Create a malformed input error with source
    pub fn malformed_with_source(
        path: impl Into<PathBuf>,
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::MalformedInput {
            path: path.into(),
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new graph error
    pub fn graph(msg: impl Into<String>) -> Self {
        Self::Graph {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new graph error with source
    pub fn graph_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Graph {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new write error for an output path
    pub fn write_with_source(
        path: impl Into<PathBuf>,
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Write {
            path: path.into(),
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Whether this error came from selecting or reading the input file
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::NoInputFound { .. } | Self::MalformedInput { .. })
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to BeeError
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for BeeError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::graph_with_source("Graph rendering failed", err)
    }
}
