//! Application-wide error types using thiserror.

use beewatch_common::BeeError;
use beewatch_config::ConfigError;

/// Logging could not be set up
pub const EXIT_STARTUP: u8 = 1;
/// No export matched the input pattern
pub const EXIT_NO_INPUT: u8 = 2;
/// The selected export could not be interpreted
pub const EXIT_BAD_INPUT: u8 = 3;
/// A chart could not be rendered or written
pub const EXIT_RENDER: u8 = 4;
/// Configuration file, environment or flags were invalid
pub const EXIT_CONFIG: u8 = 5;

/// Failure of one pipeline stage.
#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    /// Configuration error.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Invalid command line value.
    #[error("Invalid argument: {0}")]
    Argument(#[source] BeeError),

    /// No usable input file.
    #[error("{0}")]
    Select(#[source] BeeError),

    /// Input file unreadable or unusable.
    #[error("{0}")]
    Load(#[source] BeeError),

    /// Chart rendering or artifact write failed.
    #[error("{0}")]
    Render(#[source] BeeError),
}

impl ReportError {
    /// Name of the failed stage, used in diagnostics
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Config(_) | Self::Argument(_) => "configuration",
            Self::Select(_) => "input selection",
            Self::Load(_) => "input load",
            Self::Render(_) => "rendering",
        }
    }

    /// Process exit status for this failure
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Argument(_) => EXIT_CONFIG,
            Self::Select(_) => EXIT_NO_INPUT,
            Self::Load(_) => EXIT_BAD_INPUT,
            Self::Render(_) => EXIT_RENDER,
        }
    }
}

/// Result type for a run.
pub type ReportResult<T> = Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_per_stage() {
        let no_input = BeeError::no_input("data", "*_TX2_6_inout.csv");
        let malformed = BeeError::malformed("a.csv", "missing column 'dt'");
        let cases = [
            (ReportError::Select(no_input), 2, "input selection"),
            (ReportError::Load(malformed), 3, "input load"),
            (ReportError::Render(BeeError::graph("font missing")), 4, "rendering"),
            (ReportError::Argument(BeeError::validation("bad month")), 5, "configuration"),
        ];

        for (error, code, stage) in cases {
            assert_eq!(error.exit_code(), code);
            assert_eq!(error.stage(), stage);
        }
    }

    #[test]
    fn test_message_passes_through() {
        let error = ReportError::Select(BeeError::no_input("data", "*_TX2_6_inout.csv"));
        assert_eq!(
            error.to_string(),
            "No input found: no file matching '*_TX2_6_inout.csv' in data"
        );
    }
}
