//! Validation utilities and regex patterns

use regex::Regex;
use std::sync::LazyLock;
use validator::ValidationError;

/// Regex pattern for validating hex color codes (e.g., #FFFFFF, #FF0000)
pub static HEX_COLOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid hex color regex pattern")
});

/// Log levels accepted by the `logging.level` setting
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate log level string
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    if LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_level"))
    }
}

/// Validate a token that becomes part of an input file name (device id,
/// record type). It must not be able to escape the data directory or act as
/// a wildcard.
pub fn validate_file_name_token(token: &str) -> Result<(), ValidationError> {
    if token.trim().is_empty() {
        return Err(ValidationError::new("empty_file_name_token"));
    }

    let forbidden = ['/', '\\', '*', '?', '[', ']', '<', '>', '|', '"', ':'];
    if token.chars().any(|c| forbidden.contains(&c) || c.is_control()) || token.contains("..") {
        return Err(ValidationError::new("invalid_file_name_token"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_regex() {
        assert!(HEX_COLOR_REGEX.is_match("#FFFFFF"));
        assert!(HEX_COLOR_REGEX.is_match("#1f77b4"));

        assert!(!HEX_COLOR_REGEX.is_match("FFFFFF"));
        assert!(!HEX_COLOR_REGEX.is_match("#FFF"));
        assert!(!HEX_COLOR_REGEX.is_match("#GGGGGG"));
    }

    #[test]
    fn test_validate_log_level() {
        assert!(validate_log_level("info").is_ok());
        assert!(validate_log_level("DEBUG").is_ok());
        assert!(validate_log_level("verbose").is_err());
        assert!(validate_log_level("").is_err());
    }

    #[test]
    fn test_validate_file_name_token() {
        assert!(validate_file_name_token("TX2_6").is_ok());
        assert!(validate_file_name_token("inout").is_ok());

        assert!(validate_file_name_token("").is_err());
        assert!(validate_file_name_token("  ").is_err());
        assert!(validate_file_name_token("../etc").is_err());
        assert!(validate_file_name_token("a/b").is_err());
        assert!(validate_file_name_token("TX*").is_err());
    }
}
