//! Validation helpers and parsing utilities for settings values.

use std::path::Path;

use crate::error::{ConfigError, ConfigResult};
use crate::model::{LogFormatSetting, TimeBasis};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Parse a time basis name, ignoring case and surrounding whitespace.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] for anything other than `local` or `utc`.
pub fn parse_time_basis(value: &str) -> ConfigResult<TimeBasis> {
    match value.trim().to_ascii_lowercase().as_str() {
        "local" => Ok(TimeBasis::Local),
        "utc" => Ok(TimeBasis::Utc),
        _ => Err(ConfigError::invalid("time_basis", value, "unknown_variant")),
    }
}

/// Parse a log format name.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] for anything other than `pretty` or `json`.
pub fn parse_log_format(value: &str) -> ConfigResult<LogFormatSetting> {
    match value.trim().to_ascii_lowercase().as_str() {
        "pretty" => Ok(LogFormatSetting::Pretty),
        "json" => Ok(LogFormatSetting::Json),
        _ => Err(ConfigError::invalid("log_format", value, "unknown_variant")),
    }
}

/// Normalise and check a log level.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the level is not recognised.
pub fn parse_log_level(value: &str) -> ConfigResult<String> {
    let level = value.trim().to_ascii_lowercase();
    if LOG_LEVELS.contains(&level.as_str()) {
        Ok(level)
    } else {
        Err(ConfigError::invalid("log_level", value, "unknown_level"))
    }
}

/// Ensure a source directory was supplied.
///
/// Existence is not checked here; the scanner reports unreadable directories.
///
/// # Errors
///
/// Returns [`ConfigError::MissingField`] when the path is empty.
pub fn validate_source_dir(path: &Path) -> ConfigResult<()> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::MissingField {
            field: "source_dir",
        });
    }
    Ok(())
}
