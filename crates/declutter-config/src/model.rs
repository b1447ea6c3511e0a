//! Typed configuration models.
//!
//! # Design
//! - Pure data carriers consumed by the organizer engine and the CLI.
//! - Parsing lives in `validate.rs`; environment layering in `loader.rs`.

use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::validate;

/// Default log level used when neither the environment nor flags override it.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Calendar used to classify a modification time into a year and month.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TimeBasis {
    /// Classify using the host's local time zone.
    #[default]
    Local,
    /// Classify using UTC.
    Utc,
}

impl TimeBasis {
    /// Render the basis as its lowercase string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Utc => "utc",
        }
    }
}

impl Display for TimeBasis {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for TimeBasis {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        validate::parse_time_basis(value)
    }
}

/// Inputs for one organizer run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrganizerPolicy {
    /// Directory whose immediate files are organized in place.
    pub source_dir: PathBuf,
    /// Calendar used for year/month classification.
    #[serde(default)]
    pub time_basis: TimeBasis,
}

impl OrganizerPolicy {
    /// Build a policy for `source_dir` using the default time basis.
    #[must_use]
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            time_basis: TimeBasis::default(),
        }
    }

    /// Replace the time basis.
    #[must_use]
    pub const fn with_time_basis(mut self, time_basis: TimeBasis) -> Self {
        self.time_basis = time_basis;
        self
    }

    /// Source directory the policy applies to.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Check the policy is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when the source directory is empty.
    pub fn validate(&self) -> ConfigResult<()> {
        validate::validate_source_dir(&self.source_dir)
    }
}

/// Output format selection for log output.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormatSetting {
    /// Human-readable output.
    #[default]
    Pretty,
    /// Structured JSON objects.
    Json,
}

impl LogFormatSetting {
    /// Render the format as its lowercase string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
        }
    }
}

/// Logging knobs surfaced to callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Log level filter (`trace`, `debug`, `info`, `warn`, `error`).
    pub level: String,
    /// Output format.
    pub format: LogFormatSetting,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormatSetting::default(),
        }
    }
}

/// Process-wide settings layered from defaults, environment, and flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppSettings {
    /// Calendar used for classification unless a run overrides it.
    pub time_basis: TimeBasis,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl AppSettings {
    /// Build a policy for `source_dir` that inherits these settings.
    #[must_use]
    pub fn policy_for(&self, source_dir: impl Into<PathBuf>) -> OrganizerPolicy {
        OrganizerPolicy::new(source_dir).with_time_basis(self.time_basis)
    }
}
