//! Environment layering for [`AppSettings`].
//!
//! # Design
//! - Defaults first, then recognised `DECLUTTER_*` variables.
//! - Parsing goes through an injected iterator so tests never touch the
//!   process environment.

use std::env::{self, VarError};

use tracing::{debug, warn};

use crate::error::ConfigResult;
use crate::model::AppSettings;
use crate::validate::{parse_log_format, parse_log_level, parse_time_basis};

/// Environment variable selecting the classification calendar.
pub const ENV_TIME_BASIS: &str = "DECLUTTER_TIME_BASIS";
/// Environment variable selecting the log level.
pub const ENV_LOG_LEVEL: &str = "DECLUTTER_LOG_LEVEL";
/// Environment variable selecting the log format.
pub const ENV_LOG_FORMAT: &str = "DECLUTTER_LOG_FORMAT";

const ENV_KEYS: [&str; 3] = [ENV_TIME_BASIS, ENV_LOG_LEVEL, ENV_LOG_FORMAT];

impl AppSettings {
    /// Load settings from the process environment.
    ///
    /// Only the recognised keys are read. A recognised key whose value is not
    /// valid UTF-8 is ignored with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error when a recognised variable holds an invalid value.
    pub fn from_env() -> ConfigResult<Self> {
        let vars = ENV_KEYS.into_iter().filter_map(|key| match env::var(key) {
            Ok(value) => Some((key, value)),
            Err(VarError::NotPresent) => None,
            Err(VarError::NotUnicode(_)) => {
                warn!(key, "ignoring environment variable that is not valid UTF-8");
                None
            }
        });
        Self::from_env_map(vars)
    }

    /// Load settings from the supplied key/value pairs, ignoring unknown keys.
    ///
    /// # Errors
    ///
    /// Returns an error when a recognised key holds an invalid value.
    pub fn from_env_map<I, K, V>(vars: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut settings = Self::default();
        for (key, value) in vars {
            let value = value.as_ref();
            match key.as_ref() {
                ENV_TIME_BASIS => settings.time_basis = parse_time_basis(value)?,
                ENV_LOG_LEVEL => settings.logging.level = parse_log_level(value)?,
                ENV_LOG_FORMAT => settings.logging.format = parse_log_format(value)?,
                _ => continue,
            }
            debug!(key = key.as_ref(), "applied environment override");
        }
        Ok(settings)
    }
}
