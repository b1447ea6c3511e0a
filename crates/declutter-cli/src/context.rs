//! Shared settings, metrics, and error types for CLI commands.

use std::fmt::{self, Display, Formatter};
use std::path::Path;

use anyhow::anyhow;
use declutter_config::validate::parse_time_basis;
use declutter_config::{AppSettings, ConfigError, OrganizerPolicy};
use declutter_fsops::OrganizeError;
use declutter_telemetry::Metrics;

use crate::cli::OutputFormat;

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::InvalidField {
                field,
                value,
                reason,
            } => match value {
                Some(value) => Self::validation(format!("invalid {field} '{value}': {reason}")),
                None => Self::validation(format!("invalid {field}: {reason}")),
            },
            ConfigError::MissingField { field } => Self::validation(format!("{field} is required")),
        }
    }
}

/// Map a fatal organizer error onto the failure exit code.
pub(crate) fn organize_failure(source_dir: &Path, err: OrganizeError) -> CliError {
    CliError::failure(anyhow::Error::new(err).context(format!(
        "cannot organize {}",
        source_dir.display()
    )))
}

/// State shared by every command handler.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) settings: AppSettings,
    pub(crate) output: OutputFormat,
    pub(crate) metrics: Metrics,
}

impl AppContext {
    pub(crate) fn new(settings: AppSettings, output: OutputFormat) -> CliResult<Self> {
        let metrics = Metrics::new()
            .map_err(|err| CliError::failure(anyhow!("failed to build metrics: {err:#}")))?;
        Ok(Self {
            settings,
            output,
            metrics,
        })
    }

    /// Policy for `source_dir`, with an optional per-command calendar override.
    pub(crate) fn policy_for(
        &self,
        source_dir: &Path,
        time_basis: Option<&str>,
    ) -> CliResult<OrganizerPolicy> {
        let mut policy = self.settings.policy_for(source_dir);
        if let Some(value) = time_basis {
            policy = policy.with_time_basis(parse_time_basis(value)?);
        }
        policy.validate()?;
        Ok(policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use declutter_config::TimeBasis;
    use std::io;

    #[test]
    fn exit_codes_separate_validation_from_failure() {
        let validation = CliError::validation("bad flag");
        assert_eq!(validation.exit_code(), 2);
        assert_eq!(validation.display_message(), "bad flag");

        let failure = CliError::failure(anyhow!("boom").context("outer"));
        assert_eq!(failure.exit_code(), 3);
        assert_eq!(failure.display_message(), "outer: boom");
    }

    #[test]
    fn config_errors_become_validation_messages() {
        let err = CliError::from(ConfigError::InvalidField {
            field: "time_basis",
            value: Some("mars".to_string()),
            reason: "unknown_variant",
        });
        assert_eq!(err.exit_code(), 2);
        assert_eq!(
            err.display_message(),
            "invalid time_basis 'mars': unknown_variant"
        );

        let missing = CliError::from(ConfigError::MissingField {
            field: "source_dir",
        });
        assert_eq!(missing.display_message(), "source_dir is required");
    }

    #[test]
    fn organize_failures_carry_the_source_chain() {
        let err = organize_failure(
            Path::new("/inbox"),
            OrganizeError::DirectoryRead {
                path: "/inbox".into(),
                source: io::Error::new(io::ErrorKind::NotFound, "missing"),
            },
        );
        assert_eq!(err.exit_code(), 3);
        assert_eq!(
            err.display_message(),
            "cannot organize /inbox: failed to read source directory: missing"
        );
    }

    #[test]
    fn policy_override_wins_over_settings() -> Result<(), Box<dyn std::error::Error>> {
        let ctx = AppContext::new(AppSettings::default(), OutputFormat::Text)?;
        let policy = ctx.policy_for(Path::new("/inbox"), Some("UTC"))?;
        assert_eq!(policy.time_basis, TimeBasis::Utc);

        let inherited = ctx.policy_for(Path::new("/inbox"), None)?;
        assert_eq!(inherited.time_basis, TimeBasis::Local);

        let invalid = ctx.policy_for(Path::new("/inbox"), Some("mars")).err();
        assert!(matches!(invalid, Some(CliError::Validation(_))));

        let empty = ctx.policy_for(Path::new(""), None).err();
        assert!(matches!(empty, Some(CliError::Validation(_))));
        Ok(())
    }
}
