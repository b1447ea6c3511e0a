//! Argument parsing and command dispatch.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use declutter_config::validate::{parse_log_format, parse_log_level};
use declutter_config::{AppSettings, ENV_LOG_FORMAT, ENV_LOG_LEVEL};
use declutter_telemetry::{LogFormat, LoggingConfig, build_sha, init_logging};

use crate::commands::organize::handle_organize;
use crate::commands::preview::handle_preview;
use crate::context::{AppContext, CliError, CliResult};

/// Parses CLI arguments, executes the requested command, and returns the
/// process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    match dispatch(cli).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn dispatch(cli: Cli) -> CliResult<()> {
    let settings = apply_overrides(
        AppSettings::from_env()?,
        cli.log_level.as_deref(),
        cli.log_format.as_deref(),
    )?;
    init_logging(&LoggingConfig {
        level: &settings.logging.level,
        format: LogFormat::from_name(settings.logging.format.as_str()),
        build_sha: build_sha(),
    })
    .map_err(CliError::failure)?;

    let ctx = AppContext::new(settings, cli.output)?;
    match cli.command {
        Command::Organize(args) => handle_organize(&ctx, &args).await,
        Command::Preview(args) => handle_preview(&ctx, &args),
    }
}

/// Layer command-line logging flags over environment settings.
pub(crate) fn apply_overrides(
    mut settings: AppSettings,
    log_level: Option<&str>,
    log_format: Option<&str>,
) -> CliResult<AppSettings> {
    if let Some(level) = log_level {
        settings.logging.level = parse_log_level(level)?;
    }
    if let Some(format) = log_format {
        settings.logging.format = parse_log_format(format)?;
    }
    Ok(settings)
}

#[derive(Parser)]
#[command(
    name = "declutter",
    version,
    about = "Sort a folder's files into year and month subfolders"
)]
pub(crate) struct Cli {
    #[arg(long, global = true, env = ENV_LOG_LEVEL)]
    log_level: Option<String>,
    #[arg(long, global = true, env = ENV_LOG_FORMAT)]
    log_format: Option<String>,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Text,
        help = "Select output format for command results"
    )]
    output: OutputFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Move every file in DIR into YYYY/MM-MonthName subfolders.
    Organize(OrganizeArgs),
    /// Show where each file in DIR would be moved, without moving anything.
    Preview(PreviewArgs),
}

#[derive(Args, Debug)]
pub(crate) struct OrganizeArgs {
    /// Folder whose files should be organized.
    pub(crate) dir: PathBuf,
    /// Skip the confirmation prompt.
    #[arg(long, short = 'y')]
    pub(crate) yes: bool,
    /// Calendar used to classify modification times (`local` or `utc`).
    #[arg(long)]
    pub(crate) time_basis: Option<String>,
    /// Print run counters after the outcome.
    #[arg(long)]
    pub(crate) metrics: bool,
}

#[derive(Args, Debug)]
pub(crate) struct PreviewArgs {
    /// Folder to preview.
    pub(crate) dir: PathBuf,
    /// Calendar used to classify modification times (`local` or `utc`).
    #[arg(long)]
    pub(crate) time_basis: Option<String>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Text,
    Json,
}
