//! Output renderers and formatting helpers for CLI commands.

use std::path::Path;

use anyhow::anyhow;
use chrono::{DateTime, Local, Utc};
use declutter_config::TimeBasis;
use declutter_fsops::{OrganizationOutcome, PlannedMove};
use declutter_telemetry::{Metrics, MetricsSnapshot};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::context::{CliError, CliResult};

#[derive(Serialize)]
struct RunReport {
    source_dir: String,
    moved: usize,
    skipped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    metrics: Option<MetricsSnapshot>,
}

#[derive(Serialize)]
struct PlanRow {
    name: String,
    source: String,
    destination: String,
    modified: DateTime<Utc>,
    collision: bool,
}

/// Progress lines go to stdout for text output and to stderr when stdout
/// carries JSON.
pub(crate) fn print_progress(format: OutputFormat, line: &str) {
    match format {
        OutputFormat::Text => println!("{line}"),
        OutputFormat::Json => eprintln!("{line}"),
    }
}

pub(crate) fn render_outcome(
    source_dir: &Path,
    outcome: OrganizationOutcome,
    metrics: Option<&Metrics>,
    format: OutputFormat,
) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(&RunReport {
            source_dir: source_dir.display().to_string(),
            moved: outcome.moved,
            skipped: outcome.skipped,
            metrics: metrics.map(Metrics::snapshot),
        }),
        OutputFormat::Text => {
            let mut text = format!(
                "Done! {} files moved, {} skipped",
                outcome.moved, outcome.skipped
            );
            if let Some(metrics) = metrics {
                let rendered = metrics.render().map_err(CliError::failure)?;
                text.push('\n');
                text.push_str(rendered.trim_end());
            }
            Ok(text)
        }
    }
}

/// Text rows show the modification time in the calendar used for classification.
pub(crate) fn render_plan(
    planned: &[PlannedMove],
    basis: TimeBasis,
    format: OutputFormat,
) -> CliResult<String> {
    match format {
        OutputFormat::Json => {
            let rows: Vec<PlanRow> = planned
                .iter()
                .map(|item| PlanRow {
                    name: item.descriptor.display_name(),
                    source: item.descriptor.path().display().to_string(),
                    destination: item.destination.display().to_string(),
                    modified: item.descriptor.modified(),
                    collision: item.collision,
                })
                .collect();
            to_json(&rows)
        }
        OutputFormat::Text => {
            if planned.is_empty() {
                return Ok("No files found to organize".to_string());
            }
            let mut lines = vec![format!("{:<19} {:<20} NAME", "MODIFIED", "FOLDER")];
            for item in planned {
                let mut line = format!(
                    "{:<19} {:<20} {}",
                    display_time(item.descriptor.modified(), basis),
                    item.target.relative_label(),
                    item.descriptor.display_name()
                );
                if item.collision {
                    line.push_str(" (exists, will skip)");
                }
                lines.push(line);
            }
            Ok(lines.join("\n"))
        }
    }
}

fn display_time(modified: DateTime<Utc>, basis: TimeBasis) -> String {
    const STAMP: &str = "%Y-%m-%d %H:%M:%S";
    match basis {
        TimeBasis::Local => modified.with_timezone(&Local).format(STAMP).to_string(),
        TimeBasis::Utc => modified.format(STAMP).to_string(),
    }
}

fn to_json<T: Serialize>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use declutter_fsops::{FileDescriptor, FolderTarget};
    use declutter_test_support::fixtures::utc_date;
    use serde_json::Value;

    fn planned(name: &str, collision: bool) -> anyhow::Result<PlannedMove> {
        let modified = utc_date(2024, 3, 20)?;
        let descriptor = FileDescriptor::from_path(Path::new("/inbox").join(name), modified)
            .ok_or_else(|| anyhow!("descriptor without name"))?;
        let target = FolderTarget::resolve(Path::new("/inbox"), &modified, TimeBasis::Utc);
        Ok(PlannedMove {
            destination: target.destination(descriptor.name()),
            descriptor,
            target,
            collision,
        })
    }

    #[test]
    fn text_outcome_summarises_counts() -> anyhow::Result<()> {
        let outcome = OrganizationOutcome {
            moved: 3,
            skipped: 1,
        };
        let text = render_outcome(Path::new("/inbox"), outcome, None, OutputFormat::Text)
            .map_err(|err| anyhow!(err.display_message()))?;
        assert_eq!(text, "Done! 3 files moved, 1 skipped");
        Ok(())
    }

    #[test]
    fn json_outcome_includes_metrics_when_requested() -> anyhow::Result<()> {
        let metrics = Metrics::new()?;
        let outcome = OrganizationOutcome {
            moved: 2,
            skipped: 0,
        };
        let text = render_outcome(
            Path::new("/inbox"),
            outcome,
            Some(&metrics),
            OutputFormat::Json,
        )
        .map_err(|err| anyhow!(err.display_message()))?;
        let value: Value = serde_json::from_str(&text)?;
        assert_eq!(value["moved"], 2);
        assert_eq!(value["source_dir"], "/inbox");
        assert_eq!(value["metrics"]["files_moved"], 0);
        Ok(())
    }

    #[test]
    fn plan_text_marks_collisions() -> anyhow::Result<()> {
        let rows = [planned("a.txt", false)?, planned("b.txt", true)?];
        let text = render_plan(&rows, TimeBasis::Utc, OutputFormat::Text)
            .map_err(|err| anyhow!(err.display_message()))?;
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("2024/03-March/"));
        assert!(lines[1].ends_with("a.txt"));
        assert!(lines[2].ends_with("b.txt (exists, will skip)"));
        Ok(())
    }

    #[test]
    fn plan_json_lists_destinations() -> anyhow::Result<()> {
        let rows = [planned("a.txt", false)?];
        let text = render_plan(&rows, TimeBasis::Utc, OutputFormat::Json)
            .map_err(|err| anyhow!(err.display_message()))?;
        let value: Value = serde_json::from_str(&text)?;
        assert_eq!(value[0]["name"], "a.txt");
        assert_eq!(value[0]["destination"], "/inbox/2024/03-March/a.txt");
        assert_eq!(value[0]["collision"], false);
        Ok(())
    }

    #[test]
    fn empty_plan_reads_naturally() -> anyhow::Result<()> {
        let text = render_plan(&[], TimeBasis::Local, OutputFormat::Text)
            .map_err(|err| anyhow!(err.display_message()))?;
        assert_eq!(text, "No files found to organize");
        Ok(())
    }

    #[test]
    fn plan_text_shows_time_in_classification_basis() -> anyhow::Result<()> {
        let rows = [planned("a.txt", false)?];
        let modified = rows[0].descriptor.modified();

        let utc = render_plan(&rows, TimeBasis::Utc, OutputFormat::Text)
            .map_err(|err| anyhow!(err.display_message()))?;
        assert!(utc.lines().nth(1).is_some_and(|row| row.starts_with("2024-03-20 12:00:00")));

        let local = render_plan(&rows, TimeBasis::Local, OutputFormat::Text)
            .map_err(|err| anyhow!(err.display_message()))?;
        let expected = modified
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        assert!(local.lines().nth(1).is_some_and(|row| row.starts_with(&expected)));
        Ok(())
    }
}
