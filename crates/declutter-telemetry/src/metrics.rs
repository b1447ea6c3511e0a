//! Prometheus-backed metrics registry and snapshot helpers.
//!
//! # Design
//! - Encapsulates collector registration to keep the public API small.
//! - Counts outcomes per file, including abandoned files that never show up in
//!   a run's moved/skipped totals.

use std::sync::Arc;

use anyhow::{Context, Result};
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use serde::Serialize;

/// Result label recorded for each organizer run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunResultLabel {
    /// The run reached completion, possibly with abandoned files.
    Completed,
    /// The source directory could not be read.
    Failed,
}

impl RunResultLabel {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

/// Outcome label recorded for each processed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcomeLabel {
    /// Relocated into its year/month folder.
    Moved,
    /// Left in place because the destination already existed.
    Skipped,
    /// Processing failed; the file stayed where it was.
    Abandoned,
}

impl FileOutcomeLabel {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Moved => "moved",
            Self::Skipped => "skipped",
            Self::Abandoned => "abandoned",
        }
    }
}

/// Prometheus-backed metrics registry shared across a process.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    runs_total: IntCounterVec,
    files_total: IntCounterVec,
    folders_created_total: IntCounter,
    move_fallbacks_total: IntCounter,
}

/// Snapshot of the organizer counters.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Runs that reached completion.
    pub runs_completed: u64,
    /// Runs that failed to read their source directory.
    pub runs_failed: u64,
    /// Files relocated.
    pub files_moved: u64,
    /// Files skipped because of a collision.
    pub files_skipped: u64,
    /// Files abandoned after a folder or move failure.
    pub files_abandoned: u64,
    /// Year and month folders created.
    pub folders_created: u64,
    /// Moves that fell back from rename to copy-then-delete.
    pub move_fallbacks: u64,
}

impl Metrics {
    /// Construct a new metrics registry with the organizer collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the Prometheus collectors cannot be
    /// registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let runs_total = IntCounterVec::new(
            Opts::new("declutter_runs_total", "Organizer runs by result"),
            &["result"],
        )?;
        let files_total = IntCounterVec::new(
            Opts::new("declutter_files_total", "Files processed by outcome"),
            &["outcome"],
        )?;
        let folders_created_total = IntCounter::with_opts(Opts::new(
            "declutter_folders_created_total",
            "Year and month folders created",
        ))?;
        let move_fallbacks_total = IntCounter::with_opts(Opts::new(
            "declutter_move_fallbacks_total",
            "Moves that fell back from rename to copy-then-delete",
        ))?;

        registry.register(Box::new(runs_total.clone()))?;
        registry.register(Box::new(files_total.clone()))?;
        registry.register(Box::new(folders_created_total.clone()))?;
        registry.register(Box::new(move_fallbacks_total.clone()))?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                runs_total,
                files_total,
                folders_created_total,
                move_fallbacks_total,
            }),
        })
    }

    /// Increment the run counter for the given result.
    pub fn inc_run(&self, result: RunResultLabel) {
        self.inner
            .runs_total
            .with_label_values(&[result.as_str()])
            .inc();
    }

    /// Increment the per-file outcome counter.
    pub fn inc_file(&self, outcome: FileOutcomeLabel) {
        self.inner
            .files_total
            .with_label_values(&[outcome.as_str()])
            .inc();
    }

    /// Increment the folder creation counter.
    pub fn inc_folder_created(&self) {
        self.inner.folders_created_total.inc();
    }

    /// Increment the copy fallback counter.
    pub fn inc_move_fallback(&self) {
        self.inner.move_fallbacks_total.inc();
    }

    /// Render the metrics registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be encoded or if the encoded
    /// buffer is not valid UTF-8.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .context("failed to encode Prometheus metrics")?;
        String::from_utf8(buffer).context("metrics output was not valid UTF-8")
    }

    /// Take a point-in-time snapshot of the organizer counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        let run = |label: RunResultLabel| {
            self.inner
                .runs_total
                .with_label_values(&[label.as_str()])
                .get()
        };
        let file = |label: FileOutcomeLabel| {
            self.inner
                .files_total
                .with_label_values(&[label.as_str()])
                .get()
        };
        MetricsSnapshot {
            runs_completed: run(RunResultLabel::Completed),
            runs_failed: run(RunResultLabel::Failed),
            files_moved: file(FileOutcomeLabel::Moved),
            files_skipped: file(FileOutcomeLabel::Skipped),
            files_abandoned: file(FileOutcomeLabel::Abandoned),
            folders_created: self.inner.folders_created_total.get(),
            move_fallbacks: self.inner.move_fallbacks_total.get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_snapshot_reflects_updates() -> Result<()> {
        let metrics = Metrics::new()?;
        metrics.inc_run(RunResultLabel::Completed);
        metrics.inc_file(FileOutcomeLabel::Moved);
        metrics.inc_file(FileOutcomeLabel::Moved);
        metrics.inc_file(FileOutcomeLabel::Skipped);
        metrics.inc_file(FileOutcomeLabel::Abandoned);
        metrics.inc_folder_created();
        metrics.inc_move_fallback();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.runs_completed, 1);
        assert_eq!(snapshot.runs_failed, 0);
        assert_eq!(snapshot.files_moved, 2);
        assert_eq!(snapshot.files_skipped, 1);
        assert_eq!(snapshot.files_abandoned, 1);
        assert_eq!(snapshot.folders_created, 1);
        assert_eq!(snapshot.move_fallbacks, 1);

        let rendered = metrics.render()?;
        assert!(rendered.contains("declutter_files_total"));
        assert!(rendered.contains("outcome=\"abandoned\""));
        assert!(rendered.contains("declutter_folders_created_total"));
        Ok(())
    }

    #[test]
    fn clones_share_the_same_registry() -> Result<()> {
        let metrics = Metrics::new()?;
        let clone = metrics.clone();
        clone.inc_run(RunResultLabel::Failed);
        assert_eq!(metrics.snapshot().runs_failed, 1);

        let json = serde_json::to_value(metrics.snapshot())?;
        assert_eq!(json["runs_failed"], 1);
        Ok(())
    }
}
