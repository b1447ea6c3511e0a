//! Run orchestration: scan, order, then resolve and relocate each file.
//!
//! # Design
//! - `run` is blocking. Callers that need a responsive thread invoke it on a
//!   worker and marshal sink messages themselves.
//! - Only a failure to list the source directory ends a run early. Folder and
//!   move failures abandon a single file and are visible only in the log stream.
//! - Each run owns a fresh [`crate::mover::CreatedFolderSet`]; nothing carries
//!   over between runs except configuration.

use std::path::Path;

use declutter_config::OrganizerPolicy;
use declutter_telemetry::{FileOutcomeLabel, Metrics, RunResultLabel};
use tracing::{debug, error, info, info_span};

use crate::error::{OrganizeError, OrganizeResult};
use crate::model::{FileDescriptor, OrganizationOutcome, RunPhase};
use crate::mover::Mover;
use crate::planner::{self, PlannedMove};
use crate::resolver::FolderTarget;
use crate::scanner;
use crate::sink::{LogSink, NullSink, OrganizeEvent, emit};

/// Organizes the immediate files of one source directory.
pub struct Organizer {
    policy: OrganizerPolicy,
    sink: Box<dyn LogSink>,
    metrics: Option<Metrics>,
    phase: RunPhase,
}

impl Organizer {
    /// Organizer that discards log messages.
    #[must_use]
    pub fn new(policy: OrganizerPolicy) -> Self {
        Self {
            policy,
            sink: Box::new(NullSink),
            metrics: None,
            phase: RunPhase::Idle,
        }
    }

    /// Route progress messages to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: impl LogSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Record run and file counters into `metrics`.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Directory being organized.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        self.policy.source_dir()
    }

    /// Policy this organizer was built with.
    #[must_use]
    pub const fn policy(&self) -> &OrganizerPolicy {
        &self.policy
    }

    /// Current phase of the most recent run.
    #[must_use]
    pub const fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Scan, order, and move every file, returning the moved and skipped counts.
    ///
    /// # Errors
    ///
    /// Returns [`OrganizeError::DirectoryRead`] or [`OrganizeError::NotADirectory`]
    /// when the source directory cannot be listed. No file is touched in that case.
    pub fn run(&mut self) -> OrganizeResult<OrganizationOutcome> {
        let span = info_span!("organize_run", source = %self.source_dir().display());
        let _guard = span.enter();

        let files = self.scan()?;
        emit(
            self.sink.as_ref(),
            &OrganizeEvent::ScanSummary { files: files.len() },
        );
        Ok(self.organize(files))
    }

    /// List the source directory without moving anything.
    ///
    /// # Errors
    ///
    /// Returns the fatal scan error and leaves the organizer in
    /// [`RunPhase::Error`].
    pub fn scan(&mut self) -> OrganizeResult<Vec<FileDescriptor>> {
        self.transition(RunPhase::Scanning);
        match scanner::scan(self.policy.source_dir(), self.sink.as_ref()) {
            Ok(files) => Ok(files),
            Err(err) => {
                error!(
                    source = %self.source_dir().display(),
                    error = %err.describe(),
                    "failed to scan source directory"
                );
                self.transition(RunPhase::Error);
                if let Some(metrics) = &self.metrics {
                    metrics.inc_run(RunResultLabel::Failed);
                }
                Err(err)
            }
        }
    }

    /// Resolve where each file would go, oldest first, without moving anything.
    ///
    /// # Errors
    ///
    /// Returns the fatal scan error when the source directory cannot be listed.
    pub fn plan(&self) -> OrganizeResult<Vec<PlannedMove>> {
        let files = scanner::scan(self.policy.source_dir(), self.sink.as_ref())?;
        Ok(planner::plan(
            self.policy.source_dir(),
            planner::order(files),
            self.policy.time_basis,
        ))
    }

    /// Order and relocate already scanned files.
    ///
    /// Files that cannot be placed are abandoned and counted in neither total.
    #[must_use]
    pub fn organize(&mut self, files: Vec<FileDescriptor>) -> OrganizationOutcome {
        self.transition(RunPhase::Ordering);
        let ordered = planner::order(files);
        self.transition(RunPhase::Moving);

        info!(files = ordered.len(), "starting organization");
        let outcome = self.relocate_all(&ordered);
        info!(
            moved = outcome.moved,
            skipped = outcome.skipped,
            "organization finished"
        );

        emit(
            self.sink.as_ref(),
            &OrganizeEvent::RunFinished {
                moved: outcome.moved,
                skipped: outcome.skipped,
            },
        );
        if let Some(metrics) = &self.metrics {
            metrics.inc_run(RunResultLabel::Completed);
        }
        self.transition(RunPhase::Done);
        outcome
    }

    fn relocate_all(&self, ordered: &[FileDescriptor]) -> OrganizationOutcome {
        let sink = self.sink.as_ref();
        let metrics = self.metrics.as_ref();
        emit(
            sink,
            &OrganizeEvent::RunStarted {
                files: ordered.len(),
            },
        );

        let mut mover = Mover::new(sink, metrics);
        let mut outcome = OrganizationOutcome::default();
        for descriptor in ordered {
            let target = FolderTarget::resolve(
                self.policy.source_dir(),
                &descriptor.modified(),
                self.policy.time_basis,
            );
            match mover.relocate(descriptor, &target) {
                Ok(result) => outcome.record(result),
                Err(err) => abandon(sink, metrics, descriptor, &err),
            }
        }
        debug!(
            folders = mover.created_folders().len(),
            "folders confirmed during run"
        );
        outcome
    }

    fn transition(&mut self, next: RunPhase) {
        debug!(from = self.phase.as_str(), to = next.as_str(), "organizer phase");
        self.phase = next;
    }
}

fn abandon(
    sink: &dyn LogSink,
    metrics: Option<&Metrics>,
    descriptor: &FileDescriptor,
    err: &OrganizeError,
) {
    let operation = match err {
        OrganizeError::Move { operation, .. } => *operation,
        _ => "relocate",
    };
    error!(
        file = %descriptor.path().display(),
        operation,
        error = %err.describe(),
        "abandoned file"
    );
    let event = match err {
        OrganizeError::FolderCreate {
            level,
            path,
            source,
        } => OrganizeEvent::FolderFailed {
            level: level.as_str(),
            path: path.display().to_string(),
            error: source.to_string(),
        },
        OrganizeError::Move {
            operation, source, ..
        } => OrganizeEvent::MoveFailed {
            name: descriptor.display_name(),
            operation: *operation,
            error: source.to_string(),
        },
        _ => OrganizeEvent::MoveFailed {
            name: descriptor.display_name(),
            operation: "relocate",
            error: err.describe(),
        },
    };
    emit(sink, &event);
    if let Some(metrics) = metrics {
        metrics.inc_file(FileOutcomeLabel::Abandoned);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use declutter_config::TimeBasis;
    use declutter_test_support::fixtures::{temp_source_dir, utc_date, write_dated_file};
    use declutter_test_support::mocks::RecordingSink;
    use std::fs;

    fn utc_policy(dir: &Path) -> OrganizerPolicy {
        OrganizerPolicy::new(dir).with_time_basis(TimeBasis::Utc)
    }

    #[test]
    fn new_organizer_is_idle() {
        let organizer = Organizer::new(utc_policy(Path::new("/inbox")));
        assert_eq!(organizer.phase(), RunPhase::Idle);
        assert_eq!(organizer.source_dir(), Path::new("/inbox"));
        assert_eq!(organizer.policy().time_basis, TimeBasis::Utc);
    }

    #[test]
    fn run_walks_phases_to_done() -> Result<()> {
        let dir = temp_source_dir()?;
        write_dated_file(dir.path(), "a.txt", b"a", utc_date(2024, 1, 15)?)?;
        let mut organizer = Organizer::new(utc_policy(dir.path()));

        let outcome = organizer.run()?;
        assert_eq!(outcome.moved, 1);
        assert_eq!(organizer.phase(), RunPhase::Done);
        Ok(())
    }

    #[test]
    fn failed_scan_ends_in_error_phase() -> Result<()> {
        let dir = temp_source_dir()?;
        let metrics = Metrics::new()?;
        let mut organizer =
            Organizer::new(utc_policy(&dir.path().join("gone"))).with_metrics(metrics.clone());

        let err = organizer.run().err();
        assert!(matches!(err, Some(OrganizeError::DirectoryRead { .. })));
        assert_eq!(organizer.phase(), RunPhase::Error);
        assert_eq!(metrics.snapshot().runs_failed, 1);
        Ok(())
    }

    #[test]
    fn run_emits_summary_and_totals_in_order() -> Result<()> {
        let dir = temp_source_dir()?;
        write_dated_file(dir.path(), "late.txt", b"l", utc_date(2024, 3, 20)?)?;
        write_dated_file(dir.path(), "early.txt", b"e", utc_date(2023, 12, 25)?)?;
        let recorder = RecordingSink::new();
        let mut organizer = Organizer::new(utc_policy(dir.path())).with_sink(recorder.sink());

        organizer.run()?;
        assert_eq!(
            recorder.messages(),
            [
                "Found 2 files to organize",
                "Starting organization of 2 files...",
                "Creating folder: 2023",
                "Creating folder: 12-December",
                "Moved: early.txt → 2023/12-December/",
                "Creating folder: 2024",
                "Creating folder: 03-March",
                "Moved: late.txt → 2024/03-March/",
                "Done! Moved: 2, Skipped: 0",
            ]
        );
        Ok(())
    }

    #[test]
    fn organizer_is_reusable_across_runs() -> Result<()> {
        let dir = temp_source_dir()?;
        let recorder = RecordingSink::new();
        let mut organizer = Organizer::new(utc_policy(dir.path())).with_sink(recorder.sink());

        write_dated_file(dir.path(), "one.txt", b"1", utc_date(2024, 5, 5)?)?;
        assert_eq!(organizer.run()?.moved, 1);

        fs::remove_dir_all(dir.path().join("2024"))?;
        write_dated_file(dir.path(), "two.txt", b"2", utc_date(2024, 5, 6)?)?;
        assert_eq!(organizer.run()?.moved, 1);

        // Folders are recreated and reported again because the set is per run.
        assert_eq!(recorder.count_prefix("Creating folder:"), 4);
        Ok(())
    }

    #[test]
    fn plan_previews_without_moving() -> Result<()> {
        let dir = temp_source_dir()?;
        let source = write_dated_file(dir.path(), "a.txt", b"a", utc_date(2024, 7, 4)?)?;
        let organizer = Organizer::new(utc_policy(dir.path()));

        let planned = organizer.plan()?;
        assert_eq!(planned.len(), 1);
        assert_eq!(
            planned[0].destination,
            dir.path().join("2024").join("07-July").join("a.txt")
        );
        assert!(!planned[0].collision);
        assert!(source.exists());
        assert!(!dir.path().join("2024").exists());
        assert_eq!(organizer.phase(), RunPhase::Idle);
        Ok(())
    }
}
