//! Folder creation and safe relocation of single files.
//!
//! # Design
//! - Each folder path is created and reported at most once per run.
//! - An existing destination is never overwritten; the file is skipped.
//! - Relocation tries an atomic rename first and falls back to
//!   copy, sync, timestamp, then delete. The source is only removed after the
//!   copy is complete; any failure before that discards the partial copy.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use declutter_telemetry::{FileOutcomeLabel, Metrics};
use filetime::{FileTime, set_file_handle_times};
use tracing::{debug, info, warn};

use crate::error::{FolderLevel, OrganizeError, OrganizeResult};
use crate::model::{FileDescriptor, MoveOutcome};
use crate::resolver::{FolderTarget, folder_name};
use crate::sink::{LogSink, OrganizeEvent, emit};

/// Folders confirmed to exist during the current run.
#[derive(Debug, Default)]
pub struct CreatedFolderSet {
    folders: HashSet<PathBuf>,
}

impl CreatedFolderSet {
    /// Empty set for a new run.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `folder` is already known to exist.
    #[must_use]
    pub fn contains(&self, folder: &Path) -> bool {
        self.folders.contains(folder)
    }

    /// Number of confirmed folders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.folders.len()
    }

    /// Whether no folders have been confirmed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    fn insert(&mut self, folder: &Path) {
        self.folders.insert(folder.to_path_buf());
    }
}

/// How a file's bytes reached the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMethod {
    /// Same-filesystem rename.
    Rename,
    /// Copy to the destination followed by removal of the source.
    CopyThenDelete,
}

/// Relocates files for one run, owning that run's [`CreatedFolderSet`].
pub struct Mover<'run> {
    sink: &'run dyn LogSink,
    metrics: Option<&'run Metrics>,
    created: CreatedFolderSet,
}

impl<'run> Mover<'run> {
    /// Start a run with an empty folder set.
    #[must_use]
    pub fn new(sink: &'run dyn LogSink, metrics: Option<&'run Metrics>) -> Self {
        Self {
            sink,
            metrics,
            created: CreatedFolderSet::new(),
        }
    }

    /// Folders confirmed so far.
    #[must_use]
    pub const fn created_folders(&self) -> &CreatedFolderSet {
        &self.created
    }

    /// Ensure the target folders exist, then move `descriptor` into the month folder.
    ///
    /// # Errors
    ///
    /// Returns [`OrganizeError::FolderCreate`] when a folder cannot be created and
    /// [`OrganizeError::Move`] when relocation fails. In both cases the source
    /// file is left where it was.
    pub fn relocate(
        &mut self,
        descriptor: &FileDescriptor,
        target: &FolderTarget,
    ) -> OrganizeResult<MoveOutcome> {
        self.ensure_folder(&target.year_folder, FolderLevel::Year)?;
        self.ensure_folder(&target.month_folder, FolderLevel::Month)?;

        let destination = target.destination(descriptor.name());
        if destination_occupied(&destination)? {
            warn!(
                file = %descriptor.path().display(),
                destination = %destination.display(),
                "destination exists; skipping"
            );
            emit(
                self.sink,
                &OrganizeEvent::Skipped {
                    name: descriptor.display_name(),
                },
            );
            self.record(FileOutcomeLabel::Skipped);
            return Ok(MoveOutcome::Skipped);
        }

        let method = move_file(descriptor.path(), &destination, descriptor.modified())?;
        if method == TransferMethod::CopyThenDelete
            && let Some(metrics) = self.metrics
        {
            metrics.inc_move_fallback();
        }

        info!(
            file = %descriptor.path().display(),
            destination = %destination.display(),
            method = ?method,
            "moved file"
        );
        emit(
            self.sink,
            &OrganizeEvent::Moved {
                name: descriptor.display_name(),
                destination: target.relative_label(),
            },
        );
        self.record(FileOutcomeLabel::Moved);
        Ok(MoveOutcome::Moved)
    }

    fn ensure_folder(&mut self, folder: &Path, level: FolderLevel) -> OrganizeResult<()> {
        if self.created.contains(folder) {
            return Ok(());
        }

        if !folder.is_dir() {
            fs::create_dir_all(folder)
                .map_err(|source| OrganizeError::folder_create(level, folder, source))?;
            debug!(folder = %folder.display(), level = level.as_str(), "created folder");
            emit(
                self.sink,
                &OrganizeEvent::FolderCreated {
                    folder: folder_name(folder),
                },
            );
            if let Some(metrics) = self.metrics {
                metrics.inc_folder_created();
            }
        }

        self.created.insert(folder);
        Ok(())
    }

    fn record(&self, outcome: FileOutcomeLabel) {
        if let Some(metrics) = self.metrics {
            metrics.inc_file(outcome);
        }
    }
}

/// Anything at `destination`, including a dangling symlink, counts as a collision.
fn destination_occupied(destination: &Path) -> OrganizeResult<bool> {
    match fs::symlink_metadata(destination) {
        Ok(_) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(OrganizeError::relocation(
            "check_destination",
            destination,
            err,
        )),
    }
}

/// Move `source` to `destination`, preserving `modified` on the result.
///
/// # Errors
///
/// Returns [`OrganizeError::Move`] when both the rename and the copy fallback fail.
pub fn move_file(
    source: &Path,
    destination: &Path,
    modified: DateTime<Utc>,
) -> OrganizeResult<TransferMethod> {
    match fs::rename(source, destination) {
        Ok(()) => Ok(TransferMethod::Rename),
        Err(rename_err) => {
            debug!(
                source = %source.display(),
                destination = %destination.display(),
                error = %rename_err,
                "rename failed; falling back to copy"
            );
            copy_then_delete(source, destination, modified)?;
            Ok(TransferMethod::CopyThenDelete)
        }
    }
}

/// Copy `source` to a new file at `destination`, then delete `source`.
///
/// # Errors
///
/// Returns [`OrganizeError::Move`] naming the failed step. The source is intact
/// and no partial destination remains whenever an error is returned.
pub fn copy_then_delete(
    source: &Path,
    destination: &Path,
    modified: DateTime<Utc>,
) -> OrganizeResult<()> {
    let mut reader = File::open(source)
        .map_err(|err| OrganizeError::relocation("open_source", source, err))?;
    let mut writer = File::create_new(destination)
        .map_err(|err| OrganizeError::relocation("create_destination", destination, err))?;

    let copied = write_copy(&mut reader, &mut writer, destination, modified);
    drop(writer);
    if let Err(err) = copied {
        discard_partial(destination);
        return Err(err);
    }

    if let Err(err) = fs::remove_file(source) {
        discard_partial(destination);
        return Err(OrganizeError::relocation("remove_source", source, err));
    }
    Ok(())
}

fn write_copy(
    reader: &mut File,
    writer: &mut File,
    destination: &Path,
    modified: DateTime<Utc>,
) -> OrganizeResult<()> {
    io::copy(reader, writer)
        .map_err(|err| OrganizeError::relocation("copy", destination, err))?;
    writer
        .sync_all()
        .map_err(|err| OrganizeError::relocation("sync", destination, err))?;

    let permissions = reader
        .metadata()
        .map_err(|err| OrganizeError::relocation("read_permissions", destination, err))?
        .permissions();
    writer
        .set_permissions(permissions)
        .map_err(|err| OrganizeError::relocation("set_permissions", destination, err))?;

    let mtime = FileTime::from_system_time(SystemTime::from(modified));
    set_file_handle_times(writer, None, Some(mtime))
        .map_err(|err| OrganizeError::relocation("set_modified", destination, err))
}

fn discard_partial(destination: &Path) {
    if let Err(err) = fs::remove_file(destination) {
        warn!(
            destination = %destination.display(),
            error = %err,
            "failed to remove partial copy"
        );
    }
}
