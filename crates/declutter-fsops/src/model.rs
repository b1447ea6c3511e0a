//! Domain models for a single organizer run.
//!
//! # Design
//! - Descriptors are immutable snapshots taken at scan time.
//! - Avoid embedding IO handles; the mover opens files on demand.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One candidate file discovered by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    path: PathBuf,
    name: OsString,
    modified: DateTime<Utc>,
}

impl FileDescriptor {
    /// Build a descriptor, deriving the name from the final path component.
    ///
    /// Returns `None` when the path has no file name (for example `/` or `..`).
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>, modified: DateTime<Utc>) -> Option<Self> {
        let path = path.into();
        let name = path.file_name()?.to_os_string();
        Some(Self {
            path,
            name,
            modified,
        })
    }

    /// Location of the file at scan time.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Base file name, reused unchanged at the destination.
    #[must_use]
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    /// Lossy UTF-8 rendering of the name for logs.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name.to_string_lossy().into_owned()
    }

    /// Modification time read once at scan time.
    #[must_use]
    pub const fn modified(&self) -> DateTime<Utc> {
        self.modified
    }
}

/// Per-file result of a successful relocation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The file now lives in its year/month folder.
    Moved,
    /// A file with the same name already existed at the destination.
    Skipped,
}

/// Aggregate counts for one run. Abandoned files are not counted here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OrganizationOutcome {
    /// Files relocated.
    pub moved: usize,
    /// Files left in place because of a collision.
    pub skipped: usize,
}

impl OrganizationOutcome {
    pub(crate) const fn record(&mut self, outcome: MoveOutcome) {
        match outcome {
            MoveOutcome::Moved => self.moved += 1,
            MoveOutcome::Skipped => self.skipped += 1,
        }
    }
}

/// Phases of an organizer run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    /// Configured, nothing started.
    #[default]
    Idle,
    /// Listing the source directory.
    Scanning,
    /// Sorting descriptors by modification time.
    Ordering,
    /// Resolving folders and relocating files.
    Moving,
    /// Finished; the outcome is available.
    Done,
    /// The source directory could not be read.
    Error,
}

impl RunPhase {
    /// Lowercase label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Scanning => "scanning",
            Self::Ordering => "ordering",
            Self::Moving => "moving",
            Self::Done => "done",
            Self::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn descriptor_name_is_final_path_component() -> Result<(), Box<dyn std::error::Error>> {
        let modified = Utc
            .with_ymd_and_hms(2024, 1, 15, 10, 0, 0)
            .single()
            .ok_or("invalid date")?;
        let descriptor =
            FileDescriptor::from_path("/inbox/report.pdf", modified).ok_or("missing name")?;
        assert_eq!(descriptor.name(), OsStr::new("report.pdf"));
        assert_eq!(descriptor.display_name(), "report.pdf");
        assert_eq!(descriptor.path(), Path::new("/inbox/report.pdf"));
        assert_eq!(descriptor.modified(), modified);

        assert!(FileDescriptor::from_path("/", modified).is_none());
        Ok(())
    }

    #[test]
    fn outcome_records_each_kind() {
        let mut outcome = OrganizationOutcome::default();
        outcome.record(MoveOutcome::Moved);
        outcome.record(MoveOutcome::Moved);
        outcome.record(MoveOutcome::Skipped);
        assert_eq!(
            outcome,
            OrganizationOutcome {
                moved: 2,
                skipped: 1
            }
        );
    }
}
