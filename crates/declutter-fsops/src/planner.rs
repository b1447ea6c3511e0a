//! Ordering and previews.
//!
//! Files are processed oldest first. The sort is stable, so descriptors with
//! equal modification times keep the order the scanner produced.

use std::fs;
use std::path::{Path, PathBuf};

use declutter_config::TimeBasis;

use crate::model::FileDescriptor;
use crate::resolver::FolderTarget;

/// Sort descriptors by modification time, oldest first.
#[must_use]
pub fn order(mut descriptors: Vec<FileDescriptor>) -> Vec<FileDescriptor> {
    descriptors.sort_by_key(FileDescriptor::modified);
    descriptors
}

/// Where one file would go, without moving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    /// The scanned file.
    pub descriptor: FileDescriptor,
    /// Resolved year and month folders.
    pub target: FolderTarget,
    /// Full destination path.
    pub destination: PathBuf,
    /// Whether something already occupies the destination.
    pub collision: bool,
}

/// Resolve destinations for already ordered descriptors.
///
/// Only reads the filesystem to detect collisions.
#[must_use]
pub fn plan(base: &Path, ordered: Vec<FileDescriptor>, basis: TimeBasis) -> Vec<PlannedMove> {
    ordered
        .into_iter()
        .map(|descriptor| {
            let target = FolderTarget::resolve(base, &descriptor.modified(), basis);
            let destination = target.destination(descriptor.name());
            let collision = fs::symlink_metadata(&destination).is_ok();
            PlannedMove {
                descriptor,
                target,
                destination,
                collision,
            }
        })
        .collect()
}
