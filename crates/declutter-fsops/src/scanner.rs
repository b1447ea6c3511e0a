//! Flat listing of a source directory.
//!
//! # Design
//! - Only immediate entries are considered; directories are skipped without
//!   recursion.
//! - A failure to list the directory itself is fatal. Per-entry metadata
//!   failures drop that entry with a warning.
//! - Entries are visited in file-name order so equal modification times keep a
//!   reproducible order after the stable sort.

use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::{OrganizeError, OrganizeResult};
use crate::model::FileDescriptor;
use crate::sink::{LogSink, OrganizeEvent, emit};

/// List the immediate files of `source_dir`.
///
/// # Errors
///
/// Returns [`OrganizeError::DirectoryRead`] when the directory cannot be opened
/// or listed, and [`OrganizeError::NotADirectory`] when the path is a file.
pub fn scan(source_dir: &Path, sink: &dyn LogSink) -> OrganizeResult<Vec<FileDescriptor>> {
    let metadata = fs::metadata(source_dir)
        .map_err(|source| OrganizeError::directory_read(source_dir, source))?;
    if !metadata.is_dir() {
        return Err(OrganizeError::NotADirectory {
            path: source_dir.to_path_buf(),
        });
    }

    let mut descriptors = Vec::new();
    let entries = WalkDir::new(source_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 || err.path() == Some(source_dir) => {
                return Err(OrganizeError::directory_read(source_dir, io::Error::from(err)));
            }
            Err(err) => {
                let path = err.path().unwrap_or(source_dir).to_path_buf();
                report_unreadable(sink, &OrganizeError::metadata(path, io::Error::from(err)));
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }

        match describe_entry(&entry) {
            Ok(descriptor) => descriptors.push(descriptor),
            Err(err) => report_unreadable(sink, &err),
        }
    }

    debug!(
        source = %source_dir.display(),
        files = descriptors.len(),
        "scanned source directory"
    );
    Ok(descriptors)
}

fn describe_entry(entry: &DirEntry) -> OrganizeResult<FileDescriptor> {
    let modified = entry
        .metadata()
        .map_err(io::Error::from)
        .and_then(|metadata| metadata.modified())
        .map_err(|source| OrganizeError::metadata(entry.path(), source))?;

    FileDescriptor::from_path(entry.path(), DateTime::<Utc>::from(modified)).ok_or_else(|| {
        OrganizeError::metadata(
            entry.path(),
            io::Error::new(io::ErrorKind::InvalidInput, "entry has no file name"),
        )
    })
}

fn report_unreadable(sink: &dyn LogSink, err: &OrganizeError) {
    let path = err.path();
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
    let error = err.describe();
    warn!(entry = %path.display(), error = %error, "skipping entry without metadata");
    emit(sink, &OrganizeEvent::MetadataUnavailable { name, error });
}
