//! # Design
//!
//! - Provide structured, constant-message errors for the organizer pipeline.
//! - Capture operation context (paths, folder level) so failures are reproducible in tests.
//! - Preserve source errors without interpolating context into error messages.

use std::error::Error as _;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for organizer operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Which tier of the year/month hierarchy a folder belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderLevel {
    /// The `YYYY` folder.
    Year,
    /// The `MM-MonthName` folder.
    Month,
}

impl FolderLevel {
    /// Lowercase label used in log messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
        }
    }
}

/// Errors produced while organizing a directory.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The source directory could not be listed. Fatal to the run.
    #[error("failed to read source directory")]
    DirectoryRead {
        /// Directory that failed to list.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The source path exists but is not a directory. Fatal to the run.
    #[error("source path is not a directory")]
    NotADirectory {
        /// Offending path.
        path: PathBuf,
    },
    /// Metadata for one directory entry could not be read.
    #[error("failed to read file metadata")]
    Metadata {
        /// Entry whose metadata was unavailable.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// A year or month folder could not be created.
    #[error("failed to create folder")]
    FolderCreate {
        /// Tier of the folder that failed.
        level: FolderLevel,
        /// Folder path.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Relocating a file failed; the source file is left in place.
    #[error("failed to move file")]
    Move {
        /// Step of the relocation that failed.
        operation: &'static str,
        /// Path involved in the failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
}

impl OrganizeError {
    pub(crate) fn directory_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::DirectoryRead {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn metadata(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Metadata {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn folder_create(
        level: FolderLevel,
        path: impl Into<PathBuf>,
        source: io::Error,
    ) -> Self {
        Self::FolderCreate {
            level,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn relocation(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: io::Error,
    ) -> Self {
        Self::Move {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Whether the error aborts the whole run rather than a single file.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::DirectoryRead { .. } | Self::NotADirectory { .. })
    }

    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::DirectoryRead { path, .. }
            | Self::NotADirectory { path }
            | Self::Metadata { path, .. }
            | Self::FolderCreate { path, .. }
            | Self::Move { path, .. } => path,
        }
    }

    /// Render the message followed by its source chain, for log output.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut rendered = self.to_string();
        let mut source = self.source();
        while let Some(err) = source {
            rendered.push_str(": ");
            rendered.push_str(&err.to_string());
            source = err.source();
        }
        rendered
    }
}
