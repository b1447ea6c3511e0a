//! Year and year/month folder naming.
//!
//! Folders follow `base/YYYY/MM-MonthName`, for example `2024/01-January`.
//! Everything here is pure: no filesystem access.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Utc};
use declutter_config::TimeBasis;

const YEAR_FORMAT: &str = "%Y";
const MONTH_FORMAT: &str = "%m-%B";

/// Folder for the year of `timestamp`: `base/YYYY`.
#[must_use]
pub fn year_path<Tz: TimeZone>(base: &Path, timestamp: &DateTime<Tz>) -> PathBuf {
    FolderKey::of(timestamp).year_folder(base)
}

/// Folder for the year and month of `timestamp`: `base/YYYY/MM-MonthName`.
#[must_use]
pub fn year_month_path<Tz: TimeZone>(base: &Path, timestamp: &DateTime<Tz>) -> PathBuf {
    FolderKey::of(timestamp).month_folder(base)
}

/// Calendar year and month a timestamp falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FolderKey {
    /// Calendar year.
    pub year: i32,
    /// Month number, 1 through 12.
    pub month: u32,
}

impl FolderKey {
    /// Key for `timestamp` in its own time zone.
    #[must_use]
    pub fn of<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> Self {
        Self {
            year: timestamp.year(),
            month: timestamp.month(),
        }
    }

    /// Key for a UTC modification time classified under `basis`.
    #[must_use]
    pub fn classify(modified: &DateTime<Utc>, basis: TimeBasis) -> Self {
        match basis {
            TimeBasis::Utc => Self::of(modified),
            TimeBasis::Local => Self::of(&modified.with_timezone(&Local)),
        }
    }

    /// `YYYY` folder name.
    #[must_use]
    pub fn year_name(self) -> String {
        self.first_day().map_or_else(
            || format!("{:04}", self.year),
            |day| day.format(YEAR_FORMAT).to_string(),
        )
    }

    /// `MM-MonthName` folder name.
    #[must_use]
    pub fn month_name(self) -> String {
        self.first_day().map_or_else(
            || format!("{:02}", self.month),
            |day| day.format(MONTH_FORMAT).to_string(),
        )
    }

    /// `base/YYYY`.
    #[must_use]
    pub fn year_folder(self, base: &Path) -> PathBuf {
        base.join(self.year_name())
    }

    /// `base/YYYY/MM-MonthName`.
    #[must_use]
    pub fn month_folder(self, base: &Path) -> PathBuf {
        self.year_folder(base).join(self.month_name())
    }

    // Keys built by `of` always name a real month.
    fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

/// Resolved year and month folders for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderTarget {
    /// Calendar bucket the file was classified into.
    pub key: FolderKey,
    /// `base/YYYY`.
    pub year_folder: PathBuf,
    /// `base/YYYY/MM-MonthName`.
    pub month_folder: PathBuf,
}

impl FolderTarget {
    /// Resolve folders for a UTC modification time classified under `basis`.
    #[must_use]
    pub fn resolve(base: &Path, modified: &DateTime<Utc>, basis: TimeBasis) -> Self {
        Self::for_key(base, FolderKey::classify(modified, basis))
    }

    /// Folders for an already classified key.
    #[must_use]
    pub fn for_key(base: &Path, key: FolderKey) -> Self {
        Self {
            key,
            year_folder: key.year_folder(base),
            month_folder: key.month_folder(base),
        }
    }

    /// Destination path for a file named `name`.
    #[must_use]
    pub fn destination(&self, name: &OsStr) -> PathBuf {
        self.month_folder.join(name)
    }

    /// `YYYY/MM-MonthName/` relative to the base, for log messages.
    #[must_use]
    pub fn relative_label(&self) -> String {
        format!("{}/{}/", self.key.year_name(), self.key.month_name())
    }
}

/// Final component of a folder path, lossily decoded.
pub(crate) fn folder_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}
