//! Filesystem fixtures for organizer tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, TimeZone, Utc};
use filetime::{FileTime, set_file_mtime};
use tempfile::TempDir;

/// Create an empty temporary directory to act as a source folder.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn temp_source_dir() -> Result<TempDir> {
    tempfile::Builder::new()
        .prefix("declutter-")
        .tempdir()
        .context("failed to create temporary source directory")
}

/// Build a UTC timestamp at noon, so local-time classification lands on the same date.
///
/// # Errors
///
/// Returns an error if the date is not valid.
pub fn utc_date(year: i32, month: u32, day: u32) -> Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
        .single()
        .ok_or_else(|| anyhow!("invalid date {year}-{month}-{day}"))
}

/// Write `contents` to `dir/name` and stamp the file with `modified`.
///
/// # Errors
///
/// Returns an error if the file cannot be written or its time cannot be set.
pub fn write_dated_file(
    dir: &Path,
    name: &str,
    contents: &[u8],
    modified: DateTime<Utc>,
) -> Result<PathBuf> {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    set_mtime(&path, modified)?;
    Ok(path)
}

/// Set the modification time of an existing file.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be applied.
pub fn set_mtime(path: &Path, modified: DateTime<Utc>) -> Result<()> {
    let time = FileTime::from_system_time(SystemTime::from(modified));
    set_file_mtime(path, time).with_context(|| format!("failed to set mtime on {}", path.display()))
}

/// Read a file's modification time as whole seconds since the epoch.
///
/// # Errors
///
/// Returns an error if the metadata cannot be read.
pub fn mtime_seconds(path: &Path) -> Result<i64> {
    let metadata =
        fs::metadata(path).with_context(|| format!("failed to stat {}", path.display()))?;
    Ok(FileTime::from_last_modification_time(&metadata).unix_seconds())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_dated_file_applies_timestamp() -> Result<()> {
        let dir = temp_source_dir()?;
        let modified = utc_date(2024, 6, 15)?;
        let path = write_dated_file(dir.path(), "note.txt", b"hello", modified)?;

        assert_eq!(fs::read(&path)?, b"hello");
        assert_eq!(mtime_seconds(&path)?, modified.timestamp());
        Ok(())
    }

    #[test]
    fn utc_date_rejects_impossible_dates() {
        assert!(utc_date(2024, 2, 30).is_err());
    }
}
