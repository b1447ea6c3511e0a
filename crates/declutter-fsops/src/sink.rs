//! Log sink capability and the messages the organizer sends through it.
//!
//! The sink is the only shared mutable resource a run touches. It may be
//! invoked from whatever thread is executing the run; consumers that update
//! their own state must marshal messages onto their own context.

use std::fmt::{self, Display, Formatter};

use serde::Serialize;

/// Receives human-readable progress messages, in pipeline order.
pub trait LogSink: Send + Sync {
    /// Accept one message.
    fn log(&self, message: &str);
}

impl<F> LogSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn log(&self, message: &str) {
        self(message);
    }
}

/// Sink that drops every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _message: &str) {}
}

/// Typed progress events rendered into sink messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrganizeEvent {
    /// Metadata for an entry could not be read; the entry was dropped.
    MetadataUnavailable {
        /// Entry name.
        name: String,
        /// Rendered error chain.
        error: String,
    },
    /// The source directory was listed.
    ScanSummary {
        /// Number of files found.
        files: usize,
    },
    /// The organizer is about to process the scanned files.
    RunStarted {
        /// Number of descriptors to process.
        files: usize,
    },
    /// A year or month folder was created.
    FolderCreated {
        /// Final component of the folder path.
        folder: String,
    },
    /// A file was left in place because the destination already existed.
    Skipped {
        /// File name.
        name: String,
    },
    /// A file was relocated.
    Moved {
        /// File name.
        name: String,
        /// `YYYY/MM-MonthName/` label of the destination.
        destination: String,
    },
    /// A year or month folder could not be created; the file was abandoned.
    FolderFailed {
        /// `year` or `month`.
        level: &'static str,
        /// Folder path.
        path: String,
        /// Rendered error chain.
        error: String,
    },
    /// Relocation failed; the file was abandoned in place.
    MoveFailed {
        /// File name.
        name: String,
        /// Relocation step that failed, such as `open_source` or `copy`.
        operation: &'static str,
        /// Rendered error chain.
        error: String,
    },
    /// The run finished.
    RunFinished {
        /// Files moved.
        moved: usize,
        /// Files skipped.
        skipped: usize,
    },
}

impl OrganizeEvent {
    /// Machine-friendly discriminator for structured logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MetadataUnavailable { .. } => "metadata_unavailable",
            Self::ScanSummary { .. } => "scan_summary",
            Self::RunStarted { .. } => "run_started",
            Self::FolderCreated { .. } => "folder_created",
            Self::Skipped { .. } => "skipped",
            Self::Moved { .. } => "moved",
            Self::FolderFailed { .. } => "folder_failed",
            Self::MoveFailed { .. } => "move_failed",
            Self::RunFinished { .. } => "run_finished",
        }
    }
}

impl Display for OrganizeEvent {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::MetadataUnavailable { name, error } => {
                write!(formatter, "Warning: Could not get info for {name}: {error}")
            }
            Self::ScanSummary { files } => write!(formatter, "Found {files} files to organize"),
            Self::RunStarted { files } => {
                write!(formatter, "Starting organization of {files} files...")
            }
            Self::FolderCreated { folder } => write!(formatter, "Creating folder: {folder}"),
            Self::Skipped { name } => write!(formatter, "Skipped (already exists): {name}"),
            Self::Moved { name, destination } => {
                write!(formatter, "Moved: {name} → {destination}")
            }
            Self::FolderFailed { level, path, error } => {
                write!(formatter, "Error creating {level} folder {path}: {error}")
            }
            Self::MoveFailed {
                name,
                operation,
                error,
            } => write!(formatter, "Error moving {name}: {operation} failed: {error}"),
            Self::RunFinished { moved, skipped } => {
                write!(formatter, "Done! Moved: {moved}, Skipped: {skipped}")
            }
        }
    }
}

/// Render `event` and hand it to `sink`.
pub fn emit(sink: &dyn LogSink, event: &OrganizeEvent) {
    sink.log(&event.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn closures_act_as_sinks() -> Result<(), Box<dyn std::error::Error>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let captured = Arc::clone(&seen);
        let sink = move |message: &str| {
            if let Ok(mut guard) = captured.lock() {
                guard.push(message.to_string());
            }
        };

        emit(
            &sink,
            &OrganizeEvent::FolderCreated {
                folder: "2024".into(),
            },
        );
        NullSink.log("dropped");

        let guard = seen.lock().map_err(|_| "poisoned")?;
        assert_eq!(guard.as_slice(), ["Creating folder: 2024"]);
        Ok(())
    }

    #[test]
    fn events_render_human_messages() {
        let cases = [
            (
                OrganizeEvent::ScanSummary { files: 3 },
                "Found 3 files to organize",
                "scan_summary",
            ),
            (
                OrganizeEvent::Moved {
                    name: "a.txt".into(),
                    destination: "2024/01-January/".into(),
                },
                "Moved: a.txt → 2024/01-January/",
                "moved",
            ),
            (
                OrganizeEvent::Skipped {
                    name: "existing.txt".into(),
                },
                "Skipped (already exists): existing.txt",
                "skipped",
            ),
            (
                OrganizeEvent::FolderFailed {
                    level: "year",
                    path: "/in/2024".into(),
                    error: "denied".into(),
                },
                "Error creating year folder /in/2024: denied",
                "folder_failed",
            ),
            (
                OrganizeEvent::MoveFailed {
                    name: "a.txt".into(),
                    operation: "remove_source",
                    error: "permission denied".into(),
                },
                "Error moving a.txt: remove_source failed: permission denied",
                "move_failed",
            ),
            (
                OrganizeEvent::RunFinished {
                    moved: 2,
                    skipped: 1,
                },
                "Done! Moved: 2, Skipped: 1",
                "run_finished",
            ),
        ];
        for (event, message, kind) in cases {
            assert_eq!(event.to_string(), message);
            assert_eq!(event.kind(), kind);
        }
    }

    #[test]
    fn events_serialize_with_their_kind() -> Result<(), serde_json::Error> {
        let event = OrganizeEvent::FolderCreated {
            folder: "03-March".into(),
        };
        let value = serde_json::to_value(&event)?;
        assert_eq!(value["kind"], event.kind());
        assert_eq!(value["folder"], "03-March");
        Ok(())
    }
}
