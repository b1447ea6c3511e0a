#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions, clippy::multiple_crate_versions)]

//! Date-based organization of a directory's immediate files.
//!
//! Files are moved into `YYYY/MM-MonthName` folders beneath the source
//! directory according to their modification time.
//!
//! Layout: `scanner.rs` (flat listing), `planner.rs` (ordering and previews),
//! `resolver.rs` (folder naming), `mover.rs` (folder creation and relocation),
//! `organizer.rs` (run orchestration), `sink.rs` (progress messages),
//! `model.rs`, `error.rs`.

pub mod error;
pub mod model;
pub mod mover;
pub mod organizer;
pub mod planner;
pub mod resolver;
pub mod scanner;
pub mod sink;

pub use error::{FolderLevel, OrganizeError, OrganizeResult};
pub use model::{FileDescriptor, MoveOutcome, OrganizationOutcome, RunPhase};
pub use mover::{CreatedFolderSet, Mover, TransferMethod, copy_then_delete, move_file};
pub use organizer::Organizer;
pub use planner::{PlannedMove, order, plan};
pub use resolver::{FolderKey, FolderTarget, year_month_path, year_path};
pub use scanner::scan;
pub use sink::{LogSink, NullSink, OrganizeEvent, emit};
