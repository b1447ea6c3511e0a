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

//! Typed settings for the declutter organizer and its callers.
//!
//! Layout: `model.rs` (policy and settings types), `validate.rs`
//! (parsing helpers), `loader.rs` (environment layering), `error.rs`.

pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ENV_LOG_FORMAT, ENV_LOG_LEVEL, ENV_TIME_BASIS};
pub use model::{AppSettings, LogFormatSetting, LoggingSettings, OrganizerPolicy, TimeBasis};
