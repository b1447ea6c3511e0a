//! Reads the real process environment, so it lives in its own test binary.

#![cfg(unix)]

use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;

use declutter_config::{
    AppSettings, ENV_LOG_FORMAT, ENV_TIME_BASIS, LogFormatSetting, TimeBasis,
};

#[test]
fn from_env_tolerates_non_utf8_variables() -> anyhow::Result<()> {
    let raw = OsStr::from_bytes(b"\xff\xfe");
    // SAFETY: this is the only test in this binary, so no other thread reads
    // the environment while it is modified.
    unsafe {
        std::env::set_var("DECLUTTER_UNRELATED_BYTES", raw);
        std::env::set_var(ENV_LOG_FORMAT, raw);
        std::env::set_var(ENV_TIME_BASIS, "utc");
    }

    let settings = AppSettings::from_env()?;

    assert_eq!(settings.time_basis, TimeBasis::Utc);
    assert_eq!(settings.logging.format, LogFormatSetting::Pretty);
    Ok(())
}
