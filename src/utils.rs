//! Logging setup, string helpers for log output, and output-directory checks.

use crate::error::Result;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

/// Install the global `tracing` subscriber.
///
/// Honours `RUST_LOG`, falling back to `default_directive`. Timestamps are
/// RFC 3339 UTC.
pub fn init_tracing(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a character boundary)
/// with `"…(+N bytes)"` appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and removes a probe file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).await?;
    let probe_path = path.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}
