//! Report artifacts.
//!
//! A report is stored verbatim under its period's artifact key. The file's
//! existence is what marks the period as produced.

use crate::error::Result;
use crate::gaps::list_artifact_keys;
use crate::period::ReportPeriod;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Path of the artifact for `period` inside `dir`.
pub fn report_path<P: ReportPeriod>(dir: &Path, period: &P) -> PathBuf {
    dir.join(period.artifact_key())
}

/// Write the report for `period`, creating `dir` if needed.
#[instrument(level = "info", skip_all, fields(dir = %dir.display(), %period))]
pub async fn write_report<P: ReportPeriod>(dir: &Path, period: &P, text: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).await?;
    let path = report_path(dir, period);
    fs::write(&path, text).await?;
    info!(path = %path.display(), bytes = text.len(), "Wrote report");
    Ok(path)
}

/// Read the stored report for `period`, if any.
pub async fn read_report<P: ReportPeriod>(dir: &Path, period: &P) -> Result<Option<String>> {
    match fs::read_to_string(report_path(dir, period)).await {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Every stored period in `dir`, newest first.
pub async fn list_reports<P: ReportPeriod>(dir: &Path) -> Result<Vec<P>> {
    let mut periods: Vec<P> = list_artifact_keys(dir)
        .await?
        .iter()
        .filter_map(|k| P::parse_artifact_key(k))
        .collect();
    periods.sort_by(|a, b| b.cmp(a));
    periods.dedup();
    Ok(periods)
}
