//! Gap detection across persisted reports.
//!
//! The presence of an artifact is the only record that a period was
//! produced. After downtime, every missing period up to the target is
//! returned in order so one invocation backfills the whole gap.

use crate::error::Result;
use crate::period::ReportPeriod;
use std::path::Path;
use tokio::fs;
use tracing::{debug, instrument};

/// The latest period among `keys`; names that do not parse are skipped.
pub fn latest_period<P, I, S>(keys: I) -> Option<P>
where
    P: ReportPeriod,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    keys.into_iter()
        .filter_map(|k| P::parse_artifact_key(k.as_ref()))
        .max()
}

/// Every period after `latest` up to and including `target`, oldest first.
///
/// With no prior artifact only `target` is produced. `latest >= target` is the
/// up-to-date steady state and yields nothing.
pub fn periods_to_generate<P: ReportPeriod>(latest: Option<P>, target: P) -> Vec<P> {
    let Some(latest) = latest else {
        return vec![target];
    };

    let mut pending = Vec::new();
    let mut candidate = latest.next();
    while candidate <= target {
        pending.push(candidate);
        candidate = candidate.next();
    }
    pending
}

/// File names directly under `dir`. A missing directory has no artifacts.
#[instrument(level = "debug", skip_all, fields(dir = %dir.display()))]
pub async fn list_artifact_keys(dir: &Path) -> Result<Vec<String>> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("Artifact directory does not exist yet");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut keys = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if let Some(name) = entry.file_name().to_str() {
            keys.push(name.to_string());
        }
    }
    debug!(count = keys.len(), "Listed artifact keys");
    Ok(keys)
}

/// Scan `dir` and return the periods still owed up to `target`.
#[instrument(level = "info", skip_all, fields(dir = %dir.display(), period = %target))]
pub async fn pending_periods<P: ReportPeriod>(dir: &Path, target: P) -> Result<Vec<P>> {
    let keys = list_artifact_keys(dir).await?;
    let latest = latest_period::<P, _, _>(&keys);
    let pending = periods_to_generate(latest, target);
    debug!(
        latest = %latest.map(|p| p.to_string()).unwrap_or_default(),
        pending = pending.len(),
        "Computed pending periods"
    );
    Ok(pending)
}
