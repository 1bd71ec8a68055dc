//! Raw and curated article dumps.
//!
//! ```text
//! raw_dir/news_<date>.json                       raw daily fetch
//! raw_dir/news_week_<start>_to_<end>.json        raw weekly fetch, reused as a cache
//! curated_dir/venezuela_<date>.json              curated daily set (with `_score`)
//! curated_dir/venezuela_week_<label>.json        curated weekly set
//! ```

use crate::error::Result;
use crate::models::{Article, ScoredArticle};
use crate::period::{DailyPeriod, WeeklyPeriod};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

pub fn daily_raw_path(raw_dir: &Path, period: &DailyPeriod) -> PathBuf {
    raw_dir.join(format!("news_{period}.json"))
}

pub fn weekly_raw_path(raw_dir: &Path, period: &WeeklyPeriod) -> PathBuf {
    raw_dir.join(format!("news_week_{}.json", period.label()))
}

pub fn daily_curated_path(curated_dir: &Path, period: &DailyPeriod) -> PathBuf {
    curated_dir.join(format!("venezuela_{period}.json"))
}

pub fn weekly_curated_path(curated_dir: &Path, period: &WeeklyPeriod) -> PathBuf {
    curated_dir.join(format!("venezuela_week_{}.json", period.label()))
}

/// Pretty-print `value` to `path`, creating parent directories.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).await?;
    info!("Wrote JSON");
    Ok(())
}

/// Load a cached raw fetch, if one was saved earlier.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn read_cached_articles(path: &Path) -> Result<Option<Vec<Article>>> {
    let raw = match fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let articles: Vec<Article> = serde_json::from_str(&raw)?;
    info!(count = articles.len(), "Using cached raw articles");
    Ok(Some(articles))
}

pub async fn write_curated(path: &Path, curated: &[ScoredArticle]) -> Result<()> {
    write_json(path, curated).await
}
