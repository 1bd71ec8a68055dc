//! Pipeline configuration.
//!
//! Loaded once per run from YAML and passed by reference to every component.
//! Every field has a default, so a partial file (or no file at all) works.
//!
//! ```yaml
//! languages: [en, es]
//! local_offset_hours: -4
//! daily_context_cap: 6000
//! paths:
//!   daily_dir: outputs/daily
//! ```

use crate::error::{Result, WatchError};
use crate::window::local_offset;
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument};

pub const DEFAULT_CONFIG_FILE: &str = "watch.yaml";

const BASE_KEYWORDS: [&str; 7] = [
    "venezuela",
    "caracas",
    "maduro",
    "pdvsa",
    "chevron",
    "opposition",
    "sanction",
];

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Search expression sent to the news API.
    pub query: String,
    pub languages: Vec<String>,
    /// Hours east of UTC used as "local time" (no DST).
    pub local_offset_hours: i32,
    pub anchor_term: String,
    pub daily_keywords: Vec<String>,
    pub weekly_keywords: Vec<String>,
    pub min_description_len: usize,
    pub daily_context_cap: usize,
    pub weekly_context_cap: usize,
    pub max_articles_per_request: u32,
    pub request_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub search_base_url: String,
    pub paths: PathsConfig,
    pub templates: TemplatesConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    pub daily_dir: PathBuf,
    pub weekly_dir: PathBuf,
    pub raw_dir: PathBuf,
    pub curated_dir: PathBuf,
    pub context_dir: PathBuf,
    pub reasoning_log: PathBuf,
}

/// `awful_aj` chat template names.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TemplatesConfig {
    pub daily: String,
    pub reasoning: String,
    pub narrative: String,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            query: r#"(Venezuela OR Caracas OR PDVSA OR "Nicolás Maduro" OR "Machado")"#.to_string(),
            languages: vec!["en".to_string(), "es".to_string()],
            local_offset_hours: -4,
            anchor_term: "venezuela".to_string(),
            daily_keywords: BASE_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            weekly_keywords: BASE_KEYWORDS
                .iter()
                .chain(std::iter::once(&"machado"))
                .map(|k| k.to_string())
                .collect(),
            min_description_len: 40,
            daily_context_cap: 6000,
            weekly_context_cap: 10000,
            max_articles_per_request: 10,
            request_delay_ms: 1200,
            request_timeout_secs: 30,
            search_base_url: "https://gnews.io/api/v4/search".to_string(),
            paths: PathsConfig::default(),
            templates: TemplatesConfig::default(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            daily_dir: PathBuf::from("outputs/daily"),
            weekly_dir: PathBuf::from("outputs/weekly"),
            raw_dir: PathBuf::from("data/raw"),
            curated_dir: PathBuf::from("data/curated"),
            context_dir: PathBuf::from("data/context"),
            reasoning_log: PathBuf::from("data/logs/scenarios_log.jsonl"),
        }
    }
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            daily: "venezuela_daily".to_string(),
            reasoning: "venezuela_weekly_reasoning".to_string(),
            narrative: "venezuela_weekly_narrative".to_string(),
        }
    }
}

impl PathsConfig {
    pub fn scenarios_file(&self) -> PathBuf {
        self.context_dir.join("venezuela_scenarios.json")
    }

    pub fn background_file(&self) -> PathBuf {
        self.context_dir.join("venezuela_context.md")
    }
}

impl WatchConfig {
    /// The configured local offset, validated.
    pub fn offset(&self) -> Result<FixedOffset> {
        local_offset(self.local_offset_hours)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        self.offset()?;
        if self.languages.is_empty() {
            return Err(WatchError::InvalidConfig(
                "at least one language is required".to_string(),
            ));
        }
        if self.anchor_term.trim().is_empty() {
            return Err(WatchError::InvalidConfig(
                "anchor_term must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load and validate the pipeline configuration.
///
/// With `path == None` the default file is read if present, otherwise the
/// built-in defaults are used. An explicitly named file must exist.
#[instrument(level = "info", skip_all)]
pub fn load_config(path: Option<&Path>) -> Result<WatchConfig> {
    let (path, required) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    let config = if path.exists() {
        let raw = std::fs::read_to_string(&path)?;
        let config: WatchConfig = serde_yaml::from_str(&raw)?;
        info!(path = %path.display(), "Loaded pipeline configuration");
        config
    } else if required {
        return Err(WatchError::MissingConfig(path));
    } else {
        info!(path = %path.display(), "No pipeline configuration file; using defaults");
        WatchConfig::default()
    };

    config.validate()?;
    Ok(config)
}
