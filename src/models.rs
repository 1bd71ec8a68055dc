//! Data models for fetched articles, curated evidence and scenario reasoning.
//!
//! - [`Article`]: a raw record from the search API; unknown fields are kept
//!   verbatim so raw dumps round-trip untouched
//! - [`ScoredArticle`]: an article that survived curation, with its relevance score
//! - [`Scenario`]: one entry of the weekly scenario definitions file
//! - [`ScenarioAssessment`]: the model's structured judgement on a scenario
//! - [`ReasoningLogEntry`]: one line of the append-only reasoning log

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A raw news article as returned by the search API.
///
/// Every field is optional on the wire. Accessors treat an absent or `null`
/// field as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Article {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Language the article was requested in (attached after fetching).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// Source-provided fields this crate never reads (`source`, `image`, `publishedAt`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Article {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    pub fn content(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }

    pub fn url(&self) -> &str {
        self.url.as_deref().unwrap_or_default()
    }
}

/// An article that passed curation.
///
/// Serializes as the original article with an extra `_score` field.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScoredArticle {
    #[serde(flatten)]
    pub article: Article,
    #[serde(rename = "_score")]
    pub score: u32,
}

/// A scenario tracked by the weekly report.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Scenario {
    pub id: String,
    pub title: String,
    pub narrative: String,
}

/// Direction of a scenario's plausibility over the assessed week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Plausibility {
    Up,
    Down,
    Steady,
}

impl std::fmt::Display for Plausibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Plausibility::Up => "up",
            Plausibility::Down => "down",
            Plausibility::Steady => "steady",
        };
        f.write_str(label)
    }
}

/// The model's structured assessment of one scenario for one week.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScenarioAssessment {
    pub id: String,
    pub title: String,
    pub plausibility: Plausibility,
    pub reasoning: String,
    /// Confidence in `[0, 1]`.
    pub updated_confidence: f64,
}

/// One line of the reasoning log: an assessment tagged with its week.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReasoningLogEntry {
    #[serde(flatten)]
    pub assessment: ScenarioAssessment,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub report_generated_on: NaiveDate,
}
