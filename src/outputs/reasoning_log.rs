//! Append-only JSONL log of weekly scenario assessments.
//!
//! Each weekly report appends one line per scenario. The log is the running
//! history the viewer summarises, so lines are never rewritten.

use crate::error::Result;
use crate::models::{ReasoningLogEntry, ScenarioAssessment};
use crate::period::WeeklyPeriod;
use chrono::NaiveDate;
use itertools::Itertools;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};

pub const NO_REASONING_LOGS: &str = "No reasoning logs available yet.";

/// Tag `assessments` with their week and append them to `path`.
#[instrument(level = "info", skip_all, fields(path = %path.display(), %week))]
pub async fn append_assessments(
    path: &Path,
    week: &WeeklyPeriod,
    generated_on: NaiveDate,
    assessments: &[ScenarioAssessment],
) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut lines = String::new();
    for assessment in assessments {
        let entry = ReasoningLogEntry {
            assessment: assessment.clone(),
            week_start: week.start(),
            week_end: week.end(),
            report_generated_on: generated_on,
        };
        lines.push_str(&serde_json::to_string(&entry)?);
        lines.push('\n');
    }

    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(lines.as_bytes()).await?;
    file.flush().await?;
    info!(count = assessments.len(), "Logged structured reasoning");
    Ok(())
}

/// A log line as read back; older lines carry `date` instead of
/// `report_generated_on`.
#[derive(Debug, Deserialize)]
struct LoggedReasoning {
    id: String,
    title: String,
    reasoning: String,
    plausibility: String,
    updated_confidence: Value,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    report_generated_on: Option<String>,
}

impl LoggedReasoning {
    fn sort_date(&self) -> &str {
        self.date
            .as_deref()
            .or(self.report_generated_on.as_deref())
            .unwrap_or_default()
    }

    fn render(&self) -> String {
        let display_date = self
            .date
            .as_deref()
            .or(self.report_generated_on.as_deref())
            .unwrap_or("n/a");
        format!(
            "**{} ({})** — {} (→ plausibility: {}, confidence: {})",
            self.title, display_date, self.reasoning, self.plausibility, self.updated_confidence
        )
    }
}

/// The newest `per_scenario` entries of each scenario, rendered for reading.
///
/// Scenarios appear in the order first seen in the log. Lines that do not
/// parse are skipped.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn recent_reasoning(path: &Path, per_scenario: usize) -> Result<String> {
    let raw = match fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(NO_REASONING_LOGS.to_string());
        }
        Err(e) => return Err(e.into()),
    };

    let entries: Vec<LoggedReasoning> = raw
        .lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|l| match serde_json::from_str(l) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(error = %e, "Skipping malformed log line");
                None
            }
        })
        .collect();

    let order: Vec<String> = entries.iter().map(|e| e.id.clone()).unique().collect();
    let mut by_id = entries.into_iter().into_group_map_by(|e| e.id.clone());

    let mut rendered = Vec::new();
    for id in order {
        let Some(mut group) = by_id.remove(&id) else {
            continue;
        };
        group.sort_by(|a, b| b.sort_date().cmp(a.sort_date()));
        rendered.extend(group.iter().take(per_scenario).map(LoggedReasoning::render));
    }
    Ok(rendered.join("\n\n"))
}
