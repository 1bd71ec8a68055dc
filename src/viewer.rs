//! Read-only access to generated reports and accumulated reasoning.
//!
//! Backs the `venezuela_watch` binary: listing and printing reports, and
//! assembling the background text a conversation about current dynamics
//! would start from.

use crate::config::WatchConfig;
use crate::error::Result;
use crate::models::Scenario;
use crate::outputs::{markdown, reasoning_log};
use crate::period::{DailyPeriod, ReportPeriod, WeeklyPeriod};
use std::path::Path;
use tokio::fs;
use tracing::instrument;

/// Reasoning entries kept per scenario in the assembled context.
pub const RECENT_PER_SCENARIO: usize = 3;

const SECTION_SEPARATOR: &str = "\n\n---\n\n";

/// A report chosen for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownReport<P> {
    pub period: P,
    pub text: String,
}

/// The requested report, or the newest one when `wanted` is `None`.
///
/// `Ok(None)` when there is nothing to show.
pub async fn select_report<P: ReportPeriod>(
    dir: &Path,
    wanted: Option<P>,
) -> Result<Option<ShownReport<P>>> {
    let period = match wanted {
        Some(p) => p,
        None => match markdown::list_reports::<P>(dir).await?.first() {
            Some(p) => *p,
            None => return Ok(None),
        },
    };
    Ok(markdown::read_report(dir, &period)
        .await?
        .map(|text| ShownReport { period, text }))
}

/// Daily and weekly periods on disk, newest first.
pub async fn list_all(config: &WatchConfig) -> Result<(Vec<DailyPeriod>, Vec<WeeklyPeriod>)> {
    let daily = markdown::list_reports(&config.paths.daily_dir).await?;
    let weekly = markdown::list_reports(&config.paths.weekly_dir).await?;
    Ok((daily, weekly))
}

async fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path).await {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Background notes, scenario summaries, the latest weekly report and recent
/// reasoning, each present section separated by a rule.
#[instrument(level = "info", skip_all)]
pub async fn brainstorm_context(config: &WatchConfig) -> Result<String> {
    let paths = &config.paths;
    let mut parts = Vec::new();

    if let Some(background) = read_optional(&paths.background_file()).await? {
        parts.push(background);
    }

    if let Some(raw) = read_optional(&paths.scenarios_file()).await? {
        let scenarios: Vec<Scenario> = serde_json::from_str(&raw)?;
        let text = scenarios
            .iter()
            .map(|s| format!("**{}**: {}", s.title, s.narrative))
            .collect::<Vec<_>>()
            .join("\n\n");
        parts.push(format!("### Current Scenarios\n{text}"));
    }

    if let Some(latest) = select_report::<WeeklyPeriod>(&paths.weekly_dir, None).await? {
        parts.push(format!("### Latest Weekly Report\n{}", latest.text));
    }

    let reasoning = reasoning_log::recent_reasoning(&paths.reasoning_log, RECENT_PER_SCENARIO).await?;
    parts.push(format!("### Recent Analytical Reasoning\n{reasoning}"));

    Ok(parts.join(SECTION_SEPARATOR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PathsConfig;
    use chrono::NaiveDate;

    fn config(root: &Path) -> WatchConfig {
        WatchConfig {
            paths: PathsConfig {
                daily_dir: root.join("daily"),
                weekly_dir: root.join("weekly"),
                raw_dir: root.join("raw"),
                curated_dir: root.join("curated"),
                context_dir: root.join("context"),
                reasoning_log: root.join("logs/scenarios_log.jsonl"),
            },
            ..Default::default()
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn test_select_defaults_to_latest() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config(tmp.path());
        for d in ["2025-11-09", "2025-11-11", "2025-11-10"] {
            markdown::write_report(&cfg.paths.daily_dir, &DailyPeriod(date(d)), d)
                .await
                .unwrap();
        }

        let latest = select_report::<DailyPeriod>(&cfg.paths.daily_dir, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.period, DailyPeriod(date("2025-11-11")));
        assert_eq!(latest.text, "2025-11-11");

        let chosen = select_report(&cfg.paths.daily_dir, Some(DailyPeriod(date("2025-11-09"))))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(chosen.text, "2025-11-09");

        let missing = select_report(&cfg.paths.daily_dir, Some(DailyPeriod(date("2025-01-01"))))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_empty_store_has_nothing_to_show() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config(tmp.path());
        assert!(
            select_report::<WeeklyPeriod>(&cfg.paths.weekly_dir, None)
                .await
                .unwrap()
                .is_none()
        );
        let (daily, weekly) = list_all(&cfg).await.unwrap();
        assert!(daily.is_empty() && weekly.is_empty());
    }

    #[tokio::test]
    async fn test_brainstorm_context_with_nothing_on_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let text = brainstorm_context(&config(tmp.path())).await.unwrap();
        assert_eq!(
            text,
            format!(
                "### Recent Analytical Reasoning\n{}",
                reasoning_log::NO_REASONING_LOGS
            )
        );
    }

    #[tokio::test]
    async fn test_brainstorm_context_sections_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config(tmp.path());
        std::fs::create_dir_all(&cfg.paths.context_dir).unwrap();
        std::fs::write(cfg.paths.background_file(), "Background.").unwrap();
        std::fs::write(
            cfg.paths.scenarios_file(),
            r#"[{"id": "S1", "title": "Transition", "narrative": "Elections are held."}]"#,
        )
        .unwrap();
        for start in ["2025-11-03", "2025-11-10"] {
            markdown::write_report(
                &cfg.paths.weekly_dir,
                &WeeklyPeriod::starting(date(start)),
                &format!("Week of {start}"),
            )
            .await
            .unwrap();
        }

        let text = brainstorm_context(&cfg).await.unwrap();
        let sections: Vec<&str> = text.split(SECTION_SEPARATOR).collect();
        assert_eq!(sections.len(), 4);
        assert_eq!(sections[0], "Background.");
        assert_eq!(sections[1], "### Current Scenarios\n**Transition**: Elections are held.");
        assert_eq!(sections[2], "### Latest Weekly Report\nWeek of 2025-11-10");
        assert!(sections[3].starts_with("### Recent Analytical Reasoning\n"));
    }
}
