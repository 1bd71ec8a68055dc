//! Weekly scenario-tracking orchestration.
//!
//! Each completed Monday-to-Sunday week is fetched one local day at a time,
//! curated, assessed against the scenario definitions, narrated, saved, and
//! logged to the reasoning log.

use super::{RunOutcome, log_preview};
use crate::api::AskAsync;
use crate::config::WatchConfig;
use crate::context::build_context;
use crate::curate::Curator;
use crate::error::{Result, WatchError};
use crate::gaps::pending_periods;
use crate::models::{Article, Scenario};
use crate::outputs::{json, markdown, reasoning_log};
use crate::period::WeeklyPeriod;
use crate::search::{ArticleSource, fetch_windows};
use crate::summarize::{assess_scenarios, weekly_narrative};
use crate::utils::ensure_writable_dir;
use crate::window::{TimeWindow, local_today, target_week_start, window_for_date};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Read the scenario definitions. Required: a missing file is fatal.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn load_scenarios(path: &Path) -> Result<Vec<Scenario>> {
    let raw = match fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(WatchError::MissingConfig(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };
    let scenarios: Vec<Scenario> = serde_json::from_str(&raw)?;
    info!(count = scenarios.len(), "Loaded scenarios");
    Ok(scenarios)
}

/// Read the optional background notes; absent means empty.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn load_background(path: &Path) -> Result<String> {
    match fs::read_to_string(path).await {
        Ok(raw) => Ok(raw.trim().to_string()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("No background context file; continuing without it");
            Ok(String::new())
        }
        Err(e) => Err(e.into()),
    }
}

pub struct WeeklyPipeline<'a, S, R, N> {
    config: &'a WatchConfig,
    source: &'a S,
    reasoner: &'a R,
    narrator: &'a N,
}

impl<'a, S, R, N> WeeklyPipeline<'a, S, R, N>
where
    S: ArticleSource,
    R: AskAsync<Response = String>,
    N: AskAsync<Response = String>,
{
    pub fn new(config: &'a WatchConfig, source: &'a S, reasoner: &'a R, narrator: &'a N) -> Self {
        Self {
            config,
            source,
            reasoner,
            narrator,
        }
    }

    /// Generate every missing weekly report up to the last completed week.
    #[instrument(level = "info", skip_all, fields(%now))]
    pub async fn run(&self, now: DateTime<Utc>) -> Result<RunOutcome<WeeklyPeriod>> {
        let offset = self.config.offset()?;
        let today = local_today(now, offset);
        let target = WeeklyPeriod::starting(target_week_start(today));
        let paths = &self.config.paths;
        info!(%today, period = %target, "Local today");

        let pending = pending_periods(&paths.weekly_dir, target).await?;
        if pending.is_empty() {
            return Ok(RunOutcome::UpToDate);
        }
        info!(pending = pending.len(), "Weekly reports to generate");

        let background = load_background(&paths.background_file()).await?;
        let scenarios = load_scenarios(&paths.scenarios_file()).await?;
        ensure_writable_dir(&paths.weekly_dir).await?;

        let curator = Curator::new(
            &self.config.weekly_keywords,
            &self.config.anchor_term,
            self.config.min_description_len,
        );

        let mut generated = Vec::new();
        for week in pending {
            let produced = self
                .generate(week, today, offset, &curator, &background, &scenarios)
                .await?;
            if !produced {
                return Ok(RunOutcome::NoRelevantContent {
                    period: week,
                    generated,
                });
            }
            generated.push(week);
        }
        Ok(RunOutcome::Completed { generated })
    }

    /// Fetch the week's articles, reusing a saved raw fetch when present.
    ///
    /// Empty fetches are not cached, so a week that came back empty is
    /// fetched again on the next run.
    #[instrument(level = "info", skip_all, fields(%week))]
    async fn fetch_week(&self, week: WeeklyPeriod, offset: FixedOffset) -> Result<Vec<Article>> {
        let cache_path = json::weekly_raw_path(&self.config.paths.raw_dir, &week);
        if let Some(cached) = json::read_cached_articles(&cache_path).await? {
            return Ok(cached);
        }

        let windows: Vec<TimeWindow> = week.days().map(|d| window_for_date(d, offset)).collect();
        let raw = fetch_windows(
            self.source,
            &self.config.languages,
            &windows,
            self.config.request_delay(),
        )
        .await?;
        if !raw.is_empty() {
            json::write_json(&cache_path, &raw).await?;
        }
        Ok(raw)
    }

    /// Produce one weekly report; `false` when nothing relevant was found.
    #[instrument(level = "info", skip_all, fields(%week))]
    async fn generate(
        &self,
        week: WeeklyPeriod,
        today: NaiveDate,
        offset: FixedOffset,
        curator: &Curator,
        background: &str,
        scenarios: &[Scenario],
    ) -> Result<bool> {
        let paths = &self.config.paths;
        info!(start = %week.start(), end = %week.end(), "Generating Weekly Watch");

        let raw = self.fetch_week(week, offset).await?;
        if raw.is_empty() {
            warn!("No articles for this week");
            return Ok(false);
        }

        let curated = curator.curate(raw);
        json::write_curated(&json::weekly_curated_path(&paths.curated_dir, &week), &curated)
            .await?;
        if curated.is_empty() {
            warn!("No curated articles for this week");
            return Ok(false);
        }
        info!(count = curated.len(), "Curated relevant articles");

        let context = build_context(&curated, self.config.weekly_context_cap);
        let assessments = assess_scenarios(self.reasoner, background, scenarios, &context).await?;
        let narrative = weekly_narrative(self.narrator, &assessments).await?;

        // The report marks the week as done, so it is written last.
        reasoning_log::append_assessments(&paths.reasoning_log, &week, today, &assessments)
            .await?;
        markdown::write_report(&paths.weekly_dir, &week, &narrative).await?;

        log_preview(&narrative);
        for a in &assessments {
            info!(id = %a.id, plausibility = %a.plausibility, reasoning = %a.reasoning, "Scenario reasoning");
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::ScriptedAsker;
    use crate::config::PathsConfig;
    use crate::models::ReasoningLogEntry;
    use crate::period::ReportPeriod;
    use chrono::TimeZone;
    use std::cell::Cell;

    /// One relevant article per request, except for days listed in `quiet_days`.
    #[derive(Default)]
    struct WeekSource {
        quiet_days: Vec<String>,
        calls: Cell<usize>,
    }

    impl ArticleSource for WeekSource {
        async fn search(&self, lang: &str, window: &TimeWindow) -> Result<Vec<Article>> {
            self.calls.set(self.calls.get() + 1);
            let day = window.start.date_naive().to_string();
            if self.quiet_days.contains(&day) {
                return Ok(Vec::new());
            }
            Ok(vec![Article {
                title: Some(format!("Venezuela {day} {lang}")),
                description: Some(
                    "Opposition figures met in Caracas to discuss the sanction regime."
                        .to_string(),
                ),
                url: Some(format!("https://example.com/{day}/{lang}")),
                ..Default::default()
            }])
        }
    }

    const SCENARIOS: &str = r#"[
        {"id": "S1", "title": "Negotiated transition", "narrative": "Talks lead to elections."},
        {"id": "S2", "title": "Status quo", "narrative": "The government consolidates."}
    ]"#;

    const ASSESSMENTS: &str = r#"```json
[
  {"id": "S1", "title": "Negotiated transition", "plausibility": "up",
   "reasoning": "Talks resumed.", "updated_confidence": 0.4},
  {"id": "S2", "title": "Status quo", "plausibility": "steady",
   "reasoning": "No change.", "updated_confidence": 0.5}
]
```"#;

    fn config(root: &Path) -> WatchConfig {
        WatchConfig {
            request_delay_ms: 0,
            paths: PathsConfig {
                daily_dir: root.join("outputs/daily"),
                weekly_dir: root.join("outputs/weekly"),
                raw_dir: root.join("data/raw"),
                curated_dir: root.join("data/curated"),
                context_dir: root.join("data/context"),
                reasoning_log: root.join("data/logs/scenarios_log.jsonl"),
            },
            ..Default::default()
        }
    }

    fn write_scenarios(cfg: &WatchConfig) {
        std::fs::create_dir_all(&cfg.paths.context_dir).unwrap();
        std::fs::write(cfg.paths.scenarios_file(), SCENARIOS).unwrap();
    }

    fn week(m: u32, d: u32) -> WeeklyPeriod {
        WeeklyPeriod::starting(NaiveDate::from_ymd_opt(2025, m, d).unwrap())
    }

    // Thursday 2025-11-20, 15:00 local (UTC-4). Last completed week: 11-10..11-16.
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 20, 19, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_first_run_generates_last_completed_week() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config(tmp.path());
        write_scenarios(&cfg);
        let source = WeekSource::default();
        let reasoner = ScriptedAsker::new([ASSESSMENTS]);
        let narrator = ScriptedAsker::new(["Weekly narrative"]);

        let outcome = WeeklyPipeline::new(&cfg, &source, &reasoner, &narrator)
            .run(now())
            .await
            .unwrap();

        assert_eq!(outcome, RunOutcome::Completed { generated: vec![week(11, 10)] });
        // 7 days x 2 languages.
        assert_eq!(source.calls.get(), 14);

        let report = std::fs::read_to_string(
            cfg.paths
                .weekly_dir
                .join("venezuela_week_2025-11-10_to_2025-11-16.md"),
        )
        .unwrap();
        assert_eq!(report, "Weekly narrative");

        let log = std::fs::read_to_string(&cfg.paths.reasoning_log).unwrap();
        let entries: Vec<ReasoningLogEntry> =
            log.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].week_start.to_string(), "2025-11-10");
        assert_eq!(entries[0].report_generated_on.to_string(), "2025-11-20");

        assert!(reasoner.prompts.borrow()[0].contains("### S1 – Negotiated transition"));
        assert!(
            cfg.paths
                .raw_dir
                .join("news_week_2025-11-10_to_2025-11-16.json")
                .exists()
        );
    }

    #[tokio::test]
    async fn test_up_to_date_skips_scenario_loading() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config(tmp.path());
        std::fs::create_dir_all(&cfg.paths.weekly_dir).unwrap();
        std::fs::write(cfg.paths.weekly_dir.join(week(11, 10).artifact_key()), "x").unwrap();
        let source = WeekSource::default();
        let asker = ScriptedAsker::default();

        // No scenarios file exists, yet the run succeeds.
        let outcome = WeeklyPipeline::new(&cfg, &source, &asker, &asker)
            .run(now())
            .await
            .unwrap();
        assert_eq!(outcome, RunOutcome::UpToDate);
        assert_eq!(source.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_missing_scenarios_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config(tmp.path());
        let source = WeekSource::default();
        let asker = ScriptedAsker::default();

        let err = WeeklyPipeline::new(&cfg, &source, &asker, &asker)
            .run(now())
            .await
            .unwrap_err();
        assert!(matches!(err, WatchError::MissingConfig(p) if p.ends_with("venezuela_scenarios.json")));
        assert_eq!(source.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_backfills_weeks_then_stops_on_quiet_week() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config(tmp.path());
        write_scenarios(&cfg);
        std::fs::create_dir_all(&cfg.paths.weekly_dir).unwrap();
        std::fs::write(cfg.paths.weekly_dir.join(week(10, 20).artifact_key()), "x").unwrap();

        // Week of 11-03 is entirely quiet.
        let source = WeekSource {
            quiet_days: (3..=9).map(|d| format!("2025-11-{d:02}")).collect(),
            ..Default::default()
        };
        let reasoner = ScriptedAsker::new([ASSESSMENTS, ASSESSMENTS]);
        let narrator = ScriptedAsker::new(["n1", "n2"]);

        let outcome = WeeklyPipeline::new(&cfg, &source, &reasoner, &narrator)
            .run(now())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            RunOutcome::NoRelevantContent {
                period: week(11, 3),
                generated: vec![week(10, 27)],
            }
        );
        assert!(!cfg.paths.weekly_dir.join(week(11, 10).artifact_key()).exists());
        // Empty weeks are not cached.
        assert!(!cfg.paths.raw_dir.join("news_week_2025-11-03_to_2025-11-09.json").exists());
        assert_eq!(source.calls.get(), 28);
    }

    #[tokio::test]
    async fn test_cached_week_skips_fetch() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config(tmp.path());
        write_scenarios(&cfg);
        let cached = vec![Article {
            title: Some("Venezuela cached".to_string()),
            description: Some("Maduro and the opposition traded statements on Friday night.".to_string()),
            ..Default::default()
        }];
        json::write_json(&json::weekly_raw_path(&cfg.paths.raw_dir, &week(11, 10)), &cached)
            .await
            .unwrap();
        let source = WeekSource::default();
        let reasoner = ScriptedAsker::new([ASSESSMENTS]);
        let narrator = ScriptedAsker::new(["n"]);

        WeeklyPipeline::new(&cfg, &source, &reasoner, &narrator)
            .run(now())
            .await
            .unwrap();

        assert_eq!(source.calls.get(), 0);
        assert!(reasoner.prompts.borrow()[0].contains("Venezuela cached"));
    }

    #[tokio::test]
    async fn test_failed_log_append_leaves_week_pending() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config(tmp.path());
        write_scenarios(&cfg);
        // A directory where the log file should be makes the append fail.
        std::fs::create_dir_all(&cfg.paths.reasoning_log).unwrap();
        let source = WeekSource::default();
        let reasoner = ScriptedAsker::new([ASSESSMENTS]);
        let narrator = ScriptedAsker::new(["Weekly narrative"]);

        let err = WeeklyPipeline::new(&cfg, &source, &reasoner, &narrator)
            .run(now())
            .await
            .unwrap_err();

        assert!(matches!(err, WatchError::Io(_)));
        assert!(!cfg.paths.weekly_dir.join(week(11, 10).artifact_key()).exists());
        let pending = pending_periods(&cfg.paths.weekly_dir, week(11, 10)).await.unwrap();
        assert_eq!(pending, vec![week(11, 10)]);
    }

    #[tokio::test]
    async fn test_malformed_reasoning_is_fatal_and_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config(tmp.path());
        write_scenarios(&cfg);
        let source = WeekSource::default();
        let reasoner = ScriptedAsker::new(["I think things are broadly stable."]);
        let narrator = ScriptedAsker::default();

        let err = WeeklyPipeline::new(&cfg, &source, &reasoner, &narrator)
            .run(now())
            .await
            .unwrap_err();

        assert!(matches!(err, WatchError::MalformedSummary { .. }));
        assert!(!cfg.paths.weekly_dir.join(week(11, 10).artifact_key()).exists());
        assert!(!cfg.paths.reasoning_log.exists());
    }

    #[tokio::test]
    async fn test_background_is_optional() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(load_background(&tmp.path().join("none.md")).await.unwrap(), "");
        std::fs::write(tmp.path().join("bg.md"), "  Background notes.\n").unwrap();
        assert_eq!(
            load_background(&tmp.path().join("bg.md")).await.unwrap(),
            "Background notes."
        );
    }
}
