//! Daily brief orchestration.

use super::{RunOutcome, log_preview};
use crate::api::AskAsync;
use crate::config::WatchConfig;
use crate::context::build_context;
use crate::curate::Curator;
use crate::error::Result;
use crate::gaps::pending_periods;
use crate::outputs::{json, markdown};
use crate::period::DailyPeriod;
use crate::search::{ArticleSource, fetch_windows};
use crate::summarize::daily_brief;
use crate::utils::ensure_writable_dir;
use crate::window::{reportable_date, window_for_date};
use chrono::{DateTime, FixedOffset, Utc};
use std::path::PathBuf;
use tracing::{info, instrument, warn};

pub struct DailyPipeline<'a, S, A> {
    config: &'a WatchConfig,
    source: &'a S,
    asker: &'a A,
}

impl<'a, S, A> DailyPipeline<'a, S, A>
where
    S: ArticleSource,
    A: AskAsync<Response = String>,
{
    pub fn new(config: &'a WatchConfig, source: &'a S, asker: &'a A) -> Self {
        Self {
            config,
            source,
            asker,
        }
    }

    /// Generate every missing daily report up to yesterday (local time).
    #[instrument(level = "info", skip_all, fields(%now))]
    pub async fn run(&self, now: DateTime<Utc>) -> Result<RunOutcome<DailyPeriod>> {
        let offset = self.config.offset()?;
        let target = DailyPeriod(reportable_date(now, offset));
        let daily_dir = &self.config.paths.daily_dir;

        let pending = pending_periods(daily_dir, target).await?;
        if pending.is_empty() {
            return Ok(RunOutcome::UpToDate);
        }
        info!(period = %target, pending = pending.len(), "Daily reports to generate");
        ensure_writable_dir(daily_dir).await?;

        let curator = Curator::new(
            &self.config.daily_keywords,
            &self.config.anchor_term,
            self.config.min_description_len,
        );

        let mut generated = Vec::new();
        for period in pending {
            match self.generate(period, offset, &curator).await? {
                Some(_) => generated.push(period),
                None => return Ok(RunOutcome::NoRelevantContent { period, generated }),
            }
        }
        Ok(RunOutcome::Completed { generated })
    }

    /// Produce one report; `None` when nothing relevant was found.
    #[instrument(level = "info", skip_all, fields(%period))]
    async fn generate(
        &self,
        period: DailyPeriod,
        offset: FixedOffset,
        curator: &Curator,
    ) -> Result<Option<PathBuf>> {
        let paths = &self.config.paths;
        let window = window_for_date(period.date(), offset);
        info!(%window, "Fetching daily window");

        let raw = fetch_windows(
            self.source,
            &self.config.languages,
            &[window],
            self.config.request_delay(),
        )
        .await?;
        json::write_json(&json::daily_raw_path(&paths.raw_dir, &period), &raw).await?;

        let curated = curator.curate(raw);
        json::write_curated(&json::daily_curated_path(&paths.curated_dir, &period), &curated)
            .await?;
        if curated.is_empty() {
            warn!("No curated articles for this day");
            return Ok(None);
        }
        info!(count = curated.len(), "Curated relevant articles");

        let context = build_context(&curated, self.config.daily_context_cap);
        let brief = daily_brief(self.asker, &context).await?;
        let path = markdown::write_report(&paths.daily_dir, &period, &brief).await?;
        log_preview(&brief);
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::tests::ScriptedAsker;
    use crate::config::PathsConfig;
    use crate::error::WatchError;
    use crate::models::Article;
    use crate::period::ReportPeriod;
    use crate::window::TimeWindow;
    use chrono::{NaiveDate, TimeZone};
    use std::cell::RefCell;
    use std::path::Path;

    /// Serves articles keyed by the UTC start of the requested window.
    #[derive(Default)]
    struct DaySource {
        by_window_start: Vec<(String, Vec<Article>)>,
        requests: RefCell<Vec<String>>,
    }

    impl ArticleSource for DaySource {
        async fn search(&self, lang: &str, window: &TimeWindow) -> Result<Vec<Article>> {
            self.requests
                .borrow_mut()
                .push(format!("{lang}@{}", window.from_param()));
            if lang != "en" {
                return Ok(Vec::new());
            }
            Ok(self
                .by_window_start
                .iter()
                .find(|(start, _)| *start == window.from_param())
                .map(|(_, a)| a.clone())
                .unwrap_or_default())
        }
    }

    struct FailingSource;

    impl ArticleSource for FailingSource {
        async fn search(&self, _lang: &str, _window: &TimeWindow) -> Result<Vec<Article>> {
            Err(WatchError::InvalidConfig("transport down".to_string()))
        }
    }

    fn relevant(title: &str) -> Article {
        Article {
            title: Some(format!("Venezuela {title}")),
            description: Some(
                "Maduro addressed the National Assembly in Caracas on the economy today."
                    .to_string(),
            ),
            content: Some("Officials discussed PDVSA output.".to_string()),
            url: Some(format!("https://example.com/{title}")),
            ..Default::default()
        }
    }

    fn irrelevant() -> Article {
        Article {
            title: Some("Weather".to_string()),
            description: Some("Rain expected across the region for most of the week ahead.".to_string()),
            ..Default::default()
        }
    }

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

    // 2025-11-14 16:00 UTC is 12:00 local (UTC-4): target day is 2025-11-13.
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 14, 16, 0, 0).unwrap()
    }

    fn day(d: u32) -> DailyPeriod {
        DailyPeriod(NaiveDate::from_ymd_opt(2025, 11, d).unwrap())
    }

    fn seed(dir: &Path, period: DailyPeriod) {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(dir.join(period.artifact_key()), "existing").unwrap();
    }

    #[tokio::test]
    async fn test_first_run_generates_only_yesterday() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config(tmp.path());
        let source = DaySource {
            by_window_start: vec![(
                "2025-11-13T04:00:00Z".to_string(),
                vec![irrelevant(), relevant("a")],
            )],
            ..Default::default()
        };
        let asker = ScriptedAsker::new(["Daily brief for the 13th"]);

        let outcome = DailyPipeline::new(&cfg, &source, &asker).run(now()).await.unwrap();

        assert_eq!(outcome, RunOutcome::Completed { generated: vec![day(13)] });
        let report =
            std::fs::read_to_string(cfg.paths.daily_dir.join("venezuela_2025-11-13.md")).unwrap();
        assert_eq!(report, "Daily brief for the 13th");

        let prompt = &asker.prompts.borrow()[0];
        assert!(prompt.contains("Venezuela a"));
        assert!(!prompt.contains("Weather"));

        let curated: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(cfg.paths.curated_dir.join("venezuela_2025-11-13.json"))
                .unwrap(),
        )
        .unwrap();
        assert_eq!(curated.as_array().unwrap().len(), 1);
        assert!(cfg.paths.raw_dir.join("news_2025-11-13.json").exists());
        assert_eq!(
            *source.requests.borrow(),
            vec!["en@2025-11-13T04:00:00Z", "es@2025-11-13T04:00:00Z"]
        );
    }

    #[tokio::test]
    async fn test_up_to_date_does_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config(tmp.path());
        seed(&cfg.paths.daily_dir, day(13));
        let source = DaySource::default();
        let asker = ScriptedAsker::default();

        let outcome = DailyPipeline::new(&cfg, &source, &asker).run(now()).await.unwrap();

        assert_eq!(outcome, RunOutcome::UpToDate);
        assert!(source.requests.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_backfills_gap_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config(tmp.path());
        seed(&cfg.paths.daily_dir, day(10));
        let source = DaySource {
            by_window_start: vec![
                ("2025-11-11T04:00:00Z".to_string(), vec![relevant("eleven")]),
                ("2025-11-12T04:00:00Z".to_string(), vec![relevant("twelve")]),
                ("2025-11-13T04:00:00Z".to_string(), vec![relevant("thirteen")]),
            ],
            ..Default::default()
        };
        let asker = ScriptedAsker::new(["r11", "r12", "r13"]);

        let outcome = DailyPipeline::new(&cfg, &source, &asker).run(now()).await.unwrap();

        assert_eq!(outcome.generated(), &[day(11), day(12), day(13)]);
        for (d, text) in [(11, "r11"), (12, "r12"), (13, "r13")] {
            let path = cfg
                .paths
                .daily_dir
                .join(format!("venezuela_2025-11-{d}.md"));
            assert_eq!(std::fs::read_to_string(path).unwrap(), text);
        }
    }

    #[tokio::test]
    async fn test_empty_day_aborts_remaining_backfill() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config(tmp.path());
        seed(&cfg.paths.daily_dir, day(10));
        let source = DaySource {
            by_window_start: vec![
                ("2025-11-11T04:00:00Z".to_string(), vec![relevant("eleven")]),
                ("2025-11-12T04:00:00Z".to_string(), vec![irrelevant()]),
                ("2025-11-13T04:00:00Z".to_string(), vec![relevant("thirteen")]),
            ],
            ..Default::default()
        };
        let asker = ScriptedAsker::new(["r11", "r12", "r13"]);

        let outcome = DailyPipeline::new(&cfg, &source, &asker).run(now()).await.unwrap();

        assert_eq!(
            outcome,
            RunOutcome::NoRelevantContent {
                period: day(12),
                generated: vec![day(11)],
            }
        );
        assert!(!cfg.paths.daily_dir.join("venezuela_2025-11-12.md").exists());
        assert!(!cfg.paths.daily_dir.join("venezuela_2025-11-13.md").exists());
        // The 13th was never fetched.
        assert_eq!(source.requests.borrow().len(), 4);
        assert_eq!(asker.prompts.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_transport_error_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config(tmp.path());
        let asker = ScriptedAsker::default();
        let result = DailyPipeline::new(&cfg, &FailingSource, &asker).run(now()).await;
        assert!(result.is_err());
    }
}
