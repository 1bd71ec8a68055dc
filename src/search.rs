//! News search collaborator.
//!
//! [`GNewsClient`] queries the GNews v4 search endpoint for one language and
//! one time window per request. A non-success status is logged and counts as
//! zero articles; transport failures (including the per-request timeout)
//! propagate and end the run. The API key travels in the query string, so
//! request URLs are stripped from every error before it leaves this module.

use crate::config::WatchConfig;
use crate::error::Result;
use crate::models::Article;
use crate::utils::truncate_for_log;
use crate::window::TimeWindow;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Anything that can return articles for a language and a time window.
pub trait ArticleSource {
    async fn search(&self, lang: &str, window: &TimeWindow) -> Result<Vec<Article>>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    articles: Vec<Article>,
}

/// GNews search API client.
pub struct GNewsClient {
    client: Client,
    base_url: Url,
    api_key: String,
    query: String,
    max_articles: u32,
}

impl std::fmt::Debug for GNewsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GNewsClient")
            .field("base_url", &self.base_url.as_str())
            .field("query", &self.query)
            .field("max_articles", &self.max_articles)
            .finish()
    }
}

impl GNewsClient {
    pub fn new(config: &WatchConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("venezuela_watch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: Url::parse(&config.search_base_url)?,
            api_key,
            query: config.query.clone(),
            max_articles: config.max_articles_per_request,
        })
    }
}

impl ArticleSource for GNewsClient {
    #[instrument(level = "info", skip_all, fields(%lang, from = %window.from_param(), to = %window.to_param()))]
    async fn search(&self, lang: &str, window: &TimeWindow) -> Result<Vec<Article>> {
        let t0 = Instant::now();
        let max = self.max_articles.to_string();
        let response = self
            .client
            .get(self.base_url.clone())
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("q", self.query.as_str()),
                ("lang", lang),
                ("from", window.from_param().as_str()),
                ("to", window.to_param().as_str()),
                ("max", max.as_str()),
            ])
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                body = %truncate_for_log(&body, 300),
                "Search request failed; counting zero articles"
            );
            return Ok(Vec::new());
        }

        let body = response.text().await.map_err(reqwest::Error::without_url)?;
        let payload: SearchResponse = serde_json::from_str(&body)?;
        info!(
            count = payload.articles.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Search returned articles"
        );
        Ok(payload.articles)
    }
}

/// Query every language for every window, in order, tagging each article
/// with the language it was requested in.
///
/// `delay` is slept between consecutive requests to stay under the
/// upstream rate limit.
#[instrument(level = "info", skip_all, fields(windows = windows.len(), languages = languages.len()))]
pub async fn fetch_windows<S: ArticleSource>(
    source: &S,
    languages: &[String],
    windows: &[TimeWindow],
    delay: Duration,
) -> Result<Vec<Article>> {
    let mut results = Vec::new();
    let mut first = true;

    for window in windows {
        debug!(%window, "Fetching window");
        for lang in languages {
            if !first && !delay.is_zero() {
                sleep(delay).await;
            }
            first = false;

            let mut articles = source.search(lang, window).await?;
            for a in &mut articles {
                a.lang = Some(lang.clone());
            }
            results.extend(articles);
        }
    }

    info!(count = results.len(), "Fetched raw articles");
    Ok(results)
}
