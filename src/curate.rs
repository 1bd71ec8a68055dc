//! Keyword filtering and relevance ranking.
//!
//! An article survives when its lowercased title, description and content
//! contain the anchor term and at least one keyword, and its description is
//! long enough to be more than a stub. Survivors are scored by total keyword
//! frequency and stably sorted, highest first.

use crate::models::{Article, ScoredArticle};
use tracing::{debug, instrument};

/// Keyword set and thresholds for one curation pass.
#[derive(Debug, Clone)]
pub struct Curator {
    keywords: Vec<String>,
    anchor: String,
    min_description_len: usize,
}

impl Curator {
    /// Keywords and anchor are matched case-insensitively; empty keywords are dropped.
    pub fn new<I, S>(keywords: I, anchor: &str, min_description_len: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            anchor: anchor.to_lowercase(),
            min_description_len,
        }
    }

    /// Score `article`, or `None` if it is rejected.
    pub fn score(&self, article: &Article) -> Option<u32> {
        let haystack = haystack(article);

        if !haystack.contains(&self.anchor) {
            return None;
        }
        if !self.keywords.iter().any(|k| haystack.contains(k.as_str())) {
            return None;
        }
        if article.description().chars().count() < self.min_description_len {
            return None;
        }

        let hits: usize = self
            .keywords
            .iter()
            .map(|k| haystack.matches(k.as_str()).count())
            .sum();
        Some(u32::try_from(hits).unwrap_or(u32::MAX))
    }

    /// Filter and rank `raw`, preserving input order among equal scores.
    #[instrument(level = "info", skip_all, fields(input = raw.len()))]
    pub fn curate(&self, raw: Vec<Article>) -> Vec<ScoredArticle> {
        let mut curated: Vec<ScoredArticle> = raw
            .into_iter()
            .filter_map(|article| {
                let score = self.score(&article)?;
                Some(ScoredArticle { article, score })
            })
            .collect();

        // `sort_by` is stable.
        curated.sort_by(|a, b| b.score.cmp(&a.score));
        debug!(kept = curated.len(), "Curated articles");
        curated
    }
}

/// Free-function form of [`Curator::curate`].
pub fn curate<S: AsRef<str>>(
    raw: Vec<Article>,
    keywords: &[S],
    anchor: &str,
    min_description_len: usize,
) -> Vec<ScoredArticle> {
    Curator::new(keywords, anchor, min_description_len).curate(raw)
}

fn haystack(article: &Article) -> String {
    format!(
        "{} {} {}",
        article.title(),
        article.description(),
        article.content()
    )
    .to_lowercase()
}
