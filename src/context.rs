//! Bounded evidence text for the summarizer.

use crate::models::{Article, ScoredArticle};

/// Something that can be rendered as an evidence fragment.
pub trait Evidence {
    fn article(&self) -> &Article;
}

impl Evidence for Article {
    fn article(&self) -> &Article {
        self
    }
}

impl Evidence for ScoredArticle {
    fn article(&self) -> &Article {
        &self.article
    }
}

/// `- <title> [<url>]\n<description>\n<content>\n`
pub fn render_fragment(article: &Article) -> String {
    format!(
        "- {} [{}]\n{}\n{}\n",
        article.title(),
        article.url(),
        article.description(),
        article.content()
    )
}

/// Join item fragments, in order, without exceeding `cap_chars` characters.
///
/// A fragment is accepted while the running total of fragment lengths stays
/// within the cap; the blank-line separators between fragments are not
/// counted. The first fragment that does not fit ends the assembly, so no
/// later item is ever considered.
pub fn build_context<E: Evidence>(items: &[E], cap_chars: usize) -> String {
    let mut pieces = Vec::new();
    let mut used = 0usize;

    for item in items {
        let piece = render_fragment(item.article());
        let len = piece.chars().count();
        if used + len > cap_chars {
            break;
        }
        used += len;
        pieces.push(piece);
    }
    pieces.join("\n")
}
