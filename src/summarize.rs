//! Turning bounded evidence into report text.
//!
//! The daily brief is free text. The weekly report is two calls: one that
//! returns a JSON array of [`ScenarioAssessment`]s, then one that writes the
//! public narrative from those assessments.

use crate::api::AskAsync;
use crate::error::{Result, WatchError};
use crate::models::{Scenario, ScenarioAssessment};
use crate::utils::truncate_for_log;
use tracing::{info, instrument};

const DAILY_INSTRUCTION: &str = "Summarize only verified factual developments about Venezuela \
from the following articles. Avoid speculation, background, or analysis. Write a concise \
180-220 word daily update, then list 3-5 bullet points under **Key Developments Today**.";

const REASONING_INSTRUCTION: &str = "Evaluate how the plausibility of each scenario changed \
this week, based on factual developments. Return ONLY a JSON array. Each element has the \
fields \"id\", \"title\", \"plausibility\" (one of \"up\", \"down\", \"steady\"), \"reasoning\" \
(2-3 factual sentences citing this week's evidence) and \"updated_confidence\" (a number \
between 0 and 1).";

const NARRATIVE_INSTRUCTION: &str = "Write the public Weekly Watch Report for Venezuela from \
the internal analysis below, with three sections: Factual Summary (1-2 paragraphs on verified \
developments of the past 7 days), Scenario Assessment (qualitative shifts in plausibility, no \
numeric scores) and Forward Outlook (3-5 bullet points on issues to watch next week).";

async fn ask_text<A>(asker: &A, prompt: &str) -> Result<String>
where
    A: AskAsync<Response = String>,
{
    asker
        .ask(prompt)
        .await
        .map_err(|e| WatchError::Summarizer(e.to_string()))
}

/// Produce the daily brief from an already-bounded article context.
#[instrument(level = "info", skip_all, fields(context_chars = context.chars().count()))]
pub async fn daily_brief<A>(asker: &A, context: &str) -> Result<String>
where
    A: AskAsync<Response = String>,
{
    let prompt = format!("{DAILY_INSTRUCTION}\n\nArticles:\n{context}");
    let brief = ask_text(asker, &prompt).await?;
    info!(chars = brief.chars().count(), "Daily brief generated");
    Ok(brief)
}

/// Render scenarios the way the reasoning prompt lists them.
pub fn render_scenarios(scenarios: &[Scenario]) -> String {
    scenarios
        .iter()
        .map(|s| format!("### {} – {}\n{}\n", s.id, s.title, s.narrative))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Ask for structured scenario assessments and parse them strictly.
#[instrument(level = "info", skip_all, fields(scenarios = scenarios.len()))]
pub async fn assess_scenarios<A>(
    asker: &A,
    background: &str,
    scenarios: &[Scenario],
    context: &str,
) -> Result<Vec<ScenarioAssessment>>
where
    A: AskAsync<Response = String>,
{
    let prompt = format!(
        "{REASONING_INSTRUCTION}\n\n---\nContext:\n{background}\n\n---\nScenarios:\n{}\n\n---\nWeekly News Feed:\n{context}",
        render_scenarios(scenarios)
    );
    let raw = ask_text(asker, &prompt).await?;
    let assessments = parse_assessments(&raw)?;
    info!(count = assessments.len(), "Scenario assessments parsed");
    Ok(assessments)
}

/// Write the public weekly narrative from parsed assessments.
#[instrument(level = "info", skip_all)]
pub async fn weekly_narrative<A>(asker: &A, assessments: &[ScenarioAssessment]) -> Result<String>
where
    A: AskAsync<Response = String>,
{
    let analysis = serde_json::to_string_pretty(assessments)?;
    let prompt = format!("{NARRATIVE_INSTRUCTION}\n\nInternal analysis:\n{analysis}");
    ask_text(asker, &prompt).await
}

/// Remove a surrounding Markdown code fence and an optional `json` tag.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    if text.len() >= 6 && text.starts_with("```") && text.ends_with("```") {
        let inner = text[3..text.len() - 3].trim();
        let tagged = inner
            .get(..4)
            .is_some_and(|tag| tag.eq_ignore_ascii_case("json"));
        if tagged {
            return inner[4..].trim();
        }
        return inner;
    }
    text
}

/// Parse a model response into assessments; no fallback on malformed output.
pub fn parse_assessments(raw: &str) -> Result<Vec<ScenarioAssessment>> {
    let body = strip_code_fences(raw);
    let assessments: Vec<ScenarioAssessment> =
        serde_json::from_str(body).map_err(|source| WatchError::MalformedSummary {
            source,
            preview: truncate_for_log(body, 200),
        })?;

    if let Some(bad) = assessments
        .iter()
        .find(|a| !(0.0..=1.0).contains(&a.updated_confidence))
    {
        return Err(WatchError::InvalidAssessment(format!(
            "{}: updated_confidence {} is outside [0, 1]",
            bad.id, bad.updated_confidence
        )));
    }
    Ok(assessments)
}
