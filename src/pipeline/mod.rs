//! Report orchestration.
//!
//! Both variants follow the same sequence for every pending period, oldest
//! first: window → fetch → curate → (abort if empty) → summarize → persist.
//! An empty curated set stops the whole run; later periods stay pending for
//! the next invocation.
//!
//! - [`daily::DailyPipeline`]: one report per local day
//! - [`weekly::WeeklyPipeline`]: one report per Monday-to-Sunday week plus
//!   the reasoning log

pub mod daily;
pub mod weekly;

use crate::period::ReportPeriod;
use crate::utils::truncate_for_log;
use tracing::info;

/// How a run ended. All three are successful exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome<P> {
    /// No period was pending.
    UpToDate,
    /// Every pending period was generated, in order.
    Completed { generated: Vec<P> },
    /// `period` had no relevant articles; nothing after it was attempted.
    NoRelevantContent { period: P, generated: Vec<P> },
}

impl<P: ReportPeriod> RunOutcome<P> {
    pub fn generated(&self) -> &[P] {
        match self {
            RunOutcome::UpToDate => &[],
            RunOutcome::Completed { generated } => generated,
            RunOutcome::NoRelevantContent { generated, .. } => generated,
        }
    }

    /// Log a one-line summary of the run.
    pub fn log_summary(&self, kind: &str) {
        match self {
            RunOutcome::UpToDate => {
                info!(kind, "Reports are up to date. Nothing to generate.")
            }
            RunOutcome::Completed { generated } => {
                info!(kind, count = generated.len(), "All pending reports generated")
            }
            RunOutcome::NoRelevantContent { period, generated } => info!(
                kind,
                %period,
                generated = generated.len(),
                "No relevant articles; stopping early and leaving remaining periods pending"
            ),
        }
    }
}

const PREVIEW_BYTES: usize = 800;

pub(crate) fn log_preview(text: &str) {
    info!(preview = %truncate_for_log(text, PREVIEW_BYTES), "Report preview");
}
