//! Report periods and the artifact filenames that identify them.
//!
//! | Period | Artifact key |
//! |--------|--------------|
//! | Daily  | `venezuela_2025-11-11.md` |
//! | Weekly | `venezuela_week_2025-11-10_to_2025-11-16.md` |
//!
//! A key always parses back into the period that produced it.

use chrono::{Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

const DATE_FORMAT: &str = "%Y-%m-%d";

static DAILY_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^venezuela_(\d{4}-\d{2}-\d{2})\.md$").expect("valid regex"));

static WEEKLY_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^venezuela_week_(\d{4}-\d{2}-\d{2})_to_(\d{4}-\d{2}-\d{2})\.md$")
        .expect("valid regex")
});

/// A reporting interval with a canonical identifier and a successor.
pub trait ReportPeriod: Copy + Ord + fmt::Display {
    /// The period immediately after this one.
    fn next(&self) -> Self;

    /// Filename of the persisted report for this period.
    fn artifact_key(&self) -> String;

    /// Inverse of [`ReportPeriod::artifact_key`]; `None` for unrelated names.
    fn parse_artifact_key(key: &str) -> Option<Self>;
}

/// One local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DailyPeriod(pub NaiveDate);

impl DailyPeriod {
    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for DailyPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl ReportPeriod for DailyPeriod {
    fn next(&self) -> Self {
        DailyPeriod(self.0 + Duration::days(1))
    }

    fn artifact_key(&self) -> String {
        format!("venezuela_{self}.md")
    }

    fn parse_artifact_key(key: &str) -> Option<Self> {
        let caps = DAILY_KEY.captures(key)?;
        NaiveDate::parse_from_str(&caps[1], DATE_FORMAT)
            .ok()
            .map(DailyPeriod)
    }
}

/// A Monday-to-Sunday week, both ends inclusive.
///
/// Ordering and equality follow `start`; `end` is always `start + 6 days`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeeklyPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl WeeklyPeriod {
    pub fn starting(start: NaiveDate) -> Self {
        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// The seven local days of the week in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let start = self.start;
        (0..7).map(move |i| start + Duration::days(i))
    }

    /// `<start>_to_<end>`, shared by report, raw cache and curated dump names.
    pub fn label(&self) -> String {
        format!(
            "{}_to_{}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

impl fmt::Display for WeeklyPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl ReportPeriod for WeeklyPeriod {
    fn next(&self) -> Self {
        WeeklyPeriod::starting(self.start + Duration::days(7))
    }

    fn artifact_key(&self) -> String {
        format!("venezuela_week_{}.md", self.label())
    }

    /// Only the start date identifies the week; a stored end date that does
    /// not match `start + 6` is normalised rather than rejected.
    fn parse_artifact_key(key: &str) -> Option<Self> {
        let caps = WEEKLY_KEY.captures(key)?;
        NaiveDate::parse_from_str(&caps[1], DATE_FORMAT)
            .ok()
            .map(WeeklyPeriod::starting)
    }
}
