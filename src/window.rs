//! Calendar arithmetic for report periods.
//!
//! Local time is a fixed UTC offset. Every function takes `now` explicitly
//! so callers (and tests) decide what time it is.

use crate::error::{Result, WatchError};
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, SecondsFormat, Utc};

/// Build the fixed offset for `hours` east of UTC (negative is west).
pub fn local_offset(hours: i32) -> Result<FixedOffset> {
    if !(-23..=23).contains(&hours) {
        return Err(WatchError::InvalidConfig(format!(
            "local_offset_hours must be within -23..=23, got {hours}"
        )));
    }
    FixedOffset::east_opt(hours * 3600)
        .ok_or_else(|| WatchError::InvalidConfig(format!("invalid UTC offset {hours}h")))
}

/// The local calendar date at `now`.
pub fn local_today(now: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}

/// The most recently completed local day: always yesterday, whatever the hour.
pub fn reportable_date(now: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    local_today(now, offset) - Duration::days(1)
}

/// Half-open absolute interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl TimeWindow {
    /// `start` as an RFC 3339 UTC timestamp, e.g. `2025-11-10T04:00:00Z`.
    pub fn from_param(&self) -> String {
        wire_timestamp(self.start)
    }

    /// `end` as an RFC 3339 UTC timestamp.
    pub fn to_param(&self) -> String {
        wire_timestamp(self.end)
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}", self.from_param(), self.to_param())
    }
}

fn wire_timestamp(t: DateTime<FixedOffset>) -> String {
    t.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// `[local midnight of d, local midnight of d + 1)`.
pub fn window_for_date(d: NaiveDate, offset: FixedOffset) -> TimeWindow {
    let local_midnight = d.and_time(NaiveTime::MIN);
    let utc_midnight = local_midnight - Duration::seconds(i64::from(offset.local_minus_utc()));
    let start = DateTime::from_naive_utc_and_offset(utc_midnight, offset);
    TimeWindow {
        start,
        end: start + Duration::days(1),
    }
}

/// Monday of the week containing `d`.
pub fn current_week_monday(d: NaiveDate) -> NaiveDate {
    d - Duration::days(i64::from(d.weekday().num_days_from_monday()))
}

/// Monday of the most recent fully completed Monday-to-Sunday week.
pub fn target_week_start(today: NaiveDate) -> NaiveDate {
    current_week_monday(today) - Duration::days(7)
}
