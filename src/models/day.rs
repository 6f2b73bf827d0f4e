//! Calendar-day keys and window arithmetic.
//!
//! Snapshot documents are keyed by day in fixed-width `YYYYMMDD` form. At
//! eight ASCII digits the lexicographic order of the string form equals
//! chronological order, which is what makes the accumulated raw store a
//! plain ordered map.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, Utc};
use serde::{Deserialize, Serialize};

/// A single calendar day, wire form `YYYYMMDD`.
///
/// Ordering is chronological. Construction validates both the fixed-width
/// digit form and that the digits name a real calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DayStamp(NaiveDate);

/// Error raised when a day string is not a valid `YYYYMMDD` date.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid day stamp '{input}': expected 8 digits YYYYMMDD naming a real date")]
pub struct DayStampError {
    pub input: String,
}

impl DayStamp {
    /// Parse a `YYYYMMDD` string.
    pub fn parse(s: &str) -> Result<Self, DayStampError> {
        let err = || DayStampError {
            input: s.to_string(),
        };

        if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }

        let year: i32 = s[0..4].parse().map_err(|_| err())?;
        let month: u32 = s[4..6].parse().map_err(|_| err())?;
        let day: u32 = s[6..8].parse().map_err(|_| err())?;

        NaiveDate::from_ymd_opt(year, month, day)
            .map(DayStamp)
            .ok_or_else(err)
    }

    /// Wrap a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        DayStamp(date)
    }

    /// The underlying calendar date.
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// The previous calendar day.
    pub fn pred(&self) -> DayStamp {
        DayStamp(self.0 - Duration::days(1))
    }
}

impl std::fmt::Display for DayStamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y%m%d"))
    }
}

impl TryFrom<String> for DayStamp {
    type Error = DayStampError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        DayStamp::parse(&s)
    }
}

impl From<DayStamp> for String {
    fn from(d: DayStamp) -> String {
        d.to_string()
    }
}

impl std::str::FromStr for DayStamp {
    type Err = DayStampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DayStamp::parse(s)
    }
}

/// Newest day the grid may show, applying the venue's daily rollover rule.
///
/// Venues publish a day's numbers some time after local midnight. Before the
/// configured cutoff the most recent complete day is two days back instead
/// of one, which keeps the first window from showing a half-written day.
pub fn newest_complete_day(
    now_utc: DateTime<Utc>,
    utc_offset_hours: i32,
    cutoff_hour: u32,
    cutoff_minute: u32,
) -> DayStamp {
    let offset = FixedOffset::east_opt(utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix());
    let local = now_utc.with_timezone(&offset);

    let cutoff = NaiveTime::from_hms_opt(cutoff_hour, cutoff_minute, 0)
        .unwrap_or_else(|| NaiveTime::MIN);
    let back = if local.time() < cutoff { 2 } else { 1 };

    DayStamp(local.date_naive() - Duration::days(back))
}

/// A contiguous run of `count` days ending at `newest`, newest first.
pub fn window_ending_at(newest: DayStamp, count: usize) -> Vec<DayStamp> {
    let mut days = Vec::with_capacity(count);
    let mut cursor = newest;
    for _ in 0..count {
        days.push(cursor);
        cursor = cursor.pred();
    }
    days
}
