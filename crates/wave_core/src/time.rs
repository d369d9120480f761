//! Calendar-day bookkeeping.
//!
//! Instants are milliseconds since 1970-01-01T00:00:00Z (the JS `Date`
//! convention used by the UI). A calendar day is identified by a [`DayKey`]
//! counted in a fixed UTC offset, so the same instant can fall on different
//! days for collaborators in different zones.

use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

pub const ONE_DAY_MS: f64 = 86_400_000.0;
pub const ONE_MINUTE_MS: f64 = 60_000.0;
pub const ONE_SECOND_DAYS: f64 = 1.0 / 86_400.0;

/// Days since 1970-01-01 in the zone the key was computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(pub i64);

fn unix_epoch() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1970, 1, 1)
}

impl DayKey {
    /// Builds a key from a proleptic Gregorian date. Returns `None` for
    /// dates that do not exist (month 13, February 30th, ...) or that lie
    /// outside the calendar range chrono supports.
    pub fn from_ymd(year: i64, month: u32, day: u32) -> Option<Self> {
        let year = i32::try_from(year).ok()?;
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        Self::from_date(date)
    }

    pub fn from_date(date: NaiveDate) -> Option<Self> {
        Some(DayKey(date.signed_duration_since(unix_epoch()?).num_days()))
    }

    /// The day containing `instant` when observed at `utc_offset_minutes`.
    pub fn containing(instant: f64, utc_offset_minutes: i32) -> Option<Self> {
        if !instant.is_finite() {
            return None;
        }
        let millis = instant.floor();
        if millis < i64::MIN as f64 || millis > i64::MAX as f64 {
            return None;
        }
        let zone = FixedOffset::east_opt(utc_offset_minutes.checked_mul(60)?)?;
        let local = DateTime::from_timestamp_millis(millis as i64)?.with_timezone(&zone);
        Self::from_date(local.date_naive())
    }

    /// Calendar date of this key, `None` past chrono's supported range.
    pub fn date(self) -> Option<NaiveDate> {
        let epoch = unix_epoch()?;
        if self.0 >= 0 {
            epoch.checked_add_days(Days::new(self.0.unsigned_abs()))
        } else {
            epoch.checked_sub_days(Days::new(self.0.unsigned_abs()))
        }
    }

    pub fn to_ymd(self) -> Option<(i64, u32, u32)> {
        self.date()
            .map(|date| (i64::from(date.year()), date.month(), date.day()))
    }

    pub fn next(self) -> Self {
        DayKey(self.0 + 1)
    }

    pub fn window(self, utc_offset_minutes: i32) -> DayWindow {
        let start = self.0 as f64 * ONE_DAY_MS - f64::from(utc_offset_minutes) * ONE_MINUTE_MS;
        DayWindow {
            key: self,
            start,
            end: start + ONE_DAY_MS,
        }
    }
}

/// Half-open interval `[start, end)` of absolute instants covering one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayWindow {
    pub key: DayKey,
    pub start: f64,
    pub end: f64,
}

impl DayWindow {
    pub fn length_days(&self) -> f64 {
        (self.end - self.start) / ONE_DAY_MS
    }

    pub fn contains(&self, instant: f64) -> bool {
        instant >= self.start && instant < self.end
    }

    /// Absolute instant for an offset in days from the window start.
    pub fn instant_at(&self, offset_days: f64) -> f64 {
        self.start + offset_days * ONE_DAY_MS
    }
}
