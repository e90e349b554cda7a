/// Calendar day resolution and the clock abstraction
///
/// A "day" is the wall-clock date in the offset the instant was observed in.
/// There is no configurable reset hour: a day turns over at local midnight.

use std::sync::Mutex;

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime};

use crate::domain::DomainError;

/// Format used for canonical day keys ("YYYY-MM-DD")
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Source of the current instant
///
/// Services never call `Local::now()` directly so tests can pin time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Clock backed by the local system time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Manually driven clock for deterministic tests
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<FixedOffset>>,
}

impl FixedClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self { now: Mutex::new(now) }
    }

    /// Build a UTC clock reading from a naive wall-clock time
    pub fn at(naive: NaiveDateTime) -> Self {
        Self::new(naive.and_utc().fixed_offset())
    }

    pub fn set(&self, now: DateTime<FixedOffset>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Resolve an instant to its calendar day
pub fn day_key(instant: &DateTime<FixedOffset>) -> NaiveDate {
    instant.date_naive()
}

/// Resolve an instant to its canonical "YYYY-MM-DD" key
pub fn day_key_string(instant: &DateTime<FixedOffset>) -> String {
    day_key(instant).format(DAY_KEY_FORMAT).to_string()
}

/// Parse a canonical day key
pub fn parse_day_key(key: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(key, DAY_KEY_FORMAT)
        .map_err(|_| DomainError::InvalidDate(format!("expected YYYY-MM-DD, got '{}'", key)))
}

/// Midnight at the start of a day
pub fn midnight(day: NaiveDate) -> NaiveDateTime {
    day.and_time(chrono::NaiveTime::MIN)
}

/// First and last day of a calendar month
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), DomainError> {
    if !(1..=12).contains(&month) {
        return Err(DomainError::InvalidDate(format!(
            "month must be 1-12, got {}",
            month
        )));
    }

    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| DomainError::InvalidDate(format!("year {} is out of range", year)))?;

    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    let last = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| DomainError::InvalidDate(format!("year {} is out of range", year)))?;

    Ok((first, last))
}
