//! Time decay for activity timestamps
//!
//! Older activity counts for less. The multiplier decays exponentially per
//! half-year period:
//!
//! ```text
//! factor = base ^ (elapsed_days / 182.5)
//! ```
//!
//! Once the activity is at least `max_years` old the multiplier drops to a
//! fixed floor instead of continuing toward zero. Timestamps that cannot be
//! parsed get a neutral multiplier and never fail the caller.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Decay base applied once per period
pub const DECAY_BASE: f64 = 0.9;
/// Length of one decay period in days (~6 months)
pub const PERIOD_DAYS: f64 = 182.5;
/// Default look-back window
pub const DEFAULT_MAX_YEARS: u32 = 3;
/// Multiplier for activity older than the look-back window
pub const DECAY_FLOOR: f64 = 0.1;
/// Multiplier for timestamps that cannot be parsed
pub const NEUTRAL_FACTOR: f64 = 0.5;

/// Parse an ISO-8601 timestamp as UTC.
///
/// Accepts RFC 3339 (`2024-01-01T10:00:00Z`, with offset or fractional
/// seconds) and offset-less `YYYY-MM-DDTHH:MM:SS`, which is read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Recency multiplier calculator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeDecay {
    pub base: f64,
    pub period_days: f64,
    pub max_years: u32,
    pub floor: f64,
    pub neutral: f64,
}

impl Default for TimeDecay {
    fn default() -> Self {
        Self {
            base: DECAY_BASE,
            period_days: PERIOD_DAYS,
            max_years: DEFAULT_MAX_YEARS,
            floor: DECAY_FLOOR,
            neutral: NEUTRAL_FACTOR,
        }
    }
}

impl TimeDecay {
    /// Same decay curve with a different look-back window
    pub fn with_max_years(mut self, max_years: u32) -> Self {
        self.max_years = max_years;
        self
    }

    /// Whole days at which activity falls to the floor
    pub fn cutoff_days(&self) -> i64 {
        365 * self.max_years as i64
    }

    /// Multiplier for a raw timestamp string, neutral when unparseable
    pub fn factor(&self, timestamp: &str, now: DateTime<Utc>) -> f64 {
        match parse_timestamp(timestamp) {
            Some(at) => self.factor_at(at, now),
            None => self.neutral,
        }
    }

    /// Multiplier for an already parsed instant
    pub fn factor_at(&self, at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
        let days = (now - at).num_days();
        self.factor_for_days(days)
    }

    /// Multiplier for an elapsed number of whole days.
    ///
    /// Future timestamps (negative days) count as "now".
    pub fn factor_for_days(&self, days: i64) -> f64 {
        if days >= self.cutoff_days() {
            return self.floor;
        }
        let days = days.max(0) as f64;
        let periods = days / self.period_days;
        self.base.powf(periods).clamp(0.0, 1.0)
    }
}
