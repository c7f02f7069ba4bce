//! Time handling for observation records.
//!
//! Every sample carries a [`TimeKey`]: the minute-resolution timestamp packed
//! as the decimal number `YYYYMMDDhhmm`. Because every field is zero-padded to
//! a fixed width, numeric order on keys equals chronological order, and the
//! 12-digit text form sorts the same way byte-for-byte.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{OceanError, OceanResult};

/// Number of decimal digits in an encoded key.
pub const TIME_KEY_DIGITS: usize = 12;

/// Fixed-width `YYYYMMDDhhmm` timestamp key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "TimeKeyRepr", into = "u64")]
pub struct TimeKey(u64);

impl TimeKey {
    /// Encode a date-time, truncating seconds.
    pub fn from_datetime(dt: &NaiveDateTime) -> OceanResult<Self> {
        let year = dt.year();
        if !(1000..=9999).contains(&year) {
            return Err(OceanError::YearOutOfRange(year));
        }

        let key = year as u64 * 100_000_000
            + dt.month() as u64 * 1_000_000
            + dt.day() as u64 * 10_000
            + dt.hour() as u64 * 100
            + dt.minute() as u64;
        Ok(Self(key))
    }

    /// Wrap a raw integer key after checking that it decodes to a real minute.
    pub fn from_raw(raw: u64) -> OceanResult<Self> {
        let key = Self(raw);
        key.to_datetime()?;
        Ok(key)
    }

    /// Parse the 12-digit text form (e.g. `"201306010000"`).
    pub fn parse(s: &str) -> OceanResult<Self> {
        let s = s.trim();
        if s.len() != TIME_KEY_DIGITS || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(OceanError::InvalidTimeKey(s.to_string()));
        }
        let raw: u64 = s
            .parse()
            .map_err(|_| OceanError::InvalidTimeKey(s.to_string()))?;
        Self::from_raw(raw)
    }

    /// Decode back into a date-time.
    pub fn to_datetime(&self) -> OceanResult<NaiveDateTime> {
        let raw = self.0;
        let minute = (raw % 100) as u32;
        let hour = (raw / 100 % 100) as u32;
        let day = (raw / 10_000 % 100) as u32;
        let month = (raw / 1_000_000 % 100) as u32;
        let year = raw / 100_000_000;

        if !(1000..=9999).contains(&year) {
            return Err(OceanError::InvalidTimeKey(raw.to_string()));
        }

        NaiveDate::from_ymd_opt(year as i32, month, day)
            .and_then(|d| d.and_hms_opt(hour, minute, 0))
            .ok_or_else(|| OceanError::InvalidTimeKey(raw.to_string()))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:012}", self.0)
    }
}

impl FromStr for TimeKey {
    type Err = OceanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<TimeKey> for u64 {
    fn from(key: TimeKey) -> u64 {
        key.0
    }
}

/// Observation dumps store keys as text, derived dumps as integers.
#[derive(Deserialize)]
#[serde(untagged)]
enum TimeKeyRepr {
    Int(u64),
    Text(String),
}

impl TryFrom<TimeKeyRepr> for TimeKey {
    type Error = OceanError;

    fn try_from(repr: TimeKeyRepr) -> Result<Self, Self::Error> {
        match repr {
            TimeKeyRepr::Int(raw) => TimeKey::from_raw(raw),
            TimeKeyRepr::Text(s) => TimeKey::parse(&s),
        }
    }
}

/// A half-open request window `[start, end)`.
///
/// A window with `start > end` is not rejected; it simply selects nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// The 24-hour window beginning at `start`.
    pub fn day_starting(start: NaiveDateTime) -> Self {
        Self {
            start,
            end: start + Duration::days(1),
        }
    }

    /// Move both ends by a whole number of days.
    pub fn shift_days(&self, days: i64) -> Self {
        Self {
            start: self.start + Duration::days(days),
            end: self.end + Duration::days(days),
        }
    }

    /// Encode both bounds as keys.
    pub fn keys(&self) -> OceanResult<(TimeKey, TimeKey)> {
        Ok((
            TimeKey::from_datetime(&self.start)?,
            TimeKey::from_datetime(&self.end)?,
        ))
    }

    /// Parse `--start` style arguments: `2013-06-01T00:00`, with or without seconds,
    /// or a bare date.
    pub fn parse_start(s: &str) -> OceanResult<NaiveDateTime> {
        let s = s.trim();
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
            return Ok(dt);
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") {
            return Ok(dt);
        }
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")?;
        date.and_hms_opt(0, 0, 0)
            .ok_or_else(|| OceanError::InvalidTimeKey(s.to_string()))
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%Y-%m-%d %H:%M"),
            self.end.format("%Y-%m-%d %H:%M")
        )
    }
}

/// The range of window starts the dataset covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBounds {
    pub min: NaiveDateTime,
    pub max: NaiveDateTime,
}

impl TimeBounds {
    pub fn new(min: NaiveDateTime, max: NaiveDateTime) -> Self {
        Self { min, max }
    }

    /// Whether a window may start at `start`.
    pub fn contains(&self, start: &NaiveDateTime) -> bool {
        *start >= self.min && *start <= self.max
    }

    /// Whether shifting `window` by `days` keeps its start inside the bounds.
    pub fn can_shift(&self, window: &TimeWindow, days: i64) -> bool {
        self.contains(&window.shift_days(days).start)
    }
}

impl Default for TimeBounds {
    /// The 2013 observation year.
    fn default() -> Self {
        let min = NaiveDate::from_ymd_opt(2013, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or_default();
        let max = NaiveDate::from_ymd_opt(2013, 12, 31)
            .and_then(|d| d.and_hms_opt(23, 59, 0))
            .unwrap_or_default();
        Self { min, max }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn test_encode_zero_pads_every_field() {
        let key = TimeKey::from_datetime(&dt(2013, 6, 1, 3, 5)).unwrap();
        assert_eq!(key.as_u64(), 201306010305);
        assert_eq!(key.to_string(), "201306010305");
    }

    #[test]
    fn test_decode_roundtrip() {
        let original = dt(2013, 12, 31, 23, 59);
        let key = TimeKey::from_datetime(&original).unwrap();
        assert_eq!(key.to_datetime().unwrap(), original);
    }

    #[test]
    fn test_seconds_are_truncated() {
        let with_seconds = NaiveDate::from_ymd_opt(2013, 6, 1)
            .unwrap()
            .and_hms_opt(12, 30, 45)
            .unwrap();
        let key = TimeKey::from_datetime(&with_seconds).unwrap();
        assert_eq!(key.as_u64(), 201306011230);
    }

    #[test]
    fn test_numeric_and_text_order_agree() {
        let a = TimeKey::from_datetime(&dt(2013, 6, 1, 23, 59)).unwrap();
        let b = TimeKey::from_datetime(&dt(2013, 6, 2, 0, 0)).unwrap();
        assert!(a < b);
        assert!(a.to_string().as_bytes() < b.to_string().as_bytes());
    }

    #[test]
    fn test_parse_rejects_bad_text() {
        assert!(TimeKey::parse("2013060100").is_err());
        assert!(TimeKey::parse("20130601000x").is_err());
        assert!(TimeKey::parse("201313010000").is_err());
        assert!(TimeKey::parse("201302300000").is_err());
    }

    #[test]
    fn test_year_out_of_range() {
        let early = dt(999, 1, 1, 0, 0);
        assert!(matches!(
            TimeKey::from_datetime(&early),
            Err(OceanError::YearOutOfRange(999))
        ));
    }

    #[test]
    fn test_deserialize_text_and_integer() {
        let from_text: TimeKey = serde_json::from_str("\"201306010000\"").unwrap();
        let from_int: TimeKey = serde_json::from_str("201306010000").unwrap();
        assert_eq!(from_text, from_int);
        assert_eq!(serde_json::to_string(&from_text).unwrap(), "201306010000");
    }

    #[test]
    fn test_day_window_and_shift() {
        let window = TimeWindow::day_starting(dt(2013, 6, 1, 0, 0));
        assert_eq!(window.end, dt(2013, 6, 2, 0, 0));

        let next = window.shift_days(1);
        assert_eq!(next.start, dt(2013, 6, 2, 0, 0));
        assert_eq!(next.end, dt(2013, 6, 3, 0, 0));
    }

    #[test]
    fn test_bounds_navigation() {
        let bounds = TimeBounds::default();
        let first = TimeWindow::day_starting(dt(2013, 1, 1, 0, 0));
        assert!(!bounds.can_shift(&first, -1));
        assert!(bounds.can_shift(&first, 1));

        let last = TimeWindow::day_starting(dt(2013, 12, 31, 0, 0));
        assert!(!bounds.can_shift(&last, 1));
    }

    #[test]
    fn test_parse_start_formats() {
        let expected = dt(2013, 6, 1, 0, 0);
        assert_eq!(TimeWindow::parse_start("2013-06-01").unwrap(), expected);
        assert_eq!(TimeWindow::parse_start("2013-06-01T00:00").unwrap(), expected);
        assert_eq!(TimeWindow::parse_start("2013-06-01T00:00:00").unwrap(), expected);
        assert!(TimeWindow::parse_start("June first").is_err());
    }
}
