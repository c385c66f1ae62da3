//! Wall-clock time of day and local datetime helpers.
//!
//! The engine does all of its arithmetic on integer minutes since midnight.
//! [`TimeOfDay`] is the only place where `"HH:MM"` strings are parsed or
//! produced, so the rest of the crate never splits strings.
//!
//! [`parse_local_datetime`] and [`local_now`] are for adapters: they turn
//! caller-supplied timestamps into the mentor's wall clock. The engine
//! functions themselves never read the system clock.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

/// Minutes in a day. `TimeOfDay` may equal this value to mean end-of-day.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// A wall-clock time of day with minute granularity.
///
/// Stored as minutes since midnight in `0..=1440`. The upper bound is
/// inclusive so that a window can close at `"24:00"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const END_OF_DAY: TimeOfDay = TimeOfDay(MINUTES_PER_DAY);

    /// Build from minutes since midnight.
    ///
    /// # Errors
    /// Returns [`SlotError::InvalidTime`] if `minutes` exceeds 1440.
    pub fn from_minutes(minutes: u16) -> Result<Self> {
        if minutes > MINUTES_PER_DAY {
            return Err(SlotError::InvalidTime(format!(
                "{} minutes is past the end of the day",
                minutes
            )));
        }
        Ok(TimeOfDay(minutes))
    }

    /// Build from an hour and minute pair (`24:00` allowed).
    pub fn from_hm(hour: u16, minute: u16) -> Result<Self> {
        if minute >= 60 || hour > 24 || (hour == 24 && minute != 0) {
            return Err(SlotError::InvalidTime(format!("{:02}:{:02}", hour, minute)));
        }
        Ok(TimeOfDay(hour * 60 + minute))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    /// The time of day of a wall-clock datetime, truncated to the minute.
    pub fn of(datetime: NaiveDateTime) -> Self {
        use chrono::Timelike;
        TimeOfDay((datetime.hour() * 60 + datetime.minute()) as u16)
    }

    /// Anchor this time of day on `date`. `24:00` lands on the next midnight.
    pub fn on(self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(NaiveTime::MIN) + Duration::minutes(i64::from(self.0))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = SlotError;

    /// Parses `"HH:MM"` or `"HH:MM:SS"`. Seconds are validated and dropped.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || SlotError::InvalidTime(s.to_string());
        let mut parts = s.trim().split(':');

        let hour = parse_component(parts.next(), 2).ok_or_else(invalid)?;
        let minute = parse_component(parts.next(), 2).ok_or_else(invalid)?;
        if let Some(sec) = parts.next() {
            let sec = parse_component(Some(sec), 2).ok_or_else(invalid)?;
            if sec >= 60 || (hour == 24 && sec != 0) {
                return Err(invalid());
            }
        }
        if parts.next().is_some() {
            return Err(invalid());
        }

        TimeOfDay::from_hm(hour, minute).map_err(|_| invalid())
    }
}

/// Parse one numeric component of at most `max_len` ASCII digits.
fn parse_component(part: Option<&str>, max_len: usize) -> Option<u16> {
    let part = part?;
    if part.is_empty() || part.len() > max_len || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl TryFrom<String> for TimeOfDay {
    type Error = SlotError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

// ── Timezone helpers ────────────────────────────────────────────────────────

/// Parse an IANA timezone name.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| SlotError::InvalidTimezone(name.to_string()))
}

/// Convert a datetime string to wall-clock time in `tz`.
///
/// Accepts RFC 3339 (with an offset, converted into `tz`) and naive
/// `YYYY-MM-DDTHH:MM[:SS]` strings, which are taken to already be local time.
pub fn parse_local_datetime(s: &str, tz: Tz) -> Result<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&tz).naive_local());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .map_err(|e| SlotError::InvalidDatetime(format!("'{}': {}", s, e)))
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| SlotError::InvalidDatetime(format!("'{}': {}", s, e)))
}

/// The current wall-clock time in `tz`.
pub fn local_now(tz: Tz) -> NaiveDateTime {
    Utc::now().with_timezone(&tz).naive_local()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hours_and_minutes() {
        let t: TimeOfDay = "09:30".parse().unwrap();
        assert_eq!(t.minutes(), 570);
        assert_eq!(t.to_string(), "09:30");
    }

    #[test]
    fn parses_and_drops_seconds() {
        let t: TimeOfDay = "17:05:00".parse().unwrap();
        assert_eq!(t.minutes(), 17 * 60 + 5);
    }

    #[test]
    fn accepts_end_of_day() {
        let t: TimeOfDay = "24:00".parse().unwrap();
        assert_eq!(t, TimeOfDay::END_OF_DAY);
        assert!("24:01".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "9", "9:5:", "ab:cd", "12:60", "25:00", "12:00:61", "123:00", "-1:00"] {
            assert!(bad.parse::<TimeOfDay>().is_err(), "{:?} should not parse", bad);
        }
    }

    #[test]
    fn single_digit_hour_is_accepted() {
        let t: TimeOfDay = "9:05".parse().unwrap();
        assert_eq!(t.to_string(), "09:05");
    }

    #[test]
    fn anchors_on_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
        let dt = TimeOfDay::END_OF_DAY.on(date);
        assert_eq!(dt, NaiveDate::from_ymd_opt(2026, 3, 17).unwrap().and_time(NaiveTime::MIN));
        let quarter_to_two = TimeOfDay::from_hm(13, 45).unwrap().on(date);
        assert_eq!(TimeOfDay::of(quarter_to_two).to_string(), "13:45");
    }

    #[test]
    fn serde_uses_display_string() {
        let t = TimeOfDay::from_hm(8, 0).unwrap();
        assert_eq!(serde_json_string(t), "\"08:00\"");
    }

    fn serde_json_string(t: TimeOfDay) -> String {
        serde_json::to_string(&t).unwrap()
    }

    #[test]
    fn rfc3339_is_converted_into_zone() {
        let tz = parse_timezone("Europe/Berlin").unwrap();
        // March 16 2026 is CET (UTC+1).
        let local = parse_local_datetime("2026-03-16T09:00:00Z", tz).unwrap();
        assert_eq!(local.to_string(), "2026-03-16 10:00:00");
    }

    #[test]
    fn naive_datetime_is_kept_as_wall_clock() {
        let tz = parse_timezone("Asia/Tokyo").unwrap();
        let local = parse_local_datetime("2026-03-16T09:00", tz).unwrap();
        assert_eq!(local.to_string(), "2026-03-16 09:00:00");
    }

    #[test]
    fn unknown_timezone_is_an_error() {
        assert!(matches!(
            parse_timezone("Mars/Olympus"),
            Err(SlotError::InvalidTimezone(_))
        ));
    }
}
