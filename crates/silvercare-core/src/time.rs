//! Identifier and time utilities.
//!
//! Stores never call `Utc::now()` directly; they read time through a [`Clock`]
//! so tests can pin timestamps.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc, Weekday};
use std::sync::Mutex;
use uuid::Uuid;

/// Placeholder shown when a timestamp cannot be displayed as a time of day.
pub const INVALID_TIME_DISPLAY: &str = "--:--";

/// Placeholder shown when a timestamp cannot be displayed as a date.
pub const INVALID_DATE_DISPLAY: &str = "날짜 정보 없음";

/// Generates an opaque unique identifier.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Sentinel used when a persisted timestamp cannot be reconstructed.
pub fn invalid_timestamp() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

/// Parses an RFC 3339 timestamp.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

/// Parses a persisted timestamp, falling back to the sentinel.
pub fn parse_timestamp_or_sentinel(value: &str) -> DateTime<Utc> {
    parse_timestamp(value).unwrap_or_else(|| {
        tracing::warn!("Unreadable persisted timestamp '{}', using sentinel", value);
        invalid_timestamp()
    })
}

/// Returns false for the rehydration sentinel and anything before it.
pub fn is_valid_timestamp(ts: &DateTime<Utc>) -> bool {
    *ts > invalid_timestamp()
}

/// Formats the time of day as `오전 09:05` / `오후 03:05`.
pub fn format_time<Tz: TimeZone>(ts: &DateTime<Utc>, tz: &Tz) -> String {
    if !is_valid_timestamp(ts) {
        return INVALID_TIME_DISPLAY.to_string();
    }

    let local = ts.with_timezone(tz);
    let (is_pm, hour) = local.hour12();
    let meridiem = if is_pm { "오후" } else { "오전" };
    format!("{} {:02}:{:02}", meridiem, hour, local.minute())
}

/// Formats a long Korean date, e.g. `2024년 1월 5일 금요일`.
pub fn format_date<Tz: TimeZone>(ts: &DateTime<Utc>, tz: &Tz) -> String {
    if !is_valid_timestamp(ts) {
        return INVALID_DATE_DISPLAY.to_string();
    }

    let local = ts.with_timezone(tz);
    format!(
        "{}년 {}월 {}일 {}",
        local.year(),
        local.month(),
        local.day(),
        korean_weekday(local.weekday())
    )
}

fn korean_weekday(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "월요일",
        Weekday::Tue => "화요일",
        Weekday::Wed => "수요일",
        Weekday::Thu => "목요일",
        Weekday::Fri => "금요일",
        Weekday::Sat => "토요일",
        Weekday::Sun => "일요일",
    }
}
