// src/models/schedule.rs

//! Weekly schedule entries and open-status evaluation.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDateTime, Timelike};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// An open/close range, e.g. "8 a.m. to 11 p.m.".
static TIME_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(.+?)\s+to\s+(.+)$").expect("time range pattern"));

/// A clock expression, e.g. "8 a.m.", "11:30 p.m.".
static CLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})\s*(?::(\d{2}))?\s*([ap])\.?m\.?").expect("clock pattern"));

/// One (day-expression, time-expression) pair, e.g.
/// `("Monday - Thursday", "8 a.m. to 11 p.m.")`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub day: String,
    pub hours: String,
}

/// Result of evaluating a schedule at a point in time.
///
/// `is_open` is `None` when the schedule is missing or unparseable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenState {
    pub is_open: Option<bool>,
    pub reason: String,
}

impl OpenState {
    fn unknown(reason: impl Into<String>) -> Self {
        Self {
            is_open: None,
            reason: reason.into(),
        }
    }

    fn open(reason: impl Into<String>) -> Self {
        Self {
            is_open: Some(true),
            reason: reason.into(),
        }
    }

    fn closed(reason: impl Into<String>) -> Self {
        Self {
            is_open: Some(false),
            reason: reason.into(),
        }
    }
}

/// Evaluate whether a location is open at the given local instant.
///
/// Day expressions support single days, "Daily", and ranges that may wrap
/// the week ("Friday - Sunday"). Time expressions are of the form
/// "8 a.m. to 11 p.m." and may close past midnight. "Closed" rows close
/// the whole day. Rows that fail to parse are skipped.
pub fn open_state(entries: &[ScheduleEntry], at: NaiveDateTime) -> OpenState {
    if entries.is_empty() {
        return OpenState::unknown("No hours information available");
    }

    let current_day = at.weekday().num_days_from_sunday();
    let current_minutes = at.hour() * 60 + at.minute();

    for entry in entries {
        if entry.day.is_empty() || entry.hours.is_empty() {
            continue;
        }

        if !day_matches(&entry.day, current_day) {
            continue;
        }

        if entry.hours.to_lowercase().contains("closed") {
            return OpenState::closed(format!("Closed on {}", entry.day));
        }

        let Some(range) = TIME_RANGE.captures(entry.hours.trim()) else {
            return OpenState::unknown(format!("Unable to parse hours: {}", entry.hours));
        };
        let open_expr = range[1].trim().to_string();
        let close_expr = range[2].trim().to_string();

        let (Some(open_minutes), Some(close_minutes)) =
            (parse_time(&open_expr), parse_time(&close_expr))
        else {
            continue;
        };

        let within = if close_minutes < open_minutes {
            // Closing time is past midnight
            current_minutes >= open_minutes || current_minutes < close_minutes
        } else {
            current_minutes >= open_minutes && current_minutes < close_minutes
        };

        if within {
            return OpenState::open(format!("Open until {close_expr}"));
        }
    }

    OpenState::closed("Not open at this time")
}

/// Parse a clock expression like "8 a.m.", "11:30 p.m." into minutes of
/// day. Returns None for "Closed" or unrecognized input.
fn parse_time(expr: &str) -> Option<u32> {
    let lowered = expr.trim().to_lowercase();
    if lowered.contains("closed") {
        return None;
    }

    let caps = CLOCK.captures(&lowered)?;
    let mut hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps
        .get(2)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0);

    if &caps[3] == "p" {
        if hour != 12 {
            hour += 12;
        }
    } else if hour == 12 {
        hour = 0;
    }

    Some(hour * 60 + minute)
}

/// Check whether a day expression covers the given day number
/// (0 = Sunday .. 6 = Saturday).
fn day_matches(expr: &str, current_day: u32) -> bool {
    let lowered = expr.trim().to_lowercase();

    if lowered == "daily" {
        return true;
    }
    if lowered.contains("closed") {
        return false;
    }

    if let Some((start, end)) = lowered.split_once('-') {
        if let (Some(start_day), Some(end_day)) =
            (day_number(start.trim()), day_number(end.trim()))
        {
            // Ranges may wrap the week, e.g. "Friday - Sunday"
            return if start_day > end_day {
                current_day >= start_day || current_day <= end_day
            } else {
                current_day >= start_day && current_day <= end_day
            };
        }
    }

    day_number(&lowered) == Some(current_day)
}

fn day_number(name: &str) -> Option<u32> {
    match name {
        "sunday" => Some(0),
        "monday" => Some(1),
        "tuesday" => Some(2),
        "wednesday" => Some(3),
        "thursday" => Some(4),
        "friday" => Some(5),
        "saturday" => Some(6),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(day: &str, hours: &str) -> ScheduleEntry {
        ScheduleEntry {
            day: day.to_string(),
            hours: hours.to_string(),
        }
    }

    fn monday_at(hour: u32, minute: u32) -> NaiveDateTime {
        // 2025-10-06 is a Monday
        NaiveDate::from_ymd_opt(2025, 10, 6)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_open_within_range() {
        let hours = vec![entry("Monday - Thursday", "8 a.m. to 11 p.m.")];
        let state = open_state(&hours, monday_at(10, 0));
        assert_eq!(state.is_open, Some(true));
        assert!(state.reason.contains("11 p.m."));
    }

    #[test]
    fn test_closed_after_close() {
        let hours = vec![entry("Monday - Thursday", "8 a.m. to 11 p.m.")];
        let state = open_state(&hours, monday_at(23, 30));
        assert_eq!(state.is_open, Some(false));
    }

    #[test]
    fn test_no_entries() {
        let state = open_state(&[], monday_at(10, 0));
        assert_eq!(state.is_open, None);
    }

    #[test]
    fn test_closed_day() {
        let hours = vec![entry("Monday", "Closed")];
        let state = open_state(&hours, monday_at(10, 0));
        assert_eq!(state.is_open, Some(false));
        assert!(state.reason.contains("Monday"));
    }

    #[test]
    fn test_daily() {
        let hours = vec![entry("Daily", "7 a.m. to 2 p.m.")];
        assert_eq!(open_state(&hours, monday_at(9, 0)).is_open, Some(true));
        assert_eq!(open_state(&hours, monday_at(15, 0)).is_open, Some(false));
    }

    #[test]
    fn test_wrapping_range() {
        // Sunday falls inside Friday - Sunday
        let hours = vec![entry("Friday - Sunday", "10 a.m. to 8 p.m.")];
        let sunday = NaiveDate::from_ymd_opt(2025, 10, 5)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(open_state(&hours, sunday).is_open, Some(true));
        assert_eq!(open_state(&hours, monday_at(12, 0)).is_open, Some(false));
    }

    #[test]
    fn test_past_midnight_close() {
        let hours = vec![entry("Monday", "8 p.m. to 1 a.m.")];
        assert_eq!(open_state(&hours, monday_at(23, 30)).is_open, Some(true));
        assert_eq!(open_state(&hours, monday_at(0, 30)).is_open, Some(true));
        assert_eq!(open_state(&hours, monday_at(12, 0)).is_open, Some(false));
    }

    #[test]
    fn test_unparseable_hours() {
        let hours = vec![entry("Monday", "see posted schedule")];
        let state = open_state(&hours, monday_at(10, 0));
        assert_eq!(state.is_open, None);
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("8 a.m."), Some(8 * 60));
        assert_eq!(parse_time("11:30 p.m."), Some(23 * 60 + 30));
        assert_eq!(parse_time("12 a.m."), Some(0));
        assert_eq!(parse_time("12 p.m."), Some(12 * 60));
        assert_eq!(parse_time("Closed"), None);
    }
}
