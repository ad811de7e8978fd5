//! Timestamp helpers for zone-naive calendar stamps.
//!
//! Both calendar formats write times as `YYYYMMDD[THHMMSS]`. The legacy format
//! has no notion of time zones, so stamps are kept as strings with any zone
//! suffix removed. Because the format is fixed-width and zero-padded,
//! lexicographic order on the strings is chronological order.

use chrono::{Datelike, NaiveDate};

/// Date format used by calendar stamps.
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Time-of-day component used when a stamp carries no time.
pub const MIDNIGHT: &str = "T000000";

/// Removes a zone suffix from a stamp.
///
/// Handles the UTC designator (`20250615T120000Z`) and numeric offsets
/// (`20250615T120000+0200`, `20250615T120000-0500`). Whitespace around the
/// stamp is trimmed.
pub fn strip_zone(raw: &str) -> String {
    let raw = raw.trim();
    let mut end = raw
        .find(|c: char| c == 'Z' || c == 'z' || c == '+')
        .unwrap_or(raw.len());

    // A minus sign is only an offset once we are past the date part.
    if let Some(t) = raw[..end].find('T')
        && let Some(minus) = raw[t..end].find('-')
    {
        end = t + minus;
    }

    raw[..end].to_string()
}

/// Returns the date prefix (first eight characters) of a stamp.
///
/// Shorter stamps are returned whole, so an empty stamp yields `""`.
pub fn date_prefix(stamp: &str) -> &str {
    stamp.get(..8).unwrap_or(stamp)
}

/// Parses the calendar date of a stamp.
pub fn date_of(stamp: &str) -> Option<NaiveDate> {
    let prefix = stamp.get(..8)?;
    NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok()
}

/// Returns the time-of-day component of a stamp (`T120000`), if present.
pub fn time_component(stamp: &str) -> Option<&str> {
    stamp.get(8..).filter(|rest| !rest.is_empty())
}

/// Formats a date as an eight-digit stamp.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses an eight-digit `YYYYMMDD` date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.len() != 8 || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// Returns the ISO-8601 week number of a date.
pub fn iso_week(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn strip_utc_designator() {
        assert_eq!(strip_zone("20250615T120000Z"), "20250615T120000");
    }

    #[test]
    fn strip_positive_offset() {
        assert_eq!(strip_zone("20250615T120000+0200"), "20250615T120000");
    }

    #[test]
    fn strip_negative_offset() {
        assert_eq!(strip_zone("20250615T120000-0500"), "20250615T120000");
    }

    #[test]
    fn strip_keeps_plain_stamps() {
        assert_eq!(strip_zone("20250615"), "20250615");
        assert_eq!(strip_zone(" 20250615T090000 "), "20250615T090000");
        assert_eq!(strip_zone(""), "");
    }

    #[test]
    fn date_prefix_handles_short_input() {
        assert_eq!(date_prefix("20250615T120000"), "20250615");
        assert_eq!(date_prefix("2025"), "2025");
        assert_eq!(date_prefix(""), "");
    }

    #[test]
    fn date_of_parses_prefix() {
        assert_eq!(date_of("20250615T120000"), Some(date(2025, 6, 15)));
        assert_eq!(date_of("20250615"), Some(date(2025, 6, 15)));
        assert_eq!(date_of("2025"), None);
        assert_eq!(date_of("20251340"), None);
    }

    #[test]
    fn time_component_only_when_present() {
        assert_eq!(time_component("20250615T120000"), Some("T120000"));
        assert_eq!(time_component("20250615"), None);
        assert_eq!(time_component(""), None);
    }

    #[test]
    fn parse_date_requires_eight_digits() {
        assert_eq!(parse_date("20250201"), Some(date(2025, 2, 1)));
        assert_eq!(parse_date("2025-02-01"), None);
        assert_eq!(parse_date("202502011"), None);
        assert_eq!(parse_date("20250231"), None);
    }

    #[test]
    fn iso_week_numbers() {
        assert_eq!(iso_week(date(2025, 6, 15)), 24);
        assert_eq!(iso_week(date(2024, 12, 30)), 1);
        assert_eq!(iso_week(date(2021, 1, 3)), 53);
    }

    #[test]
    fn format_date_round_trips() {
        assert_eq!(format_date(date(2099, 12, 31)), "20991231");
    }
}
