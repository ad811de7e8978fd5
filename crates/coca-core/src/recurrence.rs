//! Recurrence rules and their mapping onto the legacy vocabulary.
//!
//! The legacy device understands exactly four repeat codes, each with an
//! implicit interval of one. Rules are parsed leniently from the raw `RRULE`
//! value; anything unrecognized degrades to [`Frequency::None`].
//!
//! Series end dates for count-bounded rules are approximated with fixed
//! day counts per unit (see [`Frequency::days_per_unit`]). Months count as
//! 31 days and years as 365, which deliberately overestimates how long a
//! series runs rather than expanding the rule exactly.

use std::fmt;
use std::sync::LazyLock;

use chrono::{Duration, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::time;

static FREQ_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)FREQ=([A-Z]+)").expect("Invalid FREQ regex"));

static INTERVAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)INTERVAL=(\d+)").expect("Invalid INTERVAL regex"));

static UNTIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)UNTIL=(\d{8})").expect("Invalid UNTIL regex"));

static COUNT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)COUNT=(\d+)").expect("Invalid COUNT regex"));

/// Returns the first capture group of `regex` in `raw`.
fn capture<'a>(regex: &Regex, raw: &'a str) -> Option<&'a str> {
    regex.captures(raw).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// How often a series repeats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// No (or an unsupported) frequency.
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Parses a `FREQ=` value, case-insensitively.
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword.to_ascii_uppercase().as_str() {
            "DAILY" => Self::Daily,
            "WEEKLY" => Self::Weekly,
            "MONTHLY" => Self::Monthly,
            "YEARLY" => Self::Yearly,
            _ => Self::None,
        }
    }

    /// Approximate length of one unit in days.
    pub fn days_per_unit(&self) -> i64 {
        match self {
            Self::None => 0,
            Self::Daily => 1,
            Self::Weekly => 7,
            Self::Monthly => 31,
            Self::Yearly => 365,
        }
    }

    /// The legacy repeat code for this frequency.
    ///
    /// `None` means the device gets no recurrence line at all.
    pub fn legacy_code(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Daily => Some("D1"),
            Self::Weekly => Some("W1"),
            Self::Monthly => Some("MD1"),
            Self::Yearly => Some("YD1"),
        }
    }

    /// Unit letter used in the compatibility note.
    fn note_unit(&self) -> char {
        if *self == Self::Weekly { 'W' } else { 'D' }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        };
        f.write_str(name)
    }
}

/// A parsed recurrence rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    /// Repeat every `interval` units; always at least 1.
    pub interval: u32,
    /// Inclusive end date.
    pub until: Option<NaiveDate>,
    /// Number of occurrences.
    pub count: Option<u32>,
}

impl Default for RecurrenceRule {
    fn default() -> Self {
        Self {
            frequency: Frequency::None,
            interval: 1,
            until: None,
            count: None,
        }
    }
}

impl RecurrenceRule {
    /// Parses a raw `RRULE` value such as `FREQ=WEEKLY;INTERVAL=2;UNTIL=20250101`.
    ///
    /// Keywords are matched case-insensitively anywhere in the string. Missing
    /// or unparseable parts fall back to the defaults: no frequency,
    /// interval 1, no bounds.
    pub fn parse(raw: &str) -> Self {
        let frequency = capture(&FREQ_REGEX, raw)
            .map(Frequency::from_keyword)
            .unwrap_or_default();
        let interval = capture(&INTERVAL_REGEX, raw)
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(1);
        let until = capture(&UNTIL_REGEX, raw).and_then(time::parse_date);
        let count = capture(&COUNT_REGEX, raw)
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|v| *v > 0);

        Self {
            frequency,
            interval,
            until,
            count,
        }
    }

    /// Returns true if the rule has neither an until-date nor a count.
    pub fn is_unbounded(&self) -> bool {
        self.until.is_none() && self.count.is_none()
    }

    /// Approximates the date of the last occurrence of a count-bounded series.
    ///
    /// Computed as `start + count * interval * days_per_unit`. Returns `None`
    /// when the rule has no count or the date would overflow.
    pub fn approximate_end(&self, start: NaiveDate) -> Option<NaiveDate> {
        let count = i64::from(self.count?);
        let days = count
            .checked_mul(i64::from(self.interval))?
            .checked_mul(self.frequency.days_per_unit())?;
        start.checked_add_signed(Duration::try_days(days)?)
    }

    /// Returns true if the series still has occurrences on or after `today`.
    ///
    /// - An until-date wins: the series runs while `until >= today`.
    /// - A count alone is resolved through [`approximate_end`](Self::approximate_end).
    ///   Without a usable start date the series is assumed to still run.
    /// - A rule with neither bound never ends.
    pub fn is_ongoing(&self, start: Option<NaiveDate>, today: NaiveDate) -> bool {
        if let Some(until) = self.until {
            return until >= today;
        }
        if self.count.is_some() {
            return match start.and_then(|s| self.approximate_end(s)) {
                Some(end) => end >= today,
                None => true,
            };
        }
        true
    }

    /// The legacy repeat code, if the frequency maps onto one.
    pub fn legacy_code(&self) -> Option<&'static str> {
        self.frequency.legacy_code()
    }

    /// Builds the cadence note for intervals the device cannot express.
    ///
    /// The device repeats with interval 1 only, so a rule like "every third
    /// day" gets a note such as `(3D-W24)`: interval, unit (`W` for weekly,
    /// `D` otherwise) and the ISO week of the first occurrence. Returns `None`
    /// for interval 1. Without a start date the week part is left out.
    pub fn compat_note(&self, start: Option<NaiveDate>) -> Option<String> {
        if self.interval <= 1 {
            return None;
        }
        let unit = self.frequency.note_unit();
        let note = match start {
            Some(date) => format!("({}{}-W{})", self.interval, unit, time::iso_week(date)),
            None => format!("({}{})", self.interval, unit),
        };
        Some(note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_full_rule() {
        let rule = RecurrenceRule::parse("FREQ=WEEKLY;INTERVAL=2;UNTIL=20250101");
        assert_eq!(rule.frequency, Frequency::Weekly);
        assert_eq!(rule.interval, 2);
        assert_eq!(rule.until, Some(date(2025, 1, 1)));
        assert_eq!(rule.count, None);
    }

    #[test]
    fn parse_is_case_insensitive() {
        let rule = RecurrenceRule::parse("freq=monthly;interval=3;count=4");
        assert_eq!(rule.frequency, Frequency::Monthly);
        assert_eq!(rule.interval, 3);
        assert_eq!(rule.count, Some(4));
    }

    #[test]
    fn parse_until_with_time() {
        let rule = RecurrenceRule::parse("FREQ=DAILY;UNTIL=20251231T235959Z");
        assert_eq!(rule.until, Some(date(2025, 12, 31)));
    }

    #[test]
    fn interval_defaults_to_one() {
        assert_eq!(RecurrenceRule::parse("").interval, 1);
        assert_eq!(RecurrenceRule::parse("FREQ=DAILY").interval, 1);
        assert_eq!(RecurrenceRule::parse("FREQ=DAILY;INTERVAL=0").interval, 1);
        assert_eq!(RecurrenceRule::parse("FREQ=DAILY;INTERVAL=x").interval, 1);
    }

    #[test]
    fn unknown_frequency_is_none() {
        assert_eq!(RecurrenceRule::parse("FREQ=HOURLY").frequency, Frequency::None);
        assert_eq!(RecurrenceRule::parse("INTERVAL=2").frequency, Frequency::None);
        assert_eq!(RecurrenceRule::parse("").frequency, Frequency::None);
    }

    #[test]
    fn invalid_until_is_ignored() {
        let rule = RecurrenceRule::parse("FREQ=DAILY;UNTIL=20251340");
        assert_eq!(rule.until, None);
        assert!(rule.is_unbounded());
    }

    #[test]
    fn legacy_codes() {
        assert_eq!(Frequency::Daily.legacy_code(), Some("D1"));
        assert_eq!(Frequency::Weekly.legacy_code(), Some("W1"));
        assert_eq!(Frequency::Monthly.legacy_code(), Some("MD1"));
        assert_eq!(Frequency::Yearly.legacy_code(), Some("YD1"));
        assert_eq!(Frequency::None.legacy_code(), None);
    }

    #[test]
    fn ended_series_is_not_ongoing() {
        let rule = RecurrenceRule::parse("FREQ=WEEKLY;INTERVAL=2;UNTIL=20250101");
        assert!(!rule.is_ongoing(Some(date(2024, 1, 1)), date(2025, 2, 1)));
    }

    #[test]
    fn until_is_inclusive() {
        let rule = RecurrenceRule::parse("FREQ=DAILY;UNTIL=20250201");
        assert!(rule.is_ongoing(Some(date(2025, 1, 1)), date(2025, 2, 1)));
        assert!(!rule.is_ongoing(Some(date(2025, 1, 1)), date(2025, 2, 2)));
    }

    #[test]
    fn count_uses_approximate_end() {
        // 4 occurrences every 2 weeks: 2025-01-01 + 56 days = 2025-02-26
        let rule = RecurrenceRule::parse("FREQ=WEEKLY;INTERVAL=2;COUNT=4");
        let start = date(2025, 1, 1);
        assert_eq!(rule.approximate_end(start), Some(date(2025, 2, 26)));
        assert!(rule.is_ongoing(Some(start), date(2025, 2, 26)));
        assert!(!rule.is_ongoing(Some(start), date(2025, 2, 27)));
    }

    #[test]
    fn monthly_count_overestimates() {
        // 3 months at 31 days each
        let rule = RecurrenceRule::parse("FREQ=MONTHLY;COUNT=3");
        assert_eq!(rule.approximate_end(date(2025, 2, 1)), Some(date(2025, 5, 5)));
    }

    #[test]
    fn count_without_start_is_ongoing() {
        let rule = RecurrenceRule::parse("FREQ=DAILY;COUNT=2");
        assert!(rule.is_ongoing(None, date(2030, 1, 1)));
    }

    #[test]
    fn until_takes_precedence_over_count() {
        let rule = RecurrenceRule::parse("FREQ=DAILY;COUNT=1000;UNTIL=20240101");
        assert!(!rule.is_ongoing(Some(date(2023, 12, 1)), date(2025, 1, 1)));
    }

    #[test]
    fn unbounded_series_is_always_ongoing() {
        let rule = RecurrenceRule::parse("FREQ=YEARLY");
        assert!(rule.is_unbounded());
        assert!(rule.is_ongoing(Some(date(1990, 5, 1)), date(2025, 1, 1)));
    }

    #[test]
    fn compat_note_for_intervals() {
        let start = Some(date(2025, 6, 15));
        let daily = RecurrenceRule::parse("FREQ=DAILY;INTERVAL=3");
        assert_eq!(daily.compat_note(start).as_deref(), Some("(3D-W24)"));

        let weekly = RecurrenceRule::parse("FREQ=WEEKLY;INTERVAL=2");
        assert_eq!(weekly.compat_note(start).as_deref(), Some("(2W-W24)"));

        let monthly = RecurrenceRule::parse("FREQ=MONTHLY;INTERVAL=2");
        assert_eq!(monthly.compat_note(start).as_deref(), Some("(2D-W24)"));

        assert_eq!(daily.compat_note(None).as_deref(), Some("(3D)"));
        assert_eq!(RecurrenceRule::parse("FREQ=DAILY").compat_note(start), None);
    }
}
