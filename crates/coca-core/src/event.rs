//! Event model and summary compaction.
//!
//! This module provides:
//! - [`Event`]: a normalized, zone-naive calendar event
//! - [`Compaction`]: the legacy summary line computed for an event
//! - [`compact_summary`]: the algorithm that fits title, location and the
//!   cadence note into the device's 40-character summary field

use std::cell::OnceCell;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::normalize::normalize_text;
use crate::raw_event::RawEventRecord;
use crate::recurrence::RecurrenceRule;
use crate::time;

/// Maximum summary length the legacy device accepts.
pub const MAX_SUMMARY_LEN: usize = 40;

/// How the location ended up in the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationFit {
    /// The event has no location.
    Absent,
    /// The location is included verbatim.
    Full,
    /// The location did not fit and was left out.
    Dropped,
}

/// The result of compacting an event's title for the legacy device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Compaction {
    /// Final summary line, at most [`MAX_SUMMARY_LEN`] characters.
    pub summary: String,
    /// Cadence note appended for intervals above one, e.g. `(3D-W24)`.
    pub note: Option<String>,
    pub location_fit: LocationFit,
    /// Legacy repeat code (`D1`, `W1`, `MD1`, `YD1`), if the event repeats.
    pub recurrence_code: Option<&'static str>,
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn take_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Fits title, location and cadence note into the legacy summary field.
///
/// 1. A rule with interval > 1 contributes a note (`(<n><unit>-W<week>)`)
///    that is always kept, separated by a space.
/// 2. If `title, location note` fits into 40 characters it is used verbatim.
/// 3. Otherwise the location is left out.
/// 4. If the title and note still do not fit, the title is cut to the room
///    left by the note and trimmed.
///
/// The returned summary never exceeds [`MAX_SUMMARY_LEN`] characters.
pub fn compact_summary(
    title: &str,
    location: &str,
    rule: Option<&RecurrenceRule>,
    start: Option<NaiveDate>,
) -> Compaction {
    let note = rule.and_then(|r| r.compat_note(start));
    let suffix = note.as_deref().map(|n| format!(" {n}")).unwrap_or_default();
    let recurrence_code = rule.and_then(RecurrenceRule::legacy_code);

    let mut location_fit = if location.is_empty() {
        LocationFit::Absent
    } else {
        LocationFit::Full
    };
    let mut summary = assemble(title, location, &suffix);

    if char_len(&summary) > MAX_SUMMARY_LEN && !location.is_empty() {
        location_fit = LocationFit::Dropped;
        summary = assemble(title, "", &suffix);
    }

    if char_len(&summary) > MAX_SUMMARY_LEN {
        let title_max = MAX_SUMMARY_LEN.saturating_sub(char_len(&suffix));
        summary = assemble(take_chars(title, title_max).trim(), "", &suffix);
    }

    Compaction {
        summary,
        note,
        location_fit,
        recurrence_code,
    }
}

fn assemble(title: &str, location: &str, suffix: &str) -> String {
    if location.is_empty() {
        format!("{title}{suffix}")
    } else {
        format!("{title}, {location}{suffix}")
    }
}

/// A calendar event ready for export.
///
/// Stamps are zone-naive `YYYYMMDD[THHMMSS]` strings; title and location are
/// normalized for the device. The summary compaction is computed on first
/// use and cached.
#[derive(Debug, Clone)]
pub struct Event {
    /// Unique id; synthesized as `start-title` when the input has none.
    pub id: String,
    pub start: String,
    /// Original end stamp, or the start stamp when the input has none.
    pub end_original: String,
    pub title: String,
    pub location: String,
    /// The raw `RRULE` value, empty when the event does not repeat.
    pub recurrence_raw: String,
    compaction: OnceCell<Compaction>,
}

impl Event {
    /// Creates an event from already normalized parts.
    ///
    /// Missing ids are synthesized from start and title. The synthetic id is
    /// not guaranteed to be unique: two events sharing start and title
    /// collide, and are treated as duplicates downstream.
    pub fn new(
        start: impl Into<String>,
        end: impl Into<String>,
        title: impl Into<String>,
        location: impl Into<String>,
        recurrence_raw: impl Into<String>,
        id: Option<String>,
    ) -> Self {
        let start = start.into();
        let end = end.into();
        let title = title.into();
        let end_original = if end.is_empty() { start.clone() } else { end };
        let id = id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("{start}-{title}"));

        Self {
            id,
            start,
            end_original,
            title,
            location: location.into(),
            recurrence_raw: recurrence_raw.into(),
            compaction: OnceCell::new(),
        }
    }

    /// Converts a raw record: strips zone suffixes and normalizes text.
    pub fn from_record(record: &RawEventRecord) -> Self {
        let uid = record.uid.trim();
        Self::new(
            time::strip_zone(&record.start),
            time::strip_zone(&record.end),
            normalize_text(&record.summary),
            normalize_text(&record.location),
            record.rule.trim(),
            (!uid.is_empty()).then(|| uid.to_string()),
        )
    }

    /// Returns true if the event carries a recurrence rule.
    pub fn is_recurring(&self) -> bool {
        !self.recurrence_raw.is_empty()
    }

    /// Parses the recurrence rule, if any.
    pub fn rule(&self) -> Option<RecurrenceRule> {
        self.is_recurring()
            .then(|| RecurrenceRule::parse(&self.recurrence_raw))
    }

    /// The calendar date of the start stamp.
    pub fn start_date(&self) -> Option<NaiveDate> {
        time::date_of(&self.start)
    }

    /// Returns true if the event starts on or after `today`.
    ///
    /// Compares the date prefixes as strings, so an event without a usable
    /// start never counts as upcoming.
    pub fn starts_on_or_after(&self, today: NaiveDate) -> bool {
        time::date_prefix(&self.start) >= time::format_date(today).as_str()
    }

    /// Returns true if the event still matters for export on `today`.
    ///
    /// Upcoming events are relevant, as are recurring events whose series
    /// has not ended yet.
    pub fn is_relevant(&self, today: NaiveDate) -> bool {
        if self.starts_on_or_after(today) {
            return true;
        }
        self.rule()
            .is_some_and(|rule| rule.is_ongoing(self.start_date(), today))
    }

    /// Returns the cached summary compaction, computing it on first use.
    pub fn compaction(&self) -> &Compaction {
        self.compaction.get_or_init(|| {
            let rule = self.rule();
            compact_summary(&self.title, &self.location, rule.as_ref(), self.start_date())
        })
    }

    /// The final legacy summary line.
    pub fn final_summary(&self) -> &str {
        &self.compaction().summary
    }

    /// The legacy recurrence value (`<code> <start>`), if the event repeats
    /// in a way the device understands.
    pub fn legacy_recurrence(&self) -> Option<String> {
        self.compaction()
            .recurrence_code
            .map(|code| format!("{code} {}", self.start))
    }
}

// The cached compaction is derived from the other fields.
impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.start == other.start
            && self.end_original == other.end_original
            && self.title == other.title
            && self.location == other.location
            && self.recurrence_raw == other.recurrence_raw
    }
}

impl Eq for Event {}
