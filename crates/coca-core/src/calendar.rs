//! Interchange text parsing and relevance classification.
//!
//! [`EventCollection::parse`] reads `VEVENT` blocks from iCalendar text into
//! [`Event`]s. Parsing is line-oriented and tolerant: every line is classified
//! into a [`LineOutcome`], and lines that cannot be used are skipped with a
//! [`SkipReason`] instead of failing the whole input.
//!
//! [`EventCollection::scan`] orders events by start and splits them into
//! active and stale sets for export.

use chrono::NaiveDate;
use tracing::{debug, trace};

use crate::event::Event;
use crate::raw_event::{EventField, RawEventRecord};

/// Component name of calendar events.
const EVENT_COMPONENT: &str = "VEVENT";

/// Why a line was not used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The line is empty or whitespace.
    Blank,
    /// The line has no `:` separating name and value.
    NoSeparator,
    /// The property name is empty.
    EmptyName,
    /// The property is not one the converter reads.
    Ignored,
}

/// Classification of a single (unfolded) input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome<'a> {
    /// `BEGIN:<component>`
    Begin(&'a str),
    /// `END:<component>`
    End(&'a str),
    /// A property the converter reads, with its unescaped value.
    Field(EventField, String),
    Skip(SkipReason),
}

/// Joins folded lines.
///
/// A line starting with a space or tab continues the previous line, with
/// the leading whitespace character removed.
pub fn unfold_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for line in text.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if let Some(continuation) = line.strip_prefix([' ', '\t'])
            && let Some(previous) = lines.last_mut()
        {
            previous.push_str(continuation);
            continue;
        }
        lines.push(line.to_string());
    }
    lines
}

/// Resolves iCalendar TEXT escapes.
///
/// `\\`, `\,` and `\;` become the literal character; `\n` and `\N` become a
/// space because the device shows single-line titles only.
pub fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => out.push(' '),
            Some(escaped) => out.push(escaped),
            None => out.push('\\'),
        }
    }
    out
}

/// Finds the `:` separating name/parameters from the value.
///
/// Colons inside double-quoted parameter values (`TZID="GMT+01:00"`) do not
/// count.
fn value_separator(line: &str) -> Option<usize> {
    let mut quoted = false;
    for (idx, c) in line.char_indices() {
        match c {
            '"' => quoted = !quoted,
            ':' if !quoted => return Some(idx),
            _ => {}
        }
    }
    None
}

/// Classifies one unfolded line.
pub fn classify_line(line: &str) -> LineOutcome<'_> {
    let line = line.trim();
    if line.is_empty() {
        return LineOutcome::Skip(SkipReason::Blank);
    }

    let Some(sep) = value_separator(line) else {
        return LineOutcome::Skip(SkipReason::NoSeparator);
    };
    let (head, value) = (&line[..sep], &line[sep + 1..]);
    let name = head.split(';').next().unwrap_or_default().trim();

    if name.is_empty() {
        return LineOutcome::Skip(SkipReason::EmptyName);
    }
    if name.eq_ignore_ascii_case("BEGIN") {
        return LineOutcome::Begin(value.trim());
    }
    if name.eq_ignore_ascii_case("END") {
        return LineOutcome::End(value.trim());
    }

    match EventField::from_key(name) {
        Some(field) if field.is_text() => LineOutcome::Field(field, unescape_text(value)),
        Some(field) => LineOutcome::Field(field, value.to_string()),
        None => LineOutcome::Skip(SkipReason::Ignored),
    }
}

/// Events ordered for export, split by relevance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification<'a> {
    /// Upcoming events and recurring events whose series is still running.
    pub active: Vec<&'a Event>,
    /// Everything else.
    pub stale: Vec<&'a Event>,
}

/// The events of one input source, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventCollection {
    events: Vec<Event>,
}

impl EventCollection {
    /// Creates a collection from already built events.
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// Parses all `VEVENT` blocks from interchange text.
    ///
    /// - Fields of nested components (e.g. `VALARM`) are ignored.
    /// - A `BEGIN:VEVENT` inside an open event restarts the record.
    /// - `END:VEVENT` without an open event, and an event still open at the
    ///   end of input, are dropped.
    pub fn parse(text: &str) -> Self {
        let mut events = Vec::new();
        let mut current: Option<RawEventRecord> = None;
        let mut depth = 0usize;

        for (idx, line) in unfold_lines(text).iter().enumerate() {
            let line_no = idx + 1;
            match classify_line(line) {
                LineOutcome::Begin(name) if name.eq_ignore_ascii_case(EVENT_COMPONENT) => {
                    if current.is_some() {
                        debug!(line = line_no, "Nested BEGIN:VEVENT, restarting record");
                    }
                    current = Some(RawEventRecord::new());
                    depth = 0;
                }
                LineOutcome::Begin(_) => {
                    if current.is_some() {
                        depth += 1;
                    }
                }
                LineOutcome::End(name) if name.eq_ignore_ascii_case(EVENT_COMPONENT) => {
                    match current.take() {
                        Some(record) => events.push(Event::from_record(&record)),
                        None => debug!(line = line_no, "END:VEVENT without BEGIN, ignoring"),
                    }
                    depth = 0;
                }
                LineOutcome::End(_) => {
                    depth = depth.saturating_sub(1);
                }
                LineOutcome::Field(field, value) => {
                    if depth == 0
                        && let Some(record) = current.as_mut()
                    {
                        record.set(field, value);
                    }
                }
                LineOutcome::Skip(reason) => {
                    trace!(line = line_no, ?reason, "Skipping line");
                }
            }
        }

        if current.is_some() {
            debug!("Input ended inside an event, dropping it");
        }

        debug!(count = events.len(), "Parsed events");
        Self { events }
    }

    /// The events in input order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Sorts events by start and splits them by relevance on `today`.
    ///
    /// The sort is stable, so events sharing a start keep their input order.
    /// The collection itself is not modified.
    pub fn classify(&self, today: NaiveDate) -> Classification<'_> {
        let mut sorted: Vec<&Event> = self.events.iter().collect();
        sorted.sort_by(|a, b| a.start.cmp(&b.start));

        let (active, stale) = sorted.into_iter().partition(|e| e.is_relevant(today));
        Classification { active, stale }
    }

    /// Returns the events to export, ordered by priority.
    ///
    /// Active events come first in start order. With `include_past`, stale
    /// events follow, also in start order, so a later count limit always
    /// prefers active events.
    pub fn scan(&self, today: NaiveDate, include_past: bool) -> Vec<&Event> {
        let Classification { mut active, stale } = self.classify(today);
        if include_past {
            active.extend(stale);
        }
        active
    }
}
