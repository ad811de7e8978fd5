//! Legacy vCalendar 1.0 writer.
//!
//! Renders one [`Event`] into the minimal record the target phone accepts:
//!
//! ```text
//! BEGIN:VCALENDAR
//! VERSION:1.0
//! BEGIN:VEVENT
//! SUMMARY;CHARSET=UTF-8:<summary>
//! DTSTART:<start>
//! DTEND:<end>
//! RRULE:<code> <start>        (repeating events only)
//! AALARM:<start>;;;
//! END:VEVENT
//! END:VCALENDAR
//! ```
//!
//! Lines are joined with CRLF and the record has no trailing line break.

use crate::event::Event;
use crate::time;

/// Line separator required by vCalendar.
pub const CRLF: &str = "\r\n";

/// File extension of legacy records.
pub const EXTENSION: &str = "vcs";

/// Until-date used for series without an end.
pub const OPEN_END_DATE: &str = "20991231";

/// Characters of the cleaned title used in file names.
const FILENAME_TITLE_LEN: usize = 15;

/// Characters of the start stamp used in file names.
const FILENAME_STAMP_LEN: usize = 15;

/// Computes the `DTEND` value.
///
/// For repeating events the device reads `DTEND` as the end of the series:
/// the rule's until-date (or [`OPEN_END_DATE`]) combined with the time of
/// day of the original end. Other events keep their original end.
pub fn end_stamp(event: &Event) -> String {
    if event.compaction().recurrence_code.is_none() {
        return event.end_original.clone();
    }

    let until = event
        .rule()
        .and_then(|rule| rule.until)
        .map(time::format_date)
        .unwrap_or_else(|| OPEN_END_DATE.to_string());
    let end_time = time::time_component(&event.end_original).unwrap_or(time::MIDNIGHT);
    format!("{until}{end_time}")
}

/// Returns the record lines for an event, without separators.
pub fn render_lines(event: &Event) -> Vec<String> {
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:1.0".to_string(),
        "BEGIN:VEVENT".to_string(),
        format!("SUMMARY;CHARSET=UTF-8:{}", event.final_summary()),
        format!("DTSTART:{}", event.start),
        format!("DTEND:{}", end_stamp(event)),
    ];

    if let Some(recurrence) = event.legacy_recurrence() {
        lines.push(format!("RRULE:{recurrence}"));
    }

    lines.push(format!("AALARM:{};;;", event.start));
    lines.push("END:VEVENT".to_string());
    lines.push("END:VCALENDAR".to_string());
    lines
}

/// Renders the record as text.
pub fn render_text(event: &Event) -> String {
    render_lines(event).join(CRLF)
}

/// Encodes text as ISO-8859-1, replacing unrepresentable characters with `?`.
pub fn encode_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

/// Renders the record as the bytes written to disk.
pub fn render(event: &Event) -> Vec<u8> {
    encode_latin1(&render_text(event))
}

/// Computes the output file name: `<title>_<start>.vcs`.
///
/// The title keeps only ASCII letters and digits (spaces are removed too)
/// and both parts are cut to 15 characters. Different events can map to the
/// same name.
pub fn filename(event: &Event) -> String {
    let title: String = event
        .title
        .replace(' ', "_")
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(FILENAME_TITLE_LEN)
        .collect();
    let stamp: String = event.start.chars().take(FILENAME_STAMP_LEN).collect();
    format!("{title}_{stamp}.{EXTENSION}")
}
