//! Raw event record as read from interchange text.
//!
//! A [`RawEventRecord`] collects the field values of one `VEVENT` block
//! exactly as they appear in the input (after unfolding and unescaping). It
//! is turned into an [`Event`](crate::event::Event) once the block ends.

/// The interchange fields the converter cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventField {
    Start,
    End,
    Summary,
    Location,
    Description,
    Rule,
    Uid,
}

impl EventField {
    /// Maps a property name to a field, case-insensitively.
    ///
    /// Returns `None` for properties the converter ignores.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_uppercase().as_str() {
            "DTSTART" => Some(Self::Start),
            "DTEND" => Some(Self::End),
            "SUMMARY" => Some(Self::Summary),
            "LOCATION" => Some(Self::Location),
            "DESCRIPTION" => Some(Self::Description),
            "RRULE" => Some(Self::Rule),
            "UID" => Some(Self::Uid),
            _ => None,
        }
    }

    /// Returns true for free-text fields that use iCalendar TEXT escaping.
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Summary | Self::Location | Self::Description)
    }
}

/// Field values of a single event block.
///
/// Empty strings mean "not present"; later occurrences of the same property
/// overwrite earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEventRecord {
    pub start: String,
    pub end: String,
    pub summary: String,
    pub location: String,
    pub description: String,
    pub rule: String,
    pub uid: String,
}

impl RawEventRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a field value.
    pub fn set(&mut self, field: EventField, value: impl Into<String>) {
        let slot = match field {
            EventField::Start => &mut self.start,
            EventField::End => &mut self.end,
            EventField::Summary => &mut self.summary,
            EventField::Location => &mut self.location,
            EventField::Description => &mut self.description,
            EventField::Rule => &mut self.rule,
            EventField::Uid => &mut self.uid,
        };
        *slot = value.into();
    }

    /// Builder method to set the start stamp.
    pub fn with_start(mut self, start: impl Into<String>) -> Self {
        self.start = start.into();
        self
    }

    /// Builder method to set the end stamp.
    pub fn with_end(mut self, end: impl Into<String>) -> Self {
        self.end = end.into();
        self
    }

    /// Builder method to set the summary.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Builder method to set the recurrence rule.
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = rule.into();
        self
    }

    /// Builder method to set the unique id.
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = uid.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_keys_are_case_insensitive() {
        assert_eq!(EventField::from_key("DTSTART"), Some(EventField::Start));
        assert_eq!(EventField::from_key("dtend"), Some(EventField::End));
        assert_eq!(EventField::from_key("Summary"), Some(EventField::Summary));
        assert_eq!(EventField::from_key("RRULE"), Some(EventField::Rule));
        assert_eq!(EventField::from_key("UID"), Some(EventField::Uid));
        assert_eq!(EventField::from_key("ATTENDEE"), None);
        assert_eq!(EventField::from_key(""), None);
    }

    #[test]
    fn set_overwrites() {
        let mut record = RawEventRecord::new();
        record.set(EventField::Summary, "first");
        record.set(EventField::Summary, "second");
        record.set(EventField::Description, "notes");
        assert_eq!(record.summary, "second");
        assert_eq!(record.description, "notes");
    }

    #[test]
    fn text_fields() {
        assert!(EventField::Summary.is_text());
        assert!(EventField::Location.is_text());
        assert!(!EventField::Rule.is_text());
        assert!(!EventField::Start.is_text());
    }
}
