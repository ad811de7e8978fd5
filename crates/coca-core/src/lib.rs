//! Core types: text normalization, recurrence rules, events, calendar
//! parsing and the legacy vCalendar writer

pub mod calendar;
pub mod event;
pub mod normalize;
pub mod raw_event;
pub mod recurrence;
pub mod selection;
pub mod time;
pub mod tracing;
pub mod vcs;

pub use calendar::{Classification, EventCollection, LineOutcome, SkipReason};
pub use event::{Compaction, Event, LocationFit, MAX_SUMMARY_LEN, compact_summary};
pub use normalize::normalize_text;
pub use raw_event::{EventField, RawEventRecord};
pub use recurrence::{Frequency, RecurrenceRule};
pub use selection::{SeenIds, Selection, SelectionOptions, select_for_export};
pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
