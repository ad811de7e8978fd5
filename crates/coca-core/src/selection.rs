//! Choosing which scanned events to export.
//!
//! After [`scan`](crate::calendar::EventCollection::scan) has ordered events
//! by priority, the caller may skip ids exported in earlier runs and cap the
//! number of events per source. Previously exported ids come from an external
//! store exposed through the [`SeenIds`] trait.

use std::collections::HashSet;

use crate::event::Event;

/// A set of event ids that were already exported.
pub trait SeenIds {
    fn contains_id(&self, id: &str) -> bool;
}

impl SeenIds for HashSet<String> {
    fn contains_id(&self, id: &str) -> bool {
        self.contains(id)
    }
}

impl SeenIds for [String] {
    fn contains_id(&self, id: &str) -> bool {
        self.iter().any(|seen| seen == id)
    }
}

/// Export selection options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionOptions {
    /// Maximum events per source; 0 means no limit.
    pub max_events: usize,
    /// Skip events whose id was already exported or already selected.
    pub skip_duplicates: bool,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self {
            max_events: 0,
            skip_duplicates: true,
        }
    }
}

/// The outcome of [`select_for_export`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection<'a> {
    /// Events to export, in priority order.
    pub selected: Vec<&'a Event>,
    /// Events skipped because their id was seen before.
    pub duplicates: Vec<&'a Event>,
    /// Number of events cut off by the limit.
    pub over_limit: usize,
}

/// Applies duplicate suppression and the per-source limit.
///
/// Duplicates are removed first, so the limit counts only events that will
/// actually be written. An id repeated within the same source is exported
/// once.
pub fn select_for_export<'a, S>(
    scanned: &[&'a Event],
    seen: &S,
    options: SelectionOptions,
) -> Selection<'a>
where
    S: SeenIds + ?Sized,
{
    let mut selection = Selection::default();
    let mut taken: HashSet<&str> = HashSet::new();

    for &event in scanned {
        if options.skip_duplicates
            && (seen.contains_id(&event.id) || taken.contains(event.id.as_str()))
        {
            selection.duplicates.push(event);
            continue;
        }
        if options.max_events > 0 && selection.selected.len() >= options.max_events {
            selection.over_limit += 1;
            continue;
        }
        taken.insert(event.id.as_str());
        selection.selected.push(event);
    }

    selection
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str, start: &str) -> Event {
        Event::new(start, "", id.to_uppercase(), "", "", Some(id.to_string()))
    }

    fn ids<'a>(events: &[&'a Event]) -> Vec<&'a str> {
        events.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn no_limit_no_seen() {
        let events = [event("a", "20250101"), event("b", "20250102")];
        let scanned: Vec<&Event> = events.iter().collect();
        let selection = select_for_export(&scanned, &HashSet::<String>::new(), SelectionOptions::default());
        assert_eq!(ids(&selection.selected), vec!["a", "b"]);
        assert!(selection.duplicates.is_empty());
        assert_eq!(selection.over_limit, 0);
    }

    #[test]
    fn limit_keeps_priority_order() {
        let events = [event("a", "1"), event("b", "2"), event("c", "3")];
        let scanned: Vec<&Event> = events.iter().collect();
        let options = SelectionOptions {
            max_events: 2,
            skip_duplicates: false,
        };
        let selection = select_for_export(&scanned, &HashSet::<String>::new(), options);
        assert_eq!(ids(&selection.selected), vec!["a", "b"]);
        assert_eq!(selection.over_limit, 1);
    }

    #[test]
    fn previously_exported_ids_are_skipped() {
        let events = [event("a", "1"), event("b", "2"), event("c", "3")];
        let scanned: Vec<&Event> = events.iter().collect();
        let seen: HashSet<String> = ["a".to_string()].into_iter().collect();
        let options = SelectionOptions {
            max_events: 2,
            skip_duplicates: true,
        };
        let selection = select_for_export(&scanned, &seen, options);
        assert_eq!(ids(&selection.selected), vec!["b", "c"]);
        assert_eq!(ids(&selection.duplicates), vec!["a"]);
        assert_eq!(selection.over_limit, 0);
    }

    #[test]
    fn repeated_ids_within_source_export_once() {
        let events = [event("x", "1"), event("x", "2"), event("y", "3")];
        let scanned: Vec<&Event> = events.iter().collect();
        let seen: Vec<String> = Vec::new();
        let selection = select_for_export(&scanned, seen.as_slice(), SelectionOptions::default());
        assert_eq!(ids(&selection.selected), vec!["x", "y"]);
        assert_eq!(selection.duplicates.len(), 1);
    }

    #[test]
    fn duplicates_kept_when_disabled() {
        let events = [event("x", "1"), event("x", "2")];
        let scanned: Vec<&Event> = events.iter().collect();
        let seen: HashSet<String> = ["x".to_string()].into_iter().collect();
        let options = SelectionOptions {
            max_events: 0,
            skip_duplicates: false,
        };
        let selection = select_for_export(&scanned, &seen, options);
        assert_eq!(selection.selected.len(), 2);
        assert!(selection.duplicates.is_empty());
    }
}
