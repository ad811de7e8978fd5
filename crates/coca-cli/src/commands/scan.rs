//! Preview of the events an export would write.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use coca_core::{EventCollection, LocationFit, vcs};
use serde::Serialize;
use tracing::error;

use crate::error::{CliError, CliResult};
use crate::export;

/// One previewed event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanEntry {
    pub source: PathBuf,
    pub id: String,
    pub start: String,
    /// True for upcoming or still running events.
    pub active: bool,
    pub summary: String,
    pub recurrence: Option<&'static str>,
    pub location_fit: LocationFit,
    pub filename: String,
}

/// Builds preview entries in export priority order.
pub fn entries(
    collection: &EventCollection,
    source: &Path,
    today: NaiveDate,
    include_past: bool,
) -> Vec<ScanEntry> {
    let classification = collection.classify(today);
    let stale = if include_past {
        classification.stale.as_slice()
    } else {
        &[]
    };

    let active = classification.active.iter().map(|event| (event, true));
    let stale = stale.iter().map(|event| (event, false));
    active
        .chain(stale)
        .map(|(event, active)| {
            let compaction = event.compaction();
            ScanEntry {
                source: source.to_path_buf(),
                id: event.id.clone(),
                start: event.start.clone(),
                active,
                summary: compaction.summary.clone(),
                recurrence: compaction.recurrence_code,
                location_fit: compaction.location_fit,
                filename: vcs::filename(event),
            }
        })
        .collect()
}

/// Preview entries of every readable source.
#[derive(Debug, Default)]
pub struct Preview {
    pub entries: Vec<ScanEntry>,
    /// Sources that could not be read; the others are still previewed.
    pub failures: Vec<CliError>,
}

/// Reads each source in order, collecting entries and read failures.
pub fn preview(sources: &[PathBuf], today: NaiveDate, include_past: bool) -> Preview {
    let mut preview = Preview::default();
    for source in sources {
        match export::read_source(source) {
            Ok(collection) => {
                preview
                    .entries
                    .extend(entries(&collection, source, today, include_past));
            }
            Err(err) => {
                error!(source = %source.display(), error = %err, "failed to read calendar");
                preview.failures.push(err);
            }
        }
    }
    preview
}

/// Prints the preview as a table or as JSON.
///
/// Returns `false` if any source could not be read.
pub fn run(
    sources: &[PathBuf],
    today: NaiveDate,
    include_past: bool,
    json: bool,
) -> CliResult<bool> {
    let Preview {
        entries: all,
        failures,
    } = preview(sources, today, include_past);
    for failure in &failures {
        eprintln!("error: {}", failure);
    }
    let ok = failures.is_empty();

    if json {
        let out = serde_json::to_string_pretty(&all)
            .map_err(|e| CliError::Config(format!("failed to serialize preview: {}", e)))?;
        println!("{}", out);
        return Ok(ok);
    }

    if all.is_empty() {
        println!("No matching events found.");
        return Ok(ok);
    }
    for entry in &all {
        println!(
            "{:<6} {:<15} {:<40} {:<3} {}",
            if entry.active { "active" } else { "stale" },
            entry.start,
            entry.summary,
            entry.recurrence.unwrap_or("-"),
            entry.filename
        );
    }
    Ok(ok)
}
