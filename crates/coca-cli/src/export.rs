//! Export pipeline: calendars in, legacy records out.
//!
//! Sources are processed one at a time in the order given. A source that
//! cannot be read or written is reported and skipped; the others still run.
//! Only the output directory is required up front.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use coca_core::{EventCollection, LocationFit, select_for_export, vcs};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::ExportSettings;
use crate::error::{CliError, CliResult};
use crate::profile::ProfileStore;

/// Extension of input calendars.
pub const SOURCE_EXTENSION: &str = "ics";

/// One legacy record written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenEvent {
    pub id: String,
    pub summary: String,
    pub path: PathBuf,
}

/// What happened to one input calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceReport {
    pub source: PathBuf,
    /// Events returned by the scan.
    pub found: usize,
    pub written: Vec<WrittenEvent>,
    /// Events skipped as already exported.
    pub duplicates: usize,
    /// Events cut off by the per-source limit.
    pub over_limit: usize,
    /// Set when the source failed; earlier writes are kept.
    pub error: Option<String>,
}

impl SourceReport {
    fn new(source: &Path) -> Self {
        Self {
            source: source.to_path_buf(),
            ..Self::default()
        }
    }
}

/// Result of a whole export run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    pub out_dir: PathBuf,
    pub sources: Vec<SourceReport>,
}

impl ExportReport {
    /// Total number of files written.
    pub fn files_written(&self) -> usize {
        self.sources.iter().map(|s| s.written.len()).sum()
    }

    /// Sources that produced at least one file.
    pub fn sources_converted(&self) -> usize {
        self.sources.iter().filter(|s| !s.written.is_empty()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &SourceReport> {
        self.sources.iter().filter(|s| s.error.is_some())
    }
}

/// Lists `*.ics` files in a directory, sorted by name.
pub fn discover_sources(dir: &Path) -> CliResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| CliError::io(dir, e))?;
    let mut sources: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(SOURCE_EXTENSION))
        })
        .collect();
    sources.sort();
    Ok(sources)
}

/// Reads a calendar file, replacing undecodable bytes.
pub fn read_source(path: &Path) -> CliResult<EventCollection> {
    let bytes = std::fs::read(path).map_err(|e| CliError::io(path, e))?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(EventCollection::parse(&text))
}

/// Converts every source and records exported ids in the profile.
///
/// # Errors
///
/// Fails only if the output directory cannot be created. Per-source
/// failures, including a profile that cannot be saved, are returned in the
/// report and the remaining sources still run.
pub fn run(
    sources: &[PathBuf],
    settings: &ExportSettings,
    profile: &mut ProfileStore,
    today: NaiveDate,
) -> CliResult<ExportReport> {
    let out_dir = &settings.out_dir;
    std::fs::create_dir_all(out_dir).map_err(|e| CliError::io(out_dir, e))?;

    let mut report = ExportReport {
        out_dir: out_dir.clone(),
        sources: Vec::with_capacity(sources.len()),
    };

    for source in sources {
        let mut source_report = SourceReport::new(source);
        match export_source(source, settings, profile, today, &mut source_report) {
            Ok(()) => {
                let added = profile.record(source_report.written.iter().map(|w| w.id.clone()));
                if added > 0
                    && let Err(err) = profile.save()
                {
                    error!(path = %profile.path().display(), error = %err, "failed to save profile");
                    source_report.error = Some(err.to_string());
                }
                info!(
                    source = %source.display(),
                    found = source_report.found,
                    written = source_report.written.len(),
                    duplicates = source_report.duplicates,
                    over_limit = source_report.over_limit,
                    "converted calendar"
                );
            }
            Err(err) => {
                error!(source = %source.display(), error = %err, "failed to convert calendar");
                source_report.error = Some(err.to_string());
            }
        }
        report.sources.push(source_report);
    }

    Ok(report)
}

fn export_source(
    source: &Path,
    settings: &ExportSettings,
    profile: &ProfileStore,
    today: NaiveDate,
    report: &mut SourceReport,
) -> CliResult<()> {
    let collection = read_source(source)?;
    let scanned = collection.scan(today, settings.include_past);
    report.found = scanned.len();
    debug!(source = %source.display(), parsed = collection.len(), scanned = scanned.len(), "scanned calendar");

    let selection = select_for_export(&scanned, profile, settings.selection());
    report.duplicates = selection.duplicates.len();
    report.over_limit = selection.over_limit;

    for event in selection.selected {
        let compaction = event.compaction();
        if compaction.location_fit == LocationFit::Dropped {
            warn!(
                title = %event.title,
                location = %event.location,
                "location left out, summary would exceed 40 characters"
            );
        }
        if compaction.summary != event.title {
            debug!(id = %event.id, summary = %compaction.summary, "compacted summary");
        }

        let path = settings.out_dir.join(vcs::filename(event));
        std::fs::write(&path, vcs::render(event)).map_err(|e| CliError::io(&path, e))?;
        report.written.push(WrittenEvent {
            id: event.id.clone(),
            summary: compaction.summary.clone(),
            path,
        });
    }

    Ok(())
}
