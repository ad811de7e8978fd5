//! Default command: convert calendars to legacy records.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::config::CocaConfig;
use crate::error::CliResult;
use crate::export;
use crate::profile::ProfileStore;

/// Converts the sources and prints a summary.
///
/// Returns `false` if any source failed.
pub fn run(sources: &[PathBuf], config: &CocaConfig, today: NaiveDate) -> CliResult<bool> {
    let mut profile = ProfileStore::load(config.profile.resolved_path());
    let report = export::run(sources, &config.export, &mut profile, today)?;

    for source in &report.sources {
        let name = source.source.display();
        if let Some(ref error) = source.error {
            eprintln!("error: {}", error);
            if source.written.is_empty() {
                continue;
            }
        }
        if source.found == 0 {
            println!("No matching events found in '{}'.", name);
            continue;
        }
        println!(
            "{}: {} event(s) found, {} written",
            name,
            source.found,
            source.written.len()
        );
        for written in &source.written {
            println!("  -> {}", written.summary);
        }
        if source.duplicates > 0 {
            println!("  {} already exported, skipped", source.duplicates);
        }
        if source.over_limit > 0 {
            println!("  {} over the limit of {}", source.over_limit, config.export.max_events);
        }
    }

    println!();
    println!(
        "Done! Processed {} file(s), created {} .vcs file(s) in {}",
        report.sources_converted(),
        report.files_written(),
        report.out_dir.display()
    );

    Ok(report.failures().next().is_none())
}
