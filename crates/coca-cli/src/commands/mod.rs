//! Subcommand implementations.

pub mod config;
pub mod convert;
pub mod profile;
pub mod scan;

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use coca_core::time;

use crate::cli::InputArgs;
use crate::error::{CliError, CliResult};
use crate::export;

/// Resolves `--today`, defaulting to the local date.
pub fn resolve_today(today: Option<&str>) -> CliResult<NaiveDate> {
    match today {
        Some(raw) => time::parse_date(raw.trim()).ok_or_else(|| CliError::InvalidDate(raw.to_string())),
        None => Ok(Local::now().date_naive()),
    }
}

/// Returns the explicit files, or the calendars found in the input directory.
pub fn resolve_sources(input: &InputArgs) -> CliResult<Vec<PathBuf>> {
    if !input.files.is_empty() {
        return Ok(input.files.clone());
    }
    let sources = export::discover_sources(&input.input_dir)?;
    if sources.is_empty() {
        return Err(CliError::NoSources(input.input_dir.clone()));
    }
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn today_override() {
        assert_eq!(
            resolve_today(Some("20250201")).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()
        );
        assert!(matches!(
            resolve_today(Some("2025-02-01")),
            Err(CliError::InvalidDate(_))
        ));
        assert!(resolve_today(None).is_ok());
    }

    #[test]
    fn explicit_files_win() {
        let input = InputArgs {
            files: vec![PathBuf::from("a.ics")],
            input_dir: PathBuf::from("/does/not/exist"),
            ..InputArgs::default()
        };
        assert_eq!(resolve_sources(&input).unwrap(), vec![PathBuf::from("a.ics")]);
    }

    #[test]
    fn empty_directory_has_no_sources() {
        let dir = tempfile::tempdir().unwrap();
        let input = InputArgs {
            input_dir: dir.path().to_path_buf(),
            ..InputArgs::default()
        };
        assert!(matches!(resolve_sources(&input), Err(CliError::NoSources(_))));
    }
}
