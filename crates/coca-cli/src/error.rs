//! CLI error types.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors surfaced to the user by the `coca` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// The configuration file or a command-line override is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Reading or writing a file failed.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The profile store could not be written.
    #[error("profile error: {0}")]
    Profile(String),

    /// A `--today` override was not a `YYYYMMDD` date.
    #[error("invalid date '{0}' (expected YYYYMMDD)")]
    InvalidDate(String),

    /// No input calendars were given or found.
    #[error("no .ics files found in {}", .0.display())]
    NoSources(PathBuf),

    #[error("failed to initialize logging: {0}")]
    Tracing(#[from] coca_core::TracingError),
}

impl CliError {
    /// Wraps an IO error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_mentions_path() {
        let err = CliError::io(
            "/tmp/missing.ics",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert_eq!(err.to_string(), "/tmp/missing.ics: not found");
    }

    #[test]
    fn invalid_date_message() {
        let err = CliError::InvalidDate("2025-01-01".to_string());
        assert_eq!(
            err.to_string(),
            "invalid date '2025-01-01' (expected YYYYMMDD)"
        );
    }
}
