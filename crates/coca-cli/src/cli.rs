//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use coca_core::TracingOutputFormat;

use crate::config::CocaConfig;

/// coca - convert iCalendar files for legacy vCalendar 1.0 phones
///
/// Without a subcommand, converts the given .ics files (or every .ics file
/// in the input directory) into one .vcs file per event.
#[derive(Debug, Parser)]
#[command(name = "coca")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "COCA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Log format: compact, pretty or json
    #[arg(long, value_name = "FORMAT")]
    pub log_format: Option<TracingOutputFormat>,

    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub export: ExportArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Where calendars come from and which day counts as today.
#[derive(Debug, Clone, Default, Args)]
pub struct InputArgs {
    /// Calendar files to convert
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Directory scanned for .ics files when no files are given
    #[arg(long, short = 'i', default_value = ".")]
    pub input_dir: PathBuf,

    /// Treat this date (YYYYMMDD) as today
    #[arg(long, value_name = "YYYYMMDD")]
    pub today: Option<String>,

    /// Also include past events, after the upcoming ones
    #[arg(long, short = 'a', visible_alias = "include-past")]
    pub all_past: bool,
}

/// Overrides for the `[export]` and `[profile]` settings.
#[derive(Debug, Clone, Default, Args)]
pub struct ExportArgs {
    /// Output directory for .vcs files
    #[arg(long, short = 'o')]
    pub out_dir: Option<PathBuf>,

    /// Maximum events exported per file (0 = unlimited)
    #[arg(long, short = 'n')]
    pub max_events: Option<usize>,

    /// Skip events exported in earlier runs
    #[arg(long, overrides_with = "keep_duplicates")]
    pub skip_duplicates: bool,

    /// Export events even if they were exported before
    #[arg(long, overrides_with = "skip_duplicates")]
    pub keep_duplicates: bool,

    /// Path to the profile of exported events
    #[arg(long, env = "COCA_PROFILE")]
    pub profile: Option<PathBuf>,
}

impl ExportArgs {
    /// Returns the duplicate handling requested on the command line, if any.
    pub fn skip_duplicates(&self) -> Option<bool> {
        if self.skip_duplicates {
            Some(true)
        } else if self.keep_duplicates {
            Some(false)
        } else {
            None
        }
    }

    /// Applies command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut CocaConfig) {
        if let Some(ref out_dir) = self.out_dir {
            config.export.out_dir = out_dir.clone();
        }
        if let Some(max_events) = self.max_events {
            config.export.max_events = max_events;
        }
        if let Some(skip) = self.skip_duplicates() {
            config.export.skip_duplicates = skip;
        }
        if let Some(ref profile) = self.profile {
            config.profile.path = Some(profile.clone());
        }
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Preview which events would be exported, without writing files
    Scan {
        #[command(flatten)]
        input: InputArgs,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Profile of exported events
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}

/// Profile actions.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// List exported event ids
    Show,

    /// Forget all exported event ids
    Clear,

    /// Show profile file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_is_the_default() {
        let cli = Cli::try_parse_from(["coca", "a.ics", "b.ics", "-o", "out", "-n", "3", "--all-past"])
            .unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.input.files, vec![PathBuf::from("a.ics"), PathBuf::from("b.ics")]);
        assert!(cli.input.all_past);
        assert_eq!(cli.export.out_dir, Some(PathBuf::from("out")));
        assert_eq!(cli.export.max_events, Some(3));
    }

    #[test]
    fn non_numeric_max_events_is_rejected() {
        assert!(Cli::try_parse_from(["coca", "--max-events", "many"]).is_err());
    }

    #[test]
    fn scan_subcommand() {
        let cli = Cli::try_parse_from(["coca", "scan", "--json", "--include-past", "x.ics"]).unwrap();
        match cli.command {
            Some(Command::Scan { input, json }) => {
                assert!(json);
                assert!(input.all_past);
                assert_eq!(input.files, vec![PathBuf::from("x.ics")]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn log_format_flag() {
        let cli = Cli::try_parse_from(["coca", "--log-format", "json"]).unwrap();
        assert_eq!(cli.log_format, Some(TracingOutputFormat::Json));
    }

    #[test]
    fn overrides_apply_to_config() {
        let cli = Cli::try_parse_from(["coca", "--keep-duplicates", "--profile", "/tmp/p.json"]).unwrap();
        let mut config = CocaConfig::default();
        cli.export.apply(&mut config);
        assert!(!config.export.skip_duplicates);
        assert_eq!(config.profile.path, Some(PathBuf::from("/tmp/p.json")));
        assert_eq!(config.export.max_events, 0);
    }

    #[test]
    fn last_duplicate_flag_wins() {
        let cli = Cli::try_parse_from(["coca", "--keep-duplicates", "--skip-duplicates"]).unwrap();
        assert_eq!(cli.export.skip_duplicates(), Some(true));

        let cli = Cli::try_parse_from(["coca"]).unwrap();
        assert_eq!(cli.export.skip_duplicates(), None);
    }
}
