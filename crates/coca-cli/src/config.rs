//! Converter configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/coca/config.toml` by default:
//!
//! ```toml
//! debug = false
//!
//! [export]
//! out_dir = "vcs_files"
//! max_events = 0
//! include_past = false
//! skip_duplicates = true
//!
//! [profile]
//! path = "/home/me/.local/share/coca/profile.json"
//! ```
//!
//! `max_events` accepts an integer or a numeric string; anything else is
//! rejected when the file is loaded.

use std::fmt;
use std::path::{Path, PathBuf};

use coca_core::SelectionOptions;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUT_DIR: &str = "vcs_files";

// ---------------------------------------------------------------------------
// CocaConfig (config.toml)
// ---------------------------------------------------------------------------

/// Configuration for the coca converter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CocaConfig {
    /// Debug mode.
    pub debug: bool,

    /// Export settings.
    pub export: ExportSettings,

    /// Profile store settings.
    pub profile: ProfileSettings,
}

/// Settings for writing legacy records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Directory receiving the `.vcs` files.
    pub out_dir: PathBuf,

    /// Maximum events exported per source, 0 means unlimited.
    #[serde(deserialize_with = "deserialize_max_events")]
    pub max_events: usize,

    /// Also export events that are no longer relevant, after the active ones.
    pub include_past: bool,

    /// Skip events already recorded in the profile.
    pub skip_duplicates: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            max_events: 0,
            include_past: false,
            skip_duplicates: true,
        }
    }
}

impl ExportSettings {
    /// Selection options derived from these settings.
    pub fn selection(&self) -> SelectionOptions {
        SelectionOptions {
            max_events: self.max_events,
            skip_duplicates: self.skip_duplicates,
        }
    }
}

/// Profile store settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSettings {
    /// Path to the profile file; defaults to the data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl ProfileSettings {
    /// The profile path in effect.
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(CocaConfig::default_profile_path)
    }
}

/// Accepts `max_events = 3` as well as `max_events = "3"`.
fn deserialize_max_events<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    struct MaxEventsVisitor;

    impl Visitor<'_> for MaxEventsVisitor {
        type Value = usize;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative number of events")
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<usize, E> {
            usize::try_from(value).map_err(|_| E::custom(format!("max_events {value} is too large")))
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<usize, E> {
            usize::try_from(value)
                .map_err(|_| E::custom(format!("max_events must not be negative, got {value}")))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<usize, E> {
            value
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("max_events must be a number, got '{value}'")))
        }
    }

    deserializer.deserialize_any(MaxEventsVisitor)
}

impl CocaConfig {
    /// Loads configuration from the default path, or defaults if absent.
    pub fn load() -> CliResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads and validates configuration from a specific path.
    pub fn load_from(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            CliError::Config(format!("failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, or the default path when none is given, keeping
    /// defaults on failure.
    ///
    /// The load error is returned next to the defaults so commands that only
    /// inspect the configuration still run against a broken file.
    pub fn load_lenient(path: Option<&Path>) -> (Self, Option<CliError>) {
        let loaded = match path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        };
        match loaded {
            Ok(config) => (config, None),
            Err(err) => (Self::default(), Some(err)),
        }
    }

    /// Checks values that deserialize fine but cannot be used.
    pub fn validate(&self) -> CliResult<()> {
        if self.export.out_dir.as_os_str().is_empty() {
            return Err(CliError::Config(
                "export.out_dir must not be empty".to_string(),
            ));
        }
        if let Some(ref path) = self.profile.path
            && path.as_os_str().is_empty()
        {
            return Err(CliError::Config("profile.path must not be empty".to_string()));
        }
        Ok(())
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("coca")
    }

    /// Returns the default data directory path.
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("coca")
    }

    /// Returns the default profile store path.
    pub fn default_profile_path() -> PathBuf {
        Self::default_data_dir().join("profile.json")
    }
}
