//! CLI, configuration, profile store and export pipeline
//!
//! This crate provides the `coca` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod profile;

pub use cli::Cli;
pub use config::CocaConfig;
pub use error::{CliError, CliResult};
pub use export::{ExportReport, SourceReport};
pub use profile::ProfileStore;
