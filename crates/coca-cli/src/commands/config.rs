//! Configuration commands.
//!
//! These run even when the configuration file cannot be loaded, so a broken
//! file can still be located and diagnosed.

use std::path::Path;

use crate::config::CocaConfig;
use crate::error::{CliError, CliResult};

/// Dump the current configuration to stdout.
///
/// With a load error the defaults are dumped and the error is reported on
/// stderr.
pub fn dump(config: &CocaConfig, path: &Path, load_error: Option<&CliError>) -> CliResult<()> {
    if let Some(err) = load_error {
        eprintln!("warning: {}; showing defaults", err);
    }
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| CliError::Config(format!("failed to serialize config: {}", e)))?;
    println!("# config.toml ({})", path.display());
    println!("{}", toml_str);

    Ok(())
}

/// Validate the configuration.
///
/// # Errors
///
/// Returns the load error, if any, or the first invalid setting.
pub fn validate(config: &CocaConfig, load_error: Option<CliError>) -> CliResult<()> {
    if let Some(err) = load_error {
        return Err(err);
    }
    config.validate()?;
    println!("Configuration is valid.");
    println!("  output directory: {}", config.export.out_dir.display());
    match config.export.max_events {
        0 => println!("  events per file:  unlimited"),
        n => println!("  events per file:  {}", n),
    }
    println!("  profile:          {}", config.profile.resolved_path().display());
    Ok(())
}

/// Show the configuration file path.
pub fn path(path: &Path) -> CliResult<()> {
    println!("config: {}", path.display());
    Ok(())
}
