//! coca CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use coca_core::tracing::{TracingConfig, init_tracing};

use coca_cli::cli::{Cli, Command, ConfigAction, ProfileAction};
use coca_cli::commands;
use coca_cli::config::CocaConfig;
use coca_cli::error::CliResult;
use coca_cli::profile::ProfileStore;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<bool> {
    // Load configuration; `config` subcommands tolerate a broken file
    let config_path = cli.config.clone().unwrap_or_else(CocaConfig::default_path);
    let (mut config, load_error) = CocaConfig::load_lenient(cli.config.as_deref());
    let inspecting_config = matches!(cli.command, Some(Command::Config { .. }));
    if !inspecting_config
        && let Some(err) = load_error
    {
        return Err(err);
    }
    cli.export.apply(&mut config);
    if cli.input.all_past {
        config.export.include_past = true;
    }
    if !inspecting_config {
        config.validate()?;
    }

    // Initialize tracing
    let mut tracing_config = if cli.debug || config.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::default()
    };
    if let Some(format) = cli.log_format {
        tracing_config = tracing_config.with_format(format);
    }
    init_tracing(tracing_config)?;

    match cli.command {
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => commands::config::dump(&config, &config_path, load_error.as_ref())?,
            ConfigAction::Validate => commands::config::validate(&config, load_error)?,
            ConfigAction::Path => commands::config::path(&config_path)?,
        },
        Some(Command::Profile { action }) => {
            let mut profile = ProfileStore::load(config.profile.resolved_path());
            match action {
                ProfileAction::Show => commands::profile::show(&profile)?,
                ProfileAction::Clear => commands::profile::clear(&mut profile)?,
                ProfileAction::Path => commands::profile::path(&profile)?,
            }
        }
        Some(Command::Scan { input, json }) => {
            let today = commands::resolve_today(input.today.as_deref())?;
            let sources = commands::resolve_sources(&input)?;
            let include_past = input.all_past || config.export.include_past;
            return commands::scan::run(&sources, today, include_past, json);
        }
        None => {
            let today = commands::resolve_today(cli.input.today.as_deref())?;
            let sources = commands::resolve_sources(&cli.input)?;
            return commands::convert::run(&sources, &config, today);
        }
    }

    Ok(true)
}
