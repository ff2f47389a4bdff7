//! # new-go-server
//!
//! Generates a ready-to-run Go backend server project.
//!
//! ## Startup sequence
//!
//! 1. Parse CLI arguments (clap handles `--help` / `--version` early-exit).
//! 2. Initialise the tracing subscriber (logging).
//! 3. Load configuration (defaults + file + env).
//! 4. Build the [`OutputManager`].
//! 5. Dispatch: generation when no subcommand is given.
//! 6. Translate any [`CliError`] into a user-facing message and exit code.
//!
//! ## Exit codes
//!
//! | Code | Meaning                          |
//! |------|----------------------------------|
//! |  0   | Success                          |
//! |  1   | Any failure, at any stage        |
//! |  2   | Invalid command-line arguments   |

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info, instrument};

use crate::{
    cli::{Cli, Commands, ConfigCommands},
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;
mod prompt;

fn main() -> ExitCode {
    // Missing .env is fine; real deployments use the environment directly.
    let _ = dotenvy::dotenv();

    // ── 1. Parse arguments ────────────────────────────────────────────────
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version come through here too, with exit code 0.
            let _ = e.print();
            return ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(2));
        }
    };

    // ── 2. Initialise tracing ─────────────────────────────────────────────
    if let Err(e) = init_logging(&cli.global) {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::from(1);
    }

    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        no_color = cli.global.no_color,
        "CLI started"
    );

    // ── 3. Load configuration ─────────────────────────────────────────────
    // `config init` has to work before the file it creates exists.
    let config = if matches!(
        cli.command,
        Some(Commands::Config(ConfigCommands::Init { .. }))
    ) {
        Ok(AppConfig::default())
    } else {
        AppConfig::load(cli.global.config.as_deref())
    };
    let config = match config {
        Ok(cfg) => cfg,
        Err(e) => {
            let verbose = cli.global.verbose > 0;
            return handle_error(
                CliError::ConfigError {
                    message: format!("{e:#}"),
                    source: Some(e.into()),
                },
                verbose,
            );
        }
    };

    // ── 4. Build output manager ───────────────────────────────────────────
    let output = OutputManager::new(&cli.global, &config);

    // ── 5. Dispatch + 6. Error handling ──────────────────────────────────
    let verbose = cli.global.verbose > 0;
    match run(cli, config, output) {
        Ok(()) => {
            info!("new-go-server completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => handle_error(e, verbose),
    }
}

/// Dispatch to the correct command handler.
#[instrument(skip_all)]
fn run(cli: Cli, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cli.command {
        None => commands::generate::execute(cli.generate, cli.global, config, output),
        Some(Commands::Manifest(cmd)) => commands::manifest::execute(cmd, output),
        Some(Commands::Completions(cmd)) => commands::completions::execute(cmd),
        Some(Commands::Config(cmd)) => commands::config::execute(cmd, cli.global, config, output),
    }
}

/// Translate a `CliError` into a user message and an exit code.
fn handle_error(err: CliError, verbose: bool) -> ExitCode {
    err.log();

    // Written to stderr so the message survives a redirected stdout.
    let msg = if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        err.format_colored(verbose)
    } else {
        err.format_plain(verbose)
    };
    eprint!("{msg}");

    ExitCode::from(err.exit_code())
}

// ── tests ─────────────────────────────────────────────────────────────────────
