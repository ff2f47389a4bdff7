//! Flags accepted before or after any subcommand, including the bare
//! `new-go-server` generation run.

use std::path::PathBuf;

use clap::{ArgAction, Args, builder::FalseyValueParser};

#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Show what the generator is doing on stderr. Repeat for more detail.
    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        global = true,
        long_help = "Show what the generator is doing on stderr. Repeat for more detail:
  -v    stage changes (collecting, validating, materializing, bootstrapping)
  -vv   staging directory, template overrides, bootstrap child process
  -vvv  every file written
RUST_LOG, when set, takes precedence."
    )]
    pub verbose: u8,

    /// Print only errors and machine-readable listings.
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Plain output without colours. Also set by a non-empty `NO_COLOR`.
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        action = ArgAction::SetTrue,
        value_parser = FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// TOML file with generator defaults, instead of the per-user config.
    #[arg(short = 'c', long = "config", global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}
