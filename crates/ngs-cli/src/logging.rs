//! Diagnostics go to stderr through `tracing`; stdout is kept for the
//! generation report and for `manifest`/`config` output that may be piped.
//!
//! `-v` shows the state machine moving between stages, `-vv` adds every
//! template read and directory created, `-vvv` every write. `RUST_LOG`, when
//! set, replaces the computed filter entirely.

use std::io::IsTerminal as _;

use tracing_subscriber::{
    EnvFilter, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::cli::GlobalArgs;

/// Crates whose events reach the terminal. Dependencies stay silent unless
/// `RUST_LOG` asks for them.
const OWN_CRATES: [&str; 3] = ["new_go_server", "ngs_core", "ngs_adapters"];

pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(from_env) => from_env,
        Err(_) => own_crates_at(level_for(args)),
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(!args.no_color && std::io::stderr().is_terminal())
        .with_target(false)
        .without_time();

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing subscriber already set: {e}"))
}

/// `--quiet` wins over any number of `-v`.
fn level_for(args: &GlobalArgs) -> LevelFilter {
    match (args.quiet, args.verbose) {
        (true, _) => LevelFilter::ERROR,
        (false, 0) => LevelFilter::WARN,
        (false, 1) => LevelFilter::INFO,
        (false, 2) => LevelFilter::DEBUG,
        (false, _) => LevelFilter::TRACE,
    }
}

fn own_crates_at(level: LevelFilter) -> EnvFilter {
    let directives = OWN_CRATES
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .collect::<Vec<_>>()
        .join(",");
    EnvFilter::new(directives)
}
