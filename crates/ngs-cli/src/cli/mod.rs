//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
///
/// Without a subcommand the tool generates a project; any generation flag
/// that is left out is asked for on stdin.
#[derive(Debug, Parser)]
#[command(
    name     = "new-go-server",
    bin_name = "new-go-server",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Generate a ready-to-run Go backend server project",
    long_about = "new-go-server renders a Go HTTP server skeleton (gorilla/mux router, \
                  gorm on PostgreSQL, CSRF and Clerk middleware, health, users and \
                  organizations modules, CI workflow) into a directory and resolves \
                  its module dependencies.",
    after_help = "EXAMPLES:\n\
        \x20 new-go-server\n\
        \x20 new-go-server --name acme --module github.com/acme/api --description \"Acme API\"\n\
        \x20 new-go-server --name acme --module api --path /srv/projects/acme --skip-bootstrap\n\
        \x20 new-go-server manifest --format json",
    args_conflicts_with_subcommands = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Generation flags, used when no subcommand is given.
    #[command(flatten)]
    pub generate: GenerateArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the files every generated project contains.
    #[command(
        visible_alias = "ls",
        about = "Show the built-in manifest",
        after_help = "EXAMPLES:\n\
            \x20 new-go-server manifest\n\
            \x20 new-go-server manifest --format json"
    )]
    Manifest(ManifestArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 new-go-server completions bash > ~/.local/share/bash-completion/completions/new-go-server\n\
            \x20 new-go-server completions zsh  > ~/.zfunc/_new-go-server\n\
            \x20 new-go-server completions fish > ~/.config/fish/completions/new-go-server.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect or create the configuration file.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 new-go-server config path\n\
            \x20 new-go-server config show\n\
            \x20 new-go-server config init --force"
    )]
    Config(ConfigCommands),
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for project generation.
#[derive(Debug, Clone, Default, Args)]
pub struct GenerateArgs {
    /// Project name; also the directory name when no path is given.
    #[arg(long, value_name = "NAME", help = "Project name")]
    pub name: Option<String>,

    /// Go module path. A bare word like `api` becomes `<name>/api`.
    #[arg(
        long,
        value_name = "MODULE",
        help = "Go module name (e.g., github.com/username/project)"
    )]
    pub module: Option<String>,

    #[arg(long, value_name = "TEXT", help = "Project description")]
    pub description: Option<String>,

    /// Omitted: the configured default (8080). Passed empty: prompted for.
    #[arg(
        long,
        value_name = "PORT",
        help = "Server port [default: 8080]"
    )]
    pub port: Option<String>,

    /// `.` generates into `./<name>`.
    #[arg(
        long,
        value_name = "PATH",
        help = "Project path (absolute or relative; default: <name>)"
    )]
    pub path: Option<String>,

    /// Write files straight into the destination instead of staging them.
    #[arg(long = "no-staging", help = "Write directly into the destination")]
    pub no_staging: bool,

    /// Do not run `go mod tidy` after generating.
    #[arg(long = "skip-bootstrap", help = "Skip the go mod tidy step")]
    pub skip_bootstrap: bool,

    /// Kill the bootstrap command after this many seconds (0 = never).
    #[arg(
        long = "bootstrap-timeout",
        value_name = "SECS",
        help = "Bootstrap timeout in seconds (0 disables)"
    )]
    pub bootstrap_timeout: Option<u64>,

    /// Never prompt; missing values fall back to their defaults.
    #[arg(long = "no-input", help = "Do not prompt for missing values")]
    pub no_input: bool,
}

// ── manifest ──────────────────────────────────────────────────────────────────

/// Arguments for `new-go-server manifest`.
#[derive(Debug, Args)]
pub struct ManifestArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ManifestFormat,
}

/// Output format for the `manifest` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ManifestFormat {
    /// Human-readable table.
    Table,
    /// One target path per line.
    List,
    /// JSON array.
    Json,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `new-go-server completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `new-go-server config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the path to the active configuration file.
    Path,
    /// Print the effective configuration (defaults, file and environment merged).
    Show,
    /// Write a configuration file with the built-in defaults.
    Init {
        /// Overwrite an existing config file.
        #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
        force: bool,
    },
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_generate() {
        let cli = Cli::parse_from([
            "new-go-server",
            "--name",
            "acme",
            "--module",
            "api",
            "--skip-bootstrap",
        ]);
        assert!(cli.command.is_none());
        assert_eq!(cli.generate.name.as_deref(), Some("acme"));
        assert_eq!(cli.generate.module.as_deref(), Some("api"));
        assert!(cli.generate.skip_bootstrap);
        assert!(cli.generate.port.is_none());
    }

    #[test]
    fn explicit_empty_port_is_kept() {
        let cli = Cli::parse_from(["new-go-server", "--port", ""]);
        assert_eq!(cli.generate.port.as_deref(), Some(""));
    }

    #[test]
    fn generation_flags_conflict_with_subcommands() {
        let result = Cli::try_parse_from(["new-go-server", "--name", "acme", "manifest"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::parse_from(["new-go-server", "manifest", "-q", "--format", "list"]);
        assert!(cli.global.quiet);
        match cli.command {
            Some(Commands::Manifest(args)) => assert_eq!(args.format, ManifestFormat::List),
            other => panic!("expected manifest command, got {other:?}"),
        }
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["new-go-server", "--quiet", "--verbose", "manifest"]);
        assert!(result.is_err());
    }

    #[test]
    fn bootstrap_timeout_must_be_a_number() {
        let result = Cli::try_parse_from(["new-go-server", "--bootstrap-timeout", "soon"]);
        assert!(result.is_err());
    }
}
