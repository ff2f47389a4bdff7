//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only sees the
//! [`GenerationOptions`] built from it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `NEW_GO_SERVER_DEFAULT_DIR` and `NEW_GO_SERVER_TEMPLATES_DIR`
//! 3. Environment variables `NEW_GO_SERVER__<SECTION>__<KEY>`
//! 4. Config file (`--config`, or the platform config directory)
//! 5. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use ngs_adapters::TEMPLATES_DIR_ENV;
use ngs_core::{
    application::{BootstrapCommand, GenerationOptions, WriteStrategy},
    domain::{BASE_DIR_ENV, DEFAULT_PORT},
};

use crate::cli::GenerateArgs;

const ENV_PREFIX: &str = "NEW_GO_SERVER";
const ENV_SEPARATOR: &str = "__";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default values for new projects.
    pub defaults: Defaults,
    /// The post-generation `go mod tidy` step.
    pub bootstrap: BootstrapConfig,
    /// How files are written.
    pub generation: GenerationConfig,
    /// Output settings.
    pub output: OutputConfig,
    /// Template payload settings.
    pub templates: TemplateConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub port: String,
    /// Parent directory for projects generated without `--path`.
    pub base_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    pub enabled: bool,
    pub program: String,
    pub args: Vec<String>,
    /// `0` disables the timeout.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub staged: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directory whose files override embedded template bodies.
    pub dir: Option<PathBuf>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.into(),
            base_dir: None,
        }
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        let command = BootstrapCommand::default();
        Self {
            enabled: true,
            program: command.program,
            args: command.args,
            timeout_secs: BootstrapCommand::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self { staged: true }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            defaults: Defaults::default(),
            bootstrap: BootstrapConfig::default(),
            generation: GenerationConfig::default(),
            output: OutputConfig::default(),
            templates: TemplateConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the config file, then the
    /// environment.
    ///
    /// An explicit `config_file` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let defaults =
            Config::try_from(&Self::default()).context("Failed to encode built-in defaults")?;

        let file = match config_file {
            Some(path) => File::from(path).format(FileFormat::Toml).required(true),
            None => File::from(Self::config_path())
                .format(FileFormat::Toml)
                .required(false),
        };

        let mut builder = Config::builder()
            .add_source(defaults)
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true)
                    .list_separator(" ")
                    .with_list_parse_key("bootstrap.args"),
            );

        if let Some(dir) = non_empty_env(BASE_DIR_ENV) {
            builder = builder
                .set_override("defaults.base_dir", dir)
                .context("Failed to apply base directory override")?;
        }
        if let Some(dir) = non_empty_env(TEMPLATES_DIR_ENV) {
            builder = builder
                .set_override("templates.dir", dir)
                .context("Failed to apply templates directory override")?;
        }

        builder
            .build()
            .and_then(Config::try_deserialize)
            .with_context(|| match config_file {
                Some(path) => format!("Failed to load configuration from {}", path.display()),
                None => "Failed to load configuration".to_string(),
            })
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.new-go-server.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "new-go-server", "new-go-server")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".new-go-server.toml"))
    }

    /// Combine config with per-run flags into engine options.
    pub fn generation_options(&self, args: &GenerateArgs) -> GenerationOptions {
        let strategy = if args.no_staging || !self.generation.staged {
            WriteStrategy::Direct
        } else {
            WriteStrategy::Staged
        };

        let bootstrap = (self.bootstrap.enabled && !args.skip_bootstrap).then(|| {
            BootstrapCommand::new(&self.bootstrap.program, &self.bootstrap.args)
                .with_timeout_secs(args.bootstrap_timeout.unwrap_or(self.bootstrap.timeout_secs))
        });

        GenerationOptions {
            strategy,
            bootstrap,
            base_dir: self.defaults.base_dir.clone(),
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn defaults_match_the_engine() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.defaults.port, "8080");
        assert_eq!(cfg.bootstrap.program, "go");
        assert_eq!(cfg.bootstrap.args, ["mod", "tidy"]);
        assert_eq!(cfg.bootstrap.timeout_secs, 300);
        assert!(cfg.generation.staged);
        assert!(!cfg.output.no_color);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[bootstrap]\nprogram = \"true\"\nargs = []\ntimeout_secs = 5\n\n[generation]\nstaged = false\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();

        assert_eq!(cfg.bootstrap.program, "true");
        assert!(cfg.bootstrap.args.is_empty());
        assert_eq!(cfg.bootstrap.timeout_secs, 5);
        assert!(!cfg.generation.staged);
        // Untouched sections keep their defaults.
        assert_eq!(cfg.defaults.port, "8080");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn flags_override_config_in_options() {
        let cfg = AppConfig::default();
        let args = GenerateArgs {
            no_staging: true,
            bootstrap_timeout: Some(0),
            ..GenerateArgs::default()
        };

        let options = cfg.generation_options(&args);

        assert_eq!(options.strategy, WriteStrategy::Direct);
        let command = options.bootstrap.unwrap();
        assert_eq!(command.to_string(), "go mod tidy");
        assert_eq!(command.timeout, None);
    }

    #[test]
    fn skip_bootstrap_disables_the_command() {
        let cfg = AppConfig::default();
        let args = GenerateArgs {
            skip_bootstrap: true,
            ..GenerateArgs::default()
        };
        let options = cfg.generation_options(&args);
        assert!(options.bootstrap.is_none());
        assert_eq!(options.strategy, WriteStrategy::Staged);
    }

    #[test]
    fn configured_timeout_is_used_without_flag() {
        let mut cfg = AppConfig::default();
        cfg.bootstrap.timeout_secs = 42;
        let options = cfg.generation_options(&GenerateArgs::default());
        assert_eq!(
            options.bootstrap.unwrap().timeout,
            Some(Duration::from_secs(42))
        );
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
