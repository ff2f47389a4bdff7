//! `new-go-server config`: inspect or create the configuration file.

use std::path::PathBuf;

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let path = active_path(&global);

    match cmd {
        ConfigCommands::Path => {
            output.data(&path.display().to_string())?;
        }

        ConfigCommands::Show => {
            output.data(&to_toml(&config)?)?;
        }

        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                output.warning(&format!(
                    "Config already exists at {}  (use --force to overwrite)",
                    path.display(),
                ))?;
                return Ok(());
            }

            let toml = to_toml(&AppConfig::default())?;
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_cli_context(|| {
                    format!("Failed to create config directory '{}'", parent.display())
                })?;
            }
            std::fs::write(&path, toml).with_cli_context(|| {
                format!("Failed to write config to '{}'", path.display())
            })?;

            output.success(&format!("Configuration created at {}", path.display()))?;
        }
    }

    Ok(())
}

/// `--config` when given, otherwise the platform default.
fn active_path(global: &GlobalArgs) -> PathBuf {
    global.config.clone().unwrap_or_else(AppConfig::config_path)
}

fn to_toml(config: &AppConfig) -> CliResult<String> {
    toml::to_string_pretty(config).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_serialise_with_every_section() {
        let toml = to_toml(&AppConfig::default()).unwrap();
        for section in ["[defaults]", "[bootstrap]", "[generation]", "[output]"] {
            assert!(toml.contains(section), "missing {section} in:\n{toml}");
        }
        assert!(toml.contains("port = \"8080\""));
    }

    #[test]
    fn serialised_defaults_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, to_toml(&AppConfig::default()).unwrap()).unwrap();

        assert_eq!(AppConfig::load(Some(&path)).unwrap(), AppConfig::default());
    }

    #[test]
    fn explicit_config_flag_wins() {
        let global = GlobalArgs {
            config: Some(PathBuf::from("/etc/ngs.toml")),
            ..GlobalArgs::default()
        };
        assert_eq!(active_path(&global), PathBuf::from("/etc/ngs.toml"));
    }
}
