//! Project generation: the default action when no subcommand is given.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use ngs_adapters::{EmbeddedTemplates, LocalFilesystem, ProcessRunner};
use ngs_core::{
    application::{GenerationResult, GenerationService, ParameterFlags},
    domain::Manifest,
    error::NgsError,
};

use crate::{
    cli::{GenerateArgs, GlobalArgs},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
    prompt::LinePrompter,
};

/// Execute a generation run.
///
/// 1. Build engine options from config and flags
/// 2. Wire the local adapters into a [`GenerationService`]
/// 3. Collect parameters (prompting unless `--no-input`) and generate
/// 4. Print next-steps guidance
#[instrument(skip_all)]
pub fn execute(
    args: GenerateArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let options = config.generation_options(&args);
    debug!(?options, "generation options resolved");

    let mut templates = EmbeddedTemplates::new();
    if let Some(dir) = &config.templates.dir {
        templates = templates.with_override_dir(dir);
    }

    let manifest = Manifest::builtin().map_err(NgsError::from)?;
    let service = GenerationService::new(
        manifest,
        Box::new(templates),
        Box::new(LocalFilesystem::new()),
        Box::new(ProcessRunner::default()),
        options,
    );

    let flags = flags_from(&args, &config);
    let result = if args.no_input {
        service.run(flags, None)?
    } else {
        let prompter = LinePrompter::stdio();
        service.run(flags, Some(&prompter))?
    };

    report(&result, &output)
}

/// Generation flags as the engine sees them. An omitted `--port` takes the
/// configured default and is never prompted for.
fn flags_from(args: &GenerateArgs, config: &AppConfig) -> ParameterFlags {
    ParameterFlags {
        name: args.name.clone(),
        module: args.module.clone(),
        description: args.description.clone(),
        port: Some(
            args.port
                .clone()
                .unwrap_or_else(|| config.defaults.port.clone()),
        ),
        path: args.path.clone(),
    }
}

fn report(result: &GenerationResult, output: &OutputManager) -> CliResult<()> {
    output.success(&format!(
        "Project '{}' created at {}",
        result.params.name(),
        result.root.display()
    ))?;
    output.info(&format!("Module: {}", result.params.module()))?;

    if output.is_quiet() {
        return Ok(());
    }

    let home = directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf());
    let shown = abbreviate_home(Path::new(&result.display_path), home.as_deref());

    output.print("")?;
    output.header("Next steps:")?;
    output.print(&format!("  cd {shown}"))?;
    output.print("  review the database and Clerk settings in .env.local")?;
    if result.bootstrap_output.is_none() {
        output.print("  go mod tidy")?;
    }
    output.print("  go run main.go")?;

    Ok(())
}

/// Replace a leading `home` with `~`.
fn abbreviate_home(path: &Path, home: Option<&Path>) -> String {
    match home.and_then(|h| path.strip_prefix(h).ok()) {
        Some(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Some(rest) => PathBuf::from("~").join(rest).display().to_string(),
        None => path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_prefix_is_abbreviated() {
        let home = Path::new("/home/dev");
        assert_eq!(
            abbreviate_home(Path::new("/home/dev/projects/acme"), Some(home)),
            "~/projects/acme"
        );
        assert_eq!(abbreviate_home(home, Some(home)), "~");
    }

    #[test]
    fn other_paths_are_unchanged() {
        let home = Path::new("/home/dev");
        assert_eq!(abbreviate_home(Path::new("acme"), Some(home)), "acme");
        assert_eq!(
            abbreviate_home(Path::new("/home/developer/acme"), Some(home)),
            "/home/developer/acme"
        );
        assert_eq!(abbreviate_home(Path::new("/srv/acme"), None), "/srv/acme");
    }

    #[test]
    fn omitted_port_takes_the_configured_default() {
        let mut config = AppConfig::default();
        config.defaults.port = "9090".into();

        let flags = flags_from(&GenerateArgs::default(), &config);
        assert_eq!(flags.port.as_deref(), Some("9090"));
    }

    #[test]
    fn explicit_empty_port_is_passed_through() {
        let args = GenerateArgs {
            port: Some(String::new()),
            name: Some("acme".into()),
            ..GenerateArgs::default()
        };
        let flags = flags_from(&args, &AppConfig::default());
        assert_eq!(flags.port.as_deref(), Some(""));
        assert_eq!(flags.name.as_deref(), Some("acme"));
        assert!(flags.path.is_none());
    }
}
