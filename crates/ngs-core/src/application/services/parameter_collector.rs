//! Parameter collection: flags first, prompts for the rest.

use std::path::PathBuf;

use tracing::debug;

use crate::{
    application::{ApplicationError, ports::Prompter},
    domain::{ParameterSet, RawParameters, generate_csrf_key},
    error::NgsResult,
};

const NAME_QUESTION: &str = "Project name: ";
const MODULE_QUESTION: &str = "Go module name (e.g., github.com/username/project): ";
const DESCRIPTION_QUESTION: &str = "Project description: ";
const PORT_QUESTION: &str = "Server port [8080]: ";
const PATH_QUESTION: &str = "Project path (leave empty to create in current directory, or specify absolute/relative path): ";

/// Generation parameters as declared on the command line. `None` = absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterFlags {
    pub name: Option<String>,
    pub module: Option<String>,
    pub description: Option<String>,
    pub port: Option<String>,
    pub path: Option<String>,
}

/// Precedence for a single field: a present, non-empty flag wins, otherwise
/// the prompter is asked and its answer trimmed.
pub fn resolve_field(
    field: &'static str,
    flag: Option<String>,
    question: &str,
    prompter: Option<&dyn Prompter>,
) -> NgsResult<String> {
    if let Some(value) = flag.filter(|v| !v.is_empty()) {
        return Ok(value);
    }
    let Some(prompter) = prompter else {
        debug!(field, "no value and prompting disabled");
        return Ok(String::new());
    };
    let answer = prompter
        .ask(question)
        .map_err(|e| ApplicationError::Input {
            field,
            reason: e.to_string(),
        })?;
    Ok(answer.trim().to_string())
}

/// Builds a [`ParameterSet`] from flags and, when interactive, prompts.
pub struct ParameterCollector<'a> {
    prompter: Option<&'a dyn Prompter>,
    base_dir: Option<PathBuf>,
}

impl<'a> ParameterCollector<'a> {
    /// `prompter = None` means non-interactive: absent values take defaults.
    pub fn new(prompter: Option<&'a dyn Prompter>, base_dir: Option<PathBuf>) -> Self {
        Self { prompter, base_dir }
    }

    /// Questions are asked in a fixed order: name, module, description,
    /// port, path.
    pub fn collect(&self, flags: ParameterFlags) -> NgsResult<ParameterSet> {
        let raw = RawParameters {
            name: resolve_field("name", flags.name, NAME_QUESTION, self.prompter)?,
            module: resolve_field("module", flags.module, MODULE_QUESTION, self.prompter)?,
            description: resolve_field(
                "description",
                flags.description,
                DESCRIPTION_QUESTION,
                self.prompter,
            )?,
            port: resolve_field("port", flags.port, PORT_QUESTION, self.prompter)?,
            destination_path: resolve_field("path", flags.path, PATH_QUESTION, self.prompter)?,
        };

        let key = generate_csrf_key()?;
        Ok(ParameterSet::from_raw(raw, self.base_dir.as_deref(), key)?)
    }
}
