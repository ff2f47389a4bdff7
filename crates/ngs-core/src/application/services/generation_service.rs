//! Generation Service - main application orchestrator.
//!
//! This service drives a single generation run through its states:
//!
//! ```text
//! CollectingParams -> ValidatingPath -> Materializing -> Bootstrapping -> Done
//!        \                  \                 \                \
//!         +------------------+-----------------+----------------+--> Failed
//! ```
//!
//! Every transition is logged with a `state` field.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{BootstrapCommand, CommandRunner, Filesystem, Prompter, TemplateSource},
        services::{
            bootstrapper::Bootstrapper,
            materializer::Materializer,
            parameter_collector::{ParameterCollector, ParameterFlags},
        },
    },
    domain::{
        DomainValidator, Manifest, ParameterSet, PathResolver, RelativePath, ValidatedPath,
        render,
    },
    error::{NgsError, NgsResult},
};

/// How files reach the destination directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteStrategy {
    /// Write into a sibling staging directory, then move into place.
    /// A failed run leaves the destination untouched.
    #[default]
    Staged,
    /// Write straight into the destination. A failed run leaves the files
    /// written before the failing entry on disk.
    Direct,
}

/// Knobs for a [`GenerationService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    pub strategy: WriteStrategy,
    /// `None` skips the bootstrap step.
    pub bootstrap: Option<BootstrapCommand>,
    /// Base directory for projects generated without an explicit path.
    pub base_dir: Option<PathBuf>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            strategy: WriteStrategy::default(),
            bootstrap: Some(BootstrapCommand::default()),
            base_dir: None,
        }
    }
}

/// States of a generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    CollectingParams,
    ValidatingPath,
    Materializing,
    Bootstrapping,
    Done,
    Failed,
}

impl fmt::Display for GenerationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CollectingParams => "collecting parameters",
            Self::ValidatingPath => "validating path",
            Self::Materializing => "materializing",
            Self::Bootstrapping => "bootstrapping",
            Self::Done => "done",
            Self::Failed => "failed",
        })
    }
}

/// A successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub params: ParameterSet,
    /// Absolute project directory.
    pub root: PathBuf,
    /// The destination as the user requested it.
    pub display_path: String,
    /// Manifest targets, in manifest order.
    pub written_files: Vec<RelativePath>,
    /// Combined output of the bootstrap command, if it ran.
    pub bootstrap_output: Option<String>,
}

/// A failed run: the stage it failed in, the cause, and what is on disk.
#[derive(Debug, Error)]
#[error("{stage} failed: {error}")]
pub struct GenerationFailure {
    pub stage: GenerationState,
    #[source]
    pub error: NgsError,
    /// Project directory, once it was known.
    pub root: Option<PathBuf>,
    /// Files left in the destination.
    pub written_files: Vec<RelativePath>,
}

/// Main generation service.
///
/// Owns its collaborators; a service can run any number of generations
/// one after another.
pub struct GenerationService {
    manifest: Manifest,
    templates: Box<dyn TemplateSource>,
    filesystem: Box<dyn Filesystem>,
    runner: Box<dyn CommandRunner>,
    options: GenerationOptions,
}

impl GenerationService {
    pub fn new(
        manifest: Manifest,
        templates: Box<dyn TemplateSource>,
        filesystem: Box<dyn Filesystem>,
        runner: Box<dyn CommandRunner>,
        options: GenerationOptions,
    ) -> Self {
        Self {
            manifest,
            templates,
            filesystem,
            runner,
            options,
        }
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Collect parameters (prompting through `prompter` when given), then
    /// generate.
    #[instrument(skip_all)]
    pub fn run(
        &self,
        flags: ParameterFlags,
        prompter: Option<&dyn Prompter>,
    ) -> Result<GenerationResult, GenerationFailure> {
        enter(GenerationState::CollectingParams);
        let params = ParameterCollector::new(prompter, self.options.base_dir.clone())
            .collect(flags)
            .map_err(|error| fail(GenerationState::CollectingParams, error, None, Vec::new()))?;
        self.generate(params)
    }

    /// Generate a project from an already resolved parameter set.
    #[instrument(skip_all, fields(project = %params.name(), module = %params.module()))]
    pub fn generate(&self, params: ParameterSet) -> Result<GenerationResult, GenerationFailure> {
        enter(GenerationState::ValidatingPath);
        let destination = self
            .validate_destination(&params)
            .map_err(|error| fail(GenerationState::ValidatingPath, error, None, Vec::new()))?;
        let root = destination.root().to_path_buf();

        enter(GenerationState::Materializing);
        let mut written = Vec::new();
        if let Err(error) = self.materialize_all(&params, &root, &mut written) {
            return Err(fail(
                GenerationState::Materializing,
                error,
                Some(root),
                written,
            ));
        }
        info!(files = written.len(), root = %root.display(), "project materialized");

        let bootstrap_output = match &self.options.bootstrap {
            Some(command) => {
                enter(GenerationState::Bootstrapping);
                let bootstrapper = Bootstrapper::new(
                    self.filesystem.as_ref(),
                    self.runner.as_ref(),
                    command,
                    self.manifest.descriptor(),
                );
                match bootstrapper.bootstrap(&root) {
                    Ok(output) => Some(output),
                    Err(error) => {
                        return Err(fail(
                            GenerationState::Bootstrapping,
                            error,
                            Some(root),
                            written,
                        ));
                    }
                }
            }
            None => {
                info!("bootstrap skipped");
                None
            }
        };

        enter(GenerationState::Done);
        Ok(GenerationResult {
            params,
            root,
            display_path: destination.display().to_string(),
            written_files: written,
            bootstrap_output,
        })
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn validate_destination(&self, params: &ParameterSet) -> NgsResult<ValidatedPath> {
        let destination = PathResolver::resolve(params.destination_path(), params.name())?;
        DomainValidator::validate_containment(&self.manifest, destination.root())?;
        Ok(destination)
    }

    fn materialize_all(
        &self,
        params: &ParameterSet,
        root: &Path,
        written: &mut Vec<RelativePath>,
    ) -> NgsResult<()> {
        match self.options.strategy {
            WriteStrategy::Direct => self.write_entries(params, root, written),
            WriteStrategy::Staged => self.write_staged(params, root, written),
        }
    }

    /// Render and write every manifest entry under `root`, in order,
    /// stopping at the first failure.
    fn write_entries(
        &self,
        params: &ParameterSet,
        root: &Path,
        written: &mut Vec<RelativePath>,
    ) -> NgsResult<()> {
        let materializer = Materializer::new(self.filesystem.as_ref());
        for entry in self.manifest.iter() {
            let body = self.templates.read(entry.source_id())?;
            let rendered = render(&body, params).inspect_err(|e| {
                warn!(source_id = entry.source_id(), error = %e, "template failed to render");
            })?;
            materializer.materialize(entry, &rendered, root)?;
            written.push(entry.target().clone());
        }
        Ok(())
    }

    fn write_staged(
        &self,
        params: &ParameterSet,
        root: &Path,
        written: &mut Vec<RelativePath>,
    ) -> NgsResult<()> {
        let parent = root
            .parent()
            .ok_or_else(|| ApplicationError::FilesystemError {
                path: root.to_path_buf(),
                reason: "destination has no parent directory".into(),
            })?;
        self.filesystem.create_dir_all(parent)?;
        let staging = self.filesystem.create_staging_dir(parent)?;
        debug!(staging = %staging.display(), "staging directory created");

        let mut staged = Vec::new();
        let result = self
            .write_entries(params, &staging, &mut staged)
            .and_then(|()| self.commit(&staging, root, &staged, written));
        self.discard(&staging);
        result
    }

    /// Move staged files into `root`.
    ///
    /// A missing destination is created with a single rename. An existing
    /// one receives the files one by one; a failure midway leaves the files
    /// moved so far in place.
    fn commit(
        &self,
        staging: &Path,
        root: &Path,
        staged: &[RelativePath],
        written: &mut Vec<RelativePath>,
    ) -> NgsResult<()> {
        if !self.filesystem.exists(root) {
            self.filesystem.rename(staging, root)?;
            written.extend_from_slice(staged);
            debug!("staging directory renamed into place");
            return Ok(());
        }

        for target in staged {
            let to = target.under(root);
            if let Some(parent) = to.parent() {
                self.filesystem.create_dir_all(parent)?;
            }
            self.filesystem.rename(&target.under(staging), &to)?;
            written.push(target.clone());
        }
        debug!(files = staged.len(), "staged files moved into existing destination");
        Ok(())
    }

    /// Best-effort removal of the staging directory.
    fn discard(&self, staging: &Path) {
        if !self.filesystem.exists(staging) {
            return;
        }
        if let Err(e) = self.filesystem.remove_dir_all(staging) {
            warn!(
                error = %e,
                path = %staging.display(),
                "failed to remove staging directory"
            );
        }
    }
}

fn enter(state: GenerationState) {
    info!(state = %state, "state transition");
}

fn fail(
    stage: GenerationState,
    error: NgsError,
    root: Option<PathBuf>,
    written_files: Vec<RelativePath>,
) -> GenerationFailure {
    warn!(
        state = %GenerationState::Failed,
        stage = %stage,
        kind = error.kind(),
        error = %error,
        "state transition"
    );
    GenerationFailure {
        stage,
        error,
        root,
        written_files,
    }
}
