//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `ngs-adapters` crate provides the filesystem, template and process
//! implementations; the CLI provides the terminal prompter.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::error::NgsResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `ngs_adapters::filesystem::LocalFilesystem` (production)
/// - `ngs_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> NgsResult<()>;

    /// Write bytes to a file, replacing any existing content.
    fn write_file(&self, path: &Path, content: &[u8]) -> NgsResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Move a file or directory. The destination's parent must exist.
    fn rename(&self, from: &Path, to: &Path) -> NgsResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> NgsResult<()>;

    /// Create a fresh, uniquely named, empty directory inside `parent`.
    fn create_staging_dir(&self, parent: &Path) -> NgsResult<PathBuf>;
}

/// Port for the template payload.
///
/// Implemented by:
/// - `ngs_adapters::templates::EmbeddedTemplates` (bundled into the binary)
/// - `ngs_adapters::templates::InMemoryTemplates` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait TemplateSource: Send + Sync {
    /// Raw template bytes for a manifest source id.
    fn read(&self, source_id: &str) -> NgsResult<Vec<u8>>;
}

/// Port for running the bootstrap command inside the generated project.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner: Send + Sync {
    /// Run `command` with `cwd` as the child's working directory.
    ///
    /// A command that starts and exits (successfully or not), times out, or
    /// is cancelled yields `Ok`. Only a failure to start yields `Err`.
    fn run(&self, command: &BootstrapCommand, cwd: &Path) -> NgsResult<CommandOutput>;
}

/// Port for asking the user a question.
#[cfg_attr(test, mockall::automock)]
pub trait Prompter {
    /// Show `question` and return the raw answer line.
    fn ask(&self, question: &str) -> std::io::Result<String>;
}

/// The external command run after materialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapCommand {
    pub program: String,
    pub args: Vec<String>,
    /// `None` waits forever.
    pub timeout: Option<Duration>,
}

impl BootstrapCommand {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            timeout: Some(Self::DEFAULT_TIMEOUT),
        }
    }

    /// `0` disables the timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        self
    }
}

impl Default for BootstrapCommand {
    /// `go mod tidy`
    fn default() -> Self {
        Self::new("go", ["mod", "tidy"])
    }
}

impl fmt::Display for BootstrapCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// How the bootstrap command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    /// The process exited. `None` means it was terminated by a signal.
    Exited(Option<i32>),
    TimedOut(Duration),
    Cancelled,
}

impl CommandStatus {
    pub fn success(&self) -> bool {
        matches!(self, Self::Exited(Some(0)))
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exited(Some(code)) => write!(f, "exit status: {code}"),
            Self::Exited(None) => f.write_str("terminated by signal"),
            Self::TimedOut(after) => write!(f, "timed out after {}s", after.as_secs()),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Result of running the bootstrap command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub status: CommandStatus,
    /// Standard output followed by standard error.
    pub output: String,
}

/// Shared flag used to stop a running bootstrap command from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_command_is_go_mod_tidy() {
        let cmd = BootstrapCommand::default();
        assert_eq!(cmd.to_string(), "go mod tidy");
        assert_eq!(cmd.timeout, Some(Duration::from_secs(300)));
        assert_eq!(cmd.with_timeout_secs(0).timeout, None);
    }

    #[test]
    fn only_zero_exit_is_success() {
        assert!(CommandStatus::Exited(Some(0)).success());
        assert!(!CommandStatus::Exited(Some(1)).success());
        assert!(!CommandStatus::Exited(None).success());
        assert!(!CommandStatus::TimedOut(Duration::from_secs(1)).success());
        assert!(!CommandStatus::Cancelled.success());
    }

    #[test]
    fn cancel_token_is_shared_between_clones() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());
        token.cancel();
        assert!(other.is_cancelled());
    }
}
