//! Application layer errors.
//!
//! These errors represent failures while talking to the outside world
//! (template payload, filesystem, external process), not rule violations.
//! Rule violations are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// A parameter could not be read from the interactive source.
    #[error("failed to read {field}: {reason}")]
    Input { field: &'static str, reason: String },

    /// The template payload for a manifest entry is missing or unreadable.
    #[error("failed to read template '{source_id}': {reason}")]
    SourceRead { source_id: String, reason: String },

    /// Filesystem operation failed.
    #[error("filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// A file the bootstrap step depends on was not generated.
    #[error("{} not found after template creation", path.display())]
    Precondition { path: PathBuf },

    /// The external bootstrap command did not succeed.
    #[error("`{command}` failed ({status})\nOutput: {output}")]
    Bootstrap {
        command: String,
        status: String,
        output: String,
    },

    /// Shared state lock was poisoned.
    #[error("internal state lock poisoned")]
    LockPoisoned,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Input { field, .. } => vec![
                format!("Pass --{field} on the command line instead of answering the prompt"),
            ],
            Self::SourceRead { source_id, .. } => vec![
                format!("The built-in template '{source_id}' is missing from this build"),
                "Reinstall new-go-server or report this issue".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Check available disk space".into(),
            ],
            Self::Precondition { .. } => vec![
                "The module descriptor was not generated; the project tree is incomplete".into(),
            ],
            Self::Bootstrap { command, .. } => vec![
                format!("Ensure the command `{command}` is installed and in your PATH"),
                "The generated files were kept; fix the problem and re-run the command by hand"
                    .into(),
                "Or pass --skip-bootstrap to generate without it".into(),
            ],
            Self::LockPoisoned => vec!["This is a bug, please report it".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Input { .. } => ErrorCategory::Validation,
            Self::FilesystemError { .. } => ErrorCategory::Destination,
            Self::Bootstrap { .. } => ErrorCategory::External,
            Self::SourceRead { .. } | Self::Precondition { .. } | Self::LockPoisoned => {
                ErrorCategory::Internal
            }
        }
    }
}
