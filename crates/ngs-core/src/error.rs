//! Unified error handling for the generation engine.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for engine operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NgsError {
    /// Errors from the domain layer (invalid parameters, paths, templates).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Errors from the application layer (I/O and external process failures).
    #[error(transparent)]
    Application(#[from] ApplicationError),
}

impl NgsError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Destination => ErrorCategory::Destination,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
        }
    }

    /// Short taxonomy name, used in log fields and messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Domain(DomainError::Parameter { .. }) => "ParameterError",
            Self::Domain(DomainError::Path { .. }) => "PathError",
            Self::Domain(DomainError::Template(_)) => "TemplateError",
            Self::Domain(_) => "ManifestError",
            Self::Application(ApplicationError::Input { .. }) => "ParameterError",
            Self::Application(ApplicationError::SourceRead { .. }) => "SourceReadError",
            Self::Application(ApplicationError::FilesystemError { .. }) => "IOError",
            Self::Application(ApplicationError::Precondition { .. }) => "PreconditionError",
            Self::Application(ApplicationError::Bootstrap { .. }) => "BootstrapError",
            Self::Application(ApplicationError::LockPoisoned) => "InternalError",
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Destination,
    External,
    Internal,
}

/// Convenient result type alias.
pub type NgsResult<T> = Result<T, NgsError>;

impl From<crate::domain::TemplateError> for NgsError {
    fn from(err: crate::domain::TemplateError) -> Self {
        Self::Domain(err.into())
    }
}
