// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (carried inside generation failures)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Parameter Errors
    // ========================================================================
    #[error("invalid parameter '{field}': {reason}")]
    Parameter { field: &'static str, reason: String },

    // ========================================================================
    // Destination Errors
    // ========================================================================
    #[error("invalid project path '{path}': {reason}")]
    Path { path: String, reason: &'static str },

    // ========================================================================
    // Template Errors
    // ========================================================================
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    // ========================================================================
    // Manifest Invariant Violations
    // ========================================================================
    #[error("invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("Duplicate path in manifest: {path}")]
    DuplicatePath { path: String },

    #[error("Path escapes the destination root: {path}")]
    PathTraversal { path: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },
}

/// Failures raised while parsing or executing a template body.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// The placeholder syntax itself is malformed.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The template references a field or helper that does not exist.
    #[error("line {line}: {message}")]
    Execute { line: usize, message: String },
}

/// Reason strings carried by [`DomainError::Path`].
pub mod path_reason {
    pub const PARENT_MISSING: &str = "parent missing";
    pub const UNRESOLVABLE: &str = "unresolvable";
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Parameter { field, .. } => vec![
                format!("Check the value given for --{field}"),
                "Pass the value as a flag or answer the prompt".into(),
            ],
            Self::Path { path, reason } if *reason == path_reason::PARENT_MISSING => vec![
                format!("Create the parent directory of '{path}' first"),
                "Or choose a path whose parent already exists".into(),
            ],
            Self::Path { .. } => vec![
                "Use an absolute path or a path relative to the current directory".into(),
            ],
            Self::Template(_) => vec![
                "A built-in template is malformed".into(),
                "Please report this issue".into(),
            ],
            _ => vec!["The built-in manifest is inconsistent; please report this issue".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Parameter { .. } => ErrorCategory::Validation,
            Self::Path { .. } => ErrorCategory::Destination,
            _ => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Destination,
    Internal,
}
