//! Error handling for the new-go-server CLI.
//!
//! Provides structured errors with:
//! - User-friendly messages
//! - Actionable suggestions
//! - Proper error chaining
//!
//! Every failure exits with status 1; argument errors are reported by clap
//! with status 2 before any of this runs.

use std::error::Error;

use owo_colors::OwoColorize;
use thiserror::Error;

use ngs_core::{
    application::{GenerationFailure, GenerationState},
    error::{ErrorCategory as CoreCategory, NgsError},
};

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types.
#[derive(Debug, Error)]
pub enum CliError {
    /// A generation run failed in one of its stages.
    #[error(transparent)]
    Generation(#[from] GenerationFailure),

    /// An error from `ngs-core` outside a generation run.
    #[error(transparent)]
    Core(#[from] NgsError),

    /// A configuration file could not be read, parsed, or written.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An I/O operation failed.
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Generation(failure) => {
                let mut suggestions = failure.error.suggestions();
                if let Some(root) = &failure.root
                    && !failure.written_files.is_empty()
                    && failure.stage != GenerationState::Bootstrapping
                {
                    suggestions.push(format!(
                        "{} file(s) were left in {}; remove them before retrying",
                        failure.written_files.len(),
                        root.display()
                    ));
                }
                suggestions
            }

            Self::Core(core_err) => core_err.suggestions(),

            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {message}"),
                "Run 'new-go-server config path' to see which file is read".into(),
                "Run 'new-go-server config init --force' to restore the defaults".into(),
            ],

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {message}"),
                "Check file permissions".into(),
            ],
        }
    }

    /// Get the error category for styling and log severity.
    pub fn category(&self) -> ErrorCategory {
        let core = match self {
            Self::Generation(failure) => failure.error.category(),
            Self::Core(core) => core.category(),
            Self::ConfigError { .. } => return ErrorCategory::Configuration,
            Self::IoError { .. } => return ErrorCategory::Internal,
        };
        match core {
            CoreCategory::Validation | CoreCategory::Destination => ErrorCategory::UserError,
            CoreCategory::External => ErrorCategory::External,
            CoreCategory::Internal => ErrorCategory::Internal,
        }
    }

    /// Exit code to pass to the OS.
    pub fn exit_code(&self) -> u8 {
        1
    }

    /// Format the error for display with colors and suggestions.
    pub fn format_colored(&self, verbose: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{} {}\n\n",
            "✗".red().bold(),
            "Error:".red().bold()
        ));

        output.push_str(&format!("  {}\n", self.to_string().red()));

        if verbose {
            for cause in self.causes() {
                output.push_str(&format!("\n  {} {}\n", "→".dimmed(), cause.dimmed()));
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                output.push_str(&format!("  {suggestion}\n"));
            }
        }

        if !verbose {
            output.push('\n');
            output.push_str(&format!(
                "{} {}\n",
                "\u{2139}".blue(),
                "Use -v / --verbose for more details.".dimmed(),
            ));
        }

        output
    }

    /// Plain-text version of [`Self::format_colored`], without ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = String::new();
        out.push_str(&format!("\nError: {self}\n"));

        if verbose {
            for cause in self.causes() {
                out.push_str(&format!("  Caused by: {cause}\n"));
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                out.push_str(&format!("  {s}\n"));
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }

        out
    }

    /// Log the error using tracing.
    pub fn log(&self) {
        let kind = self.kind();
        match self.category() {
            ErrorCategory::UserError => tracing::warn!(kind, "User error: {}", self),
            ErrorCategory::Configuration => tracing::error!(kind, "Configuration error: {}", self),
            ErrorCategory::External => tracing::error!(kind, "External command error: {}", self),
            ErrorCategory::Internal => tracing::error!(kind, "Internal error: {}", self),
        }

        if let Self::Generation(failure) = self {
            tracing::debug!(
                stage = %failure.stage,
                files = failure.written_files.len(),
                "Generation aborted"
            );
        }
        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Generation(failure) => failure.error.kind(),
            Self::Core(core) => core.kind(),
            Self::ConfigError { .. } => "ConfigError",
            Self::IoError { .. } => "IOError",
        }
    }

    /// Messages of the source chain, skipping causes whose text is already
    /// part of the headline.
    fn causes(&self) -> Vec<String> {
        let headline = self.to_string();
        let mut causes = Vec::new();
        let mut source = self.source();
        while let Some(err) = source {
            let message = err.to_string();
            if !headline.contains(&message) {
                causes.push(message);
            }
            source = err.source();
        }
        causes
    }
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad parameters or an unusable destination.
    UserError,
    /// Configuration error.
    Configuration,
    /// The bootstrap command failed.
    External,
    /// Internal/system error.
    Internal,
}

// ── IntoCli trait ─────────────────────────────────────────────────────────────

/// Extension trait to convert foreign error types into [`CliError`] at
/// call-sites with a descriptive context message.
pub trait IntoCli<T> {
    /// Convert to `CliResult` attaching a human-readable context message.
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}

impl<T> IntoCli<T> for Result<T, NgsError> {
    /// Core errors already carry their own context.
    fn with_cli_context<F, S>(self, _f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(CliError::Core)
    }
}
