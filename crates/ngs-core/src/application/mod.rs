//! Application layer for new-go-server.
//!
//! This layer contains:
//! - **Services**: use case orchestration (`GenerationService` and its steps)
//! - **Ports**: interface definitions (traits) for external dependencies
//! - **Errors**: application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business rules itself. Those live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    Bootstrapper, GenerationFailure, GenerationOptions, GenerationResult, GenerationService,
    GenerationState, Materializer, ParameterCollector, ParameterFlags, WriteStrategy,
    resolve_field,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    BootstrapCommand, CancelToken, CommandOutput, CommandRunner, CommandStatus, Filesystem,
    Prompter, TemplateSource,
};

pub use error::ApplicationError;
