//! new-go-server core - hexagonal architecture implementation
//!
//! This crate provides the domain and application layers for the
//! `new-go-server` project generator, following hexagonal (ports and
//! adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          ngs-cli (new-go-server)        │
//! │   flags, prompts, config, next steps    │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ GenerationService, Materializer,        │
//! │ Bootstrapper, ParameterCollector        │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ Filesystem, TemplateSource,             │
//! │ CommandRunner, Prompter                 │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     ngs-adapters (Infrastructure)       │
//! │ LocalFilesystem, EmbeddedTemplates,     │
//! │ ProcessRunner                           │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │ ParameterSet, Manifest, PathResolver,   │
//! │ Template                                │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ngs_core::prelude::*;
//!
//! let service = GenerationService::new(
//!     Manifest::builtin()?,
//!     templates,  // impl TemplateSource
//!     filesystem, // impl Filesystem
//!     runner,     // impl CommandRunner
//!     GenerationOptions::default(),
//! );
//! let result = service.run(flags, Some(&prompter))?;
//! println!("created {}", result.display_path);
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ApplicationError, BootstrapCommand, CancelToken, CommandOutput, CommandRunner,
        CommandStatus, Filesystem, GenerationFailure, GenerationOptions, GenerationResult,
        GenerationService, GenerationState, ParameterFlags, Prompter, TemplateSource,
        WriteStrategy,
    };
    pub use crate::domain::{
        DomainError, Manifest, ManifestEntry, ParameterSet, RawParameters, RelativePath,
        TemplateError,
    };
    pub use crate::error::{ErrorCategory, NgsError, NgsResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
