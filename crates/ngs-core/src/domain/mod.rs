// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for new-go-server.
//!
//! Pure logic: the parameter model, the manifest, destination validation and
//! template rendering. Filesystem writes and process execution are handled
//! via ports (traits) defined in the application layer.
//!
//! The one exception is [`PathResolver`], which *reads* the filesystem to
//! check that a parent directory exists. It never writes.
pub mod entities;
pub mod error;
pub mod path;
pub mod render;

mod validation;

// Re-exports for convenience
pub use entities::{
    common::{RelativePath, is_descendant},
    manifest::{MODULE_DESCRIPTOR, Manifest, ManifestEntry},
    parameters::{
        BASE_DIR_ENV, DEFAULT_PORT, ParameterSet, RawParameters, default_destination,
        generate_csrf_key, normalize_module,
    },
};

pub use error::{DomainError, ErrorCategory, TemplateError, path_reason};
pub use path::{PathResolver, ValidatedPath};
pub use render::{Template, render};
pub use validation::DomainValidator;
