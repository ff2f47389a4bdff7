//! Infrastructure adapters for new-go-server.
//!
//! This crate implements the driven ports defined in
//! `ngs_core::application::ports`: the local (and in-memory) filesystem,
//! the embedded template payload, and the child-process bootstrap runner.

pub mod filesystem;
pub mod process;
pub mod templates;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use process::ProcessRunner;
pub use templates::{EmbeddedTemplates, InMemoryTemplates, TEMPLATES_DIR_ENV};
