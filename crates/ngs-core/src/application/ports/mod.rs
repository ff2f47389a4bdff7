//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `ngs-adapters` and the CLI
//! implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: file and directory operations
//!   - `TemplateSource`: raw template bodies by source id
//!   - `CommandRunner`: the external bootstrap command
//!   - `Prompter`: interactive answers for missing parameters

pub mod output;

pub use output::{
    BootstrapCommand, CancelToken, CommandOutput, CommandRunner, CommandStatus, Filesystem,
    Prompter, TemplateSource,
};
