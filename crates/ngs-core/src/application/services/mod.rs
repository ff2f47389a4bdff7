//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! the "generate a project" use case and its individual steps.

pub mod bootstrapper;
pub mod generation_service;
pub mod materializer;
pub mod parameter_collector;

pub use bootstrapper::Bootstrapper;
pub use generation_service::{
    GenerationFailure, GenerationOptions, GenerationResult, GenerationService, GenerationState,
    WriteStrategy,
};
pub use materializer::Materializer;
pub use parameter_collector::{ParameterCollector, ParameterFlags, resolve_field};
