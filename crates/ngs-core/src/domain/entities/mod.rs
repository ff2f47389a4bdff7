use super::DomainError;

pub mod common;
pub mod manifest;
pub mod parameters;
