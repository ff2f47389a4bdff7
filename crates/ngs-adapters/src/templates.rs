//! Template payload adapters.
//!
//! [`EmbeddedTemplates`] serves the bodies compiled into the binary from the
//! crate's `templates/` directory, one file per manifest source id. A
//! directory override (see [`TEMPLATES_DIR_ENV`]) lets users replace
//! individual bodies without rebuilding: a file named after the source id in
//! that directory wins over the embedded one.
//!
//! [`InMemoryTemplates`] is the test double.

use std::{
    collections::HashMap,
    io,
    path::{Path, PathBuf},
};

use include_dir::{Dir, include_dir};
use tracing::{debug, instrument};

use ngs_core::{
    application::{ApplicationError, ports::TemplateSource},
    error::NgsResult,
};

/// Environment variable naming a directory of template overrides.
pub const TEMPLATES_DIR_ENV: &str = "NEW_GO_SERVER_TEMPLATES_DIR";

static PAYLOAD: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// Built-in template bodies, optionally overridden from a directory.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedTemplates {
    override_dir: Option<PathBuf>,
}

impl EmbeddedTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefer bodies found in `dir` over the embedded ones.
    pub fn with_override_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.override_dir = Some(dir.into());
        self
    }

    pub fn override_dir(&self) -> Option<&Path> {
        self.override_dir.as_deref()
    }

    /// Source ids of every embedded body, sorted.
    pub fn embedded_ids() -> Vec<&'static str> {
        let mut ids: Vec<_> = PAYLOAD
            .files()
            .filter_map(|f| f.path().to_str())
            .collect();
        ids.sort_unstable();
        ids
    }

    fn read_override(&self, source_id: &str) -> NgsResult<Option<Vec<u8>>> {
        let Some(dir) = &self.override_dir else {
            return Ok(None);
        };
        let path = dir.join(source_id);
        match std::fs::read(&path) {
            Ok(bytes) => {
                debug!(path = %path.display(), "using template override");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ApplicationError::SourceRead {
                source_id: source_id.to_string(),
                reason: format!("{}: {e}", path.display()),
            }
            .into()),
        }
    }
}

impl TemplateSource for EmbeddedTemplates {
    #[instrument(skip(self))]
    fn read(&self, source_id: &str) -> NgsResult<Vec<u8>> {
        if let Some(bytes) = self.read_override(source_id)? {
            return Ok(bytes);
        }
        PAYLOAD
            .get_file(source_id)
            .map(|f| f.contents().to_vec())
            .ok_or_else(|| {
                ApplicationError::SourceRead {
                    source_id: source_id.to_string(),
                    reason: "not found in the embedded payload".into(),
                }
                .into()
            })
    }
}

/// Template bodies held in a map. Unknown ids are `SourceReadError`s.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTemplates {
    bodies: HashMap<String, Vec<u8>>,
}

impl InMemoryTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source_id: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.bodies.insert(source_id.into(), body.into());
        self
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl TemplateSource for InMemoryTemplates {
    fn read(&self, source_id: &str) -> NgsResult<Vec<u8>> {
        self.bodies.get(source_id).cloned().ok_or_else(|| {
            ApplicationError::SourceRead {
                source_id: source_id.to_string(),
                reason: "no such template".into(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ngs_core::domain::Manifest;

    #[test]
    fn every_manifest_entry_has_an_embedded_body() {
        let templates = EmbeddedTemplates::new();
        for entry in Manifest::builtin().unwrap().iter() {
            let body = templates.read(entry.source_id()).unwrap();
            assert!(!body.is_empty(), "{} is empty", entry.source_id());
        }
    }

    #[test]
    fn payload_has_no_orphan_bodies() {
        let manifest = Manifest::builtin().unwrap();
        let mut used: Vec<_> = manifest.iter().map(|e| e.source_id()).collect();
        used.sort_unstable();
        assert_eq!(EmbeddedTemplates::embedded_ids(), used);
    }

    #[test]
    fn unknown_id_is_a_source_read_error() {
        let err = EmbeddedTemplates::new().read("nope.go").unwrap_err();
        assert_eq!(err.kind(), "SourceReadError");
    }

    #[test]
    fn override_dir_wins_for_present_files_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.go"), "package custom\n").unwrap();
        let templates = EmbeddedTemplates::new().with_override_dir(dir.path());

        assert_eq!(templates.read("main.go").unwrap(), b"package custom\n");
        let go_mod = templates.read("go.mod").unwrap();
        assert!(go_mod.starts_with(b"module "));
    }

    #[test]
    fn in_memory_source_serves_what_it_was_given() {
        let templates = InMemoryTemplates::new().with("main.go", "package main");
        assert_eq!(templates.len(), 1);
        assert_eq!(templates.read("main.go").unwrap(), b"package main");
        assert!(templates.read("go.mod").is_err());
    }
}
