use std::collections::HashSet;

use crate::domain::{entities::common::RelativePath, error::DomainError};

/// Target of the module descriptor in the built-in manifest.
pub const MODULE_DESCRIPTOR: &str = "go.mod";

/// `(source_id, target)` pairs of the built-in Go backend skeleton, in
/// generation order.
const BUILTIN_ENTRIES: &[(&str, &str)] = &[
    // Core application files
    ("main.go", "main.go"),
    ("go.mod", "go.mod"),
    ("cmd_root.go", "cmd/root.go"),
    ("env_local", ".env.local"),
    ("gitignore", ".gitignore"),
    ("github_yml", ".github/workflows/ci.yml"),
    ("README.md", "README.md"),
    ("Makefile", "Makefile"),
    // Configuration
    ("internal_conf_vars.go", "internal/conf/vars.go"),
    ("internal_conf_pg.go", "internal/conf/pg.go"),
    ("internal_conf_dependencies.go", "internal/conf/dependencies.go"),
    // Shared utilities
    ("internal_shared_logger_logger.go", "internal/shared/logger/logger.go"),
    ("internal_shared_validation_validation.go", "internal/shared/validation/validation.go"),
    ("internal_shared_constants_constants.go", "internal/shared/constants/constants.go"),
    ("internal_shared_http_http.go", "internal/shared/http/http.go"),
    ("internal_shared_uuid_uuid.go", "internal/shared/uuid/uuid.go"),
    ("internal_shared_assertions_assertions.go", "internal/shared/assertions/assertions.go"),
    ("internal_shared_middleware_middleware.go", "internal/shared/middleware/middleware.go"),
    // Shared tests
    (
        "internal_tests_shared_assertions_assertions_test.go",
        "internal/tests/shared/assertions/assertions_test.go",
    ),
    (
        "internal_tests_shared_validation_validation_test.go",
        "internal/tests/shared/validation/validation_test.go",
    ),
    ("internal_tests_shared_logger_logger_test.go", "internal/tests/shared/logger/logger_test.go"),
    (
        "internal_tests_shared_constants_constants_test.go",
        "internal/tests/shared/constants/constants_test.go",
    ),
    ("internal_tests_shared_http_http_test.go", "internal/tests/shared/http/http_test.go"),
    ("internal_tests_shared_uuid_uuid_test.go", "internal/tests/shared/uuid/uuid_test.go"),
    (
        "internal_tests_shared_middleware_middleware_test.go",
        "internal/tests/shared/middleware/middleware_test.go",
    ),
    // Handlers
    ("internal_handlers_handlers.go", "internal/handlers/handlers.go"),
    // Health module
    ("internal_health_models_health.go", "internal/health/models/health.go"),
    ("internal_health_service_service.go", "internal/health/service/service.go"),
    ("internal_health_controller_controller.go", "internal/health/controller/controller.go"),
    // Users module
    ("internal_users_models_users.go", "internal/users/models/users.go"),
    ("internal_users_datasource_datasource.go", "internal/users/datasource/datasource.go"),
    ("internal_users_service_service.go", "internal/users/service/service.go"),
    ("internal_users_controller_controller.go", "internal/users/controller/controller.go"),
    // Organizations module
    (
        "internal_organizations_models_organizations.go",
        "internal/organizations/models/organizations.go",
    ),
    (
        "internal_organizations_datasource_datasource.go",
        "internal/organizations/datasource/datasource.go",
    ),
    ("internal_organizations_service_service.go", "internal/organizations/service/service.go"),
    (
        "internal_organizations_controller_controller.go",
        "internal/organizations/controller/controller.go",
    ),
];

/// One generated file: where its template comes from and where it lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    source_id: String,
    target: RelativePath,
}

impl ManifestEntry {
    pub fn new(source_id: impl Into<String>, target: &str) -> Result<Self, DomainError> {
        let source_id = source_id.into();
        if source_id.is_empty() {
            return Err(DomainError::InvalidManifest(format!(
                "entry for '{target}' has no source id"
            )));
        }
        Ok(Self {
            source_id,
            target: RelativePath::try_new(target)?,
        })
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn target(&self) -> &RelativePath {
        &self.target
    }
}

/// The ordered, immutable list of files a run generates.
///
/// Invariants: non-empty, unique targets, every target stays inside the
/// destination root, and the module descriptor is one of the targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
    descriptor: RelativePath,
}

impl Manifest {
    pub fn new(entries: Vec<ManifestEntry>, descriptor: &str) -> Result<Self, DomainError> {
        if entries.is_empty() {
            return Err(DomainError::InvalidManifest("manifest is empty".into()));
        }

        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.target.as_path()) {
                return Err(DomainError::DuplicatePath {
                    path: entry.target.to_string(),
                });
            }
        }

        let descriptor = RelativePath::try_new(descriptor)?;
        if !seen.contains(descriptor.as_path()) {
            return Err(DomainError::InvalidManifest(format!(
                "module descriptor '{descriptor}' is not generated by the manifest"
            )));
        }

        Ok(Self {
            entries,
            descriptor,
        })
    }

    /// The manifest compiled into the binary.
    pub fn builtin() -> Result<Self, DomainError> {
        let entries = BUILTIN_ENTRIES
            .iter()
            .map(|(source, target)| ManifestEntry::new(*source, target))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(entries, MODULE_DESCRIPTOR)
    }

    /// A manifest holding only the first `n` entries of `self`, keeping the
    /// descriptor requirement.
    pub fn truncated(&self, n: usize) -> Result<Self, DomainError> {
        Self::new(
            self.entries.iter().take(n).cloned().collect(),
            self.descriptor.as_str(),
        )
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The file the bootstrap step requires.
    pub fn descriptor(&self) -> &RelativePath {
        &self.descriptor
    }
}
