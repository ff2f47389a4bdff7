//! Destination path validation.
//!
//! Resolution is a pure check: nothing is created here, the materializer
//! creates directories later.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::error::{DomainError, path_reason};

/// A destination that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPath {
    root: PathBuf,
    display: String,
}

impl ValidatedPath {
    /// Absolute directory the project is generated into.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The destination as the user should see it (`name` for `.`).
    pub fn display(&self) -> &str {
        &self.display
    }
}

/// Validates and normalizes destination directories.
pub struct PathResolver;

impl PathResolver {
    /// Validate `path` for a project called `name`.
    ///
    /// - `"."` generates into `<cwd>/<name>` and is always valid
    /// - absolute paths need an existing parent directory
    /// - relative paths must be resolvable against the current directory
    pub fn resolve(path: &str, name: &str) -> Result<ValidatedPath, DomainError> {
        if path == "." {
            let root = absolutize(Path::new(name), path)?;
            debug!(root = %root.display(), "current directory mode");
            return Ok(ValidatedPath {
                root,
                display: name.to_string(),
            });
        }

        let requested = Path::new(path);
        if requested.is_absolute() {
            let parent_exists = requested.parent().is_none_or(Path::is_dir);
            if !parent_exists {
                return Err(DomainError::Path {
                    path: path.to_string(),
                    reason: path_reason::PARENT_MISSING,
                });
            }
            return Ok(ValidatedPath {
                root: requested.to_path_buf(),
                display: path.to_string(),
            });
        }

        Ok(ValidatedPath {
            root: absolutize(requested, path)?,
            display: path.to_string(),
        })
    }
}

fn absolutize(relative: &Path, original: &str) -> Result<PathBuf, DomainError> {
    std::path::absolute(relative).map_err(|_| DomainError::Path {
        path: original.to_string(),
        reason: path_reason::UNRESOLVABLE,
    })
}
