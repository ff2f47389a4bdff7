//! Local filesystem adapter using std::fs.

use std::io;
use std::path::{Path, PathBuf};

use tracing::trace;

use ngs_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{NgsError, NgsResult},
};

/// Prefix of staging directories created beside the destination.
const STAGING_PREFIX: &str = ".new-go-server-";

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> NgsResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> NgsResult<()> {
        trace!(path = %path.display(), bytes = content.len(), "write");
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn rename(&self, from: &Path, to: &Path) -> NgsResult<()> {
        std::fs::rename(from, to).map_err(|e| map_io_error(to, e, "move into place"))
    }

    fn remove_dir_all(&self, path: &Path) -> NgsResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }

    fn create_staging_dir(&self, parent: &Path) -> NgsResult<PathBuf> {
        tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(parent)
            .map(tempfile::TempDir::keep)
            .map_err(|e| map_io_error(parent, e, "create staging directory"))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> NgsError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {operation}: {e}"),
    }
    .into()
}
