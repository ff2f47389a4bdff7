//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{
        Arc, RwLock,
        atomic::{AtomicUsize, Ordering},
    },
};

use ngs_core::{
    application::{ApplicationError, ports::Filesystem},
    error::NgsResult,
};

/// In-memory filesystem for testing.
///
/// Cloning shares the underlying tree, so a test can hand one clone to a
/// service and inspect another.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
    staging_counter: Arc<AtomicUsize>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: BTreeSet<PathBuf>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<Vec<u8>> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// All file paths, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> NgsResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::LockPoisoned)?;

        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }

        Ok(())
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> NgsResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::LockPoisoned)?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !inner.directories.contains(parent)
        {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "Parent directory does not exist".into(),
            }
            .into());
        }

        inner.files.insert(path.to_path_buf(), content.to_vec());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn rename(&self, from: &Path, to: &Path) -> NgsResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::LockPoisoned)?;

        let parent_ok = to
            .parent()
            .is_none_or(|p| p.as_os_str().is_empty() || inner.directories.contains(p));
        let source_exists = inner.files.contains_key(from) || inner.directories.contains(from);
        if !source_exists || !parent_ok {
            return Err(ApplicationError::FilesystemError {
                path: to.to_path_buf(),
                reason: "No such file or directory".into(),
            }
            .into());
        }

        let files: Vec<_> = inner
            .files
            .keys()
            .filter(|p| p.starts_with(from))
            .cloned()
            .collect();
        for old in files {
            if let Some(content) = inner.files.remove(&old) {
                inner.files.insert(relocate(&old, from, to), content);
            }
        }

        let dirs: Vec<_> = inner
            .directories
            .iter()
            .filter(|p| p.starts_with(from))
            .cloned()
            .collect();
        for old in dirs {
            inner.directories.remove(&old);
            inner.directories.insert(relocate(&old, from, to));
        }

        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> NgsResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::LockPoisoned)?;

        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));

        Ok(())
    }

    fn create_staging_dir(&self, parent: &Path) -> NgsResult<PathBuf> {
        let n = self.staging_counter.fetch_add(1, Ordering::Relaxed);
        let staging = parent.join(format!(".staging-{n}"));
        self.create_dir_all(&staging)?;
        Ok(staging)
    }
}

fn relocate(old: &Path, from: &Path, to: &Path) -> PathBuf {
    match old.strip_prefix(from) {
        Ok(rest) if !rest.as_os_str().is_empty() => to.join(rest),
        _ => to.to_path_buf(),
    }
}
