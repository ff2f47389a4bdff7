//! Writes one rendered manifest entry under a root directory.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::{
    application::ports::Filesystem,
    domain::{DomainError, ManifestEntry, is_descendant},
    error::NgsResult,
};

/// Places rendered bytes at their manifest target.
pub struct Materializer<'a> {
    filesystem: &'a dyn Filesystem,
}

impl<'a> Materializer<'a> {
    pub fn new(filesystem: &'a dyn Filesystem) -> Self {
        Self { filesystem }
    }

    /// Create missing ancestors of `root/target`, then write `rendered` there.
    ///
    /// Existing files are overwritten.
    #[instrument(skip_all, fields(target = %entry.target()))]
    pub fn materialize(
        &self,
        entry: &ManifestEntry,
        rendered: &[u8],
        root: &Path,
    ) -> NgsResult<PathBuf> {
        let path = entry.target().under(root);
        if !is_descendant(root, &path) {
            return Err(DomainError::PathTraversal {
                path: entry.target().to_string(),
            }
            .into());
        }

        if let Some(parent) = path.parent() {
            self.filesystem.create_dir_all(parent)?;
        }
        self.filesystem.write_file(&path, rendered)?;

        debug!(bytes = rendered.len(), "file written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{ApplicationError, ports::output::MockFilesystem};
    use mockall::Sequence;

    #[test]
    fn creates_parent_before_writing() {
        let mut seq = Sequence::new();
        let mut fs = MockFilesystem::new();
        fs.expect_create_dir_all()
            .withf(|p| p == Path::new("/srv/acme/internal/conf"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        fs.expect_write_file()
            .withf(|p, c| p == Path::new("/srv/acme/internal/conf/vars.go") && c == &b"package conf"[..])
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        let entry = ManifestEntry::new("internal_conf_vars.go", "internal/conf/vars.go").unwrap();
        let written = Materializer::new(&fs)
            .materialize(&entry, b"package conf", Path::new("/srv/acme"))
            .unwrap();
        assert_eq!(written, PathBuf::from("/srv/acme/internal/conf/vars.go"));
    }

    #[test]
    fn write_failure_is_propagated() {
        let mut fs = MockFilesystem::new();
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file().returning(|p, _| {
            Err(ApplicationError::FilesystemError {
                path: p.to_path_buf(),
                reason: "read-only file system".into(),
            }
            .into())
        });

        let entry = ManifestEntry::new("main.go", "main.go").unwrap();
        let err = Materializer::new(&fs)
            .materialize(&entry, b"package main", Path::new("/srv/acme"))
            .unwrap_err();
        assert_eq!(err.kind(), "IOError");
    }
}
