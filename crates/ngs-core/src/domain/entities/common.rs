use super::DomainError;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A filesystem path guaranteed to stay inside whatever root it is joined to.
///
/// Invariant: never absolute, never empty, no `..` segment. Enforced at
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    /// Fallible constructor.
    pub fn try_new(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        let shown = path.display().to_string();

        if path.as_os_str().is_empty() {
            return Err(DomainError::InvalidManifest("empty target path".into()));
        }
        if path.is_absolute() || path.has_root() {
            return Err(DomainError::AbsolutePathNotAllowed { path: shown });
        }

        let mut normal = 0usize;
        for component in path.components() {
            match component {
                Component::Normal(_) => normal += 1,
                Component::CurDir => {}
                Component::ParentDir => return Err(DomainError::PathTraversal { path: shown }),
                Component::RootDir | Component::Prefix(_) => {
                    return Err(DomainError::AbsolutePathNotAllowed { path: shown });
                }
            }
        }
        if normal == 0 {
            return Err(DomainError::InvalidManifest(format!(
                "target '{shown}' does not name a file"
            )));
        }

        Ok(Self(path))
    }

    /// Join onto `root`. The result is always a descendant of `root`.
    pub fn under(&self, root: &Path) -> PathBuf {
        root.join(&self.0)
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        self.0.to_str().unwrap_or("")
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// `true` when `candidate` is lexically inside `root` (no filesystem access).
pub fn is_descendant(root: &Path, candidate: &Path) -> bool {
    let mut depth: isize = 0;
    let Ok(rest) = candidate.strip_prefix(root) else {
        return false;
    };
    for component in rest.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    depth > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_relative_path_is_accepted() {
        let p = RelativePath::try_new(".github/workflows/ci.yml").unwrap();
        assert_eq!(p.as_str(), ".github/workflows/ci.yml");
    }

    #[test]
    fn parent_segment_is_rejected() {
        assert!(matches!(
            RelativePath::try_new("internal/../../etc/passwd"),
            Err(DomainError::PathTraversal { .. })
        ));
        assert!(matches!(
            RelativePath::try_new(".."),
            Err(DomainError::PathTraversal { .. })
        ));
    }

    #[test]
    fn absolute_path_is_rejected() {
        assert!(matches!(
            RelativePath::try_new("/etc/passwd"),
            Err(DomainError::AbsolutePathNotAllowed { .. })
        ));
    }

    #[test]
    fn empty_and_dot_paths_are_rejected() {
        assert!(RelativePath::try_new("").is_err());
        assert!(RelativePath::try_new(".").is_err());
        assert!(RelativePath::try_new("./.").is_err());
    }

    #[test]
    fn joined_path_is_descendant_of_root() {
        let root = Path::new("/srv/projects/acme");
        let p = RelativePath::try_new("cmd/root.go").unwrap();
        let joined = p.under(root);
        assert_eq!(joined, PathBuf::from("/srv/projects/acme/cmd/root.go"));
        assert!(is_descendant(root, &joined));
    }

    #[test]
    fn descendant_check_rejects_escapes_and_root_itself() {
        let root = Path::new("/srv/acme");
        assert!(!is_descendant(root, Path::new("/srv/acme")));
        assert!(!is_descendant(root, Path::new("/srv/acme/../other")));
        assert!(!is_descendant(root, Path::new("/srv/other/file")));
        assert!(is_descendant(root, Path::new("/srv/acme/./a/../b")));
    }
}
