//! @ai:module:intent Find the Go source files under a root path
//! @ai:module:layer infrastructure
//! @ai:module:public_api discover
//! @ai:module:depends_on language, error

use crate::error::{Error, Result};
use crate::language;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// @ai:intent List every Go source file under root, in a stable order
/// @ai:pre root exists
/// @ai:post a file root is returned alone when it is a Go file, otherwise nothing
/// @ai:post Err(Walk) on any traversal error; no partial list is returned
/// @ai:effects fs:read
pub fn discover(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| Error::Walk {
            path: root.to_path_buf(),
            source,
        })?;

        if entry.file_type().is_file() && language::is_source_file(entry.path()) {
            files.push(entry.into_path());
        }
    }

    tracing::debug!("discovered {} Go files under {}", files.len(), root.display());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, rel: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "package p\n").unwrap();
    }

    #[test]
    fn test_walks_sorted_and_filters_suffix() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b.go");
        touch(dir.path(), "a.go");
        touch(dir.path(), "README.md");
        touch(dir.path(), "api/v1/types.go");
        touch(dir.path(), "api/v1/types.go.orig");

        let files = discover(dir.path()).unwrap();
        let rel: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            rel,
            vec![
                PathBuf::from("a.go"),
                PathBuf::from("api/v1/types.go"),
                PathBuf::from("b.go"),
            ]
        );
    }

    #[test]
    fn test_single_file_root() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "main.go");
        let root = dir.path().join("main.go");

        assert_eq!(discover(&root).unwrap(), vec![root]);
    }

    #[test]
    fn test_non_go_file_root_yields_nothing() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "notes.txt");

        assert!(discover(&dir.path().join("notes.txt")).unwrap().is_empty());
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let dir = TempDir::new().unwrap();
        let result = discover(&dir.path().join("missing"));

        assert!(matches!(result, Err(Error::Walk { .. })));
    }

    #[test]
    fn test_go_named_directory_is_not_a_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("pkg.go")).unwrap();
        touch(dir.path(), "pkg.go/inner.go");

        let files = discover(dir.path()).unwrap();
        assert_eq!(files, vec![dir.path().join("pkg.go").join("inner.go")]);
    }
}
