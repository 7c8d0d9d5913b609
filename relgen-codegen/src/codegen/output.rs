//! Writing generated files

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{CodegenError, Result};

/// A rendered file waiting to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Create `dir` (and parents). An existing directory is fine.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| {
        CodegenError::Generation(format!(
            "Could not create directory {}: {}",
            dir.display(),
            e
        ))
    })
}

/// Write one file, replacing whatever is there.
pub fn write_file(file: &GeneratedFile) -> Result<()> {
    debug!("Writing {}", file.path.display());
    fs::write(&file.path, &file.contents).map_err(|e| {
        CodegenError::Generation(format!(
            "Could not write file {}: {}",
            file.path.display(),
            e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_dir_tolerates_existing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("Models");
        ensure_dir(&target).unwrap();
        ensure_dir(&target).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn test_ensure_dir_blocked_by_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("Models");
        fs::write(&blocker, "not a directory").unwrap();
        let err = ensure_dir(&blocker.join("nested")).unwrap_err();
        assert!(matches!(err, CodegenError::Generation(_)));
    }

    #[test]
    fn test_write_file_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let file = GeneratedFile {
            path: dir.path().join("Product.php"),
            contents: "new".to_string(),
        };
        fs::write(&file.path, "old contents").unwrap();
        write_file(&file).unwrap();
        assert_eq!(fs::read_to_string(&file.path).unwrap(), "new");
    }

    #[test]
    fn test_write_file_onto_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = GeneratedFile {
            path: dir.path().join("Product.php"),
            contents: "<?php".to_string(),
        };
        fs::create_dir(&file.path).unwrap();
        let err = write_file(&file).unwrap_err();
        assert!(matches!(err, CodegenError::Generation(ref m) if m.contains("Product.php")));
    }
}
