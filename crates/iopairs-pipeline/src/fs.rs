//! Filesystem helpers

use crate::error::{PipelineError, Result};
use std::path::{Path, PathBuf};

/// Create `path` and its parents if missing (mode 0755 on unix)
pub fn ensure_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }

    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }

    builder
        .create(path)
        .map_err(|e| PipelineError::io(path, e))
}

/// Expand a glob pattern to the files it matches
///
/// Directories are ignored. A pattern matching no files is an error.
pub fn expand_files(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern).map_err(|e| PipelineError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in paths {
        let path = entry.map_err(|e| {
            let path = e.path().to_path_buf();
            PipelineError::io(path, e.into_error())
        })?;
        if path.is_file() {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(PipelineError::NoMatchingDocuments {
            pattern: pattern.to_string(),
        });
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_dir_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());

        // Second call is a no-op
        ensure_dir(&nested).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_ensure_dir_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        ensure_dir(&out).unwrap();

        let mode = std::fs::metadata(&out).unwrap().permissions().mode();
        // umask may clear bits but never adds any
        assert_eq!(mode & 0o777 & !0o755, 0);
        assert_eq!(mode & 0o700, 0o700);
    }

    #[test]
    fn test_expand_files_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();
        std::fs::create_dir(dir.path().join("sub.txt")).unwrap();

        let pattern = format!("{}/*.txt", dir.path().display());
        let files = expand_files(&pattern).unwrap();
        assert_eq!(files, vec![dir.path().join("a.txt")]);
    }

    #[test]
    fn test_expand_files_no_match() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/*.md", dir.path().display());

        let err = expand_files(&pattern).unwrap_err();
        assert!(matches!(err, PipelineError::NoMatchingDocuments { .. }));
    }

    #[test]
    fn test_expand_files_invalid_pattern() {
        let err = expand_files("docs/[").unwrap_err();
        assert!(matches!(err, PipelineError::InvalidPattern { .. }));
    }
}
