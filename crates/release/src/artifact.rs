//! Discovery of build artifacts to attach to a release.
//!
//! Only files directly inside the build directory are candidates;
//! subdirectories are skipped rather than descended into.

use crate::error::{Error, Result};
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A file that will be uploaded as a release asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// Full path on disk
    pub path: PathBuf,
    /// Asset name (the file's base name)
    pub name: String,
}

impl CandidateFile {
    /// Read the whole file into memory.
    ///
    /// # Errors
    ///
    /// Returns an artifact error if the file cannot be read.
    pub fn read(&self) -> Result<Bytes> {
        std::fs::read(&self.path).map(Bytes::from).map_err(|e| {
            Error::artifact_with_source(
                format!("failed to read {}", self.path.display()),
                Some(self.path.clone()),
                e,
            )
        })
    }
}

/// Collect the regular files directly inside `dir`, sorted by name.
///
/// A directory that does not exist yields an empty list.
///
/// # Errors
///
/// Returns an artifact error if an existing directory cannot be listed or
/// contains a file whose name is not valid UTF-8.
pub fn collect_candidates(dir: &Path) -> Result<Vec<CandidateFile>> {
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "Build directory does not exist");
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(dir).map_err(|e| {
        Error::artifact_with_source(
            format!("failed to list {}", dir.display()),
            Some(dir.to_path_buf()),
            e,
        )
    })?;

    let mut candidates = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            debug!(path = %path.display(), "Skipping non-file entry");
            continue;
        }

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                Error::artifact(
                    format!("invalid artifact filename: {}", path.display()),
                    Some(path.clone()),
                )
            })?
            .to_string();

        candidates.push(CandidateFile { path, name });
    }

    candidates.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_dir_is_empty() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("does-not-exist");
        assert!(collect_candidates(&missing).unwrap().is_empty());
    }

    #[test]
    fn test_empty_dir_is_empty() {
        let temp = TempDir::new().unwrap();
        assert!(collect_candidates(temp.path()).unwrap().is_empty());
    }

    #[test]
    fn test_collects_direct_files_only() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("kernel.img"), b"kernel").unwrap();
        std::fs::write(temp.path().join("dtbo.img"), b"dtbo").unwrap();
        std::fs::create_dir(temp.path().join("modules")).unwrap();
        std::fs::write(temp.path().join("modules").join("wifi.ko"), b"ko").unwrap();

        let candidates = collect_candidates(temp.path()).unwrap();
        let names: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["dtbo.img", "kernel.img"]);
    }

    #[test]
    fn test_file_path_instead_of_dir_is_empty() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("Image");
        std::fs::write(&file, b"x").unwrap();
        assert!(collect_candidates(&file).unwrap().is_empty());
    }

    #[test]
    fn test_read_candidate() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("boot.img"), b"boot-bytes").unwrap();

        let candidates = collect_candidates(temp.path()).unwrap();
        assert_eq!(candidates[0].read().unwrap(), Bytes::from_static(b"boot-bytes"));
    }

    #[test]
    fn test_read_missing_candidate_fails() {
        let candidate = CandidateFile {
            path: PathBuf::from("/nonexistent/boot.img"),
            name: "boot.img".to_string(),
        };
        let err = candidate.read().unwrap_err();
        assert!(matches!(err, Error::Artifact { .. }));
    }
}
