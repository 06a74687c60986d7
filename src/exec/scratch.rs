// src/exec/scratch.rs

//! Ephemeral per-invocation directories for generated flow documents.
//!
//! A [`ScratchDir`] is removed when [`ScratchDir::close`] is called or, on any
//! other exit path (early return, panic unwinding), when it is dropped.
//! Removal is best-effort: failures are logged and never surfaced.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;
use tracing::{debug, warn};

const PREFIX: &str = "maestro-mcp-";

#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    /// Create a fresh, uniquely named directory under the system temp dir.
    pub fn create() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(PREFIX)
            .tempdir()
            .context("creating scratch directory")?;
        debug!(path = %dir.path().display(), "created scratch directory");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to `name` inside the directory and return its path.
    pub async fn write(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(name);
        tokio::fs::write(&path, contents)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }

    /// Remove the directory and everything in it.
    pub fn close(self) {
        let path = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => debug!(path = %path.display(), "removed scratch directory"),
            Err(e) => warn!(
                path = %path.display(),
                error = %e,
                "failed to remove scratch directory"
            ),
        }
    }

    /// Persist the directory past this value's lifetime and return its path.
    pub fn keep(self) -> PathBuf {
        self.dir.keep()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn close_removes_directory_and_contents() {
        let scratch = ScratchDir::create().unwrap();
        let file = scratch.write("flow.yaml", "appId: x\n---\n").await.unwrap();
        let dir = scratch.path().to_path_buf();
        assert!(file.is_file());

        scratch.close();

        assert!(!dir.exists());
    }

    #[test]
    fn drop_removes_directory() {
        let dir = {
            let scratch = ScratchDir::create().unwrap();
            scratch.path().to_path_buf()
        };
        assert!(!dir.exists());
    }

    #[test]
    fn keep_persists_directory() {
        let scratch = ScratchDir::create().unwrap();
        let dir = scratch.keep();
        assert!(dir.is_dir());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn directories_are_unique() {
        let a = ScratchDir::create().unwrap();
        let b = ScratchDir::create().unwrap();
        assert_ne!(a.path(), b.path());
    }
}
