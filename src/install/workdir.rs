//! Scratch directory owned by one install run.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::{ErrorExt, Result};

const WORKDIR_PREFIX: &str = "relkit-install.";

/// Exclusively owned scratch directory, removed when dropped.
///
/// Dropping happens on success, on every error path, and when an interrupt
/// cancels the pipeline future that owns it.
#[derive(Debug)]
pub struct WorkDir {
    dir: TempDir,
}

impl WorkDir {
    /// Create a fresh directory under `parent`, or the system temp dir.
    pub fn create(parent: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(WORKDIR_PREFIX);

        let dir = match parent {
            Some(parent) => builder
                .tempdir_in(parent)
                .fs_context("creating scratch directory", parent)?,
            None => builder
                .tempdir()
                .fs_context("creating scratch directory", std::env::temp_dir())?,
        };

        log::debug!("Scratch directory: {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Where downloads are staged before being moved out.
    pub fn staging_dir(&self) -> PathBuf {
        self.dir.path().join("download")
    }

    /// Where the archive is unpacked.
    pub fn extract_dir(&self) -> PathBuf {
        self.dir.path().join("extract")
    }
}
