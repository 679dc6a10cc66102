//! File system utilities for release and install.
//!
//! Provides file operations with automatic directory creation, idempotent
//! removal, and path context on every error.

use std::io;
use std::path::Path;

use tokio::fs;

use crate::bail;
use crate::error::{ErrorExt, Result};

/// Mode given to installed and packaged executables.
pub const EXECUTABLE_MODE: u32 = 0o755;

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        bail!("{} does not exist", from.display());
    }
    if !from.is_file() {
        bail!("{} is not a file", from.display());
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("copying file", to)?;
    Ok(())
}

/// Moves a file, falling back to copy and delete when a rename is not
/// possible (e.g. the scratch directory lives on another filesystem).
pub async fn move_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating directory", dest_dir)?;
    }

    match fs::rename(from, to).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            log::debug!(
                "rename {} -> {} crosses filesystems, copying instead",
                from.display(),
                to.display()
            );
            copy_file(from, to).await?;
            fs::remove_file(from)
                .await
                .fs_context("removing moved file", from)?;
            Ok(())
        }
        Err(e) => Err::<(), _>(e).fs_context("moving file", to),
    }
}

/// Removes a file if it exists.
pub async fn remove_file(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()), // Idempotent
        Err(e) => Err::<(), _>(e).fs_context("removing file", path),
    }
}

/// Marks a file executable (`0755`). No-op on non-unix targets.
pub async fn set_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, std::fs::Permissions::from_mode(EXECUTABLE_MODE))
            .await
            .fs_context("setting executable permissions", path)?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn copy_file_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("relkit");
        std::fs::write(&from, b"bin").unwrap();
        let to = dir.path().join("a").join("b").join("relkit");

        copy_file(&from, &to).await.unwrap();

        assert_eq!(std::fs::read(&to).unwrap(), b"bin");
        assert!(from.exists());
    }

    #[tokio::test]
    async fn copy_file_rejects_directories_and_missing_sources() {
        let dir = tempfile::tempdir().unwrap();
        assert!(copy_file(dir.path(), &dir.path().join("x")).await.is_err());
        assert!(copy_file(&dir.path().join("missing"), &dir.path().join("x")).await.is_err());
    }

    #[tokio::test]
    async fn move_file_removes_source() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("archive.zip");
        std::fs::write(&from, b"zip").unwrap();
        let to = dir.path().join("out").join("archive.zip");

        move_file(&from, &to).await.unwrap();

        assert!(!from.exists());
        assert_eq!(std::fs::read(&to).unwrap(), b"zip");
    }

    #[tokio::test]
    async fn removal_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        remove_file(&dir.path().join("missing")).await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn set_executable_applies_0755() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relkit");
        std::fs::write(&path, b"bin").unwrap();

        set_executable(&path).await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
