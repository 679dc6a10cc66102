//! Archive extraction for downloaded release artifacts.
//!
//! Handles the two layouts produced by [`super::create`]:
//! tarballs lose exactly one leading path component, zips are flattened.

use std::fs::File;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use flate2::read::GzDecoder;
use tar::Archive;

use super::ArchiveFormat;
use crate::bail;
use crate::error::{ErrorExt, Result};

/// Extract `archive_path` into `dest_dir` according to `format`.
///
/// Creates `dest_dir` if it does not exist.
pub fn extract_archive(archive_path: &Path, format: ArchiveFormat, dest_dir: &Path) -> Result<()> {
    extract_archive_cancellable(archive_path, format, dest_dir, &AtomicBool::new(false))
}

/// [`extract_archive`] that stops before the next entry once `cancel` is set.
pub fn extract_archive_cancellable(
    archive_path: &Path,
    format: ArchiveFormat,
    dest_dir: &Path,
    cancel: &AtomicBool,
) -> Result<()> {
    std::fs::create_dir_all(dest_dir).fs_context("creating extraction directory", dest_dir)?;

    match format {
        ArchiveFormat::TarGz => unpack_tar_gz(archive_path, dest_dir, cancel),
        ArchiveFormat::Zip => unpack_zip(archive_path, dest_dir, cancel),
    }
}

fn check_cancelled(cancel: &AtomicBool, archive_path: &Path) -> Result<()> {
    if cancel.load(Ordering::SeqCst) {
        bail!("Extraction of {} cancelled", archive_path.display());
    }
    Ok(())
}

/// Extract a tar.gz, stripping the first path component of every entry.
///
/// Equivalent to `tar -xzf <archive> --strip-components=1 -C <dest>`.
/// Entries that consist only of the top-level directory are skipped. Only
/// regular files and directories are accepted; links, devices and fifos fail
/// the extraction, as does any write through an existing symlink.
pub fn extract_tar_gz(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    unpack_tar_gz(archive_path, dest_dir, &AtomicBool::new(false))
}

fn unpack_tar_gz(archive_path: &Path, dest_dir: &Path, cancel: &AtomicBool) -> Result<()> {
    let file = File::open(archive_path).fs_context("opening archive", archive_path)?;
    let mut archive = Archive::new(GzDecoder::new(file));

    let entries = archive
        .entries()
        .fs_context("reading tar entries", archive_path)?;

    for entry in entries {
        check_cancelled(cancel, archive_path)?;
        let mut entry = entry.fs_context("reading tar entry", archive_path)?;
        let entry_path = entry
            .path()
            .fs_context("decoding tar entry path", archive_path)?
            .into_owned();

        reject_unsafe_path(&entry_path)?;

        let entry_type = entry.header().entry_type();
        if entry_type.is_pax_global_extensions()
            || entry_type.is_pax_local_extensions()
            || entry_type.is_gnu_longname()
            || entry_type.is_gnu_longlink()
        {
            continue;
        }
        if !entry_type.is_file() && !entry_type.is_dir() {
            bail!(
                "Refusing to extract {:?} entry {} from {}",
                entry_type,
                entry_path.display(),
                archive_path.display()
            );
        }

        let stripped: PathBuf = entry_path
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .skip(1)
            .collect();
        if stripped.as_os_str().is_empty() {
            continue;
        }

        let output_path = dest_dir.join(&stripped);
        reject_symlink_components(dest_dir, &stripped)?;
        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent).fs_context("creating directory", parent)?;
        }

        log::debug!("Extracting {} -> {}", entry_path.display(), output_path.display());
        entry
            .unpack(&output_path)
            .fs_context("unpacking tar entry", &output_path)?;
    }

    Ok(())
}

/// Extract every file of a zip directly into `dest_dir`, ignoring directories.
///
/// Equivalent to `unzip -j <archive> -d <dest>`.
pub fn extract_zip(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    unpack_zip(archive_path, dest_dir, &AtomicBool::new(false))
}

fn unpack_zip(archive_path: &Path, dest_dir: &Path, cancel: &AtomicBool) -> Result<()> {
    let file = File::open(archive_path).fs_context("opening archive", archive_path)?;
    let mut archive = zip::ZipArchive::new(file)?;

    for i in 0..archive.len() {
        check_cancelled(cancel, archive_path)?;
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }

        let entry_path = match entry.enclosed_name() {
            Some(path) => path,
            None => bail!(
                "Refusing to extract unsafe zip entry {} from {}",
                entry.name(),
                archive_path.display()
            ),
        };

        let Some(file_name) = entry_path.file_name() else {
            continue;
        };
        let output_path = dest_dir.join(file_name);
        reject_symlink_components(dest_dir, Path::new(file_name))?;

        log::debug!("Extracting {} -> {}", entry_path.display(), output_path.display());
        let mut outfile = File::create(&output_path).fs_context("creating file", &output_path)?;
        std::io::copy(&mut entry, &mut outfile).fs_context("extracting file", &output_path)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                std::fs::set_permissions(&output_path, std::fs::Permissions::from_mode(mode))
                    .fs_context("setting file permissions", &output_path)?;
            }
        }
    }

    Ok(())
}

/// Reject absolute paths and `..` components.
fn reject_unsafe_path(path: &Path) -> Result<()> {
    if path.is_absolute()
        || path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)))
    {
        bail!(
            "Refusing to extract path with parent directory or absolute reference: {}",
            path.display()
        );
    }
    Ok(())
}

/// Fail if any existing component of `dest_dir/relative` is a symlink.
fn reject_symlink_components(dest_dir: &Path, relative: &Path) -> Result<()> {
    let mut current = dest_dir.to_path_buf();
    for component in relative.components() {
        current.push(component);
        if let Ok(metadata) = std::fs::symlink_metadata(&current)
            && metadata.file_type().is_symlink()
        {
            bail!("Refusing to extract through symlink {}", current.display());
        }
    }
    Ok(())
}
