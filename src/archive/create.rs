//! Archive creation for release artifacts.
//!
//! These functions do blocking IO; async callers run them through
//! `spawn_blocking`.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;

use super::ArchiveFormat;
use crate::error::{Context, ErrorExt, Result};

/// Mode recorded for the packaged binary.
const BINARY_MODE: u32 = 0o755;

/// Package `binary_path` into `archive_path` using `format`.
///
/// `stem` names the binary inside the archive (and the tarball's top-level
/// directory). Windows binaries keep the file name of `binary_path` so the
/// `.exe` suffix survives.
pub fn create_archive(
    format: ArchiveFormat,
    binary_path: &Path,
    archive_path: &Path,
    stem: &str,
) -> Result<()> {
    match format {
        ArchiveFormat::TarGz => create_tar_gz(binary_path, archive_path, stem),
        ArchiveFormat::Zip => {
            let entry_name = binary_path
                .file_name()
                .and_then(|n| n.to_str())
                .context("binary path has no UTF-8 file name")?;
            create_zip(binary_path, archive_path, entry_name)
        }
    }
}

/// Create `archive_path` as a tar.gz holding `<stem>/<stem>`.
pub fn create_tar_gz(binary_path: &Path, archive_path: &Path, stem: &str) -> Result<()> {
    let mut binary = File::open(binary_path).fs_context("opening binary", binary_path)?;
    let size = binary
        .metadata()
        .fs_context("reading binary metadata", binary_path)?
        .len();

    let output = File::create(archive_path).fs_context("creating archive", archive_path)?;
    let encoder = GzEncoder::new(BufWriter::new(output), Compression::default());
    let mut builder = tar::Builder::new(encoder);

    let mut dir_header = tar::Header::new_gnu();
    dir_header.set_entry_type(tar::EntryType::Directory);
    dir_header.set_mode(BINARY_MODE);
    dir_header.set_size(0);
    dir_header.set_cksum();
    builder
        .append_data(&mut dir_header, format!("{stem}/"), io::empty())
        .fs_context("writing archive directory entry", archive_path)?;

    let mut header = tar::Header::new_gnu();
    header.set_entry_type(tar::EntryType::Regular);
    header.set_mode(BINARY_MODE);
    header.set_size(size);
    header.set_cksum();
    builder
        .append_data(&mut header, format!("{stem}/{stem}"), &mut binary)
        .fs_context("writing binary into archive", archive_path)?;

    let encoder = builder
        .into_inner()
        .fs_context("finishing tar stream", archive_path)?;
    encoder
        .finish()
        .fs_context("finishing gzip stream", archive_path)?
        .flush()
        .fs_context("flushing archive", archive_path)?;

    Ok(())
}

/// Create `archive_path` as a zip holding the binary at the root as `entry_name`.
pub fn create_zip(binary_path: &Path, archive_path: &Path, entry_name: &str) -> Result<()> {
    let mut binary = File::open(binary_path).fs_context("opening binary", binary_path)?;
    let output = File::create(archive_path).fs_context("creating archive", archive_path)?;

    let mut writer = zip::ZipWriter::new(BufWriter::new(output));
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(BINARY_MODE);

    writer.start_file(entry_name, options)?;
    io::copy(&mut binary, &mut writer).fs_context("writing binary into archive", archive_path)?;
    writer
        .finish()?
        .flush()
        .fs_context("flushing archive", archive_path)?;

    Ok(())
}
