//! Archive integrity check against the downloaded sidecar.

use std::path::Path;

use crate::checksum::{SidecarRecord, calculate_sha256};
use crate::error::ErrorExt;
use crate::install::error::{InstallError, InstallResult};

/// Compare the SHA-256 of `archive` with the digest recorded in `sidecar`.
///
/// # Returns
///
/// The verified lowercase hex digest.
///
/// # Errors
///
/// - [`InstallError::MalformedSidecar`] when the sidecar has no digest line or
///   names a different file
/// - [`InstallError::ChecksumMismatch`] when the digests differ
pub async fn verify_archive(archive: &Path, sidecar: &Path) -> InstallResult<String> {
    let content = tokio::fs::read_to_string(sidecar)
        .await
        .fs_context("reading checksum file", sidecar)?;

    let record = SidecarRecord::parse(&content).ok_or_else(|| InstallError::MalformedSidecar {
        path: sidecar.to_path_buf(),
        reason: "no SHA-256 digest line found".to_string(),
    })?;

    let archive_name = archive
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if record.file_name != archive_name {
        return Err(InstallError::MalformedSidecar {
            path: sidecar.to_path_buf(),
            reason: format!(
                "digest is for '{}', not '{}'",
                record.file_name, archive_name
            ),
        });
    }

    let actual = calculate_sha256(archive).await?;
    if !actual.eq_ignore_ascii_case(&record.digest) {
        return Err(InstallError::ChecksumMismatch {
            file: archive.to_path_buf(),
            expected: record.digest,
            actual,
        });
    }

    log::debug!("Checksum OK for {}: {actual}", archive.display());
    Ok(actual)
}
