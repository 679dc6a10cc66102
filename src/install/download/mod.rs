//! Resolve and fetch a release archive plus its checksum sidecar.

mod fetch;
mod request;

pub use fetch::{CommandFetcher, Fetch, FetchChain, FetchFuture, HttpFetcher};
pub use request::{DownloadRequest, Version};

use std::path::{Path, PathBuf};

use crate::install::error::InstallResult;
use crate::utils::fs;

/// Archive and sidecar after a successful download.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DownloadedArtifacts {
    pub archive: PathBuf,
    pub sidecar: PathBuf,
}

/// Fetch both files of `request` into `staging_dir`, then move them into
/// `download_dir` under their canonical names.
///
/// Nothing is moved unless both downloads succeed.
pub async fn download_artifacts(
    chain: &FetchChain,
    request: &DownloadRequest,
    staging_dir: &Path,
    download_dir: &Path,
) -> InstallResult<DownloadedArtifacts> {
    let archive_name = request.archive_file_name();
    let sidecar_name = request.sidecar_file_name();

    let staged_archive = staging_dir.join(&archive_name);
    let staged_sidecar = staging_dir.join(&sidecar_name);

    log::info!("Downloading {}", request.archive_url);
    chain.fetch(&request.archive_url, &staged_archive).await?;
    log::info!("Downloading {}", request.sidecar_url);
    chain.fetch(&request.sidecar_url, &staged_sidecar).await?;

    let archive = download_dir.join(&archive_name);
    let sidecar = download_dir.join(&sidecar_name);
    fs::move_file(&staged_archive, &archive).await?;
    fs::move_file(&staged_sidecar, &sidecar).await?;

    Ok(DownloadedArtifacts { archive, sidecar })
}
