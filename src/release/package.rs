//! Archive and digest stages.

use std::path::{Path, PathBuf};

use super::error::ReleaseResult;
use crate::archive::{ArchiveFormat, create_archive};
use crate::checksum::write_sidecar;
use crate::error::Error;
use crate::platform::ReleaseTarget;
use crate::utils::fs;

/// An archive that exists on disk, waiting for its digest.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ArchiveDescriptor {
    pub target: ReleaseTarget,
    pub format: ArchiveFormat,
    pub path: PathBuf,
}

/// A finished release artifact.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PackagedArtifact {
    pub archive: ArchiveDescriptor,
    pub sidecar: PathBuf,
    pub digest: String,
}

/// Compress one compiled binary and delete the raw file.
pub async fn archive_target(dist_dir: &Path, target: &ReleaseTarget) -> ReleaseResult<ArchiveDescriptor> {
    let binary_path = dist_dir.join(target.binary_file_name());
    let archive_path = dist_dir.join(target.archive_file_name());
    let format = target.archive_format();

    log::debug!("Packaging {} -> {}", binary_path.display(), archive_path.display());
    let (binary, archive, stem) = (binary_path.clone(), archive_path.clone(), target.stem());
    tokio::task::spawn_blocking(move || create_archive(format, &binary, &archive, &stem))
        .await
        .map_err(Error::from)??;

    fs::remove_file(&binary_path).await?;

    Ok(ArchiveDescriptor {
        target: target.clone(),
        format,
        path: archive_path,
    })
}

/// Archive every target in order.
pub async fn archive_all(
    dist_dir: &Path,
    targets: &[ReleaseTarget],
) -> ReleaseResult<Vec<ArchiveDescriptor>> {
    let mut archives = Vec::with_capacity(targets.len());
    for target in targets {
        archives.push(archive_target(dist_dir, target).await?);
    }
    log::info!("✓ Created {} archives", archives.len());
    Ok(archives)
}

/// Write a `.sha256sum` sidecar next to every archive.
pub async fn write_digests(archives: Vec<ArchiveDescriptor>) -> ReleaseResult<Vec<PackagedArtifact>> {
    let mut artifacts = Vec::with_capacity(archives.len());
    for archive in archives {
        let (sidecar, record) = write_sidecar(&archive.path).await?;
        artifacts.push(PackagedArtifact {
            archive,
            sidecar,
            digest: record.digest,
        });
    }
    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::extract_archive;
    use crate::checksum::SidecarRecord;

    fn compiled(dist: &Path) -> Vec<ReleaseTarget> {
        let targets = ReleaseTarget::matrix("relkit");
        for target in &targets {
            std::fs::write(dist.join(target.binary_file_name()), target.stem()).unwrap();
        }
        targets
    }

    #[tokio::test]
    async fn every_binary_is_replaced_by_its_archive() {
        let dist = tempfile::tempdir().unwrap();
        let targets = compiled(dist.path());

        let archives = archive_all(dist.path(), &targets).await.unwrap();

        assert_eq!(archives.len(), 6);
        for archive in &archives {
            assert!(archive.path.is_file());
            assert!(!dist.path().join(archive.target.binary_file_name()).exists());
            let is_tarball = archive.path.to_string_lossy().ends_with(".tar.gz");
            assert_eq!(is_tarball, archive.target.to_string().contains("linux"));
        }
    }

    #[tokio::test]
    async fn archives_unpack_to_the_original_binary() {
        let dist = tempfile::tempdir().unwrap();
        let targets = compiled(dist.path());
        let archives = archive_all(dist.path(), &targets).await.unwrap();

        for archive in archives {
            let out = tempfile::tempdir().unwrap();
            extract_archive(&archive.path, archive.format, out.path()).unwrap();
            let extracted = out.path().join(archive.target.binary_file_name());
            assert_eq!(
                std::fs::read_to_string(&extracted).unwrap(),
                archive.target.stem()
            );
        }
    }

    #[tokio::test]
    async fn sidecars_name_their_archive() {
        let dist = tempfile::tempdir().unwrap();
        let targets = compiled(dist.path());
        let archives = archive_all(dist.path(), &targets).await.unwrap();

        let artifacts = write_digests(archives).await.unwrap();

        assert_eq!(artifacts.len(), 6);
        for artifact in artifacts {
            let content = std::fs::read_to_string(&artifact.sidecar).unwrap();
            let record = SidecarRecord::parse(&content).unwrap();
            assert_eq!(record.digest, artifact.digest);
            assert_eq!(record.file_name, artifact.archive.target.archive_file_name());
            assert!(content.ends_with('\n'));
        }
    }

    #[tokio::test]
    async fn missing_binary_fails() {
        let dist = tempfile::tempdir().unwrap();
        let target = ReleaseTarget::matrix("relkit").remove(0);
        assert!(archive_target(dist.path(), &target).await.is_err());
    }
}
