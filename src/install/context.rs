//! Install pipeline stages.
//!
//! Each stage consumes the previous context and returns the next one, so a
//! later stage can only run with everything the earlier ones produced. The
//! [`WorkDir`] travels through every stage and is dropped with the last one.

use std::path::PathBuf;
use std::sync::atomic::Ordering;

use super::binary::{PostInstallWarning, install_binary, smoke_test};
use super::config::InstallConfig;
use super::download::{DownloadRequest, DownloadedArtifacts, FetchChain, Version, download_artifacts};
use super::error::{InstallError, InstallResult};
use super::verify::verify_archive;
use super::workdir::WorkDir;
use crate::archive::{ArchiveFormat, extract_archive_cancellable};
use crate::error::{Error, ErrorExt};
use crate::platform::{PlatformProfile, Target};
use crate::signal::CancelOnDrop;

/// Scratch directory exists, nothing else has happened.
#[derive(Debug)]
pub struct Provisioned<'a> {
    pub config: &'a InstallConfig,
    pub workdir: WorkDir,
}

impl<'a> Provisioned<'a> {
    pub fn new(config: &'a InstallConfig) -> InstallResult<Self> {
        let workdir = WorkDir::create(config.scratch_parent.as_deref())?;
        Ok(Self { config, workdir })
    }

    /// Resolve the host profile and the artifact to fetch.
    ///
    /// Archive format and digest tool always come from the host; `-t` only
    /// changes the target named in the artifact.
    pub fn detect_platform(self) -> InstallResult<PlatformResolved<'a>> {
        let profile = PlatformProfile::resolve(&self.config.host)?;
        let target = match &self.config.target_override {
            Some(raw) => PlatformProfile::parse_install_target(raw)?,
            None => profile.target(),
        };

        log::info!(
            "Platform: {} ({}, verified with {})",
            target,
            profile.archive_format,
            profile.digest_tool
        );

        let request = DownloadRequest::new(
            &self.config.base_url,
            &self.config.binary,
            self.config.version.clone(),
            target,
            profile.archive_format,
        );

        Ok(PlatformResolved {
            provisioned: self,
            profile,
            request,
        })
    }
}

/// Host profile and download locations are known.
#[derive(Debug)]
pub struct PlatformResolved<'a> {
    pub provisioned: Provisioned<'a>,
    pub profile: PlatformProfile,
    pub request: DownloadRequest,
}

impl<'a> PlatformResolved<'a> {
    pub async fn download(self, fetchers: &FetchChain) -> InstallResult<Downloaded<'a>> {
        let workdir = &self.provisioned.workdir;
        let staging = workdir.staging_dir();
        tokio::fs::create_dir_all(&staging)
            .await
            .fs_context("creating staging directory", &staging)?;

        let artifacts = download_artifacts(
            fetchers,
            &self.request,
            &staging,
            &self.provisioned.config.download_dir,
        )
        .await?;

        Ok(Downloaded {
            resolved: self,
            artifacts,
        })
    }
}

/// Archive and sidecar are in the download directory.
#[derive(Debug)]
pub struct Downloaded<'a> {
    pub resolved: PlatformResolved<'a>,
    pub artifacts: DownloadedArtifacts,
}

impl<'a> Downloaded<'a> {
    pub async fn verify(self) -> InstallResult<Verified<'a>> {
        let digest = verify_archive(&self.artifacts.archive, &self.artifacts.sidecar).await?;
        log::info!("Checksum verified: {digest}");
        Ok(Verified {
            downloaded: self,
            digest,
        })
    }
}

/// Archive matches its sidecar.
#[derive(Debug)]
pub struct Verified<'a> {
    pub downloaded: Downloaded<'a>,
    pub digest: String,
}

impl<'a> Verified<'a> {
    pub async fn extract(self) -> InstallResult<Extracted<'a>> {
        let archive = self.downloaded.artifacts.archive.clone();
        let file_name = archive
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let format = ArchiveFormat::from_file_name(&file_name)?;

        let dest = self.workdir().extract_dir();
        let extract_dest = dest.clone();
        let scratch = self.workdir().path().to_path_buf();
        let guard = CancelOnDrop::new();
        let cancel = guard.flag();
        tokio::task::spawn_blocking(move || {
            let result = extract_archive_cancellable(&archive, format, &extract_dest, &cancel);
            // The scratch directory may already be gone; anything recreated
            // by the last entry goes with it.
            if cancel.load(Ordering::SeqCst) {
                let _ = std::fs::remove_dir_all(&scratch);
            }
            result
        })
        .await
        .map_err(Error::from)??;
        drop(guard);

        let binary = dest.join(self.downloaded.resolved.request.packaged_binary_name());
        let is_regular_file = std::fs::symlink_metadata(&binary)
            .is_ok_and(|metadata| metadata.file_type().is_file());
        if !is_regular_file {
            return Err(InstallError::Other(Error::GenericError(format!(
                "{} does not contain {}",
                file_name,
                self.downloaded.resolved.request.packaged_binary_name()
            ))));
        }

        Ok(Extracted {
            verified: self,
            binary,
        })
    }

    fn workdir(&self) -> &WorkDir {
        &self.downloaded.resolved.provisioned.workdir
    }
}

/// Binary is unpacked inside the scratch directory.
#[derive(Debug)]
pub struct Extracted<'a> {
    pub verified: Verified<'a>,
    pub binary: PathBuf,
}

impl<'a> Extracted<'a> {
    pub async fn install(self) -> InstallResult<Installed<'a>> {
        let config = self.config();
        let installed_path =
            install_binary(&self.binary, &config.install_dir, &config.binary).await?;
        Ok(Installed {
            extracted: self,
            installed_path,
        })
    }

    fn config(&self) -> &'a InstallConfig {
        self.verified.downloaded.resolved.provisioned.config
    }
}

/// Binary is in the install directory.
#[derive(Debug)]
pub struct Installed<'a> {
    pub extracted: Extracted<'a>,
    pub installed_path: PathBuf,
}

impl Installed<'_> {
    /// Run the smoke test and release the scratch directory.
    pub async fn finish(self) -> InstallOutcome {
        let config = self.extracted.config();
        let warning = smoke_test(&self.installed_path, &config.version_arg).await;

        let verified = self.extracted.verified;
        let downloaded = verified.downloaded;
        let request = downloaded.resolved.request;

        InstallOutcome {
            version: request.version,
            target: request.target,
            archive: downloaded.artifacts.archive,
            digest: verified.digest,
            installed_path: self.installed_path,
            warning,
        }
    }
}

/// Summary of a completed install.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InstallOutcome {
    pub version: Version,
    pub target: Target,
    pub archive: PathBuf,
    pub digest: String,
    pub installed_path: PathBuf,
    /// Set when the smoke test failed
    pub warning: Option<PostInstallWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{HostInfo, PlatformError};

    fn config(os: &str, arch: &str, scratch: &std::path::Path) -> InstallConfig {
        InstallConfig {
            host: HostInfo::new(os, arch),
            scratch_parent: Some(scratch.to_path_buf()),
            ..InstallConfig::new()
        }
    }

    #[test]
    fn override_names_artifact_but_host_picks_format() {
        let scratch = tempfile::tempdir().unwrap();
        let config = InstallConfig {
            target_override: Some("darwin-386".to_string()),
            ..config("Linux", "x86_64", scratch.path())
        };

        let resolved = Provisioned::new(&config).unwrap().detect_platform().unwrap();

        assert_eq!(resolved.request.target.to_string(), "darwin-386");
        assert_eq!(resolved.request.format, ArchiveFormat::TarGz);
        assert!(
            resolved
                .request
                .archive_url
                .ends_with("/latest/download/relkit-darwin-386.tar.gz")
        );
    }

    #[test]
    fn invalid_override_fails_before_download() {
        let scratch = tempfile::tempdir().unwrap();
        let config = InstallConfig {
            target_override: Some("linux-armv7".to_string()),
            ..config("Linux", "x86_64", scratch.path())
        };

        let err = Provisioned::new(&config).unwrap().detect_platform().unwrap_err();
        assert!(matches!(
            err,
            InstallError::Platform(PlatformError::UnsupportedArchitecture(_))
        ));
        assert_eq!(err.exit_code(), 3);
        assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
    }
}
