//! Verified download-and-install of a released binary.
//!
//! Stages run strictly in order: provision scratch directory, detect
//! platform, download archive and sidecar, verify, extract, install, smoke
//! test. The first failure ends the run; the scratch directory is removed on
//! every exit path.

pub mod binary;
pub mod config;
pub mod context;
pub mod download;
pub mod error;
pub mod verify;
pub mod workdir;

pub use binary::PostInstallWarning;
pub use config::InstallConfig;
pub use context::InstallOutcome;
pub use download::{DownloadRequest, Fetch, FetchChain, Version};
pub use error::{InstallError, InstallResult};
pub use workdir::WorkDir;

use crate::cli::OutputManager;
use context::Provisioned;

/// Runs the install pipeline for one configuration.
#[derive(Debug)]
pub struct Installer {
    config: InstallConfig,
    fetchers: FetchChain,
    output: OutputManager,
}

impl Installer {
    pub fn new(config: InstallConfig, fetchers: FetchChain, output: OutputManager) -> Self {
        Self {
            config,
            fetchers,
            output,
        }
    }

    /// Installer using the built-in HTTP client with `curl` as fallback.
    pub fn with_default_fetchers(
        config: InstallConfig,
        output: OutputManager,
    ) -> InstallResult<Self> {
        let fetchers = FetchChain::with_defaults()?;
        log::debug!("Download clients: {}", fetchers.names().join(", "));
        Ok(Self::new(config, fetchers, output))
    }

    pub fn config(&self) -> &InstallConfig {
        &self.config
    }

    /// Run every stage and return what was installed.
    pub async fn run(&self) -> InstallResult<InstallOutcome> {
        let provisioned = Provisioned::new(&self.config)?;

        let resolved = provisioned.detect_platform()?;
        let _ = self.output.progress(&format!(
            "Downloading {} ({})",
            resolved.request.archive_file_name(),
            resolved.request.version
        ));

        let downloaded = resolved.download(&self.fetchers).await?;
        let _ = self.output.verbose(&format!(
            "   Saved {}",
            downloaded.artifacts.archive.display()
        ));

        let verified = downloaded.verify().await?;
        let _ = self.output.success(&format!("Checksum verified ({})", verified.digest));

        let extracted = verified.extract().await?;
        let installed = extracted.install().await?;
        let _ = self
            .output
            .success(&format!("Installed {}", installed.installed_path.display()));

        Ok(installed.finish().await)
    }
}
