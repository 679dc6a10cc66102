//! Install run settings.

use std::path::PathBuf;

use path_absolutize::Absolutize;

use super::download::Version;
use super::error::{InstallError, InstallResult};
use crate::platform::HostInfo;

/// Program installed when `--binary` is not given.
pub const DEFAULT_BINARY: &str = "relkit";

/// Release host when `--base-url` is not given.
pub const DEFAULT_BASE_URL: &str = "https://github.com/relkit/relkit/releases";

/// Install directory when `--install-dir` is not given.
pub const DEFAULT_INSTALL_DIR: &str = "/usr/local/bin";

/// Argument passed to the installed binary as a smoke test.
pub const DEFAULT_VERSION_ARG: &str = "--version";

/// Everything one install run needs, validated.
#[derive(Clone, Debug)]
pub struct InstallConfig {
    /// Program name; artifacts are `{binary}-{os}-{arch}.{ext}`
    pub binary: String,
    pub version: Version,
    /// Raw `-t` value, validated during platform detection
    pub target_override: Option<String>,
    pub host: HostInfo,
    /// Releases base URL without trailing slash
    pub base_url: String,
    pub install_dir: PathBuf,
    /// Where the archive and sidecar are kept
    pub download_dir: PathBuf,
    /// Parent of the scratch directory, system temp dir if `None`
    pub scratch_parent: Option<PathBuf>,
    pub version_arg: String,
}

impl InstallConfig {
    /// Defaults for the current host.
    pub fn new() -> Self {
        Self {
            binary: DEFAULT_BINARY.to_string(),
            version: Version::Latest,
            target_override: None,
            host: HostInfo::current(),
            base_url: DEFAULT_BASE_URL.to_string(),
            install_dir: PathBuf::from(DEFAULT_INSTALL_DIR),
            download_dir: PathBuf::from("."),
            scratch_parent: None,
            version_arg: DEFAULT_VERSION_ARG.to_string(),
        }
    }

    /// Check names and make directories absolute.
    pub fn validated(mut self) -> InstallResult<Self> {
        if self.binary.is_empty()
            || self.binary.contains(['/', '\\'])
            || self.binary.starts_with('.')
        {
            return Err(InstallError::InvalidInput(format!(
                "'{}' is not a valid program name",
                self.binary
            )));
        }

        self.base_url = normalize_base_url(&self.base_url)?;
        self.install_dir = absolutize(&self.install_dir)?;
        self.download_dir = absolutize(&self.download_dir)?;
        Ok(self)
    }
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate a releases base URL and drop trailing slashes.
pub fn normalize_base_url(raw: &str) -> InstallResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = url::Url::parse(trimmed)
        .map_err(|e| InstallError::InvalidInput(format!("'{raw}' is not a valid URL: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(InstallError::InvalidInput(format!(
            "'{raw}' cannot be used as a base URL"
        )));
    }
    Ok(trimmed.to_string())
}

fn absolutize(path: &std::path::Path) -> InstallResult<PathBuf> {
    Ok(path.absolutize()?.into_owned())
}
