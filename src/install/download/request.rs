//! Release asset naming and URL resolution.

use std::fmt;

use crate::archive::ArchiveFormat;
use crate::checksum::SIDECAR_SUFFIX;
use crate::install::error::{InstallError, InstallResult};
use crate::platform::Target;

/// Which release to install.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Version {
    /// Whatever the release host currently marks as latest
    #[default]
    Latest,
    /// A specific release tag, used in the URL exactly as given
    Pinned(String),
}

impl Version {
    /// Parse a `-v` argument.
    ///
    /// `latest` (any case) selects the latest release. Anything else is a
    /// release tag and is kept verbatim, so `v1.2.3`, `1.2.3` and `1.0` each
    /// address their own tag. Tags must be a single URL path segment.
    pub fn parse(raw: &str) -> InstallResult<Self> {
        let tag = raw.trim();
        if tag.is_empty() {
            return Err(InstallError::InvalidInput(
                "release version must not be empty".to_string(),
            ));
        }
        if tag.eq_ignore_ascii_case("latest") {
            return Ok(Self::Latest);
        }
        if tag.contains(|c: char| matches!(c, '/' | '\\' | '?' | '#') || c.is_whitespace()) {
            return Err(InstallError::InvalidInput(format!(
                "'{tag}' is not a valid release tag"
            )));
        }
        Ok(Self::Pinned(tag.to_string()))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::Pinned(version) => f.write_str(version),
        }
    }
}

/// Resolved locations of one archive and its checksum sidecar.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DownloadRequest {
    pub version: Version,
    pub binary: String,
    pub target: Target,
    pub format: ArchiveFormat,
    pub archive_url: String,
    pub sidecar_url: String,
}

impl DownloadRequest {
    /// Build the request for `binary` on `target`.
    ///
    /// URL layout under `base_url`:
    ///
    /// - latest: `{base}/latest/download/{binary}-{target}.{ext}`
    /// - pinned: `{base}/download/{version}/{binary}-{target}.{ext}`
    ///
    /// The sidecar URL is the archive URL plus `.sha256sum`.
    pub fn new(
        base_url: &str,
        binary: &str,
        version: Version,
        target: Target,
        format: ArchiveFormat,
    ) -> Self {
        let base = base_url.trim_end_matches('/');
        let file_name = asset_file_name(binary, target, format);

        let archive_url = match &version {
            Version::Latest => format!("{base}/latest/download/{file_name}"),
            Version::Pinned(v) => format!("{base}/download/{v}/{file_name}"),
        };
        let sidecar_url = format!("{archive_url}{SIDECAR_SUFFIX}");

        Self {
            version,
            binary: binary.to_string(),
            target,
            format,
            archive_url,
            sidecar_url,
        }
    }

    /// `{binary}-{target}.{ext}`
    pub fn archive_file_name(&self) -> String {
        asset_file_name(&self.binary, self.target, self.format)
    }

    /// `{binary}-{target}.{ext}.sha256sum`
    pub fn sidecar_file_name(&self) -> String {
        format!("{}{SIDECAR_SUFFIX}", self.archive_file_name())
    }

    /// Name of the binary inside the archive, `{binary}-{target}`.
    pub fn packaged_binary_name(&self) -> String {
        format!("{}-{}", self.binary, self.target)
    }
}

fn asset_file_name(binary: &str, target: Target, format: ArchiveFormat) -> String {
    format!("{binary}-{target}.{}", format.extension())
}
