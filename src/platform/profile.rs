//! Host platform detection for the installer.

use std::fmt;

use super::{Arch, Os, PlatformError, Target};
use crate::archive::ArchiveFormat;

/// Raw OS and architecture names as reported by the host.
///
/// Kept as strings until [`PlatformProfile::resolve`] so that detection and
/// interpretation are separate, and so tests can feed in any host.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HostInfo {
    pub os: String,
    pub arch: String,
}

impl HostInfo {
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// The host this process runs on.
    pub fn current() -> Self {
        Self::new(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// The current host with either half replaced.
    pub fn current_with(os: Option<&str>, arch: Option<&str>) -> Self {
        let current = Self::current();
        Self {
            os: os.map(str::to_string).unwrap_or(current.os),
            arch: arch.map(str::to_string).unwrap_or(current.arch),
        }
    }
}

/// SHA-256 command a given OS ships with.
///
/// Both compute the same digest; verification is done in-process, the tool
/// is only reported so log output matches what a user would run by hand.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DigestTool {
    /// `shasum -a 256` (macOS)
    Shasum,
    /// `sha256sum` (GNU coreutils)
    Sha256sum,
}

impl DigestTool {
    pub fn command_line(self) -> &'static str {
        match self {
            Self::Shasum => "shasum -a 256",
            Self::Sha256sum => "sha256sum",
        }
    }
}

impl fmt::Display for DigestTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command_line())
    }
}

/// Everything the install pipeline needs to know about the host, resolved once.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PlatformProfile {
    pub os: Os,
    pub arch: Arch,
    pub archive_format: ArchiveFormat,
    pub digest_tool: DigestTool,
}

impl PlatformProfile {
    /// Interpret raw host names.
    ///
    /// # Errors
    ///
    /// - [`PlatformError::UnsupportedPlatform`] for anything but Darwin or Linux
    /// - [`PlatformError::UnsupportedArchitecture`] for anything but x86_64 or i686
    pub fn resolve(host: &HostInfo) -> Result<Self, PlatformError> {
        let os: Os = host.os.parse()?;
        if !os.is_installable() {
            return Err(PlatformError::UnsupportedPlatform(host.os.clone()));
        }

        let arch: Arch = host.arch.parse()?;

        let digest_tool = match os {
            Os::Darwin => DigestTool::Shasum,
            Os::Linux | Os::Windows => DigestTool::Sha256sum,
        };

        Ok(Self {
            os,
            arch,
            archive_format: os.archive_format(),
            digest_tool,
        })
    }

    /// The target naming this host's artifacts.
    pub fn target(&self) -> Target {
        Target::new(self.os, self.arch)
    }

    /// Validate a user-supplied target string.
    ///
    /// The installer only fetches darwin and linux artifacts, so a windows
    /// target is rejected the same way a windows host is.
    pub fn parse_install_target(raw: &str) -> Result<Target, PlatformError> {
        let target: Target = raw.parse()?;
        if !target.os.is_installable() {
            return Err(PlatformError::UnsupportedPlatform(target.os.to_string()));
        }
        Ok(target)
    }
}
