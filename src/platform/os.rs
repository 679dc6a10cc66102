//! Operating system identifiers.

use std::fmt;
use std::str::FromStr;

use super::PlatformError;
use crate::archive::ArchiveFormat;

/// Operating systems the release matrix builds for.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Os {
    /// macOS, named `darwin` in artifact names
    Darwin,
    /// Linux
    Linux,
    /// Windows (release only; the installer has no Windows path)
    Windows,
}

impl Os {
    /// Every operating system in the release matrix, in build order.
    pub const ALL: [Os; 3] = [Os::Darwin, Os::Linux, Os::Windows];

    /// Canonical lowercase name used in artifact names and URLs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Darwin => "darwin",
            Self::Linux => "linux",
            Self::Windows => "windows",
        }
    }

    /// Archive format used for binaries of this OS.
    ///
    /// Linux archives are gzipped tarballs, everything else is zipped.
    pub fn archive_format(self) -> ArchiveFormat {
        match self {
            Self::Linux => ArchiveFormat::TarGz,
            Self::Darwin | Self::Windows => ArchiveFormat::Zip,
        }
    }

    /// Suffix appended to executable file names (`.exe` on Windows).
    pub fn executable_suffix(self) -> &'static str {
        match self {
            Self::Windows => ".exe",
            Self::Darwin | Self::Linux => "",
        }
    }

    /// Whether the installer supports this OS.
    pub fn is_installable(self) -> bool {
        matches!(self, Self::Darwin | Self::Linux)
    }
}

impl FromStr for Os {
    type Err = PlatformError;

    /// Parses `uname -s` style values as well as Rust's `std::env::consts::OS`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "darwin" | "macos" => Ok(Self::Darwin),
            "linux" => Ok(Self::Linux),
            "windows" => Ok(Self::Windows),
            _ => Err(PlatformError::UnsupportedPlatform(raw.to_string())),
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uname_values_are_case_normalized() {
        assert_eq!("Darwin".parse::<Os>(), Ok(Os::Darwin));
        assert_eq!("Linux".parse::<Os>(), Ok(Os::Linux));
        assert_eq!("macos".parse::<Os>(), Ok(Os::Darwin));
    }

    #[test]
    fn unknown_os_is_unsupported() {
        assert_eq!(
            "FreeBSD".parse::<Os>(),
            Err(PlatformError::UnsupportedPlatform("FreeBSD".to_string()))
        );
    }

    #[test]
    fn only_linux_uses_tarballs() {
        assert_eq!(Os::Linux.archive_format(), ArchiveFormat::TarGz);
        assert_eq!(Os::Darwin.archive_format(), ArchiveFormat::Zip);
        assert_eq!(Os::Windows.archive_format(), ArchiveFormat::Zip);
    }

    #[test]
    fn windows_is_not_installable() {
        assert!(Os::Darwin.is_installable());
        assert!(Os::Linux.is_installable());
        assert!(!Os::Windows.is_installable());
    }
}
