//! Target identifiers shared by the release and install sides.

use std::fmt;
use std::str::FromStr;

use super::{Arch, Os, PlatformError};
use crate::archive::ArchiveFormat;

/// An `<os>-<arch>` pair such as `linux-amd64`.
///
/// This is the identifier that appears in every artifact name and download
/// URL, so both pipelines must agree on its spelling.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Target {
    pub os: Os,
    pub arch: Arch,
}

impl Target {
    pub fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Archive format for binaries built for this target.
    pub fn archive_format(&self) -> ArchiveFormat {
        self.os.archive_format()
    }
}

impl FromStr for Target {
    type Err = PlatformError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (os, arch) = raw
            .trim()
            .split_once('-')
            .ok_or_else(|| PlatformError::UnsupportedPlatform(raw.to_string()))?;

        Ok(Self {
            os: os.parse()?,
            arch: arch.parse()?,
        })
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

/// A binary produced by the compile matrix for one [`Target`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReleaseTarget {
    pub target: Target,
    pub binary: String,
}

impl ReleaseTarget {
    pub fn new(binary: impl Into<String>, target: Target) -> Self {
        Self {
            target,
            binary: binary.into(),
        }
    }

    /// The fixed release matrix: darwin/linux/windows × amd64/386.
    pub fn matrix(binary: &str) -> Vec<ReleaseTarget> {
        Os::ALL
            .iter()
            .flat_map(|&os| {
                Arch::ALL
                    .iter()
                    .map(move |&arch| ReleaseTarget::new(binary, Target::new(os, arch)))
            })
            .collect()
    }

    /// `<binary>-<os>-<arch>`, shared by the archive and the binary inside it.
    pub fn stem(&self) -> String {
        format!("{}-{}", self.binary, self.target)
    }

    /// File name of the raw compiled binary (`.exe` suffix on Windows).
    pub fn binary_file_name(&self) -> String {
        format!("{}{}", self.stem(), self.target.os.executable_suffix())
    }

    pub fn archive_format(&self) -> ArchiveFormat {
        self.target.archive_format()
    }

    /// File name of the compressed archive, e.g. `relkit-linux-386.tar.gz`.
    pub fn archive_file_name(&self) -> String {
        format!("{}.{}", self.stem(), self.archive_format().extension())
    }
}

impl fmt::Display for ReleaseTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.binary_file_name())
    }
}
