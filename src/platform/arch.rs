//! CPU architecture types and utilities.

use std::fmt;
use std::str::FromStr;

use super::PlatformError;

/// CPU architecture for release binaries.
///
/// Only the two architectures the compile matrix produces are representable.
/// Host names reported by the kernel are normalized on parse:
///
/// - `x86_64` / `amd64` → [`Arch::Amd64`]
/// - `i686` / `i386` / `x86` / `386` → [`Arch::X86`]
///
/// Parsing an already canonical name returns the same variant, so
/// normalization is idempotent.
///
/// # Examples
///
/// ```
/// use relkit::platform::Arch;
///
/// let arch: Arch = "x86_64".parse()?;
/// assert_eq!(arch, Arch::Amd64);
/// assert_eq!(arch.as_str(), "amd64");
/// # Ok::<(), relkit::platform::PlatformError>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Arch {
    /// x86_64 / AMD64 (64-bit)
    Amd64,
    /// x86 / i686 (32-bit), named `386` in artifact names
    X86,
}

impl Arch {
    /// Every architecture in the release matrix, in build order.
    pub const ALL: [Arch; 2] = [Arch::Amd64, Arch::X86];

    /// Canonical name used in artifact names and URLs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Amd64 => "amd64",
            Self::X86 => "386",
        }
    }
}

impl FromStr for Arch {
    type Err = PlatformError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "x86_64" | "amd64" => Ok(Self::Amd64),
            "i686" | "i386" | "x86" | "386" => Ok(Self::X86),
            _ => Err(PlatformError::UnsupportedArchitecture(raw.to_string())),
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
