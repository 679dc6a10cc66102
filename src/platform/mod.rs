//! Operating systems, architectures and target identifiers.
//!
//! All string-keyed platform dispatch is resolved here, once, into closed
//! enums. Downstream code matches on [`Os`] and [`Arch`] instead of comparing
//! strings.
//!
//! - [`Os`] / [`Arch`] - the release matrix axes
//! - [`Target`] / [`ReleaseTarget`] - `<os>-<arch>` identifiers and artifact names
//! - [`PlatformProfile`] - the installer's view of the host

mod arch;
mod os;
mod profile;
mod target;

pub use arch::Arch;
pub use os::Os;
pub use profile::{DigestTool, HostInfo, PlatformProfile};
pub use target::{ReleaseTarget, Target};

use thiserror::Error;

/// Platform values the toolkit cannot handle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// OS is not darwin or linux (or not a known OS at all)
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// Architecture is not x86_64 or i686
    #[error("Unsupported architecture: {0}")]
    UnsupportedArchitecture(String),

    /// File does not end in a known archive extension
    #[error("Unknown archive format: {0}")]
    UnknownArchiveFormat(String),
}
