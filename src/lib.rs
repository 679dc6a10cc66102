//! Release packaging and verified installation for cross-compiled programs.
//!
//! Two pipelines share this library:
//! - [`release`] builds a program for every supported OS/architecture pair,
//!   archives each binary with a SHA-256 sidecar, and tags the release
//! - [`install`] downloads the archive for the current host, verifies it
//!   against its sidecar, and installs the binary
//!
//! Both are driven by thin binaries (`relkit-release`, `relkit-install`) and
//! can be used as a library dependency.

pub mod archive;
pub mod checksum;
pub mod cli;
pub mod error;
pub mod install;
pub mod metadata;
pub mod platform;
pub mod release;
pub mod signal;
pub mod utils;

// Re-export commonly used types
pub use error::{Error, Result};
pub use install::{InstallConfig, InstallError, Installer};
pub use release::{ReleaseConfig, ReleaseError, Releaser};
