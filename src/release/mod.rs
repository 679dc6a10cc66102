//! Cross-compiled release of a command-line program.
//!
//! A release runs these stages in order, stopping at the first failure:
//!
//! 1. Branch guard: HEAD must be the release branch
//! 2. Tool check: `git` present, compile-matrix tool present or installed
//! 3. Compile matrix: {darwin, linux, windows} x {amd64, 386}
//! 4. Archive: `.tar.gz` for linux, `.zip` otherwise; raw binaries removed
//! 5. Digest: a `.sha256sum` sidecar per archive
//! 6. Tag: annotated tag named after the version, pushed to the remote

pub mod branch;
pub mod compile;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod package;
pub mod tag;
pub mod tool_detection;

pub use config::{ReleaseConfig, ReleaseOverrides};
pub use error::{ReleaseError, ReleaseResult};
pub use orchestrator::{ReleaseReport, Releaser};
pub use package::{ArchiveDescriptor, PackagedArtifact};
