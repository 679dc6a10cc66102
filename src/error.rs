//! Shared error plumbing for release and install operations.
//!
//! Pipeline-level errors ([`crate::install::InstallError`] and
//! [`crate::release::ReleaseError`]) wrap this type for everything that is not
//! one of their own named failure modes.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for library operations
pub type Result<T> = std::result::Result<T, Error>;

/// Low-level error type for filesystem, process, archive and HTTP work
#[derive(Error, Debug)]
pub enum Error {
    /// IO error with the operation and path that failed
    #[error("{context} ({path}): {source}")]
    Fs {
        /// What was being done, e.g. "creating install directory"
        context: String,
        /// Path the operation touched
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// IO error without path context
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// External command could not be spawned or exited unsuccessfully
    #[error("Command execution failed: {command} - {reason}")]
    CommandFailed {
        /// Command line that failed
        command: String,
        /// Reason for the failure (stderr or spawn error)
        reason: String,
    },

    /// HTTP transport or status error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Path prefix error while walking archive entries
    #[error("Path error: {0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// Background task panicked or was cancelled
    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// Anything else
    #[error("{0}")]
    GenericError(String),
}

/// Return early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::error::Error::GenericError(format!($($arg)*)).into())
    };
}

/// Attach filesystem context to IO results.
pub trait ErrorExt<T> {
    /// Wrap an IO error with the operation and the path it touched.
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| Error::Fs {
            context: context.to_string(),
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

/// Turn an `Option` or foreign error into a [`Error::GenericError`] with a message.
pub trait Context<T> {
    /// Attach a message describing what was expected.
    fn context(self, message: &str) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context(self, message: &str) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(message.to_string()))
    }
}

impl<T, E: std::fmt::Display> Context<T> for std::result::Result<T, E> {
    fn context(self, message: &str) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{message}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_context_keeps_path_and_operation() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));

        let err = result
            .fs_context("opening archive", "/tmp/relkit.tar.gz")
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("opening archive"));
        assert!(message.contains("/tmp/relkit.tar.gz"));
        assert!(message.contains("missing"));
    }

    #[test]
    fn option_context_produces_generic_error() {
        let value: Option<u8> = None;
        let err = value.context("binary name is required").unwrap_err();
        assert!(matches!(err, Error::GenericError(ref m) if m == "binary name is required"));
    }

    fn bails() -> Result<()> {
        bail!("stage {} failed", 3)
    }

    #[test]
    fn bail_macro_returns_generic_error() {
        let err = bails().unwrap_err();
        assert_eq!(err.to_string(), "stage 3 failed");
    }
}
