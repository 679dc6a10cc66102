//! Install pipeline errors and their exit codes.

use std::path::PathBuf;

use thiserror::Error;

use crate::platform::PlatformError;
use crate::signal::ShutdownSignal;

/// Result type for the install pipeline
pub type InstallResult<T> = std::result::Result<T, InstallError>;

/// Everything that can end an install run early.
#[derive(Error, Debug)]
pub enum InstallError {
    /// Invalid `-v` version or base URL
    #[error("Invalid argument: {0}")]
    InvalidInput(String),

    /// Host or requested target is not installable
    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// Every fetch strategy failed for one file
    #[error("Unable to download {url}: {}", .attempts.join("; "))]
    DownloadUnavailable {
        /// URL that could not be fetched
        url: String,
        /// One entry per strategy tried, `<name>: <reason>`
        attempts: Vec<String>,
    },

    /// Archive digest differs from its sidecar
    #[error("Checksum mismatch for {}: expected {expected}, got {actual}", .file.display())]
    ChecksumMismatch {
        /// Archive that failed verification
        file: PathBuf,
        /// Digest recorded in the sidecar
        expected: String,
        /// Digest of the downloaded bytes
        actual: String,
    },

    /// Sidecar does not hold a digest for the downloaded archive
    #[error("Invalid checksum file {}: {reason}", .path.display())]
    MalformedSidecar {
        /// Sidecar path
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },

    /// Run was cut short by a signal
    #[error("Interrupted by {0}")]
    Interrupted(ShutdownSignal),

    /// Filesystem, archive or process failure
    #[error(transparent)]
    Other(#[from] crate::error::Error),
}

impl InstallError {
    /// Process exit status for this failure.
    ///
    /// | code | meaning |
    /// |------|---------|
    /// | 1 | invalid argument |
    /// | 2 | unsupported OS |
    /// | 3 | unsupported architecture |
    /// | 4 | unknown archive format |
    /// | 6 | no download client succeeded |
    /// | 99 | anything else (integrity, I/O) |
    /// | 130/143 | interrupted |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidInput(_) => 1,
            Self::Platform(PlatformError::UnsupportedPlatform(_)) => 2,
            Self::Platform(PlatformError::UnsupportedArchitecture(_)) => 3,
            Self::Platform(PlatformError::UnknownArchiveFormat(_)) => 4,
            Self::DownloadUnavailable { .. } => 6,
            Self::Interrupted(signal) => signal.exit_code(),
            Self::ChecksumMismatch { .. } | Self::MalformedSidecar { .. } | Self::Other(_) => 99,
        }
    }

    /// True for failures caused by the downloaded bytes themselves.
    pub fn is_integrity_error(&self) -> bool {
        matches!(self, Self::ChecksumMismatch { .. } | Self::MalformedSidecar { .. })
    }
}

impl From<std::io::Error> for InstallError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_errors_map_to_distinct_codes() {
        let os = InstallError::from(PlatformError::UnsupportedPlatform("FreeBSD".into()));
        let arch = InstallError::from(PlatformError::UnsupportedArchitecture("armv7".into()));
        let format = InstallError::from(PlatformError::UnknownArchiveFormat("x.rar".into()));
        assert_eq!(os.exit_code(), 2);
        assert_eq!(arch.exit_code(), 3);
        assert_eq!(format.exit_code(), 4);
    }

    #[test]
    fn download_and_integrity_codes() {
        let unavailable = InstallError::DownloadUnavailable {
            url: "https://example.invalid/a.zip".into(),
            attempts: vec!["http: 404".into(), "curl: not found".into()],
        };
        assert_eq!(unavailable.exit_code(), 6);
        assert!(unavailable.to_string().contains("http: 404; curl: not found"));

        let mismatch = InstallError::ChecksumMismatch {
            file: PathBuf::from("a.zip"),
            expected: "00".into(),
            actual: "11".into(),
        };
        assert_eq!(mismatch.exit_code(), 99);
        assert!(mismatch.is_integrity_error());
    }

    #[test]
    fn interruption_uses_signal_code() {
        assert_eq!(InstallError::Interrupted(ShutdownSignal::Interrupt).exit_code(), 130);
        assert_eq!(InstallError::Interrupted(ShutdownSignal::Terminate).exit_code(), 143);
    }

    #[test]
    fn invalid_input_is_usage_error() {
        assert_eq!(InstallError::InvalidInput("bad version".into()).exit_code(), 1);
    }
}
