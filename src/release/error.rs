//! Release pipeline errors and their exit codes.

use thiserror::Error;

use crate::signal::ShutdownSignal;

/// Result type for the release pipeline
pub type ReleaseResult<T> = std::result::Result<T, ReleaseError>;

/// Everything that can stop a release.
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// Release attempted from a branch other than the release branch
    #[error("Releases must be made from '{expected}', currently on '{actual}'")]
    WrongBranch { expected: String, actual: String },

    /// Repository could not be opened or inspected
    #[error("Git error: {0}")]
    Git(String),

    /// Required program is not on `PATH`
    #[error("Required tool '{tool}' not found in PATH. {hint}")]
    MissingTool { tool: String, hint: String },

    /// Compile-matrix tool could not be installed automatically
    #[error("Failed to install '{tool}': {reason}")]
    ToolInstallFailed { tool: String, reason: String },

    /// Compile matrix finished without producing every expected binary
    #[error("Compile matrix did not produce: {}", .missing.join(", "))]
    MissingBinaries { missing: Vec<String> },

    /// Run was cut short by a signal
    #[error("Interrupted by {0}")]
    Interrupted(ShutdownSignal),

    /// Manifest, filesystem, archive or command failure
    #[error(transparent)]
    Other(#[from] crate::error::Error),
}

impl ReleaseError {
    /// Process exit status: 127 for the branch guard, the signal code when
    /// interrupted, 99 for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::WrongBranch { .. } => 127,
            Self::Interrupted(signal) => signal.exit_code(),
            _ => 99,
        }
    }
}

impl From<std::io::Error> for ReleaseError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(err.into())
    }
}
