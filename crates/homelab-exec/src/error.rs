//! Error types for homelab-exec

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while running a local command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    /// The program is not installed or not on `PATH`
    #[error("{0} command not available")]
    NotFound(String),

    /// Permission denied when starting the program
    #[error("permission denied running {0}")]
    PermissionDenied(String),

    /// Process spawn error
    #[error("failed to spawn process: {0}")]
    SpawnError(String),

    /// Command timed out
    #[error("command timed out after {timeout:?}")]
    Timeout {
        /// Timeout duration that was exceeded
        timeout: Duration,
    },

    /// I/O error while collecting output
    #[error("I/O error: {0}")]
    IoError(String),
}

impl ExecError {
    /// Whether the error means the tool itself is unusable on this host
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            ExecError::NotFound(_) | ExecError::PermissionDenied(_)
        )
    }
}
