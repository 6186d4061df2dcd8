//! Error types for homelab-probe

use std::time::Duration;

use thiserror::Error;

/// Why a single reachability probe failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// No answer within the probe timeout
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The tool needed for the probe is missing on this host
    #[error("{0} command not available")]
    Unavailable(String),

    /// The probe ran and reported failure
    #[error("{0}")]
    Failed(String),

    /// TCP connection could not be established
    #[error("{0}")]
    Connect(String),

    /// Name resolution failed
    #[error("{0}")]
    Resolve(String),
}
