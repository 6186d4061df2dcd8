//! Error types for homelab-config

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating the inventory file
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file does not exist
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Config path is a directory
    #[error("Config path points to a directory, expected a file: {}", .0.display())]
    IsDirectory(PathBuf),

    /// Config file is empty or whitespace only
    #[error("Config file is empty")]
    Empty,

    /// Config file exists but could not be read
    #[error("Failed to read config file {}: {reason}", .path.display())]
    Read {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O error
        reason: String,
    },

    /// YAML syntax error
    #[error("Failed to parse YAML: {0}")]
    Parse(String),

    /// Document root is not a mapping
    #[error("Root of config must be a mapping")]
    RootNotMapping,

    /// Structural or semantic violation at a field path
    #[error("{field} {problem}")]
    Invalid {
        /// Dotted field path, e.g. `networks.lan.gateway`
        field: String,
        /// What is wrong with it
        problem: String,
    },
}

impl ConfigError {
    /// Create an `Invalid` error for a field path
    pub fn invalid(field: impl Into<String>, problem: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            problem: problem.into(),
        }
    }

    /// Field path of an `Invalid` error
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigError::Invalid { field, .. } => Some(field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_message_leads_with_field_path() {
        let err = ConfigError::invalid("networks.lan.gateway", "must be a valid IP address");
        assert_eq!(
            err.to_string(),
            "networks.lan.gateway must be a valid IP address"
        );
        assert_eq!(err.field(), Some("networks.lan.gateway"));
        assert_eq!(ConfigError::Empty.field(), None);
    }
}
