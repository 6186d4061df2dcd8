//! Inspection result types

use serde::{Deserialize, Serialize};

/// Operating system identity of the local host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsInfo {
    /// Distribution ID (`ubuntu`, `debian`) or platform name as fallback
    pub family: String,
    /// Distribution version, or kernel release as fallback
    pub version: String,
}

/// Virtualization detection outcome
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualizationInfo {
    pub is_virtualized: bool,
    /// Hypervisor type (`kvm`, `vmware`), when known
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Free-form DMI product/vendor string
    pub hint: Option<String>,
}

impl VirtualizationInfo {
    /// Virtualization positively identified by type
    pub fn detected(kind: impl Into<String>) -> Self {
        Self {
            is_virtualized: true,
            kind: Some(kind.into()),
            hint: None,
        }
    }
}

/// A local network interface and its addresses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceInfo {
    pub name: String,
    /// IPv4 and IPv6 addresses without prefix length
    pub addresses: Vec<String>,
}
