//! Collaborator traits consumed by the diagnostics
//!
//! One method per capability so tests can substitute any of them.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ProbeError;
use crate::types::{InterfaceInfo, OsInfo, VirtualizationInfo};

/// Outcome of a single reachability probe
pub type ProbeResult = Result<(), ProbeError>;

/// Read-only view of the local host
///
/// Implementations never fail: unavailable sources yield empty or unknown
/// values.
#[async_trait]
pub trait HostInspector: Send + Sync {
    async fn os_info(&self) -> OsInfo;

    async fn virtualization(&self) -> VirtualizationInfo;

    async fn interfaces(&self) -> Vec<InterfaceInfo>;

    /// Routing table, one route per line
    async fn routes(&self) -> Vec<String>;

    /// Configured resolver addresses
    async fn dns_servers(&self) -> Vec<String>;
}

/// Network reachability probes, each bounded by its own timeout
#[async_trait]
pub trait Reachability: Send + Sync {
    /// One ICMP echo request
    async fn ping(&self, ip: IpAddr, timeout: Duration) -> ProbeResult;

    /// TCP connect to `ip:port`
    async fn tcp_connect(&self, ip: IpAddr, port: u16, timeout: Duration) -> ProbeResult;

    /// Resolve `hostname` to at least one address
    async fn resolve(&self, hostname: &str, timeout: Duration) -> ProbeResult;

    /// TCP connect to a host given by name or address
    async fn connect_external(&self, host: &str, port: u16, timeout: Duration) -> ProbeResult;
}
