//! Inventory entity types
//!
//! All entities are built once by the loader and never mutated afterwards.

use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;

use ipnet::IpNet;
use serde::Serialize;

use crate::checks::VmChecks;

/// General environment metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Environment {
    pub name: String,
    pub domain: String,
    pub description: String,
}

/// A declared network segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Network {
    /// Network name (key in the `networks` mapping)
    pub name: String,
    /// Network address with host bits cleared
    pub cidr: IpNet,
    /// Default gateway
    pub gateway: IpAddr,
    /// Bridge interface the network is attached to, if any
    pub bridge: Option<String>,
    /// DNS servers in declaration order
    pub dns_servers: Vec<IpAddr>,
    /// Expected hostname to IP mapping
    pub expected_hosts: BTreeMap<String, IpAddr>,
}

impl Network {
    /// Whether `addr` falls inside this network
    #[must_use]
    pub fn contains(&self, addr: &IpAddr) -> bool {
        self.cidr.contains(addr)
    }
}

/// Host flavour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum MachineType {
    #[default]
    #[serde(rename = "vm")]
    Vm,
    #[serde(rename = "bare-metal")]
    BareMetal,
}

impl MachineType {
    /// Parse the inventory spelling (`vm` or `bare-metal`)
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "vm" => Some(MachineType::Vm),
            "bare-metal" => Some(MachineType::BareMetal),
            _ => None,
        }
    }
}

impl fmt::Display for MachineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MachineType::Vm => write!(f, "vm"),
            MachineType::BareMetal => write!(f, "bare-metal"),
        }
    }
}

/// Attachment of a VM to a declared network
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VmNetwork {
    /// Name of a network declared under `networks`
    pub name: String,
    pub ip: IpAddr,
}

/// VM or bare-metal host definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VmDefinition {
    pub name: String,
    pub hostname: String,
    pub role: String,
    /// OS family, from the VM or `defaults.vm.os_family`
    pub os_family: String,
    /// OS version, from the VM or `defaults.vm.os_version`
    pub os_version: Option<String>,
    pub machine_type: MachineType,
    /// Network attachments in declaration order, never empty once loaded
    pub networks: Vec<VmNetwork>,
    /// Checks merged with `defaults.vm`
    pub checks: VmChecks,
}

impl VmDefinition {
    /// IP of the first network attachment, used for all reachability probes
    #[must_use]
    pub fn primary_ip(&self) -> Option<IpAddr> {
        self.networks.first().map(|attachment| attachment.ip)
    }
}

/// Global fallbacks applied to every VM
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Defaults {
    pub vm_checks: VmChecks,
    pub vm_os_family: Option<String>,
    pub vm_os_version: Option<String>,
}

/// Validated inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootConfig {
    pub environment: Environment,
    /// Networks keyed by name
    pub networks: BTreeMap<String, Network>,
    /// VMs in declaration order
    pub vms: Vec<VmDefinition>,
    pub defaults: Defaults,
}

impl RootConfig {
    /// Look up a network by name
    #[must_use]
    pub fn network(&self, name: &str) -> Option<&Network> {
        self.networks.get(name)
    }
}
