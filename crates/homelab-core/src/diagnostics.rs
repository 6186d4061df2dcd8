//! The three diagnostic flows: `env`, `vms` and `net`
//!
//! Flows run strictly sequentially; each probe's outcome is consumed before
//! the next one starts.

use std::collections::{BTreeMap, BTreeSet};
use std::net::IpAddr;
use std::time::Duration;

use homelab_config::{Network, RootConfig, VmDefinition};
use homelab_probe::{HostInspector, InterfaceInfo, Reachability};
use tracing::{debug, info, instrument};

use crate::health::{HealthStatus, VmProbeResults, evaluate};
use crate::report::{EnvReport, EnvironmentSummary, HostSummary, NetReport, VmsReport};

const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Run-time switches for `vms`
#[derive(Debug, Clone)]
pub struct VmsOptions {
    /// Only check VMs with these names (case-insensitive); empty means all
    pub names: Vec<String>,
    pub skip_ping: bool,
    pub skip_ssh: bool,
    /// Timeout for each individual probe
    pub probe_timeout: Duration,
}

impl Default for VmsOptions {
    fn default() -> Self {
        Self {
            names: Vec::new(),
            skip_ping: false,
            skip_ssh: false,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

/// Run-time switches for `net`
#[derive(Debug, Clone)]
pub struct NetOptions {
    pub skip_dns: bool,
    pub external_host: String,
    pub external_port: u16,
    /// Timeout for each lookup and connect
    pub probe_timeout: Duration,
}

impl Default for NetOptions {
    fn default() -> Self {
        Self {
            skip_dns: false,
            external_host: "1.1.1.1".to_string(),
            external_port: 443,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

/// Builds reports from an inventory and the live-system collaborators
pub struct Diagnostics<'a> {
    config: &'a RootConfig,
    inspector: &'a dyn HostInspector,
    prober: &'a dyn Reachability,
}

impl<'a> Diagnostics<'a> {
    pub fn new(
        config: &'a RootConfig,
        inspector: &'a dyn HostInspector,
        prober: &'a dyn Reachability,
    ) -> Self {
        Self {
            config,
            inspector,
            prober,
        }
    }

    /// Environment metadata merged with local OS and virtualization details
    #[instrument(skip(self))]
    pub async fn env_report(&self) -> EnvReport {
        let os = self.inspector.os_info().await;
        let virt = self.inspector.virtualization().await;

        EnvReport {
            environment: EnvironmentSummary::from(&self.config.environment),
            host: HostSummary::new(os, virt),
        }
    }

    /// Health of the selected VMs, in declaration order
    #[instrument(skip(self, options), fields(names = ?options.names))]
    pub async fn vms_report(&self, options: &VmsOptions) -> VmsReport {
        let mut vms = Vec::new();

        for vm in filter_vms(&self.config.vms, &options.names) {
            let mut checks = vm.checks;
            if options.skip_ping {
                checks = checks.without_ping();
            }
            if options.skip_ssh {
                checks = checks.without_ssh();
            }
            let effective = VmDefinition {
                checks,
                ..vm.clone()
            };

            vms.push(self.check_vm(&effective, options.probe_timeout).await);
        }

        info!(checked = vms.len(), "vm health checks finished");
        VmsReport { vms }
    }

    /// Probe one VM's primary IP and classify the outcome
    pub async fn check_vm(&self, vm: &VmDefinition, probe_timeout: Duration) -> HealthStatus {
        let probes = self.probe_vm(vm, probe_timeout).await;
        let health = evaluate(vm, &probes);
        debug!(vm = %vm.name, status = %health.status, "vm evaluated");
        health
    }

    async fn probe_vm(&self, vm: &VmDefinition, probe_timeout: Duration) -> VmProbeResults {
        let Some(ip) = vm.primary_ip() else {
            debug!(vm = %vm.name, "no network attachment, skipping reachability probes");
            return VmProbeResults::default();
        };

        let ping = if vm.checks.ping {
            Some(self.prober.ping(ip, probe_timeout).await)
        } else {
            None
        };
        let ssh = match vm.checks.ssh_probe_port() {
            Some(port) => Some(self.prober.tcp_connect(ip, port, probe_timeout).await),
            None => None,
        };

        VmProbeResults { ping, ssh }
    }

    /// Local network state checked against the declared networks
    #[instrument(skip(self, options))]
    pub async fn net_report(&self, options: &NetOptions) -> NetReport {
        let interfaces = self.inspector.interfaces().await;
        let routes = self.inspector.routes().await;
        let dns_servers = self.inspector.dns_servers().await;
        let subnet_warnings = subnet_warnings(&interfaces, &self.config.networks);

        let mut dns_failures = Vec::new();
        if !options.skip_dns {
            for host in dns_targets(self.config) {
                if let Err(err) = self.prober.resolve(&host, options.probe_timeout).await {
                    dns_failures.push(format!("{host}: {err}"));
                }
            }
        }

        let external_connectivity_error = self
            .prober
            .connect_external(
                &options.external_host,
                options.external_port,
                options.probe_timeout,
            )
            .await
            .err()
            .map(|err| err.to_string());

        NetReport {
            interfaces,
            routes,
            dns_servers,
            subnet_warnings,
            dns_failures,
            external_connectivity_error,
        }
    }
}

/// VMs whose name matches any of `names` case-insensitively
///
/// Declaration order is preserved; an empty filter selects every VM.
#[must_use]
pub fn filter_vms<'c>(vms: &'c [VmDefinition], names: &[String]) -> Vec<&'c VmDefinition> {
    if names.is_empty() {
        return vms.iter().collect();
    }

    let wanted: BTreeSet<String> = names.iter().map(|name| name.to_lowercase()).collect();
    vms.iter()
        .filter(|vm| wanted.contains(&vm.name.to_lowercase()))
        .collect()
}

/// One warning per declared network that no local address falls inside
#[must_use]
pub fn subnet_warnings(
    interfaces: &[InterfaceInfo],
    networks: &BTreeMap<String, Network>,
) -> Vec<String> {
    let local: Vec<IpAddr> = interfaces
        .iter()
        .flat_map(|iface| &iface.addresses)
        .filter_map(|addr| addr.parse().ok())
        .collect();

    networks
        .values()
        .filter(|network| !local.iter().any(|addr| network.contains(addr)))
        .map(|network| {
            format!(
                "No local interface in expected subnet {} ({})",
                network.name, network.cidr
            )
        })
        .collect()
}

/// The environment domain, then every expected hostname once
fn dns_targets(config: &RootConfig) -> Vec<String> {
    let domain = &config.environment.domain;
    let hosts: BTreeSet<&String> = config
        .networks
        .values()
        .flat_map(|network| network.expected_hosts.keys())
        .filter(|host| *host != domain)
        .collect();

    std::iter::once(domain)
        .chain(hosts)
        .cloned()
        .collect()
}
