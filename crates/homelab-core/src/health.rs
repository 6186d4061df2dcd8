//! VM health state model
//!
//! [`evaluate`] is pure: it only classifies probe outcomes gathered
//! elsewhere.

use std::fmt;
use std::net::IpAddr;

use homelab_config::VmDefinition;
use homelab_probe::ProbeResult;
use serde::Serialize;

/// Reason recorded whenever an uptime check is requested
pub const UPTIME_UNSUPPORTED: &str =
    "uptime_check requested but no credential mechanism implemented";

/// Reason recorded when nothing went wrong
pub const ALL_CHECKS_PASSED: &str = "all checks passed";

/// Health classification; only ever moves from `Healthy` to `Degraded`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    #[default]
    Healthy,
    Degraded,
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthState::Healthy => write!(f, "healthy"),
            HealthState::Degraded => write!(f, "degraded"),
        }
    }
}

/// Outcomes of the probes run against a VM's primary IP
///
/// `None` means the probe was not run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VmProbeResults {
    pub ping: Option<ProbeResult>,
    pub ssh: Option<ProbeResult>,
}

/// Health report for one VM
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub name: String,
    pub hostname: String,
    /// Address the probes targeted, if the VM has one
    pub primary_ip: Option<IpAddr>,
    pub status: HealthState,
    /// Human-readable reasons, never empty
    pub reasons: Vec<String>,
}

impl HealthStatus {
    fn degrade(&mut self, reason: String) {
        self.status = HealthState::Degraded;
        self.reasons.push(reason);
    }

    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.status == HealthState::Healthy
    }
}

/// Classify a VM from its check policy and probe outcomes
#[must_use]
pub fn evaluate(vm: &VmDefinition, probes: &VmProbeResults) -> HealthStatus {
    let primary_ip = vm.primary_ip();
    let mut health = HealthStatus {
        name: vm.name.clone(),
        hostname: vm.hostname.clone(),
        primary_ip,
        status: HealthState::Healthy,
        reasons: Vec::new(),
    };

    if primary_ip.is_some() {
        if vm.checks.ping {
            if let Some(Err(err)) = &probes.ping {
                health.degrade(format!("ping failed: {err}"));
            }
        }

        if let Some(port) = vm.checks.ssh_probe_port() {
            if let Some(Err(err)) = &probes.ssh {
                health.degrade(format!("ssh port {port} unreachable: {err}"));
            }
        }
    }

    if vm.checks.uptime_check {
        health.degrade(UPTIME_UNSUPPORTED.to_string());
    }

    if health.reasons.is_empty() {
        health.reasons.push(ALL_CHECKS_PASSED.to_string());
    }

    health
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use homelab_config::{MachineType, VmChecks, VmNetwork};
    use homelab_probe::ProbeError;

    use super::*;

    fn vm(checks: VmChecks) -> VmDefinition {
        VmDefinition {
            name: "node1".to_string(),
            hostname: "node1.lab.local".to_string(),
            role: "worker".to_string(),
            os_family: "debian".to_string(),
            os_version: Some("12".to_string()),
            machine_type: MachineType::Vm,
            networks: vec![VmNetwork {
                name: "lan".to_string(),
                ip: "10.10.0.10".parse().unwrap(),
            }],
            checks,
        }
    }

    fn passing() -> VmProbeResults {
        VmProbeResults {
            ping: Some(Ok(())),
            ssh: Some(Ok(())),
        }
    }

    #[test]
    fn test_all_checks_passed() {
        let health = evaluate(&vm(VmChecks::default()), &passing());

        assert!(health.is_healthy());
        assert_eq!(health.reasons, vec![ALL_CHECKS_PASSED]);
        assert_eq!(health.primary_ip, Some("10.10.0.10".parse().unwrap()));
    }

    #[test]
    fn test_ping_failure_degrades() {
        let probes = VmProbeResults {
            ping: Some(Err(ProbeError::Timeout(Duration::from_secs(2)))),
            ssh: Some(Ok(())),
        };
        let health = evaluate(&vm(VmChecks::default()), &probes);

        assert_eq!(health.status, HealthState::Degraded);
        assert_eq!(health.reasons, vec!["ping failed: timed out after 2s"]);
    }

    #[test]
    fn test_both_failures_are_reported_in_order() {
        let probes = VmProbeResults {
            ping: Some(Err(ProbeError::Failed("no reply within 2s".to_string()))),
            ssh: Some(Err(ProbeError::Connect("Connection refused".to_string()))),
        };
        let health = evaluate(&vm(VmChecks::default()), &probes);

        assert_eq!(
            health.reasons,
            vec![
                "ping failed: no reply within 2s",
                "ssh port 22 unreachable: Connection refused",
            ]
        );
    }

    #[test]
    fn test_disabled_checks_ignore_failures() {
        let probes = VmProbeResults {
            ping: Some(Err(ProbeError::Failed("lost".to_string()))),
            ssh: Some(Err(ProbeError::Connect("refused".to_string()))),
        };
        let checks = VmChecks::default().without_ping().without_ssh();
        let health = evaluate(&vm(checks), &probes);

        assert!(health.is_healthy());
        assert_eq!(health.reasons, vec![ALL_CHECKS_PASSED]);
    }

    #[test]
    fn test_uptime_check_always_degrades() {
        let checks = VmChecks {
            uptime_check: true,
            ..VmChecks::default()
        };
        let health = evaluate(&vm(checks), &passing());

        assert_eq!(health.status, HealthState::Degraded);
        assert_eq!(health.reasons, vec![UPTIME_UNSUPPORTED]);
    }

    #[test]
    fn test_no_attachments_skips_ip_checks() {
        let mut definition = vm(VmChecks::default());
        definition.networks.clear();
        let probes = VmProbeResults {
            ping: Some(Err(ProbeError::Failed("lost".to_string()))),
            ssh: None,
        };
        let health = evaluate(&definition, &probes);

        assert!(health.is_healthy());
        assert_eq!(health.primary_ip, None);
        assert_eq!(health.reasons, vec![ALL_CHECKS_PASSED]);
    }

    #[test]
    fn test_never_healthy_with_failure_and_never_empty() {
        let outcomes = [
            None,
            Some(Ok(())),
            Some(Err(ProbeError::Failed("x".to_string()))),
        ];
        for ping in &outcomes {
            for ssh in &outcomes {
                for uptime_check in [false, true] {
                    let checks = VmChecks {
                        uptime_check,
                        ..VmChecks::default()
                    };
                    let probes = VmProbeResults {
                        ping: ping.clone(),
                        ssh: ssh.clone(),
                    };
                    let health = evaluate(&vm(checks), &probes);

                    let failed = matches!(ping, Some(Err(_))) || matches!(ssh, Some(Err(_)));
                    if failed || uptime_check {
                        assert_eq!(health.status, HealthState::Degraded);
                    }
                    assert!(!health.reasons.is_empty());
                }
            }
        }
    }
}
