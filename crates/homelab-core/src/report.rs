//! Structured report types
//!
//! Reports serialize to the JSON shape printed by `--output json`; the CLI
//! renders the same values as text.

use chrono::{DateTime, Utc};
use homelab_config::{Environment, RootConfig};
use homelab_probe::{InterfaceInfo, OsInfo, VirtualizationInfo};
use serde::Serialize;

use crate::health::HealthStatus;

/// Environment metadata as declared in the inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentSummary {
    pub name: String,
    pub domain: String,
    pub description: String,
}

impl From<&Environment> for EnvironmentSummary {
    fn from(env: &Environment) -> Self {
        Self {
            name: env.name.clone(),
            domain: env.domain.clone(),
            description: env.description.clone(),
        }
    }
}

/// What the local host looks like
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostSummary {
    pub os_family: String,
    pub os_version: String,
    pub virtualized: bool,
    pub virtualization_type: Option<String>,
    pub hint: Option<String>,
}

impl HostSummary {
    #[must_use]
    pub fn new(os: OsInfo, virt: VirtualizationInfo) -> Self {
        Self {
            os_family: os.family,
            os_version: os.version,
            virtualized: virt.is_virtualized,
            virtualization_type: virt.kind,
            hint: virt.hint,
        }
    }
}

/// Output of `env`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvReport {
    pub environment: EnvironmentSummary,
    pub host: HostSummary,
}

/// Output of `vms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VmsReport {
    pub vms: Vec<HealthStatus>,
}

/// Output of `net`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetReport {
    pub interfaces: Vec<InterfaceInfo>,
    pub routes: Vec<String>,
    pub dns_servers: Vec<String>,
    /// Declared networks with no local address inside them
    pub subnet_warnings: Vec<String>,
    /// `<hostname>: <error>` for each failed lookup
    pub dns_failures: Vec<String>,
    /// `None` when the external connectivity probe succeeded
    pub external_connectivity_error: Option<String>,
}

/// Output of `config`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigReport {
    pub config: RootConfig,
}

/// Any command's report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Report {
    Env(EnvReport),
    Vms(VmsReport),
    Net(NetReport),
    Config(ConfigReport),
}

impl From<EnvReport> for Report {
    fn from(report: EnvReport) -> Self {
        Report::Env(report)
    }
}

impl From<VmsReport> for Report {
    fn from(report: VmsReport) -> Self {
        Report::Vms(report)
    }
}

impl From<NetReport> for Report {
    fn from(report: NetReport) -> Self {
        Report::Net(report)
    }
}

impl From<ConfigReport> for Report {
    fn from(report: ConfigReport) -> Self {
        Report::Config(report)
    }
}

/// A report stamped with its generation time
#[derive(Debug, Clone, Serialize)]
pub struct ReportEnvelope {
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub report: Report,
}

impl ReportEnvelope {
    pub fn new(report: impl Into<Report>) -> Self {
        Self {
            generated_at: Utc::now(),
            report: report.into(),
        }
    }

    /// Pretty-printed JSON
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::HealthState;

    #[test]
    fn test_envelope_flattens_report() {
        let report = VmsReport {
            vms: vec![HealthStatus {
                name: "node1".to_string(),
                hostname: "node1.lab.local".to_string(),
                primary_ip: None,
                status: HealthState::Degraded,
                reasons: vec!["ping failed: timed out after 2s".to_string()],
            }],
        };

        let json: serde_json::Value =
            serde_json::from_str(&ReportEnvelope::new(report).to_json().unwrap()).unwrap();

        assert!(json["generated_at"].is_string());
        assert_eq!(json["vms"][0]["name"], "node1");
        assert_eq!(json["vms"][0]["status"], "degraded");
        assert!(json["vms"][0]["primary_ip"].is_null());
    }

    #[test]
    fn test_virtualization_fields() {
        let host = HostSummary::new(
            OsInfo {
                family: "ubuntu".to_string(),
                version: "25.04".to_string(),
            },
            VirtualizationInfo::detected("kvm"),
        );
        let json = serde_json::to_value(&host).unwrap();

        assert_eq!(json["virtualized"], true);
        assert_eq!(json["virtualization_type"], "kvm");
        assert!(json["hint"].is_null());
    }
}
