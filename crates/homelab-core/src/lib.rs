//! homelab-core: Health evaluation and report assembly
//!
//! Turns a validated inventory plus live probe outcomes into the structured
//! reports behind the `env`, `vms` and `net` commands.

pub mod diagnostics;
pub mod health;
pub mod report;

pub use diagnostics::{Diagnostics, NetOptions, VmsOptions, filter_vms, subnet_warnings};
pub use health::{HealthState, HealthStatus, UPTIME_UNSUPPORTED, VmProbeResults, evaluate};
pub use report::{
    ConfigReport, EnvReport, EnvironmentSummary, HostSummary, NetReport, Report, ReportEnvelope,
    VmsReport,
};
