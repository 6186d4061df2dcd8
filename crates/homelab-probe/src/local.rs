//! `HostInspector` backed by local system files and tools

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use homelab_exec::{CommandResult, CommandRunner};
use tracing::{debug, instrument, warn};

use crate::net::{parse_ip_addr_json, parse_resolv_conf, parse_routes};
use crate::os::parse_os_release;
use crate::traits::HostInspector;
use crate::types::{InterfaceInfo, OsInfo, VirtualizationInfo};
use crate::virt;

const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(3);

/// Inspects the host it runs on
///
/// System files are resolved below `root` (normally `/`), which lets tests
/// point the inspector at a fixture tree.
pub struct LocalInspector {
    runner: Arc<dyn CommandRunner>,
    root: PathBuf,
    command_timeout: Duration,
}

impl LocalInspector {
    /// Create an inspector for the real filesystem root
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            root: PathBuf::from("/"),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Resolve system files below `root`
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Set the timeout for each external command
    #[must_use]
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    async fn read(&self, relative: &str) -> Option<String> {
        let path = self.path(relative);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Some(content),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "system file unavailable");
                None
            }
        }
    }

    async fn read_trimmed(&self, relative: &str) -> Option<String> {
        self.read(relative)
            .await
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
    }

    /// Run a tool, returning `None` when it cannot be started or times out
    async fn command(&self, program: &str, args: &[&str]) -> Option<CommandResult> {
        match self
            .runner
            .run_with_timeout(program, args, self.command_timeout)
            .await
        {
            Ok(result) => Some(result),
            Err(e) if e.is_unavailable() => {
                debug!(program, error = %e, "tool unavailable");
                None
            }
            Err(e) => {
                warn!(program, error = %e, "tool failed");
                None
            }
        }
    }
}

#[async_trait]
impl HostInspector for LocalInspector {
    #[instrument(skip(self))]
    async fn os_info(&self) -> OsInfo {
        let fields = self
            .read("etc/os-release")
            .await
            .map(|content| parse_os_release(&content))
            .unwrap_or_default();

        let family = match fields.get("ID") {
            Some(id) if !id.is_empty() => id.clone(),
            _ => std::env::consts::OS.to_string(),
        };
        let version = match fields.get("VERSION_ID") {
            Some(version) if !version.is_empty() => version.clone(),
            _ => self
                .read_trimmed("proc/sys/kernel/osrelease")
                .await
                .unwrap_or_else(|| "unknown".to_string()),
        };

        debug!(%family, %version, "detected operating system");
        OsInfo { family, version }
    }

    #[instrument(skip(self))]
    async fn virtualization(&self) -> VirtualizationInfo {
        if let Some(result) = self.command("systemd-detect-virt", &[]).await {
            let kind = result.stdout.trim();
            if result.success() && !kind.is_empty() && kind != "none" {
                debug!(kind, "systemd-detect-virt reported virtualization");
                return VirtualizationInfo::detected(kind);
            }
        }

        let product_name = self
            .read_trimmed("sys/devices/virtual/dmi/id/product_name")
            .await
            .unwrap_or_default();
        let sys_vendor = self
            .read_trimmed("sys/devices/virtual/dmi/id/sys_vendor")
            .await
            .unwrap_or_default();
        let cpuinfo = self.read("proc/cpuinfo").await.unwrap_or_default();

        virt::classify(&product_name, &sys_vendor, &cpuinfo)
    }

    #[instrument(skip(self))]
    async fn interfaces(&self) -> Vec<InterfaceInfo> {
        match self.command("ip", &["-json", "addr"]).await {
            Some(result) if result.success() => parse_ip_addr_json(&result.stdout),
            _ => Vec::new(),
        }
    }

    #[instrument(skip(self))]
    async fn routes(&self) -> Vec<String> {
        match self.command("ip", &["route", "show"]).await {
            Some(result) if result.success() => parse_routes(&result.stdout),
            _ => Vec::new(),
        }
    }

    #[instrument(skip(self))]
    async fn dns_servers(&self) -> Vec<String> {
        self.read("etc/resolv.conf")
            .await
            .map(|content| parse_resolv_conf(&content))
            .unwrap_or_default()
    }
}
