//! `Reachability` over ICMP (via `ping`), TCP and the system resolver

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use homelab_exec::{CommandRunner, ExecError};
use tokio::net::{TcpStream, lookup_host};
use tokio::time::timeout;
use tracing::{debug, instrument};

use crate::error::ProbeError;
use crate::traits::{ProbeResult, Reachability};

/// Grace period on top of `ping -W` before the process is killed
const PING_GRACE: Duration = Duration::from_secs(1);

/// Probes remote hosts from this machine
pub struct NetworkProber {
    runner: Arc<dyn CommandRunner>,
}

impl NetworkProber {
    /// Create a prober that shells out to `ping` through `runner`
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

/// `ping -W` takes whole seconds
fn wait_seconds(probe_timeout: Duration) -> u64 {
    probe_timeout.as_secs_f64().ceil().max(1.0) as u64
}

async fn connect_within<F>(probe_timeout: Duration, connect: F) -> ProbeResult
where
    F: Future<Output = std::io::Result<TcpStream>>,
{
    match timeout(probe_timeout, connect).await {
        Ok(Ok(_stream)) => Ok(()),
        Ok(Err(e)) => Err(ProbeError::Connect(e.to_string())),
        Err(_) => Err(ProbeError::Timeout(probe_timeout)),
    }
}

#[async_trait]
impl Reachability for NetworkProber {
    #[instrument(skip(self))]
    async fn ping(&self, ip: IpAddr, probe_timeout: Duration) -> ProbeResult {
        let wait = wait_seconds(probe_timeout).to_string();
        let target = ip.to_string();
        let args = ["-c", "1", "-W", wait.as_str(), target.as_str()];

        let outcome = match self
            .runner
            .run_with_timeout("ping", &args, probe_timeout.saturating_add(PING_GRACE))
            .await
        {
            Ok(result) if result.success() => Ok(()),
            Ok(result) => Err(ProbeError::Failed(
                result
                    .stderr_message()
                    .map_or_else(|| format!("no reply within {probe_timeout:?}"), str::to_string),
            )),
            Err(ExecError::NotFound(program)) => Err(ProbeError::Unavailable(program)),
            Err(ExecError::Timeout { .. }) => Err(ProbeError::Timeout(probe_timeout)),
            Err(e) => Err(ProbeError::Failed(e.to_string())),
        };

        debug!(%ip, ?outcome, "ping finished");
        outcome
    }

    #[instrument(skip(self))]
    async fn tcp_connect(&self, ip: IpAddr, port: u16, probe_timeout: Duration) -> ProbeResult {
        let outcome =
            connect_within(probe_timeout, TcpStream::connect(SocketAddr::new(ip, port))).await;
        debug!(%ip, port, ?outcome, "tcp connect finished");
        outcome
    }

    #[instrument(skip(self))]
    async fn resolve(&self, hostname: &str, probe_timeout: Duration) -> ProbeResult {
        let outcome = match timeout(probe_timeout, lookup_host((hostname, 0))).await {
            Ok(Ok(mut addrs)) => match addrs.next() {
                Some(_) => Ok(()),
                None => Err(ProbeError::Resolve("no addresses found".to_string())),
            },
            Ok(Err(e)) => Err(ProbeError::Resolve(e.to_string())),
            Err(_) => Err(ProbeError::Timeout(probe_timeout)),
        };
        debug!(hostname, ?outcome, "name resolution finished");
        outcome
    }

    #[instrument(skip(self))]
    async fn connect_external(&self, host: &str, port: u16, probe_timeout: Duration) -> ProbeResult {
        let outcome = connect_within(probe_timeout, TcpStream::connect((host, port))).await;
        debug!(host, port, ?outcome, "external connect finished");
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_seconds_rounds_up() {
        assert_eq!(wait_seconds(Duration::from_millis(200)), 1);
        assert_eq!(wait_seconds(Duration::from_secs(2)), 2);
        assert_eq!(wait_seconds(Duration::from_millis(2500)), 3);
    }
}
