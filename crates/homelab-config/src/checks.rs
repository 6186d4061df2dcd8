//! VM health-check policy and its defaulting cascade

use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::error::ConfigError;
use crate::value;

const DEFAULT_SSH_PORT: u16 = 22;

/// Resolved health-check options for a VM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VmChecks {
    /// Send one ICMP echo to the primary IP
    pub ping: bool,
    /// TCP port probed on the primary IP; 0 skips the probe
    pub ssh_port: u16,
    /// Request an uptime check
    pub uptime_check: bool,
}

impl Default for VmChecks {
    fn default() -> Self {
        Self {
            ping: true,
            ssh_port: DEFAULT_SSH_PORT,
            uptime_check: false,
        }
    }
}

impl VmChecks {
    /// SSH port to probe, if the probe is enabled
    #[must_use]
    pub fn ssh_probe_port(&self) -> Option<u16> {
        (self.ssh_port != 0).then_some(self.ssh_port)
    }

    /// Same checks with ping disabled
    #[must_use]
    pub fn without_ping(self) -> Self {
        Self { ping: false, ..self }
    }

    /// Same checks with the SSH port probe disabled
    #[must_use]
    pub fn without_ssh(self) -> Self {
        Self {
            ssh_port: 0,
            ..self
        }
    }
}

/// A partially specified `checks` block
///
/// `None` inherits the corresponding field of the base policy; `Some` is an
/// explicit value, including `Some(false)` and `Some(0)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChecksOverride {
    pub ping: Option<bool>,
    pub ssh_port: Option<u16>,
    pub uptime_check: Option<bool>,
}

impl ChecksOverride {
    /// Merge onto `base` field by field
    #[must_use]
    pub fn apply_to(&self, base: &VmChecks) -> VmChecks {
        VmChecks {
            ping: self.ping.unwrap_or(base.ping),
            ssh_port: self.ssh_port.unwrap_or(base.ssh_port),
            uptime_check: self.uptime_check.unwrap_or(base.uptime_check),
        }
    }

    /// Read the check fields of a mapping; `prefix` is the mapping's field path
    pub(crate) fn from_mapping(map: &Mapping, prefix: &str) -> Result<Self, ConfigError> {
        let ping = value::get(map, "ping")
            .map(|v| value::boolean(v, &format!("{prefix}.ping")))
            .transpose()?;
        let ssh_port = value::get(map, "ssh_port")
            .map(|v| parse_ssh_port(v, &format!("{prefix}.ssh_port")))
            .transpose()?;
        let uptime_check = value::get(map, "uptime_check")
            .map(|v| value::boolean(v, &format!("{prefix}.uptime_check")))
            .transpose()?;

        Ok(Self {
            ping,
            ssh_port,
            uptime_check,
        })
    }
}

/// `false` and `0` disable the probe, anything else must be a valid port
fn parse_ssh_port(raw: &Value, field: &str) -> Result<u16, ConfigError> {
    const RANGE: &str = "must be between 1 and 65535 (0 or false disables the probe)";

    match raw {
        Value::Bool(false) => Ok(0),
        Value::String(_) if value::as_bool(raw) == Some(false) => Ok(0),
        Value::Number(n) if n.is_f64() => Err(ConfigError::invalid(field, "must be an integer")),
        Value::Number(n) => n
            .as_u64()
            .and_then(|port| u16::try_from(port).ok())
            .ok_or_else(|| ConfigError::invalid(field, RANGE)),
        _ => Err(ConfigError::invalid(field, "must be an integer or false")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_empty_override_inherits_everything() {
        let base = VmChecks {
            ping: false,
            ssh_port: 2222,
            uptime_check: true,
        };
        assert_eq!(ChecksOverride::default().apply_to(&base), base);
    }

    #[test]
    fn test_explicit_zero_and_false_override() {
        let over = ChecksOverride::from_mapping(&mapping("ssh_port: 0\nping: false"), "c").unwrap();
        let merged = over.apply_to(&VmChecks::default());

        assert_eq!(
            merged,
            VmChecks {
                ping: false,
                ssh_port: 0,
                uptime_check: false,
            }
        );
        assert_eq!(merged.ssh_probe_port(), None);
    }

    #[test]
    fn test_ssh_port_false_disables_probe() {
        let over = ChecksOverride::from_mapping(&mapping("ssh_port: false"), "c").unwrap();
        assert_eq!(over.ssh_port, Some(0));
    }

    #[test]
    fn test_ssh_port_rejections() {
        for (yaml, problem) in [
            ("ssh_port: 70000", "must be between 1 and 65535"),
            ("ssh_port: -1", "must be between 1 and 65535"),
            ("ssh_port: 22.5", "must be an integer"),
            ("ssh_port: true", "must be an integer or false"),
            ("ssh_port: '22'", "must be an integer or false"),
        ] {
            let err = ChecksOverride::from_mapping(&mapping(yaml), "vms[0].checks").unwrap_err();
            assert_eq!(err.field(), Some("vms[0].checks.ssh_port"), "{yaml}");
            assert!(err.to_string().contains(problem), "{yaml}: {err}");
        }
    }

    #[test]
    fn test_yaml11_spellings() {
        let over = ChecksOverride::from_mapping(
            &mapping("ping: no\nssh_port: off\nuptime_check: yes"),
            "c",
        )
        .unwrap();
        assert_eq!(
            over,
            ChecksOverride {
                ping: Some(false),
                ssh_port: Some(0),
                uptime_check: Some(true),
            }
        );
    }

    #[test]
    fn test_ping_must_be_boolean() {
        let err = ChecksOverride::from_mapping(&mapping("ping: yes please"), "defaults.vm")
            .unwrap_err();
        assert_eq!(err.to_string(), "defaults.vm.ping must be a boolean");
    }

    #[test]
    fn test_skip_helpers() {
        let checks = VmChecks::default().without_ping().without_ssh();
        assert!(!checks.ping);
        assert_eq!(checks.ssh_probe_port(), None);
        assert_eq!(VmChecks::default().ssh_probe_port(), Some(22));
    }
}
