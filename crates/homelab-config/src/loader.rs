//! Inventory loading and validation
//!
//! The document is walked as raw YAML in a fixed order (environment,
//! networks, defaults, vms) and the first violation is returned.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

use serde_yaml::{Mapping, Value};
use tracing::{debug, info, instrument};

use crate::checks::{ChecksOverride, VmChecks};
use crate::error::ConfigError;
use crate::model::{
    Defaults, Environment, MachineType, Network, RootConfig, VmDefinition, VmNetwork,
};
use crate::value;

/// Load, validate and normalize the inventory at `path`
///
/// # Errors
/// Returns the first `ConfigError` encountered; nothing is partially loaded.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_config(path: impl AsRef<Path>) -> Result<RootConfig, ConfigError> {
    let path = path.as_ref();

    let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
        _ => ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
    })?;
    if metadata.is_dir() {
        return Err(ConfigError::IsDirectory(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let config = parse_config(&content)?;

    info!(
        environment = %config.environment.name,
        networks = config.networks.len(),
        vms = config.vms.len(),
        "configuration loaded"
    );

    Ok(config)
}

/// Validate and normalize an inventory document held in memory
///
/// # Errors
/// Returns the first `ConfigError` encountered.
pub fn parse_config(content: &str) -> Result<RootConfig, ConfigError> {
    if content.trim().is_empty() {
        return Err(ConfigError::Empty);
    }

    let mut document: Value =
        serde_yaml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    document
        .apply_merge()
        .map_err(|e| ConfigError::Parse(e.to_string()))?;
    let root = document.as_mapping().ok_or(ConfigError::RootNotMapping)?;

    let environment = parse_environment(root)?;
    let networks = parse_networks(root)?;
    let defaults = parse_defaults(root)?;
    let vms = parse_vms(root, &networks, &defaults)?;

    Ok(RootConfig {
        environment,
        networks,
        vms,
        defaults,
    })
}

fn parse_environment(root: &Mapping) -> Result<Environment, ConfigError> {
    let empty = Mapping::new();
    let node = value::optional_mapping(root, "environment", "environment")?.unwrap_or(&empty);

    let field = |key: &str| -> Result<String, ConfigError> {
        let path = format!("environment.{key}");
        let raw = value::required_string(node, key, &path)?;
        if raw.trim().is_empty() {
            return Err(ConfigError::invalid(path, "must not be empty"));
        }
        Ok(raw.to_string())
    };

    Ok(Environment {
        name: field("name")?,
        domain: field("domain")?,
        description: field("description")?,
    })
}

fn parse_networks(root: &Mapping) -> Result<BTreeMap<String, Network>, ConfigError> {
    let node = value::optional_mapping(root, "networks", "networks")?
        .filter(|map| !map.is_empty())
        .ok_or_else(|| ConfigError::invalid("networks", "must be a non-empty mapping"))?;

    let mut networks = BTreeMap::new();
    for (key, raw) in node {
        let name = value::key(key, "networks")?;
        let network = parse_network(name, raw)?;
        debug!(network = %name, cidr = %network.cidr, "network validated");
        networks.insert(name.to_string(), network);
    }

    Ok(networks)
}

fn parse_network(name: &str, raw: &Value) -> Result<Network, ConfigError> {
    let prefix = format!("networks.{name}");
    let node = value::mapping(raw, &prefix)?;

    let (Some(cidr), Some(gateway)) = (value::get(node, "cidr"), value::get(node, "gateway"))
    else {
        return Err(ConfigError::invalid(prefix, "requires cidr and gateway"));
    };
    let cidr = value::cidr(cidr, &format!("{prefix}.cidr"))?;
    let gateway = value::ip(gateway, &format!("{prefix}.gateway"))?;

    let bridge = value::get(node, "bridge")
        .map(|v| value::string(v, &format!("{prefix}.bridge")).map(str::to_string))
        .transpose()?;

    let mut dns_servers = Vec::new();
    if let Some(raw) = value::get(node, "dns_servers") {
        let field = format!("{prefix}.dns_servers");
        for (idx, server) in value::sequence(raw, &field)?.iter().enumerate() {
            dns_servers.push(value::ip(server, &format!("{field}[{idx}]"))?);
        }
    }

    let mut expected_hosts = BTreeMap::new();
    if let Some(raw) = value::get(node, "expected_hosts") {
        let field = format!("{prefix}.expected_hosts");
        for (host, ip) in value::mapping(raw, &field)? {
            let host = value::key(host, &field)?;
            let ip = value::ip(ip, &format!("{field}.{host}"))?;
            expected_hosts.insert(host.to_string(), ip);
        }
    }

    Ok(Network {
        name: name.to_string(),
        cidr,
        gateway,
        bridge,
        dns_servers,
        expected_hosts,
    })
}

fn parse_defaults(root: &Mapping) -> Result<Defaults, ConfigError> {
    let Some(defaults) = value::optional_mapping(root, "defaults", "defaults")? else {
        return Ok(Defaults::default());
    };
    let Some(vm) = value::optional_mapping(defaults, "vm", "defaults.vm")? else {
        return Ok(Defaults::default());
    };

    let vm_checks = ChecksOverride::from_mapping(vm, "defaults.vm")?.apply_to(&VmChecks::default());
    let vm_os_family = value::get(vm, "os_family")
        .map(|v| value::string(v, "defaults.vm.os_family").map(str::to_string))
        .transpose()?;
    let vm_os_version = value::get(vm, "os_version")
        .map(|v| value::version(v, "defaults.vm.os_version"))
        .transpose()?;

    Ok(Defaults {
        vm_checks,
        vm_os_family,
        vm_os_version,
    })
}

fn parse_vms(
    root: &Mapping,
    networks: &BTreeMap<String, Network>,
    defaults: &Defaults,
) -> Result<Vec<VmDefinition>, ConfigError> {
    let entries = value::get(root, "vms")
        .map(|raw| value::sequence(raw, "vms"))
        .transpose()?
        .filter(|entries| !entries.is_empty())
        .ok_or_else(|| ConfigError::invalid("vms", "must be a non-empty list"))?;

    entries
        .iter()
        .enumerate()
        .map(|(idx, raw)| parse_vm(&format!("vms[{idx}]"), raw, networks, defaults))
        .collect()
}

fn parse_vm(
    prefix: &str,
    raw: &Value,
    networks: &BTreeMap<String, Network>,
    defaults: &Defaults,
) -> Result<VmDefinition, ConfigError> {
    let node = value::mapping(raw, prefix)?;

    let name = value::required_string(node, "name", &format!("{prefix}.name"))?;
    let hostname = value::required_string(node, "hostname", &format!("{prefix}.hostname"))?;
    let role = value::required_string(node, "role", &format!("{prefix}.role"))?;

    let machine_type = match value::get(node, "machine_type") {
        None => MachineType::default(),
        Some(raw) => {
            let field = format!("{prefix}.machine_type");
            MachineType::parse(value::string(raw, &field)?)
                .ok_or_else(|| ConfigError::invalid(field, "must be 'vm' or 'bare-metal'"))?
        }
    };

    let empty = Mapping::new();
    let os = value::optional_mapping(node, "os", &format!("{prefix}.os"))?.unwrap_or(&empty);

    let os_family = match value::get(os, "family") {
        Some(raw) => Some(value::string(raw, &format!("{prefix}.os.family"))?.to_string()),
        None => defaults.vm_os_family.clone(),
    }
    .filter(|family| !family.trim().is_empty())
    .ok_or_else(|| {
        ConfigError::invalid(
            format!("{prefix}.os.family"),
            "is required (or set defaults.vm.os_family)",
        )
    })?;

    let os_version = match value::get(os, "version") {
        Some(raw) => Some(value::version(raw, &format!("{prefix}.os.version"))?),
        None => defaults.vm_os_version.clone(),
    };

    let attachments = parse_attachments(prefix, node, networks)?;

    let checks = match value::optional_mapping(node, "checks", &format!("{prefix}.checks"))? {
        Some(map) => ChecksOverride::from_mapping(map, &format!("{prefix}.checks"))?
            .apply_to(&defaults.vm_checks),
        None => defaults.vm_checks,
    };

    Ok(VmDefinition {
        name: name.to_string(),
        hostname: hostname.to_string(),
        role: role.to_string(),
        os_family,
        os_version,
        machine_type,
        networks: attachments,
        checks,
    })
}

fn parse_attachments(
    prefix: &str,
    node: &Mapping,
    networks: &BTreeMap<String, Network>,
) -> Result<Vec<VmNetwork>, ConfigError> {
    let field = format!("{prefix}.networks");
    let entries = value::get(node, "networks")
        .map(|raw| value::sequence(raw, &field))
        .transpose()?
        .filter(|entries| !entries.is_empty())
        .ok_or_else(|| ConfigError::invalid(field.as_str(), "must be a non-empty list"))?;

    let mut attachments = Vec::with_capacity(entries.len());
    for (idx, raw) in entries.iter().enumerate() {
        let item_field = format!("{field}[{idx}]");
        let item = value::mapping(raw, &item_field)?;

        let (Some(name), Some(ip)) = (value::get(item, "name"), value::get(item, "ip")) else {
            return Err(ConfigError::invalid(item_field, "requires name and ip"));
        };

        let name_field = format!("{item_field}.name");
        let name = value::string(name, &name_field)?;
        if !networks.contains_key(name) {
            return Err(ConfigError::invalid(
                name_field,
                format!("references unknown network '{name}'"),
            ));
        }
        let ip = value::ip(ip, &format!("{item_field}.ip"))?;

        attachments.push(VmNetwork {
            name: name.to_string(),
            ip,
        });
    }

    Ok(attachments)
}
