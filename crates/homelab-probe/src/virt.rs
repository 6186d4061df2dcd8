//! Virtualization hints from DMI strings and CPU flags

use crate::types::VirtualizationInfo;

/// Hypervisor names looked for in DMI product/vendor strings
const KNOWN_HYPERVISORS: [&str; 8] = [
    "KVM",
    "QEMU",
    "VMware",
    "VirtualBox",
    "Bochs",
    "RHEV",
    "OpenStack",
    "Proxmox",
];

/// Classify a host from DMI `product_name`, `sys_vendor` and `/proc/cpuinfo`
#[must_use]
pub fn classify(product_name: &str, sys_vendor: &str, cpuinfo: &str) -> VirtualizationInfo {
    let combined = format!("{product_name} {sys_vendor}");
    let hint = Some(combined.trim().to_string()).filter(|h| !h.is_empty());

    let lowered = combined.to_lowercase();
    let kind = KNOWN_HYPERVISORS
        .iter()
        .find(|name| lowered.contains(&name.to_lowercase()))
        .map(|name| name.to_lowercase());

    VirtualizationInfo {
        is_virtualized: has_hypervisor_flag(cpuinfo) || kind.is_some(),
        kind,
        hint,
    }
}

fn has_hypervisor_flag(cpuinfo: &str) -> bool {
    cpuinfo
        .lines()
        .filter(|line| line.starts_with("flags"))
        .any(|line| line.split_whitespace().any(|flag| flag == "hypervisor"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qemu_guest() {
        let info = classify("Standard PC (Q35 + ICH9, 2009)", "QEMU", "");
        assert!(info.is_virtualized);
        assert_eq!(info.kind.as_deref(), Some("qemu"));
        assert_eq!(
            info.hint.as_deref(),
            Some("Standard PC (Q35 + ICH9, 2009) QEMU")
        );
    }

    #[test]
    fn test_hypervisor_flag_without_dmi() {
        let cpuinfo = "processor\t: 0\nflags\t\t: fpu vme sse2 hypervisor lahf_lm\n";
        let info = classify("", "", cpuinfo);
        assert!(info.is_virtualized);
        assert_eq!(info.kind, None);
        assert_eq!(info.hint, None);
    }

    #[test]
    fn test_bare_metal() {
        let info = classify("PowerEdge R730", "Dell Inc.", "flags\t\t: fpu vme sse2\n");
        assert!(!info.is_virtualized);
        assert_eq!(info.kind, None);
        assert_eq!(info.hint.as_deref(), Some("PowerEdge R730 Dell Inc."));
    }
}
