//! Parsers for `ip` output and `resolv.conf`

use serde::Deserialize;
use tracing::warn;

use crate::types::InterfaceInfo;

#[derive(Deserialize)]
struct IpLink {
    ifname: Option<String>,
    #[serde(default)]
    addr_info: Vec<IpAddrInfo>,
}

#[derive(Deserialize)]
struct IpAddrInfo {
    family: Option<String>,
    local: Option<String>,
}

/// Parse `ip -json addr` output; malformed output yields no interfaces
#[must_use]
pub fn parse_ip_addr_json(stdout: &str) -> Vec<InterfaceInfo> {
    let links: Vec<IpLink> = match serde_json::from_str(stdout) {
        Ok(links) => links,
        Err(e) => {
            warn!(error = %e, "could not parse ip -json addr output");
            return Vec::new();
        }
    };

    links
        .into_iter()
        .filter_map(|link| {
            let name = link.ifname?;
            let addresses = link
                .addr_info
                .into_iter()
                .filter(|addr| matches!(addr.family.as_deref(), Some("inet" | "inet6")))
                .filter_map(|addr| addr.local)
                .collect();
            Some(InterfaceInfo { name, addresses })
        })
        .collect()
}

/// Non-empty, trimmed lines of `ip route show`
#[must_use]
pub fn parse_routes(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// `nameserver` entries of a resolv.conf
#[must_use]
pub fn parse_resolv_conf(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some("nameserver"), Some(server)) => Some(server.to_string()),
                _ => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ip_addr_json() {
        let stdout = r#"[
          {"ifindex":1,"ifname":"lo","addr_info":[
            {"family":"inet","local":"127.0.0.1","prefixlen":8},
            {"family":"inet6","local":"::1","prefixlen":128}]},
          {"ifindex":2,"ifname":"eth0","addr_info":[
            {"family":"inet","local":"10.10.0.5","prefixlen":24}]},
          {"ifindex":3,"ifname":"wg0"},
          {"ifindex":4,"addr_info":[{"family":"inet","local":"192.0.2.1"}]}
        ]"#;

        let interfaces = parse_ip_addr_json(stdout);
        assert_eq!(interfaces.len(), 3);
        assert_eq!(interfaces[0].addresses, vec!["127.0.0.1", "::1"]);
        assert_eq!(interfaces[1].name, "eth0");
        assert_eq!(interfaces[1].addresses, vec!["10.10.0.5"]);
        assert!(interfaces[2].addresses.is_empty());
    }

    #[test]
    fn test_parse_ip_addr_json_skips_other_families() {
        let stdout = r#"[{"ifname":"eth0","addr_info":[{"family":"link","local":"aa:bb"}]}]"#;
        assert!(parse_ip_addr_json(stdout)[0].addresses.is_empty());
    }

    #[test]
    fn test_parse_ip_addr_json_garbage() {
        assert!(parse_ip_addr_json("not json").is_empty());
    }

    #[test]
    fn test_parse_routes() {
        let routes = parse_routes("default via 10.10.0.1 dev eth0\n\n  10.10.0.0/24 dev eth0  \n");
        assert_eq!(
            routes,
            vec!["default via 10.10.0.1 dev eth0", "10.10.0.0/24 dev eth0"]
        );
    }

    #[test]
    fn test_parse_resolv_conf() {
        let content = "# generated\nsearch lab.local\nnameserver 10.10.0.1\nnameserver\nnameserver fd00::53\n";
        assert_eq!(parse_resolv_conf(content), vec!["10.10.0.1", "fd00::53"]);
    }
}
