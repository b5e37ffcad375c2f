//! Port merging
//!
//! Explicit port mappings and `expose` entries both end up as port
//! entries; an expose entry is dropped when a mapping already covers the
//! same container port and protocol.

use crate::compose::config::PortConfig;
use crate::model::PortEntry;
use std::collections::HashSet;

/// Protocol used when none is given
pub const DEFAULT_PROTOCOL: &str = "TCP";

fn normalize_protocol(protocol: Option<&str>) -> String {
    match protocol.map(str::trim) {
        Some(p) if !p.is_empty() => p.to_uppercase(),
        _ => DEFAULT_PROTOCOL.to_string(),
    }
}

/// Merge port mappings with exposed ports
pub fn merge_ports(ports: &[PortConfig], expose: &[String]) -> Vec<PortEntry> {
    let mut merged = Vec::with_capacity(ports.len() + expose.len());
    let mut seen: HashSet<(u16, String)> = HashSet::new();

    for port in ports {
        let protocol = normalize_protocol(port.protocol.as_deref());
        seen.insert((port.target, protocol.clone()));
        merged.push(PortEntry {
            host_port: port.published.unwrap_or(0),
            container_port: port.target,
            host_ip: String::new(),
            protocol,
        });
    }

    for entry in expose {
        let (value, protocol) = match entry.split_once('/') {
            Some((value, protocol)) => (value, Some(protocol)),
            None => (entry.as_str(), None),
        };

        let port: u16 = match value.trim().parse() {
            Ok(port) => port,
            Err(_) => {
                tracing::warn!("Ignoring expose entry {:?}: not a single port", entry);
                continue;
            }
        };

        let protocol = normalize_protocol(protocol);
        if !seen.insert((port, protocol.clone())) {
            continue;
        }

        merged.push(PortEntry {
            host_port: port,
            container_port: port,
            host_ip: String::new(),
            protocol,
        });
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(target: u16, published: Option<u16>, protocol: &str) -> PortConfig {
        PortConfig {
            target,
            published,
            protocol: Some(protocol.to_string()),
            ..Default::default()
        }
    }

    fn expose(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_explicit_mapping() {
        let merged = merge_ports(&[mapping(80, Some(8080), "tcp")], &[]);
        assert_eq!(
            merged,
            vec![PortEntry {
                host_port: 8080,
                container_port: 80,
                host_ip: String::new(),
                protocol: "TCP".to_string(),
            }]
        );
    }

    #[test]
    fn test_expose_skips_mapped_ports() {
        let merged = merge_ports(
            &[mapping(80, Some(8080), "tcp")],
            &expose(&["80", "80/tcp", "443", "53/udp"]),
        );

        let summary: Vec<(u16, u16, &str)> = merged
            .iter()
            .map(|p| (p.host_port, p.container_port, p.protocol.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![(8080, 80, "TCP"), (443, 443, "TCP"), (53, 53, "UDP")]
        );
    }

    #[test]
    fn test_same_port_different_protocol() {
        let merged = merge_ports(&[mapping(53, None, "udp")], &expose(&["53"]));
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].host_port, 0);
        assert_eq!(merged[1].protocol, "TCP");
    }

    #[test]
    fn test_never_duplicates_port_and_protocol() {
        let mappings = [mapping(80, Some(80), "tcp"), mapping(9000, None, "udp")];
        let exposed = expose(&["9000/udp", "80", "9000/UDP", "81", "81"]);

        let merged = merge_ports(&mappings, &exposed);
        let mut keys: Vec<(u16, &str)> = merged
            .iter()
            .map(|p| (p.container_port, p.protocol.as_str()))
            .collect();
        let total = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), total);
        assert_eq!(total, 3);
    }

    #[test]
    fn test_invalid_expose_is_skipped() {
        let merged = merge_ports(&[], &expose(&["3000-3005", "http", "8080"]));
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].container_port, 8080);
    }
}
