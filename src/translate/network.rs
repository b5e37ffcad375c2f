//! Network attachment resolution

use crate::compose::config::{NetworkConfig, ServiceConfig};
use std::collections::HashMap;

/// Network every service joins when it names none
pub const DEFAULT_NETWORK: &str = "default";

fn network_name(key: &str, networks: &HashMap<String, NetworkConfig>) -> String {
    networks
        .get(key)
        .and_then(|n| n.name.as_deref())
        .filter(|name| !name.is_empty())
        .unwrap_or(key)
        .to_string()
}

/// Names of the networks a service attaches to
///
/// Explicit attachments are resolved in sorted key order.
pub fn resolve_networks(service: &ServiceConfig, networks: &HashMap<String, NetworkConfig>) -> Vec<String> {
    if service.networks.is_empty() {
        if networks.contains_key(DEFAULT_NETWORK) {
            return vec![network_name(DEFAULT_NETWORK, networks)];
        }
        return Vec::new();
    }

    let mut keys: Vec<&String> = service.networks.keys().collect();
    keys.sort();
    keys.into_iter().map(|key| network_name(key, networks)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network(name: Option<&str>) -> NetworkConfig {
        NetworkConfig {
            name: name.map(str::to_string),
            ..Default::default()
        }
    }

    fn service(networks: &[&str]) -> ServiceConfig {
        ServiceConfig {
            networks: networks.iter().map(|n| (n.to_string(), None)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_network() {
        let networks = HashMap::from([(DEFAULT_NETWORK.to_string(), network(Some("myapp_default")))]);
        assert_eq!(resolve_networks(&service(&[]), &networks), vec!["myapp_default"]);
    }

    #[test]
    fn test_no_default_network() {
        assert!(resolve_networks(&service(&[]), &HashMap::new()).is_empty());
    }

    #[test]
    fn test_explicit_networks() {
        let networks = HashMap::from([
            ("front".to_string(), network(Some("myapp_front"))),
            ("back".to_string(), network(None)),
            (DEFAULT_NETWORK.to_string(), network(Some("myapp_default"))),
        ]);

        let resolved = resolve_networks(&service(&["front", "back", "undeclared"]), &networks);
        assert_eq!(resolved, vec!["back", "myapp_front", "undeclared"]);
    }
}
