//! Label directives
//!
//! A handful of `kompose.*` service labels steer translation instead of
//! being carried through as metadata.

use crate::error::{KomposerError, Result};
use crate::model::{ServiceRecord, ServiceType};
use std::collections::HashMap;

pub const LABEL_SERVICE_TYPE: &str = "kompose.service.type";
pub const LABEL_SERVICE_EXPOSE: &str = "kompose.service.expose";
pub const LABEL_SERVICE_EXPOSE_TLS_SECRET: &str = "kompose.service.expose.tls-secret";
pub const LABEL_NODE_PORT_PORT: &str = "kompose.service.nodeport.port";
pub const LABEL_IMAGE_PULL_SECRET: &str = "kompose.image-pull-secret";
pub const LABEL_IMAGE_PULL_POLICY: &str = "kompose.image-pull-policy";

/// Recognized directive labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    ServiceType,
    Expose,
    ExposeTlsSecret,
    NodePort,
    ImagePullSecret,
    ImagePullPolicy,
}

impl Directive {
    /// Directive for a label key, `None` for pass-through labels
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            LABEL_SERVICE_TYPE => Some(Directive::ServiceType),
            LABEL_SERVICE_EXPOSE => Some(Directive::Expose),
            LABEL_SERVICE_EXPOSE_TLS_SECRET => Some(Directive::ExposeTlsSecret),
            LABEL_NODE_PORT_PORT => Some(Directive::NodePort),
            LABEL_IMAGE_PULL_SECRET => Some(Directive::ImagePullSecret),
            LABEL_IMAGE_PULL_POLICY => Some(Directive::ImagePullPolicy),
            _ => None,
        }
    }

    fn apply(self, value: &str, record: &mut ServiceRecord) -> Result<()> {
        match self {
            Directive::ServiceType => record.service_type = Some(parse_service_type(value)?),
            Directive::Expose => {
                record.expose_service = value
                    .to_lowercase()
                    .trim_matches([' ', ','])
                    .to_string();
            }
            Directive::ExposeTlsSecret => record.expose_service_tls = value.to_string(),
            Directive::NodePort => {
                record.node_port_port = match value.trim().parse::<u16>() {
                    Ok(0) => None,
                    Ok(port) => Some(port),
                    Err(_) => {
                        tracing::warn!(
                            "Label {} has invalid port {:?}, ignoring",
                            LABEL_NODE_PORT_PORT,
                            value
                        );
                        None
                    }
                };
            }
            Directive::ImagePullSecret => record.image_pull_secret = value.to_string(),
            Directive::ImagePullPolicy => record.image_pull_policy = value.to_string(),
        }
        Ok(())
    }
}

/// Parse a `kompose.service.type` value, case-insensitively
pub fn parse_service_type(value: &str) -> Result<ServiceType> {
    match value.to_lowercase().as_str() {
        "" | "clusterip" => Ok(ServiceType::ClusterIP),
        "nodeport" => Ok(ServiceType::NodePort),
        "loadbalancer" => Ok(ServiceType::LoadBalancer),
        "headless" => Ok(ServiceType::Headless),
        _ => Err(KomposerError::InvalidServiceType(value.to_string())),
    }
}

/// Apply directive labels to the record and copy the rest into its
/// pass-through labels, then check the directives are consistent
///
/// Expects the record's ports to be merged already.
pub fn apply_labels(labels: &HashMap<String, String>, record: &mut ServiceRecord) -> Result<()> {
    for (key, value) in labels {
        match Directive::from_key(key) {
            Some(directive) => directive.apply(value, record)?,
            None => {
                record.labels.insert(key.clone(), value.clone());
            }
        }
    }

    if record.expose_service.is_empty() && !record.expose_service_tls.is_empty() {
        return Err(KomposerError::TlsSecretWithoutExpose);
    }

    if record.node_port_port.is_some() {
        if record.service_type != Some(ServiceType::NodePort) {
            return Err(KomposerError::NodePortRequiresNodePortType);
        }
        if record.ports.len() > 1 {
            return Err(KomposerError::NodePortWithMultiplePorts);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PortEntry;

    fn labels(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn port(number: u16) -> PortEntry {
        PortEntry {
            host_port: number,
            container_port: number,
            host_ip: String::new(),
            protocol: "TCP".to_string(),
        }
    }

    #[test]
    fn test_directives_and_pass_through() {
        let mut record = ServiceRecord::default();
        apply_labels(
            &labels(&[
                (LABEL_SERVICE_TYPE, "LoadBalancer"),
                (LABEL_SERVICE_EXPOSE, " Example.COM, "),
                (LABEL_SERVICE_EXPOSE_TLS_SECRET, "example-tls"),
                (LABEL_IMAGE_PULL_SECRET, "regcred"),
                (LABEL_IMAGE_PULL_POLICY, "Always"),
                ("com.example.team", "payments"),
            ]),
            &mut record,
        )
        .unwrap();

        assert_eq!(record.service_type, Some(ServiceType::LoadBalancer));
        assert_eq!(record.expose_service, "example.com");
        assert_eq!(record.expose_service_tls, "example-tls");
        assert_eq!(record.image_pull_secret, "regcred");
        assert_eq!(record.image_pull_policy, "Always");
        assert_eq!(record.labels.len(), 1);
        assert_eq!(record.labels["com.example.team"], "payments");
    }

    #[test]
    fn test_invalid_service_type() {
        let mut record = ServiceRecord::default();
        let err = apply_labels(&labels(&[(LABEL_SERVICE_TYPE, "ingress")]), &mut record).unwrap_err();
        assert!(matches!(err, KomposerError::InvalidServiceType(v) if v == "ingress"));
    }

    #[test]
    fn test_service_type_values() {
        assert_eq!(parse_service_type("").unwrap(), ServiceType::ClusterIP);
        assert_eq!(parse_service_type("ClusterIP").unwrap(), ServiceType::ClusterIP);
        assert_eq!(parse_service_type("nodeport").unwrap(), ServiceType::NodePort);
        assert_eq!(parse_service_type("Headless").unwrap(), ServiceType::Headless);
    }

    #[test]
    fn test_tls_without_expose() {
        let mut record = ServiceRecord::default();
        let err = apply_labels(&labels(&[(LABEL_SERVICE_EXPOSE_TLS_SECRET, "tls")]), &mut record)
            .unwrap_err();
        assert!(matches!(err, KomposerError::TlsSecretWithoutExpose));
    }

    #[test]
    fn test_node_port_requires_type() {
        let mut record = ServiceRecord {
            ports: vec![port(80)],
            ..Default::default()
        };
        let err = apply_labels(&labels(&[(LABEL_NODE_PORT_PORT, "30080")]), &mut record).unwrap_err();
        assert!(matches!(err, KomposerError::NodePortRequiresNodePortType));
    }

    #[test]
    fn test_node_port_with_multiple_ports() {
        let mut record = ServiceRecord {
            ports: vec![port(80), port(443)],
            ..Default::default()
        };
        let err = apply_labels(
            &labels(&[(LABEL_SERVICE_TYPE, "NodePort"), (LABEL_NODE_PORT_PORT, "30080")]),
            &mut record,
        )
        .unwrap_err();
        assert!(matches!(err, KomposerError::NodePortWithMultiplePorts));
    }

    #[test]
    fn test_node_port_single_port() {
        let mut record = ServiceRecord {
            ports: vec![port(80)],
            ..Default::default()
        };
        apply_labels(
            &labels(&[(LABEL_SERVICE_TYPE, "NodePort"), (LABEL_NODE_PORT_PORT, "30080")]),
            &mut record,
        )
        .unwrap();
        assert_eq!(record.node_port_port, Some(30080));
        assert!(record.labels.is_empty());
    }

    #[test]
    fn test_directive_lookup() {
        assert_eq!(Directive::from_key(LABEL_NODE_PORT_PORT), Some(Directive::NodePort));
        assert_eq!(Directive::from_key("kompose.service.healthcheck.readiness.test"), None);
    }
}
