//! Intermediate service model
//!
//! The orchestrator-agnostic shape a compose project is translated into.
//! Manifest generators consume these records; nothing in here knows about
//! compose syntax any more.

use crate::compose::config::{ConfigConfig, ConfigRef, SecretConfig, SecretRef, UpdateConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Source tag recorded on every model built from a compose project
pub const LOADED_FROM_COMPOSE: &str = "compose";

/// Translated project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntermediateModel {
    /// Service records keyed by normalized service name
    pub services: HashMap<String, ServiceRecord>,
    /// Loader that produced this model
    pub loaded_from: String,
    /// Project-level secrets, copied through
    pub secrets: HashMap<String, SecretConfig>,
}

/// Service type requested through the `kompose.service.type` label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceType {
    ClusterIP,
    NodePort,
    LoadBalancer,
    Headless,
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceType::ClusterIP => write!(f, "ClusterIP"),
            ServiceType::NodePort => write!(f, "NodePort"),
            ServiceType::LoadBalancer => write!(f, "LoadBalancer"),
            ServiceType::Headless => write!(f, "Headless"),
        }
    }
}

/// One translated service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceRecord {
    /// Compose service name, before normalization
    pub name: String,
    pub container_name: String,
    pub image: String,
    /// Entrypoint
    pub command: Vec<String>,
    /// Command
    pub args: Vec<String>,
    pub working_dir: String,
    pub user: String,
    pub privileged: bool,
    pub stdin: bool,
    pub tty: bool,
    pub tmpfs: Vec<String>,
    pub cap_add: Vec<String>,
    pub cap_drop: Vec<String>,
    pub hostname: String,
    pub domainname: String,
    pub expose: Vec<String>,
    pub stop_grace_period: String,

    /// Every service label, verbatim
    pub annotations: HashMap<String, String>,
    /// Labels not consumed as translation directives
    pub labels: HashMap<String, String>,

    pub environment: Vec<EnvVar>,
    pub env_file: Vec<String>,
    pub ports: Vec<PortEntry>,
    /// Compact `source[:target][:ro]` volume specs
    pub vol_list: Vec<String>,
    /// Parsed volume bindings, filled after all services are translated
    pub volumes: Vec<VolumeBinding>,
    pub networks: Vec<String>,

    /// Memory limit in bytes
    pub mem_limit: u64,
    /// Memory reservation in bytes
    pub mem_reservation: u64,
    /// CPU limit in milli-cores
    pub cpu_limit: u64,
    /// CPU reservation in milli-cores
    pub cpu_reservation: u64,

    pub deploy_mode: String,
    pub deploy_labels: HashMap<String, String>,
    pub deploy_update_config: Option<UpdateConfig>,
    pub restart: String,
    pub replicas: u64,
    pub placement: Placement,
    pub health_checks: HealthChecks,

    /// Resolved build context path
    pub build: String,
    pub dockerfile: String,
    pub build_args: HashMap<String, Option<String>>,
    pub build_labels: HashMap<String, String>,

    pub secrets: Vec<SecretRef>,
    pub configs: Vec<ConfigRef>,
    pub configs_metadata: HashMap<String, ConfigConfig>,

    pub service_type: Option<ServiceType>,
    /// Hostname(s) to expose the service on
    pub expose_service: String,
    pub expose_service_tls: String,
    pub node_port_port: Option<u16>,
    pub image_pull_secret: String,
    pub image_pull_policy: String,
}

/// Environment binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

/// Port entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortEntry {
    pub host_port: u16,
    pub container_port: u16,
    /// Always empty for compose projects; host networking is not modelled
    pub host_ip: String,
    /// Upper-cased protocol, e.g. `TCP`
    pub protocol: String,
}

/// Volume binding parsed from a compact volume spec
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeBinding {
    /// Named volume, empty for bind mounts and anonymous volumes
    pub volume_name: String,
    pub host: String,
    pub container: String,
    pub mode: String,
    pub mount_path: String,
    /// From the volume's `kompose.volume.size` label
    pub pvc_size: String,
    /// From the volume's `kompose.volume.selector` label
    pub selector_value: String,
}

/// Placement constraints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Node key must equal value
    pub positive_constraints: HashMap<String, String>,
    /// Node key must not equal value
    pub negative_constraints: HashMap<String, String>,
}

/// Liveness and readiness checks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthChecks {
    pub liveness: Option<HealthCheck>,
    pub readiness: Option<HealthCheck>,
}

/// Health check, with all durations in seconds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Command and arguments; empty for HTTP checks
    pub test: Vec<String>,
    pub http_path: String,
    pub http_port: u16,
    pub timeout: u64,
    pub interval: u64,
    pub retries: u64,
    pub start_period: u64,
    pub disable: bool,
}
