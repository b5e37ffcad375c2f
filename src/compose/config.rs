//! Loaded Docker Compose project types
//!
//! These mirror a compose project after loading: short syntax already
//! expanded, variables interpolated and override files merged. Everything
//! here is read-only input to the translation pass.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A loaded compose project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    /// Project name
    #[serde(default)]
    pub name: Option<String>,
    /// Directory the project was loaded from
    #[serde(default)]
    pub working_dir: String,
    /// Services, in declaration order
    #[serde(default, with = "ordered_services")]
    pub services: Vec<ServiceConfig>,
    /// Networks
    #[serde(default)]
    pub networks: HashMap<String, NetworkConfig>,
    /// Volumes
    #[serde(default)]
    pub volumes: HashMap<String, VolumeConfig>,
    /// Secrets
    #[serde(default)]
    pub secrets: HashMap<String, SecretConfig>,
    /// Configs
    #[serde(default)]
    pub configs: HashMap<String, ConfigConfig>,
}

impl Project {
    /// Look up a service by its compose name
    pub fn service(&self, name: &str) -> Option<&ServiceConfig> {
        self.services.iter().find(|s| s.name == name)
    }
}

/// Service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name (the key under `services:`)
    #[serde(default)]
    pub name: String,
    /// Image name
    #[serde(default)]
    pub image: Option<String>,
    /// Build configuration
    #[serde(default)]
    pub build: Option<BuildConfig>,
    /// Entrypoint
    #[serde(default)]
    pub entrypoint: Vec<String>,
    /// Command to run
    #[serde(default)]
    pub command: Vec<String>,
    /// Container name
    #[serde(default)]
    pub container_name: Option<String>,
    /// Hostname
    #[serde(default)]
    pub hostname: Option<String>,
    /// Domain name
    #[serde(default)]
    pub domainname: Option<String>,
    /// Working directory
    #[serde(default)]
    pub working_dir: Option<String>,
    /// User
    #[serde(default)]
    pub user: Option<String>,
    /// Privileged mode
    #[serde(default)]
    pub privileged: bool,
    /// Stdin open
    #[serde(default)]
    pub stdin_open: bool,
    /// TTY
    #[serde(default)]
    pub tty: bool,
    /// Tmpfs mounts
    #[serde(default)]
    pub tmpfs: Vec<String>,
    /// Capabilities to add
    #[serde(default)]
    pub cap_add: Vec<String>,
    /// Capabilities to drop
    #[serde(default)]
    pub cap_drop: Vec<String>,
    /// Exposed ports, `port[/protocol]`
    #[serde(default)]
    pub expose: Vec<String>,
    /// Port mappings
    #[serde(default)]
    pub ports: Vec<PortConfig>,
    /// Volume mounts
    #[serde(default)]
    pub volumes: Vec<VolumeMount>,
    /// Networks to connect to
    #[serde(default)]
    pub networks: HashMap<String, Option<ServiceNetworkConfig>>,
    /// Environment variables; `None` means declared without a value
    #[serde(default)]
    pub environment: HashMap<String, Option<String>>,
    /// Environment files
    #[serde(default)]
    pub env_file: Vec<String>,
    /// Labels
    #[serde(default)]
    pub labels: HashMap<String, String>,
    /// Deploy configuration
    #[serde(default)]
    pub deploy: Option<DeployConfig>,
    /// Healthcheck configuration
    #[serde(default)]
    pub healthcheck: Option<HealthcheckConfig>,
    /// Restart policy
    #[serde(default)]
    pub restart: Option<String>,
    /// Stop grace period
    #[serde(default)]
    pub stop_grace_period: Option<String>,
    /// Secrets
    #[serde(default)]
    pub secrets: Vec<SecretRef>,
    /// Configs
    #[serde(default)]
    pub configs: Vec<ConfigRef>,
    /// Windows credential spec
    #[serde(default)]
    pub credential_spec: Option<CredentialSpec>,
}

/// Build configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Build context
    #[serde(default)]
    pub context: Option<String>,
    /// Dockerfile path
    #[serde(default)]
    pub dockerfile: Option<String>,
    /// Build arguments
    #[serde(default)]
    pub args: HashMap<String, Option<String>>,
    /// Labels
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

/// Port mapping (long syntax)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortConfig {
    /// Target port in container
    pub target: u16,
    /// Published port on host
    #[serde(default)]
    pub published: Option<u16>,
    /// Host IP to bind to
    #[serde(default)]
    pub host_ip: Option<String>,
    /// Protocol (tcp/udp)
    #[serde(default)]
    pub protocol: Option<String>,
    /// Mode (host/ingress)
    #[serde(default)]
    pub mode: Option<String>,
}

/// Volume mount (long syntax)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VolumeMount {
    /// Mount type (volume, bind, tmpfs, npipe)
    #[serde(rename = "type", default)]
    pub mount_type: Option<String>,
    /// Source path or volume name
    #[serde(default)]
    pub source: String,
    /// Target path in container
    #[serde(default)]
    pub target: Option<String>,
    /// Read only
    #[serde(default)]
    pub read_only: bool,
}

/// Service network configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceNetworkConfig {
    /// Aliases
    #[serde(default)]
    pub aliases: Vec<String>,
    /// IPv4 address
    #[serde(default)]
    pub ipv4_address: Option<String>,
    /// IPv6 address
    #[serde(default)]
    pub ipv6_address: Option<String>,
}

/// Deploy configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Deployment mode (replicated, global)
    #[serde(default)]
    pub mode: Option<String>,
    /// Number of replicas
    #[serde(default)]
    pub replicas: Option<u64>,
    /// Labels
    #[serde(default)]
    pub labels: HashMap<String, String>,
    /// Placement constraints
    #[serde(default)]
    pub placement: PlacementConfig,
    /// Resource limits and reservations
    #[serde(default)]
    pub resources: ResourcesConfig,
    /// Restart policy
    #[serde(default)]
    pub restart_policy: Option<RestartPolicyConfig>,
    /// Update configuration
    #[serde(default)]
    pub update_config: Option<UpdateConfig>,
    /// Endpoint mode (vip, dnsrr)
    #[serde(default)]
    pub endpoint_mode: Option<String>,
}

/// Placement configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlacementConfig {
    /// Constraint expressions, e.g. `node.hostname == worker-1`
    #[serde(default)]
    pub constraints: Vec<String>,
}

/// Resources configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourcesConfig {
    /// Resource limits
    #[serde(default)]
    pub limits: Option<ResourceSpec>,
    /// Resource reservations
    #[serde(default)]
    pub reservations: Option<ResourceSpec>,
}

/// Resource specification
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceSpec {
    /// CPUs as a fraction of a core, e.g. "0.5"
    #[serde(default)]
    pub cpus: Option<String>,
    /// Memory in bytes
    #[serde(default)]
    pub memory: Option<u64>,
    /// PIDs limit
    #[serde(default)]
    pub pids: Option<i64>,
}

/// Restart policy configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestartPolicyConfig {
    /// Condition (none, on-failure, any)
    #[serde(default)]
    pub condition: Option<String>,
    /// Delay between retries
    #[serde(default)]
    pub delay: Option<String>,
    /// Maximum attempts
    #[serde(default)]
    pub max_attempts: Option<u32>,
    /// Window for counting retries
    #[serde(default)]
    pub window: Option<String>,
}

/// Update/rollback configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateConfig {
    /// Parallelism
    #[serde(default)]
    pub parallelism: Option<u32>,
    /// Delay between updates
    #[serde(default)]
    pub delay: Option<String>,
    /// Failure action
    #[serde(default)]
    pub failure_action: Option<String>,
    /// Monitor duration
    #[serde(default)]
    pub monitor: Option<String>,
    /// Max failure ratio
    #[serde(default)]
    pub max_failure_ratio: Option<f64>,
    /// Order (start-first, stop-first)
    #[serde(default)]
    pub order: Option<String>,
}

/// Healthcheck configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthcheckConfig {
    /// Test command; the first element is the mode (`CMD`, `CMD-SHELL`, `NONE`)
    #[serde(default)]
    pub test: Vec<String>,
    /// Interval
    #[serde(default)]
    pub interval: Option<String>,
    /// Timeout
    #[serde(default)]
    pub timeout: Option<String>,
    /// Retries
    #[serde(default)]
    pub retries: Option<u64>,
    /// Start period
    #[serde(default)]
    pub start_period: Option<String>,
    /// Disable healthcheck
    #[serde(default)]
    pub disable: bool,
}

/// Network configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Name
    #[serde(default)]
    pub name: Option<String>,
    /// Driver
    #[serde(default)]
    pub driver: Option<String>,
    /// External network
    #[serde(default)]
    pub external: Option<ExternalConfig>,
    /// Labels
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

/// Volume configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VolumeConfig {
    /// Name
    #[serde(default)]
    pub name: Option<String>,
    /// Driver
    #[serde(default)]
    pub driver: Option<String>,
    /// External volume
    #[serde(default)]
    pub external: Option<ExternalConfig>,
    /// Labels
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

/// External resource configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExternalConfig {
    /// Boolean
    Bool(bool),
    /// With name
    Named { name: String },
}

impl ExternalConfig {
    /// Whether the resource is managed outside the project
    pub fn is_external(&self) -> bool {
        match self {
            ExternalConfig::Bool(external) => *external,
            ExternalConfig::Named { .. } => true,
        }
    }
}

/// Secret configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecretConfig {
    /// Name
    #[serde(default)]
    pub name: Option<String>,
    /// File path
    #[serde(default)]
    pub file: Option<String>,
    /// Environment variable
    #[serde(default)]
    pub environment: Option<String>,
    /// External secret
    #[serde(default)]
    pub external: Option<ExternalConfig>,
}

/// Config configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigConfig {
    /// Name
    #[serde(default)]
    pub name: Option<String>,
    /// File path
    #[serde(default)]
    pub file: Option<String>,
    /// External config
    #[serde(default)]
    pub external: Option<ExternalConfig>,
}

/// Secret reference in service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecretRef {
    /// Source secret name
    pub source: String,
    /// Target path in container
    #[serde(default)]
    pub target: Option<String>,
    /// UID
    #[serde(default)]
    pub uid: Option<String>,
    /// GID
    #[serde(default)]
    pub gid: Option<String>,
    /// Mode
    #[serde(default)]
    pub mode: Option<u32>,
}

/// Config reference in service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigRef {
    /// Source config name
    pub source: String,
    /// Target path in container
    #[serde(default)]
    pub target: Option<String>,
    /// UID
    #[serde(default)]
    pub uid: Option<String>,
    /// GID
    #[serde(default)]
    pub gid: Option<String>,
    /// Mode
    #[serde(default)]
    pub mode: Option<u32>,
}

/// Credential spec (Windows containers)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialSpec {
    #[serde(default)]
    pub config: Option<String>,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub registry: Option<String>,
}

/// Services are written as a `name -> service` mapping but kept as an
/// ordered list, so translation runs in declaration order.
mod ordered_services {
    use super::ServiceConfig;
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S>(services: &[ServiceConfig], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(services.len()))?;
        for service in services {
            map.serialize_entry(&service.name, service)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<ServiceConfig>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ServicesVisitor;

        impl<'de> Visitor<'de> for ServicesVisitor {
            type Value = Vec<ServiceConfig>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of service name to service")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut services = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, service)) =
                    access.next_entry::<String, Option<ServiceConfig>>()?
                {
                    let mut service = service.unwrap_or_default();
                    service.name = name;
                    services.push(service);
                }
                Ok(services)
            }
        }

        deserializer.deserialize_map(ServicesVisitor)
    }
}
