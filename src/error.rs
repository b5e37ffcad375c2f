//! Error types for Komposer

use thiserror::Error;

/// Result type for Komposer operations
pub type Result<T> = std::result::Result<T, KomposerError>;

/// Komposer error types
#[derive(Error, Debug)]
pub enum KomposerError {
    #[error("unable to parse health check {field} variable {value:?}: {source}")]
    InvalidDuration {
        field: &'static str,
        value: String,
        #[source]
        source: humantime::DurationError,
    },

    #[error("unable to convert cpu {field} resources value {value:?}: {source}")]
    InvalidCpu {
        field: &'static str,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    #[error("unknown service type {0:?}, supported values are 'nodeport, clusterip, headless or loadbalancer'")]
    InvalidServiceType(String),

    #[error("kompose.service.expose.tls-secret was specified without kompose.service.expose")]
    TlsSecretWithoutExpose,

    #[error("kompose.service.type must be nodeport when assign node port value")]
    NodePortRequiresNodePortType,

    #[error("cannot set kompose.service.nodeport.port when service has multiple ports")]
    NodePortWithMultiplePorts,

    #[error("unable to split readiness test command: {0:?}")]
    InvalidHealthcheckTest(String),

    #[error("services {first:?} and {second:?} both normalize to {normalized:?}")]
    DuplicateServiceName {
        first: String,
        second: String,
        normalized: String,
    },

    #[error("service {name:?}: {source}")]
    Service {
        name: String,
        #[source]
        source: Box<KomposerError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(String),
}

impl KomposerError {
    /// Wrap an error with the name of the service that produced it
    pub fn in_service(self, name: &str) -> Self {
        KomposerError::Service {
            name: name.to_string(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with service context stripped
    pub fn root(&self) -> &KomposerError {
        match self {
            KomposerError::Service { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_context_message() {
        let err = KomposerError::TlsSecretWithoutExpose.in_service("web");
        assert_eq!(
            err.to_string(),
            "service \"web\": kompose.service.expose.tls-secret was specified without kompose.service.expose"
        );
        assert!(matches!(err.root(), KomposerError::TlsSecretWithoutExpose));
    }
}
