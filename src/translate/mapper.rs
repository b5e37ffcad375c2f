//! Compose project to intermediate model mapping

use super::environment::{collect_environment, EnvLookup};
use super::healthcheck::{translate_liveness, translate_readiness};
use super::labels::apply_labels;
use super::network::resolve_networks;
use super::placement::translate_placement;
use super::ports::merge_ports;
use super::resources::translate_resources;
use super::volumes::{attach_volume_labels, normalize_volumes};
use crate::compose::config::{Project, ServiceConfig};
use crate::error::{KomposerError, Result};
use crate::model::{IntermediateModel, ServiceRecord, ServiceType, LOADED_FROM_COMPOSE};

/// Restart policy with no equivalent downstream
const RESTART_UNLESS_STOPPED: &str = "unless-stopped";
const RESTART_ALWAYS: &str = "always";

/// Build context that is kept as-is rather than joined onto the working dir
const CURRENT_DIR: &str = ".";

/// Endpoint mode that requests a node port service
const ENDPOINT_MODE_VIP: &str = "vip";

/// Normalize a compose service name into a record key
///
/// Dots and underscores become dashes, and the result is lower-cased.
pub fn normalize_service_name(name: &str) -> String {
    name.replace(['.', '_'], "-").to_lowercase()
}

/// Normalize a container name
pub fn normalize_container_name(name: &str) -> String {
    name.to_lowercase()
}

/// Join `path` onto `base` and lexically clean the result
fn join_clean(base: &str, path: &str) -> String {
    let joined = if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path)
    };
    let rooted = joined.starts_with('/');

    let mut parts: Vec<&str> = Vec::new();
    for part in joined.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|p| *p != "..") {
                    parts.pop();
                } else if !rooted {
                    parts.push("..");
                }
            }
            _ => parts.push(part),
        }
    }

    let body = parts.join("/");
    if rooted {
        format!("/{}", body)
    } else if body.is_empty() {
        CURRENT_DIR.to_string()
    } else {
        body
    }
}

/// Resolve a build context against the project working directory
pub fn resolve_context(working_dir: &str, context: &str) -> String {
    match context {
        "" => String::new(),
        CURRENT_DIR => CURRENT_DIR.to_string(),
        _ => join_clean(working_dir, context),
    }
}

/// Translates a loaded compose project into the intermediate model
pub struct ComposeMapper<'a> {
    /// Project being translated
    project: &'a Project,
    /// Values for environment variables declared without one
    env: &'a dyn EnvLookup,
}

impl<'a> ComposeMapper<'a> {
    /// Create a new mapper
    pub fn new(project: &'a Project, env: &'a dyn EnvLookup) -> Self {
        Self { project, env }
    }

    /// Translate every service
    ///
    /// Fails on the first service that cannot be translated; no partial
    /// model is returned.
    pub fn map(&self) -> Result<IntermediateModel> {
        tracing::debug!(
            "Translating project {} with {} services",
            self.project.name.as_deref().unwrap_or("<unnamed>"),
            self.project.services.len()
        );

        let mut model = IntermediateModel {
            loaded_from: LOADED_FROM_COMPOSE.to_string(),
            secrets: self.project.secrets.clone(),
            ..Default::default()
        };

        for service in &self.project.services {
            let record = self
                .map_service(service)
                .map_err(|e| e.in_service(&service.name))?;

            let key = normalize_service_name(&service.name);
            if key != service.name {
                tracing::warn!(
                    "Service name in docker-compose has been changed from {:?} to {:?}",
                    service.name,
                    key
                );
            }

            if let Some(existing) = model.services.get(&key) {
                return Err(KomposerError::DuplicateServiceName {
                    first: existing.name.clone(),
                    second: service.name.clone(),
                    normalized: key,
                });
            }
            model.services.insert(key, record);
        }

        attach_volume_labels(&mut model, &self.project.volumes);

        Ok(model)
    }

    /// Translate one service
    fn map_service(&self, service: &ServiceConfig) -> Result<ServiceRecord> {
        tracing::debug!("Translating service {}", service.name);

        let mut record = ServiceRecord {
            name: service.name.clone(),
            container_name: service
                .container_name
                .as_deref()
                .map(normalize_container_name)
                .unwrap_or_default(),
            image: service.image.clone().unwrap_or_default(),
            command: service.entrypoint.clone(),
            args: service.command.clone(),
            working_dir: service.working_dir.clone().unwrap_or_default(),
            user: service.user.clone().unwrap_or_default(),
            privileged: service.privileged,
            stdin: service.stdin_open,
            tty: service.tty,
            tmpfs: service.tmpfs.clone(),
            cap_add: service.cap_add.clone(),
            cap_drop: service.cap_drop.clone(),
            hostname: service.hostname.clone().unwrap_or_default(),
            domainname: service.domainname.clone().unwrap_or_default(),
            expose: service.expose.clone(),
            stop_grace_period: service.stop_grace_period.clone().unwrap_or_default(),
            annotations: service.labels.clone(),
            secrets: service.secrets.clone(),
            ..Default::default()
        };

        record.networks = resolve_networks(service, &self.project.networks);

        translate_resources(service.deploy.as_ref(), &mut record)?;

        if let Some(deploy) = &service.deploy {
            record.deploy_mode = deploy.mode.clone().unwrap_or_default();
            record.deploy_labels = deploy.labels.clone();
        }

        record.health_checks.liveness = translate_liveness(service.healthcheck.as_ref(), &service.labels)?;
        record.health_checks.readiness = translate_readiness(&service.labels)?;

        // deploy.restart_policy.condition takes precedence over restart
        record.restart = service.restart.clone().unwrap_or_default();
        if let Some(condition) = service
            .deploy
            .as_ref()
            .and_then(|d| d.restart_policy.as_ref())
            .and_then(|p| p.condition.clone())
        {
            record.restart = condition;
        }
        if record.restart == RESTART_UNLESS_STOPPED {
            tracing::warn!(
                "Restart policy 'unless-stopped' in service {} is not supported, convert it to 'always'",
                service.name
            );
            record.restart = RESTART_ALWAYS.to_string();
        }

        if let Some(deploy) = &service.deploy {
            record.replicas = deploy.replicas.unwrap_or(0);
            record.placement = translate_placement(&deploy.placement);
            record.deploy_update_config = deploy.update_config.clone();
        }

        if let Some(build) = &service.build {
            record.build = resolve_context(
                &self.project.working_dir,
                build.context.as_deref().unwrap_or_default(),
            );
            record.dockerfile = build.dockerfile.clone().unwrap_or_default();
            record.build_args = build.args.clone();
            record.build_labels = build.labels.clone();
        }

        record.environment = collect_environment(&service.environment, self.env);
        record.env_file = service.env_file.clone();

        record.ports = merge_ports(&service.ports, &record.expose);
        record.vol_list = normalize_volumes(&service.volumes);

        apply_labels(&service.labels, &mut record)?;

        record.configs = service.configs.clone();
        record.configs_metadata = self.project.configs.clone();

        if service
            .deploy
            .as_ref()
            .and_then(|d| d.endpoint_mode.as_deref())
            == Some(ENDPOINT_MODE_VIP)
        {
            record.service_type = Some(ServiceType::NodePort);
        }

        Ok(record)
    }
}

/// Translate a project, reading unset variables from `env`
pub fn translate_project(project: &Project, env: &dyn EnvLookup) -> Result<IntermediateModel> {
    ComposeMapper::new(project, env).map()
}
