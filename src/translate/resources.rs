//! Deploy resource translation

use crate::compose::config::{DeployConfig, ResourceSpec};
use crate::error::{KomposerError, Result};
use crate::model::ServiceRecord;

/// Convert a fractional CPU count ("0.5") to milli-cores (500)
///
/// Sub-milli-core precision is truncated.
pub fn cpu_to_millicores(field: &'static str, cpus: &str) -> Result<u64> {
    let value: f64 = cpus
        .trim()
        .parse()
        .map_err(|source| KomposerError::InvalidCpu {
            field,
            value: cpus.to_string(),
            source,
        })?;

    Ok((value * 1000.0) as u64)
}

/// Memory bytes and CPU milli-cores for one resource block
fn translate_spec(field: &'static str, spec: &ResourceSpec) -> Result<(u64, u64)> {
    let memory = spec.memory.unwrap_or(0);
    let cpu = match spec.cpus.as_deref().filter(|c| !c.is_empty()) {
        Some(cpus) => cpu_to_millicores(field, cpus)?,
        None => 0,
    };
    Ok((memory, cpu))
}

/// Copy deploy limits and reservations onto the record
///
/// Records without a deploy block, or whose deploy block has neither
/// limits nor reservations, keep zero for every resource field.
pub fn translate_resources(deploy: Option<&DeployConfig>, record: &mut ServiceRecord) -> Result<()> {
    let Some(deploy) = deploy else {
        return Ok(());
    };

    if let Some(limits) = &deploy.resources.limits {
        let (memory, cpu) = translate_spec("limits", limits)?;
        record.mem_limit = memory;
        record.cpu_limit = cpu;
    }

    if let Some(reservations) = &deploy.resources.reservations {
        let (memory, cpu) = translate_spec("reservation", reservations)?;
        record.mem_reservation = memory;
        record.cpu_reservation = cpu;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::config::ResourcesConfig;

    fn deploy(limits: Option<ResourceSpec>, reservations: Option<ResourceSpec>) -> DeployConfig {
        DeployConfig {
            resources: ResourcesConfig {
                limits,
                reservations,
            },
            ..Default::default()
        }
    }

    fn spec(cpus: Option<&str>, memory: Option<u64>) -> ResourceSpec {
        ResourceSpec {
            cpus: cpus.map(str::to_string),
            memory,
            pids: None,
        }
    }

    #[test]
    fn test_cpu_to_millicores() {
        assert_eq!(cpu_to_millicores("limits", "0.5").unwrap(), 500);
        assert_eq!(cpu_to_millicores("limits", "2").unwrap(), 2000);
        assert_eq!(cpu_to_millicores("limits", "0.0015").unwrap(), 1);
    }

    #[test]
    fn test_cpu_malformed() {
        let err = cpu_to_millicores("limits", "abc").unwrap_err();
        assert!(matches!(err, KomposerError::InvalidCpu { field: "limits", .. }));
    }

    #[test]
    fn test_limits_and_reservations() {
        let deploy = deploy(
            Some(spec(Some("0.5"), Some(512 * 1024 * 1024))),
            Some(spec(Some("0.25"), Some(128 * 1024 * 1024))),
        );
        let mut record = ServiceRecord::default();

        translate_resources(Some(&deploy), &mut record).unwrap();
        assert_eq!(record.cpu_limit, 500);
        assert_eq!(record.mem_limit, 536_870_912);
        assert_eq!(record.cpu_reservation, 250);
        assert_eq!(record.mem_reservation, 134_217_728);
    }

    #[test]
    fn test_memory_only() {
        let deploy = deploy(Some(spec(None, Some(1024))), None);
        let mut record = ServiceRecord::default();

        translate_resources(Some(&deploy), &mut record).unwrap();
        assert_eq!(record.mem_limit, 1024);
        assert_eq!(record.cpu_limit, 0);
        assert_eq!(record.mem_reservation, 0);
    }

    #[test]
    fn test_no_deploy() {
        let mut record = ServiceRecord::default();
        translate_resources(None, &mut record).unwrap();
        assert_eq!(record.cpu_limit, 0);
        assert_eq!(record.mem_limit, 0);
    }

    #[test]
    fn test_bad_reservation() {
        let deploy = deploy(None, Some(spec(Some("half"), None)));
        let mut record = ServiceRecord::default();
        let err = translate_resources(Some(&deploy), &mut record).unwrap_err();
        assert!(matches!(err, KomposerError::InvalidCpu { field: "reservation", .. }));
    }
}
