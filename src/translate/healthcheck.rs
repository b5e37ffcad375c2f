//! Health check translation
//!
//! Liveness checks come from the compose `healthcheck` block, with the HTTP
//! probe target taken from labels. Readiness checks have no compose
//! equivalent and are described entirely through labels. Both read their
//! labels through [`scan_labels`], parametrized by the keys each one
//! recognizes.

use crate::compose::config::HealthcheckConfig;
use crate::error::{KomposerError, Result};
use crate::model::HealthCheck;
use std::collections::HashMap;

pub const LABEL_READINESS_DISABLE: &str = "kompose.service.healthcheck.readiness.disable";
pub const LABEL_READINESS_TEST: &str = "kompose.service.healthcheck.readiness.test";
pub const LABEL_READINESS_INTERVAL: &str = "kompose.service.healthcheck.readiness.interval";
pub const LABEL_READINESS_TIMEOUT: &str = "kompose.service.healthcheck.readiness.timeout";
pub const LABEL_READINESS_RETRIES: &str = "kompose.service.healthcheck.readiness.retries";
pub const LABEL_READINESS_START_PERIOD: &str = "kompose.service.healthcheck.readiness.start_period";
pub const LABEL_LIVENESS_HTTP_GET_PATH: &str = "kompose.service.healthcheck.liveness.http_get_path";
pub const LABEL_LIVENESS_HTTP_GET_PORT: &str = "kompose.service.healthcheck.liveness.http_get_port";

/// Leading test token that disables the check
const TEST_NONE: &str = "NONE";
/// Leading test tokens that only select exec or shell form
const TEST_CMD: &str = "CMD";
const TEST_CMD_SHELL: &str = "CMD-SHELL";

/// Label keys recognized for one kind of health check
#[derive(Debug, Clone, Copy, Default)]
pub struct HealthCheckLabelKeys {
    pub disable: Option<&'static str>,
    pub test: Option<&'static str>,
    pub interval: Option<&'static str>,
    pub timeout: Option<&'static str>,
    pub retries: Option<&'static str>,
    pub start_period: Option<&'static str>,
    pub http_get_path: Option<&'static str>,
    pub http_get_port: Option<&'static str>,
}

pub const LIVENESS_LABELS: HealthCheckLabelKeys = HealthCheckLabelKeys {
    disable: None,
    test: None,
    interval: None,
    timeout: None,
    retries: None,
    start_period: None,
    http_get_path: Some(LABEL_LIVENESS_HTTP_GET_PATH),
    http_get_port: Some(LABEL_LIVENESS_HTTP_GET_PORT),
};

pub const READINESS_LABELS: HealthCheckLabelKeys = HealthCheckLabelKeys {
    disable: Some(LABEL_READINESS_DISABLE),
    test: Some(LABEL_READINESS_TEST),
    interval: Some(LABEL_READINESS_INTERVAL),
    timeout: Some(LABEL_READINESS_TIMEOUT),
    retries: Some(LABEL_READINESS_RETRIES),
    start_period: Some(LABEL_READINESS_START_PERIOD),
    http_get_path: None,
    http_get_port: None,
};

/// Fields found in a service's labels; `None` when the label is absent
#[derive(Debug, Default, PartialEq)]
pub struct LabelFields {
    pub disable: Option<bool>,
    pub test: Option<Vec<String>>,
    pub interval: Option<u64>,
    pub timeout: Option<u64>,
    pub retries: Option<u64>,
    pub start_period: Option<u64>,
    pub http_path: Option<String>,
    pub http_port: Option<u16>,
}

/// Parse a duration string into whole seconds
///
/// Fractions of a second are truncated.
pub fn parse_seconds(field: &'static str, value: &str) -> Result<u64> {
    let trimmed = value.trim();
    if trimmed == "0" {
        return Ok(0);
    }

    humantime::parse_duration(trimmed)
        .map(|d| d.as_secs())
        .map_err(|source| KomposerError::InvalidDuration {
            field,
            value: value.to_string(),
            source,
        })
}

fn parse_flag(key: &str, value: &str) -> bool {
    match value.trim() {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => true,
        "0" | "f" | "F" | "FALSE" | "false" | "False" => false,
        other => {
            tracing::warn!("Label {} has non-boolean value {:?}, treating as false", key, other);
            false
        }
    }
}

fn parse_number<T: std::str::FromStr + Default>(key: &str, value: &str) -> T {
    value.trim().parse().unwrap_or_else(|_| {
        tracing::warn!("Label {} has non-numeric value {:?}, ignoring", key, value);
        T::default()
    })
}

/// Extract the health check fields named by `keys` from a label set
pub fn scan_labels(labels: &HashMap<String, String>, keys: &HealthCheckLabelKeys) -> Result<LabelFields> {
    let lookup = |key: Option<&'static str>| key.and_then(|k| labels.get(k).map(|v| (k, v)));
    let mut fields = LabelFields::default();

    if let Some((key, value)) = lookup(keys.disable) {
        fields.disable = Some(parse_flag(key, value));
    }

    if let Some((_, value)) = lookup(keys.test) {
        if !value.is_empty() {
            let test = shlex::split(value)
                .ok_or_else(|| KomposerError::InvalidHealthcheckTest(value.clone()))?;
            fields.test = Some(test);
        }
    }

    if let Some((_, value)) = lookup(keys.interval) {
        fields.interval = Some(parse_seconds("interval", value)?);
    }

    if let Some((_, value)) = lookup(keys.timeout) {
        fields.timeout = Some(parse_seconds("timeout", value)?);
    }

    if let Some((key, value)) = lookup(keys.retries) {
        fields.retries = Some(parse_number(key, value));
    }

    if let Some((_, value)) = lookup(keys.start_period) {
        fields.start_period = Some(parse_seconds("startPeriod", value)?);
    }

    if let Some((_, value)) = lookup(keys.http_get_path) {
        fields.http_path = Some(value.clone());
    }

    if let Some((key, value)) = lookup(keys.http_get_port) {
        fields.http_port = Some(parse_number(key, value));
    }

    Ok(fields)
}

/// Build the liveness check from the compose healthcheck block
///
/// Returns `None` when there is no block or it is disabled.
pub fn translate_liveness(
    healthcheck: Option<&HealthcheckConfig>,
    labels: &HashMap<String, String>,
) -> Result<Option<HealthCheck>> {
    let Some(check) = healthcheck.filter(|c| !c.disable) else {
        return Ok(None);
    };

    let mut liveness = HealthCheck::default();

    if let Some(timeout) = &check.timeout {
        liveness.timeout = parse_seconds("timeout", timeout)?;
    }
    if let Some(interval) = &check.interval {
        liveness.interval = parse_seconds("interval", interval)?;
    }
    if let Some(start_period) = &check.start_period {
        liveness.start_period = parse_seconds("startPeriod", start_period)?;
    }
    liveness.retries = check.retries.unwrap_or(0);

    // First element is the CMD / CMD-SHELL marker
    liveness.test = check.test.iter().skip(1).cloned().collect();

    let fields = scan_labels(labels, &LIVENESS_LABELS)?;
    liveness.http_path = fields.http_path.unwrap_or_default();
    liveness.http_port = fields.http_port.unwrap_or(0);

    Ok(Some(liveness))
}

/// Build the readiness check from labels
///
/// Returns `None` unless a non-empty, enabled test command remains after
/// the marker tokens are stripped.
pub fn translate_readiness(labels: &HashMap<String, String>) -> Result<Option<HealthCheck>> {
    let fields = scan_labels(labels, &READINESS_LABELS)?;

    let mut test = fields.test.unwrap_or_else(|| vec![TEST_CMD.to_string()]);
    let mut disable = fields.disable.unwrap_or(false);

    if test.first().map(String::as_str) == Some(TEST_NONE) {
        disable = true;
        test.remove(0);
    }
    if matches!(test.first().map(String::as_str), Some(TEST_CMD | TEST_CMD_SHELL)) {
        test.remove(0);
    }

    let has_command = test.first().is_some_and(|t| !t.is_empty());
    if disable || !has_command {
        return Ok(None);
    }

    Ok(Some(HealthCheck {
        test,
        timeout: fields.timeout.unwrap_or(0),
        interval: fields.interval.unwrap_or(0),
        retries: fields.retries.unwrap_or(0),
        start_period: fields.start_period.unwrap_or(0),
        ..Default::default()
    }))
}
