//! Volume normalization and volume label scanning

use crate::compose::config::{VolumeConfig, VolumeMount};
use crate::model::{IntermediateModel, VolumeBinding};
use std::collections::HashMap;

/// Volume label carrying the requested claim size
pub const LABEL_VOLUME_SIZE: &str = "kompose.volume.size";
/// Volume label carrying the claim selector
pub const LABEL_VOLUME_SELECTOR: &str = "kompose.volume.selector";

/// Convert long-syntax volume mounts to compact `source[:target][:ro]` specs
pub fn normalize_volumes(volumes: &[VolumeMount]) -> Vec<String> {
    volumes
        .iter()
        .map(|vol| {
            let mut spec = vol.source.clone();
            if let Some(target) = vol.target.as_deref().filter(|t| !t.is_empty()) {
                spec.push(':');
                spec.push_str(target);
            }
            if vol.read_only {
                spec.push_str(":ro");
            }
            spec
        })
        .collect()
}

fn is_path(part: &str) -> bool {
    part.contains('/') || part == "." || part == "~"
}

/// Access-mode suffix such as `ro`, `rw` or `ro,z`
fn parse_mode_suffix(part: &str) -> Option<(String, bool)> {
    let mut mode = String::new();
    let mut relabel = false;
    for option in part.split(',') {
        match option {
            "ro" | "rw" => mode = option.to_string(),
            "z" | "Z" => relabel = true,
            _ => return None,
        }
    }
    Some((mode, relabel))
}

/// Parse a compact volume spec, `[name:|host:]container[:mode]`
pub fn parse_volume(spec: &str) -> Option<VolumeBinding> {
    let mut parts: Vec<&str> = spec.split(':').filter(|p| !p.is_empty()).collect();
    let mut binding = VolumeBinding::default();

    if let Some(first) = parts.first() {
        if parts.len() > 1 && !is_path(first) {
            binding.volume_name = first.to_string();
            parts.remove(0);
        }
    }

    if parts.len() > 1 {
        if let Some((mode, relabel)) = parts.last().and_then(|last| parse_mode_suffix(last)) {
            if relabel {
                tracing::warn!(
                    "Volume mount {:?} will be mounted without labeling support, :z or :Z not supported",
                    spec
                );
            }
            binding.mode = mode;
            parts.pop();
        }
    }

    match parts.as_slice() {
        [container] => binding.container = container.to_string(),
        [host, container] if binding.volume_name.is_empty() => {
            binding.host = host.to_string();
            binding.container = container.to_string();
        }
        _ => return None,
    }

    let source = if binding.volume_name.is_empty() {
        &binding.host
    } else {
        &binding.volume_name
    };
    binding.mount_path = if source.is_empty() {
        binding.container.clone()
    } else {
        format!("{}:{}", source, binding.container)
    };

    Some(binding)
}

/// Size and selector hints from a named volume's labels
fn volume_label_hints(name: &str, volumes: &HashMap<String, VolumeConfig>) -> (String, String) {
    let Some(volume) = volumes.get(name) else {
        return (String::new(), String::new());
    };

    let size = volume.labels.get(LABEL_VOLUME_SIZE).cloned().unwrap_or_default();
    let selector = volume
        .labels
        .get(LABEL_VOLUME_SELECTOR)
        .cloned()
        .unwrap_or_default();
    (size, selector)
}

/// Resolve every record's volume specs into bindings and attach the size
/// and selector hints of the named volumes they refer to
pub fn attach_volume_labels(model: &mut IntermediateModel, volumes: &HashMap<String, VolumeConfig>) {
    for (name, record) in model.services.iter_mut() {
        let mut bindings = Vec::with_capacity(record.vol_list.len());

        for spec in &record.vol_list {
            let Some(mut binding) = parse_volume(spec) else {
                tracing::warn!("Service {}: could not parse volume {:?}", name, spec);
                continue;
            };

            if !binding.volume_name.is_empty() {
                let (size, selector) = volume_label_hints(&binding.volume_name, volumes);
                binding.pvc_size = size;
                binding.selector_value = selector;
            }

            bindings.push(binding);
        }

        record.volumes = bindings;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ServiceRecord;

    fn mount(source: &str, target: Option<&str>, read_only: bool) -> VolumeMount {
        VolumeMount {
            source: source.to_string(),
            target: target.map(str::to_string),
            read_only,
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_volumes() {
        let specs = normalize_volumes(&[
            mount("/a", Some("/b"), true),
            mount("/a", None, false),
            mount("data", Some("/var/lib/data"), false),
        ]);
        assert_eq!(specs, vec!["/a:/b:ro", "/a", "data:/var/lib/data"]);
    }

    #[test]
    fn test_parse_named_volume() {
        let binding = parse_volume("data:/var/lib/data:ro").unwrap();
        assert_eq!(binding.volume_name, "data");
        assert_eq!(binding.host, "");
        assert_eq!(binding.container, "/var/lib/data");
        assert_eq!(binding.mode, "ro");
        assert_eq!(binding.mount_path, "data:/var/lib/data");
    }

    #[test]
    fn test_parse_bind_mount() {
        let binding = parse_volume("./src:/app").unwrap();
        assert_eq!(binding.volume_name, "");
        assert_eq!(binding.host, "./src");
        assert_eq!(binding.container, "/app");
        assert_eq!(binding.mode, "");
    }

    #[test]
    fn test_parse_anonymous_volume() {
        let binding = parse_volume("/cache").unwrap();
        assert_eq!(binding.container, "/cache");
        assert_eq!(binding.mount_path, "/cache");
    }

    #[test]
    fn test_parse_invalid_volume() {
        assert!(parse_volume("").is_none());
        assert!(parse_volume("a:/b:/c:/d").is_none());
    }

    #[test]
    fn test_attach_volume_labels() {
        let mut volumes = HashMap::new();
        volumes.insert(
            "data".to_string(),
            VolumeConfig {
                labels: HashMap::from([
                    (LABEL_VOLUME_SIZE.to_string(), "5Gi".to_string()),
                    (LABEL_VOLUME_SELECTOR.to_string(), "fast".to_string()),
                ]),
                ..Default::default()
            },
        );

        let mut model = IntermediateModel::default();
        model.services.insert(
            "db".to_string(),
            ServiceRecord {
                vol_list: vec!["data:/var/lib/data".to_string(), "./conf:/etc/db".to_string()],
                ..Default::default()
            },
        );

        attach_volume_labels(&mut model, &volumes);

        let bindings = &model.services["db"].volumes;
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[0].pvc_size, "5Gi");
        assert_eq!(bindings[0].selector_value, "fast");
        assert_eq!(bindings[1].pvc_size, "");
        assert_eq!(bindings[1].selector_value, "");
    }
}
