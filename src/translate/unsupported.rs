//! Detection of compose features that cannot be translated

use crate::compose::config::Project;

pub const CONFIG_GID: &str = "long syntax config gid";
pub const CONFIG_UID: &str = "long syntax config uid";
pub const CREDENTIAL_SPEC: &str = "credential_spec";
pub const EXTERNAL_CONFIG: &str = "external config";

/// Tags for every untranslatable feature used by the project
///
/// A tag is reported once per occurrence.
pub fn unsupported_features(project: Option<&Project>) -> Vec<&'static str> {
    let Some(project) = project else {
        return Vec::new();
    };

    let mut found = Vec::new();

    for service in &project.services {
        for config in &service.configs {
            if config.gid.as_deref().is_some_and(|gid| !gid.is_empty()) {
                found.push(CONFIG_GID);
            }
            if config.uid.as_deref().is_some_and(|uid| !uid.is_empty()) {
                found.push(CONFIG_UID);
            }
        }

        if service.credential_spec.is_some() {
            found.push(CREDENTIAL_SPEC);
        }
    }

    for config in project.configs.values() {
        if config.external.as_ref().is_some_and(|e| e.is_external()) {
            found.push(EXTERNAL_CONFIG);
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::ProjectParser;

    #[test]
    fn test_missing_project() {
        assert!(unsupported_features(None).is_empty());
    }

    #[test]
    fn test_clean_project() {
        let project = ProjectParser::parse_str("services:\n  web:\n    image: nginx\n").unwrap();
        assert!(unsupported_features(Some(&project)).is_empty());
    }

    #[test]
    fn test_detects_unsupported_features() {
        let yaml = r#"
services:
  web:
    image: nginx
    configs:
      - source: site
        uid: "103"
        gid: "103"
      - source: plain
    credential_spec:
      file: spec.json
configs:
  site:
    file: ./site.conf
  shared:
    external: true
  named:
    external:
      name: org-wide
  local:
    external: false
"#;
        let project = ProjectParser::parse_str(yaml).unwrap();
        let mut found = unsupported_features(Some(&project));
        found.sort();
        assert_eq!(
            found,
            vec![CREDENTIAL_SPEC, EXTERNAL_CONFIG, EXTERNAL_CONFIG, CONFIG_GID, CONFIG_UID]
        );
    }
}
