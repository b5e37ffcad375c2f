//! Project document decoding
//!
//! Reads a project that an upstream loader has already normalized (long
//! syntax only, variables resolved) from YAML or JSON.

use super::config::Project;
use crate::error::{KomposerError, Result};
use std::path::Path;

/// Project document parser
pub struct ProjectParser;

impl ProjectParser {
    /// Parse a project document from path
    ///
    /// Files ending in `.json` are decoded as JSON, everything else as YAML.
    /// When the document carries no `working_dir`, the file's parent
    /// directory is used.
    pub fn parse_file(path: &Path) -> Result<Project> {
        let content = std::fs::read_to_string(path)?;

        let mut project = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            _ => Self::parse_str(&content)?,
        };

        if project.working_dir.is_empty() {
            if let Some(parent) = path.parent() {
                project.working_dir = parent.to_string_lossy().into_owned();
            }
        }

        tracing::debug!(
            "Loaded project document {} with {} services",
            path.display(),
            project.services.len()
        );

        Ok(project)
    }

    /// Parse a project document from a YAML string
    pub fn parse_str(content: &str) -> Result<Project> {
        serde_yaml::from_str(content).map_err(|e| KomposerError::Yaml(e.to_string()))
    }

    /// Parse a project document from a JSON string
    pub fn parse_json(content: &str) -> Result<Project> {
        Ok(serde_json::from_str(content)?)
    }
}
