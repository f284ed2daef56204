//! On-disk ledger model
//!
//! The ledger persists as a YAML mapping keyed by component name. Fields
//! carry kebab-case keys; optional fields round-trip through the variant
//! defaults — absent on disk means default in memory, default in memory
//! means absent on disk.

use serde::{Deserialize, Serialize};

use crate::component::{self, Component, ComponentKind, DOCKER_REPO_DEFAULT, FILTER_DEFAULT};
use crate::error::ConfigError;

/// Persisted fields for one component
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct PersistedComponent {
    pub component_type: String,
    pub current_version: String,
    /// Informational; rewritten on every save
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker_repo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_versions: Option<Vec<String>>,
}

impl PersistedComponent {
    /// Capture a component, omitting fields that still hold their defaults
    pub fn from_component(component: &Component) -> Self {
        let docker_repo = match component.kind {
            ComponentKind::DockerImage if component.repository != DOCKER_REPO_DEFAULT => {
                Some(component.repository.clone())
            }
            _ => None,
        };

        Self {
            component_type: component.kind.as_str().to_string(),
            current_version: component.current_version_tag.clone(),
            next_version: Some(component.next_version_tag.clone()),
            docker_repo,
            prefix: component.prefix.clone(),
            filter: (component.filter != FILTER_DEFAULT).then(|| component.filter.clone()),
            files: (!component.files.is_empty()).then(|| component.files.clone()),
            exclude_versions: (!component.exclude_versions.is_empty())
                .then(|| component.exclude_versions.clone()),
        }
    }

    /// Rebuild a component through the factory, overlaying the optional
    /// fields over the variant defaults.
    pub fn into_component(self, name: &str) -> Result<Component, ConfigError> {
        let mut c = component::create(
            &self.component_type,
            name,
            &self.current_version,
            self.docker_repo.as_deref(),
        )?;

        c.prefix = self.prefix;
        if let Some(pattern) = &self.filter {
            c.set_filter(pattern)?;
        }
        if let Some(files) = self.files {
            c.files = files;
        }
        if let Some(excluded) = self.exclude_versions {
            c.exclude_versions = excluded;
        }
        Ok(c)
    }
}

/// Parse the ledger document, preserving the on-disk component order
pub fn parse_document(
    path: &std::path::Path,
    content: &str,
) -> Result<Vec<(String, PersistedComponent)>, ConfigError> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mapping: serde_yaml::Mapping = serde_yaml::from_str(content)
        .map_err(|e| ConfigError::yaml_parse_error(path, e.to_string()))?;

    let mut entries = Vec::with_capacity(mapping.len());
    for (key, value) in mapping {
        let name: String = serde_yaml::from_value(key)
            .map_err(|e| ConfigError::yaml_parse_error(path, e.to_string()))?;
        let persisted: PersistedComponent = serde_yaml::from_value(value).map_err(|e| {
            ConfigError::yaml_parse_error(path, format!("component '{}': {}", name, e))
        })?;
        entries.push((name, persisted));
    }
    Ok(entries)
}

/// Render components to the YAML document, keyed by name in ledger order
pub fn render_document(components: &[Component]) -> Result<String, ConfigError> {
    let mut mapping = serde_yaml::Mapping::with_capacity(components.len());
    for component in components {
        let persisted = PersistedComponent::from_component(component);
        let value = serde_yaml::to_value(&persisted).map_err(|e| ConfigError::SerializeError {
            message: format!("component '{}': {}", component.name, e),
        })?;
        mapping.insert(serde_yaml::Value::String(component.name.clone()), value);
    }

    serde_yaml::to_string(&mapping).map_err(|e| ConfigError::SerializeError {
        message: e.to_string(),
    })
}
