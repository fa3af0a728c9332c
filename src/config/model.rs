//! Service and stack definitions as they appear in `config.yml`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A deployable unit definition.
///
/// Every field defaults to its zero value when absent from YAML. Inside a
/// stack, a zero-valued field means "inherit from the global service".
/// Equality is structural over every field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Service {
    /// Stable identity, also used as the map key.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Container image reference, without tag.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub image: String,

    /// Image tag.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub version: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exposed_ports: Vec<u16>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    /// Host path to container path.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub bind_mounts: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub network_alias: String,

    /// Branch to build from when the service is built from source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_branch: Option<String>,

    /// Repository (`owner/name`) to build from when built from source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_repository: Option<String>,

    /// Run the container in the background.
    #[serde(skip_serializing_if = "is_false")]
    pub as_daemon: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_name: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Service {
    /// Image reference including the tag, e.g. `redis:latest`.
    pub fn image_reference(&self) -> String {
        if self.version.is_empty() {
            self.image.clone()
        } else {
            format!("{}:{}", self.image, self.version)
        }
    }

    /// Name of the container backing this service.
    pub fn resolved_container_name(&self) -> &str {
        self.container_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.name)
    }

    /// Whether the service is built from source rather than pulled.
    pub fn builds_from_source(&self) -> bool {
        self.build_repository.is_some()
    }
}

/// A named aggregate of services with per-member override fragments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Stack {
    /// Display name.
    pub name: String,

    /// Service key to override fragment.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub services: BTreeMap<String, Service>,
}

/// Parsed contents of the configuration file(s), before backfill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub services: BTreeMap<String, Service>,
    pub stacks: BTreeMap<String, Stack>,
}
