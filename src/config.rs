//! Configuration values passed into each operation.
//!
//! There is no process-wide state: callers (typically a CLI layer) build these
//! values from flags or files and hand them to [`crate::build_context`] and
//! [`crate::kubeconfig`].

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, config_invalid};

/// Base image used when the caller does not pick one
pub const DEFAULT_BASE_IMAGE: &str = "rancher/support-bundle-kit:dev";

/// Settings for assembling one build context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BuildContextConfig {
    /// Image reference substituted into the manifest's `FROM` line
    pub base_image: String,

    /// Directory under which staging workspaces are created.
    /// Defaults to [`crate::temp::temp_dir_base`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staging_base: Option<PathBuf>,
}

impl Default for BuildContextConfig {
    fn default() -> Self {
        Self {
            base_image: DEFAULT_BASE_IMAGE.to_string(),
            staging_base: None,
        }
    }
}

impl BuildContextConfig {
    pub fn with_base_image(base_image: impl Into<String>) -> Self {
        Self {
            base_image: base_image.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_image.trim().is_empty() {
            return Err(config_invalid("base image must not be empty"));
        }
        Ok(())
    }

    pub fn staging_base(&self) -> PathBuf {
        self.staging_base
            .clone()
            .unwrap_or_else(crate::temp::temp_dir_base)
    }
}

/// Where an instance's API server is reachable, and the name it is exported under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ContextTarget {
    /// Instance name; becomes the cluster and context name
    pub name: String,
    /// Host the published port is reachable on
    pub host: String,
    pub port: u16,
}

impl ContextTarget {
    pub fn new(name: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(config_invalid("instance name must not be empty"));
        }
        if self.host.trim().is_empty() {
            return Err(config_invalid("endpoint host must not be empty"));
        }
        Ok(())
    }

    /// API server URL for this target; IPv6 literals are bracketed
    pub fn server_url(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("https://[{}]:{}", self.host, self.port)
        } else {
            format!("https://{}:{}", self.host, self.port)
        }
    }

    /// Name of the user entry exported for this instance
    pub fn user_name(&self) -> String {
        admin_user_name(&self.name)
    }
}

/// User entry name for instance `name`
pub fn admin_user_name(name: &str) -> String {
    format!("admin@{}", name)
}
