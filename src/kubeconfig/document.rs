//! Kubeconfig document model
//!
//! Only the fields this crate rewrites are typed. Everything else (user auth
//! material, extensions, proxy settings, unknown top-level keys) is kept as
//! raw YAML so entries pass through a load/save cycle with all their fields.

use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value};

use tracing::warn;

use crate::error::{Result, malformed_credential_document};

/// A named record in one of the document's collections
pub trait Named {
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Cluster {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_authority: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_authority_data: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure_skip_tls_verify: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    #[serde(flatten)]
    pub extra: Mapping,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NamedCluster {
    #[serde(default)]
    pub cluster: Cluster,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Context {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(flatten)]
    pub extra: Mapping,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NamedContext {
    #[serde(default)]
    pub context: Context,
    pub name: String,
}

/// A user entry; its auth material is opaque
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NamedUser {
    pub name: String,
    #[serde(default)]
    pub user: Mapping,
}

impl Named for NamedCluster {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for NamedContext {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for NamedUser {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A multi-context kubeconfig document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CredentialDocument {
    #[serde(rename = "apiVersion", default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub clusters: Vec<NamedCluster>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub contexts: Vec<NamedContext>,

    #[serde(rename = "current-context", default)]
    pub current_context: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Value>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub users: Vec<NamedUser>,

    #[serde(flatten)]
    pub extra: Mapping,
}

/// Writers commonly emit `clusters: null` for an empty collection
fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl CredentialDocument {
    /// Parse a kubeconfig as found on disk.
    ///
    /// Inconsistencies such as a context naming a user that no longer exists
    /// are logged and kept; they belong to entries this crate does not own.
    pub fn parse(contents: &[u8]) -> Result<Self> {
        let document = Self::deserialize_yaml(contents)?;
        for problem in document.problems() {
            warn!(%problem, "kubeconfig inconsistency left as is");
        }
        Ok(document)
    }

    /// Parse a kubeconfig that must be self-consistent.
    ///
    /// Names must be unique within each collection and every context must
    /// reference a cluster and user present in the document.
    pub fn from_yaml(contents: &[u8]) -> Result<Self> {
        let document = Self::deserialize_yaml(contents)?;
        document.validate()?;
        Ok(document)
    }

    fn deserialize_yaml(contents: &[u8]) -> Result<Self> {
        serde_yaml::from_slice(contents).map_err(|e| malformed_credential_document(e.to_string()))
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| malformed_credential_document(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        match self.problems().into_iter().next() {
            Some(problem) => Err(malformed_credential_document(problem)),
            None => Ok(()),
        }
    }

    /// Duplicate names and dangling context references, in document order
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        duplicates("cluster", &self.clusters, &mut problems);
        duplicates("user", &self.users, &mut problems);
        duplicates("context", &self.contexts, &mut problems);

        for context in &self.contexts {
            let cluster = context.context.cluster.as_deref();
            if let Some(cluster) = cluster.filter(|c| self.cluster(c).is_none()) {
                problems.push(format!(
                    "context '{}' references missing cluster '{}'",
                    context.name, cluster
                ));
            }
            let user = context.context.user.as_deref();
            if let Some(user) = user.filter(|u| self.user(u).is_none()) {
                problems.push(format!(
                    "context '{}' references missing user '{}'",
                    context.name, user
                ));
            }
        }
        problems
    }

    pub fn cluster(&self, name: &str) -> Option<&NamedCluster> {
        find(&self.clusters, name)
    }

    pub fn user(&self, name: &str) -> Option<&NamedUser> {
        find(&self.users, name)
    }

    pub fn context(&self, name: &str) -> Option<&NamedContext> {
        find(&self.contexts, name)
    }
}

pub(crate) fn find<'a, T: Named>(items: &'a [T], name: &str) -> Option<&'a T> {
    items.iter().find(|item| item.name() == name)
}

fn duplicates<T: Named>(kind: &str, items: &[T], problems: &mut Vec<String>) {
    for (index, item) in items.iter().enumerate() {
        if items[..index].iter().any(|other| other.name() == item.name()) {
            problems.push(format!("duplicate {} name '{}'", kind, item.name()));
        }
    }
}
