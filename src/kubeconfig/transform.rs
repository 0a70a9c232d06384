//! Renames the `default` triple of a freshly generated kubeconfig
//!
//! A simulator instance writes an admin kubeconfig whose cluster, user and
//! context are all called `default` and whose server is the in-container
//! address. Before it can live next to other clusters in a user's kubeconfig
//! the triple is renamed after the instance and pointed at the published port.

use std::mem;

use tracing::debug;

use super::document::{CredentialDocument, Named, NamedCluster, NamedContext, NamedUser};
use crate::config::ContextTarget;
use crate::error::{Result, malformed_credential_document};

/// Name every entry of a generated kubeconfig carries
pub const GENERATED_ENTRY_NAME: &str = "default";

/// Parse `contents` and rename its triple for `target`.
///
/// The certificate authority is dropped and TLS verification disabled: the
/// generated certificate is issued for the in-container address, not for
/// `target.host`.
pub fn transform(contents: &[u8], target: &ContextTarget) -> Result<CredentialDocument> {
    target.validate()?;
    let mut document = CredentialDocument::from_yaml(contents)?;
    let cluster = single_generated("cluster", mem::take(&mut document.clusters))?;
    let user = single_generated("user", mem::take(&mut document.users))?;
    let context = single_generated("context", mem::take(&mut document.contexts))?;

    let mut cluster = cluster.cluster;
    let server = target.server_url();
    cluster.server = Some(server.clone());
    cluster.insecure_skip_tls_verify = Some(true);
    cluster.certificate_authority = None;
    cluster.certificate_authority_data = None;

    let mut context = context.context;
    context.cluster = Some(target.name.clone());
    context.user = Some(target.user_name());

    debug!(
        context = %target.name,
        server = %server,
        "renamed generated kubeconfig entries"
    );

    Ok(CredentialDocument {
        clusters: vec![NamedCluster {
            cluster,
            name: target.name.clone(),
        }],
        contexts: vec![NamedContext {
            context,
            name: target.name.clone(),
        }],
        current_context: target.name.clone(),
        users: vec![NamedUser {
            name: target.user_name(),
            user: user.user,
        }],
        ..document
    })
}

fn single_generated<T: Named>(kind: &str, mut items: Vec<T>) -> Result<T> {
    if items.len() != 1 {
        return Err(malformed_credential_document(format!(
            "expected exactly one {}, found {}",
            kind,
            items.len()
        )));
    }
    let item = items.remove(0);
    if item.name() != GENERATED_ENTRY_NAME {
        return Err(malformed_credential_document(format!(
            "expected {} named '{}', found '{}'",
            kind,
            GENERATED_ENTRY_NAME,
            item.name()
        )));
    }
    Ok(item)
}
