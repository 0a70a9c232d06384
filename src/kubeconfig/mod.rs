//! Exporting instance credentials into a user's kubeconfig
//!
//! - [`document`]: the kubeconfig model
//! - [`transform`]: renaming a generated kubeconfig after its instance
//! - [`merge`]: splicing entries in and pruning them out
//! - [`store`]: loading and saving the document
//!
//! [`add_context`] and [`remove_context`] combine these into the two
//! operations run when an instance is created and deleted.

pub mod document;
pub mod merge;
pub mod store;
pub mod transform;

pub use document::{
    Cluster, Context, CredentialDocument, Named, NamedCluster, NamedContext, NamedUser,
};
pub use merge::{merge, prune};
pub use store::{DocumentStore, FileDocumentStore, MemoryDocumentStore};
pub use transform::transform;

use tracing::{debug, info};

use crate::config::ContextTarget;
use crate::error::Result;

/// Load the stored document, or `None` when there is none yet.
///
/// Only the YAML syntax is checked; entries that reference missing clusters or
/// users are loaded as they are.
pub fn load_document(store: &dyn DocumentStore) -> Result<Option<CredentialDocument>> {
    store
        .load()?
        .map(|contents| CredentialDocument::parse(&contents))
        .transpose()
}

/// Rename the generated kubeconfig `contents` for `target` and merge it into
/// the document held by `store`, making it the current context.
pub fn add_context(
    store: &dyn DocumentStore,
    target: &ContextTarget,
    contents: &[u8],
) -> Result<CredentialDocument> {
    let incoming = transform(contents, target)?;
    let existing = load_document(store)?;
    let merged = merge(existing, incoming);

    store.save(merged.to_yaml()?.as_bytes())?;
    info!(
        context = %target.name,
        server = %target.server_url(),
        kubeconfig = %store.describe(),
        "added kubeconfig context"
    );
    Ok(merged)
}

/// Remove the entries of instance `name` from the document held by `store`.
///
/// Returns whether anything was removed. A missing document, or one without
/// entries for `name`, is left untouched.
pub fn remove_context(store: &dyn DocumentStore, name: &str) -> Result<bool> {
    let Some(existing) = load_document(store)? else {
        debug!(kubeconfig = %store.describe(), "no kubeconfig to prune");
        return Ok(false);
    };

    let (pruned, changed) = prune(existing, name);
    if !changed {
        debug!(context = %name, kubeconfig = %store.describe(), "no entries to remove");
        return Ok(false);
    }

    store.save(pruned.to_yaml()?.as_bytes())?;
    info!(context = %name, kubeconfig = %store.describe(), "removed kubeconfig context");
    Ok(true)
}
