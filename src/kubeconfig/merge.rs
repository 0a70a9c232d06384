//! Splicing instance entries into, and removing them from, a multi-context kubeconfig

use super::document::{CredentialDocument, Named};
use crate::config::admin_user_name;

/// Merge `incoming` into `existing`.
///
/// Each cluster, user and context of `incoming` replaces the entry of the same
/// name in place, or is appended when the name is new. The current context is
/// taken from `incoming`. Merging the same document twice changes nothing the
/// second time.
pub fn merge(existing: Option<CredentialDocument>, incoming: CredentialDocument) -> CredentialDocument {
    let Some(mut merged) = existing else {
        return incoming;
    };

    upsert_all(&mut merged.clusters, incoming.clusters);
    upsert_all(&mut merged.users, incoming.users);
    upsert_all(&mut merged.contexts, incoming.contexts);
    merged.current_context = incoming.current_context;

    if merged.api_version.is_none() {
        merged.api_version = incoming.api_version;
    }
    if merged.kind.is_none() {
        merged.kind = incoming.kind;
    }
    merged
}

fn upsert_all<T: Named>(items: &mut Vec<T>, incoming: Vec<T>) {
    for item in incoming {
        match items.iter().position(|existing| existing.name() == item.name()) {
            Some(index) => items[index] = item,
            None => items.push(item),
        }
    }
}

/// Remove the entries exported for instance `name`.
///
/// Drops context `name`, cluster `name` and the users `admin@name` and `name`,
/// whether or not other contexts still point at them. The current context is
/// left as is even when it named the removed context. Returns whether
/// anything was removed.
pub fn prune(mut document: CredentialDocument, name: &str) -> (CredentialDocument, bool) {
    let admin = admin_user_name(name);
    let before = (
        document.clusters.len(),
        document.users.len(),
        document.contexts.len(),
    );

    document.contexts.retain(|c| c.name != name);
    document.clusters.retain(|c| c.name != name);
    document.users.retain(|u| u.name != admin && u.name != name);

    let after = (
        document.clusters.len(),
        document.users.len(),
        document.contexts.len(),
    );
    (document, before != after)
}
