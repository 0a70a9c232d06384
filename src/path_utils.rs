//! Path utilities for unpacking untrusted archives
//!
//! Normalization here is purely lexical: archive entries name paths that do not
//! exist yet, so the filesystem cannot be consulted to resolve them.

use std::path::{Component, Path, PathBuf};

/// Resolve `.` and `..` components without touching the filesystem.
///
/// `..` at the root is dropped, matching how `/..` resolves on Unix.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use bundlesim::path_utils::normalize_lexically;
///
/// assert_eq!(
///     normalize_lexically(Path::new("/staging/bundle/../../etc")),
///     PathBuf::from("/etc")
/// );
/// ```
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => out.push(prefix.as_os_str()),
            Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

/// Join an archive entry name onto `root` and return the resolved path if it
/// stays strictly inside `root`.
///
/// `root` must already be normalized. The root itself does not count as inside.
pub fn resolve_within(root: &Path, entry_name: &str) -> Option<PathBuf> {
    let resolved = normalize_lexically(&root.join(entry_name));
    if resolved != root && resolved.starts_with(root) {
        Some(resolved)
    } else {
        None
    }
}

/// Convert a path to a string with forward slashes
pub fn to_forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
