//! Unpack bundle archives into a staging directory without letting entries escape it.

use std::fs;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

use normpath::PathExt;
use tracing::{debug, info};
use zip::ZipArchive;

use super::source::ArchiveSource;
use crate::error::{self, Result, SimError, archive::from_zip};
use crate::path_utils::resolve_within;

/// Canonical name the bundle directory is renamed to inside the staging root
pub const BUNDLE_DIR: &str = "bundle";

/// Permission bits for files whose archive entry declares none
const DEFAULT_FILE_MODE: u32 = 0o644;

/// Summary of a finished extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedBundle {
    /// Path of the canonical bundle directory (`<destination>/bundle`)
    pub path: PathBuf,
    pub files: usize,
    pub dirs: usize,
}

/// Unzip `source` into `destination` and rename its top-level directory to [`BUNDLE_DIR`].
///
/// Every entry is checked before anything is written for it: an entry that
/// resolves outside `destination` aborts with [`SimError::PathTraversal`]. The
/// archive must hold exactly one top-level directory named after the archive
/// file (minus `.zip`); anything else is a [`SimError::MalformedBundle`].
///
/// Entries written before a failure are left in place; the caller owns
/// `destination` and is expected to discard it.
pub fn unzip_bundle(source: &dyn ArchiveSource, destination: &Path) -> Result<ExtractedBundle> {
    let root = destination
        .normalize()
        .map_err(|e| error::file_read_failed(destination, e))?
        .into_path_buf();
    let location = source.location();
    let expected_dir = source.bundle_dir_name();

    let reader = source.open()?;
    let mut archive = ZipArchive::new(reader).map_err(|e| from_zip(&location, e))?;

    let mut files = 0;
    let mut dirs = 0;
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|e| from_zip(&location, e))?;
        let name = entry.name().to_string();

        let dest_path =
            resolve_within(&root, &name).ok_or_else(|| error::path_traversal(&name, &root))?;

        let top_level = top_level_name(&root, &dest_path);
        if top_level.as_deref() != Some(expected_dir) {
            return Err(error::malformed_bundle(
                &location,
                format!(
                    "unexpected top-level entry '{}', only '{}/' is allowed",
                    top_level.unwrap_or_default(),
                    expected_dir
                ),
            ));
        }

        if entry.is_dir() {
            create_dir(&dest_path)?;
            dirs += 1;
        } else {
            let mode = entry
                .unix_mode()
                .map(|m| m & 0o777)
                .filter(|m| *m != 0)
                .unwrap_or(DEFAULT_FILE_MODE);
            write_file(&mut entry, &dest_path, mode)?;
            files += 1;
        }
        debug!(entry = %name, "extracted");
    }

    let path = rename_bundle_dir(&root, expected_dir, &location)?;
    info!(archive = %location, files, dirs, "unpacked bundle");

    Ok(ExtractedBundle { path, files, dirs })
}

/// First path component of `path` below `root`
fn top_level_name(root: &Path, path: &Path) -> Option<String> {
    match path.strip_prefix(root).ok()?.components().next()? {
        Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
        _ => None,
    }
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| error::file_write_failed(path, e))
}

fn write_file(contents: &mut impl Read, path: &Path, mode: u32) -> Result<()> {
    if let Some(parent) = path.parent() {
        create_dir(parent)?;
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    let mut file = options
        .open(path)
        .map_err(|e| error::file_write_failed(path, e))?;
    io::copy(contents, &mut file).map_err(|e| error::file_write_failed(path, e))?;
    Ok(())
}

fn rename_bundle_dir(root: &Path, expected_dir: &str, location: &str) -> Result<PathBuf> {
    let extracted = root.join(expected_dir);
    let canonical = root.join(BUNDLE_DIR);

    if !extracted.is_dir() {
        return Err(error::malformed_bundle(
            location,
            format!("missing top-level directory '{}/'", expected_dir),
        ));
    }

    if extracted != canonical {
        fs::rename(&extracted, &canonical).map_err(|e| SimError::IoError {
            message: format!(
                "renaming {} to {}: {}",
                extracted.display(),
                canonical.display(),
                e
            ),
        })?;
    }

    Ok(canonical)
}
