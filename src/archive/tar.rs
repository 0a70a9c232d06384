//! Tar stream helpers: packing a staging tree and reading tar streams returned by the runtime.

use std::io::Read;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{self, Result};
use crate::path_utils::to_forward_slashes;

/// Serialize everything below `root` into an uncompressed tar stream.
///
/// Entry names are relative to `root`; directories are included and the walk
/// is sorted by file name so the same tree always yields the same order.
/// Symlinks are stored as links, never followed.
pub fn pack_dir(root: &Path) -> Result<Vec<u8>> {
    let mut builder = ::tar::Builder::new(Vec::new());
    builder.follow_symlinks(false);

    for entry in WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry =
            entry.map_err(|e| error::io_error(format!("walking {}: {}", root.display(), e)))?;
        let path = entry.path();
        let relative = path
            .strip_prefix(root)
            .map_err(|e| error::io_error(format!("{}: {}", path.display(), e)))?;

        if entry.file_type().is_dir() {
            builder
                .append_dir(relative, path)
                .map_err(|e| error::file_read_failed(path, e))?;
        } else {
            builder
                .append_path_with_name(path, relative)
                .map_err(|e| error::file_read_failed(path, e))?;
        }
        debug!(entry = %to_forward_slashes(relative), "added to build context");
    }

    builder
        .into_inner()
        .map_err(|e| error::io_error(format!("finalizing tar stream: {}", e)))
}

/// Names of all entries in a tar stream, in stream order
pub fn entry_names(stream: impl Read) -> Result<Vec<String>> {
    let mut archive = ::tar::Archive::new(stream);
    let mut names = Vec::new();
    for entry in archive
        .entries()
        .map_err(|e| error::io_error(format!("reading tar stream: {}", e)))?
    {
        let entry = entry.map_err(|e| error::io_error(format!("reading tar entry: {}", e)))?;
        let path = entry
            .path()
            .map_err(|e| error::io_error(format!("reading tar entry name: {}", e)))?;
        names.push(to_forward_slashes(&path).trim_end_matches('/').to_string());
    }
    Ok(names)
}

/// Payload of the first regular file in a tar stream.
///
/// Copying a single file out of a container yields a one-entry tar; this
/// unwraps it. Returns `None` when the stream holds no regular file.
pub fn first_file_contents(stream: impl Read) -> Result<Option<Vec<u8>>> {
    let mut archive = ::tar::Archive::new(stream);
    for entry in archive
        .entries()
        .map_err(|e| error::io_error(format!("reading tar stream: {}", e)))?
    {
        let mut entry = entry.map_err(|e| error::io_error(format!("reading tar entry: {}", e)))?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let mut contents = Vec::new();
        entry
            .read_to_end(&mut contents)
            .map_err(|e| error::io_error(format!("reading tar entry payload: {}", e)))?;
        return Ok(Some(contents));
    }
    Ok(None)
}
