//! Where kubeconfig documents are persisted

use std::cell::RefCell;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{self, Result};

/// Raw load/save access to one kubeconfig document
pub trait DocumentStore {
    /// Human-readable location, used in logs and errors
    fn describe(&self) -> String;

    /// Current document bytes; `None` when there is no document yet.
    /// Empty or whitespace-only content counts as no document.
    fn load(&self) -> Result<Option<Vec<u8>>>;

    /// Replace the document with `contents`
    fn save(&self, contents: &[u8]) -> Result<()>;
}

/// A kubeconfig file on disk.
///
/// Saves write a temporary file next to the target and rename it over the
/// target, so readers never observe a partially written document.
#[derive(Debug, Clone)]
pub struct FileDocumentStore {
    path: PathBuf,
}

impl FileDocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentStore for FileDocumentStore {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(contents) if is_blank(&contents) => Ok(None),
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(error::file_read_failed(&self.path, e)),
        }
    }

    fn save(&self, contents: &[u8]) -> Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(|e| error::file_write_failed(&parent, e))?;

        let mut temp =
            NamedTempFile::new_in(&parent).map_err(|e| error::file_write_failed(&self.path, e))?;
        temp.write_all(contents)
            .and_then(|()| temp.as_file().sync_all())
            .map_err(|e| error::file_write_failed(&self.path, e))?;
        restrict_permissions(temp.path())?;

        temp.persist(&self.path)
            .map_err(|e| error::file_write_failed(&self.path, e.error))?;
        debug!(path = %self.path.display(), bytes = contents.len(), "saved kubeconfig");
        Ok(())
    }
}

/// Kubeconfigs carry credentials; keep them owner-readable only
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .map_err(|e| error::file_write_failed(path, e))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

fn is_blank(contents: &[u8]) -> bool {
    contents.iter().all(u8::is_ascii_whitespace)
}

/// An in-memory document, for callers that keep the kubeconfig elsewhere
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    contents: RefCell<Option<Vec<u8>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<Vec<u8>>) -> Self {
        Self {
            contents: RefCell::new(Some(contents.into())),
        }
    }

    pub fn contents(&self) -> Option<Vec<u8>> {
        self.contents.borrow().clone()
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn describe(&self) -> String {
        "<memory>".to_string()
    }

    fn load(&self) -> Result<Option<Vec<u8>>> {
        Ok(self
            .contents
            .borrow()
            .as_ref()
            .filter(|contents| !is_blank(contents))
            .cloned())
    }

    fn save(&self, contents: &[u8]) -> Result<()> {
        *self.contents.borrow_mut() = Some(contents.to_vec());
        Ok(())
    }
}
