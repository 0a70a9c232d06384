//! Where bundle archives come from

use std::fs;
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};

use crate::error::{self, Result};

/// Suffix stripped from the archive file name to find its top-level directory
pub const ZIP_SUFFIX: &str = ".zip";

/// Anything a zip archive can be read from
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek> ReadSeek for T {}

/// A bundle archive that can be opened for reading.
pub trait ArchiveSource {
    /// File name of the archive, e.g. `supportbundle_2024-11-18.zip`
    fn file_name(&self) -> &str;

    /// Human readable location, used in errors and logs
    fn location(&self) -> String {
        self.file_name().to_string()
    }

    fn open(&self) -> Result<Box<dyn ReadSeek + '_>>;

    /// Name of the top-level directory the archive is expected to contain
    fn bundle_dir_name(&self) -> &str {
        let name = self.file_name();
        name.strip_suffix(ZIP_SUFFIX).unwrap_or(name)
    }
}

/// A bundle archive on disk
#[derive(Debug, Clone)]
pub struct ZipFileSource {
    path: PathBuf,
    file_name: String,
}

impl ZipFileSource {
    /// Check that `path` names an existing regular file and wrap it
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let metadata = fs::metadata(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                error::file_not_found(&path)
            } else {
                error::file_read_failed(&path, e)
            }
        })?;
        if metadata.is_dir() {
            return Err(error::file_read_failed(
                &path,
                "bundle path must be a zip file, not a directory",
            ));
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| error::file_read_failed(&path, "bundle path has no file name"))?;

        Ok(Self { path, file_name })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ArchiveSource for ZipFileSource {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn open(&self) -> Result<Box<dyn ReadSeek + '_>> {
        let file = fs::File::open(&self.path).map_err(|e| error::file_read_failed(&self.path, e))?;
        Ok(Box::new(file))
    }
}

/// A bundle archive held in memory
#[derive(Debug, Clone)]
pub struct ZipBytesSource {
    file_name: String,
    bytes: Vec<u8>,
}

impl ZipBytesSource {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

impl ArchiveSource for ZipBytesSource {
    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn open(&self) -> Result<Box<dyn ReadSeek + '_>> {
        Ok(Box::new(Cursor::new(self.bytes.as_slice())))
    }
}
