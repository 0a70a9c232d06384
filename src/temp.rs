//! Staging workspaces for build-context assembly.
//!
//! Temp dirs are never created under the current working directory (e.g. when
//! TMPDIR=tmp or TMPDIR=./tmp).

use std::env;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use crate::error::{Result, SimError};

const STAGING_PREFIX: &str = "bundlesim-";

/// Returns a directory path suitable for creating temporary directories.
/// Never returns a relative path, so temp dirs are never created under the current working
/// directory.
pub fn temp_dir_base() -> PathBuf {
    let t = env::temp_dir();
    if t.is_absolute() {
        t
    } else {
        #[cfg(windows)]
        {
            env::var("TEMP")
                .or_else(|_| env::var("TMP"))
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("C:\\Windows\\Temp"))
        }
        #[cfg(not(windows))]
        {
            PathBuf::from("/tmp")
        }
    }
}

/// An exclusively owned, uniquely named staging directory.
///
/// The directory is removed when the workspace is dropped, which covers every
/// error path. Call [`StagingWorkspace::close`] on success to surface cleanup
/// failures instead of ignoring them.
#[derive(Debug)]
pub struct StagingWorkspace {
    dir: TempDir,
}

impl StagingWorkspace {
    /// Create a fresh workspace below `base`
    pub fn create(base: &Path) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(base)
            .map_err(|e| SimError::IoError {
                message: format!("creating staging directory in {}: {}", base.display(), e),
            })?;
        debug!(path = %dir.path().display(), "created staging workspace");
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the workspace, reporting any failure
    pub fn close(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir.close().map_err(|e| SimError::IoError {
            message: format!("cleaning up staging directory {}: {}", path.display(), e),
        })?;
        debug!(path = %path.display(), "removed staging workspace");
        Ok(())
    }
}
