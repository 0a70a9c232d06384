//! Build-context assembly
//!
//! Turns a support bundle archive into the tar stream handed to an image
//! build: the bundle is unpacked under `bundle/` and a rendered `Dockerfile`
//! is placed next to it.
//!
//! ```text
//! <staging>/
//! ├── Dockerfile        FROM <base image> / EXPOSE 6443/tcp / COPY bundle /bundle
//! └── bundle/           contents of <name>.zip:<name>/
//! ```

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::archive::source::{ArchiveSource, ZipFileSource};
use crate::archive::{tar, unzip_bundle};
use crate::config::BuildContextConfig;
use crate::error::{self, Result};
use crate::manifest::{MANIFEST_FILE, render_dockerfile};
use crate::temp::StagingWorkspace;

/// Assemble the build context for the archive at `bundle_path`
pub fn build_context_tar(bundle_path: &Path, config: &BuildContextConfig) -> Result<Vec<u8>> {
    let source = ZipFileSource::new(bundle_path)?;
    assemble(&source, config)
}

/// Assemble the build context for `source`.
///
/// The staging workspace is removed before returning on every path. When a
/// step fails, that error is returned even if cleanup also fails.
pub fn assemble(source: &dyn ArchiveSource, config: &BuildContextConfig) -> Result<Vec<u8>> {
    config.validate()?;
    let workspace = StagingWorkspace::create(&config.staging_base())?;

    match stage_and_pack(source, &config.base_image, workspace.root()) {
        Ok(stream) => {
            workspace.close()?;
            info!(
                archive = %source.location(),
                base_image = %config.base_image,
                bytes = stream.len(),
                "assembled build context"
            );
            Ok(stream)
        }
        Err(err) => {
            if let Err(cleanup) = workspace.close() {
                warn!(error = %cleanup, "failed to remove staging workspace");
            }
            Err(err)
        }
    }
}

fn stage_and_pack(source: &dyn ArchiveSource, base_image: &str, root: &Path) -> Result<Vec<u8>> {
    unzip_bundle(source, root)?;
    write_manifest(root, base_image)?;
    tar::pack_dir(root)
}

fn write_manifest(root: &Path, base_image: &str) -> Result<()> {
    let manifest = render_dockerfile(base_image)?;
    let path = root.join(MANIFEST_FILE);
    fs::write(&path, manifest).map_err(|e| error::file_write_failed(&path, e))
}
