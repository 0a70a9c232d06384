//! Common test utilities for bundlesim integration tests

#![allow(clippy::expect_used)]

use std::io::{Cursor, Write};
use std::path::PathBuf;

use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// A scratch directory for integration tests
pub struct TestWorkspace {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to workspace root
    pub path: PathBuf,
}

impl TestWorkspace {
    /// Create a new test workspace
    pub fn new() -> Self {
        init_tracing();
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Create a directory in workspace
    #[allow(dead_code)]
    pub fn create_dir(&self, path: &str) -> PathBuf {
        let dir = self.path.join(path);
        std::fs::create_dir_all(&dir).expect("Failed to create directory");
        dir
    }

    /// Write a file in workspace
    #[allow(dead_code)]
    pub fn write_file(&self, path: &str, content: impl AsRef<[u8]>) -> PathBuf {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }

    /// Read a file from workspace
    #[allow(dead_code)]
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    /// Check if a file exists in workspace
    #[allow(dead_code)]
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Write `name.zip` holding a small support bundle under `name/`
    #[allow(dead_code)]
    pub fn write_bundle_zip(&self, name: &str) -> PathBuf {
        let bytes = zip_archive(&[
            (format!("{name}/").as_str(), None),
            (
                format!("{name}/metadata.yaml").as_str(),
                Some("projectName: harvester\n"),
            ),
            (
                format!("{name}/nodes/node-1/kubelet.log").as_str(),
                Some("I1118 started\n"),
            ),
            (
                format!("{name}/yamls/cluster/v1/namespaces.yaml").as_str(),
                Some("items: []\n"),
            ),
        ]);
        self.write_file(&format!("{name}.zip"), bytes)
    }

    /// Number of entries directly under `path`
    #[allow(dead_code)]
    pub fn count_entries(&self, path: &str) -> usize {
        std::fs::read_dir(self.path.join(path))
            .expect("Failed to read directory")
            .count()
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a zip in memory; `None` contents mark a directory entry
#[allow(dead_code)]
pub fn zip_archive(entries: &[(&str, Option<&str>)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, contents) in entries {
        match contents {
            None => zip
                .add_directory(*name, options)
                .expect("Failed to add directory to zip"),
            Some(contents) => {
                zip.start_file(*name, options)
                    .expect("Failed to start zip entry");
                zip.write_all(contents.as_bytes())
                    .expect("Failed to write zip entry");
            }
        }
    }

    zip.finish().expect("Failed to finish zip").into_inner()
}

/// Generated admin kubeconfig of a fresh simulator instance
#[allow(dead_code)]
pub fn admin_kubeconfig() -> Vec<u8> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("common")
        .join("fixtures")
        .join("admin.kubeconfig");
    std::fs::read(path).expect("Failed to read kubeconfig fixture")
}

/// Route library logs to the test harness; set RUST_LOG to see them
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_file_operations() {
        let workspace = TestWorkspace::new();
        workspace.write_file("test/file.txt", "hello");
        assert!(workspace.file_exists("test/file.txt"));
        assert_eq!(workspace.read_file("test/file.txt"), "hello");
    }

    #[test]
    fn test_admin_kubeconfig_fixture() {
        let contents = String::from_utf8(admin_kubeconfig()).expect("fixture is utf-8");
        assert!(contents.contains("current-context: default"));
    }
}
