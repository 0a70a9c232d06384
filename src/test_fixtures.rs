//! Test fixtures and utilities for reducing test setup duplication.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_fixtures::{ZipFixture, create_temp_dir};
//!
//! #[test]
//! fn my_test() {
//!     let temp = create_temp_dir();
//!     let bytes = ZipFixture::new()
//!         .dir("bundle_x/")
//!         .file("bundle_x/logs/a.log", "line")
//!         .build();
//! }
//! ```

#![allow(clippy::expect_used)]

use std::io::{Cursor, Write};

use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Kubeconfig as generated inside a fresh simulator instance
pub const SAMPLE_KUBECONFIG: &str = r"apiVersion: v1
clusters:
- cluster:
    certificate-authority-data: LS0tLS1CRUdJTiBDRVJUSUZJQ0FURS0tLS0tCg==
    server: https://10.0.0.1:6443
  name: default
contexts:
- context:
    cluster: default
    user: default
  name: default
current-context: default
kind: Config
preferences: {}
users:
- name: default
  user:
    client-certificate-data: Y2xpZW50LWNlcnQ=
    client-key-data: Y2xpZW50LWtleQ==
";

/// Create a temp directory in the system temp location.
///
/// Uses `crate::temp::temp_dir_base()` to ensure temp dirs are never
/// created under the current working directory.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new_in(crate::temp::temp_dir_base()).expect("Failed to create temp directory")
}

enum FixtureEntry {
    Dir(String),
    File {
        name: String,
        contents: Vec<u8>,
        mode: u32,
    },
}

/// Builds zip archives in memory, including ones no well-behaved tool would produce.
#[derive(Default)]
pub struct ZipFixture {
    entries: Vec<FixtureEntry>,
}

impl ZipFixture {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn dir(mut self, name: &str) -> Self {
        self.entries.push(FixtureEntry::Dir(name.to_string()));
        self
    }

    #[must_use]
    pub fn file(self, name: &str, contents: &str) -> Self {
        self.file_with_mode(name, contents, 0o644)
    }

    #[must_use]
    pub fn file_with_mode(mut self, name: &str, contents: &str, mode: u32) -> Self {
        self.entries.push(FixtureEntry::File {
            name: name.to_string(),
            contents: contents.as_bytes().to_vec(),
            mode,
        });
        self
    }

    /// # Panics
    ///
    /// Panics if the archive cannot be written.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for entry in self.entries {
            match entry {
                FixtureEntry::Dir(name) => {
                    zip.add_directory(name, options.unix_permissions(0o755))
                        .expect("Failed to add directory to zip");
                }
                FixtureEntry::File {
                    name,
                    contents,
                    mode,
                } => {
                    zip.start_file(name, options.unix_permissions(mode))
                        .expect("Failed to start zip entry");
                    zip.write_all(&contents)
                        .expect("Failed to write zip entry");
                }
            }
        }

        zip.finish().expect("Failed to finish zip").into_inner()
    }
}

/// A well-formed bundle archive whose single top-level directory is `dir_name`
#[must_use]
pub fn bundle_zip(dir_name: &str) -> Vec<u8> {
    ZipFixture::new()
        .dir(&format!("{dir_name}/"))
        .dir(&format!("{dir_name}/logs/"))
        .file(&format!("{dir_name}/metadata.yaml"), "projectName: harvester\n")
        .file(&format!("{dir_name}/logs/kubelet.log"), "I1118 started\n")
        .file_with_mode(&format!("{dir_name}/scripts/collect.sh"), "#!/bin/sh\n", 0o755)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_create_temp_dir() {
        let temp = create_temp_dir();
        assert!(temp.path().exists());
    }

    #[test]
    fn test_zip_fixture_entries() {
        let bytes = bundle_zip("sb");
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
        assert_eq!(archive.len(), 5);

        let mut entry = archive.by_name("sb/metadata.yaml").expect("entry present");
        let mut contents = String::new();
        entry.read_to_string(&mut contents).expect("readable");
        assert_eq!(contents, "projectName: harvester\n");
    }
}
