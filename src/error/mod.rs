//! Error types and handling for bundlesim
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`archive`]: Bundle archive and build-context errors
//! - [`credentials`]: Kubeconfig document errors
//! - [`config`]: Configuration errors
//! - [`fs`]: File system errors

pub mod archive;
pub mod config;
pub mod credentials;
pub mod fs;

pub use archive::{malformed as malformed_bundle, path_traversal, template_render};
pub use config::invalid as config_invalid;
pub use credentials::malformed as malformed_credential_document;
pub use fs::{
    io_error, not_found as file_not_found, read_failed as file_read_failed,
    write_failed as file_write_failed,
};

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for bundlesim operations
#[derive(Error, Diagnostic, Debug)]
pub enum SimError {
    // Archive errors
    #[error("Archive entry '{entry}' resolves outside of {destination}")]
    #[diagnostic(
        code(bundlesim::archive::path_traversal),
        help("The bundle contains an entry with '..' or an absolute path; it cannot be unpacked safely")
    )]
    PathTraversal { entry: String, destination: String },

    #[error("Malformed bundle {archive}: {reason}")]
    #[diagnostic(
        code(bundlesim::archive::malformed),
        help("A bundle named X.zip must contain exactly one top-level directory named X")
    )]
    MalformedBundle { archive: String, reason: String },

    #[error("Failed to read archive {archive}: {reason}")]
    #[diagnostic(code(bundlesim::archive::read_failed))]
    ArchiveReadFailed { archive: String, reason: String },

    #[error("Failed to render build manifest: {reason}")]
    #[diagnostic(code(bundlesim::archive::template_render))]
    TemplateRender { reason: String },

    // Credential errors
    #[error("Malformed kubeconfig: {reason}")]
    #[diagnostic(
        code(bundlesim::credentials::malformed),
        help("A freshly generated kubeconfig holds exactly one cluster, user and context named 'default'")
    )]
    MalformedCredentialDocument { reason: String },

    // Configuration errors
    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(bundlesim::config::invalid))]
    ConfigInvalid { message: String },

    // File system errors
    #[error("File not found: {path}")]
    #[diagnostic(code(bundlesim::fs::not_found))]
    FileNotFound { path: String },

    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(bundlesim::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(bundlesim::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(bundlesim::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for SimError {
    fn from(err: std::io::Error) -> Self {
        SimError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for SimError {
    fn from(err: serde_yaml::Error) -> Self {
        SimError::MalformedCredentialDocument {
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, SimError>;
