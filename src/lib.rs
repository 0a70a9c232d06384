//! Bundlesim - support bundle simulator plumbing
//!
//! Prepares a support bundle for replay inside a simulator container and
//! exports the credentials of a running instance:
//!
//! - [`build_context`]: unpack a bundle zip and package it with a rendered
//!   `Dockerfile` as an image build context
//! - [`kubeconfig`]: merge an instance's generated kubeconfig into a user's
//!   multi-context kubeconfig, and remove it again
//!
//! Container runtime calls are left to the caller; everything here works on
//! bytes, paths and [`kubeconfig::DocumentStore`]s.

pub mod archive;
pub mod build_context;
pub mod config;
pub mod error;
pub mod kubeconfig;
pub mod manifest;
pub mod path_utils;
pub mod temp;

#[cfg(test)]
mod test_fixtures;

pub use build_context::{assemble, build_context_tar};
pub use config::{BuildContextConfig, ContextTarget, DEFAULT_BASE_IMAGE};
pub use error::{Result, SimError};
pub use kubeconfig::{add_context, remove_context};
