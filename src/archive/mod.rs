//! Bundle archive handling
//!
//! - [`source`]: where archives are read from
//! - [`extract`]: path-safe unzip into a staging directory
//! - [`tar`]: packing the staging tree and reading tar streams

pub mod extract;
pub mod source;
pub mod tar;

pub use extract::{BUNDLE_DIR, ExtractedBundle, unzip_bundle};
pub use source::{ArchiveSource, ReadSeek, ZipBytesSource, ZipFileSource};
