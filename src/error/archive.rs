//! Bundle archive errors

use std::path::Path;

use super::SimError;

/// Creates a path traversal error for an entry that escapes `destination`
pub fn path_traversal(entry: impl Into<String>, destination: &Path) -> SimError {
    SimError::PathTraversal {
        entry: entry.into(),
        destination: destination.display().to_string(),
    }
}

/// Creates a malformed bundle error
pub fn malformed(archive: impl Into<String>, reason: impl Into<String>) -> SimError {
    SimError::MalformedBundle {
        archive: archive.into(),
        reason: reason.into(),
    }
}

/// Creates an archive read failed error
pub fn read_failed(archive: impl Into<String>, reason: impl Into<String>) -> SimError {
    SimError::ArchiveReadFailed {
        archive: archive.into(),
        reason: reason.into(),
    }
}

/// Creates a template render error
pub fn template_render(reason: impl Into<String>) -> SimError {
    SimError::TemplateRender {
        reason: reason.into(),
    }
}

/// Maps a zip error for `archive`, keeping IO failures distinct from corrupt archives
pub fn from_zip(archive: &str, err: zip::result::ZipError) -> SimError {
    match err {
        zip::result::ZipError::Io(e) => SimError::IoError {
            message: format!("{}: {}", archive, e),
        },
        other => read_failed(archive, other.to_string()),
    }
}
