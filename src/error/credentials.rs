//! Kubeconfig document errors

use super::SimError;

/// Creates a malformed credential document error
pub fn malformed(reason: impl Into<String>) -> SimError {
    SimError::MalformedCredentialDocument {
        reason: reason.into(),
    }
}
