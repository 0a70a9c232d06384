//! Configuration errors

use super::SimError;

/// Creates an invalid config error
pub fn invalid(message: impl Into<String>) -> SimError {
    SimError::ConfigInvalid {
        message: message.into(),
    }
}
