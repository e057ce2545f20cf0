//! Errors reported by a canvas host

use thiserror::Error;

use super::Capability;

/// A single host mutation failed.
///
/// These are never fatal for a plan: the executor turns them into a failed
/// tier and moves on to the next fallback.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    #[error("host does not support {0}")]
    Unsupported(Capability),

    #[error("shape '{0}' was not found on the slide")]
    ShapeNotFound(String),

    #[error("host refused to modify shape '{id}': {reason}")]
    Refused { id: String, reason: String },

    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

impl HostError {
    pub fn refused(id: impl Into<String>, reason: impl Into<String>) -> Self {
        HostError::Refused {
            id: id.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        HostError::InvalidPayload(message.into())
    }
}
