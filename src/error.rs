//! Centralized error types for attachbox.

use thiserror::Error;

/// Failures reported by the host display surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The host refused to create a container.
    #[error("Could not create container '{title}' with {size} slots: {reason}")]
    CreateFailed {
        size: usize,
        title: String,
        reason: String,
    },

    /// The container could not be shown to the viewer.
    #[error("Could not present container to '{viewer}': {reason}")]
    PresentFailed { viewer: String, reason: String },
}

/// Failures reported by the mail store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Lookup failed for a reason other than "no such mail".
    #[error("Mail lookup failed: {0}")]
    Lookup(String),

    /// The mail could not be persisted.
    #[error("Could not save mail #{index}: {reason}")]
    SaveFailed { index: u32, reason: String },
}

/// All errors produced by the attachbox library.
#[derive(Error, Debug)]
pub enum BoxError {
    /// Display surface failure. Fatal to the triggering call.
    #[error("Host error: {0}")]
    Host(#[from] HostError),

    /// Mail store failure. The caller may retry.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The attachments did not fit in the container built for them.
    #[error("Mail #{index} has {count} attachments but its box holds only {capacity}")]
    SlotOverflow {
        index: u32,
        capacity: usize,
        count: usize,
    },

    /// Index 0 belongs to drafts and cannot key an attachment box.
    #[error("Mail index 0 is reserved for drafts")]
    ReservedIndex,
}

/// Convenience alias for `Result<T, BoxError>`.
pub type Result<T> = std::result::Result<T, BoxError>;

impl BoxError {
    /// Whether retrying the same call later can succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_are_recoverable() {
        let err: BoxError = StoreError::SaveFailed {
            index: 3,
            reason: "disk full".to_string(),
        }
        .into();
        assert!(err.is_recoverable());
        assert_eq!(
            err.to_string(),
            "Store error: Could not save mail #3: disk full"
        );
    }

    #[test]
    fn test_host_errors_are_fatal() {
        let err: BoxError = HostError::PresentFailed {
            viewer: "alice".to_string(),
            reason: "offline".to_string(),
        }
        .into();
        assert!(!err.is_recoverable());
    }
}
