//! Error types for engine operations
//!
//! "No access" is never an error here — decision functions return plain
//! booleans. Errors are reserved for administrative mutations and store
//! failures.

use thiserror::Error;

use crate::store::StoreError;

/// Engine error types.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An access level with this key is already registered.
    #[error("Access level already registered: {0}")]
    DuplicateLevel(String),

    /// A referenced access level or entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The revocation cascade could not complete; prior state is intact.
    #[error("Revocation cascade failed for {key}: {source}")]
    CascadeFailed {
        /// The access-level key whose cascade failed.
        key: String,
        /// The underlying store failure.
        source: StoreError,
    },

    /// Storage collaborator failure.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Check if this error should be logged at error level.
    ///
    /// Duplicate registrations and missing references are expected
    /// administrative outcomes; cascade and store failures are not.
    pub fn is_server_error(&self) -> bool {
        matches!(self, EngineError::CascadeFailed { .. } | EngineError::Store(_))
    }
}
