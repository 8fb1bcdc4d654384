//! Error types for credential and authentication operations
//!
//! Authentication failure is uniform by design: unknown public key and
//! signature mismatch share one variant, so nothing external can be used
//! to enumerate valid public keys.

use thiserror::Error;

use access_engine::StoreError;

/// Authentication and credential error types.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The `Authorization` value could not be parsed (bad base64, no
    /// `:` delimiter). Rejected before any lookup.
    #[error("Malformed credential")]
    MalformedCredential,

    /// Unknown public key or signature mismatch — deliberately
    /// indistinguishable.
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// Credential generation kept colliding with existing public keys.
    #[error("Could not generate a unique public key")]
    KeyCollision,

    /// A referenced credential or entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage collaborator failure.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for credential and authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// Check if this error should be logged at error level.
    ///
    /// Malformed credentials and failed authentications are expected
    /// traffic and should not be logged as errors.
    pub fn is_server_error(&self) -> bool {
        matches!(self, AuthError::Store(_) | AuthError::Internal(_))
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::MalformedCredential => 400,
            AuthError::AuthenticationFailed => 401,
            AuthError::NotFound(_) => 404,
            AuthError::KeyCollision => 409,
            AuthError::Store(_) | AuthError::Internal(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MalformedCredential => "MALFORMED_CREDENTIAL",
            AuthError::AuthenticationFailed => "AUTHENTICATION_FAILED",
            AuthError::KeyCollision => "KEY_COLLISION",
            AuthError::NotFound(_) => "NOT_FOUND",
            AuthError::Store(_) => "STORE_ERROR",
            AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::MalformedCredential.status_code(), 400);
        assert_eq!(AuthError::AuthenticationFailed.status_code(), 401);
        assert_eq!(AuthError::KeyCollision.status_code(), 409);
    }

    #[test]
    fn test_expected_failures_are_not_server_errors() {
        assert!(!AuthError::AuthenticationFailed.is_server_error());
        assert!(!AuthError::MalformedCredential.is_server_error());
        assert!(AuthError::Internal("boom".into()).is_server_error());
    }
}
