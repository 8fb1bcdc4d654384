//! # Request Authentication Protocol
//!
//! Stateless per call: parse the credential, look up the claimed token,
//! recompute the expected signature, compare in constant time. Every
//! request is authenticated independently; there is no session state and
//! no replay window.
//!
//! The two deny paths are logged distinctly (malformed vs. failed) but
//! surface differently only in the error variant's status code — a failed
//! authentication never says whether the key was unknown or the signature
//! wrong.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::Value;

use access_engine::EntityStore;
use access_model::AccessEntity;

use crate::credentials::CredentialManager;
use crate::error::{AuthError, AuthResult};
use crate::signature::verify_signature;

/// A parsed `Authorization` credential: public key + claimed signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCredential {
    /// The claimed public key.
    pub public_key: String,
    /// The claimed request signature (hex).
    pub signature: String,
}

impl ApiCredential {
    /// Create a credential from its parts.
    pub fn new(public_key: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            signature: signature.into(),
        }
    }

    /// Parse an inbound `Authorization` value.
    ///
    /// Accepts `["Basic" whitespace] base64(publicKey ":" signature)`.
    /// The decoded value is split on the *first* `:`; a value without a
    /// colon is a malformed request, rejected before any lookup.
    ///
    /// # Example
    ///
    /// ```
    /// use access_signing::ApiCredential;
    ///
    /// let header = ApiCredential::new("pub", "sig").encode();
    /// let parsed = ApiCredential::parse(&format!("Basic {}", header)).unwrap();
    /// assert_eq!(parsed.public_key, "pub");
    /// assert_eq!(parsed.signature, "sig");
    /// ```
    pub fn parse(authorization: &str) -> AuthResult<Self> {
        let value = authorization.trim();
        // The scheme prefix counts only when whitespace separates it from
        // the credential; a bare base64 value that happens to start with
        // the letters "Basic" stays untouched.
        let value = match value.strip_prefix("Basic") {
            Some(rest) if rest.starts_with(char::is_whitespace) => rest.trim_start(),
            _ => value,
        };

        let decoded = BASE64
            .decode(value)
            .map_err(|_| AuthError::MalformedCredential)?;
        let decoded = String::from_utf8(decoded).map_err(|_| AuthError::MalformedCredential)?;

        let (public_key, signature) = decoded
            .split_once(':')
            .ok_or(AuthError::MalformedCredential)?;

        Ok(Self {
            public_key: public_key.to_string(),
            signature: signature.to_string(),
        })
    }

    /// Encode as an `Authorization` value (without the `Basic` prefix).
    pub fn encode(&self) -> String {
        BASE64.encode(format!("{}:{}", self.public_key, self.signature))
    }
}

/// Runs the authentication pipeline for inbound requests.
#[derive(Clone)]
pub struct Authenticator {
    credentials: CredentialManager,
}

impl Authenticator {
    /// Create an authenticator over a store.
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self {
            credentials: CredentialManager::new(store),
        }
    }

    /// Create an authenticator over an existing credential manager.
    pub fn with_credentials(credentials: CredentialManager) -> Self {
        Self { credentials }
    }

    /// Authenticate an inbound request.
    ///
    /// # Arguments
    ///
    /// * `authorization` - The `Authorization` header value
    /// * `route` - The server-resolved route identifier
    /// * `params` - The complete parameter map the server parsed
    ///
    /// # Returns
    ///
    /// The authenticated token entity (the caller's principal), ready for
    /// permission resolution and access decisions.
    ///
    /// # Errors
    ///
    /// - [`AuthError::MalformedCredential`] if the header cannot be parsed
    /// - [`AuthError::AuthenticationFailed`] for unknown public key *or*
    ///   signature mismatch, uniformly
    /// - [`AuthError::Store`] only for storage failures
    pub async fn authenticate(
        &self,
        authorization: &str,
        route: &str,
        params: &Value,
    ) -> AuthResult<AccessEntity> {
        let credential = ApiCredential::parse(authorization).map_err(|err| {
            tracing::debug!(route, "rejected unparsable credential");
            err
        })?;

        let token = match self
            .credentials
            .lookup_by_public_key(&credential.public_key)
            .await?
        {
            Some(token) => token,
            None => {
                tracing::debug!(route, "authentication failed: unknown public key");
                return Err(AuthError::AuthenticationFailed);
            }
        };

        // Point of no return for cancellation: the comparison runs to
        // completion once started.
        if verify_signature(token.secret(), route, params, &credential.signature) {
            Ok(token)
        } else {
            tracing::debug!(route, "authentication failed: signature mismatch");
            Err(AuthError::AuthenticationFailed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::sign_request;
    use access_engine::MemoryStore;
    use serde_json::json;

    fn setup() -> (MemoryStore, Authenticator, CredentialManager) {
        let store = MemoryStore::new();
        let shared: Arc<dyn EntityStore> = Arc::new(store.clone());
        let credentials = CredentialManager::new(Arc::clone(&shared));
        let authenticator = Authenticator::new(shared);
        (store, authenticator, credentials)
    }

    #[test]
    fn test_parse_round_trip() {
        let encoded = ApiCredential::new("pub-key", "sig-value").encode();
        let parsed = ApiCredential::parse(&encoded).unwrap();
        assert_eq!(parsed.public_key, "pub-key");
        assert_eq!(parsed.signature, "sig-value");
    }

    #[test]
    fn test_parse_accepts_basic_prefix_and_whitespace() {
        let encoded = ApiCredential::new("pub", "sig").encode();
        let parsed = ApiCredential::parse(&format!("  Basic  {}  ", encoded)).unwrap();
        assert_eq!(parsed.public_key, "pub");
    }

    #[test]
    fn test_basic_prefix_requires_whitespace() {
        let encoded = ApiCredential::new("pub", "sig").encode();

        // Glued onto the credential with no separator, "Basic" is part of
        // the base64 value, so the whole string must decode as one — and
        // this one does not.
        let err = ApiCredential::parse(&format!("Basic{}", encoded)).unwrap_err();
        assert!(matches!(err, AuthError::MalformedCredential));

        // With the separator the prefix is stripped as usual.
        let parsed = ApiCredential::parse(&format!("Basic {}", encoded)).unwrap();
        assert_eq!(parsed.public_key, "pub");
    }

    #[test]
    fn test_parse_splits_on_first_colon_only() {
        let encoded = BASE64.encode("pub:sig:with:colons");
        let parsed = ApiCredential::parse(&encoded).unwrap();
        assert_eq!(parsed.public_key, "pub");
        assert_eq!(parsed.signature, "sig:with:colons");
    }

    #[test]
    fn test_parse_rejects_missing_colon() {
        let encoded = BASE64.encode("no-delimiter-here");
        let err = ApiCredential::parse(&encoded).unwrap_err();
        assert!(matches!(err, AuthError::MalformedCredential));
    }

    #[test]
    fn test_parse_rejects_bad_base64() {
        let err = ApiCredential::parse("!!not-base64!!").unwrap_err();
        assert!(matches!(err, AuthError::MalformedCredential));
    }

    #[tokio::test]
    async fn test_authenticate_valid_request() {
        let (_store, authenticator, credentials) = setup();
        let issued = credentials.issue(None).await.unwrap();

        let params = json!({"page": 1});
        let signature = sign_request(&issued.secret_key, "items/list", &params).unwrap();
        let header = ApiCredential::new(&issued.public_key, signature).encode();

        let principal = authenticator
            .authenticate(&header, "items/list", &params)
            .await
            .unwrap();
        assert_eq!(principal.uuid, issued.entity.uuid);
    }

    #[tokio::test]
    async fn test_unknown_key_and_bad_signature_are_uniform() {
        let (_store, authenticator, credentials) = setup();
        let issued = credentials.issue(None).await.unwrap();
        let params = json!({});

        // Unknown public key.
        let header = ApiCredential::new("0000", "sig").encode();
        let unknown = authenticator
            .authenticate(&header, "r", &params)
            .await
            .unwrap_err();

        // Known key, wrong signature.
        let header = ApiCredential::new(&issued.public_key, "bad-signature").encode();
        let mismatch = authenticator
            .authenticate(&header, "r", &params)
            .await
            .unwrap_err();

        assert!(matches!(unknown, AuthError::AuthenticationFailed));
        assert!(matches!(mismatch, AuthError::AuthenticationFailed));
        assert_eq!(unknown.status_code(), mismatch.status_code());
        assert_eq!(unknown.error_code(), mismatch.error_code());
    }

    #[tokio::test]
    async fn test_tampered_params_rejected() {
        let (_store, authenticator, credentials) = setup();
        let issued = credentials.issue(None).await.unwrap();

        let signature =
            sign_request(&issued.secret_key, "items/list", &json!({"page": 1})).unwrap();
        let header = ApiCredential::new(&issued.public_key, signature).encode();

        let err = authenticator
            .authenticate(&header, "items/list", &json!({"page": 2}))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn test_malformed_header_rejected_before_lookup() {
        let (_store, authenticator, _credentials) = setup();

        let err = authenticator
            .authenticate("garbage", "r", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MalformedCredential));
        assert_eq!(err.status_code(), 400);
    }
}
