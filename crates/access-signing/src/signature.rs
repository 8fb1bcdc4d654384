//! HMAC request signatures
//!
//! [`sign_request`] and [`verify_signature`] are exact inverses: whatever
//! one side signs, the other verifies, provided both use the same route
//! identifier, parameter map and secret. Verification compares in
//! constant time.
//!
//! Neither function knows about nonces or timestamps; replay protection,
//! if a deployment adds it, wraps these calls without changing their
//! contract.

use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::canonical::canonical_json;
use crate::error::{AuthError, AuthResult};

type HmacSha256 = Hmac<Sha256>;

/// Compute the signature for a request.
///
/// # Arguments
///
/// * `secret_key` - The credential's signing key
/// * `route` - The server-resolved route identifier (not the raw URL)
/// * `params` - The complete parameter map for the route
///
/// # Returns
///
/// Hex-encoded `HMAC-SHA256(secret_key, route + canonical_json(params))`.
pub fn sign_request(secret_key: &str, route: &str, params: &Value) -> AuthResult<String> {
    let canonical = canonical_json(params)?;
    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
        .map_err(|e| AuthError::Internal(format!("HMAC key setup failed: {}", e)))?;
    mac.update(route.as_bytes());
    mac.update(canonical.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verify a supplied signature against the expected one.
///
/// Recomputes the signature and compares in constant time. Any internal
/// failure while recomputing is a plain `false` — verification never
/// reveals why it rejected.
pub fn verify_signature(secret_key: &str, route: &str, params: &Value, supplied: &str) -> bool {
    let expected = match sign_request(secret_key, route, params) {
        Ok(signature) => signature,
        Err(_) => return false,
    };
    if expected.len() != supplied.len() {
        return false;
    }
    expected.as_bytes().ct_eq(supplied.as_bytes()).into()
}
