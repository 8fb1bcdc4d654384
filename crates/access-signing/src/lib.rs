//! # Access Signing
//!
//! This crate proves that an inbound API request was produced by the
//! holder of a credential's signing secret, and issues those credentials
//! in the first place.
//!
//! ## Overview
//!
//! The access-signing crate handles:
//! - **Credentials**: issuing, looking up and revoking API key pairs
//!   (public key + signing secret), stored as token entities
//! - **Canonical encoding**: the pinned, deterministic JSON serialization
//!   both sides sign over
//! - **Signatures**: HMAC-SHA256 request signing and constant-time
//!   verification
//! - **Protocol**: parsing the `Authorization` credential and running the
//!   parse → lookup → recompute → compare pipeline
//!
//! ## Wire format
//!
//! The caller supplies an `Authorization` value of the form
//! `["Basic" whitespace] base64(publicKey ":" signature)` where
//!
//! ```text
//! signature = hex(HMAC-SHA256(secretKey, route + canonical_json(params)))
//! ```
//!
//! `route` is the server-resolved route identifier (not the raw URL) and
//! `params` is the complete parameter map the server parsed for that
//! route. Client and server must produce byte-identical canonical JSON;
//! see [`canonical::canonical_json`] for the pinned rules.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use access_engine::{EntityStore, MemoryStore};
//! use access_signing::{sign_request, Authenticator, CredentialManager};
//! use serde_json::json;
//!
//! # async fn demo() -> access_signing::AuthResult<()> {
//! let store: Arc<dyn EntityStore> = Arc::new(MemoryStore::new());
//! let credentials = CredentialManager::new(Arc::clone(&store));
//!
//! let issued = credentials.issue(None).await?;
//!
//! // Client side: sign the request.
//! let params = json!({"page": 1, "filter": "active"});
//! let signature = sign_request(&issued.secret_key, "items/list", &params)?;
//! let header = access_signing::ApiCredential::new(issued.public_key, signature).encode();
//!
//! // Server side: authenticate it.
//! let authenticator = Authenticator::new(store);
//! let principal = authenticator.authenticate(&header, "items/list", &params).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure semantics
//!
//! A credential without a `:` delimiter is a *malformed request*, rejected
//! before any lookup. An unknown public key and a signature mismatch are
//! both the single uniform *authentication failure* — callers and wire
//! responses cannot tell them apart, only logs can.

pub mod canonical;
pub mod credentials;
pub mod error;
pub mod protocol;
pub mod signature;

// Re-export main types
pub use canonical::canonical_json;
pub use credentials::{CredentialManager, IssuedCredential};
pub use error::{AuthError, AuthResult};
pub use protocol::{ApiCredential, Authenticator};
pub use signature::{sign_request, verify_signature};
