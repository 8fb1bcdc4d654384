//! # Access Entities
//!
//! An access entity is any principal that can hold permissions: a user,
//! a group, or an API token. All three share one representation with a
//! closed [`EntityKind`] discriminant, so every place that branches on the
//! kind matches exhaustively.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::password;

/// Reserved metadata key holding a user's password salt.
pub const METADATA_SALT: &str = "salt";

/// Discriminates the three kinds of principal.
///
/// The kind is fixed at creation and never changes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// An interactive user account. `name` is the login, `secret` is the
    /// salted password hash.
    User,
    /// A named collection of permissions other entities can reference.
    Group,
    /// An API credential. `name` is the public key, `secret` is the
    /// shared signing key.
    Token,
}

impl EntityKind {
    /// String representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Group => "group",
            EntityKind::Token => "token",
        }
    }

    /// Parse a kind from its string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "user" => Some(EntityKind::User),
            "group" => Some(EntityKind::Group),
            "token" => Some(EntityKind::Token),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A principal that can hold permissions.
///
/// # Identity
///
/// - `id` is the store-assigned row identifier; it is `None` until the
///   entity is persisted (see [`AccessEntity::is_new`]).
/// - `uuid` is assigned at creation, never changes, and is the only
///   foreign key used by permission grants and group references.
/// - `name` is unique *within its kind*: two entities of different kinds
///   may share a name, two users may not.
///
/// # Example
///
/// ```
/// use access_model::AccessEntity;
///
/// let mut user = AccessEntity::user("alice");
/// assert!(user.is_new());
///
/// assert!(user.grant(r"\Api\Read"));
/// assert!(!user.grant(r"\Api\Read")); // idempotent
/// assert!(user.has_raw(r"\Api\Read"));
/// ```
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessEntity {
    /// Store-assigned identifier, absent until persisted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Immutable, store-independent identifier.
    pub uuid: Uuid,

    /// What kind of principal this is.
    pub kind: EntityKind,

    /// Display/login/public identifier, unique within `kind`.
    pub name: String,

    /// Opaque credential material: a password hash for users, the shared
    /// signing key for tokens. Never serialized, redacted from `Debug`
    /// output; stores persist it through the [`AccessEntity::secret`]
    /// accessor instead.
    #[serde(skip_serializing, default)]
    secret: String,

    /// Open string-keyed map for auxiliary attributes (e.g. the password
    /// salt under [`METADATA_SALT`]).
    #[serde(default)]
    pub metadata: HashMap<String, String>,

    /// Raw (unresolved) access-level keys granted directly to this
    /// entity. Group references are kept as-is; expansion happens in the
    /// resolver.
    #[serde(default)]
    pub permissions: HashSet<String>,
}

impl std::fmt::Debug for AccessEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessEntity")
            .field("id", &self.id)
            .field("uuid", &self.uuid)
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("secret", &"[REDACTED]")
            .field("metadata", &self.metadata)
            .field("permissions", &self.permissions)
            .finish()
    }
}

impl AccessEntity {
    /// Create a new, unpersisted entity of the given kind.
    ///
    /// # Arguments
    ///
    /// * `kind` - The kind of principal
    /// * `name` - Identifier, unique within the kind
    pub fn new(kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            id: None,
            uuid: Uuid::now_v7(),
            kind,
            name: name.into(),
            secret: String::new(),
            metadata: HashMap::new(),
            permissions: HashSet::new(),
        }
    }

    /// Create a new user entity.
    pub fn user(name: impl Into<String>) -> Self {
        Self::new(EntityKind::User, name)
    }

    /// Create a new group entity.
    pub fn group(name: impl Into<String>) -> Self {
        Self::new(EntityKind::Group, name)
    }

    /// Create a new token entity from a generated key pair.
    ///
    /// # Arguments
    ///
    /// * `public_key` - The public identifier (stored as `name`)
    /// * `secret_key` - The shared signing key (stored as `secret`)
    pub fn token(public_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self::new(EntityKind::Token, public_key).with_secret(secret_key)
    }

    /// Set the secret material.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = secret.into();
        self
    }

    /// Set the store-assigned identifier (used by stores after insert).
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Whether the entity has not been persisted yet.
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// The secret credential material.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Replace the secret credential material.
    pub fn set_secret(&mut self, secret: impl Into<String>) {
        self.secret = secret.into();
    }

    /// Read a metadata value.
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Write a metadata value.
    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Grant an access-level key directly to this entity.
    ///
    /// Granting an already-held key is a no-op and never duplicates.
    ///
    /// # Returns
    ///
    /// `true` if the key was newly added.
    pub fn grant(&mut self, level_key: impl Into<String>) -> bool {
        self.permissions.insert(level_key.into())
    }

    /// Revoke a directly-held access-level key.
    ///
    /// # Returns
    ///
    /// `true` if the key was present.
    pub fn revoke(&mut self, level_key: &str) -> bool {
        self.permissions.remove(level_key)
    }

    /// Whether the key is held *directly* (no group expansion, no
    /// sentinel handling — that is the decision engine's job).
    pub fn has_raw(&self, level_key: &str) -> bool {
        self.permissions.contains(level_key)
    }

    /// Set a user's password.
    ///
    /// Generates a fresh random salt, stores it under the
    /// [`METADATA_SALT`] metadata key, and stores the salted hash as the
    /// entity secret. The plaintext is never retained.
    pub fn set_password(&mut self, plaintext: &str) {
        let salt = password::generate_salt();
        self.secret = password::hash_password(&salt, plaintext);
        self.metadata.insert(METADATA_SALT.to_string(), salt);
    }

    /// Verify a password attempt against the stored hash.
    ///
    /// Comparison runs in constant time. An entity without a salt (never
    /// had a password set) rejects every attempt.
    pub fn verify_password(&self, attempt: &str) -> bool {
        match self.metadata.get(METADATA_SALT) {
            Some(salt) => password::verify_password(salt, attempt, &self.secret),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_conversion() {
        assert_eq!(EntityKind::User.as_str(), "user");
        assert_eq!(EntityKind::Group.as_str(), "group");
        assert_eq!(EntityKind::Token.as_str(), "token");

        assert_eq!(EntityKind::parse("user"), Some(EntityKind::User));
        assert_eq!(EntityKind::parse("TOKEN"), Some(EntityKind::Token));
        assert_eq!(EntityKind::parse("robot"), None);
    }

    #[test]
    fn test_entity_creation() {
        let user = AccessEntity::user("alice");
        assert_eq!(user.kind, EntityKind::User);
        assert_eq!(user.name, "alice");
        assert!(user.is_new());
        assert!(user.permissions.is_empty());
    }

    #[test]
    fn test_entity_id_assignment() {
        let user = AccessEntity::user("alice").with_id(42);
        assert!(!user.is_new());
        assert_eq!(user.id, Some(42));
    }

    #[test]
    fn test_grant_is_idempotent() {
        let mut user = AccessEntity::user("alice");
        assert!(user.grant(r"\Api\Read"));
        assert!(!user.grant(r"\Api\Read"));
        assert_eq!(user.permissions.len(), 1);

        assert!(user.revoke(r"\Api\Read"));
        assert!(!user.revoke(r"\Api\Read"));
        assert!(!user.has_raw(r"\Api\Read"));
    }

    #[test]
    fn test_token_key_pair() {
        let token = AccessEntity::token("pub-key", "secret-key");
        assert_eq!(token.kind, EntityKind::Token);
        assert_eq!(token.name, "pub-key");
        assert_eq!(token.secret(), "secret-key");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let token = AccessEntity::token("pub-key", "very-secret");
        let rendered = format!("{:?}", token);
        assert!(!rendered.contains("very-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn test_secret_not_serialized() {
        let token = AccessEntity::token("pub-key", "very-secret-signing-key");
        let serialized = serde_json::to_string(&token).unwrap();
        assert!(!serialized.contains("very-secret-signing-key"));
        assert!(!serialized.contains("secret"));

        // Deserialized entities come back with an empty secret; the store
        // supplies the real material separately.
        let restored: AccessEntity = serde_json::from_str(&serialized).unwrap();
        assert_eq!(restored.secret(), "");
        assert_eq!(restored.name, "pub-key");
    }

    #[test]
    fn test_password_round_trip() {
        let mut user = AccessEntity::user("alice");
        user.set_password("hunter2");

        assert!(user.metadata.contains_key(METADATA_SALT));
        assert_ne!(user.secret(), "hunter2");
        assert!(user.verify_password("hunter2"));
        assert!(!user.verify_password("hunter3"));
    }

    #[test]
    fn test_password_without_salt_rejects() {
        let user = AccessEntity::user("alice");
        assert!(!user.verify_password(""));
        assert!(!user.verify_password("anything"));
    }

    #[test]
    fn test_metadata_access() {
        let mut user = AccessEntity::user("alice");
        user.set_metadata("locale", "en_US");
        assert_eq!(user.metadata_value("locale"), Some("en_US"));
        assert_eq!(user.metadata_value("missing"), None);
    }
}
