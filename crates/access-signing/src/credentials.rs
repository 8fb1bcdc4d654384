//! # Credential Manager
//!
//! Issues, looks up and revokes API credentials. A credential is a token
//! entity whose `name` is the public key and whose secret is the signing
//! key. Both values come from the operating system CSPRNG: 128 bits for
//! the public identifier's collision resistance, 256 bits for the secret.

use std::sync::Arc;

use chrono::Utc;
use rand::RngCore;
use uuid::Uuid;

use access_engine::{EntityStore, StoreError};
use access_model::{AccessEntity, EntityKind};

use crate::error::{AuthError, AuthResult};

/// Public key length in bytes before hex encoding (128 bits).
const PUBLIC_KEY_BYTES: usize = 16;

/// Secret key length in bytes before hex encoding (256 bits).
const SECRET_KEY_BYTES: usize = 32;

/// Issue attempts before giving up on public-key uniqueness.
const MAX_ISSUE_ATTEMPTS: usize = 8;

/// Reserved metadata key recording who requested the credential.
pub const METADATA_ISSUED_BY: &str = "issued_by";

/// Reserved metadata key recording when the credential was issued.
pub const METADATA_ISSUED_AT: &str = "issued_at";

/// A freshly issued credential.
///
/// The secret key is returned here once; afterwards it only exists as
/// the token entity's secret material.
#[derive(Debug, Clone)]
pub struct IssuedCredential {
    /// The persisted token entity.
    pub entity: AccessEntity,
    /// Hex-encoded public identifier (the entity's `name`).
    pub public_key: String,
    /// Hex-encoded signing key.
    pub secret_key: String,
}

/// Issues and resolves signing credentials bound to token entities.
#[derive(Clone)]
pub struct CredentialManager {
    store: Arc<dyn EntityStore>,
}

impl CredentialManager {
    /// Create a manager over a store.
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Issue a fresh credential.
    ///
    /// Generates a new key pair, verifies the public key is unused and
    /// persists the token entity. A collision (including one lost to a
    /// concurrent insert) triggers regeneration, never an overwrite;
    /// exhausting the attempts surfaces [`AuthError::KeyCollision`].
    ///
    /// # Arguments
    ///
    /// * `issued_by` - Who requested the credential, recorded in the
    ///   token's metadata for auditing
    pub async fn issue(&self, issued_by: Option<Uuid>) -> AuthResult<IssuedCredential> {
        for _ in 0..MAX_ISSUE_ATTEMPTS {
            let public_key = random_hex(PUBLIC_KEY_BYTES);
            let secret_key = random_hex(SECRET_KEY_BYTES);

            if self
                .store
                .find_entity_by_name(EntityKind::Token, &public_key)
                .await?
                .is_some()
            {
                tracing::warn!("generated public key collided, regenerating");
                continue;
            }

            let mut token = AccessEntity::token(&public_key, &secret_key);
            if let Some(owner) = issued_by {
                token.set_metadata(METADATA_ISSUED_BY, owner.to_string());
            }
            token.set_metadata(METADATA_ISSUED_AT, Utc::now().to_rfc3339());

            match self.store.insert_entity(&token).await {
                Ok(entity) => {
                    return Ok(IssuedCredential {
                        entity,
                        public_key,
                        secret_key,
                    })
                }
                // Lost a race on the name constraint; regenerate.
                Err(StoreError::Conflict(_)) => continue,
                Err(err) => return Err(err.into()),
            }
        }
        Err(AuthError::KeyCollision)
    }

    /// Look up a token entity by its public key.
    pub async fn lookup_by_public_key(&self, public_key: &str) -> AuthResult<Option<AccessEntity>> {
        Ok(self
            .store
            .find_entity_by_name(EntityKind::Token, public_key)
            .await?)
    }

    /// Revoke a credential by the token entity's UUID.
    ///
    /// Deletes the entity; the store cascades its grant records in the
    /// same call.
    pub async fn revoke(&self, uuid: &Uuid) -> AuthResult<()> {
        match self.store.delete_entity(uuid).await {
            Ok(()) => Ok(()),
            Err(StoreError::NotFound(_)) => Err(AuthError::NotFound(format!("token {}", uuid))),
            Err(err) => Err(err.into()),
        }
    }
}

/// Hex-encode `len` bytes from the OS CSPRNG.
fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use access_engine::MemoryStore;
    use access_model::PermissionGrant;

    fn manager_over(store: &MemoryStore) -> CredentialManager {
        CredentialManager::new(Arc::new(store.clone()))
    }

    #[tokio::test]
    async fn test_issue_persists_token() {
        let store = MemoryStore::new();
        let manager = manager_over(&store);

        let issued = manager.issue(None).await.unwrap();
        assert!(!issued.entity.is_new());
        assert_eq!(issued.public_key.len(), PUBLIC_KEY_BYTES * 2);
        assert_eq!(issued.secret_key.len(), SECRET_KEY_BYTES * 2);

        let found = manager
            .lookup_by_public_key(&issued.public_key)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.uuid, issued.entity.uuid);
        assert_eq!(found.secret(), issued.secret_key);
    }

    #[tokio::test]
    async fn test_issued_keys_are_unique() {
        let store = MemoryStore::new();
        let manager = manager_over(&store);

        let a = manager.issue(None).await.unwrap();
        let b = manager.issue(None).await.unwrap();
        assert_ne!(a.public_key, b.public_key);
        assert_ne!(a.secret_key, b.secret_key);
    }

    #[tokio::test]
    async fn test_issue_records_audit_metadata() {
        let store = MemoryStore::new();
        let manager = manager_over(&store);
        let owner = Uuid::now_v7();

        let issued = manager.issue(Some(owner)).await.unwrap();
        assert_eq!(
            issued.entity.metadata_value(METADATA_ISSUED_BY),
            Some(owner.to_string().as_str())
        );
        assert!(issued.entity.metadata_value(METADATA_ISSUED_AT).is_some());
    }

    #[tokio::test]
    async fn test_lookup_unknown_key() {
        let store = MemoryStore::new();
        let manager = manager_over(&store);

        let found = manager.lookup_by_public_key("deadbeef").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_revoke_cascades_grants() {
        let store = MemoryStore::new();
        let manager = manager_over(&store);

        let issued = manager.issue(None).await.unwrap();
        store
            .insert_permission(&PermissionGrant::new(issued.entity.uuid, r"\Api\Read"))
            .await
            .unwrap();

        manager.revoke(&issued.entity.uuid).await.unwrap();
        assert_eq!(store.grant_count().await, 0);
        assert!(manager
            .lookup_by_public_key(&issued.public_key)
            .await
            .unwrap()
            .is_none());
    }

    /// Store wrapper that pretends the first few generated public keys
    /// are already taken.
    struct CollidingStore {
        inner: MemoryStore,
        collisions_left: std::sync::atomic::AtomicUsize,
    }

    #[async_trait::async_trait]
    impl EntityStore for CollidingStore {
        async fn find_entity_by_name(
            &self,
            kind: EntityKind,
            name: &str,
        ) -> access_engine::StoreResult<Option<AccessEntity>> {
            use std::sync::atomic::Ordering;
            if kind == EntityKind::Token
                && self
                    .collisions_left
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                    .is_ok()
            {
                return Ok(Some(AccessEntity::token(name, "taken")));
            }
            self.inner.find_entity_by_name(kind, name).await
        }

        async fn find_entity_by_uuid(
            &self,
            kind: EntityKind,
            uuid: &Uuid,
        ) -> access_engine::StoreResult<Option<AccessEntity>> {
            self.inner.find_entity_by_uuid(kind, uuid).await
        }

        async fn list_entities(
            &self,
            kind: EntityKind,
        ) -> access_engine::StoreResult<Vec<AccessEntity>> {
            self.inner.list_entities(kind).await
        }

        async fn insert_entity(
            &self,
            entity: &AccessEntity,
        ) -> access_engine::StoreResult<AccessEntity> {
            self.inner.insert_entity(entity).await
        }

        async fn update_entity(&self, entity: &AccessEntity) -> access_engine::StoreResult<()> {
            self.inner.update_entity(entity).await
        }

        async fn delete_entity(&self, uuid: &Uuid) -> access_engine::StoreResult<()> {
            self.inner.delete_entity(uuid).await
        }

        async fn list_permissions(
            &self,
            uuid: &Uuid,
        ) -> access_engine::StoreResult<Vec<PermissionGrant>> {
            self.inner.list_permissions(uuid).await
        }

        async fn insert_permission(
            &self,
            grant: &PermissionGrant,
        ) -> access_engine::StoreResult<()> {
            self.inner.insert_permission(grant).await
        }

        async fn delete_permission(
            &self,
            uuid: &Uuid,
            level_key: &str,
        ) -> access_engine::StoreResult<bool> {
            self.inner.delete_permission(uuid, level_key).await
        }

        async fn delete_permissions_by_level(
            &self,
            level_key: &str,
        ) -> access_engine::StoreResult<u64> {
            self.inner.delete_permissions_by_level(level_key).await
        }

        async fn delete_permissions_by_entity(
            &self,
            uuid: &Uuid,
        ) -> access_engine::StoreResult<u64> {
            self.inner.delete_permissions_by_entity(uuid).await
        }

        async fn insert_access_level(
            &self,
            level: &access_model::AccessLevel,
        ) -> access_engine::StoreResult<()> {
            self.inner.insert_access_level(level).await
        }

        async fn delete_access_level(&self, key: &str) -> access_engine::StoreResult<()> {
            self.inner.delete_access_level(key).await
        }

        async fn list_access_levels(
            &self,
            namespace: Option<&str>,
        ) -> access_engine::StoreResult<Vec<access_model::AccessLevel>> {
            self.inner.list_access_levels(namespace).await
        }
    }

    #[tokio::test]
    async fn test_collision_triggers_regeneration() {
        let store = CollidingStore {
            inner: MemoryStore::new(),
            collisions_left: std::sync::atomic::AtomicUsize::new(2),
        };
        let manager = CredentialManager::new(Arc::new(store));

        // Two colliding attempts, then success; nothing is overwritten.
        let issued = manager.issue(None).await.unwrap();
        let found = manager
            .lookup_by_public_key(&issued.public_key)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.secret(), issued.secret_key);
    }

    #[tokio::test]
    async fn test_exhausted_collisions_surface_error() {
        let store = CollidingStore {
            inner: MemoryStore::new(),
            collisions_left: std::sync::atomic::AtomicUsize::new(usize::MAX),
        };
        let manager = CredentialManager::new(Arc::new(store));

        let err = manager.issue(None).await.unwrap_err();
        assert!(matches!(err, AuthError::KeyCollision));
    }

    #[tokio::test]
    async fn test_revoke_missing_token() {
        let store = MemoryStore::new();
        let manager = manager_over(&store);

        let err = manager.revoke(&Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound(_)));
    }
}
