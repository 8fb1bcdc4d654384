//! Storage collaborator seam
//!
//! This module defines the trait the durable store implements. The engine
//! treats each call as atomic: compound writes (uniqueness-checked
//! inserts, cascade deletes) either fully apply or leave prior state
//! intact. Retries, pooling and transactions live behind this seam, not
//! in the engine.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use access_model::{AccessEntity, AccessLevel, EntityKind, PermissionGrant};

/// Store error types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated (name per kind, level key).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The referenced row does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend could not complete the call.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Durable storage for entities, access levels and permission grants.
///
/// Every method is a single atomic operation against the backend.
/// Methods that delete an aggregate (an entity, an access level) also
/// delete the grants referencing it in the same transaction — a partial
/// cascade is the single worst correctness failure in this subsystem.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Find an entity by kind and name.
    async fn find_entity_by_name(
        &self,
        kind: EntityKind,
        name: &str,
    ) -> StoreResult<Option<AccessEntity>>;

    /// Find an entity by kind and UUID.
    async fn find_entity_by_uuid(
        &self,
        kind: EntityKind,
        uuid: &Uuid,
    ) -> StoreResult<Option<AccessEntity>>;

    /// List all entities of a kind.
    async fn list_entities(&self, kind: EntityKind) -> StoreResult<Vec<AccessEntity>>;

    /// Insert a new entity, assigning its store ID.
    ///
    /// Fails with [`StoreError::Conflict`] if an entity of the same kind
    /// already uses the name.
    ///
    /// # Returns
    ///
    /// The persisted entity with `id` populated.
    async fn insert_entity(&self, entity: &AccessEntity) -> StoreResult<AccessEntity>;

    /// Update a persisted entity in place (matched by UUID).
    async fn update_entity(&self, entity: &AccessEntity) -> StoreResult<()>;

    /// Delete an entity and, in the same transaction, every grant keyed
    /// by its UUID.
    async fn delete_entity(&self, uuid: &Uuid) -> StoreResult<()>;

    /// List the grant records held by an entity.
    async fn list_permissions(&self, uuid: &Uuid) -> StoreResult<Vec<PermissionGrant>>;

    /// Insert a grant record and add its key to the entity's raw
    /// permission set.
    ///
    /// Granting an already-held key is a no-op, never a duplicate.
    async fn insert_permission(&self, grant: &PermissionGrant) -> StoreResult<()>;

    /// Delete one entity's grant of one access-level key, removing it
    /// from the raw permission set as well.
    ///
    /// # Returns
    ///
    /// `true` if a grant was removed.
    async fn delete_permission(&self, uuid: &Uuid, level_key: &str) -> StoreResult<bool>;

    /// Delete every grant referencing an access-level key, across all
    /// entities, stripping the key from each raw permission set.
    ///
    /// # Returns
    ///
    /// The number of grants removed.
    async fn delete_permissions_by_level(&self, level_key: &str) -> StoreResult<u64>;

    /// Delete every grant held by one entity.
    ///
    /// # Returns
    ///
    /// The number of grants removed.
    async fn delete_permissions_by_entity(&self, uuid: &Uuid) -> StoreResult<u64>;

    /// Insert an access level.
    ///
    /// Fails with [`StoreError::Conflict`] if the key already exists.
    async fn insert_access_level(&self, level: &AccessLevel) -> StoreResult<()>;

    /// Delete an access level and, in the same transaction, every grant
    /// referencing its key.
    ///
    /// If the cascade cannot complete the whole call fails and the level
    /// stays in place.
    async fn delete_access_level(&self, key: &str) -> StoreResult<()>;

    /// List access levels, optionally filtered by owning namespace,
    /// ordered by key.
    async fn list_access_levels(&self, namespace: Option<&str>) -> StoreResult<Vec<AccessLevel>>;
}
