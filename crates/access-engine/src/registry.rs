//! # Access Level Registry
//!
//! The registry is the explicit, injected catalog of known access-level
//! keys. Modules register their levels on activation and unregister them
//! on deactivation; unregistration triggers the revocation cascade, which
//! strips every grant of the removed level before the call returns.
//!
//! There is no ambient global state: whoever governs module lifecycle
//! owns the registry and passes it by reference.

use std::collections::BTreeMap;
use std::sync::Arc;

use uuid::Uuid;

use access_model::{parse_group_reference, AccessLevel, EntityKind, PermissionGrant};

use crate::error::{EngineError, EngineResult};
use crate::store::{EntityStore, StoreError};

/// Catalog of registered access levels, backed by the store.
///
/// The registry keeps an in-memory index for lookups and listings; all
/// mutations go through the store first, so a store failure never leaves
/// the index ahead of durable state.
pub struct AccessLevelRegistry {
    store: Arc<dyn EntityStore>,
    levels: BTreeMap<String, AccessLevel>,
}

impl AccessLevelRegistry {
    /// Create an empty registry over a store.
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self {
            store,
            levels: BTreeMap::new(),
        }
    }

    /// Load the registry index from levels already persisted.
    pub async fn hydrate(&mut self) -> EngineResult<()> {
        let levels = self.store.list_access_levels(None).await?;
        self.levels = levels.into_iter().map(|l| (l.key.clone(), l)).collect();
        Ok(())
    }

    /// Register a new access level.
    ///
    /// # Errors
    ///
    /// [`EngineError::DuplicateLevel`] if the key is already registered.
    pub async fn register(&mut self, level: AccessLevel) -> EngineResult<()> {
        if self.levels.contains_key(&level.key) {
            return Err(EngineError::DuplicateLevel(level.key));
        }
        match self.store.insert_access_level(&level).await {
            Ok(()) => {
                self.levels.insert(level.key.clone(), level);
                Ok(())
            }
            Err(StoreError::Conflict(_)) => Err(EngineError::DuplicateLevel(level.key)),
            Err(err) => Err(err.into()),
        }
    }

    /// Unregister an access level, cascading the removal of every grant
    /// that references it.
    ///
    /// The store performs the level delete and the grant cascade as one
    /// atomic call. If it fails, nothing is removed — the level stays
    /// registered and every grant stays in place.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotFound`] if no such key is registered
    /// - [`EngineError::CascadeFailed`] if the store cannot complete the
    ///   atomic delete
    pub async fn unregister(&mut self, key: &str) -> EngineResult<()> {
        match self.store.delete_access_level(key).await {
            Ok(()) => {
                self.levels.remove(key);
                tracing::debug!(key, "access level unregistered, grants cascaded");
                Ok(())
            }
            Err(StoreError::NotFound(_)) => Err(EngineError::NotFound(key.to_string())),
            Err(source) => Err(EngineError::CascadeFailed {
                key: key.to_string(),
                source,
            }),
        }
    }

    /// Look up a registered level by key.
    pub fn get(&self, key: &str) -> Option<&AccessLevel> {
        self.levels.get(key)
    }

    /// Whether a key is registered.
    pub fn contains(&self, key: &str) -> bool {
        self.levels.contains_key(key)
    }

    /// All registered levels owned by a namespace, ordered by key.
    pub fn list_by_namespace(&self, namespace: &str) -> Vec<&AccessLevel> {
        self.levels
            .values()
            .filter(|l| l.namespace == namespace)
            .collect()
    }

    /// Unregister every level a namespace owns (module deactivation).
    ///
    /// Levels are removed one by one in key order; each removal is its
    /// own atomic cascade. The first failure stops the pass with the
    /// remaining levels untouched.
    ///
    /// # Returns
    ///
    /// The number of levels unregistered.
    pub async fn unregister_namespace(&mut self, namespace: &str) -> EngineResult<u64> {
        let keys: Vec<String> = self
            .list_by_namespace(namespace)
            .into_iter()
            .map(|l| l.key.clone())
            .collect();

        let mut removed = 0;
        for key in keys {
            self.unregister(&key).await?;
            removed += 1;
        }
        Ok(removed)
    }

    /// Grant an access level (or group reference) to an entity.
    ///
    /// Plain keys must be registered; a `\Group\<uuid>` entry must point
    /// at an existing group. Granting an already-held key is a no-op.
    ///
    /// # Arguments
    ///
    /// * `entity_uuid` - The receiving entity
    /// * `level_key` - Access-level key or group reference
    /// * `granted_by` - Who granted it, for the audit record
    pub async fn grant(
        &self,
        entity_uuid: &Uuid,
        level_key: &str,
        granted_by: Option<Uuid>,
    ) -> EngineResult<()> {
        match parse_group_reference(level_key) {
            Some(group_uuid) => {
                let group = self
                    .store
                    .find_entity_by_uuid(EntityKind::Group, &group_uuid)
                    .await?;
                if group.is_none() {
                    return Err(EngineError::NotFound(format!("group {}", group_uuid)));
                }
            }
            None => {
                if !self.levels.contains_key(level_key) {
                    return Err(EngineError::NotFound(level_key.to_string()));
                }
            }
        }

        let mut grant = PermissionGrant::new(*entity_uuid, level_key);
        if let Some(granter) = granted_by {
            grant = grant.with_granted_by(granter);
        }
        self.store.insert_permission(&grant).await?;
        Ok(())
    }

    /// Revoke one entity's grant of one key.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotFound`] if the entity did not hold the key.
    pub async fn revoke(&self, entity_uuid: &Uuid, level_key: &str) -> EngineResult<()> {
        let removed = self.store.delete_permission(entity_uuid, level_key).await?;
        if removed {
            Ok(())
        } else {
            Err(EngineError::NotFound(format!(
                "grant of {:?} to {}",
                level_key, entity_uuid
            )))
        }
    }
}
