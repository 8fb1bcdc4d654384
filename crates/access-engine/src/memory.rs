//! In-memory store implementation
//!
//! Suitable for single-process embedders and tests. Every trait method
//! runs under one write or read lock, which gives it the per-call
//! atomicity the [`EntityStore`] contract requires, including the
//! cascade deletes.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use access_model::{AccessEntity, AccessLevel, EntityKind, PermissionGrant};

use crate::store::{EntityStore, StoreError, StoreResult};

#[derive(Default)]
struct Inner {
    /// Entities keyed by UUID.
    entities: HashMap<Uuid, AccessEntity>,
    /// All grant records.
    grants: Vec<PermissionGrant>,
    /// Access levels keyed by key; BTreeMap keeps listings ordered.
    levels: BTreeMap<String, AccessLevel>,
    /// Next store-assigned entity ID.
    next_id: i64,
}

/// In-memory [`EntityStore`] implementation.
///
/// Cloning is cheap; clones share the same state.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entities currently stored (all kinds).
    pub async fn entity_count(&self) -> usize {
        self.inner.read().await.entities.len()
    }

    /// Number of grant records currently stored.
    pub async fn grant_count(&self) -> usize {
        self.inner.read().await.grants.len()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn find_entity_by_name(
        &self,
        kind: EntityKind,
        name: &str,
    ) -> StoreResult<Option<AccessEntity>> {
        let inner = self.inner.read().await;
        Ok(inner
            .entities
            .values()
            .find(|e| e.kind == kind && e.name == name)
            .cloned())
    }

    async fn find_entity_by_uuid(
        &self,
        kind: EntityKind,
        uuid: &Uuid,
    ) -> StoreResult<Option<AccessEntity>> {
        let inner = self.inner.read().await;
        Ok(inner
            .entities
            .get(uuid)
            .filter(|e| e.kind == kind)
            .cloned())
    }

    async fn list_entities(&self, kind: EntityKind) -> StoreResult<Vec<AccessEntity>> {
        let inner = self.inner.read().await;
        let mut entities: Vec<AccessEntity> = inner
            .entities
            .values()
            .filter(|e| e.kind == kind)
            .cloned()
            .collect();
        entities.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entities)
    }

    async fn insert_entity(&self, entity: &AccessEntity) -> StoreResult<AccessEntity> {
        let mut inner = self.inner.write().await;
        if inner.entities.contains_key(&entity.uuid) {
            return Err(StoreError::Conflict(format!(
                "entity {} already exists",
                entity.uuid
            )));
        }
        // Name uniqueness is per kind, not global.
        if inner
            .entities
            .values()
            .any(|e| e.kind == entity.kind && e.name == entity.name)
        {
            return Err(StoreError::Conflict(format!(
                "{} named {:?} already exists",
                entity.kind, entity.name
            )));
        }

        inner.next_id += 1;
        let persisted = entity.clone().with_id(inner.next_id);
        inner.entities.insert(persisted.uuid, persisted.clone());
        Ok(persisted)
    }

    async fn update_entity(&self, entity: &AccessEntity) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if inner
            .entities
            .values()
            .any(|e| e.uuid != entity.uuid && e.kind == entity.kind && e.name == entity.name)
        {
            return Err(StoreError::Conflict(format!(
                "{} named {:?} already exists",
                entity.kind, entity.name
            )));
        }
        match inner.entities.get_mut(&entity.uuid) {
            Some(existing) => {
                *existing = entity.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("entity {}", entity.uuid))),
        }
    }

    async fn delete_entity(&self, uuid: &Uuid) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if inner.entities.remove(uuid).is_none() {
            return Err(StoreError::NotFound(format!("entity {}", uuid)));
        }
        // Cascade: drop the deleted entity's grant rows in the same call.
        inner.grants.retain(|g| g.access_entity_uuid != *uuid);
        Ok(())
    }

    async fn list_permissions(&self, uuid: &Uuid) -> StoreResult<Vec<PermissionGrant>> {
        let inner = self.inner.read().await;
        Ok(inner
            .grants
            .iter()
            .filter(|g| g.access_entity_uuid == *uuid)
            .cloned()
            .collect())
    }

    async fn insert_permission(&self, grant: &PermissionGrant) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if !inner.entities.contains_key(&grant.access_entity_uuid) {
            return Err(StoreError::NotFound(format!(
                "entity {}",
                grant.access_entity_uuid
            )));
        }
        let already_held = inner.grants.iter().any(|g| {
            g.access_entity_uuid == grant.access_entity_uuid
                && g.access_level_key == grant.access_level_key
        });
        if already_held {
            return Ok(());
        }
        inner.grants.push(grant.clone());
        if let Some(entity) = inner.entities.get_mut(&grant.access_entity_uuid) {
            entity.grant(grant.access_level_key.clone());
        }
        Ok(())
    }

    async fn delete_permission(&self, uuid: &Uuid, level_key: &str) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.grants.len();
        inner
            .grants
            .retain(|g| !(g.access_entity_uuid == *uuid && g.access_level_key == level_key));
        let removed = inner.grants.len() != before;
        if let Some(entity) = inner.entities.get_mut(uuid) {
            entity.revoke(level_key);
        }
        Ok(removed)
    }

    async fn delete_permissions_by_level(&self, level_key: &str) -> StoreResult<u64> {
        let mut inner = self.inner.write().await;
        let before = inner.grants.len();
        inner.grants.retain(|g| g.access_level_key != level_key);
        let removed = (before - inner.grants.len()) as u64;
        for entity in inner.entities.values_mut() {
            entity.revoke(level_key);
        }
        Ok(removed)
    }

    async fn delete_permissions_by_entity(&self, uuid: &Uuid) -> StoreResult<u64> {
        let mut inner = self.inner.write().await;
        let before = inner.grants.len();
        inner.grants.retain(|g| g.access_entity_uuid != *uuid);
        let removed = (before - inner.grants.len()) as u64;
        if let Some(entity) = inner.entities.get_mut(uuid) {
            entity.permissions.clear();
        }
        Ok(removed)
    }

    async fn insert_access_level(&self, level: &AccessLevel) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if inner.levels.contains_key(&level.key) {
            return Err(StoreError::Conflict(format!(
                "access level {:?} already exists",
                level.key
            )));
        }
        inner.levels.insert(level.key.clone(), level.clone());
        Ok(())
    }

    async fn delete_access_level(&self, key: &str) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if inner.levels.remove(key).is_none() {
            return Err(StoreError::NotFound(format!("access level {:?}", key)));
        }
        // Cascade under the same lock: no entity may keep referencing a
        // level that no longer exists.
        inner.grants.retain(|g| g.access_level_key != key);
        for entity in inner.entities.values_mut() {
            entity.revoke(key);
        }
        Ok(())
    }

    async fn list_access_levels(&self, namespace: Option<&str>) -> StoreResult<Vec<AccessLevel>> {
        let inner = self.inner.read().await;
        Ok(inner
            .levels
            .values()
            .filter(|l| namespace.map_or(true, |ns| l.namespace == ns))
            .cloned()
            .collect())
    }
}
