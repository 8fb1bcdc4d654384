//! # Permission Resolver
//!
//! Computes an entity's *effective* permission set by expanding group
//! references in its raw set. Expansion is exactly one level deep: a
//! group's own group references pass through unexpanded. Resolution runs
//! on every request binding and is never persisted, so the effective set
//! always reflects current group membership.

use std::collections::HashSet;

use uuid::Uuid;

use access_model::{parse_group_reference, AccessEntity, EntityKind};

use crate::store::{EntityStore, StoreResult};

/// Resolve a raw permission set into an effective one.
///
/// Every `\Group\<uuid>` entry is replaced by the group's own raw set as
/// returned by `group_lookup`; all other entries pass through unchanged.
/// The union is deduplicated. A lookup returning `None` (group deleted
/// since the reference was granted) contributes nothing and does not fail
/// the resolution.
///
/// # Arguments
///
/// * `raw` - The entity's raw (unresolved) permission set
/// * `group_lookup` - Maps a group UUID to the group's raw set
///
/// # Example
///
/// ```
/// use std::collections::HashSet;
/// use access_engine::resolve;
/// use access_model::group_reference;
/// use uuid::Uuid;
///
/// let admins = Uuid::now_v7();
/// let admin_perms: HashSet<String> = [r"\Users\Manage".to_string()].into();
///
/// let raw: HashSet<String> = [group_reference(&admins)].into();
/// let effective = resolve(&raw, |uuid| (*uuid == admins).then(|| admin_perms.clone()));
///
/// assert!(effective.contains(r"\Users\Manage"));
/// assert!(!effective.contains(&group_reference(&admins)));
/// ```
pub fn resolve<F>(raw: &HashSet<String>, mut group_lookup: F) -> HashSet<String>
where
    F: FnMut(&Uuid) -> Option<HashSet<String>>,
{
    let mut effective = HashSet::new();
    for entry in raw {
        match parse_group_reference(entry) {
            Some(group_uuid) => {
                // One level of indirection only: the group's raw set is
                // taken as-is, nested references are not followed.
                if let Some(group_permissions) = group_lookup(&group_uuid) {
                    effective.extend(group_permissions);
                } else {
                    tracing::debug!(group = %group_uuid, "group reference points at missing group");
                }
            }
            None => {
                effective.insert(entry.clone());
            }
        }
    }
    effective
}

/// Compute an entity's effective permission set against the store.
///
/// Group references are looked up live; store failures propagate, a
/// missing group does not.
pub async fn effective_permissions(
    entity: &AccessEntity,
    store: &dyn EntityStore,
) -> StoreResult<HashSet<String>> {
    let mut effective = HashSet::new();
    for entry in &entity.permissions {
        match parse_group_reference(entry) {
            Some(group_uuid) => {
                if let Some(group) = store
                    .find_entity_by_uuid(EntityKind::Group, &group_uuid)
                    .await?
                {
                    effective.extend(group.permissions.iter().cloned());
                } else {
                    tracing::debug!(group = %group_uuid, "group reference points at missing group");
                }
            }
            None => {
                effective.insert(entry.clone());
            }
        }
    }
    Ok(effective)
}
