//! # Permission Grants
//!
//! A permission grant is the durable record linking one access entity to
//! one access level, carrying audit information about who granted it.
//! Grants are created idempotently, deleted individually on revoke, and
//! deleted en masse by the revocation cascade when the referenced access
//! level or entity is removed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A grant record linking an entity to an access level.
///
/// # Example
///
/// ```
/// use access_model::PermissionGrant;
/// use uuid::Uuid;
///
/// let entity = Uuid::now_v7();
/// let admin = Uuid::now_v7();
/// let grant = PermissionGrant::new(entity, r"\Users\Manage").with_granted_by(admin);
///
/// assert_eq!(grant.access_entity_uuid, entity);
/// assert_eq!(grant.granted_by, Some(admin));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PermissionGrant {
    /// Unique grant ID.
    pub id: Uuid,

    /// UUID of the entity holding the grant.
    pub access_entity_uuid: Uuid,

    /// Key of the granted access level (or a group reference).
    pub access_level_key: String,

    /// Who granted it, for auditing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub granted_by: Option<Uuid>,

    /// When it was granted.
    pub granted_at: DateTime<Utc>,
}

impl PermissionGrant {
    /// Create a new grant.
    ///
    /// # Arguments
    ///
    /// * `access_entity_uuid` - The holding entity's UUID
    /// * `access_level_key` - The granted access-level key
    pub fn new(access_entity_uuid: Uuid, access_level_key: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            access_entity_uuid,
            access_level_key: access_level_key.into(),
            granted_by: None,
            granted_at: Utc::now(),
        }
    }

    /// Record who granted this permission.
    pub fn with_granted_by(mut self, granter: Uuid) -> Self {
        self.granted_by = Some(granter);
        self
    }
}
