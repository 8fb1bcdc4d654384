//! # Access Decision Engine
//!
//! Answers "does this effective permission set satisfy this required
//! level". Pure exact-match semantics: the required key must be present,
//! or the set must hold the `\Global\*` super-admin sentinel. There is no
//! prefix or glob matching — generalizing this would change the security
//! model and is deliberately not done here.

use std::collections::HashSet;

use access_model::{AccessEntity, GLOBAL_ACCESS};

use crate::resolver::effective_permissions;
use crate::store::{EntityStore, StoreResult};

/// Decide whether an effective permission set grants a required level.
///
/// An unknown `required` key is simply no match, never an error.
///
/// # Example
///
/// ```
/// use std::collections::HashSet;
/// use access_engine::has_access;
/// use access_model::GLOBAL_ACCESS;
///
/// let perms: HashSet<String> = [r"\Api\Read".to_string()].into();
/// assert!(has_access(&perms, r"\Api\Read"));
/// assert!(!has_access(&perms, r"\Api\Write"));
///
/// let admin: HashSet<String> = [GLOBAL_ACCESS.to_string()].into();
/// assert!(has_access(&admin, r"\Anything\Here"));
/// ```
pub fn has_access(effective_permissions: &HashSet<String>, required: &str) -> bool {
    effective_permissions.contains(required) || effective_permissions.contains(GLOBAL_ACCESS)
}

/// Resolve an entity's effective permissions and decide in one call.
///
/// Convenience wrapper for request handling: group references are
/// expanded live against the store, then the pure decision applies.
/// "No access" is an `Ok(false)`, only store failures are errors.
pub async fn entity_has_access(
    entity: &AccessEntity,
    store: &dyn EntityStore,
    required: &str,
) -> StoreResult<bool> {
    let effective = effective_permissions(entity, store).await?;
    Ok(has_access(&effective, required))
}
