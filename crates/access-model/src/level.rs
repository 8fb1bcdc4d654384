//! # Access Levels
//!
//! An access level is a named capability key, owned by a namespace.
//! Keys are hierarchical strings such as `\Users\Manage` and are matched
//! exactly — the single exception is the super-admin sentinel
//! [`GLOBAL_ACCESS`], which satisfies every check.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The super-admin sentinel key.
///
/// An entity holding this key passes every access check. It is the only
/// wildcard in the system; all other keys are compared exactly.
pub const GLOBAL_ACCESS: &str = r"\Global\*";

/// Prefix marking a permission entry as a group reference.
///
/// A raw permission of the form `\Group\<uuid>` means "inherit everything
/// group `<uuid>` holds". It is resolved dynamically and never stored in
/// expanded form.
pub const GROUP_PREFIX: &str = r"\Group\";

/// A capability identifier registered by a module.
///
/// # Example
///
/// ```
/// use access_model::AccessLevel;
///
/// let level = AccessLevel::new(r"\Users\Manage", "Manage users", "users")
///     .with_description("Create, edit and delete user accounts");
/// assert_eq!(level.namespace, "users");
/// assert!(!level.is_global());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessLevel {
    /// Hierarchical key, unique across the whole registry (e.g. `\Users\Manage`).
    pub key: String,

    /// Human-readable name, used for translation lookups.
    pub name: String,

    /// Longer human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Owning module. Used to remove a module's levels in bulk when it is
    /// deactivated.
    pub namespace: String,
}

impl AccessLevel {
    /// Create a new access level.
    ///
    /// # Arguments
    ///
    /// * `key` - Unique hierarchical key
    /// * `name` - Human-readable name
    /// * `namespace` - Owning module
    pub fn new(key: impl Into<String>, name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            description: None,
            namespace: namespace.into(),
        }
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether this is the super-admin sentinel.
    pub fn is_global(&self) -> bool {
        self.key == GLOBAL_ACCESS
    }
}

/// Build the group-reference permission entry for a group's UUID.
///
/// # Example
///
/// ```
/// use access_model::{group_reference, parse_group_reference};
/// use uuid::Uuid;
///
/// let id = Uuid::now_v7();
/// let entry = group_reference(&id);
/// assert_eq!(parse_group_reference(&entry), Some(id));
/// ```
pub fn group_reference(group_uuid: &Uuid) -> String {
    format!("{}{}", GROUP_PREFIX, group_uuid)
}

/// Parse a raw permission entry as a group reference.
///
/// # Returns
///
/// The referenced group's UUID, or `None` if the entry is an ordinary
/// access-level key or the suffix is not a valid UUID.
pub fn parse_group_reference(entry: &str) -> Option<Uuid> {
    let suffix = entry.strip_prefix(GROUP_PREFIX)?;
    Uuid::parse_str(suffix).ok()
}
