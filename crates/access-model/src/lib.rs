//! # Access Model
//!
//! This crate provides the domain model for the access platform,
//! shared by the decision engine and the request-signing protocol.
//!
//! ## Overview
//!
//! The access-model crate defines:
//! - **Entities**: Every principal that can hold permissions — users,
//!   groups, and API tokens — as one tagged type
//! - **Access Levels**: Named capability keys owned by a namespace
//! - **Permission Grants**: Audit-carrying records linking an entity to
//!   an access level
//!
//! ## Architecture
//!
//! ```text
//! AccessEntity (user | group | token)
//!     └── permissions: raw access-level keys, e.g. "\Module\Action"
//!           ├── "\Global\*"        - super-admin sentinel
//!           └── "\Group\<uuid>"    - inherit a group's permissions
//! ```
//!
//! Access-level keys are matched exactly; the only wildcard is the
//! reserved super-admin sentinel [`GLOBAL_ACCESS`]. A permission entry of
//! the form `\Group\<uuid>` is a *group reference*: it is expanded
//! dynamically by the resolver in `access-engine`, one level deep, and is
//! never persisted in expanded form.
//!
//! ## Usage
//!
//! ```rust
//! use access_model::{AccessEntity, AccessLevel, EntityKind, group_reference};
//!
//! let mut admins = AccessEntity::group("Administrators");
//! admins.grant(r"\Users\Manage");
//!
//! let mut alice = AccessEntity::user("alice");
//! alice.grant(group_reference(&admins.uuid));
//!
//! assert_eq!(alice.kind, EntityKind::User);
//! assert!(alice.has_raw(&group_reference(&admins.uuid)));
//!
//! let level = AccessLevel::new(r"\Users\Manage", "Manage users", "users");
//! assert!(!level.is_global());
//! ```

pub mod entity;
pub mod grant;
pub mod level;
pub mod password;

// Re-export main types for convenience
pub use entity::{AccessEntity, EntityKind};
pub use grant::PermissionGrant;
pub use level::{group_reference, parse_group_reference, AccessLevel, GLOBAL_ACCESS, GROUP_PREFIX};
