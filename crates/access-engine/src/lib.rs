//! # Access Engine
//!
//! This crate answers the two questions at the heart of the access
//! platform: *what does an entity effectively hold* and *may it perform
//! this action* — and it keeps the answer trustworthy by cascading
//! revocations when access levels or entities disappear.
//!
//! ## Overview
//!
//! The access-engine crate handles:
//! - **Storage seam**: the [`EntityStore`] trait every backend implements,
//!   plus an in-memory implementation for tests and embedders
//! - **Permission resolution**: expanding `\Group\<uuid>` references one
//!   level deep into an entity's effective permission set
//! - **Access decisions**: exact key match, with the `\Global\*`
//!   super-admin sentinel as the single wildcard
//! - **Access-level registry**: register/unregister with an atomic
//!   revocation cascade, and namespace-scoped bulk removal
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use access_engine::{has_access, AccessLevelRegistry, EntityStore, MemoryStore};
//! use access_model::{AccessEntity, AccessLevel};
//!
//! # async fn demo() -> Result<(), access_engine::EngineError> {
//! let store: Arc<dyn EntityStore> = Arc::new(MemoryStore::new());
//! let mut registry = AccessLevelRegistry::new(Arc::clone(&store));
//!
//! registry.register(AccessLevel::new(r"\Users\Manage", "Manage users", "users")).await?;
//!
//! let user = store.insert_entity(&AccessEntity::user("alice")).await?;
//! registry.grant(&user.uuid, r"\Users\Manage", None).await?;
//!
//! let effective = access_engine::effective_permissions(&user, store.as_ref()).await?;
//! assert!(has_access(&effective, r"\Users\Manage"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! Nothing in this crate holds request-scoped mutable state. Reads run
//! unsynchronized against a point-in-time snapshot; compound writes (the
//! revocation cascade, uniqueness-checked inserts) are single atomic
//! store calls.

pub mod decision;
pub mod error;
pub mod registry;
pub mod resolver;
pub mod store;

#[cfg(feature = "memory")]
pub mod memory;

// Re-export main types for convenience
pub use decision::{entity_has_access, has_access};
pub use error::{EngineError, EngineResult};
pub use registry::AccessLevelRegistry;
pub use resolver::{effective_permissions, resolve};
pub use store::{EntityStore, StoreError, StoreResult};

#[cfg(feature = "memory")]
pub use memory::MemoryStore;
