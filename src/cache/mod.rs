//! Role caching subsystem.
//!
//! # Data Flow
//! ```text
//! engine role resolution
//!     → RoleCache::get (fresh hit suppresses the provider call)
//!     → miss: provider lookup → RoleCache::set with 60s TTL
//!
//! background:
//!     sweeper task (60s interval) → RoleCache::sweep → drop expired entries
//! ```

pub mod role_cache;

pub use role_cache::{CacheError, InMemoryRoleCache, RoleCache, RoleCacheEntry};
