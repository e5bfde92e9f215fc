//! In-process role cache with TTL expiry.
//!
//! # Responsibilities
//! - Cache user-id → role lookups for a bounded staleness window
//! - Drop expired entries lazily on read and periodically via a sweep task
//!
//! # Design Decisions
//! - Expiry is checked on every `get`, so a stale entry forces a fresh
//!   lookup even before the sweep runs
//! - No invalidation on role change: a changed role is observed after at
//!   most one TTL (60s by default)
//! - Concurrent misses for the same user both hit the provider; the
//!   redundant lookup is cheaper than coalescing machinery
//! - The trait is fallible so an external backing store can be substituted;
//!   the in-memory implementation never errors

use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Failure in the cache backing store.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),
}

/// A cached role with its expiry deadline.
#[derive(Debug, Clone)]
pub struct RoleCacheEntry {
    pub role: String,
    pub expires_at: Instant,
}

impl RoleCacheEntry {
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Cache of user-id → role with TTL semantics.
pub trait RoleCache: Send + Sync {
    /// Fresh cached role for the user. Expired entries are never returned.
    fn get(&self, user_id: &str) -> Result<Option<String>, CacheError>;

    /// Store a role with the given TTL, replacing any previous entry.
    fn set(&self, user_id: &str, role: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Remove all expired entries.
    fn sweep(&self) -> Result<(), CacheError>;
}

/// Thread-safe in-memory role cache.
#[derive(Clone, Default)]
pub struct InMemoryRoleCache {
    inner: Arc<DashMap<String, RoleCacheEntry>>,
    sweeper_started: Arc<AtomicBool>,
}

impl InMemoryRoleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held, fresh or expired.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Spawn the periodic sweep task.
    ///
    /// Idempotent: only the first call spawns a task, later calls return
    /// false and do nothing. The task exits on the shutdown signal.
    pub fn start_sweeper(&self, interval: Duration, shutdown: &Shutdown) -> bool {
        if self.sweeper_started.swap(true, Ordering::SeqCst) {
            return false;
        }

        let cache = self.clone();
        let mut rx = shutdown.subscribe();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately; skip it so the initial
            // sweep happens one full interval after startup.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let _ = cache.sweep();
                    }
                    _ = rx.recv() => {
                        tracing::debug!("role cache sweeper stopping");
                        break;
                    }
                }
            }
        });
        true
    }
}

impl RoleCache for InMemoryRoleCache {
    fn get(&self, user_id: &str) -> Result<Option<String>, CacheError> {
        match self.inner.get(user_id) {
            Some(entry) if !entry.is_expired() => Ok(Some(entry.role.clone())),
            _ => Ok(None),
        }
    }

    fn set(&self, user_id: &str, role: &str, ttl: Duration) -> Result<(), CacheError> {
        self.inner.insert(
            user_id.to_string(),
            RoleCacheEntry {
                role: role.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        metrics::record_cache_size(self.inner.len());
        Ok(())
    }

    fn sweep(&self) -> Result<(), CacheError> {
        let before = self.inner.len();
        self.inner.retain(|_, entry| !entry.is_expired());
        let removed = before.saturating_sub(self.inner.len());
        if removed > 0 {
            tracing::debug!(removed, "swept expired role cache entries");
        }
        metrics::record_cache_size(self.inner.len());
        Ok(())
    }
}
