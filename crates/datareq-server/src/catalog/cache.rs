//! Memoized user lookups
//!
//! Enriching a page of requests and comments asks for the same handful of
//! users over and over. [`UserCache`] keeps recent answers for a bounded
//! time and a bounded number of entries; [`CachedCatalog`] puts it in front
//! of any [`CatalogLookup`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use super::{CatalogLookup, CatalogResult, DatasetSummary, OrganizationSummary, UserSummary};

/// Default number of cached users
pub const DEFAULT_USER_CACHE_CAPACITY: usize = 1024;

/// Default lifetime of a cached user in seconds
pub const DEFAULT_USER_CACHE_TTL_SECS: u64 = 300;

#[derive(Debug, Clone)]
struct CacheEntry {
    user: UserSummary,
    inserted_at: Instant,
}

/// Bounded TTL cache of user lookups, keyed by the value the caller asked for
#[derive(Debug)]
pub struct UserCache {
    entries: DashMap<String, CacheEntry>,
    capacity: usize,
    ttl: Duration,
}

impl UserCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            capacity: capacity.max(1),
            ttl,
        }
    }

    /// Fresh entry for `key`, dropping it if expired
    pub fn get(&self, key: &str) -> Option<UserSummary> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                return Some(entry.user.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            tracing::trace!(key = %key, "User cache entry expired");
            self.entries.remove(key);
        }
        None
    }

    pub fn insert(&self, key: impl Into<String>, user: UserSummary) {
        let key = key.into();
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict();
        }
        self.entries.insert(
            key,
            CacheEntry {
                user,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Forget `key` and any entry that resolved to the same user id
    pub fn invalidate(&self, key: &str) {
        let user_id = self
            .entries
            .remove(key)
            .map(|(_, entry)| entry.user.id)
            .unwrap_or_else(|| key.to_string());
        self.entries.retain(|_, entry| entry.user.id != user_id);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop expired entries, or the oldest one if nothing has expired
    fn evict(&self) {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.inserted_at.elapsed() < self.ttl);
        if self.entries.len() < before {
            return;
        }

        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().inserted_at)
            .map(|entry| entry.key().clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }
}

impl Default for UserCache {
    fn default() -> Self {
        Self::new(
            DEFAULT_USER_CACHE_CAPACITY,
            Duration::from_secs(DEFAULT_USER_CACHE_TTL_SECS),
        )
    }
}

/// Caches `get_user`; organizations and datasets pass straight through
pub struct CachedCatalog<C> {
    inner: C,
    users: Arc<UserCache>,
}

impl<C: CatalogLookup> CachedCatalog<C> {
    pub fn new(inner: C, users: Arc<UserCache>) -> Self {
        Self { inner, users }
    }

    pub fn cache(&self) -> &Arc<UserCache> {
        &self.users
    }
}

#[async_trait]
impl<C: CatalogLookup> CatalogLookup for CachedCatalog<C> {
    async fn get_user(&self, id_or_name: &str) -> CatalogResult<UserSummary> {
        if let Some(user) = self.users.get(id_or_name) {
            tracing::trace!(user = %id_or_name, "User cache hit");
            return Ok(user);
        }

        let user = self.inner.get_user(id_or_name).await?;
        if user.id != id_or_name {
            self.users.insert(user.id.clone(), user.clone());
        }
        self.users.insert(id_or_name, user.clone());
        Ok(user)
    }

    async fn get_organization(&self, id_or_name: &str) -> CatalogResult<OrganizationSummary> {
        self.inner.get_organization(id_or_name).await
    }

    async fn get_package(&self, id_or_name: &str) -> CatalogResult<DatasetSummary> {
        self.inner.get_package(id_or_name).await
    }
}
