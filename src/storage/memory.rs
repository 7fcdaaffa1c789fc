use dashmap::{mapref::entry::Entry, DashMap};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use super::StorageError;

#[derive(Clone, Debug)]
struct CacheEntry<T> {
    value: T,
    expires_at: Instant,
}

impl<T> CacheEntry<T> {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-process key/value cache with a sliding per-entry TTL.
///
/// Expired entries are dropped when read and purged before a new key is
/// inserted. When the map is full the entry closest to expiry is evicted.
#[derive(Clone, Debug)]
pub struct MemoryCache<T: Clone> {
    cache: Arc<DashMap<String, CacheEntry<T>>>,
    capacity: usize,
    ttl: Duration,
}

impl<T: Clone> MemoryCache<T> {
    pub fn new(capacity: usize, ttl: Duration) -> Result<Self, StorageError> {
        if capacity == 0 {
            return Err(StorageError::Memory("Cache capacity must be positive".to_string()));
        }

        Ok(Self {
            cache: Arc::new(DashMap::with_capacity(capacity)),
            capacity,
            ttl,
        })
    }

    pub fn get(&self, key: &str) -> Option<T> {
        let now = Instant::now();
        {
            let entry = self.cache.get(key)?;
            if !entry.is_expired(now) {
                return Some(entry.value.clone());
            }
        }

        self.cache.remove_if(key, |_, entry| entry.is_expired(now));
        None
    }

    /// Applies `f` to the live value under `key`, starting from `init()` when the
    /// key is absent or expired. Refreshes the entry's TTL.
    pub fn update<R>(&self, key: &str, init: impl FnOnce() -> T, f: impl FnOnce(&mut T) -> R) -> R {
        self.make_room(key);

        let now = Instant::now();
        let expires_at = now + self.ttl;

        let mut slot = match self.cache.entry(key.to_string()) {
            Entry::Occupied(occupied) => {
                let mut slot = occupied.into_ref();
                if slot.is_expired(now) {
                    slot.value = init();
                }
                slot
            }
            Entry::Vacant(vacant) => vacant.insert(CacheEntry {
                value: init(),
                expires_at,
            }),
        };

        slot.expires_at = expires_at;
        f(&mut slot.value)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.cache.len();
        self.cache.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.cache.len())
    }

    fn make_room(&self, key: &str) {
        if self.cache.contains_key(key) {
            return;
        }

        let purged = self.purge_expired();
        if purged > 0 {
            debug!("Purged {} expired cache entries", purged);
        }

        if self.len() < self.capacity {
            return;
        }

        let oldest = self
            .cache
            .iter()
            .min_by_key(|entry| entry.value().expires_at)
            .map(|entry| entry.key().clone());

        if let Some(oldest) = oldest {
            warn!("Cache full ({} entries), evicting {}", self.capacity, oldest);
            self.cache.remove(&oldest);
        }
    }
}
