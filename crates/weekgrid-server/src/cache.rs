//! Week cache with TTL and tag-based invalidation.
//!
//! Entries are keyed by the source configuration signature and expire after
//! a TTL measured on the monotonic clock. Each entry carries a tag so a whole
//! family of entries can be dropped at once. The map sits behind an async
//! `RwLock` that is only held for map access, never across a fetch.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::{debug, info, trace};

use crate::week_data::WeekData;

/// Default entry lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Tag attached to calendar entries.
pub const CALENDAR_EVENTS_TAG: &str = "calendar-events";

/// Cache entry containing a week payload and its metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The cached payload. Immutable once stored.
    pub value: WeekData,
    /// Invalidation tag.
    pub tag: String,
    /// When the entry expires (monotonic clock).
    expires_at: Instant,
}

impl CacheEntry {
    /// Creates a new cache entry with the given TTL.
    pub fn new(value: WeekData, tag: impl Into<String>, ttl: Duration) -> Self {
        Self {
            value,
            tag: tag.into(),
            expires_at: Instant::now() + ttl,
        }
    }

    /// Returns true if the entry has expired.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    /// Returns the time until expiration.
    pub fn time_until_expiry(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}

/// Week cache shared between pipeline calls.
///
/// Meant to be held in an `Arc` and injected; all methods take `&self`.
#[derive(Debug)]
pub struct EventCache {
    /// TTL for entries stored with [`insert`](Self::insert).
    default_ttl: Duration,
    /// Entries keyed by configuration signature.
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl Default for EventCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl EventCache {
    /// Creates a new cache with the given default TTL.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            default_ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the default TTL.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Returns a copy of the payload under `key` if it has not expired.
    pub async fn get_valid(&self, key: &str) -> Option<WeekData> {
        let entries = self.entries.read().await;
        let entry = entries.get(key).filter(|entry| !entry.is_expired())?;
        trace!(
            key = %key,
            remaining_secs = entry.time_until_expiry().as_secs(),
            "Cache entry valid"
        );
        Some(entry.value.clone())
    }

    /// Stores `value` under `key` with the default TTL.
    pub async fn insert(&self, key: impl Into<String>, tag: impl Into<String>, value: WeekData) {
        self.insert_with_ttl(key, tag, value, self.default_ttl).await;
    }

    /// Stores `value` under `key` with a custom TTL, replacing any entry.
    ///
    /// Expired entries are dropped on the way in, so the map never holds more
    /// than the live entries plus those expired since the last write.
    pub async fn insert_with_ttl(
        &self,
        key: impl Into<String>,
        tag: impl Into<String>,
        value: WeekData,
        ttl: Duration,
    ) {
        let key = key.into();
        let entry = CacheEntry::new(value, tag, ttl);
        let events = entry.value.events.len();
        let tag = entry.tag.clone();

        let mut entries = self.entries.write().await;
        let evicted = purge_expired(&mut entries);
        let replaced = entries.insert(key.clone(), entry);
        drop(entries);

        info!(
            key = %key,
            tag = %tag,
            events,
            ttl_secs = ttl.as_secs(),
            replaced = replaced.is_some(),
            evicted,
            "Stored cache entry"
        );
    }

    /// Removes every entry carrying `tag`. Returns how many were dropped.
    pub async fn invalidate_tag(&self, tag: &str) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.tag != tag);
        let removed = before - entries.len();
        info!(tag = %tag, removed, "Invalidated cache tag");
        removed
    }

    /// Removes a cache entry.
    pub async fn remove(&self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.write().await.remove(key);
        if entry.is_some() {
            debug!(key = %key, "Removed cache entry");
        }
        entry
    }

    /// Clears all cache entries.
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        let count = entries.len();
        entries.clear();
        debug!(count, "Cleared all cache entries");
    }

    /// Removes all expired entries.
    pub async fn evict_expired(&self) -> usize {
        purge_expired(&mut *self.entries.write().await)
    }

    /// Returns the number of entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Drops expired entries from `entries`, returning how many went.
fn purge_expired(entries: &mut HashMap<String, CacheEntry>) -> usize {
    let before = entries.len();
    entries.retain(|key, entry| {
        let keep = !entry.is_expired();
        if !keep {
            trace!(key = %key, "Evicting expired cache entry");
        }
        keep
    });
    let evicted = before - entries.len();
    if evicted > 0 {
        debug!(evicted, "Evicted expired cache entries");
    }
    evicted
}
