//! In-process TTL cache keyed by normalised lookups.
//!
//! Entries expire against the injected [`Clock`], so tests drive expiry with a
//! mutable clock rather than sleeping. A poisoned lock is treated as a miss on
//! read and a dropped write; the cache never fails a request.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use tracing::warn;

struct Entry<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

/// Map whose entries expire after a fixed time-to-live.
pub struct TtlCache<K, V> {
    entries: Mutex<HashMap<K, Entry<V>>>,
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Create an empty cache.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// use mockable::DefaultClock;
    /// use nft_frames::domain::TtlCache;
    ///
    /// let cache: TtlCache<String, u32> =
    ///     TtlCache::new(Duration::from_secs(60), Arc::new(DefaultClock));
    /// cache.insert("a".to_owned(), 1);
    /// assert_eq!(cache.get(&"a".to_owned()), Some(1));
    /// ```
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let ttl = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX);
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// Return a live value, evicting it when expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.utc();
        let mut entries = self.lock()?;
        match entries.get(key) {
            Some(entry) if entry.expires_at > now => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a value, replacing any previous entry.
    pub fn insert(&self, key: K, value: V) {
        let now = self.clock.utc();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        if let Some(mut entries) = self.lock() {
            entries.retain(|_, entry| entry.expires_at > now);
            entries.insert(key, Entry { value, expires_at });
        }
    }

    /// Drop every expired entry.
    pub fn purge_expired(&self) {
        let now = self.clock.utc();
        if let Some(mut entries) = self.lock() {
            entries.retain(|_, entry| entry.expires_at > now);
        }
    }

    /// Configured time-to-live.
    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Number of stored entries, including ones not yet evicted.
    pub fn len(&self) -> usize {
        self.lock().map_or(0, |entries| entries.len())
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Option<MutexGuard<'_, HashMap<K, Entry<V>>>> {
        match self.entries.lock() {
            Ok(guard) => Some(guard),
            Err(_) => {
                warn!("ttl cache lock poisoned; bypassing cache");
                None
            }
        }
    }
}

impl<K, V> std::fmt::Debug for TtlCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache").field("ttl", &self.ttl).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MutableClock;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn clock() -> Arc<MutableClock> {
        Arc::new(MutableClock::new(
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
                .single()
                .expect("valid timestamp"),
        ))
    }

    fn cache(clock: &Arc<MutableClock>) -> TtlCache<&'static str, u32> {
        TtlCache::new(Duration::from_secs(30), clock.clone())
    }

    #[rstest]
    fn returns_value_until_expiry(clock: Arc<MutableClock>) {
        let cache = cache(&clock);
        cache.insert("k", 7);

        clock.advance_seconds(29);
        assert_eq!(cache.get(&"k"), Some(7));

        clock.advance_seconds(1);
        assert_eq!(cache.get(&"k"), None);
        assert!(cache.is_empty());
    }

    #[rstest]
    fn insert_overwrites_and_refreshes_expiry(clock: Arc<MutableClock>) {
        let cache = cache(&clock);
        cache.insert("k", 1);
        clock.advance_seconds(20);
        cache.insert("k", 2);
        clock.advance_seconds(20);
        assert_eq!(cache.get(&"k"), Some(2));
    }

    #[rstest]
    fn insert_sweeps_expired_entries(clock: Arc<MutableClock>) {
        let cache = cache(&clock);
        cache.insert("old", 1);
        clock.advance_seconds(31);
        cache.insert("new", 2);
        assert_eq!(cache.len(), 1);
    }

    #[rstest]
    fn purge_expired_keeps_live_entries(clock: Arc<MutableClock>) {
        let cache = cache(&clock);
        cache.insert("early", 1);
        clock.advance_seconds(20);
        cache.insert("late", 2);
        clock.advance_seconds(15);

        cache.purge_expired();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"late"), Some(2));
        assert_eq!(cache.ttl(), TimeDelta::seconds(30));
    }

    #[rstest]
    fn missing_key_is_a_miss(clock: Arc<MutableClock>) {
        assert_eq!(cache(&clock).get(&"absent"), None);
    }
}
