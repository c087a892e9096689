//! Response cache implementation.

use crate::CacheConfig;
use derive_getters::Getters;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;

/// Cache entry with value and insertion time.
#[derive(Debug, Clone, Getters)]
pub struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    #[getter(skip)]
    last_access: u64,
}

impl<V> CacheEntry<V> {
    /// Check if this entry has outlived `ttl`.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() >= ttl
    }

    /// Get remaining time until expiration.
    pub fn time_remaining(&self, ttl: Duration) -> Option<Duration> {
        ttl.checked_sub(self.inserted_at.elapsed())
    }
}

/// Hit and miss counters for one cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Lookups answered from a live entry
    pub hits: u64,
    /// Lookups that ran the compute closure
    pub misses: u64,
}

struct Slots<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    tick: u64,
}

type Gate = Arc<tokio::sync::Mutex<()>>;

/// Keyed cache with a per-instance TTL and LRU capacity bound.
///
/// Expiry is evaluated lazily when a key is read; nothing sweeps the cache in
/// the background. Once the entry count exceeds `capacity`, the least
/// recently used entry is evicted.
///
/// Concurrent [`get_or_compute`](Self::get_or_compute) calls for the same key
/// share a per-key gate, so only one of them runs the compute closure while
/// the rest wait and then read the stored value.
///
/// # Example
///
/// ```
/// use bgpbot_cache::{CacheConfig, ResponseCache};
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let cache = ResponseCache::new("route", CacheConfig::new(20, Duration::from_secs(60)));
///
/// let first: Result<String, ()> = cache
///     .get_or_compute("1.1.1.1".to_string(), || async { Ok("1.1.1.0/24".to_string()) })
///     .await;
/// let second: Result<String, ()> = cache
///     .get_or_compute("1.1.1.1".to_string(), || async { unreachable!() })
///     .await;
/// assert_eq!(first, second);
/// # }
/// ```
pub struct ResponseCache<K, V> {
    name: String,
    config: CacheConfig,
    slots: Mutex<Slots<K, V>>,
    inflight: Mutex<HashMap<K, Gate>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K, V> ResponseCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    /// Create a new cache. `name` labels the cache in log output.
    pub fn new(name: impl Into<String>, config: CacheConfig) -> Self {
        let name = name.into();
        let config = if *config.capacity() == 0 {
            tracing::warn!(cache = %name, "Cache capacity of 0 raised to 1");
            config.with_capacity(1)
        } else {
            config
        };
        tracing::debug!(
            cache = %name,
            capacity = config.capacity(),
            ttl = ?config.ttl(),
            "Creating new ResponseCache"
        );
        Self {
            name,
            config,
            slots: Mutex::new(Slots {
                entries: HashMap::new(),
                tick: 0,
            }),
            inflight: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// The label given at construction.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The configuration in effect.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Return the live value for `key`, or run `compute` and store its result.
    ///
    /// A failed compute is returned to the caller and nothing is stored, so
    /// the next lookup for the same key computes again. With a TTL of zero
    /// every call computes.
    #[tracing::instrument(
        skip(self, key, compute),
        fields(cache = %self.name, key = ?key, cache_hit)
    )]
    pub async fn get_or_compute<F, Fut, E>(&self, key: K, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if !self.config.is_enabled() {
            tracing::debug!("Cache disabled, computing directly");
            self.misses.fetch_add(1, Ordering::Relaxed);
            return compute().await;
        }

        if let Some(value) = self.get(&key) {
            self.record_hit();
            return Ok(value);
        }

        let gate = InflightGate::acquire(self, &key);
        let _permit = gate.lock().await;

        // Another caller may have filled the entry while this one waited.
        if let Some(value) = self.get(&key) {
            self.record_hit();
            return Ok(value);
        }

        tracing::Span::current().record("cache_hit", false);
        self.misses.fetch_add(1, Ordering::Relaxed);
        let value = compute().await?;
        self.insert(key, value.clone());
        Ok(value)
    }

    /// Get a live cached value.
    ///
    /// Returns None if the entry doesn't exist, is expired, or caching is
    /// disabled. An expired entry is removed as a side effect.
    pub fn get(&self, key: &K) -> Option<V> {
        if !self.config.is_enabled() {
            return None;
        }

        let ttl = self.config.ttl();
        let mut slots = self.slots.lock();

        if slots.entries.get(key)?.is_expired(ttl) {
            tracing::debug!(cache = %self.name, key = ?key, "Cache entry expired, removing");
            slots.entries.remove(key);
            return None;
        }

        slots.tick += 1;
        let tick = slots.tick;
        let entry = slots.entries.get_mut(key)?;
        entry.last_access = tick;

        tracing::trace!(
            cache = %self.name,
            time_remaining = ?entry.time_remaining(ttl),
            "Cache hit"
        );
        Some(entry.value.clone())
    }

    /// Store a value, evicting the least recently used entry if the cache
    /// grows past capacity.
    pub fn insert(&self, key: K, value: V) {
        if !self.config.is_enabled() {
            tracing::debug!(cache = %self.name, "Cache disabled, skipping insert");
            return;
        }

        let mut slots = self.slots.lock();
        slots.tick += 1;
        let entry = CacheEntry {
            value,
            inserted_at: Instant::now(),
            last_access: slots.tick,
        };
        slots.entries.insert(key, entry);

        while slots.entries.len() > *self.config.capacity() {
            let Some(lru) = slots
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_access)
                .map(|(key, _)| key.clone())
            else {
                break;
            };
            tracing::debug!(cache = %self.name, key = ?lru, "Evicting LRU entry");
            slots.entries.remove(&lru);
        }

        tracing::debug!(
            cache = %self.name,
            cache_size = slots.entries.len(),
            "Inserted entry into cache"
        );
    }

    /// Drop every entry.
    pub fn clear(&self) {
        let mut slots = self.slots.lock();
        let count = slots.entries.len();
        slots.entries.clear();
        tracing::info!(cache = %self.name, cleared = count, "Cleared cache");
    }

    /// Number of stored entries, including expired ones not yet read.
    pub fn len(&self) -> usize {
        self.slots.lock().entries.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.lock().entries.is_empty()
    }

    /// Hit and miss counts since construction.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    fn record_hit(&self) {
        tracing::Span::current().record("cache_hit", true);
        self.hits.fetch_add(1, Ordering::Relaxed);
    }
}

/// Claim on the per-key gate serializing computes for one key.
///
/// The map entry is removed by whichever claim drops last, including claims
/// dropped by a cancelled lookup.
struct InflightGate<'a, K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    cache: &'a ResponseCache<K, V>,
    key: K,
    gate: Option<Gate>,
}

impl<'a, K, V> InflightGate<'a, K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    fn acquire(cache: &'a ResponseCache<K, V>, key: &K) -> Self {
        let gate = cache
            .inflight
            .lock()
            .entry(key.clone())
            .or_default()
            .clone();
        Self {
            cache,
            key: key.clone(),
            gate: Some(gate),
        }
    }

    async fn lock(&self) -> Option<tokio::sync::MutexGuard<'_, ()>> {
        match &self.gate {
            Some(gate) => Some(gate.lock().await),
            None => None,
        }
    }
}

impl<K, V> Drop for InflightGate<'_, K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    fn drop(&mut self) {
        let Some(gate) = self.gate.take() else {
            return;
        };
        let mut inflight = self.cache.inflight.lock();
        // One reference is held by the map, one by this claim.
        if Arc::strong_count(&gate) <= 2
            && inflight
                .get(&self.key)
                .is_some_and(|current| Arc::ptr_eq(current, &gate))
        {
            inflight.remove(&self.key);
        }
        drop(gate);
    }
}
