//! Eviction Cache Module
//!
//! Concurrent key/value store with sliding-TTL expiry. Every live entry owns
//! exactly one pending timer; a counted access re-arms it. Timer fires are
//! validated against the entry's generation, so a fire that lost a race with
//! an access, overwrite or removal does nothing.

use std::borrow::Borrow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::cache::{CacheEntry, CacheKey, CacheStats};
use crate::cache::stats::StatsCounters;
use crate::error::{BridgeError, Result};
use crate::scheduler::{Scheduler, TimerHandle, TokioScheduler};

/// Callback invoked with the evicted pair when an entry times out.
pub type EvictionListener<K, V> = Arc<dyn Fn(&K, &V) + Send + Sync>;

struct Inner<K: CacheKey, V> {
    entries: DashMap<K, CacheEntry<V>>,
    listeners: RwLock<Vec<EvictionListener<K, V>>>,
    scheduler: Arc<dyn Scheduler>,
    ttl: Duration,
    next_generation: AtomicU64,
    stats: StatsCounters,
}

// == Eviction Cache ==
/// Key/value cache evicting entries idle for longer than their TTL.
///
/// Cloning is cheap and yields a handle to the same cache. A zero TTL turns
/// expiry off: entries live until removed.
pub struct EvictionCache<K: CacheKey, V> {
    inner: Arc<Inner<K, V>>,
}

impl<K: CacheKey, V> Clone for EvictionCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> EvictionCache<K, V>
where
    K: CacheKey + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a cache whose timers run on the tokio runtime.
    ///
    /// # Arguments
    /// * `ttl` - Idle time after which an entry is evicted
    pub fn new(ttl: Duration) -> Self {
        Self::with_scheduler(ttl, Arc::new(TokioScheduler::new()))
    }

    /// Creates a cache driven by the given scheduler.
    pub fn with_scheduler(ttl: Duration, scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: DashMap::new(),
                listeners: RwLock::new(Vec::new()),
                scheduler,
                ttl,
                next_generation: AtomicU64::new(1),
                stats: StatsCounters::default(),
            }),
        }
    }

    /// Default idle TTL for entries.
    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    // == Listeners ==
    /// Registers a callback fired for every timeout-driven eviction.
    ///
    /// Listeners run in registration order on the scheduler's context, never
    /// inside a caller's `put`/`get`. Explicit removal and overwrite are silent.
    pub fn add_eviction_listener<F>(&self, listener: F)
    where
        F: Fn(&K, &V) + Send + Sync + 'static,
    {
        self.inner.listeners.write().push(Arc::new(listener));
    }

    // == Put ==
    /// Inserts or replaces a value, arming a fresh idle timer.
    ///
    /// An overwritten entry's timer is cancelled and no listener fires for it.
    /// Returns the previous value, if any.
    pub fn put(&self, key: K, value: V) -> Result<Option<V>> {
        self.put_with_ttl(key, value, self.inner.ttl)
    }

    /// Like `put`, with a per-entry TTL. A zero TTL means never expire.
    pub fn put_with_ttl(&self, key: K, value: V, ttl: Duration) -> Result<Option<V>> {
        validate(&key)?;

        // Timers are armed under the key's lock so a fire cannot observe the
        // map before the entry carrying its generation is in place.
        let generation = self.inner.next_generation();
        let now = self.inner.scheduler.now();
        match self.inner.entries.entry(key) {
            Entry::Occupied(mut occupied) => {
                let timer = self.inner.arm(occupied.key().clone(), generation, ttl)?;
                let fresh = CacheEntry::new(value, generation, ttl, now, timer);
                let (previous, old_timer) = std::mem::replace(occupied.get_mut(), fresh).into_parts();
                self.inner.disarm(old_timer);
                debug!(generation, "cache entry overwritten");
                Ok(Some(previous))
            }
            Entry::Vacant(vacant) => {
                let timer = self.inner.arm(vacant.key().clone(), generation, ttl)?;
                vacant.insert(CacheEntry::new(value, generation, ttl, now, timer));
                debug!(generation, "cache entry inserted");
                Ok(None)
            }
        }
    }

    /// Inserts only when the key is absent.
    ///
    /// Returns the existing value otherwise; an existing entry's timer is left
    /// untouched, this is not a counted access.
    pub fn put_if_absent(&self, key: K, value: V) -> Result<Option<V>> {
        validate(&key)?;

        match self.inner.entries.entry(key) {
            Entry::Occupied(occupied) => Ok(Some(occupied.get().value.clone())),
            Entry::Vacant(vacant) => {
                let generation = self.inner.next_generation();
                let ttl = self.inner.ttl;
                let now = self.inner.scheduler.now();
                let timer = self.inner.arm(vacant.key().clone(), generation, ttl)?;
                vacant.insert(CacheEntry::new(value, generation, ttl, now, timer));
                debug!(generation, "cache entry inserted if absent");
                Ok(None)
            }
        }
    }

    // == Get ==
    /// Counted access: returns the value and slides its idle window.
    ///
    /// A miss has no side effect beyond the miss counter. If the new timer
    /// cannot be armed the entry keeps its previous window and the failure
    /// is returned.
    pub fn get<Q>(&self, key: &Q) -> Result<Option<V>>
    where
        K: Borrow<Q>,
        Q: CacheKey + ?Sized,
    {
        validate(key)?;

        let Some(mut entry) = self.inner.entries.get_mut(key) else {
            self.inner.stats.record_miss();
            return Ok(None);
        };

        let generation = self.inner.next_generation();
        let timer = self.inner.arm(entry.key().clone(), generation, entry.ttl)?;
        let old_timer = entry.refresh(generation, self.inner.scheduler.now(), timer);
        self.inner.disarm(old_timer);

        self.inner.stats.record_hit();
        trace!(generation, "cache entry refreshed");
        Ok(Some(entry.value.clone()))
    }

    // == Peek ==
    /// Whether a live entry exists. Does not count as an access.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: CacheKey + ?Sized,
    {
        self.inner.entries.contains_key(key)
    }

    /// Remaining idle time for a key without counting as an access.
    ///
    /// Measured on the scheduler's clock. `None` for missing keys and for
    /// entries that never expire.
    pub fn ttl_remaining<Q>(&self, key: &Q) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: CacheKey + ?Sized,
    {
        self.inner
            .entries
            .get(key)
            .and_then(|entry| entry.ttl_remaining(self.inner.scheduler.now()))
    }

    // == Remove ==
    /// Deletes an entry and cancels its timer. Never notifies listeners.
    pub fn remove<Q>(&self, key: &Q) -> Result<Option<V>>
    where
        K: Borrow<Q>,
        Q: CacheKey + ?Sized,
    {
        validate(key)?;

        Ok(self.inner.entries.remove(key).map(|(_, entry)| {
            let (value, timer) = entry.into_parts();
            self.inner.disarm(timer);
            debug!("cache entry removed");
            value
        }))
    }

    /// Removes every entry silently.
    pub fn clear(&self) {
        self.inner.entries.retain(|_, entry| {
            self.inner.disarm(entry.take_timer());
            false
        });
        debug!("cache cleared");
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.inner.stats.snapshot(self.inner.entries.len())
    }

    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }
}

impl<K, V> Inner<K, V>
where
    K: CacheKey + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn next_generation(&self) -> u64 {
        self.next_generation.fetch_add(1, Ordering::Relaxed)
    }

    /// Arms the expiry timer for one generation of an entry.
    fn arm(self: &Arc<Self>, key: K, generation: u64, ttl: Duration) -> Result<Option<TimerHandle>> {
        if ttl.is_zero() {
            return Ok(None);
        }

        let cache: Weak<Self> = Arc::downgrade(self);
        let handle = self.scheduler.schedule(
            ttl,
            Box::new(move || {
                if let Some(inner) = cache.upgrade() {
                    inner.expire(&key, generation);
                }
            }),
        )?;
        Ok(Some(handle))
    }

    fn disarm(&self, timer: Option<TimerHandle>) {
        if let Some(timer) = timer {
            self.scheduler.cancel(timer);
        }
    }

    /// Timer callback: evicts the entry iff `generation` is still current.
    fn expire(&self, key: &K, generation: u64) {
        match self
            .entries
            .remove_if(key, |_, entry| entry.generation == generation)
        {
            Some((key, entry)) => {
                self.stats.record_eviction();
                let idle_ms = entry.idle_for(self.scheduler.now()).as_millis() as u64;
                debug!(generation, idle_ms, "cache entry evicted");

                let listeners = self.listeners.read().clone();
                for listener in &listeners {
                    listener(&key, &entry.value);
                }
            }
            None => {
                self.stats.record_stale_fire();
                trace!(generation, "stale eviction timer ignored");
            }
        }
    }
}

impl<K: CacheKey, V> Drop for Inner<K, V> {
    fn drop(&mut self) {
        for mut entry in self.entries.iter_mut() {
            if let Some(timer) = entry.take_timer() {
                self.scheduler.cancel(timer);
            }
        }
    }
}

fn validate<Q: CacheKey + ?Sized>(key: &Q) -> Result<()> {
    if key.is_blank() {
        return Err(BridgeError::InvalidArgument(
            "cache key must not be blank".to_string(),
        ));
    }
    Ok(())
}
