//! # Thread-safe cache handle
//!
//! [`ConcurrentCache`] puts a [`CacheCore`] behind one `parking_lot::Mutex` and
//! holds it for the whole of every call, so compound operations such as
//! [`contains_or_add`](ConcurrentCache::contains_or_add) observe and mutate in a
//! single critical section. Handles are cheap to clone and share one cache.
//!
//! ```text
//!   thread A ──┐
//!   thread B ──┼──► Arc<Shared> ──► Mutex<CacheCore<K, V, O>>
//!   thread C ──┘        │
//!                       └── owner: AtomicUsize  (token of the lock holder)
//! ```
//!
//! A mutex rather than a read/write lock: every lookup may write (`get` records
//! an access, any lookup may delete an expired entry).
//!
//! ## Re-entrancy
//!
//! The eviction callback runs with the lock held. Calling back into the same
//! cache from it would deadlock; instead the handle remembers which thread
//! holds the lock and panics when that thread tries to take it again.
//!
//! ## Example
//!
//! ```
//! use std::thread;
//! use evictkit::Cache;
//!
//! let cache: Cache<u64, String> = Cache::new_lfu(64).unwrap();
//! let handles: Vec<_> = (0..4)
//!     .map(|t| {
//!         let cache = cache.clone();
//!         thread::spawn(move || {
//!             for i in 0..100 {
//!                 cache.add(t * 1000 + i, format!("v{i}"), None);
//!             }
//!         })
//!     })
//!     .collect();
//! for h in handles {
//!     h.join().unwrap();
//! }
//! assert!(cache.len() <= 64);
//! ```

use std::fmt;
use std::hash::Hash;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::{Mutex, MutexGuard};

use crate::core::CacheCore;
use crate::entry::Expiry;
use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::{CacheMetricsSnapshot, MetricsSnapshotProvider};
use crate::traits::{EvictCallback, EvictionOrder};

const NO_OWNER: usize = 0;

thread_local! {
    static THREAD_TOKEN: u8 = const { 0 };
}

/// Non-zero value unique to the calling thread while it is alive.
fn thread_token() -> usize {
    THREAD_TOKEN.with(|token| token as *const u8 as usize)
}

struct Shared<K, V, O> {
    core: Mutex<CacheCore<K, V, O>>,
    owner: AtomicUsize,
}

/// Exclusive access to the core; clears the owner before unlocking.
struct CoreGuard<'a, K, V, O> {
    guard: MutexGuard<'a, CacheCore<K, V, O>>,
    owner: &'a AtomicUsize,
}

impl<K, V, O> Deref for CoreGuard<'_, K, V, O> {
    type Target = CacheCore<K, V, O>;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl<K, V, O> DerefMut for CoreGuard<'_, K, V, O> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard
    }
}

impl<K, V, O> Drop for CoreGuard<'_, K, V, O> {
    fn drop(&mut self) {
        // Runs before `guard` is dropped, i.e. while the lock is still held.
        self.owner.store(NO_OWNER, Ordering::Relaxed);
    }
}

/// Shareable, internally locked cache generic over its eviction ordering.
///
/// Most code uses the [`Cache`](crate::Cache) alias, whose ordering is picked
/// at runtime. Use [`with_order`](Self::with_order) to fix the ordering type.
pub struct ConcurrentCache<K, V, O> {
    shared: Arc<Shared<K, V, O>>,
}

impl<K, V, O> Clone for ConcurrentCache<K, V, O> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<K, V, O> ConcurrentCache<K, V, O>
where
    K: Eq + Hash + Clone,
    O: EvictionOrder<K, V>,
{
    /// Wraps an already-built core.
    pub fn from_core(core: CacheCore<K, V, O>) -> Self {
        Self {
            shared: Arc::new(Shared {
                core: Mutex::new(core),
                owner: AtomicUsize::new(NO_OWNER),
            }),
        }
    }

    /// Builds a cache around an explicit, empty ordering.
    ///
    /// # Example
    ///
    /// ```
    /// use evictkit::concurrent::ConcurrentCache;
    /// use evictkit::policy::lru::LruOrder;
    ///
    /// let cache = ConcurrentCache::with_order(LruOrder::new(), 2, None).unwrap();
    /// cache.add(1, "one", None);
    /// assert_eq!(cache.get(&1), Some(("one", None)));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is zero.
    pub fn with_order(
        order: O,
        capacity: usize,
        on_evict: Option<EvictCallback<K, V>>,
    ) -> Result<Self, ConfigError> {
        CacheCore::try_new(order, capacity, on_evict).map(Self::from_core)
    }

    fn lock(&self) -> CoreGuard<'_, K, V, O> {
        let me = thread_token();
        if self.shared.owner.load(Ordering::Relaxed) == me {
            panic!(
                "cache re-entered while this thread holds its lock \
                 (eviction callbacks must not call back into the cache)"
            );
        }
        let guard = self.shared.core.lock();
        self.shared.owner.store(me, Ordering::Relaxed);
        CoreGuard {
            guard,
            owner: &self.shared.owner,
        }
    }

    /// Inserts or overwrites `key`; returns `true` iff an entry was evicted.
    pub fn add(&self, key: K, value: V, expires_at: Expiry) -> bool {
        self.lock().add(key, value, expires_at)
    }

    /// Looks up `key`, recording the access on a hit.
    pub fn get(&self, key: &K) -> Option<(V, Expiry)>
    where
        V: Clone,
    {
        let mut core = self.lock();
        core.get(key).map(|(v, exp)| (v.clone(), exp))
    }

    /// Looks up `key` without recording an access.
    pub fn peek(&self, key: &K) -> Option<(V, Expiry)>
    where
        V: Clone,
    {
        let mut core = self.lock();
        core.peek(key).map(|(v, exp)| (v.clone(), exp))
    }

    pub fn contains(&self, key: &K) -> bool {
        self.lock().contains(key)
    }

    /// Atomically adds `key` unless it is live. Returns `(contained, evicted)`.
    pub fn contains_or_add(&self, key: K, value: V, expires_at: Expiry) -> (bool, bool) {
        self.lock().contains_or_add(key, value, expires_at)
    }

    /// Atomically adds `key` unless it is live. Returns
    /// `(previous, contained, evicted)`.
    pub fn peek_or_add(&self, key: K, value: V, expires_at: Expiry) -> (Option<V>, bool, bool)
    where
        V: Clone,
    {
        let mut core = self.lock();
        let (previous, contained, evicted) = core.peek_or_add(key, value, expires_at);
        (previous.cloned(), contained, evicted)
    }

    pub fn remove(&self, key: &K) -> bool {
        self.lock().remove(key)
    }

    /// Changes the capacity and returns how many entries were evicted.
    pub fn resize(&self, capacity: usize) -> usize {
        self.lock().resize(capacity)
    }

    pub fn purge(&self) {
        self.lock().purge()
    }

    /// Snapshot of unexpired keys, least favoured first.
    pub fn keys(&self) -> Vec<K> {
        self.lock().keys()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    /// The entry that would be evicted next.
    pub fn peek_victim(&self) -> Option<(K, V, Expiry)>
    where
        V: Clone,
    {
        let core = self.lock();
        core.peek_victim()
            .map(|(k, v, exp)| (k.clone(), v.clone(), exp))
    }

    /// Removes and returns the entry that would be evicted next, without
    /// invoking the eviction callback.
    pub fn remove_victim(&self) -> Option<(K, V, Expiry)> {
        self.lock().remove_victim().map(|entry| entry.into_parts())
    }

    /// LFU access count of a live key.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.lock().frequency(key)
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError>
    where
        K: fmt::Debug,
    {
        self.lock().check_invariants()
    }

    /// Runs `f` with exclusive access to the core, as one critical section.
    pub fn with_core<R>(&self, f: impl FnOnce(&mut CacheCore<K, V, O>) -> R) -> R {
        let mut core = self.lock();
        f(&mut core)
    }
}

#[cfg(feature = "metrics")]
impl<K, V, O> ConcurrentCache<K, V, O>
where
    K: Eq + Hash + Clone,
    O: EvictionOrder<K, V>,
{
    pub fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        self.lock().metrics_snapshot()
    }
}

#[cfg(feature = "metrics")]
impl<K, V, O> MetricsSnapshotProvider<CacheMetricsSnapshot> for ConcurrentCache<K, V, O>
where
    K: Eq + Hash + Clone,
    O: EvictionOrder<K, V>,
{
    fn snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V, O> fmt::Debug for ConcurrentCache<K, V, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ds = f.debug_struct("ConcurrentCache");
        match self.shared.core.try_lock() {
            Some(core) => ds.field("core", &*core),
            None => ds.field("core", &format_args!("<locked>")),
        };
        ds.finish()
    }
}
