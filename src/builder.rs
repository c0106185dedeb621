//! Cache construction.
//!
//! The four named constructors cover the common cases; [`CacheBuilder`] takes
//! the policy as a value, which suits configuration-driven setups.
//!
//! ## Example
//!
//! ```rust
//! use evictkit::builder::CacheBuilder;
//! use evictkit::{Cache, CachePolicy};
//!
//! let lru: Cache<u64, String> = Cache::new_lru(100).unwrap();
//! lru.add(1, "hello".to_string(), None);
//! assert_eq!(lru.get(&1), Some(("hello".to_string(), None)));
//!
//! let lfu = CacheBuilder::<u64, String>::new(100)
//!     .policy(CachePolicy::Lfu)
//!     .on_evict(|key: &u64, _value: &String, _| println!("evicted {key}"))
//!     .build()
//!     .unwrap();
//! assert_eq!(lfu.policy(), CachePolicy::Lfu);
//! ```

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use tracing::debug;

use crate::concurrent::ConcurrentCache;
use crate::entry::Expiry;
use crate::error::ConfigError;
use crate::policy::{CachePolicy, PolicyOrder};
use crate::traits::EvictCallback;

/// Thread-safe cache whose eviction policy is chosen at construction.
pub type Cache<K, V> = ConcurrentCache<K, V, PolicyOrder<K, V>>;

impl<K, V> ConcurrentCache<K, V, PolicyOrder<K, V>>
where
    K: Eq + Hash + Clone,
{
    /// LRU cache holding at most `capacity` entries.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is zero.
    pub fn new_lru(capacity: usize) -> Result<Self, ConfigError> {
        CacheBuilder::new(capacity).policy(CachePolicy::Lru).build()
    }

    /// LFU cache holding at most `capacity` entries.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is zero.
    pub fn new_lfu(capacity: usize) -> Result<Self, ConfigError> {
        CacheBuilder::new(capacity).policy(CachePolicy::Lfu).build()
    }

    /// LRU cache that calls `on_evicted` for every entry evicted to make room.
    ///
    /// The callback runs while the cache is locked: it must not use this cache
    /// and should return quickly.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is zero.
    pub fn new_lru_with_evict<F>(capacity: usize, on_evicted: F) -> Result<Self, ConfigError>
    where
        F: Fn(&K, &V, Expiry) + Send + Sync + 'static,
    {
        CacheBuilder::new(capacity)
            .policy(CachePolicy::Lru)
            .on_evict(on_evicted)
            .build()
    }

    /// LFU cache that calls `on_evicted` for every entry evicted to make room.
    ///
    /// Same callback rules as [`new_lru_with_evict`](Self::new_lru_with_evict).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is zero.
    pub fn new_lfu_with_evict<F>(capacity: usize, on_evicted: F) -> Result<Self, ConfigError>
    where
        F: Fn(&K, &V, Expiry) + Send + Sync + 'static,
    {
        CacheBuilder::new(capacity)
            .policy(CachePolicy::Lfu)
            .on_evict(on_evicted)
            .build()
    }

    /// The policy this cache was built with.
    pub fn policy(&self) -> CachePolicy {
        self.with_core(|core| core.order().policy())
    }
}

/// Builder for [`Cache`] instances.
pub struct CacheBuilder<K, V> {
    capacity: usize,
    policy: CachePolicy,
    on_evict: Option<EvictCallback<K, V>>,
}

impl<K, V> CacheBuilder<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Starts a builder for an LRU cache of `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            policy: CachePolicy::default(),
            on_evict: None,
        }
    }

    pub fn policy(mut self, policy: CachePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Installs the eviction callback.
    pub fn on_evict<F>(mut self, on_evict: F) -> Self
    where
        F: Fn(&K, &V, Expiry) + Send + Sync + 'static,
    {
        self.on_evict = Some(Arc::new(on_evict));
        self
    }

    /// Installs an already shared eviction callback.
    pub fn on_evict_shared(mut self, on_evict: EvictCallback<K, V>) -> Self {
        self.on_evict = Some(on_evict);
        self
    }

    /// Builds the cache.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the capacity is zero.
    pub fn build(self) -> Result<Cache<K, V>, ConfigError> {
        let has_callback = self.on_evict.is_some();
        let order = PolicyOrder::new(self.policy, self.capacity);
        let cache = ConcurrentCache::with_order(order, self.capacity, self.on_evict)?;
        debug!(
            policy = self.policy.name(),
            capacity = self.capacity,
            has_callback,
            "cache built"
        );
        Ok(cache)
    }
}

impl<K, V> fmt::Debug for CacheBuilder<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheBuilder")
            .field("capacity", &self.capacity)
            .field("policy", &self.policy)
            .field("on_evict", &self.on_evict.is_some())
            .finish()
    }
}
