//! evictkit: fixed-capacity in-process caches with LRU and LFU eviction.
//!
//! A cache holds at most `capacity` entries. Each entry may carry an absolute
//! expiry instant; expired entries are dropped lazily when looked up. When an
//! insert would exceed the capacity, the policy picks a victim (least recently
//! used, or least frequently used with a recency tie-break) and an optional
//! callback is told about it.
//!
//! ```
//! use std::time::{Duration, Instant};
//! use evictkit::Cache;
//!
//! let cache = Cache::new_lru_with_evict(2, |key: &&str, _: &u32, _| {
//!     println!("evicted {key}");
//! })
//! .unwrap();
//!
//! cache.add("a", 1, None);
//! cache.add("b", 2, Some(Instant::now() + Duration::from_secs(60)));
//! cache.get(&"a");
//! assert!(cache.add("c", 3, None)); // evicts "b"
//! assert_eq!(cache.keys(), vec!["a", "c"]);
//! ```
//!
//! Layout: [`ds`] holds the arena-backed list and frequency buckets,
//! [`policy`] the orderings built on them, [`core`] the single-threaded engine
//! and [`concurrent`] the locked, shareable handle.

pub mod builder;
pub mod concurrent;
pub mod core;
pub mod ds;
pub mod entry;
pub mod error;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod policy;
pub mod prelude;
pub mod traits;

pub use builder::{Cache, CacheBuilder};
pub use error::ConfigError;
pub use policy::CachePolicy;
