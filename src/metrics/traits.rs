//! # Metrics traits
//!
//! Recording and reading are split the same way the cache is split from its
//! ordering: the core only *records* through [`CoreMetricsRecorder`], and
//! callers read a point-in-time copy through [`MetricsSnapshotProvider`].
//!
//! ```text
//!   CacheCore ──record_*()──► CacheMetrics ──snapshot()──► CacheMetricsSnapshot
//!   (under the cache lock)     (plain u64s)                  (Copy, no lock)
//! ```

/// Counters every cache operation feeds.
pub trait CoreMetricsRecorder {
    fn record_get_hit(&mut self);
    fn record_get_miss(&mut self);
    fn record_insert_call(&mut self);
    fn record_insert_new(&mut self);
    fn record_insert_update(&mut self);
    fn record_evicted_entry(&mut self);
    /// An entry found expired on lookup and deleted.
    fn record_expired_entry(&mut self);
    /// An entry removed by `remove` or `remove_victim`.
    fn record_removed_entry(&mut self);
    fn record_purge(&mut self);
    fn record_resize(&mut self);
}

/// Produces a snapshot of type `S`.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}
