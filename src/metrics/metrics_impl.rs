use crate::metrics::traits::CoreMetricsRecorder;

/// Live counters owned by a [`CacheCore`](crate::core::CacheCore).
///
/// No interior mutability: every write happens through `&mut` under the
/// wrapper's lock, including on read paths such as `peek`.
#[derive(Debug, Default, Clone)]
pub struct CacheMetrics {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub insert_calls: u64,
    pub insert_new: u64,
    pub insert_updates: u64,
    pub evicted_entries: u64,
    pub expired_entries: u64,
    pub removed_entries: u64,
    pub purge_calls: u64,
    pub resize_calls: u64,
}

impl CoreMetricsRecorder for CacheMetrics {
    fn record_get_hit(&mut self) {
        self.get_calls += 1;
        self.get_hits += 1;
    }

    fn record_get_miss(&mut self) {
        self.get_calls += 1;
        self.get_misses += 1;
    }

    fn record_insert_call(&mut self) {
        self.insert_calls += 1;
    }

    fn record_insert_new(&mut self) {
        self.insert_new += 1;
    }

    fn record_insert_update(&mut self) {
        self.insert_updates += 1;
    }

    fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }

    fn record_expired_entry(&mut self) {
        self.expired_entries += 1;
    }

    fn record_removed_entry(&mut self) {
        self.removed_entries += 1;
    }

    fn record_purge(&mut self) {
        self.purge_calls += 1;
    }

    fn record_resize(&mut self) {
        self.resize_calls += 1;
    }
}
