//! Operation counters, compiled only with the `metrics` feature.

pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

pub use metrics_impl::CacheMetrics;
pub use snapshot::CacheMetricsSnapshot;
pub use traits::{CoreMetricsRecorder, MetricsSnapshotProvider};
