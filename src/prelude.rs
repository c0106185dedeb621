pub use crate::builder::{Cache, CacheBuilder};
pub use crate::concurrent::ConcurrentCache;
pub use crate::core::CacheCore;
pub use crate::ds::{FrequencyBuckets, IntrusiveList, SlotArena, SlotId};
pub use crate::entry::{Entry, Expiry};
pub use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::CacheMetricsSnapshot;
pub use crate::policy::lfu::LfuOrder;
pub use crate::policy::lru::LruOrder;
pub use crate::policy::{CachePolicy, PolicyOrder};
pub use crate::traits::{EvictCallback, EvictionOrder};
