//! The stored unit: key, value and an optional absolute expiry.

use std::time::Instant;

/// Absolute expiry instant; `None` means the entry never expires.
pub type Expiry = Option<Instant>;

/// One cached key/value pair.
///
/// Policy bookkeeping (list links, frequency) lives in the node that wraps the
/// entry inside the ordering structure, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<K, V> {
    pub key: K,
    pub value: V,
    pub expires_at: Expiry,
}

impl<K, V> Entry<K, V> {
    pub fn new(key: K, value: V, expires_at: Expiry) -> Self {
        Self {
            key,
            value,
            expires_at,
        }
    }

    /// An entry is expired once `now` has reached its expiry instant.
    #[inline]
    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }

    pub fn into_parts(self) -> (K, V, Expiry) {
        (self.key, self.value, self.expires_at)
    }
}
