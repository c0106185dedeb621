//! Error types for evictkit.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when cache configuration parameters are invalid.
//!   The only invalid configuration is a zero capacity.
//! - [`InvariantError`]: Returned by `check_invariants` when the index and the
//!   ordering structure disagree.
//!
//! Lookups never fail: a miss is `None` or `false`.
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::error::ConfigError;
//! use evictkit::Cache;
//!
//! let cache: Result<Cache<String, i32>, ConfigError> = Cache::new_lru(100);
//! assert!(cache.is_ok());
//!
//! // Zero capacity is caught without panicking
//! let bad = Cache::<String, i32>::new_lfu(0);
//! assert!(bad.is_err());
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Produced by [`CacheCore::check_invariants`](crate::core::CacheCore::check_invariants)
/// and the matching wrapper method. Carries a human-readable description of
/// which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration parameters are invalid.
///
/// Produced by the fallible constructors ([`Cache::new_lru`](crate::Cache::new_lru)
/// and friends) and [`CacheBuilder::build`](crate::builder::CacheBuilder::build).
///
/// # Example
///
/// ```
/// use evictkit::builder::CacheBuilder;
///
/// let err = CacheBuilder::<u64, u64>::new(0).build().unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

impl ConfigError {
    pub(crate) fn zero_capacity() -> Self {
        Self::new("capacity must be greater than zero")
    }
}
