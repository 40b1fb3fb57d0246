//! Cache entry lifecycle
//!
//! A cache entry wraps a value with creation/expiry metadata so that
//! liveness can be decided by the caller, independent of whatever expiry
//! the backing store itself enforces. Providers whose own purge is lazy
//! or advisory never leak stale values through this check.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for one provider instance of a cache.
///
/// A time bound and a size bound may be combined or used independently;
/// which combinations are valid is decided by each provider at
/// construction time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheProps {
    /// How long a written entry stays alive
    pub time_to_live: Option<Duration>,
    /// Upper bound on the number of entries the provider holds
    pub max_size: Option<u64>,
}

impl CacheProps {
    /// Create props with both bounds
    pub fn new(time_to_live: Option<Duration>, max_size: Option<u64>) -> Self {
        Self {
            time_to_live,
            max_size,
        }
    }

    /// Props with only a time bound
    pub fn with_time_to_live(time_to_live: Duration) -> Self {
        Self {
            time_to_live: Some(time_to_live),
            max_size: None,
        }
    }

    /// Props with only a size bound
    pub fn with_max_size(max_size: u64) -> Self {
        Self {
            time_to_live: None,
            max_size: Some(max_size),
        }
    }
}

/// A cached value with its lifecycle metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<T> {
    /// The cached value
    pub value: T,
    /// When the entry was written
    pub created_at: DateTime<Utc>,
    /// When the entry stops being alive; `None` means it never expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl<T> CacheEntry<T> {
    /// Create an entry with no expiry, created now
    pub fn new(value: T) -> Self {
        let now = Utc::now();
        Self {
            value,
            created_at: now,
            expires_at: None,
        }
    }

    /// True iff the entry is still alive at `now`
    pub fn is_alive(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|expires_at| now < expires_at)
    }

    /// Recompute the expiry from `props` as of `now`.
    ///
    /// Called on every write so that liveness does not depend on the
    /// provider honoring its own expiry promptly.
    pub fn apply_props(&mut self, props: &CacheProps, now: DateTime<Utc>) {
        self.expires_at = props
            .time_to_live
            .and_then(|ttl| chrono::Duration::from_std(ttl).ok())
            .map(|ttl| now + ttl);
    }

    /// Builder form of [`CacheEntry::apply_props`]
    pub fn with_props(mut self, props: &CacheProps, now: DateTime<Utc>) -> Self {
        self.apply_props(props, now);
        self
    }
}
