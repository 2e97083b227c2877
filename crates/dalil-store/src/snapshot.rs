use chrono::{DateTime, TimeDelta, Utc};
use dalil_core::RawEntry;
use serde::{Deserialize, Serialize};

/// Bumped whenever the persisted entry shape changes; older snapshots are
/// discarded rather than migrated.
pub const SCHEMA_VERSION: u32 = 2;

/// Snapshots older than this are not trusted.
pub const CACHE_TTL_SECS: i64 = 60 * 60;

/// A persisted copy of the full entry list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSnapshot {
    pub timestamp: DateTime<Utc>,
    pub schema_version: u32,
    pub entries: Vec<RawEntry>,
}

impl CacheSnapshot {
    /// A snapshot of `entries` captured at `now` with the running schema.
    #[must_use]
    pub fn capture(entries: Vec<RawEntry>, now: DateTime<Utc>) -> Self {
        Self {
            timestamp: now,
            schema_version: SCHEMA_VERSION,
            entries,
        }
    }

    #[must_use]
    pub fn age(&self, now: DateTime<Utc>) -> TimeDelta {
        now - self.timestamp
    }

    /// Fresh means captured no later than `now` and less than the TTL ago.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        let age = self.age(now);
        age >= TimeDelta::zero() && age < TimeDelta::seconds(CACHE_TTL_SECS)
    }
}
