//! TTL- and schema-guarded snapshot cache.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::backend::KeyValueStore;
use crate::error::StoreError;
use crate::snapshot::{CacheSnapshot, SCHEMA_VERSION};

/// Well-known key the snapshot is stored under.
pub const SNAPSHOT_KEY: &str = "directory_snapshot";

/// What a cache lookup found.
///
/// Only [`CacheRead::Hit`] carries data; every other variant means "no
/// usable snapshot" and callers treat them identically. The distinction
/// exists for logs and tests.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheRead {
    Hit(CacheSnapshot),
    Miss,
    Corrupt,
    SchemaMismatch { found: Option<u64> },
    Expired,
    Unavailable,
}

impl CacheRead {
    #[must_use]
    pub fn into_snapshot(self) -> Option<CacheSnapshot> {
        match self {
            CacheRead::Hit(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    /// Short label for logs and status output.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            CacheRead::Hit(_) => "hit",
            CacheRead::Miss => "miss",
            CacheRead::Corrupt => "corrupt",
            CacheRead::SchemaMismatch { .. } => "schema_mismatch",
            CacheRead::Expired => "expired",
            CacheRead::Unavailable => "unavailable",
        }
    }
}

/// Snapshot cache over any [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct CacheStore<S> {
    backend: S,
}

impl<S: KeyValueStore> CacheStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Classifies the stored snapshot as of `now`.
    pub fn inspect(&self, now: DateTime<Utc>) -> CacheRead {
        let raw = match self.backend.get(SNAPSHOT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return CacheRead::Miss,
            Err(e) => {
                tracing::warn!(error = %e, "snapshot cache unreadable");
                return CacheRead::Unavailable;
            }
        };

        let Ok(value) = serde_json::from_str::<Value>(&raw) else {
            return CacheRead::Corrupt;
        };
        let found = value.get("schema_version").and_then(Value::as_u64);
        if found != Some(u64::from(SCHEMA_VERSION)) {
            return CacheRead::SchemaMismatch { found };
        }
        let Ok(snapshot) = serde_json::from_value::<CacheSnapshot>(value) else {
            return CacheRead::Corrupt;
        };

        if snapshot.is_fresh(now) {
            CacheRead::Hit(snapshot)
        } else {
            CacheRead::Expired
        }
    }

    /// The stored snapshot if it is usable right now.
    pub fn read(&self) -> Option<CacheSnapshot> {
        let outcome = self.inspect(Utc::now());
        tracing::debug!(outcome = outcome.label(), "snapshot cache read");
        outcome.into_snapshot()
    }

    /// Overwrites the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if serialization or the backend write fails.
    pub fn try_write(&self, snapshot: &CacheSnapshot) -> Result<(), StoreError> {
        let body = serde_json::to_string(snapshot).map_err(|e| StoreError::Serialize {
            key: SNAPSHOT_KEY.to_owned(),
            source: e,
        })?;
        self.backend.set(SNAPSHOT_KEY, &body)
    }

    /// Overwrites the stored snapshot, logging and discarding any failure.
    ///
    /// Returns whether the write succeeded.
    pub fn write(&self, snapshot: &CacheSnapshot) -> bool {
        match self.try_write(snapshot) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "snapshot cache write failed; continuing without cache");
                false
            }
        }
    }

    /// Deletes the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot remove the key.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.backend.remove(SNAPSHOT_KEY)
    }
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
