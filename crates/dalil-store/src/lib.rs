//! Local persistence for directory snapshots and the language preference.
//!
//! Everything stored here is an optimisation: a missing or unreadable value
//! is always a valid state, so reads collapse failures into "absent" and
//! writes swallow errors after logging them.

pub mod backend;
pub mod cache;
pub mod error;
pub mod preference;
pub mod snapshot;

pub use backend::{FileStore, KeyValueStore, MemoryStore};
pub use cache::{CacheRead, CacheStore, SNAPSHOT_KEY};
pub use error::StoreError;
pub use preference::{PreferenceStore, LANGUAGE_KEY};
pub use snapshot::{CacheSnapshot, CACHE_TTL_SECS, SCHEMA_VERSION};
