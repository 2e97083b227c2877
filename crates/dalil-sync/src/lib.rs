//! Boot-time synchronisation between the snapshot cache, the remote
//! directory and whatever renders the results.

pub mod controller;
pub mod pending;
pub mod render;
pub mod source;
pub mod state;

pub use controller::{BootReport, FetchOutcome, SyncController, SyncOptions};
pub use pending::PendingQuery;
pub use render::{RenderView, Renderer, ResultItem, ViewBody};
pub use source::DirectorySource;
pub use state::{DirectoryState, Freshness, SyncPhase};
