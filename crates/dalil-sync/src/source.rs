use std::future::Future;

use dalil_core::RawEntry;
use dalil_fetch::{DirectoryClient, FetchError};

/// Where authoritative entries come from.
pub trait DirectorySource {
    fn fetch_entries(&self) -> impl Future<Output = Result<Vec<RawEntry>, FetchError>>;
}

impl DirectorySource for DirectoryClient {
    fn fetch_entries(&self) -> impl Future<Output = Result<Vec<RawEntry>, FetchError>> {
        DirectoryClient::fetch_entries(self)
    }
}
