pub mod client;
pub mod error;
pub(crate) mod retry;

pub use client::DirectoryClient;
pub use error::FetchError;
