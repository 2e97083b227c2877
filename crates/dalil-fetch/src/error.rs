use std::time::Duration;

use thiserror::Error;

/// Errors returned while retrieving the directory dataset.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No response within the per-attempt deadline.
    #[error("request to {url} timed out after {elapsed:?}")]
    Timeout { url: String, elapsed: Duration },

    /// Network or TLS failure from the underlying HTTP client.
    #[error("request rejected: {0}")]
    Rejected(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    BadStatus { status: u16, url: String },

    /// The body is not JSON or has neither a `shops` nor a `data` array.
    #[error("malformed directory payload from {url}: {reason}")]
    Malformed { url: String, reason: String },

    #[error("invalid endpoint URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}
