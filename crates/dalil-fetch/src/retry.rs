//! Bounded, sequential retry for the directory fetch.
//!
//! A failed attempt is retried after a fixed delay, never concurrently with
//! the attempt that failed. An unusable endpoint URL is returned
//! immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::FetchError;

/// Returns `true` for errors that are worth one more attempt.
///
/// **Retriable:** timeouts, network rejections, any non-2xx status,
/// malformed bodies.
///
/// **Not retriable:** [`FetchError::InvalidUrl`].
pub(crate) fn is_retriable(err: &FetchError) -> bool {
    match err {
        FetchError::Timeout { .. }
        | FetchError::Rejected(_)
        | FetchError::BadStatus { .. }
        | FetchError::Malformed { .. } => true,
        FetchError::InvalidUrl { .. } => false,
    }
}

/// Runs `operation`, retrying up to `max_retries` more times on transient
/// errors with `delay_ms` between attempts.
pub(crate) async fn retry_with_delay<T, F, Fut>(
    max_retries: u32,
    delay_ms: u64,
    mut operation: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "directory fetch failed; retrying after delay"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
