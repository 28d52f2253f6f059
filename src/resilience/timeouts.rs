//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap connection I/O phases with a deadline
//! - Keep timeout errors distinct from other I/O errors
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - A zero duration means "no deadline"

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// A connection phase exceeded its deadline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{phase} timed out after {after:?}")]
pub struct TimeoutError {
    pub phase: &'static str,
    pub after: Duration,
}

/// Convert a configured number of seconds into an optional deadline.
pub fn deadline(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Run `fut` under `limit`, or unbounded when `limit` is `None`.
pub async fn with_timeout<F, T>(
    phase: &'static str,
    limit: Option<Duration>,
    fut: F,
) -> Result<T, TimeoutError>
where
    F: Future<Output = T>,
{
    match limit {
        Some(after) => tokio::time::timeout(after, fut)
            .await
            .map_err(|_| TimeoutError { phase, after }),
        None => Ok(fut.await),
    }
}
