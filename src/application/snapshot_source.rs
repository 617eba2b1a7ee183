// Source trait for polled snapshots
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Why a poll produced no snapshot. The `Display` text is what the
/// dashboard shows next to the stale data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("API {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("request timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),
}

#[async_trait]
pub trait SnapshotSource<S>: Send + Sync {
    /// Fetch one complete snapshot from the data source
    async fn fetch(&self) -> Result<S, FetchError>;
}

#[async_trait]
impl<S, T> SnapshotSource<S> for Arc<T>
where
    S: Send + 'static,
    T: SnapshotSource<S> + ?Sized,
{
    async fn fetch(&self) -> Result<S, FetchError> {
        (**self).fetch().await
    }
}
