// Poller - fixed-interval fetch loop feeding a snapshot store
use crate::application::in_flight::InFlightGuard;
use crate::application::reducer::SnapshotReducer;
use crate::application::snapshot_source::{FetchError, SnapshotSource};
use crate::application::store::{MonitorState, SnapshotStore};
use crate::infrastructure::clock::time_of_day;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PollOutcome {
    /// Snapshot fetched and applied
    Applied,
    /// Fetch failed; error recorded, previous state kept
    Failed,
    /// Another request was still in flight
    Skipped,
    /// Poller stopped before the result could be applied
    Discarded,
}

pub struct Poller<R: SnapshotReducer> {
    inner: Arc<PollerInner<R>>,
}

struct PollerInner<R: SnapshotReducer> {
    name: String,
    source: Arc<dyn SnapshotSource<R::Snapshot>>,
    store: SnapshotStore<R>,
    guard: InFlightGuard,
    cancel: CancellationToken,
    timeout: Duration,
}

impl<R: SnapshotReducer> Clone for Poller<R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<R: SnapshotReducer> Poller<R> {
    pub fn new<Src>(name: impl Into<String>, source: Src, reducer: R, timeout: Duration) -> Self
    where
        Src: SnapshotSource<R::Snapshot> + 'static,
    {
        let cancel = CancellationToken::new();
        Self {
            inner: Arc::new(PollerInner {
                name: name.into(),
                source: Arc::new(source),
                store: SnapshotStore::new(reducer, cancel.clone()),
                guard: InFlightGuard::new(),
                cancel,
                timeout,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Polls once right away, then once per `interval` until `stop`.
    ///
    /// Every tick runs on its own task so a slow request makes later ticks
    /// hit the in-flight guard and get dropped instead of piling up.
    pub fn start(&self, interval: Duration) -> JoinHandle<()> {
        if self.is_stopped() {
            tracing::warn!(monitor = %self.inner.name, "Poller already stopped, not starting");
        }
        let poller = self.clone();
        let interval = interval.max(Duration::from_millis(1));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            tracing::info!(monitor = %poller.inner.name, ?interval, "Poller started");

            loop {
                tokio::select! {
                    _ = poller.inner.cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        let tick = poller.clone();
                        tokio::spawn(async move {
                            tick.poll_once().await;
                        });
                    }
                }
            }

            tracing::info!(monitor = %poller.inner.name, "Poller stopped");
        })
    }

    /// Terminal: ends the timer loop and freezes the store.
    pub fn stop(&self) {
        self.inner.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    #[cfg(test)]
    pub fn is_in_flight(&self) -> bool {
        self.inner.guard.is_busy()
    }

    pub async fn refresh_now(&self) -> PollOutcome {
        self.poll_once().await
    }

    pub fn reset(&self) {
        self.inner.store.reset();
    }

    pub fn subscribe(&self) -> watch::Receiver<MonitorState<R>> {
        self.inner.store.subscribe()
    }

    pub fn read<T>(&self, f: impl FnOnce(&MonitorState<R>) -> T) -> T {
        self.inner.store.read(f)
    }

    pub async fn poll_once(&self) -> PollOutcome {
        let inner = &self.inner;
        if inner.cancel.is_cancelled() {
            return PollOutcome::Discarded;
        }

        let Some(_permit) = inner.guard.try_acquire() else {
            tracing::debug!(monitor = %inner.name, "Request still in flight, skipping tick");
            return PollOutcome::Skipped;
        };

        inner.store.set_loading(true);
        let result = match tokio::time::timeout(inner.timeout, inner.source.fetch()).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(inner.timeout)),
        };

        if inner.cancel.is_cancelled() {
            tracing::debug!(monitor = %inner.name, "Poller stopped mid-request, discarding result");
            return PollOutcome::Discarded;
        }

        match result {
            Ok(snapshot) => {
                inner.store.apply_success(snapshot, time_of_day());
                PollOutcome::Applied
            }
            Err(e) => {
                tracing::warn!(monitor = %inner.name, error = %e, "Poll failed");
                inner.store.apply_failure(e.to_string());
                PollOutcome::Failed
            }
        }
    }
}
