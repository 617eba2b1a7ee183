// Snapshot store - latest snapshot plus derived state, published on change
use crate::application::reducer::SnapshotReducer;
use serde::Serialize;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

pub struct MonitorState<R: SnapshotReducer> {
    pub latest: Option<R::Snapshot>,
    pub reducer: R,
    pub error: Option<String>,
    pub last_updated: Option<String>,
    pub is_loading: bool,
}

impl<R: SnapshotReducer> MonitorState<R> {
    fn new(reducer: R) -> Self {
        Self {
            latest: None,
            reducer,
            error: None,
            last_updated: None,
            is_loading: false,
        }
    }

    pub fn view(&self) -> R::View {
        self.reducer.project(self.latest.as_ref())
    }

    /// Everything the view layer renders, as one JSON document.
    pub fn render(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(RenderedState {
            latest: self.latest.as_ref(),
            view: self.view(),
            error: self.error.as_deref(),
            last_updated: self.last_updated.as_deref(),
            is_loading: self.is_loading,
        })
    }
}

#[derive(Serialize)]
struct RenderedState<'a, S, V> {
    latest: Option<&'a S>,
    view: V,
    error: Option<&'a str>,
    last_updated: Option<&'a str>,
    is_loading: bool,
}

/// Owns one source's state and notifies subscribers on every change.
///
/// Writes are dropped once `active` is cancelled, so a request that settles
/// after its poller stopped leaves no trace.
pub struct SnapshotStore<R: SnapshotReducer> {
    tx: watch::Sender<MonitorState<R>>,
    active: CancellationToken,
}

impl<R: SnapshotReducer> SnapshotStore<R> {
    pub fn new(reducer: R, active: CancellationToken) -> Self {
        let (tx, _) = watch::channel(MonitorState::new(reducer));
        Self { tx, active }
    }

    pub fn subscribe(&self) -> watch::Receiver<MonitorState<R>> {
        self.tx.subscribe()
    }

    pub fn read<T>(&self, f: impl FnOnce(&MonitorState<R>) -> T) -> T {
        f(&self.tx.borrow())
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        !self.active.is_cancelled()
    }

    fn mutate(&self, f: impl FnOnce(&mut MonitorState<R>)) -> bool {
        if self.active.is_cancelled() {
            return false;
        }
        self.tx.send_modify(f);
        true
    }

    pub fn set_loading(&self, loading: bool) -> bool {
        self.mutate(|state| state.is_loading = loading)
    }

    pub fn apply_success(&self, snapshot: R::Snapshot, received_at: String) -> bool {
        self.mutate(|state| {
            state.reducer.apply(&snapshot, &received_at);
            state.latest = Some(snapshot);
            state.last_updated = Some(received_at);
            state.error = None;
            state.is_loading = false;
        })
    }

    /// Records the failure; the last good snapshot and history stay as they were.
    pub fn apply_failure(&self, message: String) -> bool {
        self.mutate(|state| {
            state.error = Some(message);
            state.is_loading = false;
        })
    }

    pub fn reset(&self) -> bool {
        self.mutate(|state| {
            state.latest = None;
            state.reducer.reset();
            state.error = None;
            state.last_updated = None;
        })
    }
}
