// Monitor registry - type-erased access to every running poller
use crate::application::poller::{PollOutcome, Poller};
use crate::application::reducer::SnapshotReducer;
use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::Value;
use std::sync::Arc;

/// What the HTTP layer needs from a poller, independent of its payload type.
#[async_trait]
pub trait Monitor: Send + Sync {
    fn name(&self) -> &str;

    /// Current rendered state (`latest`, `view`, `error`, `last_updated`, `is_loading`)
    fn current(&self) -> Result<Value, serde_json::Error>;

    /// Rendered state now and after every change
    fn watch(&self) -> BoxStream<'static, Result<Value, serde_json::Error>>;

    async fn refresh_now(&self) -> PollOutcome;

    fn reset(&self);

    fn stop(&self);
}

#[async_trait]
impl<R: SnapshotReducer> Monitor for Poller<R> {
    fn name(&self) -> &str {
        Poller::name(self)
    }

    fn current(&self) -> Result<Value, serde_json::Error> {
        self.read(|state| state.render())
    }

    fn watch(&self) -> BoxStream<'static, Result<Value, serde_json::Error>> {
        let mut rx = self.subscribe();
        Box::pin(async_stream::stream! {
            loop {
                let frame = rx.borrow_and_update().render();
                yield frame;
                if rx.changed().await.is_err() {
                    break;
                }
            }
        })
    }

    async fn refresh_now(&self) -> PollOutcome {
        Poller::refresh_now(self).await
    }

    fn reset(&self) {
        Poller::reset(self)
    }

    fn stop(&self) {
        Poller::stop(self)
    }
}

#[derive(Clone, Default)]
pub struct MonitorRegistry {
    monitors: Vec<Arc<dyn Monitor>>,
}

impl MonitorRegistry {
    pub fn new(monitors: Vec<Arc<dyn Monitor>>) -> Self {
        Self { monitors }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Monitor>> {
        self.monitors.iter().find(|m| m.name() == name).cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.monitors.iter().map(|m| m.name().to_string()).collect()
    }

    pub fn stop_all(&self) {
        for monitor in &self.monitors {
            monitor.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::snapshot_source::{FetchError, SnapshotSource};
    use crate::application::store::tests::ValueReducer;
    use futures::StreamExt;
    use std::time::Duration;

    struct Constant(f64);

    #[async_trait]
    impl SnapshotSource<f64> for Constant {
        async fn fetch(&self) -> Result<f64, FetchError> {
            Ok(self.0)
        }
    }

    fn monitor(name: &str, value: f64) -> Arc<dyn Monitor> {
        Arc::new(Poller::new(
            name,
            Constant(value),
            ValueReducer::new(5),
            Duration::from_secs(1),
        ))
    }

    #[tokio::test]
    async fn test_registry_lookup() {
        let registry = MonitorRegistry::new(vec![monitor("a", 1.0), monitor("b", 2.0)]);
        assert_eq!(registry.names(), vec!["a", "b"]);
        assert!(registry.get("b").is_some());
        assert!(registry.get("c").is_none());
    }

    #[tokio::test]
    async fn test_refresh_and_reset_through_trait_object() {
        let m = monitor("a", 4.0);
        assert_eq!(m.refresh_now().await, PollOutcome::Applied);

        let state = m.current().unwrap();
        assert_eq!(state["latest"], 4.0);
        assert_eq!(state["view"], serde_json::json!([4.0]));
        assert_eq!(state["error"], Value::Null);
        assert_eq!(state["is_loading"], false);

        m.reset();
        let state = m.current().unwrap();
        assert_eq!(state["latest"], Value::Null);
        assert_eq!(state["last_updated"], Value::Null);
    }

    #[tokio::test]
    async fn test_watch_yields_current_then_changes() {
        let m = monitor("a", 2.5);
        let mut frames = m.watch();

        let first = frames.next().await.unwrap().unwrap();
        assert_eq!(first["latest"], Value::Null);

        m.refresh_now().await;
        let mut last = frames.next().await.unwrap().unwrap();
        while last["latest"] == Value::Null {
            last = frames.next().await.unwrap().unwrap();
        }
        assert_eq!(last["latest"], 2.5);
    }

    #[tokio::test]
    async fn test_stop_all() {
        let m = monitor("a", 1.0);
        let registry = MonitorRegistry::new(vec![m.clone()]);
        registry.stop_all();
        assert_eq!(m.refresh_now().await, PollOutcome::Discarded);
    }
}
