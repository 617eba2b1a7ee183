// Per-source reducer trait - folds snapshots into dashboard state
use serde::Serialize;

/// How one data source turns successive snapshots into view state.
///
/// `apply` runs once per successful fetch with the receipt time. `project`
/// must be a pure function of the reducer and the latest snapshot.
pub trait SnapshotReducer: Send + Sync + 'static {
    type Snapshot: Serialize + Send + Sync + 'static;
    type View: Serialize;

    fn apply(&mut self, snapshot: &Self::Snapshot, received_at: &str);

    fn reset(&mut self);

    fn project(&self, latest: Option<&Self::Snapshot>) -> Self::View;
}
