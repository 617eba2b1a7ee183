// Body assembly reducer - per-part PASS/FAIL and a log of batch tallies
use crate::application::reducer::SnapshotReducer;
use crate::application::reducers::public_url;
use crate::domain::history::RollingHistory;
use crate::domain::inspection::{BatchInspection, Detection, PartKey, PassFail};
use crate::domain::projection::InspectionTally;
use crate::domain::sequence::SequenceCursor;
use serde::Serialize;

/// Registry name of the body-assembly poller.
pub const BODY_ASSEMBLY_MONITOR: &str = "body-assembly";
const RECORD_PREFIX: &str = "BATCH";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PartStatus {
    Pending,
    Pass,
    Fail,
    Error,
}

/// Counts for one batch response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BatchTally {
    pub inspected: usize,
    pub passes: usize,
    pub fails: usize,
    pub detections: usize,
}

impl BatchTally {
    pub fn from_batch(batch: &BatchInspection) -> Self {
        let mut tally = Self::default();
        for result in PartKey::ALL.into_iter().filter_map(|key| batch.part(key)) {
            tally.inspected += 1;
            match result.pass_fail {
                Some(PassFail::Pass) => tally.passes += 1,
                Some(PassFail::Fail) => tally.fails += 1,
                None => {}
            }
            tally.detections += result.detections.len();
        }
        tally
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRecord {
    pub id: String,
    pub time: String,
    pub tally: BatchTally,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartView {
    pub part: PartKey,
    pub label: &'static str,
    pub status: PartStatus,
    pub detections: Vec<Detection>,
    pub original_url: Option<String>,
    pub result_url: Option<String>,
    pub error: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyAssemblyView {
    pub parts: Vec<PartView>,
    pub latest: BatchTally,
    pub cumulative: InspectionTally,
    pub batches: Vec<BatchRecord>,
}

#[derive(Debug, Clone)]
pub struct BodyAssemblyReducer {
    api_base: String,
    log: RollingHistory<BatchRecord>,
    cursor: SequenceCursor,
}

impl BodyAssemblyReducer {
    pub fn new(api_base: impl Into<String>, log_capacity: usize) -> Self {
        Self {
            api_base: api_base.into(),
            log: RollingHistory::new(log_capacity),
            cursor: SequenceCursor::new(RECORD_PREFIX),
        }
    }

    #[cfg(test)]
    pub fn log(&self) -> &RollingHistory<BatchRecord> {
        &self.log
    }

    fn part_view(&self, key: PartKey, batch: Option<&BatchInspection>) -> PartView {
        let Some(result) = batch.and_then(|b| b.part(key)) else {
            return PartView {
                part: key,
                label: key.label(),
                status: PartStatus::Pending,
                detections: Vec::new(),
                original_url: None,
                result_url: None,
                error: None,
                source: None,
            };
        };

        let status = match (&result.error, result.pass_fail) {
            (Some(_), _) => PartStatus::Error,
            (None, Some(PassFail::Pass)) => PartStatus::Pass,
            (None, Some(PassFail::Fail)) => PartStatus::Fail,
            (None, None) => PartStatus::Pending,
        };

        PartView {
            part: key,
            label: key.label(),
            status,
            detections: result.detections.clone(),
            original_url: public_url(&self.api_base, result.original_image_url.as_deref()),
            result_url: public_url(&self.api_base, result.result_image_url.as_deref()),
            error: result.error.clone(),
            source: result.source.clone(),
        }
    }
}

impl SnapshotReducer for BodyAssemblyReducer {
    type Snapshot = BatchInspection;
    type View = BodyAssemblyView;

    fn apply(&mut self, snapshot: &BatchInspection, received_at: &str) {
        self.log.push(BatchRecord {
            id: self.cursor.next_id(),
            time: received_at.to_string(),
            tally: BatchTally::from_batch(snapshot),
        });
    }

    fn reset(&mut self) {
        self.log.clear();
        self.cursor.reset();
    }

    fn project(&self, latest: Option<&BatchInspection>) -> BodyAssemblyView {
        let (passes, fails) = self
            .log
            .iter()
            .fold((0, 0), |(p, f), r| (p + r.tally.passes, f + r.tally.fails));

        BodyAssemblyView {
            parts: PartKey::ALL
                .into_iter()
                .map(|key| self.part_view(key, latest))
                .collect(),
            latest: latest.map(BatchTally::from_batch).unwrap_or_default(),
            cumulative: InspectionTally::new(passes, fails),
            batches: self.log.iter_newest_first().cloned().collect(),
        }
    }
}
