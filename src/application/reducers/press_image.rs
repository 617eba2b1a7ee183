// Press image reducer - accumulates classifier scores per defect type
use crate::application::reducer::SnapshotReducer;
use crate::domain::accumulator::AccumulatedDistribution;
use crate::domain::inspection::{DefectClassification, PRESS_DEFECT_TYPES};
use crate::domain::projection::{CategoryValue, confidence_pct};
use serde::Serialize;

/// Sums `all_scores` over the session rather than showing only the latest
/// frame, so the distribution chart shows a trend.
#[derive(Debug, Clone)]
pub struct PressImageReducer {
    distribution: AccumulatedDistribution,
    frames: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PressImageView {
    pub predicted_class: Option<String>,
    pub confidence_pct: Option<f64>,
    pub high_confidence: bool,
    pub scores: Vec<CategoryValue>,
    pub distribution: Vec<CategoryValue>,
    pub top_defect: Option<String>,
    pub frames: u64,
    pub has_image: bool,
    pub note: Option<String>,
}

impl PressImageReducer {
    pub fn new() -> Self {
        Self {
            distribution: AccumulatedDistribution::new(PRESS_DEFECT_TYPES),
            frames: 0,
        }
    }

    #[cfg(test)]
    pub fn distribution(&self) -> &AccumulatedDistribution {
        &self.distribution
    }
}

impl Default for PressImageReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotReducer for PressImageReducer {
    type Snapshot = DefectClassification;
    type View = PressImageView;

    fn apply(&mut self, snapshot: &DefectClassification, _received_at: &str) {
        self.distribution.accumulate(|category| snapshot.score(category));
        self.frames += 1;
    }

    fn reset(&mut self) {
        self.distribution.reset();
        self.frames = 0;
    }

    fn project(&self, latest: Option<&DefectClassification>) -> PressImageView {
        let scores = latest
            .map(|data| {
                data.all_scores
                    .keys()
                    .map(|name| CategoryValue {
                        name: name.clone(),
                        value: data.score(name),
                    })
                    .collect()
            })
            .unwrap_or_default();

        PressImageView {
            predicted_class: latest.and_then(|d| d.predicted_class.clone()),
            confidence_pct: latest.map(|d| confidence_pct(d.confidence)),
            high_confidence: latest.is_some_and(|d| d.confidence >= 0.8),
            scores,
            distribution: self.distribution.entries(),
            top_defect: self.distribution.top().map(str::to_string),
            frames: self.frames,
            has_image: latest
                .is_some_and(|d| d.image_base64.as_deref().is_some_and(|s| !s.is_empty())),
            note: latest.and_then(|d| d.note.clone()),
        }
    }
}
