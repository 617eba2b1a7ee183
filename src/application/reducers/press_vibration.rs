// Press vibration reducer - reconstruction error and sensor trend windows
use crate::application::reducer::SnapshotReducer;
use crate::domain::history::{HistoryPoint, RollingHistory, SensorPoint};
use crate::domain::inspection::VibrationReading;
use rand::Rng;
use serde::Serialize;

const JITTER_SPAN: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VibrationStatus {
    Normal,
    Anomaly,
}

#[derive(Debug, Clone)]
pub struct PressVibrationReducer {
    error_history: RollingHistory<HistoryPoint>,
    sensor_history: RollingHistory<SensorPoint>,
    demo_jitter: bool,
    previous: Option<[f64; 4]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PressVibrationView {
    pub receiving: bool,
    pub status: VibrationStatus,
    pub reconstruction_error: f64,
    pub threshold: f64,
    pub mode: Option<String>,
    pub error_history: Vec<HistoryPoint>,
    pub sensor_history: Vec<SensorPoint>,
}

impl PressVibrationReducer {
    pub fn new(capacity: usize, demo_jitter: bool) -> Self {
        Self {
            error_history: RollingHistory::new(capacity),
            sensor_history: RollingHistory::new(capacity),
            demo_jitter,
            previous: None,
        }
    }

    #[cfg(test)]
    pub fn error_history(&self) -> &RollingHistory<HistoryPoint> {
        &self.error_history
    }

    #[cfg(test)]
    pub fn sensor_history(&self) -> &RollingHistory<SensorPoint> {
        &self.sensor_history
    }

    // Demo affordance for a static mock backend: identical consecutive
    // readings get a small offset so the trend lines stay visibly alive.
    fn maybe_jitter(&mut self, values: [f64; 4]) -> [f64; 4] {
        if !self.demo_jitter {
            return values;
        }
        let repeated = self.previous == Some(values);
        self.previous = Some(values);
        if !repeated {
            return values;
        }
        let mut rng = rand::thread_rng();
        values.map(|v| v + rng.gen_range(-JITTER_SPAN..JITTER_SPAN))
    }
}

impl SnapshotReducer for PressVibrationReducer {
    type Snapshot = VibrationReading;
    type View = PressVibrationView;

    fn apply(&mut self, snapshot: &VibrationReading, received_at: &str) {
        let raw = [
            snapshot.reconstruction_error,
            snapshot.sensor("sensor_0"),
            snapshot.sensor("sensor_1"),
            snapshot.sensor("sensor_2"),
        ];
        let [err, s0, s1, s2] = self.maybe_jitter(raw);

        self.error_history.push(HistoryPoint::new(received_at, err));
        self.sensor_history.push(SensorPoint {
            time: received_at.to_string(),
            sensor_0: s0,
            sensor_1: s1,
            sensor_2: s2,
        });
    }

    fn reset(&mut self) {
        self.error_history.clear();
        self.sensor_history.clear();
        self.previous = None;
    }

    fn project(&self, latest: Option<&VibrationReading>) -> PressVibrationView {
        let status = if latest.is_some_and(|r| r.is_anomaly) {
            VibrationStatus::Anomaly
        } else {
            VibrationStatus::Normal
        };

        PressVibrationView {
            receiving: latest.is_some(),
            status,
            reconstruction_error: latest.map(|r| r.reconstruction_error).unwrap_or(0.0),
            threshold: latest.map(|r| r.threshold).unwrap_or(0.0),
            mode: latest.and_then(|r| r.mode.clone()),
            error_history: self.error_history.iter().cloned().collect(),
            sensor_history: self.sensor_history.iter().cloned().collect(),
        }
    }
}
