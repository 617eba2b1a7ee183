// Rolling history domain models
use serde::{Serialize, Serializer};
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPoint {
    pub time: String,
    pub value: f64,
}

impl HistoryPoint {
    pub fn new(time: impl Into<String>, value: f64) -> Self {
        Self {
            time: time.into(),
            value,
        }
    }
}

/// One reading of the three press vibration channels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorPoint {
    pub time: String,
    pub sensor_0: f64,
    pub sensor_1: f64,
    pub sensor_2: f64,
}

/// Fixed-capacity window over the most recent entries.
///
/// `push` appends at the back and drops from the front once the window is
/// over capacity, so iteration is always in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingHistory<T> {
    capacity: usize,
    points: VecDeque<T>,
}

impl<T> RollingHistory<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            points: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, point: T) {
        self.points.push_back(point);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[cfg(test)]
    pub fn latest(&self) -> Option<&T> {
        self.points.back()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.points.iter()
    }

    pub fn iter_newest_first(&self) -> impl Iterator<Item = &T> {
        self.points.iter().rev()
    }
}

impl<T: Serialize> Serialize for RollingHistory<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.points)
    }
}
