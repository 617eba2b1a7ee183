// Confidence threshold - detector cut-off adjustable while polling
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("confidence must be within 0..=1, got {0}")]
pub struct InvalidConfidence(pub f64);

fn validate(value: f64) -> Result<f64, InvalidConfidence> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(InvalidConfidence(value))
    }
}

/// Shared between the source that sends it and the HTTP layer that edits it.
/// A new value is picked up by the next request.
#[derive(Debug, Clone)]
pub struct ConfidenceThreshold {
    tx: Arc<watch::Sender<f64>>,
}

impl ConfidenceThreshold {
    pub fn new(value: f64) -> Result<Self, InvalidConfidence> {
        let (tx, _) = watch::channel(validate(value)?);
        Ok(Self { tx: Arc::new(tx) })
    }

    pub fn get(&self) -> f64 {
        *self.tx.borrow()
    }

    /// Returns the previous threshold.
    pub fn set(&self, value: f64) -> Result<f64, InvalidConfidence> {
        Ok(self.tx.send_replace(validate(value)?))
    }
}
