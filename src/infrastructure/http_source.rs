// HTTP snapshot source - POSTs to the prediction service and decodes JSON
use crate::application::confidence::ConfidenceThreshold;
use crate::application::snapshot_source::{FetchError, SnapshotSource};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

pub const PRESS_IMAGE_PATH: &str = "/api/v1/smartfactory/press/image";
pub const PRESS_VIBRATION_PATH: &str = "/api/v1/smartfactory/press/vibration";
pub const BODY_BATCH_PATH: &str = "/api/v1/smartfactory/body/inspect/batch/auto";
pub const WELDING_IMAGE_PATH: &str = "/api/v1/smartfactory/welding/image/auto";

#[derive(Debug, Clone)]
pub struct HttpSnapshotSource<S> {
    client: reqwest::Client,
    url: String,
    confidence: Option<ConfidenceThreshold>,
    _payload: PhantomData<fn() -> S>,
}

pub fn endpoint_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

impl<S> HttpSnapshotSource<S> {
    pub fn new(client: reqwest::Client, api_base: &str, path: &str) -> Self {
        Self {
            client,
            url: endpoint_url(api_base, path),
            confidence: None,
            _payload: PhantomData,
        }
    }

    /// Sends `conf=<threshold>` as a form field with every request.
    pub fn with_confidence(mut self, confidence: ConfidenceThreshold) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

#[async_trait]
impl<S> SnapshotSource<S> for HttpSnapshotSource<S>
where
    S: DeserializeOwned + Send + 'static,
{
    async fn fetch(&self) -> Result<S, FetchError> {
        let mut request = self
            .client
            .post(&self.url)
            .header("Accept", "application/json");

        if let Some(confidence) = &self.confidence {
            request = request.form(&[("conf", confidence.get().to_string())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or_default().to_string()
            } else {
                body
            };
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(e.to_string()))
    }
}
